#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A fixture cell.
#[derive(Clone, Debug)]
pub enum Cell {
    Empty,
    Text(String),
    /// Raw number text, written to `<v>`
    Number(String),
    Bool(bool),
    /// Day serial formatted with the built-in date style
    Date(u32),
    Error(String),
}

pub fn text(value: &str) -> Cell {
    Cell::Text(value.to_owned())
}

pub fn number<N: ToString>(value: N) -> Cell {
    Cell::Number(value.to_string())
}

/// A header row of text cells.
pub fn header(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|name| text(name)).collect()
}

/// Writes minimal but valid `.xlsx` packages.
#[derive(Default)]
pub struct WorkbookBuilder {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
    shared_strings: bool,
}

impl WorkbookBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores text cells in `xl/sharedStrings.xml` instead of inline.
    pub fn with_shared_strings(mut self) -> Self {
        self.shared_strings = true;
        self
    }

    pub fn sheet(mut self, name: &str, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push((name.to_owned(), rows));
        self
    }

    pub fn write(&self, path: &Path) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default();
        let mut strings = Vec::<String>::new();

        let put = |zip: &mut ZipWriter<File>, name: &str, content: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        put(&mut zip, "[Content_Types].xml", &self.content_types());
        put(&mut zip, "_rels/.rels", ROOT_RELS);
        put(&mut zip, "xl/workbook.xml", &self.workbook());
        put(&mut zip, "xl/_rels/workbook.xml.rels", &self.workbook_rels());
        put(&mut zip, "xl/styles.xml", STYLES);
        for (index, (_, rows)) in self.sheets.iter().enumerate() {
            let worksheet = self.worksheet(rows, &mut strings);
            put(&mut zip, &format!("xl/worksheets/sheet{}.xml", index + 1), &worksheet);
        }
        if self.shared_strings {
            put(&mut zip, "xl/sharedStrings.xml", &shared_strings(&strings));
        }
        zip.finish().unwrap();
    }

    fn content_types(&self) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        ));
        for index in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{index}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }
        xml.push_str("</Types>");
        xml
    }

    fn workbook(&self) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<workbookPr date1904="false"/><sheets>"#,
        ));
        for (index, (name, _)) in self.sheets.iter().enumerate() {
            xml.push_str(&format!(r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#, escape(name), index + 1, index + 1));
        }
        xml.push_str("</sheets></workbook>");
        xml
    }

    fn workbook_rels(&self) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        ));
        for index in 1..=self.sheets.len() {
            xml.push_str(&format!(
                r#"<Relationship Id="rId{index}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{index}.xml"/>"#
            ));
        }
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            self.sheets.len() + 1
        ));
        xml.push_str("</Relationships>");
        xml
    }

    fn worksheet(&self, rows: &[Vec<Cell>], strings: &mut Vec<String>) -> String {
        let mut xml = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
        ));
        for (row_index, row) in rows.iter().enumerate() {
            xml.push_str(&format!(r#"<row r="{}">"#, row_index + 1));
            for (col_index, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", column_name(col_index), row_index + 1);
                let cell = match cell {
                    Cell::Empty => continue,
                    Cell::Text(value) if self.shared_strings => {
                        strings.push(value.to_owned());
                        format!(r#"<c r="{reference}" t="s"><v>{}</v></c>"#, strings.len() - 1)
                    }
                    Cell::Text(value) => format!(r#"<c r="{reference}" t="inlineStr"><is><t>{}</t></is></c>"#, escape(value)),
                    Cell::Number(value) => format!(r#"<c r="{reference}"><v>{value}</v></c>"#),
                    Cell::Bool(value) => format!(r#"<c r="{reference}" t="b"><v>{}</v></c>"#, u8::from(*value)),
                    Cell::Date(serial) => format!(r#"<c r="{reference}" s="1"><v>{serial}</v></c>"#),
                    Cell::Error(value) => format!(r#"<c r="{reference}" t="e"><v>{}</v></c>"#, escape(value)),
                };
                xml.push_str(&cell);
            }
            xml.push_str("</row>");
        }
        xml.push_str("</sheetData></worksheet>");
        xml
    }
}

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

/// Style 0 is General, style 1 the built-in short date format.
const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    r#"<cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>"#,
    r#"<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/></cellXfs>"#,
    r#"</styleSheet>"#,
);

fn shared_strings(strings: &[String]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        strings.len()
    );
    for string in strings {
        xml.push_str(&format!("<si><t>{}</t></si>", escape(string)));
    }
    xml.push_str("</sst>");
    xml
}

fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap()
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// The twelve sheets of the vaccine distribution workbook, two rows each where it matters.
pub fn vaccine_workbook() -> WorkbookBuilder {
    WorkbookBuilder::new()
        .sheet("VaccineType", vec![
            header(&["ID", "name", "doses", "tempMin", "tempMax"]),
            vec![text("V01"), text("Comirnaty"), number(2), number(-90), number(-60)],
            vec![text("V02"), text("Spikevax"), number(2), number(-25), number(-15)],
        ])
        .sheet("Manufacturer", vec![
            header(&["ID", "country", "phone", "vaccine"]),
            vec![text("M1"), text("Belgium"), text("+32 123 456"), text("V01")],
        ])
        .sheet("VaccinationStations", vec![
            header(&["name", "address", "phone"]),
            vec![text("Malmi Hospital"), text("Talvelantie 6"), text("+358 9 310 6611")],
        ])
        .sheet("StaffMembers", vec![
            header(&["social security number", "name", "date of birth", "phone", "role", "vaccination status", "hospital"]),
            vec![text("720828-123A"), text("Aino"), Cell::Date(26538), text("+358 40 1"), text("nurse"), number(1), text("Malmi Hospital")],
            vec![text("650101-987B"), text("Eero"), Cell::Date(23743), Cell::Empty, text("doctor"), number(0), text("Malmi Hospital")],
        ])
        .sheet("VaccineBatch", vec![
            header(&["batchID", "amount", "type", "manufacturer", "manufDate", "expiration", "location"]),
            vec![text("B1"), number(500), text("V01"), text("M1"), Cell::Date(44197), Cell::Date(44348), text("Malmi Hospital")],
        ])
        .sheet("Transportation log", vec![
            header(&["batchID", "arrival", "departure ", "dateArr", "dateDep"]),
            vec![text("B1"), text("Malmi Hospital"), text("Central Depot"), Cell::Date(44205), Cell::Date(44204)],
        ])
        .sheet("Shifts", vec![
            header(&["station", "weekday", "worker"]),
            vec![text("Malmi Hospital"), text("Monday"), text("720828-123A")],
        ])
        .sheet("Vaccinations", vec![
            header(&["date", "location ", "batchID"]),
            vec![Cell::Date(44207), text("Malmi Hospital"), text("B1")],
        ])
        .sheet("Patients", vec![
            header(&["ssNo", "name", "date of birth", "gender"]),
            vec![text("010190-111C"), text("Liisa"), Cell::Date(32874), text("F")],
        ])
        .sheet("VaccinePatients", vec![
            header(&["date", "location", "patientSsNo"]),
            vec![Cell::Date(44207), text("Malmi Hospital"), text("010190-111C")],
        ])
        .sheet("Symptoms", vec![
            header(&["name", "criticality"]),
            vec![text("fever"), number(1)],
            vec![text("headache"), number(0)],
        ])
        .sheet("Diagnosis", vec![
            header(&["patient", "symptom", "date"]),
            vec![text("010190-111C"), text("fever"), text("2021-02-30")],
            vec![text("010190-111C"), text("headache"), number(44256)],
            vec![text("010190-111C"), text("fever"), text("2021-12-00")],
            vec![text("010190-111C"), text("headache"), text("2021-05-15")],
        ])
}
