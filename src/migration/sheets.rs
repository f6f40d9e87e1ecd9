use crate::database::target::WriteMode;

/// How one workbook sheet maps onto its destination table.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SheetSpec {
    /// Sheet name in the workbook
    pub sheet: &'static str,
    /// Destination table
    pub table: &'static str,
    /// Workbook header → destination column, applied only to headers present
    pub renames: &'static [(&'static str, &'static str)],
    /// Column (after renames) coerced to a tri-state boolean
    pub boolean_column: Option<&'static str>,
    /// Column (before renames) passed through date repair
    pub date_repair_column: Option<&'static str>,
    pub mode: WriteMode,
}

impl SheetSpec {
    const fn append(sheet: &'static str, table: &'static str, renames: &'static [(&'static str, &'static str)]) -> Self {
        SheetSpec {
            sheet,
            table,
            renames,
            boolean_column: None,
            date_repair_column: None,
            mode: WriteMode::Append,
        }
    }
}

/// Every sheet of the vaccine distribution workbook, in load order.
pub const VACCINE_SHEETS: &[SheetSpec] = &[
    SheetSpec::append("VaccineType", "vaccinetype", &[("ID", "id"), ("tempMin", "tempmin"), ("tempMax", "tempmax")]),
    SheetSpec::append("Manufacturer", "manufacturer", &[("ID", "id"), ("vaccine", "vaccineid")]),
    SheetSpec::append("VaccinationStations", "vaccinationstations", &[]),
    SheetSpec {
        boolean_column: Some("vaccinationstatus"),
        ..SheetSpec::append("StaffMembers", "staffmembers", &[
            ("social security number", "ssno"),
            ("date of birth", "dateofbirth"),
            ("vaccination status", "vaccinationstatus"),
        ])
    },
    SheetSpec::append("VaccineBatch", "vaccinebatch", &[
        ("batchID", "batchid"),
        ("amount", "numvaccines"),
        ("type", "vaccineid"),
        ("manufDate", "dateproduced"),
        ("expiration", "expirationdate"),
    ]),
    SheetSpec::append("Transportation log", "transportationlog", &[
        ("batchID", "batchid"),
        ("arrival", "arrivaldestination"),
        ("departure", "departuredestination"),
        ("dateArr", "arrivaldate"),
        ("dateDep", "departuredate"),
    ]),
    SheetSpec::append("Shifts", "shifts", &[]),
    SheetSpec::append("Vaccinations", "vaccinations", &[("date", "vaccinationdate"), ("batchID", "batchid"), ("location", "location")]),
    SheetSpec::append("Patients", "patients", &[("ssNo", "ssno"), ("date of birth", "dateofbirth")]),
    SheetSpec::append("VaccinePatients", "vaccinepatients", &[("date", "vaccinationdate"), ("patientSsNo", "patientssno")]),
    SheetSpec {
        boolean_column: Some("criticality"),
        ..SheetSpec::append("Symptoms", "symptoms", &[])
    },
    SheetSpec {
        date_repair_column: Some("date"),
        mode: WriteMode::Replace,
        ..SheetSpec::append("Diagnosis", "diagnosis", &[("date", "reportdate")])
    },
];

/// Looks up a sheet specification by workbook sheet name.
pub fn sheet_spec(sheet: &str) -> Option<&'static SheetSpec> {
    VACCINE_SHEETS.iter().find(|spec| spec.sheet == sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_sheet_has_its_own_table() {
        let tables: HashSet<_> = VACCINE_SHEETS.iter().map(|spec| spec.table).collect();
        assert_eq!(VACCINE_SHEETS.len(), 12);
        assert_eq!(tables.len(), VACCINE_SHEETS.len());
    }

    #[test]
    fn only_diagnosis_is_replaced() {
        let replaced: Vec<_> = VACCINE_SHEETS
            .iter()
            .filter(|spec| spec.mode == WriteMode::Replace)
            .map(|spec| spec.sheet)
            .collect();
        assert_eq!(replaced, vec!["Diagnosis"]);
        assert_eq!(sheet_spec("Diagnosis").unwrap().date_repair_column, Some("date"));
    }

    #[test]
    fn boolean_columns_use_destination_names() {
        assert_eq!(sheet_spec("StaffMembers").unwrap().boolean_column, Some("vaccinationstatus"));
        assert_eq!(sheet_spec("Symptoms").unwrap().boolean_column, Some("criticality"));
        assert!(sheet_spec("Diagnoses").is_none());
    }
}
