//! Runs a schema script of `;`-terminated SQL statements against a [`Target`].

use crate::database::target::Target;
use crate::error::LoaderError;
use crate::error::ResultMessage;
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

const COMMENT_MARKER: &str = "--";

#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Statement failed: {message}\n{statement}")]
    StatementFailed { statement: String, message: String },
}

/// What the runner does when a statement fails.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StatementErrorPolicy {
    /// Log the failed statement and keep going; the run still succeeds
    #[default]
    Continue,
    /// Stop at the first failed statement and return it as an error
    Propagate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatementFailure {
    pub statement: String,
    pub message: String,
}

/// Outcome of one script run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Statements that executed successfully
    pub executed: usize,
    /// Statements that failed under [`StatementErrorPolicy::Continue`]
    pub failures: Vec<StatementFailure>,
    /// Trailing text with no terminating `;`, never executed
    pub unterminated: Option<String>,
}

impl ScriptReport {
    pub fn attempted(&self) -> usize {
        self.executed + self.failures.len()
    }
}

/// Splits a line source into statements.
///
/// Lines starting with `--` and blank lines are skipped; every other line is appended
/// to a pending buffer, and the buffer is emitted as soon as it ends with `;`.
pub struct StatementReader<R: BufRead> {
    lines: std::io::Lines<R>,
    buffer: String,
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(source: R) -> Self {
        StatementReader {
            lines: source.lines(),
            buffer: String::new(),
        }
    }

    /// Text accumulated after the last complete statement.
    pub fn remainder(&self) -> Option<&str> {
        let remainder = self.buffer.trim();
        (!remainder.is_empty()).then_some(remainder)
    }
}

impl<R: BufRead> Iterator for StatementReader<R> {
    type Item = Result<String, LoaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            let line = match line {
                Ok(line) => line,
                Err(error) => return Some(Err(error.into())),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                continue;
            }
            self.buffer.push(' ');
            self.buffer.push_str(line.trim_end());
            if self.buffer.ends_with(';') {
                let statement = self.buffer.trim_start().to_owned();
                self.buffer.clear();
                return Some(Ok(statement));
            }
        }
        None
    }
}

/// Executes every complete statement from `source` in order.
pub fn run_sql_script<R, T>(source: R, target: &mut T, policy: StatementErrorPolicy) -> Result<ScriptReport, LoaderError>
where
    R: BufRead,
    T: Target + ?Sized,
{
    let mut report = ScriptReport::default();
    let mut statements = StatementReader::new(source);
    for statement in statements.by_ref() {
        let statement = statement?;
        match target.execute(&statement) {
            Ok(()) => report.executed += 1,
            Err(error) if policy == StatementErrorPolicy::Continue => {
                tracing::error!(%statement, %error, "Statement failed, continuing");
                report.failures.push(StatementFailure {
                    statement,
                    message: error.to_string(),
                });
            }
            Err(error) => Err(ScriptError::StatementFailed {
                statement,
                message: error.to_string(),
            })?,
        }
    }

    if let Some(remainder) = statements.remainder() {
        tracing::warn!(remainder, "Ignoring text after the last ';'");
        report.unterminated = Some(remainder.to_owned());
    }
    tracing::info!(executed = report.executed, failed = report.failures.len(), "Schema script finished");
    Ok(report)
}

/// Opens a script file and runs it with [`run_sql_script`].
pub fn run_sql_from_file<P, T>(path: P, target: &mut T, policy: StatementErrorPolicy) -> Result<ScriptReport, LoaderError>
where
    P: AsRef<Path>,
    T: Target + ?Sized,
{
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(LoaderError::from)
        .with_prefix(&format!("Open SQL script '{}'", path.display()))?;
    tracing::info!(script = %path.display(), "Running schema script");
    run_sql_script(BufReader::new(file), target, policy)
}
