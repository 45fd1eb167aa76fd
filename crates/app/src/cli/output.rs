//! Command Output

use clap::ValueEnum;
use serde_json::{Map, Value};
use tabled::{builder::Builder, settings::Style};

/// How listings are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Rounded table for terminals.
    #[default]
    Table,

    /// Array of JSON objects keyed by column heading.
    Json,
}

/// Rows of text cells under fixed column headings.
#[derive(Debug)]
pub(crate) struct Listing {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Listing {
    pub(crate) fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn render(&self, format: OutputFormat) -> Result<String, String> {
        match format {
            OutputFormat::Table => Ok(self.table()),
            OutputFormat::Json => self.json(),
        }
    }

    fn table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(self.headers.iter().map(ToString::to_string));

        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }

        let mut table = builder.build();
        table.with(Style::modern_rounded());

        table.to_string()
    }

    fn json(&self) -> Result<String, String> {
        let objects: Vec<Value> = self
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| ((*header).to_string(), Value::String(cell.clone())))
                    .collect();

                Value::Object(object)
            })
            .collect();

        serde_json::to_string_pretty(&objects)
            .map_err(|error| format!("failed to encode listing: {error}"))
    }
}

/// Per-record outcome of a command applied to several records.
///
/// Every record is attempted; the command fails afterwards if any did.
#[derive(Debug)]
pub(crate) struct BulkReport {
    noun: &'static str,
    listing: Listing,
    failures: usize,
}

impl BulkReport {
    pub(crate) fn new(noun: &'static str) -> Self {
        Self {
            noun,
            listing: Listing::new(&[noun, "status", "result"]),
            failures: 0,
        }
    }

    pub(crate) fn succeeded(&mut self, key: String, status: &str) {
        self.listing
            .push(vec![key, status.to_string(), "ok".to_string()]);
    }

    pub(crate) fn failed(&mut self, key: String, error: String) {
        self.failures += 1;
        self.listing.push(vec![key, "-".to_string(), error]);
    }

    fn outcome(&self) -> Result<(), String> {
        match self.failures {
            0 => Ok(()),
            failures => Err(format!(
                "{failures} of {} {}s could not be updated",
                self.listing.len(),
                self.noun
            )),
        }
    }

    pub(crate) fn finish(self, format: OutputFormat) -> Result<(), String> {
        println!("{}", self.listing.render(format)?);

        self.outcome()
    }
}

/// Cell text for an optional value.
pub(crate) fn cell<T: ToString>(value: Option<T>, missing: &str) -> String {
    value.map_or_else(|| missing.to_string(), |value| value.to_string())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn listing() -> Listing {
        let mut listing = Listing::new(&["order", "status"]);

        listing.push(vec!["RP-0001".to_string(), "pending".to_string()]);
        listing.push(vec!["RP-0002".to_string(), "shipped".to_string()]);

        listing
    }

    #[test]
    fn json_rows_are_keyed_by_heading() -> TestResult {
        let rendered = listing().render(OutputFormat::Json)?;
        let value: Value = serde_json::from_str(&rendered)?;

        assert_eq!(value[1]["order"], "RP-0002");
        assert_eq!(value[0]["status"], "pending");

        Ok(())
    }

    #[test]
    fn table_contains_every_cell() -> TestResult {
        let rendered = listing().render(OutputFormat::Table)?;

        for text in ["order", "status", "RP-0001", "shipped"] {
            assert!(rendered.contains(text), "missing {text} in {rendered}");
        }

        Ok(())
    }

    #[test]
    fn bulk_report_lists_every_record_and_fails_if_any_did() -> TestResult {
        let mut report = BulkReport::new("order");

        report.succeeded("RP-0001".to_string(), "Shipped");
        report.failed("RP-0002".to_string(), "illegal transition".to_string());
        report.succeeded("RP-0003".to_string(), "Shipped");

        let rendered = report.listing.render(OutputFormat::Json)?;
        let value: Value = serde_json::from_str(&rendered)?;

        assert_eq!(value[1]["order"], "RP-0002");
        assert_eq!(value[1]["result"], "illegal transition");
        assert_eq!(value[2]["result"], "ok");
        assert_eq!(
            report.outcome(),
            Err("1 of 3 orders could not be updated".to_string())
        );

        Ok(())
    }

    #[test]
    fn bulk_report_without_failures_succeeds() {
        let mut report = BulkReport::new("ticket");

        report.succeeded("TKT-20261019-0A1B2C".to_string(), "Closed");

        assert_eq!(report.outcome(), Ok(()));
    }

    #[test]
    fn missing_cells_use_placeholder() {
        assert_eq!(cell(None::<u64>, "never"), "never");
        assert_eq!(cell(Some(3), "never"), "3");
    }
}
