//! Formats search outcomes for the terminal or as JSON lines

mod table;

pub use table::TextTable;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use tracing::warn;

use crate::models::{ResultRow, SearchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// A price sorted table per shop
    #[default]
    Table,
    /// One JSON object per shop per line
    Json,
}

/// One shop's section of a JSON report
#[derive(Debug, Serialize)]
pub struct ShopReport<'a> {
    pub shop: &'a str,
    pub term: &'a str,
    pub searched_at: DateTime<Utc>,
    pub status: &'static str,
    pub rows: Vec<&'a ResultRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
}

/// Renders one report section per shop
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultPresenter {
    format: OutputFormat,
}

impl ResultPresenter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, shop_name: &str, term: &str, outcome: &SearchOutcome) -> String {
        match self.format {
            OutputFormat::Table => render_text(shop_name, term, outcome),
            OutputFormat::Json => render_json(shop_name, term, outcome),
        }
    }
}

/// Rows ordered by price, cheapest first. Equal prices keep page order.
pub fn sorted_rows(rows: &[ResultRow]) -> Vec<&ResultRow> {
    let mut sorted: Vec<&ResultRow> = rows.iter().collect();
    sorted.sort_by(|a, b| a.price_numeric.total_cmp(&b.price_numeric));
    sorted
}

fn render_text(shop_name: &str, term: &str, outcome: &SearchOutcome) -> String {
    let body = match outcome {
        SearchOutcome::Results(rows) => {
            let mut table = TextTable::new(["Item", "Price"]);
            for row in sorted_rows(rows) {
                table.add_row([row.title.as_str(), row.price_raw.as_str()]);
            }
            table.render()
        }
        SearchOutcome::NoResults => format!("No results found for {term}"),
        SearchOutcome::ExtractionFailed { reason } => {
            warn!("{}: extraction failed: {}", shop_name, reason);
            format!("Could not find product for {term}")
        }
        SearchOutcome::DriverFailed { message } => message.clone(),
    };

    format!("\n{}\n{body}", shop_name.to_uppercase())
}

fn render_json(shop_name: &str, term: &str, outcome: &SearchOutcome) -> String {
    let (status, rows, message) = match outcome {
        SearchOutcome::Results(rows) => ("results", sorted_rows(rows), None),
        SearchOutcome::NoResults => ("no_results", Vec::new(), None),
        SearchOutcome::ExtractionFailed { reason } => {
            warn!("{}: extraction failed: {}", shop_name, reason);
            ("extraction_failed", Vec::new(), Some(reason.as_str()))
        }
        SearchOutcome::DriverFailed { message } => {
            ("driver_failed", Vec::new(), Some(message.as_str()))
        }
    };

    let report = ShopReport {
        shop: shop_name,
        term,
        searched_at: Utc::now(),
        status,
        rows,
        message,
    };

    serde_json::to_string(&report).unwrap_or_else(|e| {
        warn!("{}: could not serialize report: {}", shop_name, e);
        format!(r#"{{"shop":{shop_name:?},"status":"error"}}"#)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, price_raw: &str, price_numeric: f64) -> ResultRow {
        ResultRow {
            title: title.to_string(),
            price_raw: price_raw.to_string(),
            price_numeric,
        }
    }

    #[test]
    fn sort_is_stable_and_ascending() {
        let rows = vec![
            row("Butter 250g", "£1.99", 1.99),
            row("Eggs 6 pack", "65p", 0.65),
            row("Bread 800g", "£1.99", 1.99),
        ];

        let titles: Vec<&str> = sorted_rows(&rows)
            .into_iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["Eggs 6 pack", "Butter 250g", "Bread 800g"]);
    }

    #[test]
    fn table_lists_cheapest_first_under_shop_header() {
        let outcome = SearchOutcome::Results(vec![
            row("Butter 250g", "£1.99", 1.99),
            row("Eggs 6 pack", "65p", 0.65),
        ]);

        let text = ResultPresenter::new(OutputFormat::Table).render("Tesco", "eggs", &outcome);

        assert!(text.starts_with("\nTESCO\n+"));
        let eggs = text.find("Eggs 6 pack").unwrap();
        let butter = text.find("Butter 250g").unwrap();
        assert!(eggs < butter);
        assert!(text.contains("| 65p   |"));
    }

    #[test]
    fn notices_for_non_results() {
        let presenter = ResultPresenter::default();

        let text = presenter.render("Aldi", "kale", &SearchOutcome::NoResults);
        assert_eq!(text, "\nALDI\nNo results found for kale");

        let text = presenter.render(
            "Aldi",
            "kale",
            &SearchOutcome::ExtractionFailed {
                reason: "timeout waiting for page".to_string(),
            },
        );
        assert_eq!(text, "\nALDI\nCould not find product for kale");

        let text = presenter.render(
            "Aldi",
            "kale",
            &SearchOutcome::DriverFailed {
                message: "browser session error: chrome not reachable".to_string(),
            },
        );
        assert_eq!(text, "\nALDI\nbrowser session error: chrome not reachable");
    }

    #[test]
    fn json_line_carries_sorted_rows() {
        let outcome = SearchOutcome::Results(vec![
            row("Butter 250g", "£1.99", 1.99),
            row("Eggs 6 pack", "65p", 0.65),
        ]);

        let line = ResultPresenter::new(OutputFormat::Json).render("Asda", "eggs", &outcome);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["shop"], "Asda");
        assert_eq!(value["status"], "results");
        assert_eq!(value["rows"][0]["price_raw"], "65p");
        assert_eq!(value["rows"][1]["price_numeric"], 1.99);
        assert!(value.get("message").is_none());
    }

    #[test]
    fn json_line_reports_failure_message() {
        let outcome = SearchOutcome::DriverFailed {
            message: "failed to load https://x.test: timeout".to_string(),
        };

        let line = ResultPresenter::new(OutputFormat::Json).render("Asda", "eggs", &outcome);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["status"], "driver_failed");
        assert_eq!(value["rows"].as_array().unwrap().len(), 0);
        assert_eq!(value["message"], "failed to load https://x.test: timeout");
    }
}
