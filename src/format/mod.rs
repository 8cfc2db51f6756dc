//! Output formatting for result records (table, JSON, markdown, CSV).

use crate::config::OutputFormat;
use crate::ebay::ResultRecord;

/// Formats records for terminal output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats records in the order given.
    pub fn format_records(&self, records: &[ResultRecord]) -> String {
        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            };
        }

        match self.format {
            OutputFormat::Json => self.json_records(records),
            OutputFormat::Table => self.table_records(records),
            OutputFormat::Markdown => self.markdown_records(records),
            OutputFormat::Csv => self.csv_records(records),
        }
    }

    // JSON formatting

    fn json_records(&self, records: &[ResultRecord]) -> String {
        serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
    }

    // Table formatting

    fn table_records(&self, records: &[ResultRecord]) -> String {
        let site_width = 9;
        let price_width = 18;
        let title_width = 50;

        let mut lines = Vec::new();

        lines.push(format!(
            "{:<site_width$}  {:<price_width$}  {:<title_width$}  {}",
            "Site", "Price", "Title", "Link"
        ));
        lines.push(format!(
            "{:-<site_width$}  {:-<price_width$}  {:-<title_width$}  {:-<4}",
            "", "", "", ""
        ));

        for record in records {
            lines.push(format!(
                "{:<site_width$}  {:>price_width$}  {:<title_width$}  {}",
                record.site(),
                record.price,
                truncate(&record.name, title_width),
                record.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("Total: {} products", records.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_records(&self, records: &[ResultRecord]) -> String {
        let mut lines = Vec::new();

        lines.push("| Site | Price | Product |".to_string());
        lines.push("|------|-------|---------|".to_string());

        for record in records {
            lines.push(format!(
                "| {} | {} | [{}]({}) |",
                record.site(),
                record.price,
                truncate(&record.name, 40).replace('|', "\\|"),
                record.url
            ));
        }

        lines.push(String::new());
        lines.push(format!("*{} products found*", records.len()));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "name,price,site,region,url".to_string()
    }

    fn csv_records(&self, records: &[ResultRecord]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for record in records {
            lines.push(format!(
                "{},{},{},{},{}",
                csv_escape(&record.name),
                csv_escape(&record.price),
                csv_escape(&record.site()),
                record.region,
                csv_escape(&record.url)
            ));
        }

        lines.join("\n")
    }
}

/// Quotes a CSV field when it contains a delimiter, quote, or line break.
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Shortens `s` to at most `width` characters, marking the cut with "...".
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
