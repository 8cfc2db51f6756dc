//! Spreadsheet report export.
//!
//! Reports are CSV files with a UTF-8 byte order mark so spreadsheet
//! applications pick the right encoding for currency symbols. The link
//! column holds a `HYPERLINK` formula that renders as a clickable cell.

use crate::ebay::ResultRecord;
use crate::format::csv_escape;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

const HEADER: &str = "Product Name,Price,Site,Link";
const BOM: &str = "\u{feff}";
const FILE_SUFFIX: &str = "price_comparison";

/// Writes records to a report file.
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Creates a writer placing default-named reports in `output_dir` (or the current directory).
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir: output_dir.unwrap_or_else(|| PathBuf::from(".")) }
    }

    /// Writes the report and returns the path actually written.
    ///
    /// Without an explicit `output`, the file is named after the query and the
    /// current time. If the target is locked (permission denied, typically
    /// because it is open in a spreadsheet), a `_new` sibling is written instead.
    pub fn write(
        &self,
        records: &[ResultRecord],
        query: &str,
        output: Option<&Path>,
    ) -> Result<PathBuf> {
        let path = match output {
            Some(path) => path.to_path_buf(),
            None => self.output_dir.join(default_file_name(query, Local::now())),
        };

        let contents = render(records);

        let written = match std::fs::write(&path, &contents) {
            Ok(()) => path,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                let fallback = fallback_path(&path);
                warn!(
                    "Report file {} is locked, saving as: {}",
                    path.display(),
                    fallback.display()
                );
                std::fs::write(&fallback, &contents)
                    .with_context(|| format!("Failed to write report: {}", fallback.display()))?;
                fallback
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to write report: {}", path.display()));
            }
        };

        info!("Saved {} products to {}", records.len(), written.display());
        Ok(written)
    }
}

/// Renders the report contents.
pub fn render(records: &[ResultRecord]) -> String {
    let mut out = String::from(BOM);
    out.push_str(HEADER);
    out.push_str("\r\n");

    for record in records {
        let link = format!("=HYPERLINK(\"{}\",\"View Product\")", record.url.replace('"', "%22"));
        out.push_str(&format!(
            "{},{},{},{}\r\n",
            csv_escape(&defuse_formula(&record.name)),
            csv_escape(&defuse_formula(&record.price)),
            csv_escape(&record.site()),
            csv_escape(&link)
        ));
    }

    out
}

/// Builds `<query>_<YYYYmmdd_HHMMSS>_price_comparison.csv`.
pub fn default_file_name(query: &str, now: DateTime<Local>) -> String {
    let stem: String = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();

    format!("{}_{}_{}.csv", stem, now.format("%Y%m%d_%H%M%S"), FILE_SUFFIX)
}

/// `report.csv` -> `report_new.csv`.
fn fallback_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_new.{}", stem, ext.to_string_lossy()),
        None => format!("{}_new", stem),
    };
    path.with_file_name(name)
}

/// Scraped text starting with a formula trigger is prefixed so it stays text.
fn defuse_formula(value: &str) -> String {
    if value.starts_with(['=', '+', '-', '@']) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

/// Opens a file with the platform's default application.
pub fn open(path: &Path) -> Result<()> {
    let mut command = opener()
        .with_context(|| format!("No file opener on this platform for: {}", path.display()))?;

    let status = command
        .arg(path)
        .status()
        .with_context(|| format!("Failed to open report: {}", path.display()))?;

    if !status.success() {
        bail!("Failed to open report: {} ({})", path.display(), status);
    }

    Ok(())
}

/// Launcher command for the current platform, if there is one.
fn opener() -> Option<Command> {
    #[cfg(target_os = "windows")]
    {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]);
        Some(command)
    }

    #[cfg(target_os = "macos")]
    {
        Some(Command::new("open"))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Some(Command::new("xdg-open"))
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    {
        None
    }
}
