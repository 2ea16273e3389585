//! Daily source file path construction.

use chrono::NaiveDate;
use flowbeta_types::DATE_FORMAT;
use std::path::{Path, PathBuf};

/// Builds the path of a single day's file.
///
/// Path format: `{root}/{dir}/{YYYY-MM-DD}.{extension}`
///
/// # Example
///
/// ```
/// use flowbeta_load::path::daily_path;
/// use chrono::NaiveDate;
/// use std::path::Path;
///
/// let date = NaiveDate::from_ymd_opt(2020, 11, 15).unwrap();
/// let path = daily_path(Path::new("/data/BTCUSDT"), "quotes", date, "csv.gz");
/// assert_eq!(path, Path::new("/data/BTCUSDT/quotes/2020-11-15.csv.gz"));
/// ```
#[must_use]
pub fn daily_path(root: &Path, dir: &str, date: NaiveDate, extension: &str) -> PathBuf {
    let file_name = format!(
        "{}.{}",
        date.format(DATE_FORMAT),
        extension.trim_start_matches('.')
    );
    root.join(dir).join(file_name)
}
