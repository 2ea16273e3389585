//! Per-date tick sources.

use chrono::NaiveDate;
use flowbeta_types::{Quote, Trade};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use crate::decompress::load_file;
use crate::path::daily_path;
use crate::{LoadError, parse_quotes, parse_trades};

/// Location of the daily quote and trade files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Directory holding the quote and trade subdirectories.
    pub root: PathBuf,
    /// Subdirectory of quote files.
    pub quotes_dir: String,
    /// Subdirectory of trade files.
    pub trades_dir: String,
    /// File extension, without the leading dot.
    pub extension: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            quotes_dir: "quotes".to_string(),
            trades_dir: "trades".to_string(),
            extension: "csv.gz".to_string(),
        }
    }
}

impl SourceConfig {
    /// Creates a configuration rooted at `root` with default layout.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Sets the file extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Returns the quote file path for a date.
    #[must_use]
    pub fn quote_path(&self, date: NaiveDate) -> PathBuf {
        daily_path(&self.root, &self.quotes_dir, date, &self.extension)
    }

    /// Returns the trade file path for a date.
    #[must_use]
    pub fn trade_path(&self, date: NaiveDate) -> PathBuf {
        daily_path(&self.root, &self.trades_dir, date, &self.extension)
    }
}

/// Per-date access to quote and trade tables.
///
/// Implementations must return records in file (time) order and must fail
/// rather than return an empty table when a date's source is unavailable.
pub trait TickSource {
    /// Loads all quotes of a calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or malformed.
    fn quotes(&self, date: NaiveDate) -> Result<Vec<Quote>, LoadError>;

    /// Loads all trades of a calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or malformed.
    fn trades(&self, date: NaiveDate) -> Result<Vec<Trade>, LoadError>;
}

impl<S: TickSource + ?Sized> TickSource for &S {
    fn quotes(&self, date: NaiveDate) -> Result<Vec<Quote>, LoadError> {
        (**self).quotes(date)
    }

    fn trades(&self, date: NaiveDate) -> Result<Vec<Trade>, LoadError> {
        (**self).trades(date)
    }
}

/// Tick source reading one CSV (optionally gzipped) file per date and kind.
#[derive(Debug, Clone)]
pub struct FileTickSource {
    config: SourceConfig,
}

impl FileTickSource {
    /// Creates a file source with the given layout.
    #[must_use]
    pub const fn new(config: SourceConfig) -> Self {
        Self { config }
    }

    /// Returns the layout configuration.
    #[must_use]
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }
}

impl TickSource for FileTickSource {
    fn quotes(&self, date: NaiveDate) -> Result<Vec<Quote>, LoadError> {
        let path = self.config.quote_path(date);
        let quotes = load_file(&path, parse_quotes)?;
        debug!(%date, count = quotes.len(), path = %path.display(), "loaded quotes");
        Ok(quotes)
    }

    fn trades(&self, date: NaiveDate) -> Result<Vec<Trade>, LoadError> {
        let path = self.config.trade_path(date);
        let trades = load_file(&path, parse_trades)?;
        debug!(%date, count = trades.len(), path = %path.display(), "loaded trades");
        Ok(trades)
    }
}

/// In-memory tick source, keyed by date.
///
/// Dates without registered data fail with [`LoadError::NoData`], the same
/// way a missing file does for [`FileTickSource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryTickSource {
    days: BTreeMap<NaiveDate, (Vec<Quote>, Vec<Trade>)>,
}

impl MemoryTickSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the quotes and trades of a date, replacing earlier data.
    pub fn insert(&mut self, date: NaiveDate, quotes: Vec<Quote>, trades: Vec<Trade>) {
        self.days.insert(date, (quotes, trades));
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with_day(mut self, date: NaiveDate, quotes: Vec<Quote>, trades: Vec<Trade>) -> Self {
        self.insert(date, quotes, trades);
        self
    }

    /// Returns the registered dates in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }
}

impl TickSource for MemoryTickSource {
    fn quotes(&self, date: NaiveDate) -> Result<Vec<Quote>, LoadError> {
        self.days
            .get(&date)
            .map(|(quotes, _)| quotes.clone())
            .ok_or(LoadError::NoData(date))
    }

    fn trades(&self, date: NaiveDate) -> Result<Vec<Trade>, LoadError> {
        self.days
            .get(&date)
            .map(|(_, trades)| trades.clone())
            .ok_or(LoadError::NoData(date))
    }
}
