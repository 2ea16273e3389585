//! CSV parsing of daily quote and trade files.

use flowbeta_types::{Quote, Side, Trade, micros_to_datetime};
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

/// Errors that can occur during record parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The CSV layer rejected a record.
    #[error("CSV error at record {record}: {message}")]
    Csv {
        /// 1-based record number (header excluded).
        record: u64,
        /// Description from the CSV reader.
        message: String,
    },

    /// A microsecond timestamp is out of the representable range.
    #[error("Invalid timestamp {value} at record {record}")]
    InvalidTimestamp {
        /// 1-based record number.
        record: u64,
        /// Raw timestamp value.
        value: i64,
    },

    /// A textual timestamp could not be parsed.
    #[error("Invalid timestamp '{value}' at record {record}")]
    InvalidTimestampText {
        /// 1-based record number.
        record: u64,
        /// Raw timestamp text.
        value: String,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid value '{value}' in column {column} at record {record}")]
    InvalidValue {
        /// 1-based record number.
        record: u64,
        /// Column name.
        column: String,
        /// Raw field text.
        value: String,
    },

    /// A required column is absent from the header.
    #[error("Missing column: {0}")]
    MissingColumn(String),
}

impl ParseError {
    pub(crate) fn csv(record: u64, err: &csv::Error) -> Self {
        Self::Csv {
            record,
            message: err.to_string(),
        }
    }
}

/// Quote record as stored on disk, timestamps still in microseconds.
#[derive(Debug, Deserialize)]
struct RawQuote {
    exchange: String,
    symbol: String,
    timestamp: i64,
    local_timestamp: i64,
    ask_amount: f64,
    ask_price: f64,
    bid_price: f64,
    bid_amount: f64,
}

impl RawQuote {
    fn normalize(self, record: u64) -> Result<Quote, ParseError> {
        Ok(Quote {
            exchange: self.exchange,
            symbol: self.symbol,
            timestamp: to_datetime(self.timestamp, record)?,
            local_timestamp: to_datetime(self.local_timestamp, record)?,
            ask_amount: self.ask_amount,
            ask_price: self.ask_price,
            bid_price: self.bid_price,
            bid_amount: self.bid_amount,
        })
    }
}

/// Trade record as stored on disk.
#[derive(Debug, Deserialize)]
struct RawTrade {
    exchange: String,
    symbol: String,
    timestamp: i64,
    local_timestamp: i64,
    id: u64,
    side: String,
    price: f64,
    amount: f64,
}

impl RawTrade {
    fn normalize(self, record: u64) -> Result<Trade, ParseError> {
        // Anything that is not an explicit buy counts against the book.
        let side = if self.side.parse::<Side>() == Ok(Side::Buy) {
            Side::Buy
        } else {
            Side::Sell
        };

        Ok(Trade {
            exchange: self.exchange,
            symbol: self.symbol,
            timestamp: to_datetime(self.timestamp, record)?,
            local_timestamp: to_datetime(self.local_timestamp, record)?,
            id: self.id,
            side,
            price: self.price,
            amount: self.amount,
        })
    }
}

fn to_datetime(
    micros: i64,
    record: u64,
) -> Result<chrono::DateTime<chrono::Utc>, ParseError> {
    micros_to_datetime(micros).ok_or(ParseError::InvalidTimestamp {
        record,
        value: micros,
    })
}

/// Parses quote records from CSV with columns `exchange, symbol, timestamp,
/// local_timestamp, ask_amount, ask_price, bid_price, bid_amount`.
///
/// Columns are matched by header name. Records keep their file order.
///
/// # Errors
///
/// Returns an error on the first malformed record.
pub fn parse_quotes<R: Read>(reader: R) -> Result<Vec<Quote>, ParseError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut quotes = Vec::new();

    for (i, result) in csv.deserialize::<RawQuote>().enumerate() {
        let record = i as u64 + 1;
        let raw = result.map_err(|e| ParseError::csv(record, &e))?;
        quotes.push(raw.normalize(record)?);
    }

    Ok(quotes)
}

/// Parses trade records from CSV with columns `exchange, symbol, timestamp,
/// local_timestamp, id, side, price, amount`.
///
/// # Errors
///
/// Returns an error on the first malformed record.
pub fn parse_trades<R: Read>(reader: R) -> Result<Vec<Trade>, ParseError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut trades = Vec::new();

    for (i, result) in csv.deserialize::<RawTrade>().enumerate() {
        let record = i as u64 + 1;
        let raw = result.map_err(|e| ParseError::csv(record, &e))?;
        trades.push(raw.normalize(record)?);
    }

    Ok(trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    const QUOTES: &str = "\
exchange,symbol,timestamp,local_timestamp,ask_amount,ask_price,bid_price,bid_amount
binance-futures,BTCUSDT,1605398400000123,1605398400001000,1.5,16000.5,16000.0,2.25
binance-futures,BTCUSDT,1605398401000000,1605398401000500,0.5,16000.6,16000.1,3.0
";

    const TRADES: &str = "\
exchange,symbol,timestamp,local_timestamp,id,side,price,amount
binance-futures,BTCUSDT,1605398400500000,1605398400501000,101,buy,16000.5,0.1
binance-futures,BTCUSDT,1605398400600000,1605398400601000,102,sell,16000.0,0.3
binance-futures,BTCUSDT,1605398400700000,1605398400701000,103,unknown,16000.0,0.2
";

    #[test]
    fn test_parse_quotes() {
        let quotes = parse_quotes(QUOTES.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);

        let first = &quotes[0];
        assert_eq!(first.symbol, "BTCUSDT");
        assert_eq!(
            first.timestamp,
            Utc.with_ymd_and_hms(2020, 11, 15, 0, 0, 0).unwrap()
                + chrono::TimeDelta::microseconds(123)
        );
        assert_relative_eq!(first.ask_price, 16000.5);
        assert_relative_eq!(first.bid_amount, 2.25);
    }

    #[test]
    fn test_parse_trades_sides() {
        let trades = parse_trades(TRADES.as_bytes()).unwrap();
        assert_eq!(trades.len(), 3);
        assert_eq!(trades[0].side, Side::Buy);
        assert_eq!(trades[1].side, Side::Sell);
        assert_eq!(trades[2].side, Side::Sell);
        assert_eq!(trades[0].id, 101);
    }

    #[test]
    fn test_malformed_quote_reports_record() {
        let data = "\
exchange,symbol,timestamp,local_timestamp,ask_amount,ask_price,bid_price,bid_amount
x,BTCUSDT,1605398400000000,1605398400000000,1.0,1.0,1.0,1.0
x,BTCUSDT,not-a-number,1605398400000000,1.0,1.0,1.0,1.0
";
        let result = parse_quotes(data.as_bytes());
        assert!(matches!(result, Err(ParseError::Csv { record: 2, .. })));
    }

    #[test]
    fn test_empty_file() {
        let header = "exchange,symbol,timestamp,local_timestamp,ask_amount,ask_price,bid_price,bid_amount\n";
        assert!(parse_quotes(header.as_bytes()).unwrap().is_empty());
    }
}
