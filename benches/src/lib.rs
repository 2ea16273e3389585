//! Synthetic market data for flowbeta benchmarks.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use flowbeta_lib::{Quote, Side, SignalRow, Trade};

/// Deterministic xorshift generator so every run sees the same data.
#[derive(Debug, Clone)]
pub struct Xorshift(u64);

impl Xorshift {
    /// Creates a generator; a zero seed is replaced by a fixed constant.
    pub const fn new(seed: u64) -> Self {
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    /// Next raw value.
    pub const fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
    }

    /// Step of -1, 0 or +1.
    pub fn step(&mut self) -> i64 {
        (self.next_u64() % 3) as i64 - 1
    }
}

/// Midnight UTC of `date`.
fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Quotes spread evenly over `date`, with a random-walk inside spread of
/// one or two ticks.
pub fn synthetic_quotes(date: NaiveDate, count: usize, seed: u64) -> Vec<Quote> {
    let mut rng = Xorshift::new(seed);
    let spacing = TimeDelta::milliseconds(86_400_000 / count.max(1) as i64);
    let start = midnight(date);
    let mut bid_ticks: i64 = 1_500_000;

    (0..count)
        .map(|i| {
            bid_ticks += rng.step();
            let spread = 1 + (rng.next_u64() % 2) as i64;
            let bid = bid_ticks as f64 * 0.01;
            let ask = (bid_ticks + spread) as f64 * 0.01;
            let ts = start + spacing * i as i32;
            Quote::new(ts, 0.1 + rng.next_f64() * 5.0, ask, bid, 0.1 + rng.next_f64() * 5.0)
        })
        .collect()
}

/// Trades spread evenly over `date` with random sides.
pub fn synthetic_trades(date: NaiveDate, count: usize, seed: u64) -> Vec<Trade> {
    let mut rng = Xorshift::new(seed);
    let spacing = TimeDelta::milliseconds(86_400_000 / count.max(1) as i64);
    let start = midnight(date);

    (0..count)
        .map(|i| {
            let side = if rng.next_u64() % 2 == 0 { Side::Buy } else { Side::Sell };
            let ts = start + spacing * i as i32;
            Trade::new(ts, i as u64, side, 15_000.0, rng.next_f64() * 2.0)
        })
        .collect()
}

/// Ten-second signal rows over `days` days where price change loads on OFI
/// with a slope that drifts through the day.
pub fn synthetic_signals(start: NaiveDate, days: u32, seed: u64) -> Vec<SignalRow> {
    let mut rng = Xorshift::new(seed);
    let origin = midnight(start);
    let rows = days as i64 * 8_640;

    (0..rows)
        .map(|i| {
            let ofi = (rng.next_f64() - 0.5) * 40.0;
            let tfi = (rng.next_f64() - 0.5) * 4.0;
            let slope = 0.05 + 0.02 * ((i % 8_640) as f64 / 8_640.0);
            let noise = (rng.next_f64() - 0.5) * 0.5;
            SignalRow::new(origin + TimeDelta::seconds(10 * i), slope * ofi + noise, ofi, tfi)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 11, 15).unwrap()
    }

    #[test]
    fn test_quotes_stay_in_day() {
        let quotes = synthetic_quotes(day(), 1_000, 7);
        assert_eq!(quotes.len(), 1_000);
        assert!(quotes.iter().all(|q| q.timestamp.date_naive() == day()));
        assert!(quotes.iter().all(|q| q.ask_price > q.bid_price));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(synthetic_trades(day(), 50, 3), synthetic_trades(day(), 50, 3));
    }

    #[test]
    fn test_signals_cover_days() {
        let rows = synthetic_signals(day(), 2, 1);
        assert_eq!(rows.len(), 2 * 8_640);
        assert_eq!(rows.last().unwrap().timestamp.date_naive(), day().succ_opt().unwrap());
    }
}
