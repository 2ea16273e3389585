//! Cross-module properties of multi-day signal assembly.

use chrono::{NaiveDate, TimeDelta};
use flowbeta_load::MemoryTickSource;
use flowbeta_signal::{SignalParams, assemble_signals, resample};
use flowbeta_types::{DateRange, Quote, Side, Trade};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 11, d).unwrap()
}

fn synthetic_day(date: NaiveDate, seed: u32) -> (Vec<Quote>, Vec<Trade>) {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let mut quotes = Vec::new();
    let mut trades = Vec::new();

    for i in 0..200_u32 {
        let ts = midnight + TimeDelta::milliseconds(i64::from(i * 750 + seed * 13));
        let wobble = f64::from((i * 7 + seed) % 5) * 0.01;
        let bid = 100.0 + wobble;
        quotes.push(Quote::new(ts, f64::from(i % 3 + 1), bid + 0.02, bid, f64::from(i % 4 + 1)));

        if i % 4 == 0 {
            let side = if (i + seed) % 3 == 0 { Side::Sell } else { Side::Buy };
            trades.push(Trade::new(ts, u64::from(i), side, bid, 0.1 * f64::from(i % 5 + 1)));
        }
    }

    (quotes, trades)
}

fn source(days: &[u32]) -> MemoryTickSource {
    let mut source = MemoryTickSource::new();
    for &d in days {
        let (quotes, trades) = synthetic_day(day(d), d);
        source.insert(day(d), quotes, trades);
    }
    source
}

#[test]
fn test_assembly_is_associative() {
    let source = source(&[10, 11, 12, 14, 15]);
    let params = SignalParams::default();

    let mut split = assemble_signals(&source, DateRange::new(day(10), day(12)).unwrap(), params);
    split.extend(assemble_signals(
        &source,
        DateRange::new(day(13), day(15)).unwrap(),
        params,
    ));
    let whole = assemble_signals(&source, DateRange::new(day(10), day(15)).unwrap(), params);

    assert!(!whole.is_empty());
    assert_eq!(split, whole);
}

#[test]
fn test_assembly_preserves_date_order() {
    let source = source(&[10, 11, 12]);
    let rows = assemble_signals(
        &source,
        DateRange::new(day(10), day(12)).unwrap(),
        SignalParams::default(),
    );
    assert!(rows.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn test_pure_buy_pressure() {
    let midnight = day(15).and_hms_opt(0, 0, 0).unwrap().and_utc();
    let quotes: Vec<Quote> = (0..20_i64)
        .map(|i| {
            let bid = 100.0 + 0.01 * i as f64;
            Quote::new(midnight + TimeDelta::seconds(i), 5.0, 101.0, bid, 2.0 + i as f64)
        })
        .collect();

    let rows = resample(&quotes, &[], &SignalParams::default());
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert!(row.ofi > 0.0, "bucket {} has OFI {}", row.timestamp, row.ofi);
    }

    // Every contribution comes from the bid side: the sum of new bid sizes.
    let bid_total: f64 = (1..20).map(|i| 2.0 + f64::from(i)).sum();
    let ofi_total: f64 = rows.iter().map(|r| r.ofi).sum();
    assert!((ofi_total - bid_total).abs() < 1e-9);
}
