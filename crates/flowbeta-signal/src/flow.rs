//! Event-level signals derived from quotes and trades.

use flowbeta_types::{Quote, Trade};

/// Default tick size used to normalize mid prices.
pub const TICK_SIZE_DEFAULT: f64 = 0.01;

/// Returns the tick-normalized mid price of every quote.
#[must_use]
pub fn mid_prices(quotes: &[Quote], tick_size: f64) -> Vec<f64> {
    quotes.iter().map(|q| q.mid_price(tick_size)).collect()
}

/// Net order-flow contribution of one quote update relative to the previous
/// one.
///
/// A bid price rise adds the new bid size and a bid price fall subtracts the
/// previous bid size. An ask price fall adds the new ask size and an ask
/// price rise subtracts the previous ask size. Unchanged prices contribute
/// nothing.
#[must_use]
pub fn order_flow_event(prev: &Quote, cur: &Quote) -> f64 {
    let bid = if cur.bid_price > prev.bid_price {
        cur.bid_amount
    } else if cur.bid_price < prev.bid_price {
        -prev.bid_amount
    } else {
        0.0
    };

    let ask = if cur.ask_price < prev.ask_price {
        cur.ask_amount
    } else if cur.ask_price > prev.ask_price {
        -prev.ask_amount
    } else {
        0.0
    };

    bid + ask
}

/// Returns the net order-flow contribution of every quote, in order.
///
/// The first quote has no predecessor and contributes 0.
#[must_use]
pub fn order_flow_events(quotes: &[Quote]) -> Vec<f64> {
    let mut events = Vec::with_capacity(quotes.len());
    if !quotes.is_empty() {
        events.push(0.0);
    }
    events.extend(quotes.windows(2).map(|w| order_flow_event(&w[0], &w[1])));
    events
}

/// Returns the signed traded amount of every trade, positive for buys.
#[must_use]
pub fn signed_amounts(trades: &[Trade]) -> Vec<f64> {
    trades.iter().map(Trade::signed_amount).collect()
}
