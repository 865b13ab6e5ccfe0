//! Market snapshot and quantization policy.
//!
//! A snapshot is a point-in-time read of a market's live statistics plus the
//! venue's price/size grid. It is supplied fresh per request and never cached.

use crate::types::{MarketId, Price, Side};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Venue price/size grid. Prices snap to the tick, sizes to the lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantizePolicy {
    /// Minimum price increment (e.g. $0.1)
    pub tick_size: Decimal,
    /// Minimum size increment (e.g. 0.001 ETH)
    pub lot_size: Decimal,
}

impl QuantizePolicy {
    pub fn new(tick_size: Decimal, lot_size: Decimal) -> Self {
        debug_assert!(tick_size > Decimal::ZERO && lot_size > Decimal::ZERO);
        Self { tick_size, lot_size }
    }

    /// Snap a raw price to the nearest valid tick. Venue rounding rule.
    pub fn round_price(&self, raw: Decimal) -> Decimal {
        let ticks = (raw / self.tick_size)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        ticks * self.tick_size
    }

    /// Floor a size to the lot grid. Never rounds up past what was requested.
    pub fn round_size_floor(&self, raw: Decimal) -> Decimal {
        let lots = (raw / self.lot_size).round_dp_with_strategy(0, RoundingStrategy::ToZero);
        lots * self.lot_size
    }
}

/// Live market statistics as read from the venue. Immutable per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub market: MarketId,
    /// Best bid. Absent when the book is one-sided or empty.
    pub bid_price: Option<Price>,
    /// Best ask. Absent when the book is one-sided or empty.
    pub ask_price: Option<Price>,
    /// Mark price. Fallback reference when the touch is absent.
    pub mark_price: Option<Price>,
    pub quantize: QuantizePolicy,
}

impl MarketSnapshot {
    /// Reference price for slippage math: the side you would trade against,
    /// falling back to mark when the touch is missing.
    pub fn reference_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Buy => self.ask_price.or(self.mark_price),
            Side::Sell => self.bid_price.or(self.mark_price),
        }
    }
}
