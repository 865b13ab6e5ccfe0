//! Order request and resolved order.
//!
//! An `OrderRequest` is what the caller asks for; a `ResolvedOrder` is what
//! the venue will actually accept: a worst-acceptable limit price and a size
//! snapped to the venue grid. The resolved form is consumed once by the
//! submission step and never persisted.

use crate::types::{MarketId, Price, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Hard cap on caller-supplied slippage. A misconfigured caller cannot ask
/// for unbounded slippage past this.
pub const SLIPPAGE_CEILING: Decimal = dec!(0.05);

/// Default slippage bound when the caller supplies none.
pub const DEFAULT_SLIPPAGE: Decimal = dec!(0.05);

/// A market-order request with an explicit worst-price slippage bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub side: Side,
    /// Requested size in base units. Strictly positive.
    pub size: Decimal,
    pub market: MarketId,
    /// Maximum slippage fraction, 0 ..= SLIPPAGE_CEILING.
    pub max_slippage: Decimal,
    pub reduce_only: bool,
}

impl OrderRequest {
    pub fn new(side: Side, size: Decimal, market: MarketId) -> Self {
        Self {
            side,
            size,
            market,
            max_slippage: DEFAULT_SLIPPAGE,
            reduce_only: false,
        }
    }

    pub fn with_slippage(mut self, max_slippage: Decimal) -> Self {
        self.max_slippage = max_slippage;
        self
    }

    pub fn reduce_only(mut self) -> Self {
        self.reduce_only = true;
        self
    }

    /// Shape validation. Runs before any market read or price math.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.size <= Decimal::ZERO {
            return Err(RequestError::NonPositiveSize(self.size));
        }
        if self.max_slippage < Decimal::ZERO || self.max_slippage > SLIPPAGE_CEILING {
            return Err(RequestError::SlippageOutOfRange {
                requested: self.max_slippage,
                ceiling: SLIPPAGE_CEILING,
            });
        }
        Ok(())
    }
}

/// Worst-acceptable limit price plus venue-quantized size. Derived, not stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOrder {
    pub limit_price: Price,
    pub size: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("order size {0} must be positive")]
    NonPositiveSize(Decimal),

    #[error("max slippage {requested} outside 0..={ceiling}")]
    SlippageOutOfRange { requested: Decimal, ceiling: Decimal },
}
