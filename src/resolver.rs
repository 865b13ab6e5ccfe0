//! Price/size resolver.
//!
//! Pure function from a market snapshot plus an order request to a
//! worst-acceptable limit price and a venue-quantized size. No I/O, no
//! retries: every failure here is a caller error, not a transient fault.

use crate::market::MarketSnapshot;
use crate::request::{OrderRequest, RequestError, ResolvedOrder};
use crate::types::{Price, Side};
use rust_decimal::Decimal;

/// Resolve a request against a live snapshot.
///
/// Pipeline: validate shape (slippage ceiling first) → pick reference price →
/// apply slippage toward the worst side → snap price to tick, floor size to
/// lot. A size that floors to zero is a rejection, not a zero-size order.
pub fn resolve(snapshot: &MarketSnapshot, request: &OrderRequest) -> Result<ResolvedOrder, ResolveError> {
    request.validate()?;

    // A corrupt snapshot with a zero increment would otherwise divide by zero
    // inside the quantizer.
    let quantize = &snapshot.quantize;
    if quantize.tick_size <= Decimal::ZERO || quantize.lot_size <= Decimal::ZERO {
        return Err(ResolveError::InvalidIncrements {
            tick_size: quantize.tick_size,
            lot_size: quantize.lot_size,
        });
    }

    let reference = snapshot
        .reference_price(request.side)
        .ok_or(ResolveError::NoReferencePrice)?;

    let worst = match request.side {
        Side::Buy => reference.value() * (Decimal::ONE + request.max_slippage),
        Side::Sell => reference.value() * (Decimal::ONE - request.max_slippage),
    };
    if worst <= Decimal::ZERO {
        return Err(ResolveError::DegeneratePrice(worst));
    }

    let rounded_price = snapshot.quantize.round_price(worst);
    let limit_price = Price::new(rounded_price).ok_or(ResolveError::DegeneratePrice(rounded_price))?;

    let size = snapshot.quantize.round_size_floor(request.size);
    if size <= Decimal::ZERO {
        return Err(ResolveError::SizeTooSmall {
            requested: request.size,
            lot_size: snapshot.quantize.lot_size,
        });
    }

    Ok(ResolvedOrder { limit_price, size })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidRequest(#[from] RequestError),

    #[error("no bid/ask/mark price available for reference")]
    NoReferencePrice,

    #[error("non-positive quantization increments: tick {tick_size}, lot {lot_size}")]
    InvalidIncrements { tick_size: Decimal, lot_size: Decimal },

    #[error("computed worst price {0} is not positive")]
    DegeneratePrice(Decimal),

    #[error("size {requested} floors to zero at lot size {lot_size}")]
    SizeTooSmall { requested: Decimal, lot_size: Decimal },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::QuantizePolicy;
    use crate::types::MarketId;
    use rust_decimal_macros::dec;

    fn snapshot(bid: Option<Decimal>, ask: Option<Decimal>, mark: Option<Decimal>) -> MarketSnapshot {
        MarketSnapshot {
            market: MarketId::new("ETH-USD"),
            bid_price: bid.map(Price::new_unchecked),
            ask_price: ask.map(Price::new_unchecked),
            mark_price: mark.map(Price::new_unchecked),
            quantize: QuantizePolicy::new(dec!(0.5), dec!(0.1)),
        }
    }

    fn buy(size: Decimal, slippage: Decimal) -> OrderRequest {
        OrderRequest::new(Side::Buy, size, MarketId::new("ETH-USD")).with_slippage(slippage)
    }

    fn sell(size: Decimal, slippage: Decimal) -> OrderRequest {
        OrderRequest::new(Side::Sell, size, MarketId::new("ETH-USD")).with_slippage(slippage)
    }

    #[test]
    fn buy_worst_price_from_ask() {
        // ask=100, slippage=5% → 105.0, already on the 0.5 tick; size 1.23 floors to 1.2
        let snap = snapshot(Some(dec!(99)), Some(dec!(100)), Some(dec!(99.5)));
        let resolved = resolve(&snap, &buy(dec!(1.23), dec!(0.05))).unwrap();
        assert_eq!(resolved.limit_price.value(), dec!(105.0));
        assert_eq!(resolved.size, dec!(1.2));
    }

    #[test]
    fn sell_worst_price_from_bid() {
        let snap = snapshot(Some(dec!(100)), Some(dec!(101)), Some(dec!(100.5)));
        let resolved = resolve(&snap, &sell(dec!(1), dec!(0.05))).unwrap();
        // 100 * 0.95 = 95.0
        assert_eq!(resolved.limit_price.value(), dec!(95.0));
    }

    #[test]
    fn falls_back_to_mark_price() {
        let snap = snapshot(None, None, Some(dec!(200)));
        let resolved = resolve(&snap, &buy(dec!(1), dec!(0))).unwrap();
        assert_eq!(resolved.limit_price.value(), dec!(200));
    }

    #[test]
    fn ceiling_checked_before_price_math() {
        // Even a snapshot with no prices reports the slippage error first.
        let snap = snapshot(None, None, None);
        let result = resolve(&snap, &buy(dec!(1), dec!(0.06)));
        assert!(matches!(
            result,
            Err(ResolveError::InvalidRequest(RequestError::SlippageOutOfRange { .. }))
        ));
    }

    #[test]
    fn empty_market_rejected() {
        let snap = snapshot(None, None, None);
        let result = resolve(&snap, &buy(dec!(1), dec!(0.05)));
        assert_eq!(result, Err(ResolveError::NoReferencePrice));
    }

    #[test]
    fn dust_size_rejected() {
        let snap = snapshot(Some(dec!(99)), Some(dec!(100)), None);
        let result = resolve(&snap, &buy(dec!(0.05), dec!(0.01)));
        assert!(matches!(result, Err(ResolveError::SizeTooSmall { .. })));
    }

    #[test]
    fn zero_increments_rejected_not_panicking() {
        let mut snap = snapshot(Some(dec!(99)), Some(dec!(100)), None);
        snap.quantize = QuantizePolicy {
            tick_size: dec!(0),
            lot_size: dec!(0.1),
        };
        let result = resolve(&snap, &buy(dec!(1), dec!(0.01)));
        assert!(matches!(result, Err(ResolveError::InvalidIncrements { .. })));

        snap.quantize = QuantizePolicy {
            tick_size: dec!(0.5),
            lot_size: dec!(0),
        };
        let result = resolve(&snap, &buy(dec!(1), dec!(0.01)));
        assert!(matches!(result, Err(ResolveError::InvalidIncrements { .. })));
    }

    #[test]
    fn zero_slippage_is_reference_price() {
        let snap = snapshot(Some(dec!(99)), Some(dec!(100)), None);
        let resolved = resolve(&snap, &buy(dec!(1), dec!(0))).unwrap();
        assert_eq!(resolved.limit_price.value(), dec!(100));
    }
}
