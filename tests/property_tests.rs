//! Property-based tests for the price/size resolver.
//!
//! These verify the resolver's worst-price and quantization invariants under
//! random market data and request shapes.

use perp_exec::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// Prices on the $0.01 tick grid, $0.01 to $10,000.
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|x| Decimal::new(x, 2))
}

// Slippage 0% to 5% in 1% steps. Nonzero steps always exceed one tick of
// movement at these prices, so quantization cannot cross the reference.
fn slippage_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=5i64).prop_map(|x| Decimal::new(x, 2))
}

// Sizes 0.0001 to 10.0 at scale 4.
fn size_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|x| Decimal::new(x, 4))
}

fn lot_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![Just(dec!(0.0001)), Just(dec!(0.001)), Just(dec!(0.01)), Just(dec!(0.1))]
}

fn snapshot(ask: Decimal, bid: Decimal, lot: Decimal) -> MarketSnapshot {
    MarketSnapshot {
        market: MarketId::new("ETH-USD"),
        bid_price: Price::new(bid),
        ask_price: Price::new(ask),
        mark_price: None,
        quantize: QuantizePolicy::new(dec!(0.01), lot),
    }
}

proptest! {
    /// BUY worst price never falls below the reference; equality only at
    /// zero slippage.
    #[test]
    fn buy_worst_price_at_least_reference(
        ask in price_strategy(),
        slippage in slippage_strategy(),
        size in size_strategy(),
    ) {
        let snap = snapshot(ask, ask, dec!(0.0001));
        let request = OrderRequest::new(Side::Buy, size, MarketId::new("ETH-USD"))
            .with_slippage(slippage);

        let resolved = resolve(&snap, &request).unwrap();
        prop_assert!(resolved.limit_price.value() >= ask);
        if slippage.is_zero() {
            prop_assert_eq!(resolved.limit_price.value(), ask);
        }
    }

    /// SELL worst price never exceeds the reference; equality only at zero
    /// slippage. Skips the degenerate case where 95% of a one-tick bid
    /// floors out of the price domain.
    #[test]
    fn sell_worst_price_at_most_reference(
        bid in price_strategy(),
        slippage in slippage_strategy(),
        size in size_strategy(),
    ) {
        let snap = snapshot(bid, bid, dec!(0.0001));
        let request = OrderRequest::new(Side::Sell, size, MarketId::new("ETH-USD"))
            .with_slippage(slippage);

        match resolve(&snap, &request) {
            Ok(resolved) => {
                prop_assert!(resolved.limit_price.value() <= bid);
                if slippage.is_zero() {
                    prop_assert_eq!(resolved.limit_price.value(), bid);
                }
            }
            Err(ResolveError::DegeneratePrice(_)) => {
                // Only reachable when the slipped price rounds to zero.
                prop_assert!(bid * (Decimal::ONE - slippage) < dec!(0.005));
            }
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        }
    }

    /// Floor quantization never rounds a size up past the request.
    #[test]
    fn resolved_size_never_exceeds_request(
        ask in price_strategy(),
        size in size_strategy(),
        lot in lot_strategy(),
    ) {
        let snap = snapshot(ask, ask, lot);
        let request = OrderRequest::new(Side::Buy, size, MarketId::new("ETH-USD"));

        match resolve(&snap, &request) {
            Ok(resolved) => {
                prop_assert!(resolved.size <= size);
                prop_assert!(resolved.size > Decimal::ZERO);
                prop_assert!((resolved.size % lot).is_zero());
            }
            Err(ResolveError::SizeTooSmall { .. }) => prop_assert!(size < lot),
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        }
    }

    /// Slippage above the ceiling is rejected regardless of market shape.
    #[test]
    fn over_ceiling_always_rejected(
        ask in price_strategy(),
        size in size_strategy(),
        over in 6i64..100i64,
    ) {
        let snap = snapshot(ask, ask, dec!(0.0001));
        let request = OrderRequest::new(Side::Buy, size, MarketId::new("ETH-USD"))
            .with_slippage(Decimal::new(over, 2));

        prop_assert!(
            matches!(
                resolve(&snap, &request),
                Err(ResolveError::InvalidRequest(RequestError::SlippageOutOfRange { .. }))
            ),
            "expected SlippageOutOfRange error"
        );
    }
}

#[test]
fn all_prices_absent_is_always_rejected() {
    let snap = MarketSnapshot {
        market: MarketId::new("ETH-USD"),
        bid_price: None,
        ask_price: None,
        mark_price: None,
        quantize: QuantizePolicy::new(dec!(0.01), dec!(0.001)),
    };
    let request = OrderRequest::new(Side::Buy, dec!(1), MarketId::new("ETH-USD"));
    assert_eq!(resolve(&snap, &request), Err(ResolveError::NoReferencePrice));
}
