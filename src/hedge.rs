//! Net-exposure hedging on top of the executor.
//!
//! The original use case for this pipeline: hedge a spot/LP exposure by
//! selling an equivalent perp size, record the fills, and later close by
//! netting recorded fills and submitting a reduce-only order on the opposite
//! side. The ledger is in-memory and keyed by an opaque hedge key (the LP
//! token id upstream).

use crate::config::ExecConfig;
use crate::exchange::TradeRecord;
use crate::request::OrderRequest;
use crate::types::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fills recorded per hedge key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HedgeBook {
    trades: HashMap<String, Vec<TradeRecord>>,
}

impl HedgeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &str, trade: TradeRecord) {
        self.trades.entry(key.to_string()).or_default().push(trade);
    }

    pub fn record_all(&mut self, key: &str, trades: impl IntoIterator<Item = TradeRecord>) {
        self.trades
            .entry(key.to_string())
            .or_default()
            .extend(trades);
    }

    pub fn trades(&self, key: &str) -> &[TradeRecord] {
        self.trades.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Signed net fill size for a key: BUY fills count positive, SELL
    /// negative. Zero means the hedge is flat.
    pub fn net_exposure(&self, key: &str) -> Decimal {
        self.trades(key)
            .iter()
            .map(|t| t.side.sign() * t.size)
            .sum()
    }

    /// Request that closes the net exposure under `key`: opposite side,
    /// reduce-only. `None` when already flat.
    pub fn close_request(&self, key: &str, config: &ExecConfig) -> Option<OrderRequest> {
        let net = self.net_exposure(key);
        if net.is_zero() {
            return None;
        }
        let side = if net > Decimal::ZERO { Side::Sell } else { Side::Buy };
        Some(
            OrderRequest::new(side, net.abs(), config.market.clone())
                .with_slippage(config.max_slippage)
                .reduce_only(),
        )
    }
}

/// SELL hedge sized from a base exposure times the configured multiplier.
/// `None` when the scaled size is not positive (nothing worth hedging).
pub fn open_request(base_size: Decimal, config: &ExecConfig) -> Option<OrderRequest> {
    let size = base_size * config.size_multiplier;
    if size <= Decimal::ZERO {
        return None;
    }
    let mut request =
        OrderRequest::new(Side::Sell, size, config.market.clone()).with_slippage(config.max_slippage);
    if config.reduce_only {
        request = request.reduce_only();
    }
    Some(request)
}
