//! End-to-end market order execution.
//!
//! Ties the resolver and reconciler together over a shared exchange-client
//! handle: read the market, derive a slippage-bounded limit order, submit it
//! IOC, then confirm the outcome. One logical flow per request with no shared
//! mutable state; concurrent executions over the same handle are independent.

use crate::config::ExecConfig;
use crate::exchange::{ExchangeClient, ExchangeError, TimeInForce};
use crate::market::MarketSnapshot;
use crate::reconciler::{confirm, Confirmation};
use crate::request::{OrderRequest, ResolvedOrder};
use crate::resolver::{resolve, ResolveError};
use crate::types::{MarketId, OrderId, Price, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of a full execute pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub order_id: OrderId,
    pub external_id: String,
    pub market: MarketId,
    pub side: Side,
    /// Venue-quantized size actually submitted.
    pub size: Decimal,
    /// Worst-acceptable limit price the order carried.
    pub worst_price: Price,
    pub confirmation: Confirmation,
    /// Legacy wire encoding of the confirmation path: poll attempts when
    /// confirmed directly, -1 for the fallback and unresolved cases.
    pub retry_attempts: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// Caller error. Not retried.
    #[error(transparent)]
    Rejected(#[from] ResolveError),

    /// Market read or order submission failed at the venue.
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),
}

/// Executor over a shared client handle. Lifecycle of the handle is owned by
/// the caller-facing layer; the executor only borrows capabilities from it.
pub struct Executor<C: ExchangeClient> {
    client: Arc<C>,
    config: ExecConfig,
}

impl<C: ExchangeClient> Executor<C> {
    pub fn new(client: Arc<C>, config: ExecConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Pure resolve step, exposed for callers that submit through their own
    /// channel. No I/O.
    pub fn resolve_order(
        &self,
        snapshot: &MarketSnapshot,
        request: &OrderRequest,
    ) -> Result<ResolvedOrder, ResolveError> {
        resolve(snapshot, request)
    }

    /// Confirm a previously submitted order under this executor's poll policy.
    pub async fn confirm_order(&self, order_id: OrderId) -> Confirmation {
        confirm(self.client.as_ref(), order_id, &self.config.reconcile).await
    }

    /// Full pipeline: get_market → resolve → submit (IOC) → confirm.
    ///
    /// An `Unresolved` confirmation is a success at this boundary; the report
    /// carries it and the caller decides how to surface "status pending".
    pub async fn execute(&self, request: &OrderRequest) -> Result<ExecutionReport, ExecError> {
        // Reject bad shapes before spending a market read.
        request.validate().map_err(ResolveError::from)?;

        let snapshot = self.client.get_market(&request.market).await?;
        let resolved = resolve(&snapshot, request)?;
        debug!(
            market = %request.market,
            side = %request.side,
            size = %resolved.size,
            worst_price = %resolved.limit_price,
            "resolved market order"
        );

        let ack = self
            .client
            .submit_order(
                &request.market,
                request.side,
                &resolved,
                TimeInForce::IOC,
                request.reduce_only,
            )
            .await?;
        info!(order_id = %ack.order_id, external_id = %ack.external_id, "order submitted");

        let confirmation = confirm(self.client.as_ref(), ack.order_id, &self.config.reconcile).await;
        if !confirmation.is_resolved() {
            warn!(order_id = %ack.order_id, "order accepted, confirmation pending");
        }

        let retry_attempts = confirmation.attempts_marker();
        Ok(ExecutionReport {
            order_id: ack.order_id,
            external_id: ack.external_id,
            market: request.market.clone(),
            side: request.side,
            size: resolved.size,
            worst_price: resolved.limit_price,
            confirmation,
            retry_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::mock::MockExchange;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn executor(mock: Arc<MockExchange>) -> Executor<MockExchange> {
        let mut config = ExecConfig::default();
        config.reconcile.delay = Duration::from_millis(1);
        Executor::new(mock, config)
    }

    fn buy(size: Decimal, slippage: Decimal) -> OrderRequest {
        OrderRequest::new(Side::Buy, size, MarketId::new("ETH-USD")).with_slippage(slippage)
    }

    #[tokio::test]
    async fn happy_path_produces_report() {
        let mock = Arc::new(MockExchange::with_eth_usd());
        let report = executor(mock).execute(&buy(dec!(1.23), dec!(0.05))).await.unwrap();

        assert_eq!(report.worst_price.value(), dec!(105.0));
        assert_eq!(report.size, dec!(1.2));
        assert!(matches!(report.confirmation, Confirmation::Order { attempts: 1, .. }));
        assert_eq!(report.retry_attempts, 1);
    }

    #[tokio::test]
    async fn over_ceiling_rejected_before_any_market_read() {
        // Empty mock: a market read would fail, proving validation ran first.
        let mock = Arc::new(MockExchange::new());
        let result = executor(mock).execute(&buy(dec!(1), dec!(0.06))).await;
        assert!(matches!(result, Err(ExecError::Rejected(_))));
    }

    #[tokio::test]
    async fn unknown_market_is_exchange_error() {
        let mock = Arc::new(MockExchange::new());
        let result = executor(mock).execute(&buy(dec!(1), dec!(0.05))).await;
        assert!(matches!(result, Err(ExecError::Exchange(ExchangeError::MarketNotFound(_)))));
    }

    #[tokio::test]
    async fn unresolved_confirmation_is_still_a_report() {
        let mock = Arc::new(MockExchange::with_eth_usd());
        mock.set_visibility_delay(u64::MAX);
        let report = executor(mock).execute(&buy(dec!(1), dec!(0.05))).await.unwrap();

        assert!(matches!(report.confirmation, Confirmation::Unresolved));
        assert_eq!(report.retry_attempts, -1);
    }

    #[tokio::test]
    async fn report_serializes_with_legacy_marker() {
        let mock = Arc::new(MockExchange::with_eth_usd());
        let report = executor(mock).execute(&buy(dec!(1), dec!(0))).await.unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["retry_attempts"], 1);
        assert_eq!(json["confirmation"]["kind"], "order");
    }
}
