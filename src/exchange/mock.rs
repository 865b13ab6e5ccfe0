//! In-process mock exchange.
//!
//! Scripted stand-in for a live venue client, used by the simulation binary
//! and the integration tests. Supports delayed order visibility (the record
//! appears only after a configured number of reads), scripted read failures,
//! and a canned trade tape. Counts every read so tests can assert exactly how
//! many calls the reconciler made.

use super::{
    ExchangeClient, ExchangeError, OrderAck, OrderRecord, OrderStatus, TimeInForce, TradeRecord,
};
use crate::market::{MarketSnapshot, QuantizePolicy};
use crate::request::ResolvedOrder;
use crate::types::{MarketId, OrderId, Price, Side, Timestamp, TradeId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    markets: Vec<MarketSnapshot>,
    orders: Vec<OrderRecord>,
    trades: Vec<TradeRecord>,
    /// Reads remaining before submitted orders become visible.
    visibility_delay: u64,
    /// Reads that fail with a transport error before succeeding.
    failing_reads: u64,
    order_reads: u64,
    trade_reads: u64,
}

/// Scripted exchange. All state behind one mutex; nothing is held across an
/// await so concurrent use cannot deadlock.
pub struct MockExchange {
    state: Mutex<MockState>,
    next_order_id: AtomicU64,
}

impl MockExchange {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            next_order_id: AtomicU64::new(1),
        }
    }

    /// An ETH-USD venue with a populated touch: bid 99.5 / ask 100 / mark
    /// 99.75, tick 0.5, lot 0.1.
    pub fn with_eth_usd() -> Self {
        let mock = Self::new();
        mock.add_market(MarketSnapshot {
            market: MarketId::new("ETH-USD"),
            bid_price: Some(Price::new_unchecked(dec!(99.5))),
            ask_price: Some(Price::new_unchecked(dec!(100))),
            mark_price: Some(Price::new_unchecked(dec!(99.75))),
            quantize: QuantizePolicy::new(dec!(0.5), dec!(0.1)),
        });
        mock
    }

    pub fn add_market(&self, snapshot: MarketSnapshot) {
        self.state.lock().unwrap().markets.push(snapshot);
    }

    /// Submitted orders stay invisible to `get_order_by_id` for the next
    /// `reads` reads. Models the venue's eventually-consistent order store.
    pub fn set_visibility_delay(&self, reads: u64) {
        self.state.lock().unwrap().visibility_delay = reads;
    }

    /// The next `reads` order/trade reads fail with a transport error.
    pub fn fail_next_reads(&self, reads: u64) {
        self.state.lock().unwrap().failing_reads = reads;
    }

    /// Append a trade to the tape, newest first on read.
    pub fn add_trade(&self, trade: TradeRecord) {
        self.state.lock().unwrap().trades.push(trade);
    }

    pub fn order_reads(&self) -> u64 {
        self.state.lock().unwrap().order_reads
    }

    pub fn trade_reads(&self) -> u64 {
        self.state.lock().unwrap().trade_reads
    }

    /// Convenience: a filled trade row for `order_id`.
    pub fn trade_for(order_id: OrderId, trade_id: u64, price: Decimal, size: Decimal) -> TradeRecord {
        TradeRecord {
            id: TradeId(trade_id),
            order_id,
            market: MarketId::new("ETH-USD"),
            side: Side::Buy,
            price: Price::new_unchecked(price),
            size,
            fee: dec!(0),
            is_taker: true,
            created_at: Timestamp::now(),
        }
    }
}

impl Default for MockExchange {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    async fn get_market(&self, market: &MarketId) -> Result<MarketSnapshot, ExchangeError> {
        let state = self.state.lock().unwrap();
        state
            .markets
            .iter()
            .find(|m| &m.market == market)
            .cloned()
            .ok_or_else(|| ExchangeError::MarketNotFound(market.clone()))
    }

    async fn submit_order(
        &self,
        market: &MarketId,
        side: Side,
        order: &ResolvedOrder,
        _time_in_force: TimeInForce,
        _reduce_only: bool,
    ) -> Result<OrderAck, ExchangeError> {
        let id = OrderId(self.next_order_id.fetch_add(1, Ordering::SeqCst));
        let external_id = format!("ext-{}", id.0);
        let record = OrderRecord {
            id,
            external_id: external_id.clone(),
            market: market.clone(),
            side,
            status: OrderStatus::Filled,
            size: order.size,
            price: order.limit_price,
            filled_size: order.size,
            average_price: Some(order.limit_price),
            updated_at: Timestamp::now(),
        };
        self.state.lock().unwrap().orders.push(record);
        Ok(OrderAck { order_id: id, external_id })
    }

    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<OrderRecord>, ExchangeError> {
        let mut state = self.state.lock().unwrap();
        state.order_reads += 1;
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(ExchangeError::Transport("scripted read failure".into()));
        }
        if state.visibility_delay > 0 {
            state.visibility_delay -= 1;
            return Ok(None);
        }
        Ok(state.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn get_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, ExchangeError> {
        let mut state = self.state.lock().unwrap();
        state.trade_reads += 1;
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(ExchangeError::Transport("scripted read failure".into()));
        }
        Ok(state.trades.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn visibility_delay_hides_then_reveals() {
        let mock = MockExchange::with_eth_usd();
        mock.set_visibility_delay(2);

        let resolved = ResolvedOrder {
            limit_price: Price::new_unchecked(dec!(105)),
            size: dec!(1),
        };
        let ack = mock
            .submit_order(&MarketId::new("ETH-USD"), Side::Buy, &resolved, TimeInForce::IOC, false)
            .await
            .unwrap();

        assert!(mock.get_order_by_id(ack.order_id).await.unwrap().is_none());
        assert!(mock.get_order_by_id(ack.order_id).await.unwrap().is_none());
        assert!(mock.get_order_by_id(ack.order_id).await.unwrap().is_some());
        assert_eq!(mock.order_reads(), 3);
    }

    #[tokio::test]
    async fn scripted_failures_then_recover() {
        let mock = MockExchange::with_eth_usd();
        mock.fail_next_reads(1);

        assert!(mock.get_order_by_id(OrderId(7)).await.is_err());
        assert!(mock.get_order_by_id(OrderId(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn trade_tape_is_bounded_and_newest_first() {
        let mock = MockExchange::new();
        for i in 1..=12 {
            mock.add_trade(MockExchange::trade_for(OrderId(i), i, dec!(100), dec!(1)));
        }
        let trades = mock.get_trades(10).await.unwrap();
        assert_eq!(trades.len(), 10);
        assert_eq!(trades[0].order_id, OrderId(12));
    }
}
