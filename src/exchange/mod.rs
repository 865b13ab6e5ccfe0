//! Exchange client capability trait and venue-owned records.
//!
//! Connectivity, signing and auth live behind this seam. The executor only
//! needs four read/write capabilities; anything that can satisfy them (a live
//! venue client, the in-process mock) plugs in here. Every method may fail
//! transiently; how the caller treats that is the caller's policy.

use crate::market::MarketSnapshot;
use crate::request::ResolvedOrder;
use crate::types::{MarketId, OrderId, Price, Side, Timestamp, TradeId};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod mock;

/// Order lifecycle state as reported by the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

/// Venue acknowledgement of a submitted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    pub order_id: OrderId,
    pub external_id: String,
}

/// Point-in-time read of a venue-owned order record. The core never mutates
/// these, only observes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub external_id: String,
    pub market: MarketId,
    pub side: Side,
    pub status: OrderStatus,
    pub size: Decimal,
    pub price: Price,
    pub filled_size: Decimal,
    pub average_price: Option<Price>,
    pub updated_at: Timestamp,
}

/// A fill from the account's trade history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: TradeId,
    pub order_id: OrderId,
    pub market: MarketId,
    pub side: Side,
    pub price: Price,
    pub size: Decimal,
    pub fee: Decimal,
    pub is_taker: bool,
    pub created_at: Timestamp,
}

/// Time in force. The executor always submits IOC; the variant exists so the
/// seam states it explicitly rather than burying it in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Immediate or cancel. Fill what is possible, cancel the rest.
    IOC,
    /// Good till canceled.
    GTC,
}

/// Venue/transport fault. `Transport` is transient; `MarketNotFound` and
/// `Rejected` are permanent caller-visible outcomes. Whether to retry a
/// transient fault is decided at the call site.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExchangeError {
    #[error("market not found: {0}")]
    MarketNotFound(MarketId),

    #[error("venue rejected request: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// The four capabilities the execution core consumes. Shared handles must be
/// safe for concurrent in-flight calls; nothing in this crate serializes them.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Read a market's live statistics and quantization grid.
    async fn get_market(&self, market: &MarketId) -> Result<MarketSnapshot, ExchangeError>;

    /// Submit a resolved order. Outside the core's responsibility except as
    /// the ack the reconciler is handed.
    async fn submit_order(
        &self,
        market: &MarketId,
        side: Side,
        order: &ResolvedOrder,
        time_in_force: TimeInForce,
        reduce_only: bool,
    ) -> Result<OrderAck, ExchangeError>;

    /// Read an order by id. `Ok(None)` means the record is not yet visible.
    async fn get_order_by_id(&self, id: OrderId) -> Result<Option<OrderRecord>, ExchangeError>;

    /// Read the most recent account trades, newest first, bounded by `limit`.
    async fn get_trades(&self, limit: usize) -> Result<Vec<TradeRecord>, ExchangeError>;
}
