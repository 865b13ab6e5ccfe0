// perp-exec: slippage-bounded market order execution for perp venues.
// execution-first architecture: derive a worst-price limit order from live
// market stats, submit it IOC, then reconcile the outcome against an
// eventually-consistent order store.
//
// file map:
//   types.rs      primitives: MarketId, OrderId, Side, Price, Timestamp
//   market.rs     market snapshot + tick/lot quantization policy
//   request.rs    order request (slippage ceiling) and resolved order
//   resolver.rs   pure price/size resolution
//   exchange/     client capability trait, venue records, in-process mock
//   reconciler.rs bounded poll + trade-history fallback confirmation
//   executor.rs   get_market → resolve → submit → confirm pipeline
//   hedge.rs      net-exposure hedge ledger on top of the executor
//   config.rs     executor settings, env-loadable

pub mod config;
pub mod exchange;
pub mod executor;
pub mod hedge;
pub mod market;
pub mod reconciler;
pub mod request;
pub mod resolver;
pub mod types;

pub use config::ExecConfig;
pub use exchange::{
    ExchangeClient, ExchangeError, OrderAck, OrderRecord, OrderStatus, TimeInForce, TradeRecord,
};
pub use executor::{ExecError, ExecutionReport, Executor};
pub use hedge::{open_request, HedgeBook};
pub use market::{MarketSnapshot, QuantizePolicy};
pub use reconciler::{confirm, Confirmation, ReconcilePolicy, FALLBACK_MARKER};
pub use request::{OrderRequest, RequestError, ResolvedOrder, DEFAULT_SLIPPAGE, SLIPPAGE_CEILING};
pub use resolver::{resolve, ResolveError};
pub use types::{MarketId, OrderId, Price, Side, Timestamp, TradeId};
