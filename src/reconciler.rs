//! Order confirmation reconciler.
//!
//! A just-submitted order may not be visible in the venue's order store yet:
//! the write path and the read path converge eventually, not immediately. This
//! module confirms an order's final state through a bounded poll of "order by
//! id", falling back once to a scan of recent trade history when the record
//! never surfaces.
//!
//! State machine: `Polling(1..N) → Confirmed(order) | FallbackScan →
//! Confirmed(trade) | Unresolved`. Every read error inside the loop is
//! absorbed as "not visible this attempt"; the only failure this component
//! exposes is the terminal `Unresolved`, which callers treat as "submission
//! likely succeeded, confirmation pending" rather than an error.

use crate::exchange::{ExchangeClient, OrderRecord, TradeRecord};
use crate::types::OrderId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Marker emitted in place of an attempt count when confirmation came through
/// the trade fallback or not at all. Wire compatibility only; in-process code
/// matches on [`Confirmation`] variants instead.
pub const FALLBACK_MARKER: i32 = -1;

/// Fixed poll policy. Evenly spaced reads, no backoff, no jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilePolicy {
    /// Maximum "order by id" reads before falling back.
    pub attempts: u32,
    /// Pause between reads (not after the last).
    pub delay: Duration,
    /// Page size for the trade-history fallback scan.
    pub trade_scan_limit: usize,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delay: Duration::from_secs(2),
            trade_scan_limit: 10,
        }
    }
}

/// Terminal outcome of a confirmation.
///
/// A tagged union rather than an attempt counter with a sign-overloaded
/// sentinel; the sentinel survives only in [`Confirmation::attempts_marker`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Confirmation {
    /// The order record became visible on poll attempt `attempts` (1-indexed).
    Order { record: OrderRecord, attempts: u32 },
    /// The record never surfaced but a matching fill was found in recent
    /// trade history.
    Trade { trade: TradeRecord },
    /// Neither the order record nor a matching trade was visible. Not an
    /// error: the submission may still have succeeded.
    Unresolved,
}

impl Confirmation {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Confirmation::Unresolved)
    }

    /// Attempt count in the legacy wire encoding: k >= 1 when confirmed
    /// directly, [`FALLBACK_MARKER`] for the fallback and unresolved cases.
    pub fn attempts_marker(&self) -> i32 {
        match self {
            Confirmation::Order { attempts, .. } => *attempts as i32,
            Confirmation::Trade { .. } | Confirmation::Unresolved => FALLBACK_MARKER,
        }
    }
}

/// Confirm a submitted order's state against an eventually-consistent venue.
///
/// Makes at most `policy.attempts` order reads plus one trade read. Dropping
/// the returned future between awaits stops further reads; there is no other
/// cancellation hook. Safe to run concurrently over one shared client handle:
/// the loop owns no state beyond its counter.
pub async fn confirm<C: ExchangeClient + ?Sized>(
    client: &C,
    order_id: OrderId,
    policy: &ReconcilePolicy,
) -> Confirmation {
    for attempt in 1..=policy.attempts {
        match client.get_order_by_id(order_id).await {
            Ok(Some(record)) => {
                debug!(%order_id, attempt, "order record visible");
                return Confirmation::Order { record, attempts: attempt };
            }
            Ok(None) => {
                debug!(%order_id, attempt, "order record not yet visible");
            }
            // A failed read is indistinguishable from "not yet visible".
            Err(err) => {
                warn!(%order_id, attempt, error = %err, "order read failed, continuing poll");
            }
        }
        if attempt < policy.attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }

    // One fallback scan. A transient failure here is swallowed as "no match".
    match client.get_trades(policy.trade_scan_limit).await {
        Ok(trades) => {
            if let Some(trade) = trades.into_iter().find(|t| t.order_id == order_id) {
                debug!(%order_id, trade_id = trade.id.0, "confirmed via trade history fallback");
                return Confirmation::Trade { trade };
            }
        }
        Err(err) => {
            warn!(%order_id, error = %err, "trade history fallback failed");
        }
    }

    debug!(%order_id, "order unresolved after poll and fallback");
    Confirmation::Unresolved
}
