// config.rs: all executor settings in one place. market, slippage bound,
// hedge sizing, poll policy. serde-derived for file overrides, env-loadable
// for the deployed path.

use crate::reconciler::ReconcilePolicy;
use crate::request::DEFAULT_SLIPPAGE;
use crate::types::MarketId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Market orders go to this venue symbol.
    pub market: MarketId,
    /// Slippage bound applied to requests built from this config.
    pub max_slippage: Decimal,
    /// Submit orders reduce-only.
    pub reduce_only: bool,
    /// Hedge sizing multiplier applied to base exposure.
    pub size_multiplier: Decimal,
    pub reconcile: ReconcilePolicy,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            market: MarketId::new("ETH-USD"),
            max_slippage: DEFAULT_SLIPPAGE,
            reduce_only: false,
            size_multiplier: Decimal::ONE,
            reconcile: ReconcilePolicy::default(),
        }
    }
}

impl ExecConfig {
    /// Load from `PERP_*` environment variables, falling back to defaults.
    /// Malformed values fall back rather than erroring; the resolver still
    /// validates whatever ends up in a request.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            market: std::env::var("PERP_MARKET")
                .ok()
                .filter(|v| !v.is_empty())
                .map(MarketId::new)
                .unwrap_or(defaults.market),
            max_slippage: env_decimal("PERP_MAX_SLIPPAGE_PCT").unwrap_or(defaults.max_slippage),
            reduce_only: std::env::var("PERP_REDUCE_ONLY").as_deref() == Ok("true"),
            size_multiplier: env_decimal("PERP_SIZE_MULTIPLIER").unwrap_or(defaults.size_multiplier),
            reconcile: defaults.reconcile,
        }
    }
}

fn env_decimal(key: &str) -> Option<Decimal> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
