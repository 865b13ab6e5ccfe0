//! Market order execution simulation.
//!
//! Drives the full resolve → submit → confirm pipeline against the in-process
//! mock exchange, covering the confirmation paths a live venue produces:
//! immediate visibility, delayed visibility, trade-history fallback, and the
//! unresolved terminal state.

use anyhow::Result;
use perp_exec::exchange::mock::MockExchange;
use perp_exec::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("Perp Market Order Execution Simulation");
    println!("Slippage-Bounded Submission, Eventual-Consistency Reconciliation\n");

    scenario_1_happy_path().await?;
    scenario_2_delayed_visibility().await?;
    scenario_3_trade_fallback().await?;
    scenario_4_unresolved().await?;
    scenario_5_rejections().await;
    scenario_6_hedge_round_trip().await?;

    println!("\nAll scenarios completed.");
    Ok(())
}

fn sim_executor(mock: Arc<MockExchange>) -> Executor<MockExchange> {
    // Production policy is 5 attempts x 2s; the sim shortens the delay so the
    // reconciliation paths play out instantly.
    let mut config = ExecConfig::default();
    config.reconcile.delay = Duration::from_millis(10);
    Executor::new(mock, config)
}

fn buy(size: rust_decimal::Decimal) -> OrderRequest {
    OrderRequest::new(Side::Buy, size, MarketId::new("ETH-USD"))
}

/// Order record visible on the first read.
async fn scenario_1_happy_path() -> Result<()> {
    println!("Scenario 1: Immediate Confirmation\n");

    let mock = Arc::new(MockExchange::with_eth_usd());
    let executor = sim_executor(mock);

    let report = executor.execute(&buy(dec!(1.23)).with_slippage(dec!(0.05))).await?;
    println!("  BUY 1.23 ETH-USD, 5% slippage bound");
    println!("  worst price ${}, submitted size {}", report.worst_price, report.size);
    println!("  confirmed in {} attempt(s)\n", report.retry_attempts);

    println!("  report: {}\n", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Record surfaces on the third poll attempt.
async fn scenario_2_delayed_visibility() -> Result<()> {
    println!("Scenario 2: Delayed Order Visibility\n");

    let mock = Arc::new(MockExchange::with_eth_usd());
    mock.set_visibility_delay(2);
    let executor = sim_executor(mock.clone());

    let report = executor.execute(&buy(dec!(0.5))).await?;
    match &report.confirmation {
        Confirmation::Order { attempts, .. } => {
            println!("  order invisible for 2 reads, confirmed on attempt {attempts}");
            println!("  total order reads: {}\n", mock.order_reads());
        }
        other => println!("  unexpected confirmation: {other:?}\n"),
    }
    Ok(())
}

/// Order record never surfaces; the fill is found in trade history.
async fn scenario_3_trade_fallback() -> Result<()> {
    println!("Scenario 3: Trade History Fallback\n");

    let mock = Arc::new(MockExchange::with_eth_usd());
    mock.set_visibility_delay(u64::MAX);
    let executor = sim_executor(mock.clone());

    let request = buy(dec!(1));
    let snapshot = MarketSnapshot {
        market: MarketId::new("ETH-USD"),
        bid_price: Some(Price::new_unchecked(dec!(99.5))),
        ask_price: Some(Price::new_unchecked(dec!(100))),
        mark_price: None,
        quantize: QuantizePolicy::new(dec!(0.5), dec!(0.1)),
    };
    let resolved = executor.resolve_order(&snapshot, &request)?;

    let ack = mock
        .submit_order(&request.market, request.side, &resolved, TimeInForce::IOC, false)
        .await?;
    mock.add_trade(MockExchange::trade_for(ack.order_id, 1, dec!(100.5), resolved.size));

    let confirmation = executor.confirm_order(ack.order_id).await;
    match &confirmation {
        Confirmation::Trade { trade } => {
            println!("  5 polls exhausted, matched trade {} for order {}", trade.id.0, ack.order_id);
            println!("  marker: {}\n", confirmation.attempts_marker());
        }
        other => println!("  unexpected confirmation: {other:?}\n"),
    }
    Ok(())
}

/// Nothing ever becomes visible. Unresolved is a valid terminal outcome.
async fn scenario_4_unresolved() -> Result<()> {
    println!("Scenario 4: Unresolved Confirmation\n");

    let mock = Arc::new(MockExchange::with_eth_usd());
    mock.set_visibility_delay(u64::MAX);
    let executor = sim_executor(mock);

    let report = executor.execute(&buy(dec!(1))).await?;
    println!("  order {} accepted, status pending", report.order_id);
    println!("  confirmation: {:?}, marker {}\n", report.confirmation, report.retry_attempts);
    Ok(())
}

/// Caller errors: slippage over the ceiling, dust sizes, empty markets.
async fn scenario_5_rejections() {
    println!("Scenario 5: Rejections\n");

    let mock = Arc::new(MockExchange::with_eth_usd());
    let executor = sim_executor(mock);

    let over = executor.execute(&buy(dec!(1)).with_slippage(dec!(0.06))).await;
    println!("  slippage 0.06 vs ceiling 0.05: {}", over.unwrap_err());

    let dust = executor.execute(&buy(dec!(0.05))).await;
    println!("  size 0.05 vs lot 0.1: {}\n", dust.unwrap_err());
}

/// Hedge open, record fills, net, close reduce-only.
async fn scenario_6_hedge_round_trip() -> Result<()> {
    println!("Scenario 6: Hedge Round Trip\n");

    let mock = Arc::new(MockExchange::with_eth_usd());
    let executor = sim_executor(mock.clone());
    let mut book = HedgeBook::new();

    let open = open_request(dec!(2), executor.config()).expect("positive exposure");
    println!("  open hedge: {} {} {}", open.side, open.size, open.market);
    let report = executor.execute(&open).await?;

    let mut fill = MockExchange::trade_for(report.order_id, 1, report.worst_price.value(), report.size);
    fill.side = report.side;
    println!("  recorded fill: {} {} @ {}", fill.side, fill.size, fill.price);
    book.record("lp-1", fill);

    println!("  net exposure: {}", book.net_exposure("lp-1"));
    let close = book.close_request("lp-1", executor.config()).expect("not flat");
    println!("  close hedge: {} {} reduce_only={}", close.side, close.size, close.reduce_only);
    let close_report = executor.execute(&close).await?;
    println!("  closed via order {} in {} attempt(s)\n", close_report.order_id, close_report.retry_attempts);
    Ok(())
}
