
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use async_trait::async_trait;

use scallop_dash::config::EXCLUDED_SYMBOLS;
use scallop_dash::context::ProtocolContext;
use scallop_dash::market::{
    self, MarketError, MarketSource, PriceFeedError, PriceFeedStatus,
};
use scallop_dash::model::RawPool;
use scallop_dash::rpc::{RpcError, SuiRpc};

use stub_common::*;

// ── Helpers ──────────────────────────────────────────────────────────

struct FixedSource {
    pools: Option<Vec<RawPool>>,
    prices: Option<HashMap<String, f64>>,
}

#[async_trait]
impl MarketSource for FixedSource {
    async fn query_pools(&self) -> Result<Vec<RawPool>, MarketError> {
        self.pools
            .clone()
            .ok_or_else(|| MarketError::Unavailable("indexer down".into()))
    }

    async fn query_prices(&self) -> Result<HashMap<String, f64>, PriceFeedError> {
        self.prices.clone().ok_or(PriceFeedError::NotConfigured)
    }
}

fn pool(symbol: &str, coin_type: &str, decimals: Option<u8>, price: f64) -> RawPool {
    RawPool {
        symbol: Some(symbol.to_string()),
        coin_name: Some(symbol.to_lowercase()),
        coin_type: Some(coin_type.to_string()),
        coin_decimal: decimals,
        coin_price: Some(price),
        supply_amount: Some(1_000_000_000_000.0),
        borrow_amount: Some(250_000_000_000.0),
        supply_apy: Some(0.02),
        borrow_apy: Some(0.05),
        ..Default::default()
    }
}

fn excluded() -> Vec<String> {
    EXCLUDED_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

// ── Normalizer ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_excluded_symbols_never_appear() {
    let mut pools = vec![pool("SUI", SUI_TYPE, Some(9), 3.0)];
    for (i, symbol) in EXCLUDED_SYMBOLS.iter().enumerate() {
        pools.push(pool(symbol, &format!("0x{i}::coin::COIN"), Some(8), 1.0));
    }
    let source = FixedSource {
        pools: Some(pools),
        prices: Some(HashMap::new()),
    };

    let snapshot = market::try_fetch_market_assets(&source, &excluded())
        .await
        .unwrap();

    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0].symbol, "SUI");
    assert_eq!(snapshot.excluded.len(), EXCLUDED_SYMBOLS.len());
}

#[tokio::test]
async fn test_price_feed_failure_falls_back_to_pool_prices() {
    let source = FixedSource {
        pools: Some(vec![pool("SUI", SUI_TYPE, Some(9), 3.1)]),
        prices: None,
    };

    let snapshot = market::try_fetch_market_assets(&source, &excluded())
        .await
        .unwrap();

    assert_eq!(snapshot.rows[0].price, 3.1);
    assert!(matches!(
        snapshot.price_feed,
        PriceFeedStatus::Unavailable { .. }
    ));
}

#[tokio::test]
async fn test_feed_price_overrides_pool_price() {
    let source = FixedSource {
        pools: Some(vec![
            pool("SUI", SUI_TYPE, Some(9), 3.1),
            pool("USDC", USDC_TYPE, Some(6), 0.99),
        ]),
        prices: Some(HashMap::from([("SUI".to_string(), 3.5)])),
    };

    let snapshot = market::try_fetch_market_assets(&source, &excluded())
        .await
        .unwrap();

    let price = |symbol: &str| {
        snapshot
            .rows
            .iter()
            .find(|r| r.symbol == symbol)
            .unwrap()
            .price
    };
    assert_eq!(price("SUI"), 3.5);
    assert_eq!(price("USDC"), 0.99);
    assert_eq!(snapshot.price_feed, PriceFeedStatus::Live { quotes: 1 });
}

#[tokio::test]
async fn test_market_failure_yields_empty_rows() {
    let source = FixedSource {
        pools: None,
        prices: Some(HashMap::new()),
    };

    assert!(market::try_fetch_market_assets(&source, &excluded()).await.is_err());
    assert!(market::fetch_market_assets(&source, &excluded()).await.is_empty());
}

#[tokio::test]
async fn test_missing_decimals_default_to_nine() {
    let mut no_decimals = pool("DEEP", "0xdeep::deep::DEEP", None, 0.0);
    no_decimals.coin_price = None;
    let source = FixedSource {
        pools: Some(vec![no_decimals, pool("ZERO", "0x0::zero::ZERO", Some(0), 1.0)]),
        prices: None,
    };

    let rows = market::fetch_market_assets(&source, &excluded()).await;

    assert_eq!(rows[0].decimals, 9);
    assert_eq!(rows[0].total_supply, 1000.0);
    assert_eq!(rows[0].price, 0.0);
    assert_eq!(rows[1].decimals, 0);
}

#[tokio::test]
async fn test_duplicate_coin_types_keep_first() {
    let source = FixedSource {
        pools: Some(vec![
            pool("SUI", SUI_TYPE, Some(9), 3.0),
            pool("SUI", SUI_TYPE, Some(9), 9.0),
        ]),
        prices: None,
    };

    let snapshot = market::try_fetch_market_assets(&source, &excluded())
        .await
        .unwrap();

    assert_eq!(snapshot.rows.len(), 1);
    assert_eq!(snapshot.rows[0].price, 3.0);
    assert_eq!(snapshot.skipped, 1);
}

// ── Live clients against local stubs ─────────────────────────────────

#[tokio::test]
async fn test_context_fetches_from_indexer_and_hermes() {
    let counters = Arc::new(NodeCounters::default());
    let node = spawn(sui_node("35834a8a", counters.clone())).await;
    let services = spawn(market_services(true)).await;
    let context = ProtocolContext::with_http(stub_config(&node, &services), http());

    let snapshot = context.try_fetch_market_assets().await.unwrap();

    assert_eq!(snapshot.rows.len(), 1);
    let sui = &snapshot.rows[0];
    assert_eq!(sui.symbol, "SUI");
    assert_eq!(sui.price, 3.5);
    assert_eq!(sui.total_supply, 2000.0);
    assert_eq!(sui.total_borrow, 500.0);
    assert_eq!(sui.utilization, 25.0);
    assert_eq!(snapshot.excluded, vec!["wETH".to_string()]);

    // Second fetch reuses the connected client.
    context.try_fetch_market_assets().await.unwrap();
    assert_eq!(counters.chain_id_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_context_survives_price_feed_outage() {
    let node = spawn(sui_node("35834a8a", Arc::default())).await;
    let services = spawn(market_services(false)).await;
    let context = ProtocolContext::with_http(stub_config(&node, &services), http());

    let snapshot = context.try_fetch_market_assets().await.unwrap();

    assert_eq!(snapshot.rows[0].price, 3.1);
    assert!(matches!(
        snapshot.price_feed,
        PriceFeedStatus::Unavailable { .. }
    ));
}

#[tokio::test]
async fn test_wrong_chain_is_refused() {
    let counters = Arc::new(NodeCounters::default());
    let node = spawn(sui_node("4c78adac", counters.clone())).await;
    let services = spawn(market_services(true)).await;
    let context = ProtocolContext::with_http(stub_config(&node, &services), http());

    let err = context.try_fetch_market_assets().await.unwrap_err();
    assert!(matches!(err, MarketError::Unavailable(_)));
    assert!(context.fetch_market_assets().await.is_empty());

    // A failed connection is retried on the next call.
    assert_eq!(counters.chain_id_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_context_balance_sums_all_pages() {
    let counters = Arc::new(NodeCounters::default());
    let node = spawn(sui_node("35834a8a", counters.clone())).await;
    let services = spawn(market_services(true)).await;
    let context = ProtocolContext::with_http(stub_config(&node, &services), http());

    assert_eq!(context.lookup_balance(OWNER, SUI_TYPE, 9).await, 1.5);
    assert_eq!(context.lookup_balance(OWNER, USDC_TYPE, 6).await, 2.5);
    assert_eq!(context.lookup_balance(OWNER, "0x9::none::NONE", 9).await, 0.0);
    assert_eq!(context.lookup_balance("0xb0b", SUI_TYPE, 9).await, 0.0);
    assert_eq!(counters.coin_calls.load(Ordering::SeqCst), 2 + 2 + 2 + 1);
}

#[tokio::test]
async fn test_balance_is_zero_when_node_unreachable() {
    let services = spawn(market_services(true)).await;
    let context =
        ProtocolContext::with_http(stub_config("http://127.0.0.1:1", &services), http());

    assert_eq!(context.lookup_balance(OWNER, SUI_TYPE, 9).await, 0.0);
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_connection() {
    let counters = Arc::new(NodeCounters::default());
    let node = spawn(sui_node("35834a8a", counters.clone())).await;
    let services = spawn(market_services(true)).await;
    let context = ProtocolContext::with_http(stub_config(&node, &services), http());

    let (a, b, c, d) = tokio::join!(
        context.client(),
        context.client(),
        context.client(),
        context.client()
    );

    let a = a.unwrap();
    for other in [b.unwrap(), c.unwrap(), d.unwrap()] {
        assert!(Arc::ptr_eq(&a, &other));
    }
    assert_eq!(counters.chain_id_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_coin_inventory_past_page_limit_is_an_error() {
    let counters = Arc::new(NodeCounters::default());
    let node = spawn(sui_node("35834a8a", counters.clone())).await;
    let rpc = SuiRpc::new(http(), node.clone());

    let err = rpc.get_all_coins(WHALE).await.unwrap_err();
    assert!(matches!(err, RpcError::CoinPageLimit { pages: 100, .. }));
    assert_eq!(counters.coin_calls.load(Ordering::SeqCst), 100);

    // Treated as a failed lookup rather than an understated balance.
    let services = spawn(market_services(true)).await;
    let context = ProtocolContext::with_http(stub_config(&node, &services), http());
    assert_eq!(context.lookup_balance(WHALE, SUI_TYPE, 9).await, 0.0);
}
