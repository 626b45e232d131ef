use std::sync::Arc;
use std::time::Duration;

use scallop_dash::market::MarketBoard;
use scallop_dash::model::MarketRow;

fn row(symbol: &str) -> MarketRow {
    MarketRow {
        symbol: symbol.to_string(),
        coin_type: format!("0x1::{}::{}", symbol.to_lowercase(), symbol),
        decimals: 9,
        price: 1.0,
        total_supply: 0.0,
        total_borrow: 0.0,
        utilization: 0.0,
        deposit_apy: 0.0,
        borrow_apy: 0.0,
    }
}

#[tokio::test]
async fn test_slow_older_fetch_is_discarded() {
    let board = MarketBoard::new();
    let first = board.begin();
    let second = board.begin();

    assert!(board.publish(second, vec![row("NEW")]).await);
    assert!(!board.publish(first, vec![row("OLD")]).await);

    assert_eq!(board.rows().await, vec![row("NEW")]);
    assert_eq!(board.applied().await, second.seq());
}

#[tokio::test]
async fn test_older_fetch_finishing_first_is_not_applied() {
    let board = MarketBoard::new();
    let first = board.begin();
    let second = board.begin();

    assert!(!board.publish(first, vec![row("OLD")]).await);
    assert!(board.rows().await.is_empty());
    assert_eq!(board.applied().await, 0);

    assert!(board.publish(second, vec![row("NEW")]).await);
    assert_eq!(board.rows().await, vec![row("NEW")]);
}

#[tokio::test]
async fn test_rows_replaced_wholesale() {
    let board = MarketBoard::new();
    let t = board.begin();
    board.publish(t, vec![row("A"), row("B")]).await;

    let t = board.begin();
    board.publish(t, vec![row("C")]).await;

    assert_eq!(board.rows().await, vec![row("C")]);
}

#[tokio::test]
async fn test_overlapping_tasks_latest_initiated_wins() {
    let board = Arc::new(MarketBoard::new());

    let slow = {
        let board = board.clone();
        let ticket = board.begin();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            board.publish(ticket, vec![row("SLOW")]).await
        })
    };
    let fast = {
        let board = board.clone();
        let ticket = board.begin();
        tokio::spawn(async move { board.publish(ticket, vec![row("FAST")]).await })
    };

    assert!(fast.await.unwrap());
    assert!(!slow.await.unwrap());
    assert_eq!(board.rows().await, vec![row("FAST")]);
}

#[tokio::test]
async fn test_snapshot_pairs_rows_with_their_sequence() {
    let board = Arc::new(MarketBoard::new());
    assert_eq!(board.snapshot().await, (0, Vec::new()));

    let mut publishers = Vec::new();
    for i in 0..20 {
        let board = board.clone();
        publishers.push(tokio::spawn(async move {
            let ticket = board.begin();
            tokio::time::sleep(Duration::from_millis(i % 3)).await;
            board.publish(ticket, vec![row(&format!("T{}", ticket.seq()))]).await;
        }));
    }

    // Rows published under ticket n are named `Tn`; every read must agree.
    for _ in 0..50 {
        let (seq, rows) = board.snapshot().await;
        if seq == 0 {
            assert!(rows.is_empty());
        } else {
            assert_eq!(rows, vec![row(&format!("T{seq}"))]);
        }
        tokio::task::yield_now().await;
    }

    for publisher in publishers {
        publisher.await.unwrap();
    }
    let (seq, rows) = board.snapshot().await;
    assert_eq!(rows, vec![row(&format!("T{seq}"))]);
}
