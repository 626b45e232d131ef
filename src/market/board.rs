use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::debug;

use crate::model::MarketRow;

/// Identity of one market fetch, issued when the fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct BoardState {
    /// Ticket whose rows are displayed; 0 before the first publish.
    applied: u64,
    rows: Vec<MarketRow>,
}

/// Displayed market rows under overlapping refreshes.
///
/// Every fetch takes a ticket before it starts. A completed fetch replaces
/// the rows only if its ticket is still the most recently issued one, so a
/// slow response can never overwrite data from a request started after it.
#[derive(Debug, Default)]
pub struct MarketBoard {
    issued: AtomicU64,
    state: RwLock<BoardState>,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Replace the rows wholesale if `ticket` is the latest issued.
    /// Returns whether the rows were applied.
    pub async fn publish(&self, ticket: FetchTicket, rows: Vec<MarketRow>) -> bool {
        let mut state = self.state.write().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket.0 != latest {
            debug!(ticket = ticket.0, latest, "discarding stale market fetch");
            return false;
        }
        state.applied = ticket.0;
        state.rows = rows;
        true
    }

    pub async fn rows(&self) -> Vec<MarketRow> {
        self.state.read().await.rows.clone()
    }

    /// Sequence number of the displayed rows; 0 if nothing was published yet.
    pub async fn applied(&self) -> u64 {
        self.state.read().await.applied
    }

    /// Sequence number and rows read under one guard, so they always match.
    pub async fn snapshot(&self) -> (u64, Vec<MarketRow>) {
        let state = self.state.read().await;
        (state.applied, state.rows.clone())
    }
}
