use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::MarketsResponse;

/// Start a fresh fetch and answer with whatever the board holds once it
/// resolves. A fetch overtaken by a newer request is not applied.
pub async fn get_markets(State(state): State<AppState>) -> Json<MarketsResponse> {
    let inner = &state.inner;
    let ticket = inner.board.begin();

    let (rows, price_feed, error) = match inner.context.try_fetch_market_assets().await {
        Ok(snapshot) => (snapshot.rows, Some(snapshot.price_feed), None),
        Err(e) => {
            warn!(error = %e, ticket = ticket.seq(), "market fetch failed");
            (Vec::new(), None, Some(e.to_string()))
        }
    };

    let applied = inner.board.publish(ticket, rows).await;
    let (seq, rows) = inner.board.snapshot().await;

    Json(MarketsResponse {
        seq,
        superseded: !applied,
        rows,
        price_feed: if applied { price_feed } else { None },
        error: if applied { error } else { None },
    })
}
