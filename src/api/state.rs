use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::context::ProtocolContext;
use crate::market::MarketBoard;

#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub context: Arc<ProtocolContext>,
    /// Latest-wins market rows served by `/api/markets`.
    pub board: MarketBoard,
    pub forward: ForwardTarget,
}

/// Where `/sui/*` requests go.
pub struct ForwardTarget {
    pub prefix: String,
    pub upstream: String,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(context: Arc<ProtocolContext>, proxy: &ProxyConfig) -> Self {
        Self::with_http(context, proxy, reqwest::Client::new())
    }

    pub fn with_http(
        context: Arc<ProtocolContext>,
        proxy: &ProxyConfig,
        http: reqwest::Client,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                context,
                board: MarketBoard::new(),
                forward: ForwardTarget {
                    prefix: normalize_prefix(&proxy.prefix),
                    upstream: proxy.upstream.trim_end_matches('/').to_string(),
                    http,
                },
            }),
        }
    }
}

/// `sui`, `/sui/` and `/sui` all become `/sui`.
fn normalize_prefix(prefix: &str) -> String {
    format!("/{}", prefix.trim_matches('/'))
}
