use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::api::state::AppState;

/// Largest request body forwarded upstream.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Forward `<prefix>/<rest>` to `<upstream>/<rest>`, keeping method, query,
/// body and headers. `Host` and `Origin` are dropped so the upstream sees a
/// same-origin request for its own host.
pub async fn forward(State(state): State<AppState>, req: Request) -> Result<Response, ApiError> {
    let target = &state.inner.forward;
    let (parts, body) = req.into_parts();

    let rest = parts
        .uri
        .path()
        .strip_prefix(target.prefix.as_str())
        .unwrap_or("");
    let mut url = format!("{}{}", target.upstream, rest);
    if let Some(query) = parts.uri.query() {
        url.push('?');
        url.push_str(query);
    }

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("reading request body: {e}")))?;

    let mut headers = parts.headers;
    strip_hop_headers(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::ORIGIN);
    headers.remove(header::CONTENT_LENGTH);

    debug!(method = %parts.method, %url, "forwarding request");

    let upstream = target
        .http
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            warn!(%url, error = %e, "upstream request failed");
            ApiError::BadGateway(format!("upstream request failed: {e}"))
        })?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_headers(&mut headers);
    // The local CORS layer owns these.
    let cors: Vec<_> = headers
        .keys()
        .filter(|name| name.as_str().starts_with("access-control-"))
        .cloned()
        .collect();
    for name in cors {
        headers.remove(name);
    }

    let body = Body::from_stream(upstream.bytes_stream());
    Ok((status, headers, body).into_response())
}

/// Drop headers that describe one hop and must not cross the proxy.
fn strip_hop_headers(headers: &mut HeaderMap) {
    let hop = [
        header::CONNECTION,
        header::TRANSFER_ENCODING,
        header::TE,
        header::TRAILER,
        header::UPGRADE,
        header::PROXY_AUTHORIZATION,
        header::PROXY_AUTHENTICATE,
    ];
    for name in hop {
        headers.remove(name);
    }
}
