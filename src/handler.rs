use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE, USER_AGENT};
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use crate::client_ip;
use crate::geo::GeoRecord;
use crate::state::AppState;
use crate::user_agent::{self, ClientIdentity};

/// Body sent when the lookup fails. Error details only go to the log.
pub const LOOKUP_FAILED: &str = "failed to retrieve geolocation information";

/// Everything returned to the client for one request.
#[derive(Debug, Serialize)]
pub struct ResponseRecord {
    #[serde(flatten)]
    pub geo: GeoRecord,
    pub user_agent: ClientIdentity,
}

/// Handle one request to completion. Every path and method gets the same answer.
///
/// Flow: resolve client address -> parse user agent -> provider lookup -> JSON.
/// A failed lookup ends the request with a plain-text 500.
pub async fn handle<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let (ip, source) = client_ip::resolve_with_source(req.headers(), &peer_addr.to_string());

    let raw_agent = req
        .headers()
        .get(USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .unwrap_or_default();
    let identity = user_agent::parse(&raw_agent);

    let geo = match state.geo.lookup(&ip).await {
        Ok(geo) => geo,
        Err(e) => {
            error!(ip = %ip, peer = %peer_addr, error = %e, "geolocation lookup failed");
            return plain(StatusCode::INTERNAL_SERVER_ERROR, LOOKUP_FAILED);
        }
    };

    debug!(
        ip = %ip,
        source = %source,
        product = %identity.product,
        country = %geo.country_iso,
        "lookup ok"
    );

    let record = ResponseRecord {
        geo,
        user_agent: identity,
    };
    match serde_json::to_vec(&record) {
        Ok(mut body) => {
            body.push(b'\n');
            let mut resp = Response::new(Full::new(Bytes::from(body)));
            resp.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            resp
        }
        Err(e) => {
            error!(ip = %ip, error = %e, "failed to serialize response");
            plain(StatusCode::INTERNAL_SERVER_ERROR, LOOKUP_FAILED)
        }
    }
}

fn plain(status: StatusCode, msg: &'static str) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::from_static(msg.as_bytes())));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp
}
