//! Local stand-in for the geolocation provider.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

/// Serve `respond(path)` on an ephemeral loopback port until the runtime stops.
pub async fn spawn_provider<F>(respond: F) -> SocketAddr
where
    F: Fn(&str) -> (StatusCode, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let respond = Arc::clone(&respond);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let (status, body) = (*respond)(req.uri().path());
                    async move {
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Full::new(Bytes::from(body)))
                                .unwrap(),
                        )
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    addr
}

/// Echo provider: answers `/json/<ip>` with a full record for `<ip>`.
pub async fn spawn_echo_provider() -> SocketAddr {
    spawn_provider(|path| {
        let ip = path.rsplit('/').next().unwrap_or_default();
        let body = serde_json::json!({
            "ip": ip,
            "ip_decimal": 16843009,
            "country": "Australia",
            "country_code": "AU",
            "is_in_european_union": false,
            "region": "Queensland",
            "region_code": "QLD",
            "city": "Brisbane",
            "latitude": -27.4679,
            "longitude": 153.0281,
            "timezone": "Australia/Brisbane",
            "asn": "AS13335",
            "asn_org": "Cloudflare, Inc."
        });
        (StatusCode::OK, body.to_string())
    })
    .await
}

/// An address that refuses connections.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A client that ignores `HTTP_PROXY` style variables of the test environment.
pub fn direct_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
