use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::handler;
use crate::state::AppState;

/// Bind the configured address and serve until shutdown is signalled.
pub async fn run(state: Arc<AppState>, shutdown_rx: watch::Receiver<bool>) -> anyhow::Result<()> {
    let addr = SocketAddr::new(state.config.bind, state.config.port);
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "listening");

    serve(listener, state, shutdown_rx).await
}

/// Accept loop over an already bound listener.
///
/// Each connection gets its own task; requests share nothing but the
/// read-only [`AppState`].
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                debug!(peer = %peer_addr, "new connection");

                let state = Arc::clone(&state);
                tokio::task::spawn(serve_connection(stream, peer_addr, state));
            }
            _ = shutdown_rx.changed() => {
                info!("server shutting down");
                break;
            }
        }
    }

    Ok(())
}

async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let service = service_fn(move |req: Request<Incoming>| {
        let state = Arc::clone(&state);
        async move { Ok::<_, Infallible>(handler::handle(req, peer_addr, &state).await) }
    });

    if let Err(e) = http1::Builder::new()
        .serve_connection(TokioIo::new(stream), service)
        .await
    {
        debug!(peer = %peer_addr, error = %e, "connection error");
    }
}
