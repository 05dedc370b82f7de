//! The HTTP server: a hyper accept loop that hands every request to the `Router`.

mod router;

pub use router::Router;

use crate::api::{self, Mode};
use crate::error::Res;
use crate::store::Store;
use crate::Config;
use anyhow::Context;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Serves the reporting API on the configured address until Ctrl-C is received, then closes the
/// database.
pub async fn run(config: Config, mode: Mode) -> Res<()> {
    let addr = config.bind_address()?;
    let store: Arc<dyn Store> = Arc::new(config.db().clone());
    let feed = api::feed(&config, mode)?;
    let router = Arc::new(Router::new(store, feed, config.request_timeout()));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Unable to listen on {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    let result = tokio::select! {
        result = serve(listener, router) => result,
        signal = tokio::signal::ctrl_c() => {
            info!("Shutting down");
            signal.context("Unable to listen for Ctrl-C")
        }
    };
    config.db().close().await;
    result
}

/// Accepts connections on `listener` forever, serving each one on its own task.
async fn serve(listener: TcpListener, router: Arc<Router>) -> Res<()> {
    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to accept connection: {e}");
                continue;
            }
        };
        debug!("Accepted connection from {remote_addr}");

        let io = TokioIo::new(stream);
        let router = router.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let router = router.clone();
                async move { Ok::<_, Infallible>(router.route(req).await) }
            });
            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                debug!("Error serving connection from {remote_addr}: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestFeed;
    use crate::test::{may_example, TestEnv};
    use std::time::Duration;

    #[tokio::test]
    async fn test_serve_answers_over_tcp() {
        let env = TestEnv::with_records(&may_example()).await;
        let router = Arc::new(Router::new(
            env.store(),
            Arc::new(TestFeed::default()),
            Duration::from_secs(30),
        ));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, router));

        let url = format!("http://{addr}/transactions/statistics?month=5");
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let bytes = response.bytes().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["totalSaleAmount"], 50.0);

        let url = format!("http://{addr}/transactions/statistics");
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        server.abort();
    }
}
