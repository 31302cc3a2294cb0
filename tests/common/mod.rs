//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{header, HeaderName, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use prerender_gate::config::{PrerenderConfig, TimeoutConfig};
use prerender_gate::http::HttpServer;
use prerender_gate::lifecycle::Shutdown;
use prerender_gate::prerender::PrerenderState;

/// A request as seen by the mock rendering service.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub uri: String,
    pub user_agent: Option<String>,
    pub token: Option<String>,
    pub authorization: Option<String>,
}

pub type Log = Arc<Mutex<Vec<Recorded>>>;

fn header_string(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

async fn render(State(log): State<Log>, req: Request) -> Response {
    let uri = req.uri().to_string();
    log.lock().unwrap().push(Recorded {
        uri: uri.clone(),
        user_agent: header_string(&req, "user-agent"),
        token: header_string(&req, "x-prerender-token"),
        authorization: header_string(&req, "authorization"),
    });

    if uri.contains("redirect") {
        return (
            StatusCode::FOUND,
            [(header::LOCATION, "https://example.com/foo")],
            "moved",
        )
            .into_response();
    }
    if uri.contains("missing") {
        return (StatusCode::NOT_FOUND, "<html>not found</html>").into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (HeaderName::from_static("x-rendered-by"), "mock"),
        ],
        AppendHeaders([(header::SET_COOKIE, "a=1"), (header::SET_COOKIE, "b=2")]),
        "<html><body>rendered</body></html>",
    )
        .into_response()
}

/// Start a mock rendering service that records every request it receives.
pub async fn start_render_service() -> (SocketAddr, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(render).with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, log)
}

/// Start a backend that promises more body than it sends, then hangs up.
pub async fn start_truncating_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;
                        let response =
                            "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n<html>";
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start the gate in front of `app`, returning its address.
pub async fn start_gate(config: PrerenderConfig, app: Router) -> (SocketAddr, Shutdown) {
    start_gate_on("127.0.0.1:0", config, app).await
}

/// Start the gate on `bind`, returning a loopback address that reaches it.
pub async fn start_gate_on(bind: &str, config: PrerenderConfig, app: Router) -> (SocketAddr, Shutdown) {
    let timeouts = TimeoutConfig::default();
    let state = PrerenderState::with_timeouts(config, &timeouts).unwrap();
    let listener = TcpListener::bind(bind).await.unwrap();
    let addr = SocketAddr::from(([127, 0, 0, 1], listener.local_addr().unwrap().port()));

    let shutdown = Shutdown::new();
    let server = HttpServer::new(app, state, &timeouts);
    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Send `request` verbatim and return everything the server writes back.
pub async fn send_raw(addr: SocketAddr, request: &str) -> String {
    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    let _ = tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response)).await;
    String::from_utf8_lossy(&response).into_owned()
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
