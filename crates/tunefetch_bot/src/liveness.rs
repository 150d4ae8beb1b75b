//! Health-check HTTP responder. Runs on its own thread and runtime so it keeps
//! answering while conversations are busy downloading.

use std::io;
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

use axum::routing::get;
use axum::Router;
use tunefetch_logging::{tune_error, tune_info};

pub const LIVENESS_BODY: &str = "Bot is running!";

pub fn router() -> Router {
    Router::new().route("/", get(|| async { LIVENESS_BODY }))
}

#[derive(Debug)]
pub struct LivenessServer {
    addr: SocketAddr,
    _thread: JoinHandle<()>,
}

impl LivenessServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Binds `0.0.0.0:port` on the calling thread so bind errors surface at
/// startup, then serves on a dedicated thread. Port 0 picks a free port.
pub fn spawn(port: u16) -> io::Result<LivenessServer> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;

    let thread = thread::Builder::new()
        .name("liveness".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    tune_error!("liveness runtime setup failed: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                let listener = match tokio::net::TcpListener::from_std(listener) {
                    Ok(listener) => listener,
                    Err(err) => {
                        tune_error!("liveness listener setup failed: {}", err);
                        return;
                    }
                };
                tune_info!("liveness endpoint listening on http://{}", addr);
                if let Err(err) = axum::serve(listener, router()).await {
                    tune_error!("liveness endpoint stopped: {}", err);
                }
            });
        })?;

    Ok(LivenessServer {
        addr,
        _thread: thread,
    })
}
