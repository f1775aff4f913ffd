//! Length-prefixed JSON-over-TCP RPC facade (`pm0-wire` does the framing).

mod handlers;

use pm0_core::Clock;
use tokio::net::TcpListener;
use tracing::{debug, warn};

use crate::supervisor::Supervisor;

/// Accept connections forever, handling each on its own task. One request
/// per connection; bulk and log-follow requests reply with a stream of
/// frames before the connection closes (or, for follow, until the client
/// disconnects).
pub async fn serve<C: Clock + 'static>(listener: TcpListener, sup: Supervisor<C>) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!(error = %e, "failed to accept RPC connection");
                continue;
            }
        };
        debug!(%addr, "accepted RPC connection");
        let sup = sup.clone();
        tokio::spawn(async move {
            handlers::handle_connection(stream, sup).await;
        });
    }
}
