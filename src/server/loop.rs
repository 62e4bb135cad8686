// Server loop module
// Accepts connections until the shutdown future completes

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Serve connections from `listener` until `shutdown` resolves
///
/// `shutdown` yields the name of whatever stopped the server, which is
/// logged. Connections still in flight keep running on their own tasks.
pub async fn serve_until<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            signal = &mut shutdown => {
                logger::log_shutdown(signal);
                return;
            }
        }
    }
}
