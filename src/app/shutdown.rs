//! Ctrl-C handling.

use log::warn;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `token` on the first Ctrl-C.
///
/// Running crawls stop at their next listing page or offer and keep what
/// they collected. Abort the returned handle once the run is over.
pub fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, saving the products collected so far");
            token.cancel();
        }
    })
}
