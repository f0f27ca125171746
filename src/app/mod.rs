//! Main application modules.
//!
//! Proxy gathering, Ctrl-C handling and statistics printing used by the
//! command-line run.

pub mod proxies;
pub mod shutdown;
pub mod statistics;

// Re-export public API
pub use proxies::gather_proxies;
pub use shutdown::cancel_on_ctrl_c;
pub use statistics::{print_crawl_statistics, print_proxy_summary};
