//! Proxy list files.

use std::path::Path;

use log::{error, warn};

use super::pool::ProxyEndpoint;

/// Reads `host:port` proxies from a newline-separated file.
///
/// Lines are trimmed and blank lines skipped. Malformed lines are logged and
/// dropped. A missing or unreadable file is logged and yields an empty list.
pub fn load_from_file(path: impl AsRef<Path>) -> Vec<ProxyEndpoint> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            error!("Can't read proxies from {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let proxies: Vec<ProxyEndpoint> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match line.parse::<ProxyEndpoint>() {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("Wrong format for proxy \"{}\": {}", line, e);
                None
            }
        })
        .collect();

    if proxies.is_empty() {
        error!("Didn't find any proxies in {}", path.display());
    }
    proxies
}
