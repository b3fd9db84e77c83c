use tracing::{info, warn};

/// Launches a URL in whatever the desktop considers the default browser.
pub trait Opener: Send {
    fn open(&self, url: &str);
}

#[derive(Debug, Clone, Default)]
pub struct BrowserOpener;

impl Opener for BrowserOpener {
    fn open(&self, url: &str) {
        match open::that_detached(url) {
            Ok(()) => info!("🌐 Opened {}", url),
            Err(e) => warn!("⚠️  Could not open browser for {}: {}", url, e),
        }
    }
}
