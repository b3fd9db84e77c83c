use crate::dialog::{ConfirmationDialog, Decision};
use crate::feed::FeedFetcher;
use crate::notifier::NotifierHub;
use tracing::info;

/// One fetch, display and confirm cycle.
pub struct AlertWatcher {
    fetcher: FeedFetcher,
    notifier: NotifierHub,
    dialog: ConfirmationDialog,
}

impl AlertWatcher {
    pub fn new(fetcher: FeedFetcher, notifier: NotifierHub, dialog: ConfirmationDialog) -> Self {
        Self {
            fetcher,
            notifier,
            dialog,
        }
    }

    pub async fn run(&mut self) -> Decision {
        info!("🔎 Checking {} for Amber Alerts", self.fetcher.url());
        let alerts = self.fetcher.fetch().await;

        self.notifier.announce_alerts(&alerts);

        let decision = self.dialog.run(&mut self.notifier, alerts.len()).await;
        info!("✅ Done ({:?})", decision);
        decision
    }
}
