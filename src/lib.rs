pub mod config;
pub mod dialog;
pub mod domain;
pub mod feed;
pub mod notifier;
pub mod utils;
pub mod watcher;

use config::AppConfig;
use dialog::{
    BrowserOpener, ConfirmationDialog, DisabledVoice, ResponseSource, TypedResponse, VoiceResponse,
};
use feed::FeedFetcher;
use notifier::{speaker_from_config, ConsoleNotifier, NotifierHub};
use watcher::AlertWatcher;

use anyhow::Result;
use tracing::info;

pub async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    let fetcher = FeedFetcher::new(config.feed_url.clone());
    let notifier = NotifierHub::new(ConsoleNotifier::new(), speaker_from_config(&config));

    let voice: Box<dyn ResponseSource> = match &config.recognition_url {
        Some(url) => Box::new(VoiceResponse::from_parts(
            &config.record_command,
            url,
            &config.recognition_content_type,
            config.listen_duration,
        )?),
        None => {
            info!("🎙️  Voice input disabled (SPEECH_RECOGNITION_URL not set)");
            Box::new(DisabledVoice)
        }
    };
    let dialog = ConfirmationDialog::new(
        voice,
        Box::new(TypedResponse::stdin()),
        Box::new(BrowserOpener),
        config.website_url.clone(),
    );

    let mut app = AlertWatcher::new(fetcher, notifier, dialog);
    app.run().await;
    Ok(())
}
