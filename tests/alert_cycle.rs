//! Full fetch, announce and confirm cycles against a mocked feed server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use amber_alerts::dialog::{
    ConfirmationDialog, Decision, DisabledVoice, Opener, RecognitionError, Recognizer, Recorder,
    TypedResponse, VoiceResponse,
};
use amber_alerts::feed::FeedFetcher;
use amber_alerts::notifier::{ConsoleNotifier, NotifierHub, Speaker};
use amber_alerts::watcher::AlertWatcher;
use async_trait::async_trait;

const SITE: &str = "https://ohioamberplan.org/";

const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Ohio Amber Alerts</title>
  <item><title>Alert A</title><link>http://x/a</link></item>
  <item><title>Alert B</title></item>
</channel></rss>"#;

#[derive(Clone, Default)]
struct Spoken(Arc<Mutex<Vec<String>>>);

impl Speaker for Spoken {
    fn speak(&mut self, text: &str) {
        self.0.lock().unwrap().push(text.to_string());
    }
}

#[derive(Clone, Default)]
struct Opened(Arc<Mutex<Vec<String>>>);

impl Opener for Opened {
    fn open(&self, url: &str) {
        self.0.lock().unwrap().push(url.to_string());
    }
}

struct SilentMic;

#[async_trait]
impl Recorder for SilentMic {
    async fn record(&mut self, _max: Duration) -> Result<Vec<u8>, RecognitionError> {
        Ok(vec![0; 32])
    }
}

struct Offline;

#[async_trait]
impl Recognizer for Offline {
    async fn recognize(&self, _audio: Vec<u8>) -> Result<String, RecognitionError> {
        Err(RecognitionError::ServiceUnavailable("no route to host".to_string()))
    }
}

struct Hears(&'static str);

#[async_trait]
impl Recognizer for Hears {
    async fn recognize(&self, _audio: Vec<u8>) -> Result<String, RecognitionError> {
        Ok(self.0.to_string())
    }
}

fn watcher(
    feed_url: String,
    recognizer: Option<Box<dyn Recognizer>>,
    typed: &'static [u8],
    spoken: &Spoken,
    opened: &Opened,
) -> AlertWatcher {
    let voice: Box<dyn amber_alerts::dialog::ResponseSource> = match recognizer {
        Some(recognizer) => Box::new(VoiceResponse::new(
            Box::new(SilentMic),
            recognizer,
            Duration::from_secs(5),
        )),
        None => Box::new(DisabledVoice),
    };
    let dialog = ConfirmationDialog::new(
        voice,
        Box::new(TypedResponse::new(typed)),
        Box::new(opened.clone()),
        SITE,
    );
    let notifier = NotifierHub::new(ConsoleNotifier::new(), Box::new(spoken.clone()));
    AlertWatcher::new(FeedFetcher::new(feed_url), notifier, dialog)
}

#[tokio::test]
async fn unavailable_recognizer_falls_back_to_typed_yes() {
    let mut server = mockito::Server::new_async().await;
    let feed = server
        .mock("GET", "/AmberAlert/")
        .with_status(200)
        .with_body(FEED)
        .expect(1)
        .create_async()
        .await;

    let spoken = Spoken::default();
    let opened = Opened::default();
    let mut app = watcher(
        format!("{}/AmberAlert/", server.url()),
        Some(Box::new(Offline)),
        b"yes\n",
        &spoken,
        &opened,
    );

    assert_eq!(app.run().await, Decision::OpenedWebsite);

    feed.assert_async().await;
    assert_eq!(*opened.0.lock().unwrap(), vec![SITE.to_string()]);
    assert_eq!(
        *spoken.0.lock().unwrap(),
        vec![
            "Here are the current Amber Alerts.".to_string(),
            "Would you like to see the website?".to_string(),
            "Opening the official Amber Alert website for you.".to_string(),
        ]
    );
}

#[tokio::test]
async fn sure_is_heard_but_not_taken_as_yes() {
    let mut server = mockito::Server::new_async().await;
    let _feed = server
        .mock("GET", "/")
        .with_status(200)
        .with_body(FEED)
        .create_async()
        .await;

    let spoken = Spoken::default();
    let opened = Opened::default();
    // Typed input would say yes, but a recognized voice answer is never re-asked.
    let mut app = watcher(server.url(), Some(Box::new(Hears("Sure"))), b"yes\n", &spoken, &opened);

    assert_eq!(app.run().await, Decision::Declined);
    assert!(opened.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn feed_outage_still_asks_about_the_website() {
    let mut server = mockito::Server::new_async().await;
    let _feed = server
        .mock("GET", "/")
        .with_status(502)
        .create_async()
        .await;

    let spoken = Spoken::default();
    let opened = Opened::default();
    let mut app = watcher(server.url(), None, b"no\n", &spoken, &opened);

    assert_eq!(app.run().await, Decision::Declined);
    assert_eq!(
        *spoken.0.lock().unwrap(),
        vec![
            "There are no current alerts.".to_string(),
            "Please check the official site for updates.".to_string(),
            "Would you like to see the website?".to_string(),
        ]
    );
    assert!(opened.0.lock().unwrap().is_empty());
}
