//! The "do you want to see the website?" exchange that closes every run.

mod input;
mod opener;
mod voice;

pub use input::{
    Channel, Fallback, Response, ResponseSource, StatusSink, StdoutStatus, TypedResponse,
};
pub use opener::{BrowserOpener, Opener};
pub use voice::{
    parse_transcript, CommandRecorder, DisabledVoice, HttpRecognizer, RecognitionError,
    Recognizer, Recorder, VoiceResponse, LISTENING_NOTICE, NOT_UNDERSTOOD_NOTICE,
};

use tracing::{debug, info};

use crate::notifier::NotifierHub;

/// Answers accepted from voice without asking again.
pub const RECOGNIZED_RESPONSES: [&str; 10] = [
    "yes",
    "no",
    "y",
    "n",
    "sure",
    "nope",
    "absolutely",
    "definitely",
    "no way",
    "not at all",
];

/// The only answers that open the website. "sure" and "absolutely" are recognized
/// above but deliberately do not count here.
pub const AFFIRMATIVE_RESPONSES: [&str; 2] = ["yes", "y"];

pub const VOICE_PROMPT: &str = "Would you like to see the website?";
pub const QUESTION: &str = "Do you want to see the website?";
pub const FALLBACK_PROMPT: &str = "Could not understand your voice. Please type yes or no: ";
pub const CLARIFY_NOTICE: &str = "Did you mean yes or no? Please type your answer.";
pub const CLARIFY_PROMPT: &str = "Type yes or no: ";
pub const OPENING_NOTICE: &str = "Opening the official Amber Alert website for you.";
pub const DECLINED_NOTICE: &str = "No problem, lets keep working.";

pub fn is_recognized(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    RECOGNIZED_RESPONSES.contains(&answer.as_str())
}

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE_RESPONSES.contains(&answer.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    OpenedWebsite,
    Declined,
}

pub type DialogInput = Fallback<Box<dyn ResponseSource>, Box<dyn ResponseSource>>;

pub struct ConfirmationDialog {
    input: DialogInput,
    opener: Box<dyn Opener>,
    website_url: String,
}

impl ConfirmationDialog {
    pub fn new(
        voice: Box<dyn ResponseSource>,
        typed: Box<dyn ResponseSource>,
        opener: Box<dyn Opener>,
        website_url: impl Into<String>,
    ) -> Self {
        Self {
            input: Fallback::new(voice, typed, FALLBACK_PROMPT),
            opener,
            website_url: website_url.into(),
        }
    }

    pub async fn run(&mut self, notifier: &mut NotifierHub, alert_count: usize) -> Decision {
        debug!("Asking about the website after {} alert(s)", alert_count);
        notifier.speak(VOICE_PROMPT);
        notifier.print(QUESTION);

        let answer = match self.input.respond(VOICE_PROMPT).await {
            Some(response) if response.channel == Channel::Voice && !is_recognized(&response.text) => {
                info!("Voice answer {:?} is not a yes/no, asking to type it", response.text);
                notifier.print(CLARIFY_NOTICE);
                self.input
                    .secondary_mut()
                    .respond(CLARIFY_PROMPT)
                    .await
                    .map(|r| r.text)
            }
            other => other.map(|r| r.text),
        };

        match answer.as_deref() {
            Some(text) if is_affirmative(text) => {
                self.opener.open(&self.website_url);
                notifier.speak(OPENING_NOTICE);
                Decision::OpenedWebsite
            }
            _ => {
                notifier.print(DECLINED_NOTICE);
                Decision::Declined
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    pub(crate) use super::input::testing::ScriptedSource;
    use super::Opener;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub struct RecordingOpener {
        pub opened: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingOpener {
        pub fn urls(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    impl Opener for RecordingOpener {
        fn open(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }
    }
}
