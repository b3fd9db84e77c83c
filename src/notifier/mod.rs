mod console;
mod speech;

pub use console::{render_alerts, ConsoleNotifier};
pub use speech::{speaker_from_config, LogSpeaker, Speaker};

#[cfg(feature = "speech")]
pub use speech::TtsSpeaker;

use crate::domain::AlertRecord;

/// Fans user-facing output out to the console and the speech engine.
pub struct NotifierHub {
    console: ConsoleNotifier,
    speaker: Box<dyn Speaker>,
}

impl NotifierHub {
    pub fn new(console: ConsoleNotifier, speaker: Box<dyn Speaker>) -> Self {
        Self { console, speaker }
    }

    pub fn announce_alerts(&mut self, alerts: &[AlertRecord]) {
        self.console.show_alerts(alerts);
        if alerts.is_empty() {
            self.speaker.speak("There are no current alerts.");
            self.speaker.speak("Please check the official site for updates.");
        } else {
            self.speaker.speak("Here are the current Amber Alerts.");
        }
    }

    pub fn print(&self, message: &str) {
        self.console.say(message);
    }

    pub fn speak(&mut self, text: &str) {
        self.speaker.speak(text);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Speaker;
    use std::sync::{Arc, Mutex};

    /// Records utterances so tests can assert on what was spoken.
    #[derive(Clone, Default)]
    pub struct RecordingSpeaker {
        pub spoken: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSpeaker {
        pub fn lines(&self) -> Vec<String> {
            self.spoken.lock().unwrap().clone()
        }
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&mut self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }
}
