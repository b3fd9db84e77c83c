use tracing::info;

#[cfg(feature = "speech")]
use tracing::warn;

use crate::config::AppConfig;

/// Speech output. Implementations block until the utterance has finished.
pub trait Speaker {
    fn speak(&mut self, text: &str);
}

/// Stand-in used when no speech engine is available: utterances go to the log.
#[derive(Debug, Clone, Default)]
pub struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&mut self, text: &str) {
        info!("🔊 {}", text);
    }
}

#[cfg(feature = "speech")]
pub struct TtsSpeaker {
    tts: tts::Tts,
}

#[cfg(feature = "speech")]
impl TtsSpeaker {
    pub fn new(rate: Option<f32>, volume: Option<f32>) -> Result<Self, tts::Error> {
        let mut tts = tts::Tts::default()?;
        let rate = rate
            .unwrap_or_else(|| tts.normal_rate())
            .clamp(tts.min_rate(), tts.max_rate());
        tts.set_rate(rate)?;
        if let Some(volume) = volume {
            let volume = volume.clamp(tts.min_volume(), tts.max_volume());
            tts.set_volume(volume)?;
        }
        Ok(Self { tts })
    }

    fn wait_until_done(&self) {
        // Backends without is_speaking return an error; nothing left to wait on then.
        while let Ok(true) = self.tts.is_speaking() {
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
    }
}

#[cfg(feature = "speech")]
impl Speaker for TtsSpeaker {
    fn speak(&mut self, text: &str) {
        match self.tts.speak(text, false) {
            Ok(_) => self.wait_until_done(),
            Err(e) => warn!("⚠️  Speech synthesis failed: {}", e),
        }
    }
}

/// Picks the native engine when compiled in and working, otherwise logs utterances.
pub fn speaker_from_config(config: &AppConfig) -> Box<dyn Speaker> {
    #[cfg(feature = "speech")]
    {
        match TtsSpeaker::new(config.speech_rate, config.speech_volume) {
            Ok(speaker) => {
                info!("🗣️  Text-to-speech engine ready");
                return Box::new(speaker);
            }
            Err(e) => warn!("⚠️  Text-to-speech unavailable, falling back to log output: {}", e),
        }
    }
    #[cfg(not(feature = "speech"))]
    {
        let _ = config;
        info!("🗣️  Built without the `speech` feature, utterances will be logged");
    }
    Box::new(LogSpeaker)
}
