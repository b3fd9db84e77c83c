//! Voice answers: capture a short clip with an external recorder, then send it to an
//! HTTP speech recognition service.
//!
//! Every failure collapses into "no answer" so the dialog can fall back to typing.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::input::{Channel, Response, ResponseSource, StatusSink, StdoutStatus};
use crate::utils::mask_url;

/// Extra time the recorder gets past the capture ceiling before it is killed.
const CAPTURE_GRACE: Duration = Duration::from_secs(2);

pub const LISTENING_NOTICE: &str = "Listening for your response...";
/// Shown for every recognition failure, whatever the cause.
pub const NOT_UNDERSTOOD_NOTICE: &str = "Sorry, I could not understand the audio.";

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("audio capture failed: {0}")]
    Capture(String),
    #[error("speech could not be understood")]
    Unrecognized,
    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[async_trait]
pub trait Recorder: Send {
    async fn record(&mut self, max_duration: Duration) -> Result<Vec<u8>, RecognitionError>;
}

#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, audio: Vec<u8>) -> Result<String, RecognitionError>;
}

/// Runs a capture program (arecord, sox, ...) and takes the audio from its stdout.
#[derive(Debug, Clone)]
pub struct CommandRecorder {
    program: String,
    args: Vec<String>,
}

impl CommandRecorder {
    /// Parses a shell-style command line. `{seconds}` is replaced by the capture ceiling.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = shlex::split(line)
            .ok_or_else(|| anyhow!("RECORD_COMMAND has unbalanced quotes: {line:?}"))?
            .into_iter();
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("RECORD_COMMAND is empty"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args_for(&self, max_duration: Duration) -> Vec<String> {
        let secs = max_duration.as_secs().max(1).to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{seconds}", &secs))
            .collect()
    }
}

#[async_trait]
impl Recorder for CommandRecorder {
    async fn record(&mut self, max_duration: Duration) -> Result<Vec<u8>, RecognitionError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.args_for(max_duration))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(max_duration + CAPTURE_GRACE, command.output())
            .await
            .map_err(|_| RecognitionError::Capture(format!("{} did not finish", self.program)))?
            .map_err(|e| RecognitionError::Capture(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Capture(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        debug!("Captured {} bytes of audio", output.stdout.len());
        Ok(output.stdout)
    }
}

/// Posts raw audio to a recognition endpoint and reads the transcript from its JSON reply.
pub struct HttpRecognizer {
    endpoint: String,
    content_type: String,
    client: reqwest::Client,
}

impl HttpRecognizer {
    pub fn new(endpoint: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            content_type: content_type.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, audio: Vec<u8>) -> Result<String, RecognitionError> {
        if audio.is_empty() {
            return Err(RecognitionError::Unrecognized);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, &self.content_type)
            .body(audio)
            .send()
            .await
            .map_err(|e| RecognitionError::ServiceUnavailable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::ServiceUnavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecognitionError::ServiceUnavailable(e.without_url().to_string()))?;

        parse_transcript(&body).ok_or(RecognitionError::Unrecognized)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecognitionReply {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    result: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternative: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Extracts the best transcript from a recognition reply.
///
/// Accepts a bare `{"transcript": ...}` object or the line-delimited
/// `{"result":[{"alternative":[...]}]}` stream, where the first line is often an empty result.
pub fn parse_transcript(body: &str) -> Option<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| serde_json::from_str::<RecognitionReply>(line).ok())
        .find_map(|reply| {
            let direct = reply.transcript.filter(|t| !t.trim().is_empty());
            direct.or_else(|| reply.result.into_iter().find_map(best_alternative))
        })
        .map(|t| t.trim().to_string())
}

fn best_alternative(result: RecognitionResult) -> Option<String> {
    let alternatives = result.alternative;
    let chosen = if alternatives.iter().any(|a| a.confidence.is_some()) {
        alternatives.into_iter().max_by(|a, b| {
            a.confidence
                .unwrap_or(0.0)
                .total_cmp(&b.confidence.unwrap_or(0.0))
        })
    } else {
        alternatives.into_iter().next()
    };
    chosen
        .and_then(|a| a.transcript)
        .filter(|t| !t.trim().is_empty())
}

/// Voice-backed answers with a bounded capture window.
pub struct VoiceResponse {
    recorder: Box<dyn Recorder>,
    recognizer: Box<dyn Recognizer>,
    max_duration: Duration,
    status: Box<dyn StatusSink>,
}

impl VoiceResponse {
    pub fn new(
        recorder: Box<dyn Recorder>,
        recognizer: Box<dyn Recognizer>,
        max_duration: Duration,
    ) -> Self {
        Self {
            recorder,
            recognizer,
            max_duration,
            status: Box::new(StdoutStatus),
        }
    }

    pub fn with_status(mut self, status: Box<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn from_parts(
        record_command: &str,
        recognition_url: &str,
        content_type: &str,
        max_duration: Duration,
    ) -> Result<Self> {
        let recorder = CommandRecorder::from_command_line(record_command)?;
        info!(
            "🎙️  Voice input via {} -> {}",
            recorder.program(),
            mask_url(recognition_url)
        );
        Ok(Self::new(
            Box::new(recorder),
            Box::new(HttpRecognizer::new(recognition_url, content_type)),
            max_duration,
        ))
    }

    pub async fn listen_once(&mut self) -> Result<String, RecognitionError> {
        let audio = self.recorder.record(self.max_duration).await?;
        self.recognizer.recognize(audio).await
    }
}

#[async_trait]
impl ResponseSource for VoiceResponse {
    async fn respond(&mut self, _prompt: &str) -> Option<Response> {
        self.status.status(LISTENING_NOTICE);
        match self.listen_once().await {
            Ok(text) => {
                debug!("Heard {:?}", text);
                Some(Response::new(&text, Channel::Voice))
            }
            Err(e) => {
                warn!("⚠️  Voice input failed: {}", e);
                self.status.status(NOT_UNDERSTOOD_NOTICE);
                None
            }
        }
    }
}

/// Used when no recognition service is configured; never has an answer.
#[derive(Debug, Clone, Default)]
pub struct DisabledVoice;

#[async_trait]
impl ResponseSource for DisabledVoice {
    async fn respond(&mut self, _prompt: &str) -> Option<Response> {
        debug!("Voice input disabled, skipping capture");
        None
    }
}
