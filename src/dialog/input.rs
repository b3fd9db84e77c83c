use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Voice,
    Typed,
}

/// A normalized (trimmed, lowercased) answer and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub channel: Channel,
}

impl Response {
    pub fn new(text: &str, channel: Channel) -> Self {
        Self {
            text: text.trim().to_lowercase(),
            channel,
        }
    }
}

/// Where sources report short status lines ("Listening...") to the user.
pub trait StatusSink: Send + Sync {
    fn status(&self, line: &str);
}

#[derive(Debug, Clone, Default)]
pub struct StdoutStatus;

impl StatusSink for StdoutStatus {
    fn status(&self, line: &str) {
        println!("{line}");
    }
}

/// Anything that can answer a yes/no question. `None` means no usable answer.
#[async_trait]
pub trait ResponseSource: Send {
    async fn respond(&mut self, prompt: &str) -> Option<Response>;
}

#[async_trait]
impl<T: ResponseSource + ?Sized> ResponseSource for Box<T> {
    async fn respond(&mut self, prompt: &str) -> Option<Response> {
        (**self).respond(prompt).await
    }
}

/// Asks `primary` first and only falls through to `secondary` when it has no answer.
pub struct Fallback<P, S> {
    primary: P,
    secondary: S,
    fallback_prompt: String,
}

impl<P, S> Fallback<P, S> {
    pub fn new(primary: P, secondary: S, fallback_prompt: impl Into<String>) -> Self {
        Self {
            primary,
            secondary,
            fallback_prompt: fallback_prompt.into(),
        }
    }

    pub fn secondary_mut(&mut self) -> &mut S {
        &mut self.secondary
    }
}

#[async_trait]
impl<P: ResponseSource, S: ResponseSource> ResponseSource for Fallback<P, S> {
    async fn respond(&mut self, prompt: &str) -> Option<Response> {
        if let Some(response) = self.primary.respond(prompt).await {
            return Some(response);
        }
        self.secondary.respond(&self.fallback_prompt).await
    }
}

/// Reads one line per question from a buffered reader, stdin in production.
pub struct TypedResponse<R> {
    reader: R,
}

impl TypedResponse<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TypedResponse<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> ResponseSource for TypedResponse<R> {
    async fn respond(&mut self, prompt: &str) -> Option<Response> {
        print!("{prompt}");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        match self.reader.read_line(&mut line).await {
            Ok(0) => {
                println!();
                None
            }
            Ok(_) => Some(Response::new(&line, Channel::Typed)),
            Err(e) => {
                warn!("⚠️  Could not read typed answer: {}", e);
                None
            }
        }
    }
}
