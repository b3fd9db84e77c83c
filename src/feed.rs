//! Amber Alert RSS retrieval.
//!
//! A single GET per call, no retries and no caching. Any failure is logged once
//! and turned into an empty alert list so the rest of the cycle still runs.

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::AlertRecord;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    Status(StatusCode),
    #[error("malformed feed: {0}")]
    Parse(String),
}

pub struct FeedFetcher {
    url: String,
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches the feed, reporting any failure and yielding no alerts in that case.
    pub async fn fetch(&self) -> Vec<AlertRecord> {
        match self.try_fetch().await {
            Ok(alerts) => {
                info!("📰 Fetched {} alert(s) from {}", alerts.len(), self.url);
                alerts
            }
            Err(FeedError::Parse(e)) => {
                warn!("⚠️  Error parsing Amber Alerts feed: {}", e);
                Vec::new()
            }
            Err(e) => {
                warn!("⚠️  Error fetching Amber Alerts: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self) -> Result<Vec<AlertRecord>, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        let body = response.text().await?;
        parse_feed(&body)
    }
}

#[derive(Debug, Clone, Copy)]
enum ItemField {
    Title,
    Description,
    Link,
    PubDate,
}

impl ItemField {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Self::Title),
            "description" => Some(Self::Description),
            "link" => Some(Self::Link),
            "pubDate" => Some(Self::PubDate),
            _ => None,
        }
    }

    fn slot<'a>(&self, record: &'a mut AlertRecord) -> &'a mut Option<String> {
        match self {
            Self::Title => &mut record.title,
            Self::Description => &mut record.description,
            Self::Link => &mut record.link,
            Self::PubDate => &mut record.pub_date,
        }
    }
}

// Depths below count the root element as 1.
const ITEM_DEPTH: usize = 3;
const FIELD_DEPTH: usize = 4;

/// Parses an RSS document into one record per `<root>/channel/item`, in document order.
///
/// Only the first direct child of each known name is read. A missing child stays `None`,
/// an empty one becomes `Some("")`. Text and CDATA pieces are joined as-is and the
/// whole value is trimmed once.
pub fn parse_feed(xml: &str) -> Result<Vec<AlertRecord>, FeedError> {
    let mut reader = Reader::from_str(xml);

    let mut path: Vec<String> = Vec::new();
    let mut seen_root = false;
    let mut alerts = Vec::new();
    let mut current: Option<AlertRecord> = None;
    let mut field: Option<(ItemField, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if path.is_empty() && seen_root {
                    return Err(FeedError::Parse("multiple root elements".to_string()));
                }
                seen_root = true;
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());

                if is_item_path(&path) {
                    current = Some(AlertRecord::default());
                } else if path.len() == FIELD_DEPTH && is_item_path(&path[..ITEM_DEPTH]) {
                    field = ItemField::from_tag(&path[FIELD_DEPTH - 1]).map(|f| (f, String::new()));
                }
            }
            Ok(Event::Empty(e)) => {
                if path.is_empty() && seen_root {
                    return Err(FeedError::Parse("multiple root elements".to_string()));
                }
                seen_root = true;
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();

                if path.len() == ITEM_DEPTH - 1 && is_channel_path(&path) && name == "item" {
                    alerts.push(AlertRecord::default());
                } else if path.len() == ITEM_DEPTH && is_item_path(&path) {
                    if let (Some(record), Some(f)) = (current.as_mut(), ItemField::from_tag(&name)) {
                        f.slot(record).get_or_insert_with(String::new);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if path.is_empty() && !e.iter().all(u8::is_ascii_whitespace) {
                    let junk = if seen_root { "after" } else { "before" };
                    return Err(FeedError::Parse(format!("text {junk} the root element")));
                }
                if path.len() == FIELD_DEPTH {
                    if let Some((_, buf)) = field.as_mut() {
                        let text = e.unescape().map_err(|e| FeedError::Parse(e.to_string()))?;
                        buf.push_str(&text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if path.len() == FIELD_DEPTH {
                    if let Some((_, buf)) = field.as_mut() {
                        buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
            }
            Ok(Event::End(_)) => {
                if path.len() == FIELD_DEPTH {
                    if let (Some(record), Some((f, text))) = (current.as_mut(), field.take()) {
                        f.slot(record).get_or_insert(text.trim().to_string());
                    }
                } else if is_item_path(&path) {
                    if let Some(record) = current.take() {
                        alerts.push(record);
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(FeedError::Parse(format!(
                    "at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    if !seen_root {
        return Err(FeedError::Parse("document has no root element".to_string()));
    }
    if let Some(open) = path.last() {
        return Err(FeedError::Parse(format!("unclosed element <{open}>")));
    }

    Ok(alerts)
}

fn is_channel_path(path: &[String]) -> bool {
    path.len() == 2 && path[1] == "channel"
}

fn is_item_path(path: &[String]) -> bool {
    path.len() == ITEM_DEPTH && is_channel_path(&path[..2]) && path[2] == "item"
}
