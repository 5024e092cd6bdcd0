use crate::{config::Narrative as NarrativeConfig, error::Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    Paragraph { text: String },
    Bullet { text: String },
}

impl ContentItem {
    pub fn paragraph(text: impl Into<String>) -> Self {
        ContentItem::Paragraph { text: text.into() }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        ContentItem::Bullet { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            ContentItem::Paragraph { text } | ContentItem::Bullet { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub category: String,
    pub items: Vec<ContentItem>,
}

/// Splits recommendation text on `##` headers into titled sections of
/// paragraphs and list items.
pub struct RecommendationParser {
    cfg: NarrativeConfig,
    list_line: Regex,
}

struct Blob<'a> {
    title: Option<&'a str>,
    body: Vec<&'a str>,
}

impl RecommendationParser {
    pub fn new(cfg: &NarrativeConfig) -> Result<Self> {
        // `-` and `*` need whitespace (or nothing) after them so `**bold**` and `-5%`
        // stay text. Ordered markers are checked for a trailing digit in `list_item`
        // since the regex crate has no lookahead.
        let list_line =
            Regex::new(r"^(?:•\s*|[-*](?:\s+|$)|(?P<num>[0-9]+[.)]))(?P<rest>.*)$")?;
        Ok(Self {
            cfg: cfg.clone(),
            list_line,
        })
    }

    pub fn parse(&self, text: &str) -> Vec<Section> {
        let text = self.normalize(text);
        let blobs = split_blobs(&text);
        if blobs.iter().all(|b| b.title.is_none()) {
            info!("narrative has no ## headers; using a single section");
        }

        let sections: Vec<Section> = blobs
            .into_iter()
            .map(|blob| Section {
                category: blob
                    .title
                    .map(|t| self.clean_title(t))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| self.cfg.default_title.clone()),
                items: self.scan_body(&blob.body),
            })
            .collect();

        debug!(sections = sections.len(), "narrative parsed");
        sections
    }

    fn normalize(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n");
        if self.cfg.normalize_unicode {
            text.nfc().collect()
        } else {
            text
        }
    }

    fn scan_body(&self, lines: &[&str]) -> Vec<ContentItem> {
        let mut items = Vec::new();
        let mut buf: Vec<&str> = Vec::new();

        for line in lines {
            let t = line.trim();
            if t.is_empty() {
                flush(&mut buf, &mut items);
                continue;
            }
            if let Some(rest) = self.list_item(t) {
                flush(&mut buf, &mut items);
                if !rest.is_empty() {
                    items.push(ContentItem::bullet(rest));
                }
                continue;
            }
            if t.starts_with("###") {
                flush(&mut buf, &mut items);
                let sub = t.trim_start_matches('#').trim();
                if !sub.is_empty() {
                    items.push(ContentItem::paragraph(sub));
                }
                continue;
            }
            buf.push(t);
        }
        flush(&mut buf, &mut items);
        items
    }

    /// Returns the item text when `line` (already trimmed) starts with a list marker.
    pub fn list_item<'a>(&self, line: &'a str) -> Option<&'a str> {
        let caps = self.list_line.captures(line)?;
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        // "9.1" and "1.٢" are numbers, not list markers
        if caps.name("num").is_some() && rest.starts_with(char::is_numeric) {
            return None;
        }
        Some(rest.trim())
    }

    fn clean_title(&self, raw: &str) -> String {
        strip_closing_hashes(raw.trim_start_matches('#'))
            .chars()
            .filter(|c| !matches!(c, '*' | '_' | '`'))
            .filter(|&c| !(self.cfg.strip_emoji && is_emoji(c)))
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn flush(buf: &mut Vec<&str>, items: &mut Vec<ContentItem>) {
    if buf.is_empty() {
        return;
    }
    items.push(ContentItem::paragraph(buf.join(" ")));
    buf.clear();
}

/// Drops a trailing `###` run only when it stands alone, so `C#` keeps its hash.
fn strip_closing_hashes(title: &str) -> &str {
    let t = title.trim_end();
    let without = t.trim_end_matches('#');
    if without.len() == t.len() {
        return t;
    }
    if without.is_empty() || without.ends_with(char::is_whitespace) {
        without.trim_end()
    } else {
        t
    }
}

fn is_header(line: &str) -> Option<&str> {
    let t = line.trim_start();
    let rest = t.strip_prefix("##")?;
    if rest.starts_with('#') {
        return None;
    }
    Some(rest.trim())
}

fn split_blobs(text: &str) -> Vec<Blob<'_>> {
    let mut blobs = vec![Blob {
        title: None,
        body: Vec::new(),
    }];

    for line in text.lines() {
        match is_header(line) {
            Some(title) => blobs.push(Blob {
                title: Some(title),
                body: Vec::new(),
            }),
            None => {
                if let Some(current) = blobs.last_mut() {
                    current.body.push(line);
                }
            }
        }
    }

    // A blank preamble is not a section; a blank document yields nothing.
    let preamble_blank = blobs[0].body.iter().all(|l| l.trim().is_empty());
    if preamble_blank {
        blobs.remove(0);
    }
    blobs
}

/// Pictographs, dingbats, flags, and the joiners/selectors that glue them together.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF
            | 0x2600..=0x27BF
            | 0x2300..=0x23FF
            | 0x2B00..=0x2BFF
            | 0xE0020..=0xE007F
            | 0xFE00..=0xFE0F
            | 0x200D
            | 0x20E3
    )
}
