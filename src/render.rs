use crate::{
    chart::ChartGeometry,
    document::{Document, PageContent},
    model::likert_label,
    narrative::ContentItem,
};
use anyhow::Result;
use std::fmt::Write as _;

/// Turns a compiled [`Document`] into a deliverable. Binary formats live outside this crate.
pub trait Renderer {
    fn render(&self, doc: &Document) -> Result<String>;
}

pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let s = if self.pretty {
            serde_json::to_string_pretty(doc)?
        } else {
            serde_json::to_string(doc)?
        };
        Ok(s)
    }
}

/// Plain-text page outline, for previews and diffs.
pub struct OutlineRenderer;

impl Renderer for OutlineRenderer {
    fn render(&self, doc: &Document) -> Result<String> {
        let mut out = String::new();
        for page in &doc.pages {
            writeln!(out, "=== {} [{}] ===", page.heading(), page.footer())?;
            match &page.content {
                PageContent::Cover(c) => {
                    writeln!(out, "{}", c.title)?;
                    if let Some(r) = &c.respondent {
                        writeln!(out, "Respondent: {r}")?;
                    }
                    if let Some(at) = &c.completed_at {
                        writeln!(out, "Completed: {at}")?;
                    }
                    match c.overall_score {
                        Some(s) => writeln!(out, "Overall: {s:.1}/10")?,
                        None => writeln!(out, "Overall: no data")?,
                    }
                    writeln!(out, "Answered {} of {} questions", c.answered, c.total_questions)?;
                }
                PageContent::Chart(c) => {
                    let kind = match c.geometry {
                        ChartGeometry::Radar(_) => "radar",
                        ChartGeometry::Bars(_) => "bars",
                    };
                    writeln!(out, "chart: {kind}")?;
                    for s in &c.scores {
                        if s.no_data {
                            writeln!(out, "  {:<32} no data", s.category)?;
                        } else {
                            writeln!(out, "  {:<32} {:>3}%", s.category, s.display_percent())?;
                        }
                    }
                }
                PageContent::Recommendations(sections) => {
                    for section in sections {
                        writeln!(out, "## {}", section.category)?;
                        for item in &section.items {
                            match item {
                                ContentItem::Paragraph { text } => writeln!(out, "{text}")?,
                                ContentItem::Bullet { text } => writeln!(out, "  - {text}")?,
                            }
                        }
                    }
                }
                PageContent::Responses(items) => {
                    for r in items {
                        writeln!(
                            out,
                            "  [{}] {} :: {}",
                            r.category,
                            if r.question_text.is_empty() {
                                r.question_id.as_str()
                            } else {
                                r.question_text.as_str()
                            },
                            likert_label(r.value)
                        )?;
                    }
                }
                PageContent::Closing(c) => {
                    if !c.note.is_empty() {
                        writeln!(out, "{}", c.note)?;
                    }
                }
            }
            out.push('\n');
        }
        Ok(out)
    }
}
