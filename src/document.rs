use crate::{
    chart::ChartGeometry,
    error::Result,
    narrative::Section,
    scoring::CategoryScore,
    util::sha256_hex,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Cover,
    Chart,
    Recommendations,
    Responses,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverContent {
    pub title: String,
    pub assessment_id: String,
    pub respondent: Option<String>,
    pub completed_at: Option<String>,
    /// 0..10, `None` when no category has answers.
    pub overall_score: Option<f64>,
    pub category_count: usize,
    pub answered: usize,
    pub total_questions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartContent {
    pub scores: Vec<CategoryScore>,
    pub geometry: ChartGeometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseItem {
    pub question_id: String,
    pub question_text: String,
    pub category: String,
    pub value: Option<i64>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingContent {
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum PageContent {
    Cover(CoverContent),
    Chart(ChartContent),
    Recommendations(Vec<Section>),
    Responses(Vec<ResponseItem>),
    Closing(ClosingContent),
}

impl PageContent {
    pub fn kind(&self) -> PageKind {
        match self {
            PageContent::Cover(_) => PageKind::Cover,
            PageContent::Chart(_) => PageKind::Chart,
            PageContent::Recommendations(_) => PageKind::Recommendations,
            PageContent::Responses(_) => PageKind::Responses,
            PageContent::Closing(_) => PageKind::Closing,
        }
    }

    /// Number of atomic units placed on the page.
    pub fn unit_count(&self) -> usize {
        match self {
            PageContent::Recommendations(s) => s.len(),
            PageContent::Responses(r) => r.len(),
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(flatten)]
    pub content: PageContent,
    pub page_number: usize,
    pub total_pages: usize,
    pub continued: bool,
}

impl Page {
    pub fn kind(&self) -> PageKind {
        self.content.kind()
    }

    pub fn heading(&self) -> String {
        let base = match self.kind() {
            PageKind::Cover => "Assessment Report",
            PageKind::Chart => "Score Overview",
            PageKind::Recommendations => "Recommendations",
            PageKind::Responses => "Your Responses",
            PageKind::Closing => "Next Steps",
        };
        if self.continued {
            format!("{base} (continued)")
        } else {
            base.to_string()
        }
    }

    pub fn footer(&self) -> String {
        format!("Page {} of {}", self.page_number, self.total_pages)
    }
}

/// The compiled report. Built fresh per request and handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
    pub total_pages: usize,
}

impl Document {
    pub fn pages_of(&self, kind: PageKind) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(move |p| p.kind() == kind)
    }

    /// sha256 of the canonical JSON; stable across identical compilations.
    pub fn fingerprint(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(sha256_hex(&bytes))
    }
}
