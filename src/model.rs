use crate::{config::Config, error::ReportError};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Question identifiers arrive as JSON numbers or strings; both compare as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(de: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(u64),
            Text(String),
        }
        Ok(match Raw::deserialize(de)? {
            Raw::Num(n) => QuestionId(n.to_string()),
            Raw::Text(s) => QuestionId(s),
        })
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        QuestionId(s.to_string())
    }
}

impl From<u64> for QuestionId {
    fn from(n: u64) -> Self {
        QuestionId(n.to_string())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// Kept wide so out-of-scale values reach scoring and are reported there.
    #[serde(default)]
    pub value: Option<i64>,
}

impl AnswerRecord {
    pub fn new(question_id: impl Into<QuestionId>, value: Option<i64>) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }

    /// The raw value when it lies on the -2..=2 scale.
    pub fn scored_value(&self) -> Option<i8> {
        self.value
            .filter(|v| (-2..=2).contains(v))
            .and_then(|v| i8::try_from(v).ok())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub respondent: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionMeta {
    pub id: QuestionId,
    pub category: String,
    #[serde(default)]
    pub text: String,
}

/// Question metadata in file order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    questions: Vec<QuestionMeta>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<QuestionMeta>) -> Self {
        let mut index = HashMap::with_capacity(questions.len());
        for (i, q) in questions.iter().enumerate() {
            // first definition wins
            index.entry(q.id.clone()).or_insert(i);
        }
        Self { questions, index }
    }

    pub fn get(&self, id: &QuestionId) -> Option<&QuestionMeta> {
        self.index.get(id).map(|&i| &self.questions[i])
    }

    pub fn category_of(&self, id: &QuestionId) -> Option<&str> {
        self.get(id).map(|q| q.category.as_str())
    }

    pub fn questions(&self) -> &[QuestionMeta] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl FromIterator<QuestionMeta> for QuestionCatalog {
    fn from_iter<I: IntoIterator<Item = QuestionMeta>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Narrative text as delivered by the recommendation service: either a bare
/// string or an object wrapping it under `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NarrativeSource {
    Text(String),
    Wrapped { content: String },
}

impl NarrativeSource {
    pub fn into_text(self) -> String {
        match self {
            NarrativeSource::Text(s) => s,
            NarrativeSource::Wrapped { content } => content,
        }
    }
}

impl From<String> for NarrativeSource {
    fn from(s: String) -> Self {
        NarrativeSource::Text(s)
    }
}

impl From<&str> for NarrativeSource {
    fn from(s: &str) -> Self {
        NarrativeSource::Text(s.to_string())
    }
}

pub fn likert_label(value: Option<i64>) -> &'static str {
    match value {
        Some(-2) => "Strongly disagree",
        Some(-1) => "Disagree",
        Some(0) => "Neutral",
        Some(1) => "Agree",
        Some(2) => "Strongly agree",
        Some(_) => "Invalid response",
        None => "Not answered",
    }
}

pub fn load_assessment(cfg: &Config, path: &Path) -> Result<Assessment> {
    let raw = read_limited(cfg, path)?;
    let assessment: Assessment = serde_json::from_str(&raw)
        .with_context(|| format!("parsing assessment JSON: {}", path.display()))?;
    if assessment.answers.len() > cfg.limits.max_answers {
        return Err(ReportError::Input(format!(
            "assessment exceeds max_answers: {} > {}",
            assessment.answers.len(),
            cfg.limits.max_answers
        ))
        .into());
    }
    Ok(assessment)
}

pub fn load_catalog(cfg: &Config, path: &Path) -> Result<QuestionCatalog> {
    let raw = read_limited(cfg, path)?;
    let questions: Vec<QuestionMeta> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing question metadata JSON: {}", path.display()))?;
    Ok(QuestionCatalog::new(questions))
}

/// Reads a narrative file. `.json` files may hold either a string or `{ "content": ... }`;
/// anything else is taken verbatim.
pub fn load_narrative(cfg: &Config, path: &Path) -> Result<NarrativeSource> {
    let raw = read_limited(cfg, path)?;
    let is_json = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let src: NarrativeSource = serde_json::from_str(&raw)
            .map_err(ReportError::from)
            .with_context(|| format!("parsing narrative JSON: {}", path.display()))?;
        return Ok(src);
    }
    Ok(NarrativeSource::Text(raw))
}

fn read_limited(cfg: &Config, path: &Path) -> Result<String> {
    let meta =
        std::fs::metadata(path).with_context(|| format!("stat input: {}", path.display()))?;
    if meta.len() > cfg.limits.max_input_bytes {
        return Err(ReportError::Input(format!(
            "input exceeds max_input_bytes: {} ({} > {} bytes)",
            path.display(),
            meta.len(),
            cfg.limits.max_input_bytes
        ))
        .into());
    }
    std::fs::read_to_string(path).with_context(|| format!("reading input: {}", path.display()))
}
