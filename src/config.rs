use crate::error::ReportError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: Scoring,
    #[serde(default)]
    pub chart: Chart,
    #[serde(default)]
    pub narrative: Narrative,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks every value that would otherwise only fail once a report is being built.
    pub fn validate(&self) -> std::result::Result<(), ReportError> {
        if self.pagination.sections_per_page == 0 {
            return Err(ReportError::InvalidConfiguration(
                "pagination.sections_per_page must be positive".into(),
            ));
        }
        if self.pagination.responses_per_page == 0 {
            return Err(ReportError::InvalidConfiguration(
                "pagination.responses_per_page must be positive".into(),
            ));
        }
        if self.chart.radius.is_nan() || self.chart.radius <= 0.0 {
            return Err(ReportError::InvalidConfiguration(format!(
                "chart.radius must be positive, got {}",
                self.chart.radius
            )));
        }
        if self.chart.full_mark.is_nan() || self.chart.full_mark <= 0.0 {
            return Err(ReportError::InvalidConfiguration(format!(
                "chart.full_mark must be positive, got {}",
                self.chart.full_mark
            )));
        }
        if self.chart.label_offset < 0.0 || self.chart.center_band < 0.0 {
            return Err(ReportError::InvalidConfiguration(
                "chart.label_offset and chart.center_band must not be negative".into(),
            ));
        }
        if self.narrative.default_title.trim().is_empty() {
            return Err(ReportError::InvalidConfiguration(
                "narrative.default_title must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub uncategorized_label: String,
}
impl Default for Scoring {
    fn default() -> Self {
        Self {
            uncategorized_label: "Uncategorized".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fall back to a horizontal bar layout.
    Bars,
    /// Refuse to build a chart.
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Chart {
    pub radius: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub full_mark: f64,
    pub label_offset: f64,
    /// |sin(angle)| at or below this value gets a centered label.
    pub center_band: f64,
    pub grid_levels: u32,
    pub degenerate: DegeneratePolicy,
}
impl Default for Chart {
    fn default() -> Self {
        Self {
            radius: 150.0,
            center_x: 250.0,
            center_y: 250.0,
            full_mark: 10.0,
            label_offset: 18.0,
            center_band: 0.1,
            grid_levels: 5,
            degenerate: DegeneratePolicy::Bars,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Narrative {
    pub default_title: String,
    pub normalize_unicode: bool,
    pub strip_emoji: bool,
}
impl Default for Narrative {
    fn default() -> Self {
        Self {
            default_title: "Recommendations".into(),
            normalize_unicode: true,
            strip_emoji: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub sections_per_page: usize,
    pub responses_per_page: usize,
    pub trailing_pages: usize,
    pub closing_note: String,
}
impl Default for Pagination {
    fn default() -> Self {
        Self {
            sections_per_page: 2,
            responses_per_page: 10,
            trailing_pages: 0,
            closing_note: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_input_bytes: u64,
    pub max_answers: usize,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 16 * 1024 * 1024,
            max_answers: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Output {
    pub out_dir: String,
    pub document_filename: String,
    pub write_index_json: bool,
    pub pretty_json: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            document_filename: "document.json".into(),
            write_index_json: true,
            pretty_json: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
