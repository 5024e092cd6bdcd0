//! Per-category aggregation of Likert answers onto a 0..10 scale.
//!
//! `(v + 2) * 2.5` is the only normalization in the crate. Percent figures shown
//! to readers come from [`CategoryScore::display_percent`].

use crate::{
    config::Config,
    model::{Assessment, QuestionCatalog},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    /// Always within 0.0..=10.0, rounded to one decimal.
    pub score: f64,
    pub no_data: bool,
}

impl CategoryScore {
    pub fn display_percent(&self) -> u32 {
        (self.score * 10.0).round() as u32
    }
}

pub fn normalize(value: i8) -> f64 {
    (f64::from(value) + 2.0) * 2.5
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub struct ScoreAggregator {
    uncategorized_label: String,
}

impl ScoreAggregator {
    pub fn new(cfg: &Config) -> Self {
        Self {
            uncategorized_label: cfg.scoring.uncategorized_label.clone(),
        }
    }

    pub fn aggregate(
        &self,
        assessment: &Assessment,
        catalog: &QuestionCatalog,
    ) -> Vec<CategoryScore> {
        let mut order: Vec<String> = Vec::new();
        let mut sums: HashMap<String, (f64, u32)> = HashMap::new();
        let mut unmapped = 0usize;

        for answer in &assessment.answers {
            let category = match catalog.category_of(&answer.question_id) {
                Some(c) => c.to_string(),
                None => {
                    unmapped += 1;
                    self.uncategorized_label.clone()
                }
            };

            if !sums.contains_key(&category) {
                order.push(category.clone());
                sums.insert(category.clone(), (0.0, 0));
            }

            match (answer.value, answer.scored_value()) {
                (Some(v), None) => {
                    warn!(
                        "question {} has out-of-range value {v}; treating as unanswered",
                        answer.question_id
                    );
                }
                (_, Some(v)) => {
                    if let Some(acc) = sums.get_mut(&category) {
                        acc.0 += normalize(v);
                        acc.1 += 1;
                    }
                }
                (None, None) => {}
            }
        }

        if unmapped > 0 {
            warn!(
                "{unmapped} answer(s) reference questions without metadata; scored as {}",
                self.uncategorized_label
            );
        }

        for q in catalog.questions() {
            if !sums.contains_key(&q.category) {
                order.push(q.category.clone());
                sums.insert(q.category.clone(), (0.0, 0));
            }
        }

        let scores: Vec<CategoryScore> = order
            .into_iter()
            .map(|category| {
                let (sum, n) = sums.get(&category).copied().unwrap_or((0.0, 0));
                if n == 0 {
                    CategoryScore {
                        category,
                        score: 0.0,
                        no_data: true,
                    }
                } else {
                    CategoryScore {
                        category,
                        score: round1(sum / f64::from(n)).clamp(0.0, 10.0),
                        no_data: false,
                    }
                }
            })
            .collect();

        debug!(?scores, "category scores");
        scores
    }
}

/// Scores with the default configuration.
pub fn compute_category_scores(
    assessment: &Assessment,
    catalog: &QuestionCatalog,
) -> Vec<CategoryScore> {
    ScoreAggregator::new(&Config::default()).aggregate(assessment, catalog)
}

/// Mean over categories that have data, one decimal.
pub fn overall_score(scores: &[CategoryScore]) -> Option<f64> {
    let with_data: Vec<f64> = scores
        .iter()
        .filter(|s| !s.no_data)
        .map(|s| s.score)
        .collect();
    if with_data.is_empty() {
        return None;
    }
    Some(round1(with_data.iter().sum::<f64>() / with_data.len() as f64))
}
