use crate::{
    chart::ChartGeometryBuilder,
    config::Config,
    document::{
        ChartContent, ClosingContent, CoverContent, Document, Page, PageContent, ResponseItem,
    },
    error::Result,
    model::{Assessment, NarrativeSource, QuestionCatalog, likert_label},
    narrative::RecommendationParser,
    paginate::ReportPaginator,
    scoring::{CategoryScore, ScoreAggregator, overall_score},
};
use std::time::Instant;
use tracing::{debug, info};

pub struct ReportAssembler {
    scorer: ScoreAggregator,
    chart: ChartGeometryBuilder,
    parser: RecommendationParser,
    paginator: ReportPaginator,
    uncategorized_label: String,
    closing_note: String,
}

impl ReportAssembler {
    /// Validates `cfg` and builds every stage up front; bad settings fail here,
    /// before any report work starts.
    pub fn new(cfg: &Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            scorer: ScoreAggregator::new(cfg),
            chart: ChartGeometryBuilder::new(&cfg.chart)?,
            parser: RecommendationParser::new(&cfg.narrative)?,
            paginator: ReportPaginator::new(&cfg.pagination)?,
            uncategorized_label: cfg.scoring.uncategorized_label.clone(),
            closing_note: cfg.pagination.closing_note.clone(),
        })
    }

    pub fn compile(
        &self,
        assessment: &Assessment,
        narrative: impl Into<NarrativeSource>,
        catalog: &QuestionCatalog,
    ) -> Result<Document> {
        let started = Instant::now();

        let scores = self.scorer.aggregate(assessment, catalog);
        let geometry = self.chart.build(&scores)?;
        let narrative: NarrativeSource = narrative.into();
        let sections = self.parser.parse(&narrative.into_text());
        let responses = self.response_items(assessment, catalog);

        let plan = self.paginator.plan(sections.len(), responses.len());
        let total = plan.total_pages();
        debug!(?plan, "page plan");

        let mut pages = Vec::with_capacity(total);
        pages.push(Page {
            content: PageContent::Cover(self.cover(assessment, &scores)),
            page_number: 1,
            total_pages: total,
            continued: false,
        });
        pages.push(Page {
            content: PageContent::Chart(ChartContent { scores, geometry }),
            page_number: 2,
            total_pages: total,
            continued: false,
        });
        pages.extend(self.paginator.paginate(
            &sections,
            self.paginator.sections_per_page(),
            plan.recommendations_offset(),
            total,
            PageContent::Recommendations,
        ));
        pages.extend(self.paginator.paginate(
            &responses,
            self.paginator.responses_per_page(),
            plan.responses_offset(),
            total,
            PageContent::Responses,
        ));
        for i in 0..plan.trailing_pages {
            pages.push(Page {
                content: PageContent::Closing(ClosingContent {
                    note: self.closing_note.clone(),
                }),
                page_number: plan.trailing_offset() + i + 1,
                total_pages: total,
                continued: i > 0,
            });
        }

        info!(
            "compiled report assessment={} pages={} sections={} responses={} in {:?}",
            assessment.id,
            total,
            sections.len(),
            responses.len(),
            started.elapsed()
        );

        Ok(Document {
            pages,
            total_pages: total,
        })
    }

    fn cover(&self, assessment: &Assessment, scores: &[CategoryScore]) -> CoverContent {
        CoverContent {
            title: assessment.title.clone(),
            assessment_id: assessment.id.clone(),
            respondent: assessment.respondent.clone(),
            completed_at: assessment.completed_at.clone(),
            overall_score: overall_score(scores),
            category_count: scores.len(),
            answered: assessment
                .answers
                .iter()
                .filter(|a| a.scored_value().is_some())
                .count(),
            total_questions: assessment.answers.len(),
        }
    }

    fn response_items(
        &self,
        assessment: &Assessment,
        catalog: &QuestionCatalog,
    ) -> Vec<ResponseItem> {
        assessment
            .answers
            .iter()
            .map(|a| {
                let meta = catalog.get(&a.question_id);
                ResponseItem {
                    question_id: a.question_id.to_string(),
                    question_text: meta.map(|q| q.text.clone()).unwrap_or_default(),
                    category: meta
                        .map(|q| q.category.clone())
                        .unwrap_or_else(|| self.uncategorized_label.clone()),
                    value: a.value,
                    label: likert_label(a.value).to_string(),
                }
            })
            .collect()
    }
}

/// Compiles with the default configuration.
pub fn compile_report(
    assessment: &Assessment,
    narrative: impl Into<NarrativeSource>,
    catalog: &QuestionCatalog,
) -> Result<Document> {
    ReportAssembler::new(&Config::default())?.compile(assessment, narrative, catalog)
}
