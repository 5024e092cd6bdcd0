use crate::{
    config::Pagination,
    document::{Page, PageContent},
    error::{ReportError, Result},
};
use serde::{Deserialize, Serialize};

/// Cover and chart.
pub const LEADING_FIXED_PAGES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePlan {
    pub leading_pages: usize,
    pub recommendation_pages: usize,
    pub response_pages: usize,
    pub trailing_pages: usize,
}

impl PagePlan {
    pub fn total_pages(&self) -> usize {
        self.leading_pages + self.recommendation_pages + self.response_pages + self.trailing_pages
    }

    /// Page numbers already used before the first recommendation page.
    pub fn recommendations_offset(&self) -> usize {
        self.leading_pages
    }

    pub fn responses_offset(&self) -> usize {
        self.leading_pages + self.recommendation_pages
    }

    pub fn trailing_offset(&self) -> usize {
        self.responses_offset() + self.response_pages
    }
}

pub struct ReportPaginator {
    sections_per_page: usize,
    responses_per_page: usize,
    trailing_pages: usize,
}

impl ReportPaginator {
    pub fn new(cfg: &Pagination) -> Result<Self> {
        if cfg.sections_per_page == 0 || cfg.responses_per_page == 0 {
            return Err(ReportError::InvalidConfiguration(format!(
                "page capacities must be positive (sections_per_page={}, responses_per_page={})",
                cfg.sections_per_page, cfg.responses_per_page
            )));
        }
        Ok(Self {
            sections_per_page: cfg.sections_per_page,
            responses_per_page: cfg.responses_per_page,
            trailing_pages: cfg.trailing_pages,
        })
    }

    pub fn sections_per_page(&self) -> usize {
        self.sections_per_page
    }

    pub fn responses_per_page(&self) -> usize {
        self.responses_per_page
    }

    pub fn plan(&self, sections: usize, responses: usize) -> PagePlan {
        PagePlan {
            leading_pages: LEADING_FIXED_PAGES,
            recommendation_pages: sections.div_ceil(self.sections_per_page),
            response_pages: responses.div_ceil(self.responses_per_page),
            trailing_pages: self.trailing_pages,
        }
    }

    /// Lays out `units` in order, `capacity` per page, numbering from `offset + 1`.
    pub fn paginate<T: Clone>(
        &self,
        units: &[T],
        capacity: usize,
        offset: usize,
        total_pages: usize,
        make: impl Fn(Vec<T>) -> PageContent,
    ) -> Vec<Page> {
        plan_pages(units, capacity)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| Page {
                content: make(chunk),
                page_number: offset + i + 1,
                total_pages,
                continued: i > 0,
            })
            .collect()
    }
}

/// Consecutive groups of at most `capacity` units; empty input gives no groups.
pub fn plan_pages<T: Clone>(units: &[T], capacity: usize) -> Vec<Vec<T>> {
    units.chunks(capacity.max(1)).map(<[T]>::to_vec).collect()
}
