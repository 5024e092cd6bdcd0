use assessment_report::{
    ReportError,
    config::Pagination,
    document::PageContent,
    paginate::{LEADING_FIXED_PAGES, ReportPaginator, plan_pages},
};

fn paginator(sections: usize, responses: usize, trailing: usize) -> ReportPaginator {
    ReportPaginator::new(&Pagination {
        sections_per_page: sections,
        responses_per_page: responses,
        trailing_pages: trailing,
        closing_note: String::new(),
    })
    .unwrap()
}

#[test]
fn chunk_counts_are_ceil_of_units_over_capacity() {
    for n in 0..40usize {
        for c in 1..12usize {
            let units: Vec<usize> = (0..n).collect();
            let chunks = plan_pages(&units, c);
            assert_eq!(chunks.len(), n.div_ceil(c), "n={n} c={c}");
            assert!(chunks.iter().all(|ch| !ch.is_empty() && ch.len() <= c));
            let flat: Vec<usize> = chunks.into_iter().flatten().collect();
            assert_eq!(flat, units);
        }
    }
}

#[test]
fn twenty_three_responses_at_ten_per_page() {
    let p = paginator(2, 10, 0);
    let items: Vec<u32> = (0..23).collect();
    let pages = p.paginate(&items, 10, 4, 7, |chunk| {
        PageContent::Responses(Vec::with_capacity(chunk.len()))
    });
    assert_eq!(pages.len(), 3);
    let continued: Vec<bool> = pages.iter().map(|pg| pg.continued).collect();
    assert_eq!(continued, vec![false, true, true]);
    let numbers: Vec<usize> = pages.iter().map(|pg| pg.page_number).collect();
    assert_eq!(numbers, vec![5, 6, 7]);
    assert!(pages.iter().all(|pg| pg.total_pages == 7));

    let sizes: Vec<usize> = plan_pages(&items, 10).iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![10, 10, 3]);
}

#[test]
fn zero_units_produce_zero_pages() {
    let p = paginator(2, 10, 0);
    let none: Vec<u32> = Vec::new();
    assert!(p.paginate(&none, 10, 2, 2, |_| PageContent::Responses(vec![])).is_empty());
    let plan = p.plan(0, 0);
    assert_eq!(plan.total_pages(), LEADING_FIXED_PAGES);
}

#[test]
fn plan_total_and_offsets() {
    let plan = paginator(2, 8, 1).plan(5, 17);
    assert_eq!(plan.recommendation_pages, 3);
    assert_eq!(plan.response_pages, 3);
    assert_eq!(plan.total_pages(), 2 + 3 + 3 + 1);
    assert_eq!(plan.recommendations_offset(), 2);
    assert_eq!(plan.responses_offset(), 5);
    assert_eq!(plan.trailing_offset(), 8);
}

#[test]
fn non_positive_capacity_is_rejected() {
    let err = ReportPaginator::new(&Pagination {
        sections_per_page: 0,
        ..Pagination::default()
    })
    .err()
    .expect("must reject");
    assert!(matches!(err, ReportError::InvalidConfiguration(_)));
}
