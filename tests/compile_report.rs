use assessment_report::{
    ReportAssembler, compile_report,
    config::Config,
    document::{PageContent, PageKind},
    model::{AnswerRecord, Assessment, NarrativeSource, QuestionCatalog, QuestionMeta},
    render::{OutlineRenderer, Renderer},
};

const CATEGORIES: [&str; 4] = ["Strategy", "Data", "People", "Technology"];

fn catalog(n: u64) -> QuestionCatalog {
    (1..=n)
        .map(|id| QuestionMeta {
            id: id.into(),
            category: CATEGORIES[(id as usize - 1) % CATEGORIES.len()].into(),
            text: format!("Statement {id}"),
        })
        .collect()
}

fn assessment(n: u64) -> Assessment {
    Assessment {
        id: "asm-42".into(),
        title: "AI Readiness".into(),
        respondent: Some("Acme Corp".into()),
        completed_at: Some("2026-10-01".into()),
        answers: (1..=n)
            .map(|id| {
                let value = if id % 7 == 0 {
                    None
                } else {
                    Some((id % 5) as i64 - 2)
                };
                AnswerRecord::new(id, value)
            })
            .collect(),
    }
}

const NARRATIVE: &str = "## Strategy\nSet goals.\n- Define KPIs\n\n\
## Data\nClean it.\n\n\
## People\n- Train staff\n\n\
## Technology\nModernize.\n\n\
## Governance\n1. Form a board";

#[test]
fn pages_follow_fixed_order_and_numbering() {
    let doc = compile_report(&assessment(23), NARRATIVE, &catalog(23)).unwrap();

    // 2 fixed + ceil(5/2) + ceil(23/10)
    assert_eq!(doc.total_pages, 2 + 3 + 3);
    assert_eq!(doc.pages.len(), doc.total_pages);

    let kinds: Vec<PageKind> = doc.pages.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PageKind::Cover,
            PageKind::Chart,
            PageKind::Recommendations,
            PageKind::Recommendations,
            PageKind::Recommendations,
            PageKind::Responses,
            PageKind::Responses,
            PageKind::Responses,
        ]
    );
    for (i, page) in doc.pages.iter().enumerate() {
        assert_eq!(page.page_number, i + 1);
        assert_eq!(page.total_pages, doc.total_pages);
    }

    let response_sizes: Vec<usize> = doc
        .pages_of(PageKind::Responses)
        .map(|p| p.content.unit_count())
        .collect();
    assert_eq!(response_sizes, vec![10, 10, 3]);

    let continued: Vec<bool> = doc
        .pages_of(PageKind::Recommendations)
        .map(|p| p.continued)
        .collect();
    assert_eq!(continued, vec![false, true, true]);
    assert_eq!(doc.pages[3].heading(), "Recommendations (continued)");
}

#[test]
fn compile_is_idempotent() {
    let a = assessment(30);
    let c = catalog(30);
    let first = compile_report(&a, NARRATIVE, &c).unwrap();
    let second = compile_report(&a, NARRATIVE, &c).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
}

#[test]
fn wrapped_and_plain_narratives_compile_the_same() {
    let a = assessment(8);
    let c = catalog(8);
    let plain = compile_report(&a, NARRATIVE, &c).unwrap();
    let wrapped: NarrativeSource =
        serde_json::from_value(serde_json::json!({ "content": NARRATIVE })).unwrap();
    let from_wrapped = compile_report(&a, wrapped, &c).unwrap();
    assert_eq!(plain, from_wrapped);
}

#[test]
fn empty_narrative_and_answers_still_produce_cover_and_chart() {
    let a = Assessment {
        answers: vec![],
        ..assessment(0)
    };
    let doc = compile_report(&a, "", &catalog(4)).unwrap();
    assert_eq!(doc.total_pages, 2);
    match &doc.pages[1].content {
        PageContent::Chart(chart) => {
            assert_eq!(chart.scores.len(), 4);
            assert!(chart.scores.iter().all(|s| s.no_data));
        }
        other => panic!("expected chart page, got {other:?}"),
    }
    match &doc.pages[0].content {
        PageContent::Cover(cover) => assert_eq!(cover.overall_score, None),
        other => panic!("expected cover page, got {other:?}"),
    }
}

#[test]
fn trailing_pages_close_the_document() {
    let mut cfg = Config::default();
    cfg.pagination.responses_per_page = 8;
    cfg.pagination.trailing_pages = 1;
    cfg.pagination.closing_note = "Contact your advisor.".into();

    let doc = ReportAssembler::new(&cfg)
        .unwrap()
        .compile(&assessment(9), NARRATIVE, &catalog(9))
        .unwrap();

    // 2 + ceil(5/2) + ceil(9/8) + 1
    assert_eq!(doc.total_pages, 8);
    let last = doc.pages.last().unwrap();
    assert_eq!(last.kind(), PageKind::Closing);
    assert_eq!(last.page_number, 8);
    assert_eq!(last.footer(), "Page 8 of 8");
}

#[test]
fn responses_carry_question_text_and_labels() {
    let doc = compile_report(&assessment(7), NARRATIVE, &catalog(7)).unwrap();
    let items: Vec<_> = doc
        .pages_of(PageKind::Responses)
        .flat_map(|p| match &p.content {
            PageContent::Responses(items) => items.clone(),
            _ => vec![],
        })
        .collect();
    assert_eq!(items.len(), 7);
    assert_eq!(items[0].question_text, "Statement 1");
    assert_eq!(items[0].label, "Disagree");
    assert_eq!(items[6].label, "Not answered");
}

#[test]
fn outline_renderer_lists_every_page() {
    let doc = compile_report(&assessment(12), NARRATIVE, &catalog(12)).unwrap();
    let text = OutlineRenderer.render(&doc).unwrap();
    assert_eq!(text.matches("=== ").count(), doc.total_pages);
    assert!(text.contains("## Governance"));
    assert!(text.contains(&format!("Page 1 of {}", doc.total_pages)));
}
