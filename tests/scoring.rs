use assessment_report::{
    compute_category_scores,
    model::{AnswerRecord, Assessment, QuestionCatalog, QuestionMeta, likert_label},
    scoring::{normalize, overall_score},
};

fn q(id: u64, category: &str) -> QuestionMeta {
    QuestionMeta {
        id: id.into(),
        category: category.into(),
        text: format!("Question {id}"),
    }
}

fn ans(id: u64, value: Option<i64>) -> AnswerRecord {
    AnswerRecord::new(id, value)
}

fn assessment(answers: Vec<AnswerRecord>) -> Assessment {
    Assessment {
        id: "a-1".into(),
        title: "Readiness".into(),
        answers,
        ..Default::default()
    }
}

#[test]
fn normalization_endpoints() {
    assert_eq!(normalize(-2), 0.0);
    assert_eq!(normalize(-1), 2.5);
    assert_eq!(normalize(0), 5.0);
    assert_eq!(normalize(1), 7.5);
    assert_eq!(normalize(2), 10.0);
}

#[test]
fn strategy_and_data_scenario() {
    let catalog = QuestionCatalog::new(vec![q(1, "Strategy"), q(2, "Strategy"), q(3, "Data")]);
    let a = assessment(vec![
        ans(1, Some(2)),
        ans(2, Some(-2)),
        ans(3, Some(0)),
    ]);

    let scores = compute_category_scores(&a, &catalog);
    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].category, "Strategy");
    assert_eq!(scores[0].score, 5.0);
    assert!(!scores[0].no_data);
    assert_eq!(scores[1].category, "Data");
    assert_eq!(scores[1].score, 5.0);
    assert_eq!(scores[1].display_percent(), 50);
}

#[test]
fn averaging_ignores_answer_order() {
    let catalog = QuestionCatalog::new(vec![q(1, "People"), q(2, "People"), q(3, "People")]);
    let forward = assessment(vec![
        ans(1, Some(1)),
        ans(2, Some(2)),
        ans(3, Some(-1)),
    ]);
    let reversed = assessment(forward.answers.iter().rev().cloned().collect());

    let a = compute_category_scores(&forward, &catalog);
    let b = compute_category_scores(&reversed, &catalog);
    assert!((a[0].score - b[0].score).abs() < 1e-9);
    // (7.5 + 10 + 2.5) / 3 = 6.666.. -> 6.7
    assert_eq!(a[0].score, 6.7);
}

#[test]
fn unmapped_questions_go_to_uncategorized() {
    let catalog = QuestionCatalog::new(vec![q(1, "Strategy")]);
    let a = assessment(vec![
        ans(1, Some(1)),
        ans(99, Some(2)),
    ]);
    let scores = compute_category_scores(&a, &catalog);
    assert_eq!(scores[1].category, "Uncategorized");
    assert_eq!(scores[1].score, 10.0);
}

#[test]
fn empty_answer_set_marks_every_category_without_data() {
    let catalog = QuestionCatalog::new(vec![q(1, "Strategy"), q(2, "Data"), q(3, "Data")]);
    let scores = compute_category_scores(&assessment(vec![]), &catalog);
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|s| s.no_data && s.score == 0.0));
    assert_eq!(overall_score(&scores), None);
}

#[test]
fn null_and_out_of_range_values_do_not_count() {
    let catalog = QuestionCatalog::new(vec![q(1, "Ops"), q(2, "Ops"), q(3, "Risk")]);
    let a = assessment(vec![
        ans(3, None),
        ans(1, Some(1)),
        ans(2, Some(7)),
    ]);
    let scores = compute_category_scores(&a, &catalog);
    // first-seen order follows the answer list, including unanswered records
    assert_eq!(scores[0].category, "Risk");
    assert!(scores[0].no_data);
    assert_eq!(scores[1].category, "Ops");
    assert_eq!(scores[1].score, 7.5);
    assert_eq!(overall_score(&scores), Some(7.5));
}

#[test]
fn string_and_numeric_ids_match() {
    let metadata = r#"[{"id": "7", "category": "Culture", "text": "t"}]"#;
    let catalog: QuestionCatalog = serde_json::from_str::<Vec<QuestionMeta>>(metadata)
        .expect("metadata")
        .into_iter()
        .collect();
    let a: Assessment = serde_json::from_str(r#"{"answers": [{"question_id": 7, "value": -1}]}"#)
        .expect("assessment");
    let scores = compute_category_scores(&a, &catalog);
    assert_eq!(scores[0].category, "Culture");
    assert_eq!(scores[0].score, 2.5);
}

#[test]
fn values_beyond_small_integers_parse_and_count_as_unanswered() {
    let catalog = QuestionCatalog::new(vec![q(1, "Risk"), q(2, "Risk")]);
    let raw = r#"{"answers": [{"question_id": 1, "value": 300}, {"question_id": 2, "value": 1}]}"#;
    let a: Assessment = serde_json::from_str(raw).expect("wide values parse");
    assert_eq!(a.answers[0].value, Some(300));
    assert_eq!(a.answers[0].scored_value(), None);
    assert_eq!(likert_label(a.answers[0].value), "Invalid response");

    let scores = compute_category_scores(&a, &catalog);
    assert_eq!(scores[0].score, 7.5);
    assert!(!scores[0].no_data);
}
