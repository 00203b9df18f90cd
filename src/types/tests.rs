use super::*;
use serde_json::json;

fn sample_gap() -> GapReport {
    GapReport {
        campaign_id: "CAM_1234".to_string(),
        metric_name: "ROAS".to_string(),
        deviation_value: "-25% lower than target 4.5".to_string(),
        hypotheses: vec!["Device type bias.".to_string()],
    }
}

#[test]
fn test_gap_report_complete_has_no_missing_fields() {
    assert!(sample_gap().missing_fields().is_empty());
}

#[test]
fn test_gap_report_reports_blank_fields() {
    let report = GapReport {
        campaign_id: "  ".to_string(),
        hypotheses: vec![String::new()],
        ..sample_gap()
    };

    assert_eq!(report.missing_fields(), vec!["campaign_id", "hypotheses"]);
}

#[test]
fn test_gap_report_requires_every_field_on_ingestion() {
    let value = json!({
        "campaign_id": "CAM_1",
        "metric_name": "ROAS",
        "hypotheses": ["geo"]
    });

    let err = serde_json::from_value::<GapReport>(value).unwrap_err();
    assert!(err.to_string().contains("deviation_value"));
}

#[test]
fn test_research_summary_missing_fields() {
    let summary = ResearchSummary {
        root_cause: "Mobile bids too low".to_string(),
        supporting_data: String::new(),
        actionable_summary: "".to_string(),
    };

    assert_eq!(
        summary.missing_fields(),
        vec!["supporting_data", "actionable_summary"]
    );
}

#[test]
fn test_plan_tolerates_missing_fields() {
    let plan: Plan = serde_json::from_value(json!({
        "overall_strategy": "Shift mobile bids",
        "quick_wins": [{"title": "Raise bids"}]
    }))
    .unwrap();

    assert_eq!(plan.overall_strategy, "Shift mobile bids");
    assert!(plan.estimated_timeline.is_empty());
    assert_eq!(plan.quick_wins[0].title, "Raise bids");
    assert!(plan.quick_wins[0].implementation_steps.is_empty());
    assert_eq!(plan.recommendation_count(), 1);
    assert!(plan.missing_fields().is_empty());
}

#[test]
fn test_plan_rejects_wrong_field_types() {
    let result = serde_json::from_value::<Plan>(json!({ "quick_wins": "none" }));
    assert!(result.is_err());
}

#[test]
fn test_stage_record_contract_names() {
    assert_eq!(StageRecord::from(sample_gap()).contract_name(), "GapReport");
    assert_eq!(StageRecord::from(Plan::default()).contract_name(), "Plan");
}

#[test]
fn test_recommendation_tier_keys_follow_display_order() {
    let keys: Vec<_> = RecommendationTier::ALL.iter().map(|t| t.key()).collect();
    assert_eq!(keys, vec!["quick_wins", "medium_effort", "high_effort"]);
}
