use std::fs;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use kpi_engine::config::Config;
use kpi_engine::i18n::TargetLanguage;
use kpi_engine::pipeline::outlet::{REPORT_FILENAME, TRACE_FILENAME, render_trace};
use kpi_engine::pipeline::simulation::SimulatedStageInvoker;
use kpi_engine::{
    AnalysisParameters, KpiOrchestrator, OrchestrationTrace, RunStatus, Stage, StageInvoker,
    StageOutput, launch,
};

/// 每个阶段都以原始文本返回结果，模拟模型直接输出 JSON 字符串的情况
struct TextOnlyInvoker {
    planning: String,
}

#[async_trait]
impl StageInvoker for TextOnlyInvoker {
    async fn invoke(&self, stage: Stage, _prompt: &str) -> Result<StageOutput> {
        let text = match stage {
            Stage::Insights => json!({
                "campaign_id": "CAM_777",
                "metric_name": "ROAS",
                "deviation_value": "-1.2 below target",
                "hypotheses": ["Weekend spend spikes without conversions."]
            })
            .to_string(),
            Stage::Research => format!(
                "```json\n{}\n```",
                json!({
                    "root_cause": "Weekend audiences convert 40% less.",
                    "supporting_data": "Sat/Sun ROAS 1.9 vs weekday 3.8.",
                    "actionable_summary": "Apply weekend bid adjustments."
                })
            ),
            Stage::Planning => self.planning.clone(),
        };
        Ok(StageOutput::Text(text))
    }
}

fn orchestrator(invoker: impl StageInvoker + 'static) -> KpiOrchestrator {
    KpiOrchestrator::new(Arc::new(invoker), AnalysisParameters::default())
}

#[tokio::test]
async fn test_simulated_run_produces_full_trace() {
    let trace = orchestrator(SimulatedStageInvoker)
        .run("Increase ROAS to 4.5")
        .await;

    assert_eq!(trace.status, RunStatus::Success);
    let stages: Vec<_> = trace.steps.keys().copied().collect();
    assert_eq!(stages, vec![Stage::Insights, Stage::Research, Stage::Planning]);

    let plan = trace.plan().unwrap();
    assert_eq!(plan.recommendation_count(), 3);

    let report = render_trace(&trace, &TargetLanguage::English);
    assert!(report.contains("Increase Mobile Bid Multiplier"));
    assert!(report.contains("A/B Test New Mobile Ad Copy"));
    assert!(report.contains("Automate Smart Bidding Migration"));
}

#[tokio::test]
async fn test_text_outputs_are_parsed_for_every_stage() {
    let planning = json!({
        "overall_strategy": "Shift budget away from weekends.",
        "estimated_timeline": "2 weeks",
        "quick_wins": [{"title": "Weekend bid -30%", "description": "Lower weekend bids."}]
    })
    .to_string();

    let trace = orchestrator(TextOnlyInvoker { planning }).run("Fix weekend ROAS").await;

    assert!(trace.is_success());
    let insights = trace.step(Stage::Insights).unwrap();
    assert_eq!(insights.data["campaign_id"], "CAM_777");
    let research = trace.step(Stage::Research).unwrap();
    assert_eq!(
        research.data["root_cause"],
        "Weekend audiences convert 40% less."
    );
    assert_eq!(trace.plan().unwrap().quick_wins[0].title, "Weekend bid -30%");
}

#[tokio::test]
async fn test_non_object_plan_fails_planning_stage() {
    let trace = orchestrator(TextOnlyInvoker {
        planning: "[\"not\", \"a\", \"plan\"]".to_string(),
    })
    .run("Fix weekend ROAS")
    .await;

    assert_eq!(trace.status, RunStatus::FailedPlanning);
    assert!(trace.step(Stage::Insights).is_some());
    assert!(trace.step(Stage::Research).is_some());
    assert!(trace.step(Stage::Planning).is_none());
    assert!(trace.plan().is_none());

    let message = render_trace(&trace, &TargetLanguage::English);
    assert!(message.contains("failed_planning"));
}

#[tokio::test]
async fn test_launch_in_simulation_mode_writes_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.simulate = true;
    config.output_path = temp_dir.path().to_path_buf();
    config.pipeline.goal = "Increase overall ROAS to 4.5".to_string();

    let trace = launch(&config).await.unwrap();

    assert!(trace.is_success());
    let run_dir = temp_dir.path().join(trace.run_id.to_string());

    let saved: OrchestrationTrace =
        serde_json::from_str(&fs::read_to_string(run_dir.join(TRACE_FILENAME)).unwrap()).unwrap();
    assert_eq!(saved.goal, "Increase overall ROAS to 4.5");
    assert_eq!(saved.status, RunStatus::Success);

    let report = fs::read_to_string(run_dir.join(REPORT_FILENAME)).unwrap();
    assert!(report.contains("FINAL ANALYSIS AND STRATEGY REPORT"));
}
