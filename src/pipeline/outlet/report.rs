//! 最终计划的人类可读渲染，所有字段缺失时都以占位符代替

use crate::i18n::TargetLanguage;
use crate::pipeline::trace::OrchestrationTrace;
use crate::types::{Plan, RecommendationTier};

/// 每个档位最多展示的建议条数
pub const MAX_ITEMS_PER_TIER: usize = 3;

const PLACEHOLDER: &str = "N/A";

fn or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

/// 渲染最终策略报告
pub fn render_plan_report(plan: &Plan, language: &TargetLanguage) -> String {
    let mut report = String::new();
    let rule = "=".repeat(80);
    let thin_rule = "-".repeat(30);

    report.push_str(&format!(
        "{}\n{}\n{}\n\n",
        rule,
        language.report_label("title"),
        rule
    ));
    report.push_str(&format!(
        "{}: {}\n",
        language.report_label("overall_strategy"),
        or_placeholder(&plan.overall_strategy)
    ));
    report.push_str(&format!(
        "{}: {}\n",
        language.report_label("estimated_timeline"),
        or_placeholder(&plan.estimated_timeline)
    ));

    for tier in RecommendationTier::ALL {
        let items = plan.tier(tier);
        report.push_str(&format!(
            "\n{}\n--- {} ({} {}) ---\n{}\n",
            thin_rule,
            language.report_label(tier.key()),
            items.len(),
            language.report_label("recommendations"),
            thin_rule
        ));
        for rec in items.iter().take(MAX_ITEMS_PER_TIER) {
            report.push_str(&format!(
                "  • **{}**: {}\n",
                or_placeholder(&rec.title),
                or_placeholder(&rec.description)
            ));
        }
    }

    report
}

/// 渲染失败信息，只指出失败阶段，不渲染任何部分计划
pub fn render_failure(trace: &OrchestrationTrace, language: &TargetLanguage) -> String {
    let mut message = format!(
        "{}: {}. {}",
        language.report_label("failed"),
        trace.status,
        language.report_label("check_logs")
    );
    if let Some(failure) = &trace.failure {
        message.push_str(&format!("\n  [{}] {}", failure.kind, failure.message));
    }
    message
}

/// 根据运行结果渲染报告或失败信息
pub fn render_trace(trace: &OrchestrationTrace, language: &TargetLanguage) -> String {
    match trace.plan() {
        Some(plan) => render_plan_report(&plan, language),
        None => render_failure(trace, language),
    }
}
