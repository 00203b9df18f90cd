use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::invoker::AgentStageInvoker;
use crate::pipeline::orchestrator::{AnalysisParameters, KpiOrchestrator};
use crate::pipeline::outlet::{DiskOutlet, Outlet, render_trace};
use crate::pipeline::simulation::SimulatedStageInvoker;
use crate::pipeline::stage::StageInvoker;
use crate::pipeline::trace::OrchestrationTrace;

/// 根据配置选择阶段调用器
pub async fn build_invoker(config: &Config) -> Result<Arc<dyn StageInvoker>> {
    if config.should_simulate() {
        println!("⚠️ 未配置模型服务或指定了模拟模式，使用内置模拟阶段演示完整流程");
        return Ok(Arc::new(SimulatedStageInvoker));
    }

    let context = PipelineContext::new(config.clone())?;

    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    if context.warehouse_tool.is_none() {
        println!("⚠️ 未配置数据仓库访问令牌，智能体将无法执行SQL查询");
    }

    Ok(Arc::new(AgentStageInvoker::new(context)))
}

/// 启动KPI分析工作流
pub async fn launch(config: &Config) -> Result<OrchestrationTrace> {
    let invoker = build_invoker(config).await?;
    execute(config, invoker).await
}

/// 使用给定的阶段调用器执行一次完整运行，并输出报告
pub async fn execute(config: &Config, invoker: Arc<dyn StageInvoker>) -> Result<OrchestrationTrace> {
    let goal = &config.pipeline.goal;
    let banner = "*".repeat(80);
    println!("\n{}\n🚀 STARTING KPI ACHIEVEMENT ENGINE FOR GOAL: {}\n{}", banner, goal, banner);

    let orchestrator = KpiOrchestrator::new(invoker, AnalysisParameters::from(&config.pipeline))
        .with_stage_timeout(
            config
                .pipeline
                .stage_timeout_seconds
                .map(Duration::from_secs),
        );

    let trace = orchestrator.run(goal).await;

    if let Some(finished_at) = trace.finished_at {
        let elapsed = finished_at - trace.started_at;
        tracing::info!(
            run_id = %trace.run_id,
            status = %trace.status,
            "run finished in {:.2}s",
            elapsed.num_milliseconds() as f64 / 1000.0
        );
    }

    println!("\n{}", render_trace(&trace, &config.target_language));

    if config.save_outputs {
        DiskOutlet::new(&config.output_path, config.target_language.clone()).save(&trace)?;
    }

    Ok(trace)
}
