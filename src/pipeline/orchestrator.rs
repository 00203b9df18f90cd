use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::PipelineConfig;
use crate::pipeline::stage::{Stage, StageError, StageInvoker, StageOutput, normalize};
use crate::pipeline::trace::OrchestrationTrace;
use crate::types::{Contract, GapReport, Plan, ResearchSummary};

/// 嵌入初始提示词的固定分析参数
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParameters {
    pub target_metric: String,
    pub target_value: f64,
    pub timeframe_days: u32,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for AnalysisParameters {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            target_metric: config.target_metric.clone(),
            target_value: config.target_value,
            timeframe_days: config.timeframe_days,
        }
    }
}

/// 已通过校验的阶段结果
struct CompletedStage {
    data: Value,
    serialized: String,
}

/// KPI三阶段编排器：Insights → Research → Planning
pub struct KpiOrchestrator {
    invoker: Arc<dyn StageInvoker>,
    parameters: AnalysisParameters,
    stage_timeout: Option<Duration>,
}

impl KpiOrchestrator {
    pub fn new(invoker: Arc<dyn StageInvoker>, parameters: AnalysisParameters) -> Self {
        Self {
            invoker,
            parameters,
            stage_timeout: None,
        }
    }

    /// 为每次阶段调用设置超时，超时按调用失败处理
    pub fn with_stage_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// 构建Insights阶段的初始提示词
    pub fn initial_prompt(&self, goal: &str) -> String {
        format!(
            "Assess current {} against a target of {} and identify the top campaign holding back performance. Target timeframe: {} days. Initial KPI goal: {}",
            self.parameters.target_metric,
            self.parameters.target_value,
            self.parameters.timeframe_days,
            goal
        )
    }

    /// 执行完整流水线
    ///
    /// 任一阶段失败即终止，已完成阶段保留在返回的轨迹中；错误不会越过这里向外传播。
    pub async fn run(&self, goal: &str) -> OrchestrationTrace {
        let mut trace = OrchestrationTrace::new(goal);
        let initial_prompt = self.initial_prompt(goal);
        tracing::info!(run_id = %trace.run_id, "initial prompt: {}", initial_prompt);

        let Some(gap_json) = self
            .run_stage::<GapReport>(Stage::Insights, &initial_prompt, &mut trace)
            .await
        else {
            return trace.finish();
        };

        let Some(research_json) = self
            .run_stage::<ResearchSummary>(Stage::Research, &gap_json, &mut trace)
            .await
        else {
            return trace.finish();
        };

        if self
            .run_stage::<Plan>(Stage::Planning, &research_json, &mut trace)
            .await
            .is_some()
        {
            println!("\n✓ 最终策略计划已生成");
        }

        trace.finish()
    }

    /// 执行单个阶段并写入轨迹，成功时返回交给下一阶段的文本
    async fn run_stage<T: Contract>(
        &self,
        stage: Stage,
        input: &str,
        trace: &mut OrchestrationTrace,
    ) -> Option<String> {
        println!(
            "\n🤖 执行第 {} 阶段 {} 智能体...",
            stage.ordinal(),
            stage.as_str().to_uppercase()
        );

        match self.execute_stage::<T>(stage, input).await {
            Ok(completed) => {
                tracing::info!(stage = %stage, "{} output validated", T::CONTRACT_NAME);
                tracing::debug!(stage = %stage, "{}", completed.serialized);
                println!("✓ {} 阶段完成", stage);

                let next_input = stage.next().map(|_| completed.serialized.clone());
                trace.record_completed(stage, completed.data, next_input);
                Some(completed.serialized)
            }
            Err(err) => {
                tracing::error!(stage = %stage, kind = err.kind(), "STAGE {} FAILED: {}", stage.ordinal(), err);
                eprintln!("❌ {} 阶段失败: {}", stage, err);
                trace.record_failure(stage, &err);
                None
            }
        }
    }

    async fn execute_stage<T: Contract>(
        &self,
        stage: Stage,
        input: &str,
    ) -> Result<CompletedStage, StageError> {
        let output = self.invoke(stage, input).await?;
        let record: T = normalize(output)?;

        let data =
            serde_json::to_value(&record).map_err(|e| StageError::Normalization(e.to_string()))?;
        let serialized = serde_json::to_string_pretty(&record)
            .map_err(|e| StageError::Normalization(e.to_string()))?;

        Ok(CompletedStage { data, serialized })
    }

    async fn invoke(&self, stage: Stage, input: &str) -> Result<StageOutput, StageError> {
        let call = self.invoker.invoke(stage, input);
        let result = match self.stage_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                StageError::Invocation(format!("timed out after {}s", limit.as_secs_f64()))
            })?,
            None => call.await,
        };
        result.map_err(|e| StageError::Invocation(format!("{:#}", e)))
    }
}
