// KPI 三阶段流水线
// L1 Insights：对照目标指标找出差距最大的广告系列 → GapReport
// L2 Research：基于 GapReport 的假设在数据仓库中做因果验证 → ResearchSummary
// L3 Planning：把根因转成快速见效 / 中等投入 / 高投入三档计划 → Plan
// 每个阶段的输出序列化为 JSON 后原样作为下一阶段的输入。

pub mod agents;
pub mod context;
pub mod invoker;
pub mod orchestrator;
pub mod outlet;
pub mod simulation;
pub mod stage;
pub mod trace;
pub mod workflow;
