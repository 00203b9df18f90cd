use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::i18n::TargetLanguage;
use crate::pipeline::trace::OrchestrationTrace;

pub mod report;

pub use report::{render_failure, render_plan_report, render_trace};

pub const TRACE_FILENAME: &str = "trace.json";
pub const REPORT_FILENAME: &str = "report.md";

/// 运行结果的输出端
pub trait Outlet {
    fn save(&self, trace: &OrchestrationTrace) -> Result<PathBuf>;
}

/// 把运行轨迹和报告写入 `<output_path>/<run_id>/`
pub struct DiskOutlet {
    output_path: PathBuf,
    target_language: TargetLanguage,
}

impl DiskOutlet {
    pub fn new(output_path: &Path, target_language: TargetLanguage) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            target_language,
        }
    }
}

impl Outlet for DiskOutlet {
    fn save(&self, trace: &OrchestrationTrace) -> Result<PathBuf> {
        println!("\n🖊️ 运行结果存储中...");
        let run_dir = self.output_path.join(trace.run_id.to_string());
        fs::create_dir_all(&run_dir)
            .context(format!("Failed to create output directory: {:?}", run_dir))?;

        let trace_json = serde_json::to_string_pretty(trace)?;
        fs::write(run_dir.join(TRACE_FILENAME), trace_json)
            .context("Failed to write trace file")?;

        let report = render_trace(trace, &self.target_language);
        fs::write(run_dir.join(REPORT_FILENAME), report).context("Failed to write report file")?;

        println!("💾 已保存到 {}", run_dir.display());
        Ok(run_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stage::{Stage, StageError};
    use tempfile::TempDir;

    #[test]
    fn test_disk_outlet_writes_trace_and_report() {
        let temp_dir = TempDir::new().unwrap();
        let mut trace = OrchestrationTrace::new("goal");
        trace.record_failure(
            Stage::Insights,
            &StageError::Normalization("expected a JSON object".to_string()),
        );
        let trace = trace.finish();

        let outlet = DiskOutlet::new(temp_dir.path(), TargetLanguage::English);
        let run_dir = outlet.save(&trace).unwrap();

        assert_eq!(run_dir, temp_dir.path().join(trace.run_id.to_string()));
        let saved: OrchestrationTrace =
            serde_json::from_str(&fs::read_to_string(run_dir.join(TRACE_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(saved, trace);

        let report = fs::read_to_string(run_dir.join(REPORT_FILENAME)).unwrap();
        assert!(report.contains("failed_insights"));
    }
}
