pub mod cli;
pub mod config;
pub mod i18n;
pub mod llm;
pub mod observability;
pub mod pipeline;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::orchestrator::{AnalysisParameters, KpiOrchestrator};
pub use pipeline::stage::{Stage, StageError, StageInvoker, StageOutput};
pub use pipeline::trace::{OrchestrationTrace, RunStatus};
pub use pipeline::workflow::launch;
