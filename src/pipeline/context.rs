use anyhow::Result;

use crate::{config::Config, llm::client::LLMClient, llm::tools::warehouse::WarehouseSqlTool};

#[derive(Clone)]
pub struct PipelineContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 配置
    pub config: Config,
    /// 数据仓库SQL工具，未配置访问令牌时为空
    pub warehouse_tool: Option<WarehouseSqlTool>,
}

impl PipelineContext {
    /// 创建新的流水线上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(&config.llm)?;
        let warehouse_tool = config
            .warehouse
            .is_enabled()
            .then(|| WarehouseSqlTool::new(config.warehouse.clone()));

        Ok(Self {
            llm_client,
            config,
            warehouse_tool,
        })
    }
}
