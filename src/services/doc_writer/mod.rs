//! 文档改写模块
//!
//! 扫描项目，为每个文件选择 prompt，调用模型为源码补充文档注释，并把结果写回原文件。
//!
//! # 流程
//!
//! - 扫描：递归列出项目文件，按扩展名、排除后缀与路径正则过滤
//! - 选择：按扩展名从映射表中取 prompt，缺省时使用默认 prompt
//! - 改写：prompt + 源码发送给模型，剥离整段代码块包裹后覆盖原文件
//!
//! 单个文件失败只记录日志；扫描失败则整次运行中止。
//!
//! # 使用示例
//!
//! ```ignore
//! let config = AppConfig::load(None)?;
//! let client = LlmClient::new(config.llm_settings()?)?;
//!
//! let processor = ProjectProcessor::new(
//!     "/path/to/project",
//!     scanner_from_config(&config)?,
//!     resolver_from_config(&config),
//!     client,
//! );
//! let stats = processor.run().await?;
//! ```

mod fence;
mod mutator;
mod processor;
pub mod prompts;
mod scanner;
pub mod types;

pub use processor::{process_single, ProjectProcessor};
pub use prompts::PromptResolver;
pub use scanner::{ProjectScanner, ScanError, ScanFilter};
pub use types::RunStats;

use crate::config::AppConfig;

/// 根据配置构建扫描器
pub fn scanner_from_config(config: &AppConfig) -> Result<ProjectScanner, ScanError> {
    let filter = ScanFilter::new(
        &config.file_types,
        &config.excluded_file_types,
        &config.excluded_patterns,
    )?;
    ProjectScanner::new(filter, &config.ignore_dirs)
}

/// 根据配置构建 prompt 选择器
pub fn resolver_from_config(config: &AppConfig) -> PromptResolver {
    PromptResolver::new(&config.prompt, config.prompt_by_types.as_ref())
}
