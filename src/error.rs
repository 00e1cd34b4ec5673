//! 统一错误处理模块
//!
//! 定义启动阶段与运行阶段的应用级错误。单个文件的处理错误在改写流程内部记录，不会上升到这里。

use thiserror::Error;

use crate::llm::LlmError;
use crate::services::doc_writer::ScanError;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 命令行参数缺失或不合法
    #[error("参数错误: {0}")]
    Usage(String),

    /// 目录扫描失败，整次运行中止
    #[error("扫描失败: {0}")]
    Scan(#[from] ScanError),

    /// 补全客户端初始化失败
    #[error("LLM 错误: {0}")]
    Llm(#[from] LlmError),
}

impl AppError {
    /// 进程退出码：参数与配置错误返回 1，其余运行错误返回 2
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Usage(_) | AppError::Llm(_) => 1,
            AppError::Scan(_) => 2,
        }
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
