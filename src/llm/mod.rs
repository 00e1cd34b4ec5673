//! LLM 模块
//!
//! 提供 OpenAI 兼容的补全客户端，以及文件改写流程依赖的 `CompletionClient` 接口。

mod client;
mod format;
mod openai;
mod types;

pub use client::{CompletionClient, LlmClient};
pub use types::*;
