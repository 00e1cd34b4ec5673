//! 统一 LLM 客户端

use futures::{Stream, StreamExt};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, info};

use super::openai::stream_openai;
use super::types::{ChatChunk, ChatMessage, ChatOptions, CompletionOutput, LlmError, LlmSettings};

/// 文本补全服务
///
/// 输入一段完整的提示文本，返回模型生成的文本。文件改写流程只依赖这个接口。
pub trait CompletionClient {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, LlmError>> + Send;
}

impl<T: CompletionClient + Sync> CompletionClient for &T {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }
}

/// OpenAI 兼容接口的补全客户端
pub struct LlmClient {
    client: Client,
    settings: LlmSettings,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(settings: LlmSettings) -> Result<Self, LlmError> {
        if settings.api_key.trim().is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: Some(self.settings.temperature),
            max_tokens: Some(self.settings.max_tokens),
        }
    }

    /// 流式聊天
    pub fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Pin<Box<dyn Stream<Item = Result<ChatChunk, LlmError>> + Send>> {
        stream_openai(
            self.client.clone(),
            self.settings.api_key.clone(),
            &self.settings.base_url,
            self.settings.model.clone(),
            messages,
            self.options(),
        )
    }

    /// 流式请求并收集完整响应
    pub async fn stream_and_collect(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<CompletionOutput, LlmError> {
        let mut stream = self.stream_chat(messages);
        let mut output = CompletionOutput::default();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            output.chunk_count += 1;

            if let Some(content) = chunk.content {
                output.content.push_str(&content);
            }
            if chunk.finish_reason.is_some() {
                output.finish_reason = chunk.finish_reason;
            }
        }

        Ok(output)
    }
}

impl CompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        info!("LLM request: model={}, prompt_chars={}", self.settings.model, prompt.len());

        let output = self
            .stream_and_collect(vec![ChatMessage::user(prompt)])
            .await?;

        debug!(
            "LLM response: chunks={}, chars={}, finish_reason={:?}",
            output.chunk_count,
            output.content.len(),
            output.finish_reason
        );

        if output.content.trim().is_empty() {
            return Err(LlmError::StreamError("empty completion".to_string()));
        }

        Ok(output.content)
    }
}
