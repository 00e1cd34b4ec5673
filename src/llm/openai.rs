//! OpenAI Chat Completions API 流式实现

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::{debug, error};

use super::format::{chat_completions_endpoint, drain_lines, parse_sse_line, SseLine};
use super::types::{ChatChunk, ChatMessage, ChatOptions, LlmError};

/// OpenAI 请求载荷
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI SSE 响应块
#[derive(Deserialize, Debug)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    #[serde(default)]
    delta: OpenAiDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct OpenAiDelta {
    content: Option<String>,
}

/// 把一条 `data:` 负载转换为响应块，无法解析的负载返回 None
fn decode_chunk(data: &str) -> Option<ChatChunk> {
    match serde_json::from_str::<OpenAiStreamChunk>(data) {
        Ok(chunk) => chunk.choices.into_iter().next().map(|choice| ChatChunk {
            content: choice.delta.content,
            finish_reason: choice.finish_reason,
        }),
        Err(e) => {
            debug!("Failed to parse OpenAI chunk: {}, data: {}", e, data);
            None
        }
    }
}

/// 非 2xx 响应转换为 ApiError
async fn ensure_success(response: Response) -> Result<Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    error!(
        "OpenAI API error: status={}, body={}",
        status.as_u16(),
        message.chars().take(500).collect::<String>()
    );
    Err(LlmError::ApiError {
        status: status.as_u16(),
        message,
    })
}

/// 流式调用 OpenAI 兼容接口
pub fn stream_openai(
    client: Client,
    api_key: String,
    base_url: &str,
    model: String,
    messages: Vec<ChatMessage>,
    options: ChatOptions,
) -> Pin<Box<dyn Stream<Item = Result<ChatChunk, LlmError>> + Send>> {
    let endpoint = chat_completions_endpoint(base_url);

    Box::pin(try_stream! {
        let payload = OpenAiRequest {
            model: &model,
            messages: &messages,
            stream: true,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!("OpenAI API request: endpoint={}, model={}", endpoint, model);

        let response = client
            .post(&endpoint)
            .bearer_auth(&api_key)
            .json(&payload)
            .send()
            .await?;

        let response = ensure_success(response).await?;

        let mut buffer: Vec<u8> = Vec::new();
        let mut body = response.bytes_stream();

        while let Some(bytes) = body.next().await {
            buffer.extend_from_slice(&bytes?);

            for line in drain_lines(&mut buffer) {
                match parse_sse_line(&line) {
                    SseLine::Done => return,
                    SseLine::Data(data) => {
                        if let Some(chunk) = decode_chunk(data) {
                            yield chunk;
                        }
                    }
                    SseLine::Ignored => {}
                }
            }
        }

        // 最后一行可能没有换行符
        let tail = String::from_utf8_lossy(&buffer).into_owned();
        if let SseLine::Data(data) = parse_sse_line(&tail) {
            if let Some(chunk) = decode_chunk(data) {
                yield chunk;
            }
        }
    })
}
