//! 单文件改写
//!
//! 读取源码，连同 prompt 发给模型，剥离代码块包裹后整体覆盖原文件。

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info};

use super::fence::strip_code_fence;
use super::prompts::format_message;
use crate::llm::{CompletionClient, LlmError};

/// 文件改写器
pub struct FileMutator<C> {
    client: C,
}

impl<C: CompletionClient> FileMutator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// 改写一个文件
    ///
    /// 读取失败或模型调用失败时文件保持原样；写入失败时生成的内容丢失。
    /// 写入直接覆盖目标文件，没有备份也没有临时文件重命名。
    pub async fn process(&self, path: &Path, prompt: &str) -> Result<(), ProcessError> {
        let source = fs::read_to_string(path)
            .await
            .map_err(|e| ProcessError::Read(path.to_path_buf(), e))?;

        let message = format_message(prompt, &source);
        debug!("Sending {} ({} chars) to completion service", path.display(), message.len());

        let completion = self
            .client
            .complete(&message)
            .await
            .map_err(|e| ProcessError::Completion(path.to_path_buf(), e))?;

        let content = strip_code_fence(&completion);

        fs::write(path, content)
            .await
            .map_err(|e| ProcessError::Write(path.to_path_buf(), e))?;

        Ok(())
    }

    /// 改写一个文件，错误只记录日志不向上传递
    ///
    /// 返回是否成功，供调用方统计。
    pub async fn process_logged(&self, path: &Path, prompt: &str) -> bool {
        match self.process(path, prompt).await {
            Ok(()) => {
                info!("Processed file: {}", path.display());
                true
            }
            Err(e) => {
                error!("Error processing file {}: {}", path.display(), e);
                false
            }
        }
    }
}

/// 单文件处理错误
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("读取文件失败 ({0}): {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("模型调用失败 ({0}): {1}")]
    Completion(PathBuf, #[source] LlmError),

    #[error("写入文件失败 ({0}): {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    type Responder = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

    /// 按脚本应答的补全客户端，记录收到的每条消息
    pub(crate) struct ScriptedClient {
        respond: Responder,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        pub(crate) fn new<F>(respond: F) -> Self
        where
            F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
        {
            Self {
                respond: Box::new(respond),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CompletionClient for ScriptedClient {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(prompt.to_string());
            (self.respond)(prompt)
        }
    }

    pub(crate) fn api_failure() -> LlmError {
        LlmError::ApiError {
            status: 500,
            message: "upstream unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_process_overwrites_with_unwrapped_completion() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.ts");
        std::fs::write(&path, "export const a = 1;").unwrap();

        let client = ScriptedClient::new(|_| {
            Ok("```typescript\n/** The answer. */\nexport const a = 1;\n```".to_string())
        });
        let mutator = FileMutator::new(&client);

        mutator.process(&path, "Document it.").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "/** The answer. */\nexport const a = 1;"
        );
        let calls = client.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            ["Document it.\nInput code:\n'''\nexport const a = 1;\n'''"]
        );
    }

    #[tokio::test]
    async fn test_completion_failure_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.ts");
        std::fs::write(&path, "original").unwrap();

        let mutator = FileMutator::new(ScriptedClient::new(|_| Err(api_failure())));

        let err = mutator.process(&path, "Document it.").await.unwrap_err();
        assert!(matches!(err, ProcessError::Completion(_, _)));
        assert!(err.to_string().contains("a.ts"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");

        assert!(!mutator.process_logged(&path, "Document it.").await);
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let client = ScriptedClient::new(|_| Ok("unused".to_string()));
        let mutator = FileMutator::new(&client);

        let err = mutator
            .process(&dir.path().join("missing.ts"), "Document it.")
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessError::Read(_, _)));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.ts");
        std::fs::write(&path, "original").unwrap();

        let target = path.clone();
        let client = ScriptedClient::new(move |_| {
            // 模型返回前目标路径被替换成目录，写入必然失败
            std::fs::remove_file(&target).unwrap();
            std::fs::create_dir(&target).unwrap();
            Ok("documented".to_string())
        });
        let mutator = FileMutator::new(client);

        let err = mutator.process(&path, "Document it.").await.unwrap_err();
        assert!(matches!(err, ProcessError::Write(_, _)));
    }

    #[tokio::test]
    async fn test_process_logged_reports_success() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.js");
        std::fs::write(&path, "let b;").unwrap();

        let mutator = FileMutator::new(ScriptedClient::new(|_| Ok("/** b */\nlet b;".to_string())));

        assert!(mutator.process_logged(&path, "Document it.").await);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/** b */\nlet b;");
    }
}
