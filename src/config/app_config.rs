//! 应用配置管理
//!
//! 配置在启动时从 JSON 文件加载一次，再叠加环境变量，之后以只读值传入各组件。

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::llm::LlmSettings;

/// 未指定 `--config` 时在工作目录中查找的文件名
pub const DEFAULT_CONFIG_FILE: &str = "docgen.json";

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
const ENV_MODEL: &str = "DOCGEN_MODEL";

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 待处理项目的根目录
    #[serde(default)]
    pub project_path: Option<PathBuf>,

    /// 需要处理的扩展名（`.ts` 形式），为空表示全部
    #[serde(default = "default_file_types")]
    pub file_types: Vec<String>,

    /// 排除的文件名后缀，如 `.test.ts`
    #[serde(default = "default_excluded_file_types")]
    pub excluded_file_types: Vec<String>,

    /// 排除的相对路径正则
    #[serde(default)]
    pub excluded_patterns: Vec<String>,

    /// 扫描时整体跳过的目录（glob）
    #[serde(default)]
    pub ignore_dirs: Vec<String>,

    /// 默认 prompt：内置模板名或完整文本
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// 按扩展名覆盖的 prompt
    #[serde(default)]
    pub prompt_by_types: Option<HashMap<String, String>>,

    /// LLM API 密钥
    #[serde(default)]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数
    #[serde(default)]
    pub temperature: f64,

    /// 最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 单次补全请求超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_file_types() -> Vec<String> {
    [".ts", ".tsx", ".js", ".jsx"].map(String::from).to_vec()
}

fn default_excluded_file_types() -> Vec<String> {
    [".test.ts", ".test.tsx", ".test.js", ".test.jsx"]
        .map(String::from)
        .to_vec()
}

fn default_prompt() -> String {
    "docs".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_path: None,
            file_types: default_file_types(),
            excluded_file_types: default_excluded_file_types(),
            excluded_patterns: Vec::new(),
            ignore_dirs: Vec::new(),
            prompt: default_prompt(),
            prompt_by_types: None,
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 显式指定的路径必须存在；未指定时读取工作目录下的 `docgen.json`，不存在则使用默认值。
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("读取配置文件失败 {}: {}", path.display(), e)))?;
        let config = Self::from_json(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// 从 JSON 文本解析配置
    pub fn from_json(content: &str) -> AppResult<Self> {
        serde_json::from_str(content).map_err(|e| AppError::Config(format!("解析配置失败: {}", e)))
    }

    /// 用进程环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// 用任意键值来源覆盖配置，空值视为未设置
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api_key = api_key;
        }
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
    }

    /// 补全客户端参数；缺少 API 密钥属于启动期致命错误
    pub fn llm_settings(&self) -> AppResult<LlmSettings> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config(format!("{} is not set", ENV_API_KEY)));
        }

        Ok(LlmSettings {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.request_timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.file_types, vec![".ts", ".tsx", ".js", ".jsx"]);
        assert!(config.excluded_file_types.contains(&".test.ts".to_string()));
        assert!(config.prompt_by_types.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AppConfig::from_json(
            r#"{
                "project_path": "/work/app",
                "file_types": [".py"],
                "prompt_by_types": { "py": "Add docstrings." }
            }"#,
        )
        .unwrap();

        assert_eq!(config.project_path, Some(PathBuf::from("/work/app")));
        assert_eq!(config.file_types, vec![".py"]);
        assert_eq!(config.excluded_file_types.len(), 4);
        assert_eq!(config.prompt, "docs");
        assert_eq!(
            config.prompt_by_types.unwrap().get("py").map(String::as_str),
            Some("Add docstrings.")
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = AppConfig::load(Some(Path::new("/definitely/missing/docgen.json")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docgen.json");
        fs::write(&path, r#"{ "model": "gpt-4o-mini", "temperature": 0.2 }"#).unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.temperature, 0.2);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(|key| match key {
            "OPENAI_API_KEY" => Some("sk-env".to_string()),
            "DOCGEN_MODEL" => Some("gpt-4o-mini".to_string()),
            "OPENAI_BASE_URL" => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(config.api_key, "sk-env");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let config = AppConfig::default();
        let err = config.llm_settings().unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_llm_settings() {
        let config = AppConfig {
            api_key: "sk-test".to_string(),
            ..AppConfig::default()
        };
        let settings = config.llm_settings().unwrap();
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.max_tokens, 4096);
        assert_eq!(settings.timeout_secs, 120);
    }
}
