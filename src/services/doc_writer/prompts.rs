//! Prompt 模板与选择
//!
//! 内置模板以资源文件形式放在 `prompts/` 下；配置里的 prompt 既可以写模板名，也可以直接写文本。

use std::collections::HashMap;

use super::types::FileDescriptor;

/// 通用 JSDoc 文档改写
pub const DOCS_PROMPT: &str = include_str!("../../../prompts/docs.md");

/// 通用文档改写，附带 React props 注释要求
pub const DOCS_DEFAULT_PROMPT: &str = include_str!("../../../prompts/docs_default.md");

/// TypeScript 组件与 props 注释
pub const TS_DOCS_PROMPT: &str = include_str!("../../../prompts/ts_docs.md");

/// TypeScript 组件与 props 注释，面向 gpt-4o
pub const TS_DOCS_GPT4_PROMPT: &str = include_str!("../../../prompts/ts_docs_gpt4.md");

/// TypeScript 组件与 props 注释，面向 gpt-4o-mini，带完整示例
pub const TS_DOCS_GPT4O_MINI_PROMPT: &str = include_str!("../../../prompts/ts_docs_gpt4o_mini.md");

/// 内置模板名称表
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("docs", DOCS_PROMPT),
    ("docs_default", DOCS_DEFAULT_PROMPT),
    ("ts_docs", TS_DOCS_PROMPT),
    ("ts_docs_gpt4", TS_DOCS_GPT4_PROMPT),
    ("ts_docs_gpt4o_mini", TS_DOCS_GPT4O_MINI_PROMPT),
];

/// 按名称查找内置模板
pub fn builtin_template(name: &str) -> Option<&'static str> {
    BUILTIN_TEMPLATES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, text)| *text)
}

/// 所有内置模板名称
pub fn builtin_template_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_TEMPLATES.iter().map(|(name, _)| *name)
}

/// 配置值是模板名时展开为模板文本，否则原样作为 prompt
pub fn expand_prompt(value: &str) -> String {
    builtin_template(value.trim())
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

/// 拼接发送给模型的完整消息
pub fn format_message(prompt: &str, source_code: &str) -> String {
    format!("{}\nInput code:\n'''\n{}\n'''", prompt, source_code)
}

/// 按扩展名选择 prompt
#[derive(Debug, Clone)]
pub struct PromptResolver {
    default_prompt: String,
    /// 键为去掉前导点的扩展名
    by_type: HashMap<String, String>,
}

impl PromptResolver {
    /// 创建选择器，映射表的键可以带或不带前导点
    pub fn new(default_prompt: &str, by_type: Option<&HashMap<String, String>>) -> Self {
        let by_type = by_type
            .into_iter()
            .flatten()
            .map(|(ext, prompt)| (normalize_type(ext).to_string(), expand_prompt(prompt)))
            .collect();

        Self {
            default_prompt: expand_prompt(default_prompt),
            by_type,
        }
    }

    /// 为文件选择 prompt：扩展名精确匹配映射表，否则返回默认 prompt
    pub fn resolve(&self, file: &FileDescriptor) -> &str {
        self.resolve_extension(&file.extension)
    }

    pub fn resolve_extension(&self, extension: &str) -> &str {
        self.by_type
            .get(normalize_type(extension))
            .map(String::as_str)
            .unwrap_or(self.default_prompt.as_str())
    }
}

fn normalize_type(ext: &str) -> &str {
    ext.strip_prefix('.').unwrap_or(ext)
}
