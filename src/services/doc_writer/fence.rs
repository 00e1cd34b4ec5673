//! 代码块包裹剥离
//!
//! 模型有时会把整段输出包进 ```` ```lang ... ``` ````，写回文件前去掉这一层。

use once_cell::sync::Lazy;
use regex::Regex;

/// 整段文本恰好是一个代码块时，捕获其内部内容
static WRAPPED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[a-zA-Z]*\n([\s\S]*?)\n```$").unwrap());

/// 去掉包裹整段文本的代码块标记
///
/// 只处理从首字符开始、到末字符结束的代码块；文本中间的代码块保持不变。
/// 嵌套的整段包裹会逐层剥离，因此对结果再调用一次不会有任何变化。
pub fn strip_code_fence(text: &str) -> String {
    let mut current = text;

    while let Some(inner) = WRAPPED_BLOCK
        .captures(current.trim())
        .and_then(|caps| caps.get(1))
    {
        current = inner.as_str();
    }

    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_typescript_block() {
        assert_eq!(strip_code_fence("```typescript\nCODE\n```"), "CODE");
    }

    #[test]
    fn test_strip_block_without_language() {
        let text = "```\nconst a = 1;\n\nexport default a;\n```";
        assert_eq!(strip_code_fence(text), "const a = 1;\n\nexport default a;");
    }

    #[test]
    fn test_strip_ignores_surrounding_whitespace() {
        assert_eq!(strip_code_fence("\n  ```js\nlet x;\n```\n\n"), "let x;");
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "/** Adds two numbers. */\nfunction add(a, b) {\n  return a + b;\n}\n";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_fence_not_at_start_unchanged() {
        let text = "prefix\n```js\ncode\n```";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_inner_fences_preserved() {
        let text = "/**\n * Example:\n * ```ts\n * add(1, 2);\n * ```\n */\nexport const add = 1;";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_language_tag_with_symbols_not_stripped() {
        let text = "```c++\nint main() {}\n```";
        assert_eq!(strip_code_fence(text), text);
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "```typescript\nCODE\n```",
            "```\n```js\nnested\n```\n```",
            "prefix\n```js\ncode\n```",
            "plain text",
            "",
            "```\n\n```",
        ];

        for sample in samples {
            let once = strip_code_fence(sample);
            assert_eq!(strip_code_fence(&once), once, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_nested_wrappers_fully_removed() {
        assert_eq!(strip_code_fence("```\n```js\nnested\n```\n```"), "nested");
    }
}
