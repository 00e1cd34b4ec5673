//! 端点 URL 规范化与 SSE 行解析

/// 规范化 base_url：去掉末尾斜杠，折叠协议之后的重复斜杠
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');

    match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
            format!("{}://{}", scheme, segments.join("/"))
        }
        None => trimmed.to_string(),
    }
}

/// 构建 Chat Completions 端点
///
/// 已经以 `/chat/completions` 结尾的地址原样使用，以 `/v1` 结尾的只补后半段。
pub fn chat_completions_endpoint(base_url: &str) -> String {
    let url = normalize_base_url(base_url);

    if url.ends_with("/chat/completions") {
        url
    } else if url.ends_with("/v1") {
        format!("{}/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

/// SSE 行的解析结果
#[derive(Debug, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// `data: ...` 负载
    Data(&'a str),
    /// `data: [DONE]`
    Done,
    /// 空行、注释、event/id 等字段
    Ignored,
}

/// 解析单行 SSE 文本
pub fn parse_sse_line(line: &str) -> SseLine<'_> {
    let line = line.trim();
    let Some(data) = line.strip_prefix("data:") else {
        return SseLine::Ignored;
    };

    match data.trim_start() {
        "[DONE]" => SseLine::Done,
        "" => SseLine::Ignored,
        payload => SseLine::Data(payload),
    }
}

/// 从字节缓冲区中取出所有完整的行，未结束的尾部以原始字节留在缓冲区中
///
/// 只解码以换行结束的部分，网络分块切断的多字节字符会在下一块到达后完整解码。
pub fn drain_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let Some(last_newline) = buffer.iter().rposition(|&b| b == b'\n') else {
        return Vec::new();
    };

    let rest = buffer.split_off(last_newline + 1);
    let complete = std::mem::replace(buffer, rest);
    String::from_utf8_lossy(&complete)
        .lines()
        .map(str::to_string)
        .collect()
}
