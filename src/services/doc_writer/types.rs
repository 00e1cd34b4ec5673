//! 文档改写类型定义

use std::path::{Path, PathBuf};

/// 待处理文件的描述
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// 完整路径
    pub path: PathBuf,
    /// 相对于项目根目录的路径，统一使用 `/` 分隔
    pub relative_path: String,
    /// 扩展名（`.ts` 形式），没有扩展名时为空串
    pub extension: String,
}

impl FileDescriptor {
    /// 根据路径构建描述，`root` 为空时相对路径退化为文件名
    pub fn new(path: impl Into<PathBuf>, root: Option<&Path>) -> Self {
        let path = path.into();

        let relative_path = root
            .and_then(|root| path.strip_prefix(root).ok())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_else(|| file_name(&path).to_string());

        let extension = extension_of(file_name(&path));

        Self {
            path,
            relative_path,
            extension,
        }
    }

    /// 文件名
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

/// 取文件名最后一个 `.` 之后的部分，带前导点
///
/// `a.test.ts` -> `.ts`，`Makefile` -> ``。以点开头且没有其他点的文件（`.env`）视为无扩展名。
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(0) | None => String::new(),
        Some(pos) => file_name[pos..].to_string(),
    }
}

/// 一次运行的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// 扫描得到的待处理文件数
    pub discovered: usize,
    /// 成功改写的文件数
    pub processed: usize,
    /// 失败的文件数
    pub failed: usize,
}

impl RunStats {
    pub fn record(&mut self, success: bool) {
        if success {
            self.processed += 1;
        } else {
            self.failed += 1;
        }
    }
}
