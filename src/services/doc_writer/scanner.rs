//! 项目扫描器
//!
//! 递归列出项目下的所有文件，再按扩展名、后缀与路径正则过滤出待处理列表。

use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::types::FileDescriptor;

/// 文件过滤规则
#[derive(Debug, Clone)]
pub struct ScanFilter {
    /// 需要处理的扩展名，为空表示全部
    included: Vec<String>,
    /// 排除的文件名后缀，统一带前导点
    excluded_suffixes: Vec<String>,
    /// 排除的相对路径正则
    excluded_patterns: Vec<Regex>,
}

impl ScanFilter {
    /// 创建过滤规则，正则无法编译时返回错误
    pub fn new(
        included: &[String],
        excluded_suffixes: &[String],
        excluded_patterns: &[String],
    ) -> Result<Self, ScanError> {
        let excluded_patterns = excluded_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ScanError::InvalidPattern(p.clone(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            included: included.to_vec(),
            excluded_suffixes: excluded_suffixes
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| dotted_suffix(s))
                .collect(),
            excluded_patterns,
        })
    }

    /// 判断文件是否需要处理
    ///
    /// 排除规则优先：文件名以任一排除后缀结尾，或相对路径匹配任一排除正则，即被排除。
    /// 剩余文件在包含列表为空时全部保留，否则只保留扩展名在列表中的文件。
    pub fn should_include(&self, file: &FileDescriptor) -> bool {
        if self.is_excluded(file) {
            return false;
        }

        self.included.is_empty() || self.included.iter().any(|ext| *ext == file.extension)
    }

    fn is_excluded(&self, file: &FileDescriptor) -> bool {
        let name = file.file_name();
        if self.excluded_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str())) {
            return true;
        }

        self.excluded_patterns
            .iter()
            .any(|re| re.is_match(&file.relative_path))
    }
}

/// 排除后缀补齐前导点，`"ts"` 与 `".ts"` 等价
fn dotted_suffix(suffix: &str) -> String {
    if suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{}", suffix)
    }
}

/// 项目扫描器
pub struct ProjectScanner {
    filter: ScanFilter,
    /// 整体跳过的目录（glob patterns）
    ignore_dirs: Vec<glob::Pattern>,
}

impl ProjectScanner {
    /// 创建新的项目扫描器，目录 glob 无法解析时返回错误
    pub fn new(filter: ScanFilter, ignore_dirs: &[String]) -> Result<Self, ScanError> {
        let ignore_dirs = ignore_dirs
            .iter()
            .map(|p| glob::Pattern::new(p).map_err(|e| ScanError::InvalidGlob(p.clone(), e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { filter, ignore_dirs })
    }

    /// 扫描项目，返回全部待处理文件
    ///
    /// 顺序取决于文件系统返回目录项的顺序，不做排序。任何目录读取失败都会中止整个扫描。
    pub fn scan(&self, root: &Path) -> Result<Vec<FileDescriptor>, ScanError> {
        if !root.exists() {
            return Err(ScanError::PathNotFound(root.to_path_buf()));
        }

        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        info!("Starting project scan: {}", root.display());
        let all_files = self.list_files(root)?;
        let total = all_files.len();

        let files: Vec<FileDescriptor> = all_files
            .into_iter()
            .map(|path| FileDescriptor::new(path, Some(root)))
            .filter(|file| {
                let keep = self.filter.should_include(file);
                if !keep {
                    debug!("Skipping: {}", file.relative_path);
                }
                keep
            })
            .collect();

        info!("Scan completed: {} of {} files selected", files.len(), total);
        Ok(files)
    }

    /// 递归列出所有非目录项
    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !self.is_ignored_dir(entry, root));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                ScanError::IoError(path, e)
            })?;

            if !entry.file_type().is_dir() {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// 目录名或相对路径匹配 ignore_dirs 时跳过整个子树，根目录本身不参与判断
    fn is_ignored_dir(&self, entry: &DirEntry, root: &Path) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() || self.ignore_dirs.is_empty() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        let relative = entry
            .path()
            .strip_prefix(root)
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();

        let ignored = self
            .ignore_dirs
            .iter()
            .any(|pattern| pattern.matches(&name) || pattern.matches(&relative));
        if ignored {
            debug!("Ignoring directory: {}", relative);
        }
        ignored
    }
}

/// 扫描错误类型
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("路径不存在: {0}")]
    PathNotFound(PathBuf),

    #[error("路径不是目录: {0}")]
    NotADirectory(PathBuf),

    #[error("IO错误 ({0}): {1}")]
    IoError(PathBuf, #[source] walkdir::Error),

    #[error("无效的排除正则 '{0}': {1}")]
    InvalidPattern(String, #[source] regex::Error),

    #[error("无效的目录 glob '{0}': {1}")]
    InvalidGlob(String, #[source] glob::PatternError),
}
