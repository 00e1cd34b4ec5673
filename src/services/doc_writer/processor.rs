//! 项目处理器
//!
//! 先完整扫描出文件列表，再逐个选择 prompt 并改写。文件之间严格串行。

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use super::mutator::FileMutator;
use super::prompts::PromptResolver;
use super::scanner::{ProjectScanner, ScanError};
use super::types::{FileDescriptor, RunStats};
use crate::llm::CompletionClient;

/// 项目处理器
pub struct ProjectProcessor<C> {
    project_path: PathBuf,
    scanner: ProjectScanner,
    resolver: PromptResolver,
    mutator: FileMutator<C>,
}

impl<C: CompletionClient> ProjectProcessor<C> {
    pub fn new(
        project_path: impl Into<PathBuf>,
        scanner: ProjectScanner,
        resolver: PromptResolver,
        client: C,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            scanner,
            resolver,
            mutator: FileMutator::new(client),
        }
    }

    /// 处理整个项目
    ///
    /// 扫描失败直接返回错误，不处理任何文件；单个文件失败只计数，继续处理后续文件。
    pub async fn run(&self) -> Result<RunStats, ScanError> {
        let started = Instant::now();
        let files = self.scanner.scan(&self.project_path)?;

        info!("Found {} files to process", files.len());
        let mut stats = RunStats {
            discovered: files.len(),
            ..Default::default()
        };

        for (index, file) in files.iter().enumerate() {
            info!("[{}/{}] {}", index + 1, files.len(), file.relative_path);
            let prompt = self.resolver.resolve(file);
            stats.record(self.mutator.process_logged(&file.path, prompt).await);
        }

        info!(
            "Finished in {:.1}s: {} processed, {} failed",
            started.elapsed().as_secs_f64(),
            stats.processed,
            stats.failed
        );
        if stats.failed > 0 {
            warn!("{} files were left unchanged or partially processed", stats.failed);
        }

        Ok(stats)
    }
}

/// 只处理一个文件，不扫描目录
pub async fn process_single<C: CompletionClient>(
    path: &Path,
    resolver: &PromptResolver,
    client: C,
) -> RunStats {
    let file = FileDescriptor::new(path, None);
    let prompt = resolver.resolve(&file);

    let mut stats = RunStats {
        discovered: 1,
        ..Default::default()
    };
    stats.record(FileMutator::new(client).process_logged(path, prompt).await);
    stats
}
