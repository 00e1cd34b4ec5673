//! docgen - LLM 驱动的源码文档改写工具
//!
//! 扫描项目目录，把每个文件的源码连同 prompt 发送给模型，用返回的带文档版本覆盖原文件。

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod error;
mod llm;
mod services;

use cli::{Cli, Command, FILE_USAGE, PROJECT_USAGE};
use config::AppConfig;
use error::{AppError, AppResult};
use llm::LlmClient;
use services::doc_writer::{
    process_single, prompts, resolver_from_config, scanner_from_config, ProjectProcessor, RunStats,
};

/// 初始化日志，RUST_LOG 优先
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "docgen=debug" } else { "docgen=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// 加载配置并叠加环境变量与命令行覆盖
fn load_config(cli: &Cli) -> AppResult<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env_overrides();
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    Ok(config)
}

async fn run_project(config: &AppConfig, root: Option<PathBuf>) -> AppResult<RunStats> {
    let root = root
        .or_else(|| config.project_path.clone())
        .ok_or_else(|| AppError::Usage(PROJECT_USAGE.to_string()))?;

    let scanner = scanner_from_config(config).map_err(|e| AppError::Config(e.to_string()))?;
    let client = LlmClient::new(config.llm_settings()?)?;
    info!("Processing project {} with model {}", root.display(), client.model());

    let processor = ProjectProcessor::new(root, scanner, resolver_from_config(config), client);
    Ok(processor.run().await?)
}

async fn run_file(config: &AppConfig, path: Option<PathBuf>) -> AppResult<RunStats> {
    let path = path.ok_or_else(|| AppError::Usage(FILE_USAGE.to_string()))?;

    let client = LlmClient::new(config.llm_settings()?)?;
    info!("Processing file {} with model {}", path.display(), client.model());

    Ok(process_single(&path, &resolver_from_config(config), client).await)
}

fn list_prompts() {
    for name in prompts::builtin_template_names() {
        println!("{}", name);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let stats = match &cli.command {
        Command::Prompts => {
            list_prompts();
            return Ok(());
        }
        Command::Project { root } => run_project(&load_config(&cli)?, root.clone()).await?,
        Command::File { path } => run_file(&load_config(&cli)?, path.clone()).await?,
    };

    info!(
        "Finished: {} discovered, {} processed, {} failed",
        stats.discovered, stats.processed, stats.failed
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Usage(usage)) => {
            eprintln!("{}", usage);
            ExitCode::from(1)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
