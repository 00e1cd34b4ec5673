//! 命令行参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite source files with model-generated documentation comments
#[derive(Parser, Debug)]
#[command(name = "docgen", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to ./docgen.json when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the model name from the configuration
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Process every matching file under a project directory
    Project {
        /// Project root (falls back to `project_path` from the configuration)
        #[arg(short, long, value_name = "DIR")]
        root: Option<PathBuf>,
    },
    /// Process a single file
    File {
        /// File to rewrite
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },
    /// List the built-in prompt templates
    Prompts,
}

pub const FILE_USAGE: &str =
    "Please provide a file path as an argument. Example: docgen file /path/to/file.js";

pub const PROJECT_USAGE: &str =
    "Please provide a project root with --root or set project_path in the configuration. Example: docgen project --root ./src";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_args() {
        let cli = Cli::parse_from(["docgen", "project", "--root", "./app", "-v"]);

        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Command::Project {
                root: Some(PathBuf::from("./app"))
            }
        );
    }

    #[test]
    fn test_file_args_with_global_options() {
        let cli = Cli::parse_from([
            "docgen",
            "file",
            "src/a.ts",
            "--model",
            "gpt-4o-mini",
            "--config",
            "custom.json",
        ]);

        assert_eq!(
            cli.command,
            Command::File {
                path: Some(PathBuf::from("src/a.ts"))
            }
        );
        assert_eq!(cli.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
    }

    #[test]
    fn test_file_without_path_parses() {
        let cli = Cli::parse_from(["docgen", "file"]);
        assert_eq!(cli.command, Command::File { path: None });
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["docgen"]).is_err());
    }
}
