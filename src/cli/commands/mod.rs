//! CLI parser and command dispatch.

mod analyze;
mod text;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::io::AsyncReadExt;

use crate::config::Config;
use crate::models::AnalysisKind;

#[derive(Parser)]
#[command(name = "contentverify")]
#[command(about = "Check text for AI generation and plagiarism")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the verification services (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate how likely the text is to be AI-generated
    Ai {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Search for published sources similar to the text
    Plagiarism {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Extract and sanitize the text of a PDF document
    Extract {
        /// PDF document to extract
        file: PathBuf,
    },

    /// Count words against the submission limit
    Count {
        /// Text to count (reads stdin when omitted)
        text: Vec<String>,
    },

    /// Normalize text the same way extracted documents are normalized
    Sanitize {
        /// Text to sanitize (reads stdin when omitted)
        text: Vec<String>,
    },
}

/// Where the text to analyze comes from.
#[derive(Args)]
pub struct InputArgs {
    /// Text to analyze (reads stdin when omitted)
    #[arg(conflicts_with = "file")]
    text: Vec<String>,

    /// Extract the text from a PDF document instead
    #[arg(short, long)]
    file: Option<PathBuf>,
}

/// Join positional words, or read all of stdin when there are none.
async fn read_text(words: Vec<String>) -> anyhow::Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    };
    if let Some(url) = cli.base_url {
        config.service = config.service.with_base_url(&url);
    }

    match cli.command {
        Commands::Ai { input } => {
            analyze::cmd_analyze(&config, AnalysisKind::AiDetection, input, cli.json).await
        }
        Commands::Plagiarism { input } => {
            analyze::cmd_analyze(&config, AnalysisKind::Plagiarism, input, cli.json).await
        }
        Commands::Extract { file } => analyze::cmd_extract(&config, &file, cli.json).await,
        Commands::Count { text } => text::cmd_count(text, cli.json).await,
        Commands::Sanitize { text } => text::cmd_sanitize(text).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analysis_input() {
        let cli = Cli::parse_from(["contentverify", "ai", "some", "words", "--json"]);
        assert!(cli.json);
        let Commands::Ai { input } = cli.command else {
            panic!("expected ai command");
        };
        assert_eq!(input.text, vec!["some", "words"]);
        assert!(input.file.is_none());

        let cli = Cli::parse_from(["contentverify", "plagiarism", "--file", "paper.pdf"]);
        let Commands::Plagiarism { input } = cli.command else {
            panic!("expected plagiarism command");
        };
        assert_eq!(input.file, Some(PathBuf::from("paper.pdf")));
    }

    #[test]
    fn test_text_and_file_conflict() {
        let result = Cli::try_parse_from(["contentverify", "ai", "words", "--file", "a.pdf"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_text_joins_words() {
        let text = read_text(vec!["hello".to_string(), "world".to_string()])
            .await
            .unwrap();
        assert_eq!(text, "hello world");
    }
}
