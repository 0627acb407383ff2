//! Analysis and extraction commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use console::style;

use super::{read_text, InputArgs};
use crate::cli::icons;
use crate::cli::progress::{spinner, ExtractionProgress};
use crate::cli::render::{gauge_line, print_result};
use crate::client::{HttpBackend, VerificationBackend};
use crate::config::Config;
use crate::models::{AnalysisKind, DocumentFile};
use crate::services::{Resolution, Session, Severity};

/// Run one analysis on text from the arguments, stdin or a PDF.
pub async fn cmd_analyze(
    config: &Config,
    kind: AnalysisKind,
    input: InputArgs,
    json: bool,
) -> anyhow::Result<()> {
    let backend = Arc::new(HttpBackend::new(config.service.clone())?);
    let mut session = Session::new(backend, config);

    match &input.file {
        Some(path) => {
            upload(&mut session, path).await?;
        }
        None => {
            let text = read_text(input.text).await?;
            session.set_text(text);
        }
    }

    let gauge = session.word_gauge();
    if !session.can_submit() {
        if gauge.severity() == Severity::Exceeded {
            anyhow::bail!("Text is too long: {}", gauge);
        }
        anyhow::bail!("Nothing to analyze: the text is empty");
    }

    if !json {
        eprintln!(
            "{} {} on {}",
            icons::info(),
            kind.label(),
            gauge_line(&gauge)
        );
    }
    let pb = spinner(format!("Waiting for {}...", kind.label().to_lowercase()));
    let resolution = session.run_analysis(kind).await;
    pb.finish_and_clear();

    match resolution {
        Some(Resolution::Completed(result)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
            Ok(())
        }
        Some(Resolution::Failed(notification)) => anyhow::bail!("{}", notification),
        Some(Resolution::Stale) | None => anyhow::bail!("{} did not run", kind.label()),
    }
}

/// Extract a PDF and print its sanitized text.
pub async fn cmd_extract(config: &Config, file: &Path, json: bool) -> anyhow::Result<()> {
    let backend = Arc::new(HttpBackend::new(config.service.clone())?);
    let mut session = Session::new(backend, config);

    let text = upload(&mut session, file).await?;
    if json {
        let output = serde_json::json!({
            "file": file.display().to_string(),
            "words": session.word_gauge().count,
            "text": text,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}

/// Read `path` and extract its text into the session buffer.
async fn upload<B>(session: &mut Session<B>, path: &Path) -> anyhow::Result<String>
where
    B: VerificationBackend + 'static,
{
    let document = DocumentFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let bar = ExtractionProgress::start(session.progress(), &document.name);
    let result = session.upload(&document).await;
    bar.finish();

    match result {
        Ok(text) => {
            eprintln!(
                "{} Extracted {} from {}",
                icons::success(),
                gauge_line(&session.word_gauge()),
                style(&document.name).cyan()
            );
            Ok(text)
        }
        Err(e) => anyhow::bail!("{}", e.notification()),
    }
}
