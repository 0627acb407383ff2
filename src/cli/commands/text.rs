//! Offline text commands.

use super::read_text;
use crate::cli::icons;
use crate::cli::render::gauge_line;
use crate::services::{Severity, WordGauge};
use crate::utils::sanitize;

pub async fn cmd_count(words: Vec<String>, json: bool) -> anyhow::Result<()> {
    let text = read_text(words).await?;
    let gauge = WordGauge::for_text(&text);

    if json {
        let output = serde_json::json!({
            "words": gauge.count,
            "limit": gauge.limit,
            "exceeded": gauge.severity() == Severity::Exceeded,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match gauge.severity() {
        Severity::Info => println!("{}", gauge_line(&gauge)),
        Severity::Exceeded => println!("{} {}", icons::warn(), gauge_line(&gauge)),
    }
    Ok(())
}

pub async fn cmd_sanitize(words: Vec<String>) -> anyhow::Result<()> {
    let text = read_text(words).await?;
    println!("{}", sanitize(&text));
    Ok(())
}
