//! Human-readable rendering of analysis results.

use console::{style, StyledObject};

use super::icons;
use crate::models::{AiResult, AiRisk, AnalysisResult, PlagiarismResult, RiskLevel};
use crate::services::{Severity, WordGauge};

const SNIPPET_CHARS: usize = 160;

pub fn print_result(result: &AnalysisResult) {
    match result {
        AnalysisResult::AiDetection(ai) => print_ai(ai),
        AnalysisResult::Plagiarism(plagiarism) => print_plagiarism(plagiarism),
    }
}

pub fn gauge_line(gauge: &WordGauge) -> StyledObject<String> {
    match gauge.severity() {
        Severity::Info => style(gauge.to_string()).dim(),
        Severity::Exceeded => style(format!("{} (limit exceeded)", gauge)).red().bold(),
    }
}

fn risk_style(level: RiskLevel, text: String) -> StyledObject<String> {
    match level {
        RiskLevel::High => style(text).red().bold(),
        RiskLevel::Moderate => style(text).yellow(),
        RiskLevel::Low => style(text).green(),
    }
}

fn print_ai(ai: &AiResult) {
    let verdict = match ai.risk() {
        AiRisk::AiGenerated => style(ai.verdict.clone()).red().bold(),
        AiRisk::HumanWritten => style(ai.verdict.clone()).green().bold(),
    };

    println!("\n{}", style("AI Detection").bold());
    println!("{}", "-".repeat(50));
    println!("  {:<18} {}", "Verdict:", verdict);
    println!("  {:<18} {:.1}%", "AI probability:", ai.ai_probability);
    println!("  {:<18} {}", "Confidence:", ai.confidence.as_str());
    println!("  {:<18} {:.2}", "Perplexity:", ai.perplexity);
    println!("  {:<18} {:.2}", "Burstiness:", ai.burstiness);

    if let Some(features) = &ai.breakdown.statistical_features {
        println!("\n{}", style("Statistics:").cyan());
        println!(
            "  {:<22} {:.1}",
            "Avg sentence length:", features.avg_sentence_length
        );
        println!("  {:<22} {:.1}", "Avg word length:", features.avg_word_length);
        println!(
            "  {:<22} {:.2}",
            "Vocabulary diversity:", features.vocabulary_diversity
        );
        println!(
            "  {:<22} {:.1}",
            "Sentence variance:", features.sentence_variance
        );
        println!(
            "  {:<22} {} sentences, {} words",
            "Totals:", features.total_sentences, features.total_words
        );
    }

    if !ai.breakdown.confidence_factors.is_empty() {
        println!("\n{}", style("Factors:").cyan());
        for factor in &ai.breakdown.confidence_factors {
            println!("  {} {}", icons::bullet(), factor);
        }
    }
    println!();
}

fn print_plagiarism(result: &PlagiarismResult) {
    let risk = result.risk();

    println!("\n{}", style("Plagiarism Check").bold());
    println!("{}", "-".repeat(50));
    println!(
        "  {:<18} {}",
        "Max similarity:",
        risk_style(
            risk,
            format!("{:.1}% ({} risk)", result.max_similarity_score, risk.as_str())
        )
    );
    if let Some(link) = &result.top_link {
        println!("  {:<18} {}", "Top match:", link);
    }

    if result.sources.is_empty() {
        println!("\n  {}", style("No similar sources found").dim());
        println!();
        return;
    }

    println!("\n{}", style("Sources:").cyan());
    for (i, source) in result.sources.iter().enumerate() {
        let title = if source.title.is_empty() {
            source.link.as_str()
        } else {
            source.title.as_str()
        };
        println!(
            "  {}. {} {}",
            i + 1,
            title,
            risk_style(source.risk(), format!("{:.1}%", source.similarity_score))
        );
        println!("     {}", style(source.link.as_str()).dim());
        if !source.snippet.is_empty() {
            println!(
                "     {}",
                style(truncate(&source.snippet, SNIPPET_CHARS)).dim()
            );
        }
    }
    println!();
}

/// Truncate to `max` characters, marking the cut with an ellipsis.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept.trim_end())
    }
}
