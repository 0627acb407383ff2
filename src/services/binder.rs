//! Maps raw analysis responses onto typed results.

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::models::{
    AiBreakdown, AiResult, AnalysisKind, AnalysisResult, Confidence, PlagiarismResult,
    SimilaritySource, StatisticalFeatures,
};

/// Errors from binding a response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A required field is missing or has the wrong type.
    #[error("Malformed response: field `{0}` missing or invalid")]
    MalformedResponse(String),

    /// The service answered successfully but reported an error instead of a result.
    #[error("Service rejected the request: {0}")]
    Rejected(String),
}

/// Bind a raw response body to the result shape for `kind`.
pub fn bind(kind: AnalysisKind, body: &Value) -> Result<AnalysisResult, BindError> {
    let obj = body
        .as_object()
        .ok_or_else(|| BindError::MalformedResponse("<body>".to_string()))?;

    if let Some(message) = obj.get("error").and_then(Value::as_str) {
        return Err(BindError::Rejected(message.to_string()));
    }

    match kind {
        AnalysisKind::AiDetection => bind_ai(obj).map(AnalysisResult::AiDetection),
        AnalysisKind::Plagiarism => bind_plagiarism(obj).map(AnalysisResult::Plagiarism),
    }
}

fn malformed(field: &str) -> BindError {
    BindError::MalformedResponse(field.to_string())
}

fn require_number(obj: &Map<String, Value>, field: &str) -> Result<f64, BindError> {
    obj.get(field)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| malformed(field))
}

fn require_str<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a str, BindError> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(field))
}

/// Fields that may be absent or `null`.
fn optional<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn bind_ai(obj: &Map<String, Value>) -> Result<AiResult, BindError> {
    let ai_probability = require_number(obj, "ai_probability")?;
    let verdict = require_str(obj, "verdict")?.to_string();
    let confidence =
        Confidence::from_str(require_str(obj, "confidence")?).ok_or_else(|| malformed("confidence"))?;
    let perplexity = require_number(obj, "perplexity")?;
    let burstiness = require_number(obj, "burstiness")?;

    let statistical_features = match optional(obj, "statistical_features") {
        Some(v) => Some(
            serde_json::from_value::<StatisticalFeatures>(v.clone())
                .map_err(|_| malformed("statistical_features"))?,
        ),
        None => None,
    };
    let confidence_factors = match optional(obj, "confidence_factors") {
        Some(v) => serde_json::from_value::<Vec<String>>(v.clone())
            .map_err(|_| malformed("confidence_factors"))?,
        None => Vec::new(),
    };

    Ok(AiResult {
        ai_probability,
        verdict,
        confidence,
        perplexity,
        burstiness,
        breakdown: AiBreakdown {
            statistical_features,
            confidence_factors,
        },
    })
}

fn bind_plagiarism(obj: &Map<String, Value>) -> Result<PlagiarismResult, BindError> {
    let max_similarity_score = require_number(obj, "max_similarity_score")?;

    let top_link = match optional(obj, "top_link") {
        Some(v) => {
            let link = v.as_str().ok_or_else(|| malformed("top_link"))?;
            Some(Url::parse(link).map_err(|_| malformed("top_link"))?)
        }
        None => None,
    };

    // Older deployments name the list `all_results`.
    let (list_field, entries) = match optional(obj, "all_results") {
        Some(v) => ("all_results", Some(v)),
        None => ("sources", optional(obj, "sources")),
    };
    let sources = match entries {
        Some(v) => {
            let items = v.as_array().ok_or_else(|| malformed(list_field))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| bind_source(item, &format!("{}[{}]", list_field, i)))
                .collect::<Result<Vec<_>, _>>()?
        }
        None => Vec::new(),
    };

    Ok(PlagiarismResult {
        max_similarity_score,
        top_link,
        sources,
    })
}

fn bind_source(item: &Value, path: &str) -> Result<SimilaritySource, BindError> {
    let obj = item.as_object().ok_or_else(|| malformed(path))?;
    let field = |name: &str| format!("{}.{}", path, name);

    let similarity_score = obj
        .get("similarity_score")
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .ok_or_else(|| malformed(&field("similarity_score")))?;
    let link = obj
        .get("link")
        .and_then(Value::as_str)
        .and_then(|s| Url::parse(s).ok())
        .ok_or_else(|| malformed(&field("link")))?;
    let text = |name: &str| {
        obj.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(SimilaritySource {
        title: text("title"),
        snippet: text("snippet"),
        similarity_score,
        link,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiRisk, RiskLevel};
    use serde_json::json;

    #[test]
    fn test_bind_ai_preserves_fields() {
        let body = json!({
            "ai_probability": 82,
            "verdict": "Likely AI-Generated",
            "confidence": "High",
            "perplexity": 12.3,
            "burstiness": 0.4
        });

        let result = bind(AnalysisKind::AiDetection, &body).unwrap();
        let AnalysisResult::AiDetection(ai) = result else {
            panic!("expected AI result");
        };
        assert_eq!(ai.ai_probability, 82.0);
        assert_eq!(ai.verdict, "Likely AI-Generated");
        assert_eq!(ai.confidence, Confidence::High);
        assert_eq!(ai.perplexity, 12.3);
        assert_eq!(ai.burstiness, 0.4);
        assert_eq!(ai.risk(), AiRisk::AiGenerated);
        assert!(ai.breakdown.is_empty());
    }

    #[test]
    fn test_bind_ai_detailed_breakdown() {
        let body = json!({
            "ai_probability": 35,
            "verdict": "Possibly Human-Written",
            "confidence": "Medium",
            "perplexity": 64.1,
            "burstiness": 0.55,
            "statistical_features": {
                "avg_sentence_length": 18.2,
                "avg_word_length": 4.7,
                "vocabulary_diversity": 0.61,
                "sentence_variance": 41.0,
                "total_sentences": 9,
                "total_words": 164
            },
            "confidence_factors": ["Moderate perplexity", "Moderate sentence variation"]
        });

        let AnalysisResult::AiDetection(ai) = bind(AnalysisKind::AiDetection, &body).unwrap()
        else {
            panic!("expected AI result");
        };
        assert_eq!(ai.risk(), AiRisk::HumanWritten);
        let features = ai.breakdown.statistical_features.unwrap();
        assert_eq!(features.total_words, 164);
        assert_eq!(ai.breakdown.confidence_factors.len(), 2);
    }

    #[test]
    fn test_bind_ai_missing_or_non_numeric() {
        let body = json!({
            "verdict": "Likely AI-Generated",
            "confidence": "High",
            "perplexity": 12.3,
            "burstiness": 0.4
        });
        assert_eq!(
            bind(AnalysisKind::AiDetection, &body),
            Err(BindError::MalformedResponse("ai_probability".to_string()))
        );

        let body = json!({
            "ai_probability": 82,
            "verdict": "Likely AI-Generated",
            "confidence": "High",
            "perplexity": null,
            "burstiness": 0.4
        });
        assert_eq!(
            bind(AnalysisKind::AiDetection, &body),
            Err(BindError::MalformedResponse("perplexity".to_string()))
        );

        let body = json!({
            "ai_probability": "82",
            "verdict": "x",
            "confidence": "Certain",
            "perplexity": 1,
            "burstiness": 1
        });
        assert_eq!(
            bind(AnalysisKind::AiDetection, &body),
            Err(BindError::MalformedResponse("ai_probability".to_string()))
        );
    }

    #[test]
    fn test_bind_rejects_unknown_confidence() {
        let body = json!({
            "ai_probability": 50,
            "verdict": "Possibly AI-Generated",
            "confidence": "Certain",
            "perplexity": 40,
            "burstiness": 0.2
        });
        assert_eq!(
            bind(AnalysisKind::AiDetection, &body),
            Err(BindError::MalformedResponse("confidence".to_string()))
        );
    }

    #[test]
    fn test_bind_service_error_body() {
        let body = json!({
            "error": "Text too short for reliable detection (minimum 50 words)",
            "ai_probability": null
        });
        assert_eq!(
            bind(AnalysisKind::AiDetection, &body),
            Err(BindError::Rejected(
                "Text too short for reliable detection (minimum 50 words)".to_string()
            ))
        );
    }

    #[test]
    fn test_bind_plagiarism_with_source() {
        let body = json!({
            "max_similarity_score": 73,
            "top_link": "https://example.com/a",
            "all_results": [{
                "title": "A",
                "snippet": "...",
                "similarity_score": 73,
                "link": "https://example.com/a"
            }]
        });

        let AnalysisResult::Plagiarism(result) = bind(AnalysisKind::Plagiarism, &body).unwrap()
        else {
            panic!("expected plagiarism result");
        };
        assert_eq!(result.risk(), RiskLevel::High);
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].title, "A");
        assert_eq!(
            result.top_link.as_ref().map(Url::as_str),
            Some("https://example.com/a")
        );
    }

    #[test]
    fn test_bind_plagiarism_without_sources() {
        let body = json!({"max_similarity_score": 0, "top_link": null});
        let AnalysisResult::Plagiarism(result) = bind(AnalysisKind::Plagiarism, &body).unwrap()
        else {
            panic!("expected plagiarism result");
        };
        assert!(result.sources.is_empty());
        assert!(result.top_link.is_none());

        let body = json!({"max_similarity_score": 12.5, "sources": []});
        let AnalysisResult::Plagiarism(result) = bind(AnalysisKind::Plagiarism, &body).unwrap()
        else {
            panic!("expected plagiarism result");
        };
        assert!(result.sources.is_empty());
        assert_eq!(result.risk(), RiskLevel::Low);
    }

    #[test]
    fn test_bind_plagiarism_malformed() {
        assert_eq!(
            bind(AnalysisKind::Plagiarism, &json!({"top_link": "https://a.io"})),
            Err(BindError::MalformedResponse("max_similarity_score".to_string()))
        );
        assert_eq!(
            bind(
                AnalysisKind::Plagiarism,
                &json!({"max_similarity_score": 10, "top_link": "not a url"})
            ),
            Err(BindError::MalformedResponse("top_link".to_string()))
        );
        assert_eq!(
            bind(
                AnalysisKind::Plagiarism,
                &json!({
                    "max_similarity_score": 10,
                    "all_results": [{"title": "A", "link": "https://a.io"}]
                })
            ),
            Err(BindError::MalformedResponse(
                "all_results[0].similarity_score".to_string()
            ))
        );
    }

    #[test]
    fn test_bind_non_object_body() {
        assert_eq!(
            bind(AnalysisKind::Plagiarism, &json!([1, 2, 3])),
            Err(BindError::MalformedResponse("<body>".to_string()))
        );
    }
}
