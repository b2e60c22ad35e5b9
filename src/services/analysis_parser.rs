//! Extraction of `{category, summary}` from raw LLM output.
//!
//! Strategies run in order and each may yield any subset of the two fields.
//! Every field takes the value from the first strategy that produced it;
//! fields no strategy produced fall back to fixed placeholders. Parsing never
//! fails.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::domain::models::{RepositoryAnalysis, UNKNOWN_CATEGORY};

/// Fields recovered by one strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialAnalysis {
    pub category: Option<String>,
    pub summary: Option<String>,
}

impl PartialAnalysis {
    pub const fn is_complete(&self) -> bool {
        self.category.is_some() && self.summary.is_some()
    }

    /// Fill fields still missing here from `other`.
    fn merge(&mut self, other: Self) {
        if self.category.is_none() {
            self.category = other.category;
        }
        if self.summary.is_none() {
            self.summary = other.summary;
        }
    }
}

/// One way of reading fields out of raw model output.
///
/// `Err` carries a genuine parse failure worth logging; finding nothing is
/// `Ok` with an empty [`PartialAnalysis`].
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, raw: &str) -> Result<PartialAnalysis, String>;
}

/// Parses the whole text as a JSON object.
#[derive(Debug, Default)]
pub struct JsonStrategy;

impl ExtractionStrategy for JsonStrategy {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, raw: &str) -> Result<PartialAnalysis, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(PartialAnalysis::default());
        }

        let value: Value = serde_json::from_str(trimmed).map_err(|err| err.to_string())?;
        Ok(PartialAnalysis {
            category: string_field(&value, "category"),
            summary: string_field(&value, "summary"),
        })
    }
}

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?(.*?)```").expect("code fence pattern is a valid regex")
});

/// Parses a JSON object embedded in a reply: the body of the first
/// Markdown code fence, or the span from the first `{` to the last `}`.
#[derive(Debug, Default)]
pub struct EmbeddedJsonStrategy;

impl EmbeddedJsonStrategy {
    fn candidate(raw: &str) -> Option<&str> {
        let body = CODE_FENCE
            .captures(raw)
            .and_then(|captures| captures.get(1))
            .map_or(raw, |m| m.as_str());

        let start = body.find('{')?;
        let end = body.rfind('}')?;
        (start < end).then(|| &body[start..=end])
    }
}

impl ExtractionStrategy for EmbeddedJsonStrategy {
    fn name(&self) -> &'static str {
        "embedded-json"
    }

    fn extract(&self, raw: &str) -> Result<PartialAnalysis, String> {
        let Some(candidate) = Self::candidate(raw) else {
            return Ok(PartialAnalysis::default());
        };

        let value: Value = serde_json::from_str(candidate).map_err(|err| err.to_string())?;
        Ok(PartialAnalysis {
            category: string_field(&value, "category"),
            summary: string_field(&value, "summary"),
        })
    }
}

static CATEGORY_PATTERN: LazyLock<Regex> = LazyLock::new(|| field_pattern("category"));
static SUMMARY_PATTERN: LazyLock<Regex> = LazyLock::new(|| field_pattern("summary"));

/// Finds `category: "..."` / `'summary': '...'` pairs anywhere in the text,
/// ignoring case and surrounding prose. Double-quoted values may contain
/// JSON escapes, which are decoded.
#[derive(Debug, Default)]
pub struct FieldPatternStrategy;

impl ExtractionStrategy for FieldPatternStrategy {
    fn name(&self) -> &'static str {
        "field-pattern"
    }

    fn extract(&self, raw: &str) -> Result<PartialAnalysis, String> {
        Ok(PartialAnalysis {
            category: capture_field(&CATEGORY_PATTERN, raw),
            summary: capture_field(&SUMMARY_PATTERN, raw),
        })
    }
}

fn field_pattern(field: &str) -> Regex {
    let pattern =
        format!(r#"(?i)["']?\b{field}\b["']?\s*:\s*(?:"((?:[^"\\]|\\.)*)"|'([^']*)')"#);
    Regex::new(&pattern).expect("field pattern is a valid regex")
}

fn capture_field(pattern: &Regex, raw: &str) -> Option<String> {
    let captures = pattern.captures(raw)?;
    let value = match (captures.get(1), captures.get(2)) {
        (Some(double_quoted), _) => unescape(double_quoted.as_str()),
        (None, Some(single_quoted)) => single_quoted.as_str().to_string(),
        (None, None) => return None,
    };

    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Decode JSON string escapes; text that is not a valid JSON string body is
/// kept as written.
fn unescape(body: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{body}\"")).unwrap_or_else(|_| body.to_string())
}

fn string_field(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Ordered composition of extraction strategies.
pub struct AnalysisParser {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Default for AnalysisParser {
    fn default() -> Self {
        Self::new(vec![
            Box::new(JsonStrategy),
            Box::new(EmbeddedJsonStrategy),
            Box::new(FieldPatternStrategy),
        ])
    }
}

impl AnalysisParser {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Extract an analysis for `repository_name` from raw model output.
    pub fn parse(&self, raw: &str, repository_name: &str) -> RepositoryAnalysis {
        let mut found = PartialAnalysis::default();

        for strategy in &self.strategies {
            match strategy.extract(raw) {
                Ok(partial) => found.merge(partial),
                Err(err) => warn!(
                    repository = repository_name,
                    strategy = strategy.name(),
                    error = %err,
                    "error parsing analysis result, trying next strategy"
                ),
            }

            if found.is_complete() {
                debug!(
                    repository = repository_name,
                    strategy = strategy.name(),
                    "analysis extracted"
                );
                break;
            }
        }

        RepositoryAnalysis {
            category: found
                .category
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            summary: found
                .summary
                .unwrap_or_else(|| RepositoryAnalysis::missing_summary(repository_name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str, name: &str) -> RepositoryAnalysis {
        AnalysisParser::default().parse(raw, name)
    }

    #[test]
    fn test_parse_valid_json() {
        assert_eq!(
            parse(r#"{"category":"Backend","summary":"X"}"#, "r"),
            RepositoryAnalysis::new("Backend", "X")
        );
    }

    #[test]
    fn test_parse_unparsable_text_uses_fallbacks() {
        assert_eq!(
            parse("unparsable text", "r"),
            RepositoryAnalysis::new("Unknown", "Could not extract summary for r")
        );
    }

    #[test]
    fn test_parse_empty_input_uses_fallbacks() {
        assert_eq!(
            parse("", "empty-repo"),
            RepositoryAnalysis::new("Unknown", "Could not extract summary for empty-repo")
        );
    }

    #[test]
    fn test_parse_fields_embedded_in_prose() {
        let raw = r#"
          The repository appears to be:
          category: "Frontend"
          summary: "A React-based user interface library"
          Additional text here...
        "#;

        assert_eq!(
            parse(raw, "test-repo"),
            RepositoryAnalysis::new("Frontend", "A React-based user interface library")
        );
    }

    #[test]
    fn test_parse_single_quoted_object() {
        let raw = r"
          {
            'category': 'Backend',
            'summary': 'A REST API server built with Express.js'
          }
        ";

        assert_eq!(
            parse(raw, "test-repo"),
            RepositoryAnalysis::new("Backend", "A REST API server built with Express.js")
        );
    }

    #[test]
    fn test_parse_partial_match_falls_back_per_field() {
        let raw = r#"
          category: "Mobile"
          Some other text without summary
        "#;

        assert_eq!(
            parse(raw, "mobile-app"),
            RepositoryAnalysis::new("Mobile", "Could not extract summary for mobile-app")
        );
    }

    #[test]
    fn test_parse_extra_whitespace() {
        let raw = r#"
          {
            "category"  :   "DevOps & Automation"  ,
            "summary"   :   "A CI/CD pipeline automation tool"
          }
        "#;

        assert_eq!(
            parse(raw, "devops-tool"),
            RepositoryAnalysis::new("DevOps & Automation", "A CI/CD pipeline automation tool")
        );
    }

    #[test]
    fn test_parse_mixed_case_field_names() {
        let raw = r#"
          Category: "Blockchain & Web3"
          Summary: "A decentralized application framework"
        "#;

        let analysis = parse(raw, "blockchain-app");
        assert_eq!(analysis.category, "Blockchain & Web3");
        assert_eq!(analysis.summary, "A decentralized application framework");
    }

    #[test]
    fn test_double_quoted_value_may_contain_apostrophe() {
        let raw = r#"Here you go -> category: "Developer Tools", summary: "A developer's toolkit""#;

        assert_eq!(
            parse(raw, "tools"),
            RepositoryAnalysis::new("Developer Tools", "A developer's toolkit")
        );
    }

    #[test]
    fn test_json_missing_summary_falls_back() {
        assert_eq!(
            parse(r#"{"category":"CLI"}"#, "cli-repo"),
            RepositoryAnalysis::new("CLI", "Could not extract summary for cli-repo")
        );
    }

    #[test]
    fn test_first_strategy_wins_per_field() {
        // Valid JSON whose summary also appears differently in prose-like form
        // inside the category value; the JSON reading must win.
        let raw = r#"{"category":"summary: 'decoy'","summary":"Real summary"}"#;

        assert_eq!(
            parse(raw, "r"),
            RepositoryAnalysis::new("summary: 'decoy'", "Real summary")
        );
    }

    #[test]
    fn test_fenced_json_keeps_escaped_quotes() {
        let raw = "```json\n{\"category\": \"Developer Tools\", \"summary\": \"A \\\"blazing fast\\\" bundler for JS.\"}\n```";

        assert_eq!(
            parse(raw, "r"),
            RepositoryAnalysis::new("Developer Tools", r#"A "blazing fast" bundler for JS."#)
        );
    }

    #[test]
    fn test_json_object_inside_prose() {
        let raw = r#"Sure! Here is the analysis: {"category": "Testing", "summary": "Runs {fixtures} in parallel"} Hope it helps."#;

        assert_eq!(
            parse(raw, "r"),
            RepositoryAnalysis::new("Testing", "Runs {fixtures} in parallel")
        );
    }

    #[test]
    fn test_field_pattern_decodes_escapes() {
        let raw = r#"category: "Frontend" and summary: "The \"tiny\" UI kit\nfor dashboards""#;

        assert_eq!(
            parse(raw, "r"),
            RepositoryAnalysis::new("Frontend", "The \"tiny\" UI kit\nfor dashboards")
        );
    }

    #[test]
    fn test_embedded_json_strategy() {
        assert_eq!(
            EmbeddedJsonStrategy.extract("no object here").unwrap(),
            PartialAnalysis::default()
        );
        assert!(EmbeddedJsonStrategy.extract("```\n{'category': 'X'}\n```").is_err());

        let found = EmbeddedJsonStrategy
            .extract("```\n{\"summary\": \"Only a summary\"}\n```")
            .unwrap();
        assert_eq!(found.category, None);
        assert_eq!(found.summary.as_deref(), Some("Only a summary"));
    }

    #[test]
    fn test_json_strategy_reports_syntax_errors() {
        assert!(JsonStrategy.extract("not json").is_err());
        assert_eq!(JsonStrategy.extract("   ").unwrap(), PartialAnalysis::default());
    }
}
