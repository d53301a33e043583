//! Analysis result types
//!
//! `AnalysisResponse` mirrors what the backend sends, where every field is
//! optional and the shapes are loose. `AnalysisResult` is the normalized,
//! display-ready record built from it.

use serde::Deserialize;
use serde_json::Value;

use super::verdict::display_name_for_url;

/// Minimum URL length for a source to be shown
const MIN_SOURCE_URL_LEN: usize = 5;

pub const DEFAULT_LABEL: &str = "Unknown";
pub const ERROR_LABEL: &str = "Error";

/// Raw backend response body
#[derive(Debug, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub score: Option<Value>,
    #[serde(default)]
    pub label: Option<Value>,
    #[serde(default)]
    pub reasoning_points: Option<Value>,
    #[serde(default)]
    pub sources: Option<Value>,
}

/// One finding in the verdict breakdown
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReasoningPoint {
    pub title: String,
    pub detail: Option<String>,
    pub bullets: Vec<String>,
}

impl ReasoningPoint {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: Some(detail.into()),
            bullets: Vec::new(),
        }
    }

    /// Title shown in the panel
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Key Detail"
        } else {
            &self.title
        }
    }
}

/// A cited source link
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub url: String,
    pub site_name: String,
}

impl Source {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let site_name = display_name_for_url(&url);
        Self { url, site_name }
    }
}

/// Normalized verdict for one snip
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Truthfulness score, 0..=100
    pub score: u8,
    pub label: String,
    pub reasoning_points: Vec<ReasoningPoint>,
    pub sources: Vec<Source>,
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            score: 0,
            label: DEFAULT_LABEL.to_string(),
            reasoning_points: Vec::new(),
            sources: Vec::new(),
        }
    }
}

impl AnalysisResult {
    /// Build a result from a backend response, substituting defaults for
    /// anything missing or malformed
    pub fn from_response(response: AnalysisResponse) -> Self {
        let label = response
            .label
            .as_ref()
            .and_then(value_to_text)
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LABEL.to_string());

        Self {
            score: response.score.as_ref().map(parse_score).unwrap_or(0),
            label,
            reasoning_points: response
                .reasoning_points
                .as_ref()
                .map(parse_reasoning_points)
                .unwrap_or_default(),
            sources: response
                .sources
                .as_ref()
                .map(parse_sources)
                .unwrap_or_default(),
        }
    }

    /// The result shown when the backend could not be reached
    pub fn connection_failed() -> Self {
        Self {
            score: 0,
            label: ERROR_LABEL.to_string(),
            reasoning_points: vec![ReasoningPoint::new(
                "Connection Failed",
                "Error connecting to server. Please check your internet connection.",
            )],
            sources: Vec::new(),
        }
    }

    /// Whether this is the canned connection failure rather than a verdict
    pub fn is_error(&self) -> bool {
        *self == Self::connection_failed()
    }
}

fn parse_score(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').parse().unwrap_or(0.0),
        _ => 0.0,
    };

    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn parse_reasoning_points(value: &Value) -> Vec<ReasoningPoint> {
    match value {
        Value::Array(items) => items.iter().filter_map(parse_reasoning_point).collect(),
        Value::String(text) if !text.trim().is_empty() => {
            vec![ReasoningPoint::new("Analysis", text.clone())]
        }
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| ReasoningPoint {
                title: key.clone(),
                detail: value_to_text(v),
                bullets: Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_reasoning_point(item: &Value) -> Option<ReasoningPoint> {
    match item {
        Value::Object(map) => {
            let title = map
                .get("title")
                .and_then(value_to_text)
                .unwrap_or_default();
            let detail = map
                .get("detail")
                .and_then(value_to_text)
                .filter(|d| !d.is_empty());
            let bullets = match map.get("bullets") {
                Some(Value::Array(list)) => list.iter().filter_map(value_to_text).collect(),
                _ => Vec::new(),
            };

            Some(ReasoningPoint {
                title,
                detail,
                bullets,
            })
        }
        Value::String(text) => Some(ReasoningPoint {
            title: String::new(),
            detail: Some(text.clone()),
            bullets: Vec::new(),
        }),
        _ => None,
    }
}

fn parse_sources(value: &Value) -> Vec<Source> {
    let Value::Array(items) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(parse_source)
        .filter(|s| s.url.len() >= MIN_SOURCE_URL_LEN)
        .collect()
}

fn non_empty_str<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn parse_source(item: &Value) -> Option<Source> {
    match item {
        Value::String(url) => Some(Source::from_url(url.clone())),
        Value::Object(map) => {
            let url = non_empty_str(map, "url")
                .or_else(|| non_empty_str(map, "link"))
                .unwrap_or_default()
                .to_string();
            let site_name = non_empty_str(map, "site_name")
                .or_else(|| non_empty_str(map, "domain"))
                .map(str::to_string)
                .unwrap_or_else(|| display_name_for_url(&url));

            Some(Source { url, site_name })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> AnalysisResult {
        let response: AnalysisResponse = serde_json::from_value(body).unwrap();
        AnalysisResult::from_response(response)
    }

    #[test]
    fn test_empty_response_uses_defaults() {
        let result = parse(json!({}));
        assert_eq!(result, AnalysisResult::default());
        assert_eq!(result.label, "Unknown");
    }

    #[test]
    fn test_full_response() {
        let result = parse(json!({
            "score": 87,
            "label": "Truth",
            "reasoning_points": [
                {"title": "Claim", "detail": "Matches reports", "bullets": ["a", "b"]}
            ],
            "sources": ["https://www.bbc.co.uk/news/1"]
        }));

        assert_eq!(result.score, 87);
        assert_eq!(result.label, "Truth");
        assert_eq!(result.reasoning_points.len(), 1);
        assert_eq!(result.reasoning_points[0].bullets, vec!["a", "b"]);
        assert_eq!(result.sources[0].site_name, "bbc.co.uk");
    }

    #[test]
    fn test_score_is_clamped_and_rounded() {
        assert_eq!(parse(json!({"score": 140})).score, 100);
        assert_eq!(parse(json!({"score": -3})).score, 0);
        assert_eq!(parse(json!({"score": 72.6})).score, 73);
        assert_eq!(parse(json!({"score": "55%"})).score, 55);
        assert_eq!(parse(json!({"score": null})).score, 0);
    }

    #[test]
    fn test_reasoning_points_as_string() {
        let result = parse(json!({"reasoning_points": "It is satire."}));
        assert_eq!(
            result.reasoning_points,
            vec![ReasoningPoint::new("Analysis", "It is satire.")]
        );
    }

    #[test]
    fn test_reasoning_points_as_object() {
        let result = parse(json!({"reasoning_points": {"Origin": "Forum post", "Count": 3}}));
        assert_eq!(result.reasoning_points.len(), 2);
        let count = result
            .reasoning_points
            .iter()
            .find(|p| p.title == "Count")
            .unwrap();
        assert_eq!(count.detail.as_deref(), Some("3"));
    }

    #[test]
    fn test_untitled_point_display_title() {
        let result = parse(json!({"reasoning_points": [{"detail": "x"}]}));
        assert_eq!(result.reasoning_points[0].display_title(), "Key Detail");
    }

    #[test]
    fn test_object_sources_and_short_urls() {
        let result = parse(json!({
            "sources": [
                {"link": "https://example.org/a", "domain": "Example"},
                {"url": "https://reuters.com/x"},
                {"url": "http"},
                "abc",
                42
            ]
        }));

        assert_eq!(result.sources.len(), 2);
        assert_eq!(result.sources[0].url, "https://example.org/a");
        assert_eq!(result.sources[0].site_name, "Example");
        assert_eq!(result.sources[1].site_name, "reuters.com");
    }

    #[test]
    fn test_blank_label_becomes_unknown() {
        assert_eq!(parse(json!({"label": "  "})).label, "Unknown");
    }

    #[test]
    fn test_non_string_label_is_kept() {
        let result = parse(json!({
            "score": 90,
            "label": 5,
            "reasoning_points": [{"title": "Quote", "detail": "Checks out"}],
            "sources": ["https://apnews.com/1"]
        }));
        assert_eq!(result.score, 90);
        assert_eq!(result.label, "5");
        assert_eq!(result.reasoning_points.len(), 1);
        assert_eq!(result.sources.len(), 1);

        assert_eq!(parse(json!({"label": null})).label, "Unknown");
    }

    #[test]
    fn test_error_label_from_service_is_a_verdict() {
        let result = parse(json!({"score": 12, "label": "Error"}));
        assert_eq!(result.label, "Error");
        assert!(!result.is_error());
    }

    #[test]
    fn test_connection_failed_shape() {
        let result = AnalysisResult::connection_failed();
        assert!(result.is_error());
        assert_eq!(result.score, 0);
        assert_eq!(result.reasoning_points[0].title, "Connection Failed");
        assert!(result.sources.is_empty());
    }
}
