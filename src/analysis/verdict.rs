//! Score tiers and display helpers for the result panel

use reqwest::Url;

use super::types::{AnalysisResult, ReasoningPoint};

/// Verdict tier derived from the score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Truth,
    LikelyTrue,
    Unverified,
    Misleading,
    HighRisk,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        match score {
            81..=u8::MAX => Tier::Truth,
            61..=80 => Tier::LikelyTrue,
            41..=60 => Tier::Unverified,
            21..=40 => Tier::Misleading,
            _ => Tier::HighRisk,
        }
    }

    pub fn default_label(&self) -> &'static str {
        match self {
            Tier::Truth => "Truth",
            Tier::LikelyTrue => "Likely True",
            Tier::Unverified => "Unverified",
            Tier::Misleading => "Misleading",
            Tier::HighRisk => "High Risk",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Tier::Truth => {
                "Looks like this is legitimate! The main claims check out based on verified sources."
            }
            Tier::LikelyTrue => {
                "There's definitely truth to this, but it might be missing some important context or nuance."
            }
            Tier::Unverified => {
                "This is a bit of a mixed bag. Some parts are accurate, but others are completely unverified."
            }
            Tier::Misleading => {
                "Take this with a massive grain of salt. It's highly misleading or twisting the actual facts."
            }
            Tier::HighRisk => {
                "Watch out! This looks completely fabricated or is known disinformation. Don't fall for it!"
            }
        }
    }

    /// CSS class applied to the score badge
    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::Truth => "tier-truth",
            Tier::LikelyTrue => "tier-likely-true",
            Tier::Unverified => "tier-unverified",
            Tier::Misleading => "tier-misleading",
            Tier::HighRisk => "tier-high-risk",
        }
    }

    pub fn all() -> [Tier; 5] {
        [
            Tier::Truth,
            Tier::LikelyTrue,
            Tier::Unverified,
            Tier::Misleading,
            Tier::HighRisk,
        ]
    }
}

/// Label shown on the badge: the service label, or the tier default when the
/// service gave none
pub fn display_label(result: &AnalysisResult) -> &str {
    let label = result.label.trim();
    if label.is_empty() || label.eq_ignore_ascii_case("unknown") {
        Tier::from_score(result.score).default_label()
    } else {
        label
    }
}

/// Short human-readable name for a source URL
pub fn display_name_for_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return "Source Link".to_string();
    };

    match parsed.host_str() {
        Some(host) if host.contains("vertexaisearch") => "Google Search Reference".to_string(),
        Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
        None => "Source Link".to_string(),
    }
}

/// Points to list under "Key Findings", with a placeholder when empty
pub fn reasoning_points_or_summary(result: &AnalysisResult) -> Vec<ReasoningPoint> {
    if result.reasoning_points.is_empty() {
        vec![ReasoningPoint::new(
            "Analysis Summary",
            "Content scanned via Google Search but the detailed breakdown could not be parsed.",
        )]
    } else {
        result.reasoning_points.clone()
    }
}
