use gtk4 as gtk;

use crate::analysis::Tier;

const BASE_CSS: &str = "
.result-panel {
    background-color: rgba(20, 20, 25, 0.95);
}
.score-badge {
    border-radius: 12px;
    padding: 16px;
    border: 1px solid;
}
.score-value {
    font-size: 36px;
    font-weight: 900;
}
.score-label {
    font-size: 10px;
    font-weight: bold;
    letter-spacing: 2px;
}
.section-title {
    font-size: 10px;
    font-weight: bold;
    color: #6b7280;
}
.card {
    background-color: rgba(255, 255, 255, 0.05);
    border-radius: 8px;
    padding: 12px;
}
.finding-title {
    font-weight: bold;
    font-size: 11px;
    color: #a5b4fc;
}
.finding-detail {
    font-size: 12px;
    border-left: 2px solid rgba(129, 140, 248, 0.5);
    padding-left: 8px;
}
.finding-bullet {
    font-size: 12px;
    color: #9ca3af;
}
.source-row {
    background-color: rgba(99, 102, 241, 0.05);
    border-radius: 6px;
}
.no-sources {
    font-style: italic;
    font-size: 12px;
    color: #4b5563;
}
";

fn tier_css(tier: Tier) -> String {
    let rgb = match tier {
        Tier::Truth => "74, 222, 128",
        Tier::LikelyTrue => "96, 165, 250",
        Tier::Unverified => "250, 204, 21",
        Tier::Misleading => "251, 146, 60",
        Tier::HighRisk => "239, 68, 68",
    };
    format!(
        ".{class} {{ color: rgb({rgb}); background-color: rgba({rgb}, 0.1); border-color: rgba({rgb}, 0.3); }}\n",
        class = tier.css_class(),
        rgb = rgb
    )
}

/// Install the app stylesheet on the default display
pub fn load_css() {
    let mut css = BASE_CSS.to_string();
    for tier in Tier::all() {
        css.push_str(&tier_css(tier));
    }

    let provider = gtk::CssProvider::new();
    provider.load_from_string(&css);

    if let Some(display) = gtk::gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    } else {
        log::warn!("No default display, skipping stylesheet");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_css_uses_class_name() {
        let css = tier_css(Tier::Misleading);
        assert!(css.starts_with(".tier-misleading {"));
        assert!(css.contains("rgba(251, 146, 60, 0.3)"));
    }
}
