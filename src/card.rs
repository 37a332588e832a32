//! Year-in-reading summary card: a questionnaire filled by one member,
//! rendered as a themed card scene.

use std::fmt::Write as _;

use crate::error::{KuusiError, KuusiResult};
use crate::scene::{fmt, xml_escape};

/// The questionnaire. All prompt fields are optional; empty answers are
/// simply left off the card.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ReadingCard {
    pub name: String,
    #[serde(default)]
    pub community_name: String,
    #[serde(default)]
    pub book_count: Option<String>,
    #[serde(default)]
    pub favorite_book: Option<String>,
    #[serde(default)]
    pub favorite_author: Option<String>,
    #[serde(default)]
    pub top_genre: Option<String>,
    #[serde(default)]
    pub longest_book: Option<String>,
    #[serde(default)]
    pub relatable_book: Option<String>,
    #[serde(default)]
    pub comfort_zone_book: Option<String>,
    #[serde(default)]
    pub community_rec: Option<String>,
    #[serde(default)]
    pub reread_book: Option<String>,
    #[serde(default)]
    pub impressive_environment: Option<String>,
    #[serde(default)]
    pub favorite_character: Option<String>,
    #[serde(default)]
    pub hardest_book: Option<String>,
    #[serde(default)]
    pub dropped_book: Option<String>,
    #[serde(default)]
    pub memorable_quote: Option<String>,
    #[serde(default)]
    pub theme: CardTheme,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTheme {
    /// Deep midnight blue with moonlight gold.
    #[default]
    Moonlight,
    /// Pale silver-grey with night-sky indigo.
    Silver,
    /// Warm paper with lamplight amber.
    Paper,
}

struct ThemeColors {
    bg: &'static str,
    text: &'static str,
    accent: &'static str,
    subtext: &'static str,
    rule: &'static str,
}

impl CardTheme {
    fn colors(self) -> ThemeColors {
        match self {
            Self::Moonlight => ThemeColors {
                bg: "#0f172a",
                text: "#fafaf9",
                accent: "#fde68a",
                subtext: "#e2e8f0",
                rule: "#334155",
            },
            Self::Silver => ThemeColors {
                bg: "#f8fafc",
                text: "#334155",
                accent: "#312e81",
                subtext: "#94a3b8",
                rule: "#e2e8f0",
            },
            Self::Paper => ThemeColors {
                bg: "#fdfbf7",
                text: "#292524",
                accent: "#92400e",
                subtext: "#a8a29e",
                rule: "#e7e5e4",
            },
        }
    }
}

const CARD_WIDTH: f64 = 420.0;
const CARD_PADDING: f64 = 36.0;
const HEADER_HEIGHT: f64 = 120.0;
const ENTRY_HEIGHT: f64 = 52.0;
const QUOTE_HEIGHT: f64 = 96.0;
const FOOTER_HEIGHT: f64 = 56.0;
const FONT_STACK: &str = "'KingHwaOldSong', 'Microsoft YaHei', 'Noto Serif CJK SC', serif";

impl ReadingCard {
    /// Parse a questionnaire from its JSON form.
    pub fn from_json(text: &str) -> KuusiResult<Self> {
        serde_json::from_str(text).map_err(|e| KuusiError::serde(format!("card JSON: {e}")))
    }

    /// The prompt/answer pairs that actually carry an answer, in the order
    /// the form presents them.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        let prompts: [(&'static str, &Option<String>); 14] = [
            ("今年共读完", &self.book_count),
            ("年度最爱的一本书", &self.favorite_book),
            ("年度最爱的作者", &self.favorite_author),
            ("读得最多的类型", &self.top_genre),
            ("读过最长的一本", &self.longest_book),
            ("最有共鸣的一本", &self.relatable_book),
            ("走出舒适区的一本", &self.comfort_zone_book),
            ("来自书友的安利", &self.community_rec),
            ("今年重读的一本", &self.reread_book),
            ("印象最深的环境描写", &self.impressive_environment),
            ("年度最爱的角色", &self.favorite_character),
            ("读得最艰难的一本", &self.hardest_book),
            ("遗憾弃读的一本", &self.dropped_book),
            ("想记住的一句话", &self.memorable_quote),
        ];
        prompts
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (label, v))
            })
            .collect()
    }
}

/// Render the card as a standalone SVG document.
pub fn card_svg(card: &ReadingCard) -> String {
    let colors = card.theme.colors();
    let entries = card.entries();
    let has_quote = card
        .memorable_quote
        .as_deref()
        .is_some_and(|q| !q.trim().is_empty());
    // The quote gets its own block at the bottom instead of a list row.
    let list: Vec<(&str, &str)> = entries
        .iter()
        .copied()
        .filter(|(label, _)| *label != "想记住的一句话")
        .collect();

    let height = HEADER_HEIGHT
        + list.len() as f64 * ENTRY_HEIGHT
        + if has_quote { QUOTE_HEIGHT } else { 0.0 }
        + FOOTER_HEIGHT;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{}" viewBox="0 0 {CARD_WIDTH} {}">"#,
        fmt(height),
        fmt(height)
    );
    let _ = writeln!(
        svg,
        r#"<rect width="100%" height="100%" rx="14" fill="{}"/>"#,
        colors.bg
    );

    // Header: member name over the community byline.
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="54" font-family="{FONT_STACK}" font-size="26" font-weight="bold" fill="{}">{} 的年度阅读报告</text>"#,
        fmt(CARD_PADDING),
        colors.accent,
        xml_escape(card.name.trim())
    );
    if !card.community_name.trim().is_empty() {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="82" font-family="{FONT_STACK}" font-size="13" fill="{}">{}</text>"#,
            fmt(CARD_PADDING),
            colors.subtext,
            xml_escape(card.community_name.trim())
        );
    }
    let _ = writeln!(
        svg,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="1"/>"#,
        fmt(CARD_PADDING),
        fmt(HEADER_HEIGHT - 18.0),
        fmt(CARD_WIDTH - CARD_PADDING),
        fmt(HEADER_HEIGHT - 18.0),
        colors.rule
    );

    let mut y = HEADER_HEIGHT + 24.0;
    for (label, value) in list {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-family="{FONT_STACK}" font-size="12" fill="{}">{}</text>"#,
            fmt(CARD_PADDING),
            fmt(y),
            colors.subtext,
            xml_escape(label)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-family="{FONT_STACK}" font-size="17" fill="{}">{}</text>"#,
            fmt(CARD_PADDING),
            fmt(y + 22.0),
            colors.text,
            xml_escape(value)
        );
        y += ENTRY_HEIGHT;
    }

    if has_quote {
        if let Some(quote) = card.memorable_quote.as_deref() {
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" font-family="{FONT_STACK}" font-size="28" fill="{}" opacity="0.5">&quot;</text>"#,
                fmt(CARD_PADDING),
                fmt(y + 16.0),
                colors.accent
            );
            let _ = writeln!(
                svg,
                r#"<text x="{}" y="{}" font-family="{FONT_STACK}" font-size="15" font-style="italic" fill="{}">{}</text>"#,
                fmt(CARD_PADDING + 24.0),
                fmt(y + 36.0),
                colors.text,
                xml_escape(quote.trim())
            );
            y += QUOTE_HEIGHT;
        }
    }

    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-family="{FONT_STACK}" font-size="11" letter-spacing="3" fill="{}" opacity="0.6">YEAR IN READING · 2025</text>"#,
        fmt(CARD_PADDING),
        fmt(height - 24.0),
        colors.subtext
    );
    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> ReadingCard {
        ReadingCard {
            name: "小雀".to_string(),
            community_name: "与月言书·明亮的夜晚".to_string(),
            book_count: Some("24 本".to_string()),
            favorite_book: Some("斯通纳".to_string()),
            memorable_quote: Some("你得弄明白自己是谁。".to_string()),
            theme: CardTheme::Moonlight,
            ..ReadingCard::default()
        }
    }

    #[test]
    fn entries_skip_empty_answers() {
        let mut card = sample_card();
        card.favorite_author = Some("   ".to_string());
        let entries = card.entries();
        assert!(entries.iter().any(|(_, v)| *v == "斯通纳"));
        assert!(!entries.iter().any(|(l, _)| *l == "年度最爱的作者"));
    }

    #[test]
    fn card_svg_contains_answers_and_theme_background() {
        let svg = card_svg(&sample_card());
        assert!(svg.contains("小雀 的年度阅读报告"));
        assert!(svg.contains("斯通纳"));
        assert!(svg.contains("#0f172a"));
        assert!(svg.contains("你得弄明白自己是谁。"));
    }

    #[test]
    fn theme_deserializes_from_lowercase() {
        let card = ReadingCard::from_json(r#"{"name":"x","theme":"paper"}"#).unwrap();
        assert_eq!(card.theme, CardTheme::Paper);
    }

    #[test]
    fn malformed_json_is_a_serialization_error() {
        let err = ReadingCard::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn quote_block_grows_the_card() {
        let with_quote = card_svg(&sample_card());
        let mut card = sample_card();
        card.memorable_quote = None;
        let without_quote = card_svg(&card);
        assert!(with_quote.len() > without_quote.len());
    }
}
