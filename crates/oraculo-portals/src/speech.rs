//! Markdown and glyph stripping before text is handed to a speech engine.

use lazy_static::lazy_static;
use regex::Regex;

pub const MAX_SPEECH_CHARS: usize = 4000;

lazy_static! {
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?m)^#+\s+").unwrap();
    static ref LINK: Regex = Regex::new(r"\[(.*?)\]\(.*?\)").unwrap();
    static ref MARKUP: Regex = Regex::new(r"[#`_~>]").unwrap();
    static ref GLYPHS: Regex = Regex::new(
        "🗺️|✨|👁️|📍|🌱|🪞|🌌|◆|🜂|📐|⚖️|🧭|📜|🔁|🜁|⬡|🌞|🔢|🎶|🧬|🌍"
    )
    .unwrap();
}

pub fn clean_for_speech(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = HEADING.replace_all(&text, "");
    let text = LINK.replace_all(&text, "$1");
    let text = MARKUP.replace_all(&text, "");
    let text = text.replace("---", "");
    let text = GLYPHS.replace_all(&text, "");
    truncate_chars(text.trim(), MAX_SPEECH_CHARS)
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("ação", 2), "aç...");
        assert_eq!(truncate_chars("ação", 4), "ação");
    }
}
