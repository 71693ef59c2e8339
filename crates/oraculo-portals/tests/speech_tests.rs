use oraculo_portals::clean_for_speech;
use oraculo_portals::speech::MAX_SPEECH_CHARS;

#[test]
fn test_strips_emphasis_and_headings() {
    let text = "## Leitura\n**Luz:** a *calma* chega";
    assert_eq!(clean_for_speech(text), "Leitura\nLuz: a calma chega");
}

#[test]
fn test_links_keep_their_text() {
    assert_eq!(
        clean_for_speech("Visite [o templo](https://exemplo.org) hoje"),
        "Visite o templo hoje"
    );
}

#[test]
fn test_markup_and_rules_removed() {
    let text = "> citação `código` snake_case\n---\nfim";
    assert_eq!(clean_for_speech(text), " citação código snakecase\n\nfim".trim());
}

#[test]
fn test_glyphs_removed() {
    let text = "🌞 Selo 🎶 Tom 🧬 Alma 📐⚖️◆";
    assert_eq!(clean_for_speech(text), "Selo  Tom  Alma");
}

#[test]
fn test_long_text_is_truncated() {
    let text = "á".repeat(MAX_SPEECH_CHARS + 10);
    let clean = clean_for_speech(&text);
    assert!(clean.ends_with("..."));
    assert_eq!(clean.chars().count(), MAX_SPEECH_CHARS + 3);

    let exact = "b".repeat(MAX_SPEECH_CHARS);
    assert_eq!(clean_for_speech(&exact), exact);
}

#[test]
fn test_blank_input() {
    assert_eq!(clean_for_speech("  \n "), "");
}
