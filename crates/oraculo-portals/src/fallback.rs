//! Messages shown when the text backend answers with nothing or fails.

pub const ORACLE_SILENT: &str = "O silêncio do oráculo é a resposta que você precisa agora.";
pub const ORACLE_FAILED: &str =
    "As energias oscilaram. Respire fundo e tente acessar este portal novamente.";

pub const MEDITATION_SILENT: &str = "Respire fundo e apenas exista.";
pub const MEDITATION_FAILED: &str = "Feche os olhos. Respire. Sinta o agora.";

pub const DAILY_PHRASE_SILENT: &str = "O universo respira com você.";
pub const DAILY_PHRASE_FAILED: &str = "Onde há intenção, há caminho.";

pub const UNIVERSE_SILENT: &str = "O silêncio absoluto também é uma resposta.";
pub const UNIVERSE_FAILED: &str = "A conexão com o todo oscila. Tente novamente em um instante.";

pub const METATRON_SILENT: &str = "A estrutura permanece em silêncio. Observe.";
pub const METATRON_FAILED: &str = "O padrão foi interrompido. Recalibrando.";

/// Which kind of request a fallback is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consultation {
    Portal,
    Meditation,
    DailyPhrase,
    Universe,
    Metatron,
}

impl Consultation {
    pub fn silent(&self) -> &'static str {
        match self {
            Consultation::Portal => ORACLE_SILENT,
            Consultation::Meditation => MEDITATION_SILENT,
            Consultation::DailyPhrase => DAILY_PHRASE_SILENT,
            Consultation::Universe => UNIVERSE_SILENT,
            Consultation::Metatron => METATRON_SILENT,
        }
    }

    pub fn failed(&self) -> &'static str {
        match self {
            Consultation::Portal => ORACLE_FAILED,
            Consultation::Meditation => MEDITATION_FAILED,
            Consultation::DailyPhrase => DAILY_PHRASE_FAILED,
            Consultation::Universe => UNIVERSE_FAILED,
            Consultation::Metatron => METATRON_FAILED,
        }
    }

    /// Final text for a backend outcome: the answer itself, or the matching
    /// fallback when it is blank or the call failed.
    pub fn settle<E: std::fmt::Display>(&self, outcome: Result<Option<String>, E>) -> String {
        match outcome {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => self.silent().to_string(),
            Err(e) => {
                log::warn!("{:?} consultation failed: {}", self, e);
                self.failed().to_string()
            }
        }
    }
}

/// A source the backend cited, rendered under the answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingLink {
    pub title: String,
    pub uri: String,
}

/// Append a "Caminhos Sugeridos" list for any usable links.
pub fn with_grounding_links(response: String, links: &[GroundingLink]) -> String {
    let usable: Vec<_> = links
        .iter()
        .filter(|l| !l.title.is_empty() && !l.uri.is_empty())
        .collect();
    if usable.is_empty() {
        return response;
    }
    let mut out = response;
    out.push_str("\n\n---\n\n**Caminhos Sugeridos:**\n");
    for link in usable {
        out.push_str(&format!("• [{}]({})\n", link.title, link.uri));
    }
    out
}
