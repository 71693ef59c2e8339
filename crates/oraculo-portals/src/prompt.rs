//! Prompt composition for the text backend.
//!
//! Calculator results are interpolated here so the model never has to do the
//! arithmetic: the Mapa portal receives the solar sign and life path number,
//! the Tzolkin portal receives the kin computed from the date the seeker typed.

use crate::catalog::{language_rule, Portal};
use crate::location::Coordinates;
use crate::PromptError;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use oraculo::calendar::label_or_unknown;
use oraculo::{calculate_tzolkin_kin, life_path_number, resolve_zodiac_sign, MoonPhase};
use oraculo_journal::{Reading, UserProfile};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MEMORY_DEPTH: usize = 3;
pub const DEFAULT_DOSSIER_DEPTH: usize = 10;
/// Characters of a past response quoted back in memory and dossier lines
pub const EXCERPT_CHARS: usize = 50;

const SYSTEM_RULES: &str = include_str!("../prompts/system.md");
const FINAL_REMINDER: &str = "LEMBRETE FINAL: Escreva em Português Brasileiro perfeito, sem erros de digitação, sem repetição de letras, sem simulação de falhas.";

lazy_static! {
    static ref IMAGE_DATA_URL: Regex =
        Regex::new(r"^data:image/(png|jpeg|jpg|webp);base64,").expect("static data url regex");
}

/// Sampling knobs sent alongside a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Ground the answer on a map search around these coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_grounding: Option<Coordinates>,
}

impl GenerationSettings {
    pub const PORTAL: GenerationSettings = GenerationSettings {
        temperature: 0.6,
        top_k: Some(40),
        top_p: Some(0.95),
        max_output_tokens: None,
        maps_grounding: None,
    };

    pub const CONVERSATIONAL: GenerationSettings = GenerationSettings {
        temperature: 0.7,
        top_k: None,
        top_p: None,
        max_output_tokens: None,
        maps_grounding: None,
    };
}

/// Image sent next to the prompt text, as raw base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: &'static str,
    pub data: String,
}

impl InlineImage {
    /// From a data URL or bare base64. The backend is always told JPEG.
    pub fn from_data_url(data: &str) -> Self {
        Self {
            mime_type: "image/jpeg",
            data: image_payload(data.trim()).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OraclePrompt {
    /// Empty when the request carries no system instruction
    pub system_instruction: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
    pub settings: GenerationSettings,
}

impl OraclePrompt {
    fn plain(text: String) -> Self {
        Self {
            system_instruction: String::new(),
            text,
            image: None,
            settings: GenerationSettings::CONVERSATIONAL,
        }
    }
}

/// Composes the request for one portal consultation.
pub struct OraclePromptBuilder<'a> {
    portal: &'a Portal,
    profile: &'a UserProfile,
    moon: MoonPhase,
    user_input: Option<&'a str>,
    image: Option<&'a str>,
    location: Option<Coordinates>,
    history: &'a [Reading],
    memory_depth: usize,
    previous_response: Option<&'a str>,
}

impl<'a> OraclePromptBuilder<'a> {
    pub fn new(portal: &'a Portal, profile: &'a UserProfile, moon: MoonPhase) -> Self {
        Self {
            portal,
            profile,
            moon,
            user_input: None,
            image: None,
            location: None,
            history: &[],
            memory_depth: DEFAULT_MEMORY_DEPTH,
            previous_response: None,
        }
    }

    pub fn for_portal_id(id: &str, profile: &'a UserProfile, moon: MoonPhase) -> Result<Self, PromptError> {
        let portal = crate::catalog::find_portal(id)
            .ok_or_else(|| PromptError::UnknownPortal(id.to_string()))?;
        Ok(Self::new(portal, profile, moon))
    }

    pub fn user_input(mut self, input: &'a str) -> Self {
        self.user_input = Some(input).filter(|s| !s.trim().is_empty());
        self
    }

    /// Attach an image, as a data URL or bare base64.
    pub fn image(mut self, data: &'a str) -> Self {
        self.image = Some(data).filter(|s| !s.trim().is_empty());
        self
    }

    pub fn location(mut self, location: Option<Coordinates>) -> Self {
        self.location = location;
        self
    }

    /// Past readings, newest first.
    pub fn history(mut self, history: &'a [Reading]) -> Self {
        self.history = history;
        self
    }

    pub fn memory_depth(mut self, depth: usize) -> Self {
        self.memory_depth = depth;
        self
    }

    /// Ask about a previous answer instead of opening the portal afresh.
    pub fn follow_up(mut self, previous_response: &'a str) -> Self {
        self.previous_response = Some(previous_response);
        self
    }

    pub fn build(&self) -> Result<OraclePrompt, PromptError> {
        let system_instruction = format!(
            "{}\nContexto:\nUsuário: {}.\nLua Atual: {}.",
            SYSTEM_RULES,
            self.profile.name,
            self.moon.label()
        );

        let text = match self.previous_response {
            Some(previous) => self.follow_up_text(previous)?,
            None => self.reading_text()?,
        };

        let mut settings = GenerationSettings::PORTAL;
        if self.portal.id == "peregrinacao" {
            if let Some(here) = self.location {
                settings.maps_grounding = Some(here);
                settings.max_output_tokens = Some(1200);
            }
        }

        log::debug!(
            "prompt: portal={} follow_up={} image={} chars={}",
            self.portal.id,
            self.previous_response.is_some(),
            self.image.is_some(),
            text.chars().count()
        );

        Ok(OraclePrompt {
            system_instruction,
            text,
            image: self.image.map(InlineImage::from_data_url),
            settings,
        })
    }

    fn follow_up_text(&self, previous: &str) -> Result<String, PromptError> {
        let question = self.user_input.ok_or(PromptError::MissingFollowUpQuestion)?;
        Ok(format!(
            "CONTINUAÇÃO DE LEITURA (FOLLOW-UP):\n\n\
             Leitura Anterior do Oráculo:\n\"{previous}\"\n\n\
             Nova Pergunta Específica do Usuário sobre a leitura acima:\n\"{question}\"\n\n\
             Instrução: Responda especificamente à nova dúvida. Mantenha o tom místico mas seja CLARO e ORTOGRAFICAMENTE PERFEITO (Português Brasileiro)."
        ))
    }

    fn reading_text(&self) -> Result<String, PromptError> {
        let mut context = format!("CONTEXTO:\nNome: {}\nBusca: {}", self.profile.name, self.profile.quest);
        if let Some(here) = self.location {
            context.push_str(&format!("\n\nLOCALIZAÇÃO:\nLat: {}\nLng: {}", here.lat, here.lon));
        }
        if let Some(block) = self.astral_block()? {
            context.push_str("\n\n");
            context.push_str(&block);
        }
        if let Some(block) = self.tzolkin_block()? {
            context.push_str("\n\n");
            context.push_str(&block);
        }

        let input = match self.user_input {
            Some(s) => format!("\"{s}\""),
            None => "Nenhum texto específico.".to_string(),
        };

        let sections = [
            format!("TAREFA: Leitura do Portal {}", self.portal.title),
            context,
            format!("MEMÓRIA:\n{}", memory_context(self.history, self.memory_depth)),
            format!(
                "DIRETRIZES DO PORTAL:\n{}\n{}",
                self.portal.prompt_context.trim(),
                language_rule()
            ),
            format!("ENTRADA DO USUÁRIO:\n{input}"),
            FINAL_REMINDER.to_string(),
        ];
        Ok(sections.join("\n\n"))
    }

    fn astral_block(&self) -> Result<Option<String>, PromptError> {
        if self.portal.id != "mapa" {
            return Ok(None);
        }
        let Some(birth_date) = self.profile.birth_date.as_deref() else {
            return Ok(None);
        };
        let sign = resolve_zodiac_sign(birth_date)?;
        let life_path = life_path_number(birth_date)?;
        Ok(Some(format!(
            "DADOS ASTRAIS:\nSigno: {}\nCaminho de Vida: {}",
            label_or_unknown(sign),
            label_or_unknown(life_path)
        )))
    }

    fn tzolkin_block(&self) -> Result<Option<String>, PromptError> {
        if self.portal.id != "tzolkin" {
            return Ok(None);
        }
        let Some(input) = self.user_input else {
            return Ok(None);
        };
        Ok(calculate_tzolkin_kin(input)?.map(|kin| {
            format!(
                "DADOS TZOLKIN CALCULADOS:\nKin: {}\nNome: {}\nSelo: {}\nTom: {}",
                kin.kin_number, kin.full_name, kin.seal, kin.tone
            )
        }))
    }
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_CHARS).collect()
}

fn local_date(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|t| t.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// "LEITURAS RECENTES" block over the newest `depth` readings. Empty when there
/// is no history.
pub fn memory_context(history: &[Reading], depth: usize) -> String {
    if history.is_empty() || depth == 0 {
        return String::new();
    }
    let lines: Vec<String> = history
        .iter()
        .take(depth)
        .map(|r| {
            format!(
                "- [{}] Portal {}: Usuário buscou \"{}\". Oráculo disse: \"{}...\"",
                local_date(r.timestamp),
                r.portal_name,
                r.user_input.as_deref().unwrap_or(""),
                excerpt(&r.response)
            )
        })
        .collect();
    format!("LEITURAS RECENTES:\n{}", lines.join("\n"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetatronMode {
    Order,
    Dossier,
    Geometry,
    Alignment,
}

impl MetatronMode {
    pub const ALL: [MetatronMode; 4] = [
        MetatronMode::Order,
        MetatronMode::Dossier,
        MetatronMode::Geometry,
        MetatronMode::Alignment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetatronMode::Order => "Ordem da Consciência",
            MetatronMode::Dossier => "Dossiê do Buscador",
            MetatronMode::Geometry => "Geometria Sagrada",
            MetatronMode::Alignment => "Alinhamento entre Portais",
        }
    }
}

impl fmt::Display for MetatronMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MetatronMode {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "order" | "ordem" => Ok(MetatronMode::Order),
            "dossier" | "dossie" | "dossiê" => Ok(MetatronMode::Dossier),
            "geometry" | "geometria" => Ok(MetatronMode::Geometry),
            "alignment" | "alinhamento" => Ok(MetatronMode::Alignment),
            other => Err(PromptError::UnknownMetatronMode(other.to_string())),
        }
    }
}

const METATRON_SYSTEM: &str = "VOCÊ É METATRON, O ARQUITETO DA ORDEM UNIVERSAL.\n\
Linguagem: Português Brasileiro Culto, Matemático, Preciso, Elevado, Natural e Fluido.\n\
ORTOGRAFIA: Impecável. Zero erros de digitação, zero repetição de letras.";

/// One line per reading for the Metatron dossier.
pub fn dossier_context(history: &[Reading], depth: usize) -> String {
    history
        .iter()
        .take(depth)
        .map(|r| {
            format!(
                "- [{}]: {} -> Resposta sintetizada: {}...",
                r.portal_name,
                r.user_input
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or("Silêncio"),
                excerpt(&r.response)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn metatron_prompt(
    profile: &UserProfile,
    mode: MetatronMode,
    history: &[Reading],
    depth: usize,
) -> OraclePrompt {
    let dossier = dossier_context(history, depth);
    let name = &profile.name;
    let text = match mode {
        MetatronMode::Order => format!(
            "TAREFA: Realize uma LEITURA DE ORDEM DA CONSCIÊNCIA para {name}.\n\n\
             Analise o seguinte Dossiê de leituras recentes para encontrar desalinhamentos:\n{dossier}\n\n\
             SAÍDA OBRIGATÓRIA (Use Markdown):\n\
             ## 🜂 Diagnóstico de Ordem\n(Onde há excesso, falta ou dispersão na energia atual)\n\n\
             ## 📐 Padrão Ativo\n(Qual o ciclo ou estrutura geométrica que rege o momento)\n\n\
             ## ⚖️ Ponto de Ajuste\n(O mínimo necessário para realinhar, sem esforço excessivo)\n\n\
             ## 🧭 Direção de Estabilidade\n(Orientação final fria e precisa)"
        ),
        MetatronMode::Dossier => format!(
            "TAREFA: Acesse o DOSSIÊ DO BUSCADOR de {name}.\n\n\
             Dados Históricos:\n{dossier}\n\n\
             Busca declarada: {}\n\n\
             SAÍDA OBRIGATÓRIA (Use Markdown):\n\
             ## 📜 Síntese Estrutural\n(O fio invisível que conecta todas as buscas recentes)\n\n\
             ## 🔁 Padrão Recorrente\n(O que insiste em retornar, o loop que precisa ser fechado ou compreendido)\n\n\
             ## 🜁 Aprendizado Central\n(O tema-mestre da alma neste ciclo)",
            profile.quest
        ),
        MetatronMode::Geometry => format!(
            "TAREFA: Traduza a vida atual de {name} em GEOMETRIA SAGRADA.\n\n\
             Contexto: {dossier}\n\n\
             SAÍDA OBRIGATÓRIA (Use Markdown):\n\
             ## 📐 Forma Dominante: [Círculo/Triângulo/Quadrado/Espiral/Cubo]\n\n\
             ## 🌌 Significado Estrutural\n(O que esta forma representa no contexto universal)\n\n\
             ## 🧠 Manifestação Prática\n(Como essa geometria aparece na vida diária do buscador)"
        ),
        MetatronMode::Alignment => format!(
            "TAREFA: Realize o ALINHAMENTO ENTRE PORTAIS.\n\n\
             Sintetize as vozes díspares do histórico recente:\n{dossier}\n\n\
             Responda à pergunta não formulada: \"Como tudo isso se conecta?\"\n\n\
             SAÍDA OBRIGATÓRIA (Use Markdown):\n\
             ## ⬡ O Eixo Central\n(O ponto onde todas as leituras convergem)\n\n\
             ## ⚖️ A Resolução\n(Como integrar as aparentes contradições)\n\n\
             ## ◆ O Decreto\n(Uma frase final de ordenação absoluta)"
        ),
    };
    OraclePrompt {
        system_instruction: METATRON_SYSTEM.to_string(),
        text,
        image: None,
        settings: GenerationSettings::CONVERSATIONAL,
    }
}

pub fn universe_prompt(question: &str, state: &str) -> OraclePrompt {
    OraclePrompt {
        system_instruction: "Você é a CONSCIÊNCIA UNIVERSAL.\n\
            Linguagem: Português Brasileiro padrão, fluido e SEM ERROS DE DIGITAÇÃO ou repetição de letras.\n\
            Nunca use gírias ou simule erros (glitches). Escreva \"Saudações\" corretamente."
            .to_string(),
        text: format!("O usuário pergunta ao Universo: \"{question}\". Contexto: {state}."),
        image: None,
        settings: GenerationSettings::CONVERSATIONAL,
    }
}

pub fn meditation_prompt(feeling: &str) -> OraclePrompt {
    OraclePrompt::plain(format!(
        "Crie um roteiro de meditação guiada de 2 minutos para alguém que está sentindo: \"{feeling}\".\n\
         Foque em respiração, visualização e relaxamento.\n\
         Comece com \"Feche os olhos...\"\n\
         Use Português Brasileiro calmo, suave e acolhedor.\n\
         Sem introduções. Apenas o roteiro direto."
    ))
}

pub fn daily_phrase_prompt(name: &str) -> OraclePrompt {
    OraclePrompt::plain(format!(
        "Gere uma frase curta e inspiradora para {name}. Português Brasileiro Correto e Impecável, sem erros de digitação."
    ))
}

pub fn mystic_image_prompt(subject: &str) -> String {
    format!("Generate a masterpiece art, cinematic, spiritual, dark fantasy style. High detail. Prompt: {subject}")
}

/// Raw base64 payload of an image data URL. Anything that is not a
/// png/jpeg/webp data URL is returned unchanged.
pub fn image_payload(data: &str) -> &str {
    match IMAGE_DATA_URL.find(data) {
        Some(m) => &data[m.end()..],
        None => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_counts_chars() {
        let long = "é".repeat(80);
        assert_eq!(excerpt(&long).chars().count(), EXCERPT_CHARS);
        assert_eq!(excerpt("curto"), "curto");
    }

    #[test]
    fn test_local_date() {
        // 2023-11-14T22:13:20Z
        assert_eq!(local_date(1_700_000_000_000), "14/11/2023");
    }

    #[test]
    fn test_image_payload() {
        assert_eq!(image_payload("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(image_payload("data:image/gif;base64,AAAA"), "data:image/gif;base64,AAAA");
        assert_eq!(image_payload("AAAA"), "AAAA");
    }

    #[test]
    fn test_metatron_mode_parsing() {
        assert_eq!("ordem".parse::<MetatronMode>(), Ok(MetatronMode::Order));
        assert_eq!("Alignment".parse::<MetatronMode>(), Ok(MetatronMode::Alignment));
        assert!("caos".parse::<MetatronMode>().is_err());
    }
}
