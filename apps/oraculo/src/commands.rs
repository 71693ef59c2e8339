use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use oraculo::calendar::label_or_unknown;
use oraculo::moon::phase_ratio;
use oraculo::{
    calculate_tzolkin_kin, ephemeris_snapshot, life_path_number, moon_phase_at, resolve_zodiac_sign,
    MoonPhase, SwissEphemerisAdapter, UNKNOWN_LABEL,
};
use oraculo_config::OraculoSettings;
use oraculo_journal::{AltarItem, FileStore, Journal, KeyValueStore, Reading, UserProfile};
use oraculo_portals::fallback::with_grounding_links;
use oraculo_portals::prompt::{daily_phrase_prompt, meditation_prompt, mystic_image_prompt, universe_prompt};
use oraculo_portals::tarot::{draw_card_seeded, resolve_selection};
use oraculo_portals::{
    find_card, find_portal, metatron_prompt, moon_affinity, portals_in, Consultation, Coordinates,
    FixedLocation, GroundingLink, InputType, LocationProvider, MetatronMode, OraclePrompt,
    OraclePromptBuilder, PortalCategory,
};
use std::convert::Infallible;
use std::path::PathBuf;

pub fn journal(settings: &OraculoSettings) -> Journal<FileStore> {
    Journal::new(FileStore::new(&settings.journal_dir))
}

fn stamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

fn preview(text: &str, max: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() > max {
        format!("{}...", line.chars().take(max).collect::<String>())
    } else {
        line.to_string()
    }
}

fn require_profile<S: KeyValueStore>(journal: &Journal<S>) -> anyhow::Result<UserProfile> {
    journal
        .profile()?
        .ok_or_else(|| anyhow::anyhow!("No profile saved yet; run `oraculo profile set` first"))
}

pub fn sign(date: &str) -> anyhow::Result<String> {
    Ok(format!("Signo: {}", label_or_unknown(resolve_zodiac_sign(date)?)))
}

pub fn life_path(date: &str) -> anyhow::Result<String> {
    Ok(format!("Caminho de Vida: {}", label_or_unknown(life_path_number(date)?)))
}

pub fn kin(date: &str, json: bool) -> anyhow::Result<String> {
    let kin = calculate_tzolkin_kin(date)?;
    if json {
        return Ok(serde_json::to_string_pretty(&kin)?);
    }
    match kin {
        Some(k) => Ok(format!(
            "Kin {}: {}\nSelo: {}\nTom: {}\nCor: {}",
            k.kin_number, k.full_name, k.seal, k.tone, k.color
        )),
        None => Ok(format!("Kin: {UNKNOWN_LABEL}")),
    }
}

pub fn moon(at: DateTime<Utc>) -> String {
    let phase = moon_phase_at(at);
    format!(
        "{} ({}), {:.1}% do ciclo sinódico",
        phase.label(),
        phase.english_name(),
        phase_ratio(at) * 100.0
    )
}

pub fn sky(ephemeris_path: Option<PathBuf>, at: DateTime<Utc>) -> anyhow::Result<String> {
    let adapter = SwissEphemerisAdapter::new(ephemeris_path)?;
    let positions = ephemeris_snapshot(&adapter, at)?;
    let mut lines = vec![format!("Céu em {}", at.format("%Y-%m-%d %H:%M UTC"))];
    lines.extend(positions.iter().map(|p| format!("  {p}")));
    Ok(lines.join("\n"))
}

pub fn profile_show<S: KeyValueStore>(journal: &Journal<S>) -> anyhow::Result<String> {
    let Some(profile) = journal.profile()? else {
        return Ok("Nenhum perfil salvo.".to_string());
    };
    let mut lines = vec![
        format!("Nome: {}", profile.name),
        format!("Busca: {}", profile.quest),
    ];
    match profile.birth_date.as_deref() {
        Some(date) => {
            lines.push(format!("Nascimento: {date}"));
            lines.push(sign(date)?);
            lines.push(life_path(date)?);
        }
        None => lines.push(format!("Nascimento: {UNKNOWN_LABEL}")),
    }
    Ok(lines.join("\n"))
}

pub fn profile_set<S: KeyValueStore>(
    journal: &mut Journal<S>,
    name: &str,
    quest: &str,
    birth_date: Option<String>,
) -> anyhow::Result<String> {
    if name.trim().is_empty() {
        anyhow::bail!("Name cannot be empty");
    }
    // reject malformed dates before they reach the journal
    if let Some(date) = birth_date.as_deref() {
        oraculo::calendar::parse_optional(date)?;
    }
    let profile = UserProfile::new(name.trim(), birth_date, quest.trim());
    journal.save_profile(&profile)?;
    Ok(format!("Perfil salvo para {}.", profile.name))
}

pub fn portals(moon: MoonPhase) -> String {
    let mut lines = vec![format!("Lua atual: {}", moon.label())];
    for category in PortalCategory::ALL {
        lines.push(String::new());
        lines.push(format!("{category}:"));
        for portal in portals_in(category) {
            let mark = if moon_affinity(portal.id, moon) { " ☾" } else { "" };
            lines.push(format!(
                "  {:<16} {} - {}{}",
                portal.id, portal.title, portal.description, mark
            ));
        }
    }
    lines.join("\n")
}

pub struct PromptRequest<'a> {
    pub portal: &'a str,
    pub input: Option<&'a str>,
    /// Id of a saved reading to ask about
    pub follow_up: Option<&'a str>,
    /// Data URL or bare base64, for portals that read an image
    pub image: Option<&'a str>,
    pub json: bool,
}

fn render_prompt(prompt: &OraclePrompt, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(prompt)?);
    }
    let mut out = String::new();
    if !prompt.system_instruction.is_empty() {
        out.push_str("=== INSTRUÇÃO DE SISTEMA ===\n");
        out.push_str(&prompt.system_instruction);
        out.push_str("\n\n");
    }
    out.push_str("=== PROMPT ===\n");
    out.push_str(&prompt.text);
    if let Some(image) = &prompt.image {
        out.push_str(&format!(
            "\n\n=== IMAGEM ===\n{} ({} bytes em base64)",
            image.mime_type,
            image.data.len()
        ));
    }
    Ok(out)
}

pub fn prompt<S: KeyValueStore>(
    journal: &Journal<S>,
    settings: &OraculoSettings,
    request: PromptRequest<'_>,
    moon: MoonPhase,
) -> anyhow::Result<String> {
    let profile = require_profile(journal)?;
    let history = journal.history()?;
    let portal = find_portal(request.portal)
        .ok_or_else(|| anyhow::anyhow!("Unknown portal '{}'; see `oraculo portals`", request.portal))?;

    if request.image.is_some() && portal.input_type != InputType::Image {
        anyhow::bail!("Portal '{}' does not read images", portal.id);
    }

    let previous = match request.follow_up {
        Some(id) => Some(
            journal
                .find_reading(id)?
                .ok_or_else(|| anyhow::anyhow!("No reading with id {id}"))?
                .response,
        ),
        None => None,
    };

    // settle the tarot card locally
    let mut input = request.input.map(str::to_string);
    if portal.id == "tarot" && previous.is_none() {
        let card = resolve_selection(request.input, &mut rand::thread_rng())
            .ok_or_else(|| anyhow::anyhow!("Unknown tarot card '{}'", request.input.unwrap_or("")))?;
        log::info!("tarot: {card}");
        input = Some(card.to_string());
    }

    let provider = FixedLocation::new(
        settings
            .location
            .and_then(|l| Coordinates::new(l.lat, l.lon)),
    );
    let location = if portal.input_type == InputType::Location {
        provider.current_location()
    } else {
        None
    };

    let mut builder = OraclePromptBuilder::new(portal, &profile, moon)
        .history(&history)
        .memory_depth(settings.memory_depth)
        .location(location);
    if let Some(text) = input.as_deref() {
        builder = builder.user_input(text);
    }
    if let Some(prev) = previous.as_deref() {
        builder = builder.follow_up(prev);
    }
    if let Some(image) = request.image {
        builder = builder.image(image);
    }
    let prompt = builder.build()?;
    render_prompt(&prompt, request.json)
}

pub fn metatron<S: KeyValueStore>(
    journal: &Journal<S>,
    settings: &OraculoSettings,
    mode: MetatronMode,
) -> anyhow::Result<String> {
    let profile = require_profile(journal)?;
    let history = journal.history()?;
    if history.is_empty() {
        log::warn!("metatron: no readings yet, the dossier is empty");
    }
    let prompt = metatron_prompt(&profile, mode, &history, settings.dossier_depth);
    render_prompt(&prompt, false)
}

pub fn universe(question: &str, state: Option<&str>) -> anyhow::Result<String> {
    if question.trim().is_empty() {
        anyhow::bail!("Ask the universe something");
    }
    let state = state.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("Neutro");
    render_prompt(&universe_prompt(question.trim(), state), false)
}

pub fn meditate(feeling: &str) -> anyhow::Result<String> {
    if feeling.trim().is_empty() {
        anyhow::bail!("Say how you are feeling");
    }
    render_prompt(&meditation_prompt(feeling.trim()), false)
}

pub fn daily<S: KeyValueStore>(journal: &Journal<S>) -> anyhow::Result<String> {
    let profile = require_profile(journal)?;
    render_prompt(&daily_phrase_prompt(&profile.name), false)
}

pub fn mystic_image(subject: &str) -> anyhow::Result<String> {
    if subject.trim().is_empty() {
        anyhow::bail!("Describe the image to conjure");
    }
    Ok(mystic_image_prompt(subject.trim()))
}

/// `TITLE=URI`
pub fn parse_link(s: &str) -> Result<GroundingLink, String> {
    let (title, uri) = s
        .split_once('=')
        .ok_or_else(|| format!("expected TITLE=URI, got '{s}'"))?;
    Ok(GroundingLink {
        title: title.trim().to_string(),
        uri: uri.trim().to_string(),
    })
}

pub fn tarot(seed: Option<u64>) -> String {
    let card = match seed {
        Some(s) => draw_card_seeded(s),
        None => oraculo_portals::draw_card(&mut rand::thread_rng()),
    };
    match find_card(card) {
        Some((name, group)) => format!("{name} ({})", group.name),
        None => card.to_string(),
    }
}

pub fn history_list<S: KeyValueStore>(journal: &Journal<S>) -> anyhow::Result<String> {
    let history = journal.history()?;
    if history.is_empty() {
        return Ok("Nenhuma leitura registrada.".to_string());
    }
    let mut lines = Vec::new();
    for r in &history {
        lines.push(format!(
            "{}  {}  {}: {}",
            r.id,
            stamp(r.timestamp),
            r.portal_name,
            preview(&r.response, 60)
        ));
        if let Some(notes) = &r.notes {
            lines.push(format!("    nota: {notes}"));
        }
    }
    Ok(lines.join("\n"))
}

pub fn history_add<S: KeyValueStore>(
    journal: &mut Journal<S>,
    portal_id: &str,
    input: Option<String>,
    response: &str,
    links: &[GroundingLink],
) -> anyhow::Result<String> {
    let portal = find_portal(portal_id).with_context(|| format!("Unknown portal '{portal_id}'"))?;
    let answer = Consultation::Portal.settle(Ok::<_, Infallible>(Some(response.trim().to_string())));
    let reading = Reading::new(portal.id, portal.title, input, with_grounding_links(answer, links));
    let id = reading.id.clone();
    journal.save_reading(reading)?;
    Ok(id)
}

pub fn history_note<S: KeyValueStore>(journal: &mut Journal<S>, id: &str, text: &str) -> anyhow::Result<String> {
    let reading = journal.set_reading_notes(id, text)?;
    Ok(match reading.notes {
        Some(_) => format!("Nota salva em {}.", reading.id),
        None => format!("Nota removida de {}.", reading.id),
    })
}

pub fn history_clear<S: KeyValueStore>(journal: &mut Journal<S>) -> anyhow::Result<String> {
    journal.clear()?;
    Ok("Perfil e histórico apagados. O altar foi preservado.".to_string())
}

pub fn altar_list<S: KeyValueStore>(journal: &Journal<S>) -> anyhow::Result<String> {
    let items = journal.altar()?;
    if items.is_empty() {
        return Ok("O altar está vazio.".to_string());
    }
    Ok(items
        .iter()
        .map(|i| format!("{}  {}  {}: {}", i.id, stamp(i.timestamp), i.name, preview(&i.description, 60)))
        .collect::<Vec<_>>()
        .join("\n"))
}

pub fn altar_add<S: KeyValueStore>(
    journal: &mut Journal<S>,
    name: &str,
    description: &str,
    image_url: Option<String>,
) -> anyhow::Result<String> {
    let item = AltarItem::new(name, description, image_url);
    let id = item.id.clone();
    journal.add_altar_item(item)?;
    Ok(id)
}

pub fn altar_remove<S: KeyValueStore>(journal: &mut Journal<S>, id: &str) -> anyhow::Result<String> {
    if journal.remove_altar_item(id)? {
        Ok(format!("{id} removido do altar."))
    } else {
        anyhow::bail!("No altar item with id {id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oraculo_journal::MemoryStore;

    fn settings() -> OraculoSettings {
        OraculoSettings::default()
    }

    #[test]
    fn test_calculator_lines() {
        assert_eq!(sign("1987-03-21").unwrap(), "Signo: Áries");
        assert_eq!(sign("").unwrap(), "Signo: Desconhecido");
        assert!(sign("1987/03/21").is_err());
        assert_eq!(life_path("1987-03-21").unwrap(), "Caminho de Vida: 4");
        assert!(kin("2024-01-01", false).unwrap().starts_with("Kin 73: Caminhante do Céu Galáctico Vermelho"));
        assert_eq!(kin("", false).unwrap(), "Kin: Desconhecido");
    }

    #[test]
    fn test_kin_json() {
        let out = kin("2024-01-01", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["kinNumber"], 73);

        let out = kin("", true).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&out).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_moon_line() {
        let at = Utc.with_ymd_and_hms(2024, 4, 23, 23, 49, 0).unwrap();
        assert!(moon(at).starts_with("Lua Cheia (Full Moon)"));
    }

    #[test]
    fn test_portals_marks_boosted() {
        let out = portals(MoonPhase::NewMoon);
        let line = out.lines().find(|l| l.trim_start().starts_with("intencao")).unwrap();
        assert!(line.ends_with('☾'));
        let line = out.lines().find(|l| l.trim_start().starts_with("tarot")).unwrap();
        assert!(!line.ends_with('☾'));
    }

    #[test]
    fn test_prompt_needs_profile() {
        let journal = Journal::new(MemoryStore::new());
        let request = PromptRequest { portal: "oraculo", input: None, follow_up: None, image: None, json: false };
        assert!(prompt(&journal, &settings(), request, MoonPhase::NewMoon).is_err());
    }

    #[test]
    fn test_profile_then_prompt_then_follow_up() {
        let mut journal = Journal::new(MemoryStore::new());
        profile_set(&mut journal, "Ana", "clareza", Some("1987-03-21".into())).unwrap();
        assert!(profile_show(&journal).unwrap().contains("Signo: Áries"));

        let request = PromptRequest { portal: "mapa", input: None, follow_up: None, image: None, json: false };
        let out = prompt(&journal, &settings(), request, MoonPhase::FullMoon).unwrap();
        assert!(out.contains("Lua Atual: Lua Cheia."));
        assert!(out.contains("Caminho de Vida: 4"));

        let id = history_add(&mut journal, "mapa", None, "Sua missão é o fogo.", &[]).unwrap();
        let request = PromptRequest {
            portal: "mapa",
            input: Some("E o amor?"),
            follow_up: Some(id.as_str()),
            image: None,
            json: true,
        };
        let out = prompt(&journal, &settings(), request, MoonPhase::FullMoon).unwrap();
        assert!(out.contains("Sua missão é o fogo."));
        assert!(out.contains("systemInstruction"));
    }

    #[test]
    fn test_profile_set_rejects_bad_birth_date() {
        let mut journal = Journal::new(MemoryStore::new());
        assert!(profile_set(&mut journal, "Ana", "paz", Some("ontem".into())).is_err());
        assert!(journal.profile().unwrap().is_none());
    }

    #[test]
    fn test_tarot_prompt_resolves_card() {
        let mut journal = Journal::new(MemoryStore::new());
        profile_set(&mut journal, "Ana", "paz", None).unwrap();
        let request = PromptRequest { portal: "tarot", input: Some("a estrela"), follow_up: None, image: None, json: false };
        let out = prompt(&journal, &settings(), request, MoonPhase::FullMoon).unwrap();
        assert!(out.contains("\"A Estrela\""));

        let request = PromptRequest { portal: "tarot", input: Some("O Bobo"), follow_up: None, image: None, json: false };
        assert!(prompt(&journal, &settings(), request, MoonPhase::FullMoon).is_err());
    }

    #[test]
    fn test_history_and_altar_commands() {
        let mut journal = Journal::new(MemoryStore::new());
        assert_eq!(history_list(&journal).unwrap(), "Nenhuma leitura registrada.");
        let id = history_add(&mut journal, "sonhos", Some("um rio".into()), "\nÁgua que corre.\n", &[]).unwrap();
        history_note(&mut journal, &id, "lembrei da infância").unwrap();
        let listed = history_list(&journal).unwrap();
        assert!(listed.contains("Sonhos: Água que corre."));
        assert!(listed.contains("nota: lembrei da infância"));
        assert!(history_add(&mut journal, "nada", None, "x", &[]).is_err());

        let item = altar_add(&mut journal, "A Lua", "intuição", None).unwrap();
        assert!(altar_list(&journal).unwrap().contains("A Lua"));
        history_clear(&mut journal).unwrap();
        assert!(altar_list(&journal).unwrap().contains("A Lua"));
        altar_remove(&mut journal, &item).unwrap();
        assert!(altar_remove(&mut journal, &item).is_err());
    }

    #[test]
    fn test_seeded_tarot_is_stable() {
        assert_eq!(tarot(Some(3)), tarot(Some(3)));
    }

    #[test]
    fn test_visao_prompt_with_image() {
        let mut journal = Journal::new(MemoryStore::new());
        profile_set(&mut journal, "Ana", "paz", None).unwrap();
        let request = PromptRequest {
            portal: "visao",
            input: Some("o que vês?"),
            follow_up: None,
            image: Some("data:image/webp;base64,UklGRg=="),
            json: true,
        };
        let out = prompt(&journal, &settings(), request, MoonPhase::FullMoon).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["image"]["data"], "UklGRg==");
        assert!(!value["text"].as_str().unwrap().contains("UklGRg"));

        let request = PromptRequest {
            portal: "oraculo",
            input: None,
            follow_up: None,
            image: Some("UklGRg=="),
            json: false,
        };
        assert!(prompt(&journal, &settings(), request, MoonPhase::FullMoon).is_err());
    }

    #[test]
    fn test_history_add_settles_blank_answers_and_links() {
        let mut journal = Journal::new(MemoryStore::new());
        let id = history_add(&mut journal, "oraculo", None, "  \n", &[]).unwrap();
        let reading = journal.find_reading(&id).unwrap().unwrap();
        assert_eq!(reading.response, oraculo_portals::fallback::ORACLE_SILENT);

        let link = parse_link("Templo do Sol = https://templo.example").unwrap();
        assert_eq!(link.title, "Templo do Sol");
        assert!(parse_link("sem-separador").is_err());
        let id = history_add(&mut journal, "peregrinacao", None, "Caminhe ao norte.", &[link]).unwrap();
        let reading = journal.find_reading(&id).unwrap().unwrap();
        assert!(reading.response.starts_with("Caminhe ao norte."));
        assert!(reading.response.contains("• [Templo do Sol](https://templo.example)"));
    }

    #[test]
    fn test_auxiliary_commands() {
        assert!(universe("Qual meu caminho?", None).unwrap().contains("Contexto: Neutro."));
        assert!(universe("Qual meu caminho?", Some("Ansioso")).unwrap().contains("Contexto: Ansioso."));
        assert!(universe("  ", None).is_err());
        assert!(meditate("cansaço").unwrap().contains("\"cansaço\""));
        assert!(mystic_image("um lobo de luz").unwrap().ends_with("Prompt: um lobo de luz"));

        let mut journal = Journal::new(MemoryStore::new());
        assert!(daily(&journal).is_err());
        profile_set(&mut journal, "Ana", "paz", None).unwrap();
        assert!(daily(&journal).unwrap().contains("inspiradora para Ana."));
    }
}
