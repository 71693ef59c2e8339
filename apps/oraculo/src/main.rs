mod commands;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Oráculo 7: calculadoras místicas e portais")]
struct Args {
    /// Config file (otherwise configs/oraculo.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the journal directory from the config.
    #[arg(long, global = true)]
    journal_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solar sign for a YYYY-MM-DD date.
    Sign { date: String },
    /// Life path number for a YYYY-MM-DD date.
    LifePath { date: String },
    /// Tzolkin kin for a YYYY-MM-DD date.
    Kin {
        date: String,
        #[arg(long)]
        json: bool,
    },
    /// Moon phase now or at an RFC 3339 instant.
    Moon {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Planetary positions from the Swiss Ephemeris.
    Sky {
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Ephemeris data directory (overrides config and SWISS_EPHEMERIS_PATH).
        #[arg(long)]
        ephemeris: Option<PathBuf>,
    },
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Portal catalog, marking the ones the current moon favours.
    Portals,
    /// Compose the prompt a portal would send.
    Prompt {
        portal: String,
        #[arg(long)]
        input: Option<String>,
        /// Ask about a saved reading instead of opening the portal afresh.
        #[arg(long, value_name = "READING_ID")]
        follow_up: Option<String>,
        /// Text file holding the image as a data URL or bare base64.
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Compose a Metatron prompt over the recent history.
    Metatron { mode: oraculo_portals::MetatronMode },
    /// Compose a question to the Universe.
    Universe {
        question: String,
        /// How the seeker feels right now.
        #[arg(long)]
        state: Option<String>,
    },
    /// Compose a guided meditation request.
    Meditate { feeling: String },
    /// Compose the daily phrase request for the saved profile.
    Daily,
    /// Compose an image generation prompt.
    MysticImage { subject: String },
    /// Draw a tarot card.
    Tarot {
        /// Fixed seed for a reproducible draw.
        #[arg(long)]
        seed: Option<u64>,
    },
    #[command(subcommand)]
    History(HistoryCommand),
    #[command(subcommand)]
    Altar(AltarCommand),
    /// Print a response file as it would be spoken.
    Speech { file: PathBuf },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Set {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quest: String,
        #[arg(long)]
        birth_date: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    List,
    /// Save a backend answer as a reading.
    Add {
        portal: String,
        /// File holding the oracle's answer.
        response_file: PathBuf,
        #[arg(long)]
        input: Option<String>,
        /// Source cited by the answer, as TITLE=URI. Repeatable.
        #[arg(long = "link", value_name = "TITLE=URI", value_parser = commands::parse_link)]
        links: Vec<oraculo_portals::GroundingLink>,
    },
    Note { id: String, text: String },
    /// Forget the profile and the history. The altar is kept.
    Clear,
}

#[derive(Subcommand, Debug)]
enum AltarCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        image_url: Option<String>,
    },
    Remove { id: String },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = oraculo_config::load_settings(args.config.as_deref())?;
    if let Some(dir) = args.journal_dir {
        settings.journal_dir = dir;
    }
    log::debug!("journal dir: {}", settings.journal_dir.display());

    let out = match args.command {
        Command::Sign { date } => commands::sign(&date)?,
        Command::LifePath { date } => commands::life_path(&date)?,
        Command::Kin { date, json } => commands::kin(&date, json)?,
        Command::Moon { at } => commands::moon(at.unwrap_or_else(Utc::now)),
        Command::Sky { at, ephemeris } => {
            let path = ephemeris.or_else(|| settings.ephemeris_path.clone());
            commands::sky(path, at.unwrap_or_else(Utc::now))?
        }
        Command::Profile(ProfileCommand::Show) => commands::profile_show(&commands::journal(&settings))?,
        Command::Profile(ProfileCommand::Set {
            name,
            quest,
            birth_date,
        }) => commands::profile_set(&mut commands::journal(&settings), &name, &quest, birth_date)?,
        Command::Portals => commands::portals(oraculo::current_moon_phase()),
        Command::Prompt {
            portal,
            input,
            follow_up,
            image,
            json,
        } => {
            let image = match image {
                Some(file) => Some(
                    std::fs::read_to_string(&file)
                        .with_context(|| format!("Failed to read {}", file.display()))?,
                ),
                None => None,
            };
            commands::prompt(
                &commands::journal(&settings),
                &settings,
                commands::PromptRequest {
                    portal: &portal,
                    input: input.as_deref(),
                    follow_up: follow_up.as_deref(),
                    image: image.as_deref(),
                    json,
                },
                oraculo::current_moon_phase(),
            )?
        }
        Command::Metatron { mode } => commands::metatron(&commands::journal(&settings), &settings, mode)?,
        Command::Universe { question, state } => commands::universe(&question, state.as_deref())?,
        Command::Meditate { feeling } => commands::meditate(&feeling)?,
        Command::Daily => commands::daily(&commands::journal(&settings))?,
        Command::MysticImage { subject } => commands::mystic_image(&subject)?,
        Command::Tarot { seed } => commands::tarot(seed),
        Command::History(HistoryCommand::List) => commands::history_list(&commands::journal(&settings))?,
        Command::History(HistoryCommand::Add {
            portal,
            response_file,
            input,
            links,
        }) => {
            let response = std::fs::read_to_string(&response_file)
                .with_context(|| format!("Failed to read {}", response_file.display()))?;
            commands::history_add(&mut commands::journal(&settings), &portal, input, &response, &links)?
        }
        Command::History(HistoryCommand::Note { id, text }) => {
            commands::history_note(&mut commands::journal(&settings), &id, &text)?
        }
        Command::History(HistoryCommand::Clear) => commands::history_clear(&mut commands::journal(&settings))?,
        Command::Altar(AltarCommand::List) => commands::altar_list(&commands::journal(&settings))?,
        Command::Altar(AltarCommand::Add {
            name,
            description,
            image_url,
        }) => commands::altar_add(&mut commands::journal(&settings), &name, &description, image_url)?,
        Command::Altar(AltarCommand::Remove { id }) => {
            commands::altar_remove(&mut commands::journal(&settings), &id)?
        }
        Command::Speech { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            oraculo_portals::clean_for_speech(&text)
        }
    };

    println!("{out}");
    Ok(())
}
