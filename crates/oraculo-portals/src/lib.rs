//! Portals of the oracle: the catalog, which portals the moon favours, the
//! tarot deck, prompt composition and text clean-up for speech.

pub mod affinity;
pub mod catalog;
pub mod fallback;
pub mod location;
pub mod prompt;
pub mod speech;
pub mod tarot;

pub use affinity::{boosted_portals, moon_affinity};
pub use catalog::{find_portal, portals_in, InputType, Portal, PortalCategory, PORTALS};
pub use fallback::{Consultation, GroundingLink};
pub use location::{Coordinates, FixedLocation, LocationProvider};
pub use prompt::{metatron_prompt, InlineImage, MetatronMode, OraclePrompt, OraclePromptBuilder};
pub use speech::clean_for_speech;
pub use tarot::{all_cards, draw_card, find_card, TarotGroup, TAROT_DECK};

use oraculo::CalendarError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PromptError {
    #[error("Cannot compute reading data: {0}")]
    Calendar(#[from] CalendarError),
    #[error("Unknown portal: {0}")]
    UnknownPortal(String),
    #[error("A follow-up needs a question about the previous reading")]
    MissingFollowUpQuestion,
    #[error("Unknown Metatron mode: {0}")]
    UnknownMetatronMode(String),
}
