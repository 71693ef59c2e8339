//! Tarot deck: 22 major arcana and four suits of 14.

use lazy_static::lazy_static;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Selection value asking for a random card.
pub const RANDOM_DRAW: &str = "Sorteio Aleatório";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TarotGroup {
    pub name: &'static str,
    pub cards: &'static [&'static str],
}

impl TarotGroup {
    pub fn is_major(&self) -> bool {
        self.cards.len() == 22
    }
}

pub const TAROT_DECK: [TarotGroup; 5] = [
    TarotGroup {
        name: "Arcanos Maiores",
        cards: &[
            "O Louco",
            "O Mago",
            "A Sacerdotisa",
            "A Imperatriz",
            "O Imperador",
            "O Hierofante",
            "Os Enamorados",
            "O Carro",
            "A Força",
            "O Eremita",
            "A Roda da Fortuna",
            "A Justiça",
            "O Enforcado",
            "A Morte",
            "A Temperança",
            "O Diabo",
            "A Torre",
            "A Estrela",
            "A Lua",
            "O Sol",
            "O Julgamento",
            "O Mundo",
        ],
    },
    TarotGroup {
        name: "Paus (Fogo)",
        cards: &[
            "Ás de Paus",
            "Dois de Paus",
            "Três de Paus",
            "Quatro de Paus",
            "Cinco de Paus",
            "Seis de Paus",
            "Sete de Paus",
            "Oito de Paus",
            "Nove de Paus",
            "Dez de Paus",
            "Pajem de Paus",
            "Cavaleiro de Paus",
            "Rainha de Paus",
            "Rei de Paus",
        ],
    },
    TarotGroup {
        name: "Copas (Água)",
        cards: &[
            "Ás de Copas",
            "Dois de Copas",
            "Três de Copas",
            "Quatro de Copas",
            "Cinco de Copas",
            "Seis de Copas",
            "Sete de Copas",
            "Oito de Copas",
            "Nove de Copas",
            "Dez de Copas",
            "Pajem de Copas",
            "Cavaleiro de Copas",
            "Rainha de Copas",
            "Rei de Copas",
        ],
    },
    TarotGroup {
        name: "Espadas (Ar)",
        cards: &[
            "Ás de Espadas",
            "Dois de Espadas",
            "Três de Espadas",
            "Quatro de Espadas",
            "Cinco de Espadas",
            "Seis de Espadas",
            "Sete de Espadas",
            "Oito de Espadas",
            "Nove de Espadas",
            "Dez de Espadas",
            "Pajem de Espadas",
            "Cavaleiro de Espadas",
            "Rainha de Espadas",
            "Rei de Espadas",
        ],
    },
    TarotGroup {
        name: "Ouros (Terra)",
        cards: &[
            "Ás de Ouros",
            "Dois de Ouros",
            "Três de Ouros",
            "Quatro de Ouros",
            "Cinco de Ouros",
            "Seis de Ouros",
            "Sete de Ouros",
            "Oito de Ouros",
            "Nove de Ouros",
            "Dez de Ouros",
            "Pajem de Ouros",
            "Cavaleiro de Ouros",
            "Rainha de Ouros",
            "Rei de Ouros",
        ],
    },
];

lazy_static! {
    /// lowercase card name -> (group index, card index)
    static ref CARD_INDEX: HashMap<String, (usize, usize)> = {
        let mut m = HashMap::new();
        for (g, group) in TAROT_DECK.iter().enumerate() {
            for (c, card) in group.cards.iter().enumerate() {
                m.insert(card.to_lowercase(), (g, c));
            }
        }
        m
    };
}

/// Every card, major arcana first.
pub fn all_cards() -> Vec<&'static str> {
    TAROT_DECK
        .iter()
        .flat_map(|g| g.cards.iter().copied())
        .collect()
}

pub fn deck_size() -> usize {
    TAROT_DECK.iter().map(|g| g.cards.len()).sum()
}

/// Case-insensitive lookup. Returns the card's canonical name and its group.
pub fn find_card(name: &str) -> Option<(&'static str, &'static TarotGroup)> {
    let (g, c) = *CARD_INDEX.get(&name.trim().to_lowercase())?;
    let group = &TAROT_DECK[g];
    Some((group.cards[c], group))
}

/// Card at a position in the flattened deck, wrapping past the end.
pub fn card_at(index: usize) -> &'static str {
    let mut i = index % deck_size();
    for group in TAROT_DECK.iter() {
        if i < group.cards.len() {
            return group.cards[i];
        }
        i -= group.cards.len();
    }
    TAROT_DECK[0].cards[0]
}

pub fn draw_card<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    card_at(rng.gen_range(0..deck_size()))
}

/// Reproducible draw for a given seed.
pub fn draw_card_seeded(seed: u64) -> &'static str {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    draw_card(&mut rng)
}

/// Turn a tarot portal selection into a concrete card.
///
/// Empty input and `RANDOM_DRAW` draw from the deck. A known card name is kept
/// as is; anything else yields `None`.
pub fn resolve_selection<R: Rng + ?Sized>(selection: Option<&str>, rng: &mut R) -> Option<&'static str> {
    match selection.map(str::trim) {
        None | Some("") => Some(draw_card(rng)),
        Some(s) if s.to_lowercase() == RANDOM_DRAW.to_lowercase() => Some(draw_card(rng)),
        Some(s) => find_card(s).map(|(card, _)| card),
    }
}
