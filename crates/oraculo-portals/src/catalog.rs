//! The fixed set of portals a seeker can open.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PortalCategory {
    Presence,
    Subtle,
    Deep,
}

impl PortalCategory {
    pub const ALL: [PortalCategory; 3] = [
        PortalCategory::Presence,
        PortalCategory::Subtle,
        PortalCategory::Deep,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PortalCategory::Presence => "Presença",
            PortalCategory::Subtle => "Sintonias Sutis",
            PortalCategory::Deep => "Grandes Portais",
        }
    }
}

impl fmt::Display for PortalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a portal asks of the seeker before it answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    None,
    Text,
    Selection,
    Date,
    Image,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: PortalCategory,
    pub input_type: InputType,
    pub options: &'static [&'static str],
    pub prompt_context: &'static str,
}

impl Portal {
    pub fn accepts_input(&self) -> bool {
        self.input_type != InputType::None
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.description)
    }
}

const PTBR: &str = "Português Brasileiro padrão, culto e sem erros de ortografia.";

pub const PORTALS: &[Portal] = &[
    Portal {
        id: "sombra",
        title: "Sombra",
        description: "Integre o que está oculto.",
        category: PortalCategory::Presence,
        input_type: InputType::None,
        options: &[],
        prompt_context: "O usuário busca iluminar uma sombra. Faça uma pergunta profunda e retórica sobre um padrão oculto comum (medo, controle, ego) e ofereça um insight de acolhimento. Curto e penetrante.",
    },
    Portal {
        id: "vibracao",
        title: "Vibração",
        description: "A tradução do seu sentir.",
        category: PortalCategory::Presence,
        input_type: InputType::Selection,
        options: &[
            "Ansioso",
            "Sereno",
            "Confuso",
            "Eufórico",
            "Cansado",
            "Esperançoso",
            "Melancólico",
        ],
        prompt_context: "O usuário informou este estado emocional. Traduza isso em linguagem simbólica/mística (ex: tempestade, lago calmo) e sugira um micro-ajuste de postura ou respiração.",
    },
    Portal {
        id: "chakra",
        title: "Chakra",
        description: "A geometria do corpo sutil.",
        category: PortalCategory::Presence,
        input_type: InputType::Selection,
        options: &[
            "Raiz (Muladhara)",
            "Sacro (Swadhisthana)",
            "Plexo Solar (Manipura)",
            "Coração (Anahata)",
            "Garganta (Vishuddha)",
            "Terceiro Olho (Ajna)",
            "Coroa (Sahasrara)",
        ],
        prompt_context: "O usuário foca neste Chakra. Explique brevemente o significado emocional e sugira uma visualização de cor ou afirmação simples.",
    },
    Portal {
        id: "oraculo",
        title: "Oráculo",
        description: "Sincronicidade imediata.",
        category: PortalCategory::Subtle,
        input_type: InputType::None,
        options: &[],
        prompt_context: "Entregue uma mensagem oracular curta, poética e sincrônica para o momento presente. Sem perguntas.",
    },
    Portal {
        id: "sonhos",
        title: "Sonhos",
        description: "O teatro do inconsciente.",
        category: PortalCategory::Subtle,
        input_type: InputType::Text,
        options: &[],
        prompt_context: "O usuário descreve um sonho. Atue como um analista de sonhos Junguiano e místico. Identifique 1 ou 2 arquétipos centrais no relato e explique o que eles podem estar tentando comunicar à consciência do usuário. Não seja literal, seja simbólico.",
    },
    Portal {
        id: "intencao",
        title: "Intenção",
        description: "O poder do decreto.",
        category: PortalCategory::Subtle,
        input_type: InputType::Text,
        options: &[],
        prompt_context: "O usuário definiu uma intenção. Reflita essa intenção de volta como um espelho sagrado, potencializando-a com palavras de poder.",
    },
    Portal {
        id: "elemento",
        title: "Elemento",
        description: "A alquimia da sua alma.",
        category: PortalCategory::Subtle,
        input_type: InputType::Selection,
        options: &["Fogo", "Água", "Terra", "Ar", "Éter"],
        prompt_context: "O usuário escolheu este elemento (Fogo, Água, Terra, Ar ou Éter). 1. Identifique qual elemento foi escolhido. 2. Explique o poder místico desse elemento. 3. Dê um conselho prático baseado na natureza desse elemento para o momento atual do usuário.",
    },
    Portal {
        id: "ciclo",
        title: "Ciclo",
        description: "O pulso do seu momento.",
        category: PortalCategory::Subtle,
        input_type: InputType::None,
        options: &[],
        prompt_context: "Intuitivamente, identifique se é momento de Início, Meio ou Fim. Dê uma orientação breve sobre a natureza deste ponto do ciclo.",
    },
    Portal {
        id: "tzolkin",
        title: "Tzolkin",
        description: "O código do tempo sagrado.",
        category: PortalCategory::Deep,
        input_type: InputType::Date,
        options: &[],
        prompt_context: include_str!("../prompts/tzolkin.md"),
    },
    Portal {
        id: "semente_estelar",
        title: "Semente Estelar",
        description: "Ecos de sua origem cósmica.",
        category: PortalCategory::Deep,
        input_type: InputType::Selection,
        options: &[
            "Sinto uma saudade profunda de um lar que não lembro",
            "Minha missão é trazer cura e amor para a Terra",
            "Busco entender a estrutura lógica e tecnológica do universo",
            "Sinto-me um guerreiro da verdade e da justiça",
            "Sou um observador, me sinto desconectado do drama humano",
            "Tenho memórias de civilizações antigas (Atlântida/Lemúria)",
            "Sinto que minha liberdade é o bem mais precioso",
            "Sinto-me deslocado, como se não fosse daqui",
        ],
        prompt_context: include_str!("../prompts/semente_estelar.md"),
    },
    Portal {
        id: "peregrinacao",
        title: "Peregrinação",
        description: "Solos de poder ao redor.",
        category: PortalCategory::Deep,
        input_type: InputType::Location,
        options: &[],
        prompt_context: include_str!("../prompts/peregrinacao.md"),
    },
    Portal {
        id: "visao",
        title: "Visão",
        description: "Decifre o simbolismo visual.",
        category: PortalCategory::Deep,
        input_type: InputType::Image,
        options: &[],
        prompt_context: "O usuário enviou uma imagem. Analise a imagem visualmente. Descreva a energia que ela emana. Se for uma palma da mão, faça uma leitura quiromântica breve das linhas visíveis. Se for uma paisagem ou objeto, leia o simbolismo, as cores e a luz como um presságio. Conecte o que você vê com a jornada espiritual do usuário.",
    },
    Portal {
        id: "tarot",
        title: "Tarot",
        description: "O espelho dos arquétipos.",
        category: PortalCategory::Deep,
        input_type: InputType::Selection,
        options: &[
            crate::tarot::RANDOM_DRAW,
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
        prompt_context: include_str!("../prompts/tarot.md"),
    },
    Portal {
        id: "mapa",
        title: "Mapa",
        description: "A cartografia do destino.",
        category: PortalCategory::Deep,
        input_type: InputType::None,
        options: &[],
        prompt_context: "Faça uma leitura simbólica do Mapa Natal baseada nos DADOS ASTRAIS fornecidos no contexto. Comece com uma saudação formal e correta (Ex: \"Saudações, [Nome]\"). Mencione explicitamente o Signo Solar e o Número de Caminho de Vida que foram pré-calculados. Descreva a \"missão de alma\" baseada na união desse signo com essa vibração numérica, e comente sobre o terreno atual da vida.",
    },
    Portal {
        id: "numeros",
        title: "Números",
        description: "Códigos divinos da existência.",
        category: PortalCategory::Deep,
        input_type: InputType::None,
        options: &[],
        prompt_context: "Calcule o \"Número do Momento\" baseado na data de hoje e na vibração do nome do usuário. Explique o arquétipo desse número e sua mensagem para o usuário hoje. Dê ênfase ao misticismo.",
    },
];

/// Language rule appended to every portal directive.
pub fn language_rule() -> &'static str {
    PTBR
}

pub fn find_portal(id: &str) -> Option<&'static Portal> {
    let id = id.trim();
    PORTALS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

pub fn portals_in(category: PortalCategory) -> impl Iterator<Item = &'static Portal> {
    PORTALS.iter().filter(move |p| p.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = PORTALS.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), PORTALS.len());
        assert_eq!(PORTALS.len(), 15);
    }

    #[test]
    fn test_selection_portals_have_options() {
        for portal in PORTALS {
            match portal.input_type {
                InputType::Selection => assert!(!portal.options.is_empty(), "{}", portal.id),
                _ => assert!(portal.options.is_empty(), "{}", portal.id),
            }
        }
    }

    #[test]
    fn test_category_split() {
        assert_eq!(portals_in(PortalCategory::Presence).count(), 3);
        assert_eq!(portals_in(PortalCategory::Subtle).count(), 5);
        assert_eq!(portals_in(PortalCategory::Deep).count(), 7);
    }

    #[test]
    fn test_find_portal() {
        assert_eq!(find_portal("TZOLKIN").map(|p| p.title), Some("Tzolkin"));
        assert!(find_portal("astrologia").is_none());
    }
}
