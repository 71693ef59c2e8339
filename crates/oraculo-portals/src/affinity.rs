use crate::catalog::Portal;
use oraculo::MoonPhase;

const NEW_MOON_PORTALS: &[&str] = &["intencao", "semente_estelar"];
const WAXING_PORTALS: &[&str] = &["elemento", "numeros", "mapa"];
const FULL_MOON_PORTALS: &[&str] = &["tarot", "visao", "vibracao", "chakra"];
const WANING_PORTALS: &[&str] = &["sombra", "sonhos", "peregrinacao"];

/// Portal ids whose energy is amplified under the given phase.
pub fn boosted_portal_ids(phase: MoonPhase) -> &'static [&'static str] {
    match phase {
        MoonPhase::NewMoon => NEW_MOON_PORTALS,
        MoonPhase::FullMoon => FULL_MOON_PORTALS,
        p if p.is_waxing() => WAXING_PORTALS,
        p if p.is_waning() => WANING_PORTALS,
        _ => &[],
    }
}

pub fn moon_affinity(portal_id: &str, phase: MoonPhase) -> bool {
    boosted_portal_ids(phase).contains(&portal_id)
}

pub fn boosted_portals(phase: MoonPhase) -> Vec<&'static Portal> {
    boosted_portal_ids(phase)
        .iter()
        .filter_map(|id| crate::catalog::find_portal(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_boosted_id_exists() {
        for phase in MoonPhase::ALL {
            assert_eq!(
                boosted_portals(phase).len(),
                boosted_portal_ids(phase).len(),
                "{phase}"
            );
        }
    }

    #[test]
    fn test_ciclo_and_oraculo_are_never_boosted() {
        for phase in MoonPhase::ALL {
            assert!(!moon_affinity("ciclo", phase));
            assert!(!moon_affinity("oraculo", phase));
            assert!(!moon_affinity("tzolkin", phase));
        }
    }
}
