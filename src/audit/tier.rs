use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal market segment, 1 (exclusive) .. 5 (base).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("tier must be between 1 and 5, got {0}")]
pub struct InvalidTier(pub u8);

impl Tier {
    pub const ONE: Tier = Tier(1);
    pub const TWO: Tier = Tier(2);
    pub const THREE: Tier = Tier(3);
    pub const FOUR: Tier = Tier(4);
    pub const FIVE: Tier = Tier(5);

    /// Tier used when neither the venue name nor the municipality match.
    pub const DEFAULT: Tier = Tier::FOUR;

    pub fn new(value: u8) -> Result<Self, InvalidTier> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidTier(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn ordered() -> [Self; 5] {
        [Self::ONE, Self::TWO, Self::THREE, Self::FOUR, Self::FIVE]
    }

    pub const fn definition(self) -> TierDefinition {
        match self.0 {
            1 => TierDefinition {
                name: "Exclusivos / Shopping",
                description: "Salones de alto perfil y locales en Shoppings",
            },
            2 => TierDefinition {
                name: "Premium",
                description: "Ubicaciones de alta demanda en CABA y Corredor Norte",
            },
            3 => TierDefinition {
                name: "Media-Alta",
                description: "Polos de crecimiento con valores en ascenso",
            },
            4 => TierDefinition {
                name: "Media",
                description: "Zonas consolidadas con precios estandarizados",
            },
            _ => TierDefinition {
                name: "Base",
                description: "Unidades operativas con menores costos fijos",
            },
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = InvalidTier;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tier::new(value)
    }
}

impl From<Tier> for u8 {
    fn from(value: Tier) -> Self {
        value.0
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tier {}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierDefinition {
    pub name: &'static str,
    pub description: &'static str,
}

// Order matters: earlier keywords win when several appear in the same text.
const TIER_KEYWORDS: &[(&str, Tier)] = &[
    ("sans souci", Tier::ONE),
    ("costanera", Tier::ONE),
    ("alto avellaneda", Tier::ONE),
    ("dot", Tier::ONE),
    ("palermo", Tier::TWO),
    ("belgrano", Tier::TWO),
    ("pilar", Tier::TWO),
    ("recoleta", Tier::TWO),
    ("nunez", Tier::TWO),
    ("canning", Tier::THREE),
    ("hudson", Tier::THREE),
    ("caballito", Tier::THREE),
    ("esteban echeverria", Tier::THREE),
    ("ramos mejia", Tier::FOUR),
    ("san martin", Tier::FOUR),
    ("la plata", Tier::FOUR),
    ("avellaneda", Tier::FOUR),
    ("lanus", Tier::FOUR),
    ("villa luzuriaga", Tier::FIVE),
    ("merlo", Tier::FIVE),
    ("moreno", Tier::FIVE),
    ("gonzalez catan", Tier::FIVE),
];

/// Assign a market tier from the venue's municipality and name.
///
/// The name is only consulted for tier-1 landmarks (shopping centers and
/// flagship halls); the municipality is matched against the full table.
pub fn assign_tier(municipality: Option<&str>, name: &str) -> Tier {
    let name = normalize_place(name);
    if let Some(tier) = TIER_KEYWORDS
        .iter()
        .filter(|(_, tier)| *tier == Tier::ONE)
        .find(|(keyword, _)| contains_phrase(&name, keyword))
        .map(|(_, tier)| *tier)
    {
        return tier;
    }

    municipality
        .map(normalize_place)
        .and_then(|municipality| {
            TIER_KEYWORDS
                .iter()
                .find(|(keyword, _)| contains_phrase(&municipality, keyword))
                .map(|(_, tier)| *tier)
        })
        .unwrap_or(Tier::DEFAULT)
}

/// Lowercase, strip Spanish diacritics, and collapse anything that is not
/// alphanumeric into single spaces.
pub(crate) fn normalize_place(value: &str) -> String {
    let folded: String = value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack
        .match_indices(phrase)
        .any(|(start, matched)| {
            let end = start + matched.len();
            let before_ok = haystack[..start].chars().next_back().map_or(true, |c| c == ' ');
            let after_ok = haystack[end..].chars().next().map_or(true, |c| c == ' ');
            before_ok && after_ok
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_landmarks_take_precedence_over_municipality() {
        assert_eq!(assign_tier(Some("Merlo"), "Salón Sans Souci"), Tier::ONE);
        assert_eq!(assign_tier(Some("Vicente López"), "DOT Baires"), Tier::ONE);
        assert_eq!(
            assign_tier(Some("Avellaneda"), "Janos Alto Avellaneda"),
            Tier::ONE
        );
    }

    #[test]
    fn name_only_matches_tier_one_keywords() {
        assert_eq!(assign_tier(None, "Janos Palermo"), Tier::DEFAULT);
    }

    #[test]
    fn municipality_lookup_covers_each_tier() {
        assert_eq!(assign_tier(Some("Palermo"), "Salón 1"), Tier::TWO);
        assert_eq!(assign_tier(Some("Nuñez"), "Salón 2"), Tier::TWO);
        assert_eq!(assign_tier(Some("  Canning "), "Salón 3"), Tier::THREE);
        assert_eq!(assign_tier(Some("Ramos Mejía"), "Salón 4"), Tier::FOUR);
        assert_eq!(assign_tier(Some("AVELLANEDA"), "Salón 5"), Tier::FOUR);
        assert_eq!(assign_tier(Some("González Catán"), "Salón 6"), Tier::FIVE);
    }

    #[test]
    fn unmatched_input_defaults_to_tier_four() {
        assert_eq!(assign_tier(Some("Rosario"), "Salón Centro"), Tier::DEFAULT);
        assert_eq!(assign_tier(None, ""), Tier::DEFAULT);
    }

    #[test]
    fn keywords_must_fall_on_word_boundaries() {
        assert_eq!(assign_tier(None, "Anecdota Eventos"), Tier::DEFAULT);
        assert_eq!(assign_tier(Some("Pilarica"), "Salón"), Tier::DEFAULT);
    }

    #[test]
    fn classification_is_stable_across_calls() {
        let first = assign_tier(Some("Hudson"), "Quinta Hudson");
        for _ in 0..10 {
            assert_eq!(assign_tier(Some("Hudson"), "Quinta Hudson"), first);
        }
    }

    #[test]
    fn tier_construction_rejects_out_of_range_values() {
        assert_eq!(Tier::new(0), Err(InvalidTier(0)));
        assert_eq!(Tier::new(6), Err(InvalidTier(6)));
        assert_eq!(Tier::new(3).map(Tier::get), Ok(3));
        assert!(serde_json::from_str::<Tier>("9").is_err());
        assert_eq!(serde_json::from_str::<Tier>("2").ok(), Some(Tier::TWO));
    }

    #[test]
    fn definitions_exist_for_every_tier() {
        assert_eq!(Tier::ONE.definition().name, "Exclusivos / Shopping");
        assert_eq!(Tier::FIVE.definition().name, "Base");
        assert!(Tier::ordered()
            .iter()
            .all(|tier| !tier.definition().description.is_empty()));
    }
}
