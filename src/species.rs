use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Biological constants for one species. All values are in days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub default_cycle_length_days: i64,
    /// Cycle start to expected ovulation.
    pub default_ovulation_offset_days: i64,
    pub gestation_days: i64,
    /// How long before expected ovulation hormone testing should begin.
    pub hormone_testing_lead_days: i64,
    pub post_birth_care_days: i64,
    pub placement_normal_days: i64,
    pub placement_extended_days: i64,
    /// Likely breeding window is ovulation ± this many days.
    pub breeding_window_days: i64,
    /// Likely birth window is expected birth ± this many days.
    pub birth_window_days: i64,
    /// Typical spread of ovulation around the default offset when only the
    /// cycle start is known.
    pub ovulation_spread_days: i64,
    /// Ovulation is triggered by mating, so there is nothing to test for.
    #[serde(default)]
    pub induced_ovulator: bool,
}

pub const DOG: SpeciesProfile = SpeciesProfile {
    default_cycle_length_days: 180,
    default_ovulation_offset_days: 12,
    gestation_days: 63,
    hormone_testing_lead_days: 7,
    post_birth_care_days: 56,
    placement_normal_days: 14,
    placement_extended_days: 28,
    breeding_window_days: 2,
    birth_window_days: 1,
    ovulation_spread_days: 4,
    induced_ovulator: false,
};

pub const CAT: SpeciesProfile = SpeciesProfile {
    default_cycle_length_days: 21,
    default_ovulation_offset_days: 3,
    gestation_days: 64,
    hormone_testing_lead_days: 2,
    post_birth_care_days: 84,
    placement_normal_days: 14,
    placement_extended_days: 28,
    breeding_window_days: 1,
    birth_window_days: 1,
    ovulation_spread_days: 2,
    induced_ovulator: true,
};

pub const HORSE: SpeciesProfile = SpeciesProfile {
    default_cycle_length_days: 21,
    default_ovulation_offset_days: 5,
    gestation_days: 340,
    hormone_testing_lead_days: 3,
    post_birth_care_days: 180,
    placement_normal_days: 30,
    placement_extended_days: 60,
    breeding_window_days: 1,
    birth_window_days: 10,
    ovulation_spread_days: 2,
    induced_ovulator: false,
};

pub const GOAT: SpeciesProfile = SpeciesProfile {
    default_cycle_length_days: 21,
    default_ovulation_offset_days: 2,
    gestation_days: 150,
    hormone_testing_lead_days: 1,
    post_birth_care_days: 60,
    placement_normal_days: 14,
    placement_extended_days: 30,
    breeding_window_days: 1,
    birth_window_days: 1,
    ovulation_spread_days: 1,
    induced_ovulator: false,
};

pub const SHEEP: SpeciesProfile = SpeciesProfile {
    default_cycle_length_days: 17,
    default_ovulation_offset_days: 1,
    gestation_days: 147,
    hormone_testing_lead_days: 1,
    post_birth_care_days: 60,
    placement_normal_days: 14,
    placement_extended_days: 30,
    breeding_window_days: 1,
    birth_window_days: 1,
    ovulation_spread_days: 1,
    induced_ovulator: false,
};

pub const RABBIT: SpeciesProfile = SpeciesProfile {
    default_cycle_length_days: 16,
    default_ovulation_offset_days: 1,
    gestation_days: 31,
    hormone_testing_lead_days: 1,
    post_birth_care_days: 42,
    placement_normal_days: 14,
    placement_extended_days: 14,
    breeding_window_days: 1,
    birth_window_days: 1,
    ovulation_spread_days: 1,
    induced_ovulator: true,
};

/// Profile used for any species string the table does not know.
/// Kennels are the main users, so the canine numbers are the safest default.
pub const FALLBACK: SpeciesProfile = DOG;

const BUILTIN: [(&str, SpeciesProfile); 6] = [
    ("DOG", DOG),
    ("CAT", CAT),
    ("HORSE", HORSE),
    ("GOAT", GOAT),
    ("SHEEP", SHEEP),
    ("RABBIT", RABBIT),
];

/// Normalized lookup key for a species identifier.
pub fn species_key(species: &str) -> String {
    species.trim().to_ascii_uppercase()
}

/// Species code → profile lookup with a fallback for unknown codes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTable {
    profiles: HashMap<String, SpeciesProfile>,
    fallback: SpeciesProfile,
}

impl Default for SpeciesTable {
    fn default() -> Self {
        Self {
            profiles: BUILTIN
                .iter()
                .map(|(code, profile)| (code.to_string(), *profile))
                .collect(),
            fallback: FALLBACK,
        }
    }
}

impl SpeciesTable {
    /// Built-in table with `overrides` replacing or adding profiles.
    pub fn with_overrides(overrides: &HashMap<String, SpeciesProfile>) -> Self {
        let mut table = Self::default();
        for (code, profile) in overrides {
            table.profiles.insert(species_key(code), *profile);
        }
        table
    }

    pub fn is_known(&self, species: &str) -> bool {
        self.profiles.contains_key(&species_key(species))
    }

    /// Never fails: unknown or empty species resolve to the fallback profile
    /// so data entry stays possible for any species string.
    pub fn profile_for(&self, species: &str) -> &SpeciesProfile {
        match self.profiles.get(&species_key(species)) {
            Some(profile) => profile,
            None => {
                tracing::debug!(event = "species.fallback", species = %species);
                &self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let table = SpeciesTable::default();
        assert_eq!(table.profile_for("dog"), &DOG);
        assert_eq!(table.profile_for("  Horse "), &HORSE);
        assert!(table.is_known("cat"));
    }

    #[test]
    fn unknown_species_falls_back() {
        let table = SpeciesTable::default();
        assert!(!table.is_known("ALPACA"));
        assert_eq!(table.profile_for("ALPACA"), &FALLBACK);
        assert_eq!(table.profile_for(""), &FALLBACK);
    }

    #[test]
    fn overrides_replace_and_extend() {
        let mut overrides = HashMap::new();
        overrides.insert(
            "alpaca".to_string(),
            SpeciesProfile {
                gestation_days: 345,
                ..HORSE
            },
        );
        overrides.insert(
            "Dog".to_string(),
            SpeciesProfile {
                default_cycle_length_days: 200,
                ..DOG
            },
        );
        let table = SpeciesTable::with_overrides(&overrides);
        assert_eq!(table.profile_for("ALPACA").gestation_days, 345);
        assert_eq!(table.profile_for("DOG").default_cycle_length_days, 200);
        assert_eq!(table.profile_for("CAT"), &CAT);
    }

    #[test]
    fn testing_never_starts_before_cycle_by_default() {
        for (_, p) in BUILTIN {
            assert!(p.hormone_testing_lead_days <= p.default_ovulation_offset_days);
            assert!(p.default_cycle_length_days > 0);
        }
    }
}
