use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AnchorMode, Confidence, OvulationMethod};

/// Every date signal a plan may carry. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorCandidates {
    pub birth_date_actual: Option<NaiveDate>,
    pub ovulation_confirmed: Option<NaiveDate>,
    pub ovulation_method: Option<OvulationMethod>,
    pub locked_ovulation_date: Option<NaiveDate>,
    pub breeding_date_actual: Option<NaiveDate>,
    pub cycle_start_date: Option<NaiveDate>,
    pub locked_cycle_start: Option<NaiveDate>,
    /// Advisory only: a concrete date always wins over this hint.
    pub repro_anchor_mode: Option<AnchorMode>,
    /// The female has hormone-tested cycles on record.
    pub has_hormone_history: bool,
}

/// Which input field supplied the anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorSource {
    BirthDateActual,
    OvulationConfirmed,
    LockedOvulationDate,
    BreedingDateActual,
    CycleStartDate,
    LockedCycleStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub mode: AnchorMode,
    pub date: NaiveDate,
    pub confidence: Confidence,
    pub source: AnchorSource,
}

/// First present signal wins, in this order:
///
/// 1. actual birth date (HIGH)
/// 2. confirmed ovulation, then the legacy locked ovulation date
///    (HIGH with a lab-test method, MEDIUM otherwise)
/// 3. actual breeding date (MEDIUM)
/// 4. cycle start, then the legacy locked cycle start
///    (MEDIUM with hormone-testing history, LOW otherwise)
///
/// Returns `None` when nothing is present; callers must not invent a date.
pub fn resolve_anchor(candidates: &AnchorCandidates) -> Option<Anchor> {
    let anchor = resolve_by_priority(candidates);

    if let (Some(hint), Some(resolved)) = (candidates.repro_anchor_mode, anchor.as_ref()) {
        if hint != resolved.mode {
            tracing::debug!(
                event = "anchor.hint_ignored",
                hint = ?hint,
                resolved = ?resolved.mode,
            );
        }
    }

    anchor
}

fn resolve_by_priority(c: &AnchorCandidates) -> Option<Anchor> {
    if let Some(date) = c.birth_date_actual {
        return Some(Anchor {
            mode: AnchorMode::BirthDate,
            date,
            confidence: Confidence::High,
            source: AnchorSource::BirthDateActual,
        });
    }

    let ovulation = c
        .ovulation_confirmed
        .map(|d| (d, AnchorSource::OvulationConfirmed))
        .or(c
            .locked_ovulation_date
            .map(|d| (d, AnchorSource::LockedOvulationDate)));
    if let Some((date, source)) = ovulation {
        let confidence = match c.ovulation_method {
            Some(method) if method.is_lab_test() => Confidence::High,
            _ => Confidence::Medium,
        };
        return Some(Anchor {
            mode: AnchorMode::Ovulation,
            date,
            confidence,
            source,
        });
    }

    if let Some(date) = c.breeding_date_actual {
        return Some(Anchor {
            mode: AnchorMode::BreedingDate,
            date,
            confidence: Confidence::Medium,
            source: AnchorSource::BreedingDateActual,
        });
    }

    let cycle_start = c
        .cycle_start_date
        .map(|d| (d, AnchorSource::CycleStartDate))
        .or(c
            .locked_cycle_start
            .map(|d| (d, AnchorSource::LockedCycleStart)));
    cycle_start.map(|(date, source)| Anchor {
        mode: AnchorMode::CycleStart,
        date,
        confidence: if c.has_hormone_history {
            Confidence::Medium
        } else {
            Confidence::Low
        },
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn nothing_resolves_to_absent() {
        assert_eq!(resolve_anchor(&AnchorCandidates::default()), None);
    }

    #[test]
    fn hint_alone_does_not_fabricate() {
        let c = AnchorCandidates {
            repro_anchor_mode: Some(AnchorMode::Ovulation),
            has_hormone_history: true,
            ..Default::default()
        };
        assert_eq!(resolve_anchor(&c), None);
    }

    #[test]
    fn birth_beats_everything() {
        let c = AnchorCandidates {
            birth_date_actual: Some(ymd(2024, 3, 16)),
            ovulation_confirmed: Some(ymd(2024, 1, 13)),
            ovulation_method: Some(OvulationMethod::ProgesteroneTest),
            locked_cycle_start: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        let anchor = resolve_anchor(&c).unwrap();
        assert_eq!(anchor.mode, AnchorMode::BirthDate);
        assert_eq!(anchor.date, ymd(2024, 3, 16));
        assert_eq!(anchor.confidence, Confidence::High);
        assert_eq!(anchor.source, AnchorSource::BirthDateActual);
    }

    #[test]
    fn ovulation_confidence_follows_method() {
        let mut c = AnchorCandidates {
            ovulation_confirmed: Some(ymd(2024, 1, 13)),
            ovulation_method: Some(OvulationMethod::LhTest),
            cycle_start_date: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        assert_eq!(resolve_anchor(&c).unwrap().confidence, Confidence::High);

        c.ovulation_method = Some(OvulationMethod::VaginalCytology);
        assert_eq!(resolve_anchor(&c).unwrap().confidence, Confidence::Medium);

        c.ovulation_method = None;
        let anchor = resolve_anchor(&c).unwrap();
        assert_eq!(anchor.mode, AnchorMode::Ovulation);
        assert_eq!(anchor.confidence, Confidence::Medium);
    }

    #[test]
    fn legacy_ovulation_field_is_used() {
        let c = AnchorCandidates {
            locked_ovulation_date: Some(ymd(2024, 1, 14)),
            ..Default::default()
        };
        let anchor = resolve_anchor(&c).unwrap();
        assert_eq!(anchor.mode, AnchorMode::Ovulation);
        assert_eq!(anchor.source, AnchorSource::LockedOvulationDate);
    }

    #[test]
    fn breeding_date_ranks_above_cycle_start() {
        let c = AnchorCandidates {
            breeding_date_actual: Some(ymd(2024, 1, 14)),
            cycle_start_date: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        let anchor = resolve_anchor(&c).unwrap();
        assert_eq!(anchor.mode, AnchorMode::BreedingDate);
        assert_eq!(anchor.confidence, Confidence::Medium);
    }

    #[test]
    fn cycle_start_confidence_depends_on_history() {
        let mut c = AnchorCandidates {
            locked_cycle_start: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        let anchor = resolve_anchor(&c).unwrap();
        assert_eq!(anchor.mode, AnchorMode::CycleStart);
        assert_eq!(anchor.confidence, Confidence::Low);
        assert_eq!(anchor.source, AnchorSource::LockedCycleStart);

        c.has_hormone_history = true;
        assert_eq!(resolve_anchor(&c).unwrap().confidence, Confidence::Medium);
    }

    #[test]
    fn current_cycle_start_wins_over_legacy() {
        let c = AnchorCandidates {
            cycle_start_date: Some(ymd(2024, 2, 1)),
            locked_cycle_start: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        let anchor = resolve_anchor(&c).unwrap();
        assert_eq!(anchor.date, ymd(2024, 2, 1));
        assert_eq!(anchor.source, AnchorSource::CycleStartDate);
    }

    // A concrete date outranks the mode hint: asking for OVULATION with only a
    // cycle start on file still anchors on the cycle start.
    #[test]
    fn concrete_date_outranks_hint() {
        let c = AnchorCandidates {
            repro_anchor_mode: Some(AnchorMode::Ovulation),
            cycle_start_date: Some(ymd(2024, 1, 1)),
            ..Default::default()
        };
        assert_eq!(resolve_anchor(&c).unwrap().mode, AnchorMode::CycleStart);
    }
}
