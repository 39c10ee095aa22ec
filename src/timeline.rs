use chrono::NaiveDate;

use crate::anchor::{Anchor, AnchorSource};
use crate::calendar::{add_days, max_date};
use crate::models::{
    AnchorMode, Confidence, Milestones, Phase, PhaseWindows, ReproSummary, StageRange, Timeline,
    TimelineExplain,
};
use crate::pattern::analyze_pattern;
use crate::species::SpeciesProfile;

/// Days added on both sides of a phase's likely window, before the anchor's
/// own uncertainty. Later phases drift more.
pub fn phase_slop_days(phase: Phase) -> i64 {
    match phase {
        Phase::PreBreeding => 0,
        Phase::HormoneTesting => 1,
        Phase::Breeding => 1,
        Phase::Birth => 1,
        Phase::PostBirthCare => 2,
        Phase::PlacementNormal => 3,
        Phase::PlacementExtended => 3,
    }
}

/// How far the ovulation estimate may sit from the truth for a given anchor.
fn anchor_uncertainty_days(
    mode: Option<AnchorMode>,
    confidence: Option<Confidence>,
    profile: &SpeciesProfile,
) -> i64 {
    match mode {
        Some(AnchorMode::BirthDate) => 0,
        Some(AnchorMode::Ovulation) | Some(AnchorMode::BreedingDate) => match confidence {
            Some(Confidence::High) => 1,
            _ => 2,
        },
        Some(AnchorMode::CycleStart) | None => profile.ovulation_spread_days,
    }
}

/// Cycle start to ovulation for this female: her own average once at least
/// two hormone-confirmed cycles exist, otherwise the species default.
pub fn ovulation_offset_days(summary: &ReproSummary, profile: &SpeciesProfile) -> i64 {
    analyze_pattern(&summary.ovulation_history, profile)
        .individual_offset_days()
        .unwrap_or(profile.default_ovulation_offset_days)
        .max(0)
}

/// Deterministic given the anchor, the species profile and the history in
/// `summary`; `summary.today` is not read.
pub fn build_timeline(summary: &ReproSummary, profile: &SpeciesProfile, anchor: &Anchor) -> Timeline {
    let offset = ovulation_offset_days(summary, profile);

    let (cycle_start, ovulation, birth_actual) = match anchor.mode {
        AnchorMode::BirthDate => {
            let ovulation = add_days(anchor.date, -profile.gestation_days);
            (add_days(ovulation, -offset), ovulation, Some(anchor.date))
        }
        AnchorMode::Ovulation | AnchorMode::BreedingDate => {
            (add_days(anchor.date, -offset), anchor.date, None)
        }
        AnchorMode::CycleStart => (anchor.date, add_days(anchor.date, offset), None),
    };

    let explain = TimelineExplain {
        anchor_mode: Some(anchor.mode),
        confidence: Some(anchor.confidence),
    };
    // A legacy locked ovulation date anchors the plan but is not a confirmation.
    let ovulation_confirmed =
        (anchor.source == AnchorSource::OvulationConfirmed).then_some(ovulation);

    place_phases(profile, cycle_start, ovulation, birth_actual, ovulation_confirmed, explain)
}

/// Timeline from an unconfirmed cycle-start guess. The result carries no
/// anchor mode or confidence.
pub fn build_timeline_from_seed(
    summary: &ReproSummary,
    profile: &SpeciesProfile,
    cycle_start: NaiveDate,
) -> Timeline {
    let ovulation = add_days(cycle_start, ovulation_offset_days(summary, profile));
    place_phases(
        profile,
        cycle_start,
        ovulation,
        None,
        None,
        TimelineExplain::default(),
    )
}

fn place_phases(
    profile: &SpeciesProfile,
    cycle_start: NaiveDate,
    ovulation: NaiveDate,
    birth_actual: Option<NaiveDate>,
    ovulation_confirmed: Option<NaiveDate>,
    explain: TimelineExplain,
) -> Timeline {
    let uncertainty = anchor_uncertainty_days(explain.anchor_mode, explain.confidence, profile);
    let windows = |phase: Phase, likely: StageRange| {
        PhaseWindows::from_likely(likely, phase_slop_days(phase) + uncertainty)
    };

    let testing_start = max_date(
        cycle_start,
        add_days(ovulation, -profile.hormone_testing_lead_days),
    );

    let (birth, birth_radius) = match birth_actual {
        Some(actual) => (actual, 0),
        None => (
            add_days(ovulation, profile.gestation_days),
            profile.birth_window_days,
        ),
    };
    let placement_start = add_days(birth, profile.post_birth_care_days);
    let placement_completed = add_days(placement_start, profile.placement_normal_days);
    let placement_extended_end = add_days(placement_completed, profile.placement_extended_days);

    Timeline {
        pre_breeding: windows(Phase::PreBreeding, StageRange::new(cycle_start, testing_start)),
        hormone_testing: windows(Phase::HormoneTesting, StageRange::new(testing_start, ovulation)),
        breeding: windows(
            Phase::Breeding,
            StageRange::around(ovulation, profile.breeding_window_days),
        ),
        birth: windows(Phase::Birth, StageRange::around(birth, birth_radius)),
        post_birth_care: windows(Phase::PostBirthCare, StageRange::new(birth, placement_start)),
        placement_normal: windows(
            Phase::PlacementNormal,
            StageRange::new(placement_start, placement_completed),
        ),
        placement_extended: windows(
            Phase::PlacementExtended,
            StageRange::new(placement_completed, placement_extended_end),
        ),
        milestones: Milestones {
            cycle_start,
            ovulation,
            ovulation_confirmed,
            birth_expected: Some(birth),
            placement_start_expected: placement_start,
            placement_completed_expected: placement_completed,
            placement_extended_end_expected: placement_extended_end,
        },
        explain,
    }
}

/// Envelope of two timelines: every phase's full and likely ranges become the
/// union of both inputs.
///
/// Milestones and explain metadata are copied from `a` (the earlier seed by
/// convention), so the date ranges commute but the metadata does not.
pub fn merge_timelines(a: &Timeline, b: &Timeline) -> Timeline {
    let mut merged = *a;
    for phase in Phase::ALL {
        *merged.phase_mut(phase) = a.phase(phase).union(b.phase(phase));
    }
    merged
}
