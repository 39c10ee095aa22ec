use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::anchor::{resolve_anchor, AnchorCandidates};
use crate::calendar::parse_optional;
use crate::error::ReproResult;
use crate::models::{
    AnchorMode, Confidence, CycleHistoryEntry, CycleSource, OvulationMethod, ReproSummary,
    StageRange, Timeline,
};
use crate::species::SpeciesProfile;
use crate::timeline::{build_timeline, build_timeline_from_seed, merge_timelines};

/// Breeding-plan fields as the host sends them. Dates are raw `YYYY-MM-DD`
/// strings; blank strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BreedingPlanInput {
    pub id: Option<Uuid>,
    pub species: Option<String>,
    pub dob: Option<String>,
    pub repro_anchor_mode: Option<String>,
    pub ovulation_confirmed: Option<String>,
    pub ovulation_confirmed_method: Option<String>,
    pub cycle_start_date_actual: Option<String>,
    pub breed_date_actual: Option<String>,
    pub birth_date_actual: Option<String>,
    pub locked_cycle_start: Option<String>,
    pub locked_ovulation_date: Option<String>,
    pub earliest_cycle_start: Option<String>,
    pub latest_cycle_start: Option<String>,
}

impl BreedingPlanInput {
    pub fn anchor_candidates(&self, has_hormone_history: bool) -> ReproResult<AnchorCandidates> {
        Ok(AnchorCandidates {
            birth_date_actual: parse_optional(self.birth_date_actual.as_deref())?,
            ovulation_confirmed: parse_optional(self.ovulation_confirmed.as_deref())?,
            ovulation_method: self
                .ovulation_confirmed_method
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .map(OvulationMethod::parse),
            locked_ovulation_date: parse_optional(self.locked_ovulation_date.as_deref())?,
            breeding_date_actual: parse_optional(self.breed_date_actual.as_deref())?,
            cycle_start_date: parse_optional(self.cycle_start_date_actual.as_deref())?,
            locked_cycle_start: parse_optional(self.locked_cycle_start.as_deref())?,
            repro_anchor_mode: self.repro_anchor_mode.as_deref().and_then(AnchorMode::parse),
            has_hormone_history,
        })
    }

    /// Per-animal context for this plan's dam.
    pub fn summary(&self, today: NaiveDate, history: &[CycleHistoryEntry]) -> ReproResult<ReproSummary> {
        let mut summary = ReproSummary::new(self.species.clone().unwrap_or_default(), today);
        summary.dob = parse_optional(self.dob.as_deref())?;
        summary.cycle_start_dates = history.iter().map(|e| e.cycle_start).collect();
        summary.cycle_start_dates.sort();
        summary.ovulation_history = history.to_vec();
        Ok(summary)
    }
}

/// Flat output consumed by rollup views and badges.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanWindows {
    pub pre_breeding_full: StageRange,
    pub pre_breeding_likely: StageRange,
    pub hormone_testing_full: StageRange,
    pub hormone_testing_likely: StageRange,
    pub breeding_full: StageRange,
    pub breeding_likely: StageRange,
    pub birth_full: StageRange,
    pub birth_likely: StageRange,
    pub post_birth_care_full: StageRange,
    pub post_birth_care_likely: StageRange,
    pub placement_normal_full: StageRange,
    pub placement_normal_likely: StageRange,
    pub placement_extended_full: StageRange,
    pub placement_extended_likely: StageRange,

    pub cycle_start: NaiveDate,
    pub ovulation: NaiveDate,
    pub ovulation_confirmed: Option<NaiveDate>,
    pub birth_expected: Option<NaiveDate>,
    pub placement_start_expected: NaiveDate,
    pub placement_completed_expected: NaiveDate,
    pub placement_extended_end_expected: NaiveDate,

    pub anchor_mode: Option<AnchorMode>,
    pub confidence: Option<Confidence>,
}

impl From<&Timeline> for PlanWindows {
    fn from(t: &Timeline) -> Self {
        Self {
            pre_breeding_full: t.pre_breeding.full,
            pre_breeding_likely: t.pre_breeding.likely,
            hormone_testing_full: t.hormone_testing.full,
            hormone_testing_likely: t.hormone_testing.likely,
            breeding_full: t.breeding.full,
            breeding_likely: t.breeding.likely,
            birth_full: t.birth.full,
            birth_likely: t.birth.likely,
            post_birth_care_full: t.post_birth_care.full,
            post_birth_care_likely: t.post_birth_care.likely,
            placement_normal_full: t.placement_normal.full,
            placement_normal_likely: t.placement_normal.likely,
            placement_extended_full: t.placement_extended.full,
            placement_extended_likely: t.placement_extended.likely,
            cycle_start: t.milestones.cycle_start,
            ovulation: t.milestones.ovulation,
            ovulation_confirmed: t.milestones.ovulation_confirmed,
            birth_expected: t.milestones.birth_expected,
            placement_start_expected: t.milestones.placement_start_expected,
            placement_completed_expected: t.milestones.placement_completed_expected,
            placement_extended_end_expected: t.milestones.placement_extended_end_expected,
            anchor_mode: t.explain.anchor_mode,
            confidence: t.explain.confidence,
        }
    }
}

/// Resolves the plan's anchor and builds its timeline.
///
/// Without an anchor, falls back to range planning over the plan's
/// earliest/latest cycle-start guesses. With neither, returns `None`; no date
/// is ever invented.
pub fn plan_timeline(
    plan: &BreedingPlanInput,
    summary: &ReproSummary,
    profile: &SpeciesProfile,
) -> ReproResult<Option<Timeline>> {
    let has_hormone_history = summary
        .ovulation_history
        .iter()
        .any(|e| e.source == CycleSource::HormoneTest);
    let candidates = plan.anchor_candidates(has_hormone_history)?;

    if let Some(anchor) = resolve_anchor(&candidates) {
        return Ok(Some(build_timeline(summary, profile, &anchor)));
    }

    let earliest = parse_optional(plan.earliest_cycle_start.as_deref())?;
    let latest = parse_optional(plan.latest_cycle_start.as_deref())?;
    let timeline = match (earliest, latest) {
        (Some(a), Some(b)) => {
            let early = build_timeline_from_seed(summary, profile, a.min(b));
            let late = build_timeline_from_seed(summary, profile, a.max(b));
            Some(merge_timelines(&early, &late))
        }
        (Some(seed), None) | (None, Some(seed)) => {
            Some(build_timeline_from_seed(summary, profile, seed))
        }
        (None, None) => None,
    };
    Ok(timeline)
}

pub fn plan_windows(
    plan: &BreedingPlanInput,
    summary: &ReproSummary,
    profile: &SpeciesProfile,
) -> ReproResult<Option<PlanWindows>> {
    Ok(plan_timeline(plan, summary, profile)?
        .as_ref()
        .map(PlanWindows::from))
}
