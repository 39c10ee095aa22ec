use serde::{Deserialize, Serialize};

use crate::calendar::{add_days, add_months, days_between, max_date, min_date, LocalDate};
use crate::error::{ReproError, ReproResult};
use crate::models::{
    Confidence, CycleAlert, CycleProjection, NextCycleProjection, OvulationWindow,
    ProjectedCycleStart, ReproSummary,
};
use crate::pattern::analyze_pattern;
use crate::species::SpeciesProfile;
use crate::timeline::ovulation_offset_days;

/// Badges light up this many days either side of an expected date.
pub const ATTENTION_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectionOptions {
    pub horizon_months: u32,
    pub max_count: usize,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            horizon_months: 36,
            max_count: 36,
        }
    }
}

/// Individual override if present, else the species default. Must be positive.
pub fn cycle_length_days(summary: &ReproSummary, profile: &SpeciesProfile) -> ReproResult<i64> {
    let days = summary
        .cycle_length_override_days
        .unwrap_or(profile.default_cycle_length_days);
    if days <= 0 {
        return Err(ReproError::InvalidCycleLength { days });
    }
    Ok(days)
}

/// Project future cycle starts from the most recent known start (or from
/// `today` when none is known), one cycle length at a time, until either
/// `max_count` dates exist or the next date passes `today + horizon_months`.
pub fn project_upcoming_cycle_starts(
    summary: &ReproSummary,
    profile: &SpeciesProfile,
    options: ProjectionOptions,
) -> ReproResult<CycleProjection> {
    let length = cycle_length_days(summary, profile)?;
    let horizon = add_months(summary.today, options.horizon_months);
    let origin = summary.last_cycle_start().unwrap_or(summary.today);

    let mut projected = Vec::new();
    let mut next = add_days(origin, length);
    while projected.len() < options.max_count && next <= horizon {
        projected.push(ProjectedCycleStart {
            date: next,
            cycle_number: projected.len() + 1,
            alert: CycleAlert::evaluate(next, summary.today),
        });
        next = add_days(next, length);
    }

    Ok(CycleProjection {
        cycle_length_days: length,
        projected,
    })
}

/// The next heat after the most recent recorded one, with the ovulation
/// window and testing start it implies.
///
/// The projected heat may already lie in the past; [`CycleAlert::evaluate`]
/// reports it as overdue. Returns `None` when no cycle start is on record.
pub fn project_next_cycle(
    summary: &ReproSummary,
    profile: &SpeciesProfile,
) -> ReproResult<Option<NextCycleProjection>> {
    let Some(last) = summary.last_cycle_start() else {
        return Ok(None);
    };
    let heat = add_days(last, cycle_length_days(summary, profile)?);
    let pattern = analyze_pattern(&summary.ovulation_history, profile);

    let window = if profile.induced_ovulator {
        None
    } else {
        let most_likely = add_days(heat, ovulation_offset_days(summary, profile));
        let spread = profile.ovulation_spread_days;
        let (earliest, latest) = match (pattern.is_sufficient(), pattern.min_offset, pattern.max_offset) {
            (true, Some(min), Some(max)) => (add_days(heat, min), add_days(heat, max)),
            _ => (add_days(most_likely, -spread), add_days(most_likely, spread)),
        };
        Some(OvulationWindow {
            earliest: min_date(earliest, most_likely),
            latest: max_date(latest, most_likely),
            most_likely,
        })
    };

    let recommended_testing_start = window.map(|w| {
        max_date(
            heat,
            add_days(w.most_likely, -profile.hormone_testing_lead_days),
        )
    });

    Ok(Some(NextCycleProjection {
        projected_heat_start: heat,
        projected_ovulation_window: window,
        recommended_testing_start,
        confidence: if pattern.is_sufficient() {
            pattern.confidence
        } else {
            Confidence::Low
        },
    }))
}

pub fn is_overdue(days_until_expected: i64) -> bool {
    days_until_expected < 0
}

pub fn needs_attention(days_until_expected: i64) -> bool {
    (-ATTENTION_WINDOW_DAYS..=ATTENTION_WINDOW_DAYS).contains(&days_until_expected)
}

impl CycleAlert {
    pub fn evaluate(expected: LocalDate, today: LocalDate) -> Self {
        let days_until_expected = days_between(today, expected);
        Self {
            days_until_expected,
            is_overdue: is_overdue(days_until_expected),
            needs_attention: needs_attention(days_until_expected),
        }
    }
}
