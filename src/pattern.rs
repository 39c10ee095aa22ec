use uuid::Uuid;

use crate::calendar::{add_days, days_between};
use crate::models::{
    Confidence, CycleHistoryEntry, CycleObservation, CycleSource, OvulationMethod,
    OvulationPattern, PatternClassification,
};
use crate::species::SpeciesProfile;

/// Averages within this many days of the species offset count as average.
pub const AVERAGE_DEAD_ZONE_DAYS: f64 = 1.0;
pub const MIN_PATTERN_SAMPLES: usize = 2;
const HIGH_CONFIDENCE_MIN_CONFIRMED: usize = 3;
const HIGH_CONFIDENCE_MAX_STD_DEV: f64 = 1.5;

pub fn analyze_pattern(history: &[CycleHistoryEntry], profile: &SpeciesProfile) -> OvulationPattern {
    let with_offset: Vec<&CycleHistoryEntry> =
        history.iter().filter(|e| e.offset_days.is_some()).collect();
    let offsets: Vec<f64> = with_offset
        .iter()
        .filter_map(|e| e.offset_days)
        .map(|o| o as f64)
        .collect();

    let sample_size = offsets.len();
    let confirmed_cycles = with_offset
        .iter()
        .filter(|e| e.source == CycleSource::HormoneTest)
        .count();
    let min_offset = with_offset.iter().filter_map(|e| e.offset_days).min();
    let max_offset = with_offset.iter().filter_map(|e| e.offset_days).max();

    if sample_size < MIN_PATTERN_SAMPLES {
        return OvulationPattern {
            sample_size,
            confirmed_cycles,
            avg_offset_days: None,
            std_deviation: None,
            min_offset,
            max_offset,
            classification: PatternClassification::InsufficientData,
            confidence: Confidence::Low,
            guidance: format!(
                "Not enough data yet: record at least {MIN_PATTERN_SAMPLES} cycles with a \
                 confirmed ovulation date to learn this female's pattern."
            ),
        };
    }

    let n = sample_size as f64;
    let (sum, sum_sq) = offsets
        .iter()
        .fold((0.0, 0.0), |(s, sq), o| (s + o, sq + o * o));
    let raw_avg = sum / n;
    // Population variance; rounding can push it a hair below zero.
    let variance = (sum_sq / n - raw_avg * raw_avg).max(0.0);
    let avg = round_tenth(raw_avg);
    let std_dev = round_tenth(variance.sqrt());
    let classification = classify(avg, profile.default_ovulation_offset_days);

    let birth_calculated = with_offset
        .iter()
        .any(|e| e.source == CycleSource::BirthCalculated);
    let confidence = if confirmed_cycles >= HIGH_CONFIDENCE_MIN_CONFIRMED
        && std_dev <= HIGH_CONFIDENCE_MAX_STD_DEV
    {
        Confidence::High
    } else if confirmed_cycles >= MIN_PATTERN_SAMPLES || birth_calculated {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    OvulationPattern {
        sample_size,
        confirmed_cycles,
        avg_offset_days: Some(avg),
        std_deviation: Some(std_dev),
        min_offset,
        max_offset,
        classification,
        confidence,
        guidance: guidance(classification, avg, profile),
    }
}

/// Signed dead-zone comparison against the species offset.
pub fn classify(avg_offset_days: f64, species_offset_days: i64) -> PatternClassification {
    let diff = avg_offset_days - species_offset_days as f64;
    if diff < -AVERAGE_DEAD_ZONE_DAYS {
        PatternClassification::EarlyOvulator
    } else if diff > AVERAGE_DEAD_ZONE_DAYS {
        PatternClassification::LateOvulator
    } else {
        PatternClassification::Average
    }
}

/// Whole-day shift of this female's ovulation against the species offset.
/// The timeline builder and the guidance text both use this number.
pub fn offset_shift_days(avg_offset_days: f64, species_offset_days: i64) -> i64 {
    avg_offset_days.round() as i64 - species_offset_days
}

impl OvulationPattern {
    /// Individual offset to use instead of the species default, once enough
    /// hormone-confirmed cycles are on record.
    pub fn individual_offset_days(&self) -> Option<i64> {
        if self.confirmed_cycles < MIN_PATTERN_SAMPLES {
            return None;
        }
        self.avg_offset_days.map(|avg| avg.round() as i64)
    }

    pub fn is_sufficient(&self) -> bool {
        self.classification != PatternClassification::InsufficientData
    }
}

fn guidance(classification: PatternClassification, avg: f64, profile: &SpeciesProfile) -> String {
    let species_offset = profile.default_ovulation_offset_days;
    let shift = offset_shift_days(avg, species_offset);
    let testing_day = (species_offset + shift - profile.hormone_testing_lead_days).max(0);

    match classification {
        PatternClassification::EarlyOvulator => format!(
            "Ovulates about {} earlier than the breed average (day {avg:.1} vs day {species_offset}). \
             Start hormone testing {} earlier than usual, {} after the cycle starts.",
            days(-shift),
            days(-shift),
            days(testing_day),
        ),
        PatternClassification::LateOvulator => format!(
            "Ovulates about {} later than the breed average (day {avg:.1} vs day {species_offset}). \
             Testing can start {} later than usual, {} after the cycle starts.",
            days(shift),
            days(shift),
            days(testing_day),
        ),
        PatternClassification::Average => format!(
            "Ovulates close to the breed average (day {avg:.1} vs day {species_offset}). \
             Start hormone testing {} after the cycle starts.",
            days(testing_day),
        ),
        PatternClassification::InsufficientData => String::new(),
    }
}

fn days(n: i64) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{n} days")
    }
}

/// Returns a copy of `history` with every variance recomputed against the
/// pattern the history currently yields.
pub fn refresh_variances(
    history: &[CycleHistoryEntry],
    profile: &SpeciesProfile,
) -> Vec<CycleHistoryEntry> {
    let avg = analyze_pattern(history, profile).avg_offset_days;
    history
        .iter()
        .map(|entry| {
            let mut entry = entry.clone();
            entry.variance = match (entry.offset_days, avg) {
                (Some(offset), Some(avg)) => Some(round_tenth(offset as f64 - avg)),
                _ => None,
            };
            entry
        })
        .collect()
}

impl CycleHistoryEntry {
    /// Records a new cycle, deriving offset, source and confidence from the
    /// observation. Variance stays empty until [`refresh_variances`] runs.
    pub fn from_observation(observation: CycleObservation, profile: &SpeciesProfile) -> Self {
        let mut entry = Self {
            id: Uuid::new_v4(),
            cycle_start: observation.cycle_start,
            ovulation: None,
            ovulation_method: None,
            offset_days: None,
            variance: None,
            confidence: Confidence::Low,
            source: CycleSource::Estimated,
            breeding_plan_id: None,
            birth_date: None,
            notes: String::new(),
        };
        entry.apply(observation, profile);
        entry
    }

    /// Replaces the recorded dates. Every derived field is recomputed from the
    /// new inputs alone; the id is kept.
    pub fn correct(&mut self, observation: CycleObservation, profile: &SpeciesProfile) {
        self.apply(observation, profile);
    }

    fn apply(&mut self, obs: CycleObservation, profile: &SpeciesProfile) {
        let (ovulation, method, source, confidence) = match (obs.ovulation, obs.birth_date) {
            (Some(ovulation), _) => {
                let lab = obs.ovulation_method.is_some_and(OvulationMethod::is_lab_test);
                if lab {
                    (Some(ovulation), obs.ovulation_method, CycleSource::HormoneTest, Confidence::High)
                } else {
                    (Some(ovulation), obs.ovulation_method, CycleSource::Estimated, Confidence::Medium)
                }
            }
            (None, Some(birth)) => (
                Some(add_days(birth, -profile.gestation_days)),
                Some(OvulationMethod::Calculated),
                CycleSource::BirthCalculated,
                Confidence::Medium,
            ),
            (None, None) => (None, None, CycleSource::Estimated, Confidence::Low),
        };

        self.cycle_start = obs.cycle_start;
        self.ovulation = ovulation;
        self.ovulation_method = method;
        self.offset_days = ovulation.map(|o| days_between(obs.cycle_start, o));
        self.variance = None;
        self.confidence = confidence;
        self.source = source;
        self.breeding_plan_id = obs.breeding_plan_id;
        self.birth_date = obs.birth_date;
        self.notes = obs.notes;
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
