use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{add_days, LocalDate};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorMode {
    CycleStart,
    Ovulation,
    BreedingDate,
    BirthDate,
}

impl AnchorMode {
    /// Lenient parse of the host's `reproAnchorMode` hint.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CYCLE_START" => Some(AnchorMode::CycleStart),
            "OVULATION" => Some(AnchorMode::Ovulation),
            "BREEDING_DATE" => Some(AnchorMode::BreedingDate),
            "BIRTH_DATE" => Some(AnchorMode::BirthDate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OvulationMethod {
    ProgesteroneTest,
    LhTest,
    Ultrasound,
    VaginalCytology,
    AtHomeTest,
    Calculated,
    Other,
}

impl OvulationMethod {
    /// Unknown method names map to `Other` rather than failing.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "PROGESTERONE_TEST" | "PROGESTERONE" => OvulationMethod::ProgesteroneTest,
            "LH_TEST" | "LH" => OvulationMethod::LhTest,
            "ULTRASOUND" => OvulationMethod::Ultrasound,
            "VAGINAL_CYTOLOGY" | "CYTOLOGY" => OvulationMethod::VaginalCytology,
            "AT_HOME_TEST" => OvulationMethod::AtHomeTest,
            "CALCULATED" => OvulationMethod::Calculated,
            _ => OvulationMethod::Other,
        }
    }

    /// Laboratory-grade confirmation of ovulation.
    pub fn is_lab_test(self) -> bool {
        matches!(
            self,
            OvulationMethod::ProgesteroneTest | OvulationMethod::LhTest | OvulationMethod::Ultrasound
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CycleSource {
    HormoneTest,
    BirthCalculated,
    Estimated,
}

/// Inclusive date window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct StageRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StageRange {
    /// Builds a range from two bounds in either order.
    pub fn new(a: LocalDate, b: LocalDate) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn around(center: LocalDate, radius: i64) -> Self {
        Self::new(add_days(center, -radius), add_days(center, radius))
    }

    /// Pushes both bounds outward by `days`.
    pub fn widen(&self, days: i64) -> Self {
        let days = days.max(0);
        Self {
            start: add_days(self.start, -days),
            end: add_days(self.end, days),
        }
    }

    /// Smallest range covering both.
    pub fn union(&self, other: &StageRange) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn contains_range(&self, other: &StageRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains(&self, date: LocalDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Outer (`full`) and expected (`likely`) windows for one phase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseWindows {
    pub full: StageRange,
    pub likely: StageRange,
}

impl PhaseWindows {
    pub fn from_likely(likely: StageRange, slop_days: i64) -> Self {
        Self {
            full: likely.widen(slop_days),
            likely,
        }
    }

    pub fn union(&self, other: &PhaseWindows) -> Self {
        Self {
            full: self.full.union(&other.full),
            likely: self.likely.union(&other.likely),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    PreBreeding,
    HormoneTesting,
    Breeding,
    Birth,
    PostBirthCare,
    PlacementNormal,
    PlacementExtended,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::PreBreeding,
        Phase::HormoneTesting,
        Phase::Breeding,
        Phase::Birth,
        Phase::PostBirthCare,
        Phase::PlacementNormal,
        Phase::PlacementExtended,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::PreBreeding => "pre_breeding",
            Phase::HormoneTesting => "hormone_testing",
            Phase::Breeding => "breeding",
            Phase::Birth => "birth",
            Phase::PostBirthCare => "post_birth_care",
            Phase::PlacementNormal => "placement_normal",
            Phase::PlacementExtended => "placement_extended",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Milestones {
    pub cycle_start: NaiveDate,
    /// Center estimate.
    pub ovulation: NaiveDate,
    pub ovulation_confirmed: Option<NaiveDate>,
    pub birth_expected: Option<NaiveDate>,
    pub placement_start_expected: NaiveDate,
    pub placement_completed_expected: NaiveDate,
    pub placement_extended_end_expected: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TimelineExplain {
    pub anchor_mode: Option<AnchorMode>,
    pub confidence: Option<Confidence>,
}

/// Complete breeding schedule: one [`PhaseWindows`] per [`Phase`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timeline {
    pub pre_breeding: PhaseWindows,
    pub hormone_testing: PhaseWindows,
    pub breeding: PhaseWindows,
    pub birth: PhaseWindows,
    pub post_birth_care: PhaseWindows,
    pub placement_normal: PhaseWindows,
    pub placement_extended: PhaseWindows,
    pub milestones: Milestones,
    pub explain: TimelineExplain,
}

impl Timeline {
    pub fn phase(&self, phase: Phase) -> &PhaseWindows {
        match phase {
            Phase::PreBreeding => &self.pre_breeding,
            Phase::HormoneTesting => &self.hormone_testing,
            Phase::Breeding => &self.breeding,
            Phase::Birth => &self.birth,
            Phase::PostBirthCare => &self.post_birth_care,
            Phase::PlacementNormal => &self.placement_normal,
            Phase::PlacementExtended => &self.placement_extended,
        }
    }

    pub fn phase_mut(&mut self, phase: Phase) -> &mut PhaseWindows {
        match phase {
            Phase::PreBreeding => &mut self.pre_breeding,
            Phase::HormoneTesting => &mut self.hormone_testing,
            Phase::Breeding => &mut self.breeding,
            Phase::Birth => &mut self.birth,
            Phase::PostBirthCare => &mut self.post_birth_care,
            Phase::PlacementNormal => &mut self.placement_normal,
            Phase::PlacementExtended => &mut self.placement_extended,
        }
    }
}

/// Per-animal context supplied by the caller. `today` is always injected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReproSummary {
    pub species: String,
    pub dob: Option<NaiveDate>,
    pub today: NaiveDate,
    /// Known cycle starts, ascending.
    #[serde(default)]
    pub cycle_start_dates: Vec<NaiveDate>,
    #[serde(default)]
    pub cycle_length_override_days: Option<i64>,
    #[serde(default)]
    pub ovulation_history: Vec<CycleHistoryEntry>,
}

impl ReproSummary {
    pub fn new(species: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            species: species.into(),
            dob: None,
            today,
            cycle_start_dates: Vec::new(),
            cycle_length_override_days: None,
            ovulation_history: Vec::new(),
        }
    }

    pub fn last_cycle_start(&self) -> Option<NaiveDate> {
        self.cycle_start_dates.iter().copied().max()
    }
}

/// Raw inputs for recording or correcting one heat cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleObservation {
    pub cycle_start: NaiveDate,
    pub ovulation: Option<NaiveDate>,
    pub ovulation_method: Option<OvulationMethod>,
    pub birth_date: Option<NaiveDate>,
    pub breeding_plan_id: Option<Uuid>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleHistoryEntry {
    pub id: Uuid,
    pub cycle_start: NaiveDate,
    pub ovulation: Option<NaiveDate>,
    pub ovulation_method: Option<OvulationMethod>,
    /// Ovulation minus cycle start.
    pub offset_days: Option<i64>,
    /// Offset minus the individual average; recomputed whenever history changes.
    pub variance: Option<f64>,
    pub confidence: Confidence,
    pub source: CycleSource,
    pub breeding_plan_id: Option<Uuid>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatternClassification {
    #[serde(rename = "Early Ovulator")]
    EarlyOvulator,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Late Ovulator")]
    LateOvulator,
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
}

impl PatternClassification {
    pub fn label(self) -> &'static str {
        match self {
            PatternClassification::EarlyOvulator => "Early Ovulator",
            PatternClassification::Average => "Average",
            PatternClassification::LateOvulator => "Late Ovulator",
            PatternClassification::InsufficientData => "Insufficient Data",
        }
    }
}

/// Derived on every query, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OvulationPattern {
    pub sample_size: usize,
    /// Hormone-tested cycles only.
    pub confirmed_cycles: usize,
    pub avg_offset_days: Option<f64>,
    pub std_deviation: Option<f64>,
    pub min_offset: Option<i64>,
    pub max_offset: Option<i64>,
    pub classification: PatternClassification,
    pub confidence: Confidence,
    pub guidance: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleAlert {
    pub days_until_expected: i64,
    pub is_overdue: bool,
    pub needs_attention: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectedCycleStart {
    pub date: NaiveDate,
    /// 1-based position in the projected sequence.
    pub cycle_number: usize,
    pub alert: CycleAlert,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleProjection {
    pub cycle_length_days: i64,
    pub projected: Vec<ProjectedCycleStart>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OvulationWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub most_likely: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextCycleProjection {
    pub projected_heat_start: NaiveDate,
    pub projected_ovulation_window: Option<OvulationWindow>,
    pub recommended_testing_start: Option<NaiveDate>,
    pub confidence: Confidence,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stage_range_orders_bounds() {
        let r = StageRange::new(ymd(2024, 2, 1), ymd(2024, 1, 1));
        assert_eq!(r.start, ymd(2024, 1, 1));
        assert_eq!(r.end, ymd(2024, 2, 1));
    }

    #[test]
    fn widened_range_contains_original() {
        let likely = StageRange::around(ymd(2024, 3, 16), 1);
        let windows = PhaseWindows::from_likely(likely, 3);
        assert!(windows.full.contains_range(&windows.likely));
        assert_eq!(windows.full.start, ymd(2024, 3, 11));
        assert_eq!(windows.full.end, ymd(2024, 3, 20));
        assert!(windows.likely.contains(ymd(2024, 3, 16)));
    }

    #[test]
    fn enums_use_wire_names() {
        assert_eq!(
            serde_json::to_string(&AnchorMode::CycleStart).unwrap(),
            "\"CYCLE_START\""
        );
        assert_eq!(
            serde_json::to_string(&CycleSource::HormoneTest).unwrap(),
            "\"HORMONE_TEST\""
        );
        assert_eq!(
            serde_json::to_string(&PatternClassification::InsufficientData).unwrap(),
            "\"Insufficient Data\""
        );
        assert_eq!(
            serde_json::to_string(&StageRange::new(ymd(2024, 1, 1), ymd(2024, 1, 2))).unwrap(),
            r#"{"start":"2024-01-01","end":"2024-01-02"}"#
        );
    }

    #[test]
    fn ovulation_method_parsing() {
        assert_eq!(
            OvulationMethod::parse("progesterone"),
            OvulationMethod::ProgesteroneTest
        );
        assert_eq!(OvulationMethod::parse("lh-test"), OvulationMethod::LhTest);
        assert_eq!(OvulationMethod::parse("palpation"), OvulationMethod::Other);
        assert!(OvulationMethod::Ultrasound.is_lab_test());
        assert!(!OvulationMethod::VaginalCytology.is_lab_test());
    }

    #[test]
    fn anchor_mode_hint_parsing() {
        assert_eq!(AnchorMode::parse("ovulation"), Some(AnchorMode::Ovulation));
        assert_eq!(AnchorMode::parse("whenever"), None);
    }
}
