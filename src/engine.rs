use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::anchor::{resolve_anchor, Anchor, AnchorCandidates};
use crate::config::{ConfigError, EngineConfig};
use crate::error::{ReproError, ReproResult};
use crate::models::{
    CycleHistoryEntry, CycleObservation, CycleProjection, NextCycleProjection, OvulationPattern,
    ReproSummary, Timeline,
};
use crate::pattern::{analyze_pattern, refresh_variances};
use crate::plan_windows::{plan_timeline, BreedingPlanInput, PlanWindows};
use crate::prediction::{project_next_cycle, project_upcoming_cycle_starts, ProjectionOptions};
use crate::species::{SpeciesProfile, SpeciesTable};
use crate::timeline::{build_timeline, build_timeline_from_seed, merge_timelines};

#[derive(Debug, Clone)]
pub struct ReproEngine {
    config: EngineConfig,
    species: SpeciesTable,
}

impl Default for ReproEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ReproEngine {
    pub fn new(config: EngineConfig) -> Self {
        let species = config.species_table();
        Self { config, species }
    }

    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = EngineConfig::load(path)?;
        debug!(
            event = "config.loaded",
            path = %path.display(),
            species_overrides = config.species_overrides.len(),
        );
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self, species: &str) -> &SpeciesProfile {
        self.species.profile_for(species)
    }

    pub fn resolve_anchor(&self, candidates: &AnchorCandidates) -> Option<Anchor> {
        resolve_anchor(candidates)
    }

    pub fn build_timeline(&self, summary: &ReproSummary, anchor: &Anchor) -> Timeline {
        let timeline = build_timeline(summary, self.profile(&summary.species), anchor);
        debug!(
            event = "timeline.built",
            species = %summary.species,
            anchor_mode = ?anchor.mode,
            confidence = ?anchor.confidence,
            ovulation = %timeline.milestones.ovulation,
        );
        timeline
    }

    pub fn build_timeline_from_seed(&self, summary: &ReproSummary, cycle_start: NaiveDate) -> Timeline {
        let timeline = build_timeline_from_seed(summary, self.profile(&summary.species), cycle_start);
        debug!(
            event = "timeline.built",
            species = %summary.species,
            seed = %cycle_start,
            ovulation = %timeline.milestones.ovulation,
        );
        timeline
    }

    pub fn merge_timelines(&self, a: &Timeline, b: &Timeline) -> Timeline {
        let merged = merge_timelines(a, b);
        debug!(
            event = "timeline.merged",
            breeding_start = %merged.breeding.full.start,
            breeding_end = %merged.breeding.full.end,
        );
        merged
    }

    pub fn analyze_pattern(&self, species: &str, history: &[CycleHistoryEntry]) -> OvulationPattern {
        let pattern = analyze_pattern(history, self.profile(species));
        debug!(
            event = "pattern.analyzed",
            species = %species,
            sample_size = pattern.sample_size,
            confirmed_cycles = pattern.confirmed_cycles,
            classification = pattern.classification.label(),
        );
        pattern
    }

    pub fn record_cycle(&self, species: &str, observation: CycleObservation) -> CycleHistoryEntry {
        CycleHistoryEntry::from_observation(observation, self.profile(species))
    }

    /// History with every variance recomputed against the current pattern.
    pub fn refresh_history(&self, species: &str, history: &[CycleHistoryEntry]) -> Vec<CycleHistoryEntry> {
        refresh_variances(history, self.profile(species))
    }

    /// Projects with the caller's options, or the configured defaults.
    pub fn project_upcoming_cycle_starts(
        &self,
        summary: &ReproSummary,
        options: Option<ProjectionOptions>,
    ) -> ReproResult<CycleProjection> {
        let options = options.unwrap_or(self.config.projection);
        let projection = project_upcoming_cycle_starts(summary, self.profile(&summary.species), options)
            .map_err(log_projection_error)?;
        debug!(
            event = "projection.generated",
            species = %summary.species,
            cycle_length_days = projection.cycle_length_days,
            count = projection.projected.len(),
        );
        Ok(projection)
    }

    pub fn project_next_cycle(&self, summary: &ReproSummary) -> ReproResult<Option<NextCycleProjection>> {
        project_next_cycle(summary, self.profile(&summary.species)).map_err(log_projection_error)
    }

    /// planWindows for one breeding plan and its dam's cycle history.
    pub fn plan_windows(
        &self,
        plan: &BreedingPlanInput,
        today: NaiveDate,
        history: &[CycleHistoryEntry],
    ) -> ReproResult<Option<PlanWindows>> {
        let summary = plan.summary(today, history)?;
        let timeline = plan_timeline(plan, &summary, self.profile(&summary.species))?;
        if timeline.is_none() {
            debug!(event = "anchor.absent", plan_id = ?plan.id);
        }
        Ok(timeline.as_ref().map(PlanWindows::from))
    }
}

fn log_projection_error(err: ReproError) -> ReproError {
    if let ReproError::InvalidCycleLength { days } = err {
        warn!(event = "projection.invalid_cycle_length", days);
    }
    err
}
