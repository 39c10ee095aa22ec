//! Reproductive-cycle timeline and projection engine.
//!
//! Turns sparse breeding signals (a locked heat-cycle start, a hormone-confirmed
//! ovulation, an actual birth date) into a full multi-phase breeding schedule,
//! classifies a female's ovulation pattern against species norms, and projects
//! future cycle starts.
//!
//! Everything here is synchronous and pure. `today` is always passed in; no
//! function reads the system clock, touches the network or persists anything.

pub mod anchor;
pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod pattern;
pub mod plan_windows;
pub mod prediction;
pub mod species;
pub mod timeline;

pub use anchor::{resolve_anchor, Anchor, AnchorCandidates, AnchorSource};
pub use calendar::{format_local_date, parse_local_date, LocalDate};
pub use config::{ConfigError, EngineConfig};
pub use engine::ReproEngine;
pub use error::{ReproError, ReproResult};
pub use models::*;
pub use pattern::analyze_pattern;
pub use plan_windows::{plan_windows, BreedingPlanInput, PlanWindows};
pub use prediction::{
    is_overdue, needs_attention, project_next_cycle, project_upcoming_cycle_starts,
    ProjectionOptions,
};
pub use species::{SpeciesProfile, SpeciesTable};
pub use timeline::{build_timeline, build_timeline_from_seed, merge_timelines};
