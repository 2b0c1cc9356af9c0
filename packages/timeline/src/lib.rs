// ABOUTME: Leadflow timeline library - phase and step editing for timeline offers
// ABOUTME: Bounded phase builder, starter phases per flow and advice coverage counts

pub mod builder;
pub mod coverage;
pub mod defaults;
pub mod error;

pub use builder::{NewPhase, PhaseBounds, PhaseBuilder, DEFAULT_MAX_PHASES, DEFAULT_MIN_PHASES};
pub use coverage::AdviceCoverage;
pub use defaults::default_phases;
pub use error::{Result, TimelineError};
