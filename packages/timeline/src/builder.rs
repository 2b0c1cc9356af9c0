// ABOUTME: Editable ordered list of timeline phases and their actionable steps
// ABOUTME: Validates every edit up front and renumbers orders afterwards

use leadflow_core::{generate_id, CustomActionableStep, CustomPhaseConfig, Intent, Priority};
use tracing::{debug, info};

use crate::coverage::AdviceCoverage;
use crate::error::{Result, TimelineError};

pub const DEFAULT_MIN_PHASES: usize = 1;
pub const DEFAULT_MAX_PHASES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBounds {
    pub min_phases: usize,
    pub max_phases: usize,
}

impl Default for PhaseBounds {
    fn default() -> Self {
        Self {
            min_phases: DEFAULT_MIN_PHASES,
            max_phases: DEFAULT_MAX_PHASES,
        }
    }
}

impl PhaseBounds {
    pub fn new(min_phases: usize, max_phases: usize) -> Result<Self> {
        if min_phases > max_phases {
            return Err(TimelineError::InvalidBounds {
                min: min_phases,
                max: max_phases,
            });
        }
        Ok(Self {
            min_phases,
            max_phases,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPhase {
    pub name: String,
    pub timeline: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseBuilder {
    flow: Intent,
    bounds: PhaseBounds,
    phases: Vec<CustomPhaseConfig>,
}

impl PhaseBuilder {
    /// Start from persisted phases; stored orders decide the initial sequence
    pub fn new(flow: Intent, mut phases: Vec<CustomPhaseConfig>, bounds: PhaseBounds) -> Self {
        phases.sort_by_key(|p| p.order);
        for phase in &mut phases {
            phase.actionable_steps.sort_by_key(|s| s.order);
        }

        let mut builder = Self {
            flow,
            bounds,
            phases,
        };
        builder.renumber();
        builder
    }

    pub fn flow(&self) -> Intent {
        self.flow
    }

    pub fn bounds(&self) -> PhaseBounds {
        self.bounds
    }

    pub fn phases(&self) -> &[CustomPhaseConfig] {
        &self.phases
    }

    pub fn into_phases(self) -> Vec<CustomPhaseConfig> {
        self.phases
    }

    pub fn phase(&self, phase_id: &str) -> Option<&CustomPhaseConfig> {
        self.phases.iter().find(|p| p.id == phase_id)
    }

    // ------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------

    pub fn add_phase(&mut self, phase: NewPhase) -> Result<String> {
        let name = phase.name.trim();
        if name.is_empty() {
            return Err(TimelineError::EmptyName);
        }
        if self.phases.len() >= self.bounds.max_phases {
            return Err(TimelineError::TooManyPhases {
                max: self.bounds.max_phases,
            });
        }

        let id = generate_id("phase");
        info!("Adding phase '{}' to the {} timeline", name, self.flow);
        self.phases.push(CustomPhaseConfig {
            id: id.clone(),
            name: name.to_string(),
            timeline: phase.timeline.trim().to_string(),
            description: phase.description.trim().to_string(),
            order: self.phases.len(),
            actionable_steps: Vec::new(),
        });
        Ok(id)
    }

    pub fn remove_phase(&mut self, phase_id: &str) -> Result<CustomPhaseConfig> {
        let index = self.phase_index(phase_id)?;
        if self.phases.len() <= self.bounds.min_phases {
            return Err(TimelineError::TooFewPhases {
                min: self.bounds.min_phases,
            });
        }

        info!("Removing phase {} from the {} timeline", phase_id, self.flow);
        let removed = self.phases.remove(index);
        self.renumber();
        Ok(removed)
    }

    pub fn move_phase(&mut self, phase_id: &str, position: usize) -> Result<()> {
        let index = self.phase_index(phase_id)?;
        check_position(position, self.phases.len())?;

        debug!("Moving phase {} from {} to {}", phase_id, index, position);
        let phase = self.phases.remove(index);
        self.phases.insert(position, phase);
        self.renumber();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------

    pub fn add_step(&mut self, phase_id: &str, title: &str, priority: Priority) -> Result<String> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TimelineError::EmptyTitle);
        }
        let index = self.phase_index(phase_id)?;

        let id = generate_id("step");
        let steps = &mut self.phases[index].actionable_steps;
        debug!("Adding step '{}' to phase {}", title, phase_id);
        steps.push(CustomActionableStep {
            id: id.clone(),
            title: title.to_string(),
            priority,
            order: steps.len(),
            inline_experience: None,
            linked_story_id: None,
        });
        Ok(id)
    }

    pub fn remove_step(&mut self, phase_id: &str, step_id: &str) -> Result<CustomActionableStep> {
        let (phase, step) = self.step_index(phase_id, step_id)?;
        let removed = self.phases[phase].actionable_steps.remove(step);
        self.renumber();
        Ok(removed)
    }

    pub fn move_step(&mut self, phase_id: &str, step_id: &str, position: usize) -> Result<()> {
        let (phase, step) = self.step_index(phase_id, step_id)?;
        let steps = &mut self.phases[phase].actionable_steps;
        check_position(position, steps.len())?;

        let moved = steps.remove(step);
        steps.insert(position, moved);
        self.renumber();
        Ok(())
    }

    /// Point a step at a knowledge story, dropping any inline advice
    pub fn link_story(&mut self, phase_id: &str, step_id: &str, story_id: &str) -> Result<()> {
        let story_id = story_id.trim();
        if story_id.is_empty() {
            return Err(TimelineError::EmptyStoryId);
        }
        let step = self.step_mut(phase_id, step_id)?;
        step.linked_story_id = Some(story_id.to_string());
        step.inline_experience = None;
        Ok(())
    }

    /// Write advice directly on a step, dropping any story link
    pub fn set_inline_advice(&mut self, phase_id: &str, step_id: &str, advice: &str) -> Result<()> {
        let advice = advice.trim();
        if advice.is_empty() {
            return Err(TimelineError::EmptyAdvice);
        }
        let step = self.step_mut(phase_id, step_id)?;
        step.inline_experience = Some(advice.to_string());
        step.linked_story_id = None;
        Ok(())
    }

    pub fn unlink(&mut self, phase_id: &str, step_id: &str) -> Result<()> {
        let step = self.step_mut(phase_id, step_id)?;
        step.inline_experience = None;
        step.linked_story_id = None;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Coverage
    // ------------------------------------------------------------------

    pub fn phase_coverage(&self, phase_id: &str) -> Option<AdviceCoverage> {
        self.phase(phase_id).map(AdviceCoverage::of_phase)
    }

    pub fn coverage_by_phase(&self) -> Vec<(&str, AdviceCoverage)> {
        self.phases
            .iter()
            .map(|p| (p.id.as_str(), AdviceCoverage::of_phase(p)))
            .collect()
    }

    pub fn coverage(&self) -> AdviceCoverage {
        self.phases.iter().map(AdviceCoverage::of_phase).sum()
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn renumber(&mut self) {
        for (index, phase) in self.phases.iter_mut().enumerate() {
            phase.order = index;
            for (step_index, step) in phase.actionable_steps.iter_mut().enumerate() {
                step.order = step_index;
            }
        }
    }

    fn phase_index(&self, phase_id: &str) -> Result<usize> {
        self.phases
            .iter()
            .position(|p| p.id == phase_id)
            .ok_or_else(|| TimelineError::UnknownPhase(phase_id.to_string()))
    }

    fn step_index(&self, phase_id: &str, step_id: &str) -> Result<(usize, usize)> {
        let phase = self.phase_index(phase_id)?;
        let step = self.phases[phase]
            .actionable_steps
            .iter()
            .position(|s| s.id == step_id)
            .ok_or_else(|| TimelineError::UnknownStep {
                phase: phase_id.to_string(),
                step: step_id.to_string(),
            })?;
        Ok((phase, step))
    }

    fn step_mut(&mut self, phase_id: &str, step_id: &str) -> Result<&mut CustomActionableStep> {
        let (phase, step) = self.step_index(phase_id, step_id)?;
        Ok(&mut self.phases[phase].actionable_steps[step])
    }
}

fn check_position(position: usize, len: usize) -> Result<()> {
    if position >= len {
        return Err(TimelineError::PositionOutOfRange { position, len });
    }
    Ok(())
}
