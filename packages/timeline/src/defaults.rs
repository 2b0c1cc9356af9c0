// ABOUTME: Starter timeline phases per flow, used until an agent saves custom phases
// ABOUTME: Steps start without advice so coverage shows what still needs the agent's input

use leadflow_core::{CustomActionableStep, CustomPhaseConfig, Intent, Priority};

/// Name, timeline, description and steps of one starter phase
type PhaseOutline = (
    &'static str,
    &'static str,
    &'static str,
    &'static [(&'static str, Priority)],
);

const BUYER_PHASES: &[PhaseOutline] = &[
    (
        "Get pre-approved",
        "Weeks 1-2",
        "Know your budget before you fall in love with a home",
        &[
            ("Gather pay stubs and tax returns", Priority::High),
            ("Compare at least two lenders", Priority::Medium),
        ],
    ),
    (
        "House hunting",
        "Weeks 2-8",
        "Tour homes and narrow down your shortlist",
        &[
            ("List your must-haves", Priority::High),
            ("Book showings", Priority::Medium),
        ],
    ),
    (
        "Under contract",
        "Weeks 8-11",
        "Inspections, appraisal and final loan approval",
        &[
            ("Schedule the inspection", Priority::High),
            ("Lock your rate", Priority::Medium),
        ],
    ),
    (
        "Closing",
        "Week 12",
        "Sign, fund and get the keys",
        &[("Final walkthrough", Priority::High)],
    ),
];

const SELLER_PHASES: &[PhaseOutline] = &[
    (
        "Prepare the home",
        "Weeks 1-3",
        "Repairs, decluttering and staging",
        &[
            ("Declutter and depersonalise", Priority::High),
            ("Fix small repairs", Priority::Medium),
        ],
    ),
    (
        "List and market",
        "Weeks 3-6",
        "Photos, pricing and showings",
        &[
            ("Agree on a list price", Priority::High),
            ("Professional photos", Priority::Medium),
        ],
    ),
    (
        "Offers and closing",
        "Weeks 6-10",
        "Negotiate, accept and close",
        &[
            ("Review offers", Priority::High),
            ("Plan the move-out", Priority::Low),
        ],
    ),
];

const BROWSER_PHASES: &[PhaseOutline] = &[
    (
        "Explore the market",
        "Any time",
        "Get a feel for neighbourhoods and prices",
        &[
            ("Set up listing alerts", Priority::Medium),
            ("Visit an open house", Priority::Low),
        ],
    ),
    (
        "Plan your next step",
        "When you're ready",
        "Decide whether to buy, sell or wait",
        &[("Talk through your options", Priority::Medium)],
    ),
];

pub fn default_phases(flow: Intent) -> Vec<CustomPhaseConfig> {
    let outline = match flow {
        Intent::Buy => BUYER_PHASES,
        Intent::Sell => SELLER_PHASES,
        Intent::Browse => BROWSER_PHASES,
    };

    outline
        .iter()
        .enumerate()
        .map(|(order, (name, timeline, description, steps))| CustomPhaseConfig {
            id: format!("{}-phase-{}", flow, order + 1),
            name: name.to_string(),
            timeline: timeline.to_string(),
            description: description.to_string(),
            order,
            actionable_steps: steps
                .iter()
                .enumerate()
                .map(|(step_order, (title, priority))| CustomActionableStep {
                    id: format!("{}-phase-{}-step-{}", flow, order + 1, step_order + 1),
                    title: title.to_string(),
                    priority: *priority,
                    order: step_order,
                    inline_experience: None,
                    linked_story_id: None,
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_ordered_and_unadvised() {
        for flow in Intent::ALL {
            let phases = default_phases(flow);
            assert!(!phases.is_empty());
            for (index, phase) in phases.iter().enumerate() {
                assert_eq!(phase.order, index);
                assert!(phase.actionable_steps.iter().all(|s| !s.has_advice()));
            }
        }
    }
}
