// ABOUTME: Built-in offer catalogue shipped with every agent account
// ABOUTME: Real-estate timeline journeys for buyers, sellers and browsers
// ABOUTME: plus a home valuation offer

use leadflow_core::{Button, Intent, Offer, Question};

use crate::error::Result;
use crate::registry::OfferRegistry;

pub const REAL_ESTATE_TIMELINE: &str = "real-estate-timeline";
pub const HOME_VALUATION: &str = "home-valuation";

/// Build the default registry
pub fn builtin() -> Result<OfferRegistry> {
    OfferRegistry::builder()
        .offer(Offer {
            id: REAL_ESTATE_TIMELINE.to_string(),
            label: "Get my personalised timeline".to_string(),
            description: "A step-by-step plan for your move, built from a few quick questions"
                .to_string(),
            supported_intents: vec![Intent::Buy, Intent::Sell, Intent::Browse],
        })
        .offer(Offer {
            id: HOME_VALUATION.to_string(),
            label: "What's my home worth?".to_string(),
            description: "An agent-reviewed estimate of your home's market value".to_string(),
            supported_intents: vec![Intent::Sell],
        })
        .flow(REAL_ESTATE_TIMELINE, Intent::Buy, buyer_timeline())
        .flow(REAL_ESTATE_TIMELINE, Intent::Sell, seller_timeline())
        .flow(REAL_ESTATE_TIMELINE, Intent::Browse, browser_timeline())
        .flow(HOME_VALUATION, Intent::Sell, home_valuation())
        .build()
}

fn property_type_buttons() -> Vec<Button> {
    vec![
        Button::new("pt-house", "Single-family house", "single-family")
            .with_tracker("Detached homes make up most local listings", "Saved property type"),
        Button::new("pt-condo", "Condo", "condo")
            .with_tracker("Condo fees vary a lot between buildings", "Saved property type"),
        Button::new("pt-townhouse", "Townhouse", "townhouse")
            .with_tracker("Townhouses balance space and upkeep", "Saved property type"),
        Button::new("pt-multi", "Multi-family", "multi-family")
            .with_tracker("Rental income can help qualify", "Saved property type"),
    ]
}

fn move_timeline_buttons(prefix: &str) -> Vec<Button> {
    vec![
        Button::new(format!("{prefix}-0-3"), "Within 3 months", "0-3-months"),
        Button::new(format!("{prefix}-3-6"), "3 to 6 months", "3-6-months"),
        Button::new(format!("{prefix}-6-12"), "6 to 12 months", "6-12-months"),
        Button::new(format!("{prefix}-12"), "More than a year", "12-plus-months"),
    ]
}

fn contact_question(order: i32) -> Question {
    Question::open(
        "contact",
        "Where should I send your personalised plan?",
        "email",
    )
    .contact_modal()
    .with_order(order)
}

fn buyer_timeline() -> Vec<Question> {
    vec![
        Question::choice(
            "propertyType",
            "What type of home are you looking for?",
            "propertyType",
            property_type_buttons(),
        )
        .with_order(1),
        Question::choice(
            "budget",
            "What price range are you considering?",
            "budget",
            vec![
                Button::new("budget-400", "Under $400k", "under-400k"),
                Button::new("budget-400-600", "$400k to $600k", "400-600k")
                    .with_tracker("This is the busiest band in most markets", "Saved budget"),
                Button::new("budget-600-800", "$600k to $800k", "600-800k"),
                Button::new("budget-800", "$800k+", "800k-plus"),
            ],
        )
        .with_order(2),
        Question::choice(
            "preApproval",
            "Have you been pre-approved for a mortgage?",
            "preApproved",
            vec![
                Button::new("preapproval-yes", "Yes", "yes")
                    .with_tracker("Pre-approved buyers win more bidding wars", "Saved financing"),
                Button::new("preapproval-no", "Not yet", "no"),
                Button::new("preapproval-cash", "Paying cash", "cash"),
            ],
        )
        .linked_to_phase("financing")
        .with_order(3),
        Question::choice(
            "buyTimeline",
            "When would you like to be moved in?",
            "timeline",
            move_timeline_buttons("buy-timeline"),
        )
        .with_order(4),
        Question::open(
            "mustHaves",
            "Anything you can't live without? Yard, schools, commute...",
            "mustHaves",
        )
        .optional()
        .with_order(5),
        contact_question(6),
    ]
}

fn seller_timeline() -> Vec<Question> {
    vec![
        Question::choice(
            "sellPropertyType",
            "What type of home are you selling?",
            "propertyType",
            property_type_buttons(),
        )
        .with_order(1),
        Question::choice(
            "sellReason",
            "What's prompting the sale?",
            "sellReason",
            vec![
                Button::new("reason-upsize", "Need more space", "upsizing"),
                Button::new("reason-downsize", "Downsizing", "downsizing"),
                Button::new("reason-relocate", "Relocating", "relocating"),
                Button::new("reason-other", "Something else", "other"),
            ],
        )
        .with_order(2),
        Question::choice(
            "sellTimeline",
            "When would you like to list?",
            "timeline",
            move_timeline_buttons("sell-timeline"),
        )
        .linked_to_phase("listing-prep")
        .with_order(3),
        Question::choice(
            "alsoBuying",
            "Will you be buying your next home too?",
            "alsoBuying",
            vec![
                Button::new("also-buying-yes", "Yes", "yes")
                    .with_tracker("Timing a sale and purchase needs a bridge plan", "Saved plans"),
                Button::new("also-buying-no", "No", "no"),
            ],
        )
        .with_order(4),
        contact_question(5),
    ]
}

fn browser_timeline() -> Vec<Question> {
    vec![
        Question::open(
            "area",
            "Which neighbourhoods or towns are you curious about?",
            "area",
        )
        .with_order(1),
        Question::choice(
            "browsePropertyType",
            "What kind of homes catch your eye?",
            "propertyType",
            property_type_buttons(),
        )
        .with_order(2),
        Question::choice(
            "browseTimeline",
            "Is a move on the horizon?",
            "timeline",
            move_timeline_buttons("browse-timeline"),
        )
        .optional()
        .with_order(3),
    ]
}

fn home_valuation() -> Vec<Question> {
    vec![
        Question::open(
            "address",
            "What's the address of the home?",
            "address",
        )
        .with_order(1),
        Question::choice(
            "valuationPropertyType",
            "What type of property is it?",
            "propertyType",
            property_type_buttons(),
        )
        .with_order(2),
        Question::choice(
            "condition",
            "How would you describe its condition?",
            "condition",
            vec![
                Button::new("condition-move-in", "Move-in ready", "move-in-ready"),
                Button::new("condition-updates", "Needs minor updates", "minor-updates"),
                Button::new("condition-reno", "Needs renovation", "renovation"),
            ],
        )
        .with_order(3),
        contact_question(4),
    ]
}
