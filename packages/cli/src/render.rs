// ABOUTME: Plain-text rendering of registries, category trees and timelines
// ABOUTME: Colour is applied by the binary so these helpers stay easy to test

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use leadflow_core::{truncate, KnowledgeEntry, Question};
use leadflow_knowledge::CategoryTree;
use leadflow_offers::OfferRegistry;
use leadflow_timeline::PhaseBuilder;

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn offers_table(registry: &OfferRegistry) -> Table {
    let mut table = table();
    table.set_header(vec!["ID", "Offer", "Intent", "Questions"]);

    for offer in registry.offers() {
        for intent in &offer.supported_intents {
            table.add_row(vec![
                offer.id.clone(),
                truncate(&offer.label, 40),
                intent.label().to_string(),
                registry.question_count(&offer.id, *intent).to_string(),
            ]);
        }
    }
    table
}

pub fn questions_table(questions: &[Question]) -> Table {
    let mut table = table();
    table.set_header(vec!["#", "ID", "Question", "Answer key", "Answers", "Required"]);

    for (index, question) in questions.iter().enumerate() {
        let answers = if question.triggers_contact_modal {
            "contact form".to_string()
        } else if question.is_free_text() {
            "free text".to_string()
        } else {
            question
                .button_list()
                .iter()
                .map(|b| b.label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        table.add_row(vec![
            (index + 1).to_string(),
            question.id.clone(),
            truncate(&question.text, 50),
            question.mapping_key.clone().unwrap_or_else(|| "—".to_string()),
            truncate(&answers, 40),
            if question.required { "yes" } else { "no" }.to_string(),
        ]);
    }
    table
}

pub fn progress_bar(progress: u8, width: usize) -> String {
    let progress = progress.min(100) as usize;
    let filled = (progress * width + 50) / 100;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress
    )
}

/// One indented line per category, depth first from the roots
pub fn category_lines(tree: &CategoryTree) -> Vec<String> {
    let mut lines = Vec::new();
    for root in tree.roots() {
        push_category(tree, &root.id, 0, &mut lines);
    }
    lines
}

fn push_category(tree: &CategoryTree, id: &str, depth: usize, lines: &mut Vec<String>) {
    let Some(category) = tree.get(id) else {
        return;
    };
    let marker = if category.is_custom { "*" } else { "" };
    lines.push(format!(
        "{}{}{} ({})",
        "  ".repeat(depth),
        category.label,
        marker,
        tree.total_count(id)
    ));
    for child in tree.children(id) {
        push_category(tree, &child.id, depth + 1, lines);
    }
}

pub fn entries_table(entries: &[&KnowledgeEntry]) -> Table {
    let mut table = table();
    table.set_header(vec!["ID", "Title", "Category", "Excerpt"]);
    for entry in entries {
        table.add_row(vec![
            entry.id.clone(),
            truncate(&entry.title, 40),
            entry.category.clone(),
            truncate(&entry.text, 60),
        ]);
    }
    table
}

pub fn timeline_table(builder: &PhaseBuilder) -> Table {
    let mut table = table();
    table.set_header(vec!["#", "Phase", "When", "Steps", "Advice"]);

    for (phase, (_, coverage)) in builder.phases().iter().zip(builder.coverage_by_phase()) {
        let steps = phase
            .actionable_steps
            .iter()
            .map(|s| {
                let mark = if s.has_advice() { "✓" } else { "·" };
                format!("{} {}", mark, s.title)
            })
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            (phase.order + 1).to_string(),
            phase.name.clone(),
            phase.timeline.clone(),
            steps,
            format!("{}/{}", coverage.with_advice, coverage.total),
        ]);
    }
    table
}
