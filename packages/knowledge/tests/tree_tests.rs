// ABOUTME: Integration tests for knowledge category aggregation
// ABOUTME: Covers counts, exactly-once placement, search, validation and zoom navigation

use std::collections::HashMap;

use leadflow_core::{CreateCategoryInput, CustomCategory, EntryKind, KnowledgeEntry};
use leadflow_knowledge::{BrainView, CategoryTree, KnowledgeError, UNCATEGORIZED};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn entry(id: &str, category: &str, title: &str) -> KnowledgeEntry {
    KnowledgeEntry {
        id: id.to_string(),
        title: title.to_string(),
        category: category.to_string(),
        text: String::new(),
        kind: Some(EntryKind::Story),
        situation: None,
        action: None,
        outcome: None,
        tags: None,
        chunk_count: None,
    }
}

fn custom(id: &str, label: &str, parent: Option<&str>) -> CustomCategory {
    CustomCategory {
        id: id.to_string(),
        label: label.to_string(),
        description: None,
        icon: None,
        color: None,
        parent_id: parent.map(str::to_string),
    }
}

fn sample_tree() -> CategoryTree {
    let customs = vec![
        custom("relocation", "Relocation", None),
        custom("military", "Military moves", Some("relocation")),
        custom("first-time", "First-time buyers", Some("buyer-stories")),
    ];
    let mut negotiation = entry("k4", "seller-stories", "Holding firm on price");
    negotiation.situation = Some("Three offers came in under asking".to_string());
    negotiation.tags = Some(vec!["Negotiation".to_string()]);

    let entries = vec![
        entry("k1", "relocation", "Moving from Denver"),
        entry("k2", "military", "PCS orders with 30 days notice"),
        entry("k3", "first-time", "Closing on a first condo"),
        negotiation,
        entry("k5", "deleted-category", "Orphaned tip"),
        entry("k6", "buyer-stories", "Winning a bidding war"),
    ];
    CategoryTree::build(entries, &customs)
}

#[test]
fn test_every_entry_lands_in_exactly_one_category() {
    let tree = sample_tree();

    let mut seen: HashMap<String, usize> = HashMap::new();
    for category in tree.categories() {
        assert_eq!(category.count, category.items.len());
        for item in &category.items {
            *seen.entry(item.id.clone()).or_default() += 1;
        }
    }

    assert_eq!(seen.len(), 6);
    assert!(seen.values().all(|&n| n == 1));
    assert_eq!(tree.get(UNCATEGORIZED).unwrap().items[0].id, "k5");
}

#[test]
fn test_root_totals_cover_nested_entries() {
    let tree = sample_tree();

    let root_total: usize = tree.roots().iter().map(|c| tree.total_count(&c.id)).sum();
    let nested: usize = tree
        .categories()
        .filter(|c| c.is_custom && c.parent_id.is_some())
        .map(|c| c.count)
        .sum();

    assert_eq!(root_total, 6);
    assert!(root_total >= nested);
    assert_eq!(tree.total_count("relocation"), 2);
    assert_eq!(tree.total_count("buyer-stories"), 2);
}

#[test]
fn test_roots_and_children() {
    let tree = sample_tree();

    let roots: Vec<_> = tree.roots().iter().map(|c| c.id.clone()).collect();
    assert!(roots.contains(&"relocation".to_string()));
    assert!(!roots.contains(&"military".to_string()));

    let children: Vec<_> = tree
        .children("relocation")
        .iter()
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(children, vec!["military"]);
    assert!(tree.children("general").is_empty());
}

#[rstest]
#[case("denver", vec!["k1"])]
#[case("NEGOTIATION", vec!["k4"])]
#[case("under asking", vec!["k4"])]
#[case("condo", vec!["k3"])]
#[case("nothing like this", vec![])]
fn test_search_is_case_insensitive(#[case] query: &str, #[case] expected: Vec<&str>) {
    let tree = sample_tree();
    let ids: Vec<_> = tree.search(query).iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_empty_search_returns_everything() {
    assert_eq!(sample_tree().search("  ").len(), 6);
}

#[test]
fn test_add_custom_category_validates() {
    let mut tree = sample_tree();
    let before = tree.len();

    let empty = CreateCategoryInput {
        label: "   ".to_string(),
        ..CreateCategoryInput::default()
    };
    assert_eq!(tree.add_custom_category(&empty), Err(KnowledgeError::EmptyLabel));

    let orphan = CreateCategoryInput {
        label: "Orphan".to_string(),
        parent_id: Some("nope".to_string()),
        ..CreateCategoryInput::default()
    };
    assert_eq!(
        tree.add_custom_category(&orphan),
        Err(KnowledgeError::UnknownParent("nope".to_string()))
    );
    assert_eq!(tree.len(), before);

    let valid = CreateCategoryInput {
        label: "Overseas".to_string(),
        parent_id: Some("military".to_string()),
        ..CreateCategoryInput::default()
    };
    let id = tree.add_custom_category(&valid).unwrap();
    assert!(id.starts_with("cat-"));
    assert_eq!(tree.get(&id).unwrap().parent_id.as_deref(), Some("military"));
    assert_eq!(tree.len(), before + 1);
}

#[test]
fn test_reparent_rejects_cycles_without_mutation() {
    let mut tree = sample_tree();

    let err = tree.reparent("relocation", Some("military")).unwrap_err();
    assert_eq!(
        err,
        KnowledgeError::Cycle {
            category: "relocation".to_string(),
            parent: "military".to_string()
        }
    );
    assert_eq!(tree.get("relocation").unwrap().parent_id, None);

    tree.reparent("military", None).unwrap();
    assert!(tree.children("relocation").is_empty());
    tree.reparent("relocation", Some("military")).unwrap();
    assert_eq!(tree.total_count("military"), 2);
}

#[test]
fn test_cyclic_definitions_fall_back_to_roots() {
    let tree = CategoryTree::build(
        vec![entry("k1", "a", "A story")],
        &[custom("a", "A", Some("b")), custom("b", "B", Some("a"))],
    );

    // One of the pair keeps its parent, the other stays at the root
    let rooted = ["a", "b"]
        .iter()
        .filter(|id| tree.get(id).unwrap().parent_id.is_none())
        .count();
    assert_eq!(rooted, 1);
    let root_total: usize = tree.roots().iter().map(|c| tree.total_count(&c.id)).sum();
    assert_eq!(root_total, 1);
}

#[test]
fn test_brain_view_zoom_and_breadcrumb() {
    let tree = sample_tree();
    let mut view = BrainView::new();

    assert_eq!(view.visible(&tree).len(), tree.roots().len());
    assert!(view.breadcrumb(&tree).is_empty());

    view.zoom_in(&tree, "relocation").unwrap();
    view.zoom_in(&tree, "military").unwrap();
    assert_eq!(view.breadcrumb(&tree), vec!["Relocation", "Military moves"]);
    assert!(view.visible(&tree).is_empty());

    assert!(view.zoom_out(&tree));
    assert_eq!(view.focus(), Some("relocation"));
    assert!(view.zoom_out(&tree));
    assert_eq!(view.focus(), None);
    assert!(!view.zoom_out(&tree));

    assert_eq!(
        view.zoom_in(&tree, "missing"),
        Err(KnowledgeError::UnknownCategory("missing".to_string()))
    );
}
