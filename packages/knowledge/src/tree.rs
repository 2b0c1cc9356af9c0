// ABOUTME: Arena of knowledge categories keyed by id with optional parent links
// ABOUTME: Aggregates entries into categories and keeps the parent graph acyclic

use std::collections::{HashMap, HashSet};

use leadflow_core::{
    generate_id, CategoryData, CreateCategoryInput, CustomCategory, KnowledgeEntry,
};
use tracing::{debug, info, warn};

use crate::error::{KnowledgeError, Result};

/// Catch-all bucket for entries whose category no longer exists
pub const UNCATEGORIZED: &str = "uncategorized";

/// Categories every agent account starts with
pub const BUILT_IN_CATEGORIES: [(&str, &str); 5] = [
    ("buyer-stories", "Buyer stories"),
    ("seller-stories", "Seller stories"),
    ("market-tips", "Market tips"),
    ("general", "General"),
    (UNCATEGORIZED, "Uncategorized"),
];

#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    categories: HashMap<String, CategoryData>,
    /// Insertion order, for stable listings
    order: Vec<String>,
}

impl CategoryTree {
    /// Tree holding only the built-in categories
    pub fn new() -> Self {
        let mut tree = Self::default();
        for (id, label) in BUILT_IN_CATEGORIES {
            tree.insert(CategoryData {
                id: id.to_string(),
                label: label.to_string(),
                count: 0,
                items: Vec::new(),
                is_custom: false,
                parent_id: None,
            });
        }
        tree
    }

    /// Aggregate a flat entry list under built-in and custom categories.
    ///
    /// Custom categories with a missing or cyclic parent become roots, and
    /// entries pointing at unknown categories land in [`UNCATEGORIZED`], so
    /// every entry is counted exactly once.
    pub fn build(entries: Vec<KnowledgeEntry>, custom: &[CustomCategory]) -> Self {
        let mut tree = Self::new();

        for category in custom {
            if tree.categories.contains_key(&category.id) {
                warn!("Skipping duplicate category definition {}", category.id);
                continue;
            }
            tree.insert(custom_data(category.id.clone(), category.label.clone(), None));
        }

        for category in custom {
            let Some(parent) = category.parent_id.as_deref() else {
                continue;
            };
            if let Err(e) = tree.reparent(&category.id, Some(parent)) {
                warn!("Keeping category {} at the root: {}", category.id, e);
            }
        }

        let entry_count = entries.len();
        for entry in entries {
            tree.assign(entry);
        }

        info!(
            "Aggregated {} knowledge entries into {} categories",
            entry_count,
            tree.len()
        );
        tree
    }

    fn insert(&mut self, category: CategoryData) {
        self.order.push(category.id.clone());
        self.categories.insert(category.id.clone(), category);
    }

    fn assign(&mut self, entry: KnowledgeEntry) {
        let id = if self.categories.contains_key(&entry.category) {
            entry.category.clone()
        } else {
            debug!(
                "Entry {} references unknown category {}",
                entry.id, entry.category
            );
            UNCATEGORIZED.to_string()
        };

        if let Some(category) = self.categories.get_mut(&id) {
            category.items.push(entry);
            category.count = category.items.len();
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CategoryData> {
        self.categories.get(id)
    }

    pub fn categories(&self) -> impl Iterator<Item = &CategoryData> {
        self.order.iter().filter_map(|id| self.categories.get(id))
    }

    pub fn roots(&self) -> Vec<&CategoryData> {
        self.categories()
            .filter(|category| category.parent_id.is_none())
            .collect()
    }

    pub fn children(&self, parent_id: &str) -> Vec<&CategoryData> {
        self.categories()
            .filter(|category| category.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    /// Entries in this category and all of its descendants
    pub fn total_count(&self, id: &str) -> usize {
        let mut visited = HashSet::new();
        let mut stack = vec![id];
        let mut total = 0;

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(category) = self.categories.get(current) {
                total += category.count;
            }
            stack.extend(self.children(current).into_iter().map(|c| c.id.as_str()));
        }

        total
    }

    /// Ids from the root down to `id`, inclusive
    pub fn path(&self, id: &str) -> Vec<&str> {
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = self.categories.get(id);

        while let Some(category) = current {
            if !visited.insert(category.id.as_str()) {
                break;
            }
            path.push(category.id.as_str());
            current = category
                .parent_id
                .as_deref()
                .and_then(|parent| self.categories.get(parent));
        }

        path.reverse();
        path
    }

    /// Entries matching `query` in any category, in category order
    pub fn search(&self, query: &str) -> Vec<&KnowledgeEntry> {
        self.categories()
            .flat_map(|category| category.items.iter())
            .filter(|entry| entry.matches(query))
            .collect()
    }

    /// Validate and add a locally created custom category, returning its id
    pub fn add_custom_category(&mut self, input: &CreateCategoryInput) -> Result<String> {
        let id = generate_id("cat");
        self.insert_custom(CustomCategory {
            id: id.clone(),
            label: input.label.clone(),
            description: input.description.clone(),
            icon: input.icon.clone(),
            color: input.color.clone(),
            parent_id: input.parent_id.clone(),
        })?;
        Ok(id)
    }

    /// Validate and add a custom category whose id is already known
    pub fn insert_custom(&mut self, category: CustomCategory) -> Result<()> {
        let label = category.label.trim();
        if label.is_empty() {
            return Err(KnowledgeError::EmptyLabel);
        }
        if self.categories.contains_key(&category.id) {
            return Err(KnowledgeError::DuplicateCategory(category.id));
        }
        if let Some(parent) = category.parent_id.as_deref() {
            self.check_parent(&category.id, parent)?;
        }

        info!("Adding custom category '{}' ({})", label, category.id);
        self.insert(custom_data(
            category.id,
            label.to_string(),
            category.parent_id,
        ));
        Ok(())
    }

    /// Move a custom category under a new parent, or to the root with `None`
    pub fn reparent(&mut self, id: &str, parent_id: Option<&str>) -> Result<()> {
        let category = self
            .categories
            .get(id)
            .ok_or_else(|| KnowledgeError::UnknownCategory(id.to_string()))?;
        if !category.is_custom {
            return Err(KnowledgeError::BuiltIn(id.to_string()));
        }
        if let Some(parent) = parent_id {
            self.check_parent(id, parent)?;
        }

        debug!("Moving category {} under {:?}", id, parent_id);
        if let Some(category) = self.categories.get_mut(id) {
            category.parent_id = parent_id.map(str::to_string);
        }
        Ok(())
    }

    /// The parent must exist and must not have `id` among its ancestors
    fn check_parent(&self, id: &str, parent: &str) -> Result<()> {
        if !self.categories.contains_key(parent) {
            return Err(KnowledgeError::UnknownParent(parent.to_string()));
        }

        let cycle = || KnowledgeError::Cycle {
            category: id.to_string(),
            parent: parent.to_string(),
        };

        let mut visited = HashSet::new();
        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if ancestor == id || !visited.insert(ancestor) {
                return Err(cycle());
            }
            current = self
                .categories
                .get(ancestor)
                .and_then(|c| c.parent_id.as_deref());
        }

        Ok(())
    }
}

fn custom_data(id: String, label: String, parent_id: Option<String>) -> CategoryData {
    CategoryData {
        id,
        label,
        count: 0,
        items: Vec::new(),
        is_custom: true,
        parent_id,
    }
}
