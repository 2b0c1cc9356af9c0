// ABOUTME: Zoom state for the circular knowledge brain visualisation
// ABOUTME: Tracks the focused category and derives visible children and the breadcrumb

use leadflow_core::CategoryData;
use tracing::debug;

use crate::error::{KnowledgeError, Result};
use crate::tree::CategoryTree;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrainView {
    focus: Option<String>,
}

impl BrainView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn zoom_in(&mut self, tree: &CategoryTree, category_id: &str) -> Result<()> {
        if tree.get(category_id).is_none() {
            return Err(KnowledgeError::UnknownCategory(category_id.to_string()));
        }
        debug!("Zooming into category {}", category_id);
        self.focus = Some(category_id.to_string());
        Ok(())
    }

    /// Step up to the parent; returns false when already at the top
    pub fn zoom_out(&mut self, tree: &CategoryTree) -> bool {
        let Some(current) = self.focus.take() else {
            return false;
        };
        self.focus = tree.get(&current).and_then(|c| c.parent_id.clone());
        true
    }

    /// Categories drawn around the focus
    pub fn visible<'a>(&self, tree: &'a CategoryTree) -> Vec<&'a CategoryData> {
        match self.focus.as_deref() {
            Some(id) => tree.children(id),
            None => tree.roots(),
        }
    }

    /// Labels from the top level down to the focused category
    pub fn breadcrumb<'a>(&self, tree: &'a CategoryTree) -> Vec<&'a str> {
        let Some(focus) = self.focus.as_deref() else {
            return Vec::new();
        };
        tree.path(focus)
            .into_iter()
            .filter_map(|id| tree.get(id).map(|c| c.label.as_str()))
            .collect()
    }
}
