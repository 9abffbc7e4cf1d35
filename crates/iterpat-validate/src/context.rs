//! Per-pass lookup tables
//!
//! Tag membership is computed once when a pass starts and threaded through
//! every rule check; nothing is cached between passes.

use crate::model::{ElementId, Marker, SymbolModel};
use std::collections::{HashMap, HashSet};

/// `marker -> elements` listing and membership, built once per pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    listed: HashMap<Marker, Vec<ElementId>>,
    members: HashMap<Marker, HashSet<ElementId>>,
}

impl TagIndex {
    pub fn build(model: &dyn SymbolModel) -> Self {
        let mut index = Self::default();
        for marker in Marker::ALL {
            let elements = model.elements_tagged(marker);
            index
                .members
                .insert(marker, elements.iter().copied().collect());
            index.listed.insert(marker, elements);
        }
        index
    }

    /// Elements carrying `marker`, in the model's listing order
    pub fn elements(&self, marker: Marker) -> &[ElementId] {
        self.listed
            .get(&marker)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, marker: Marker, element: ElementId) -> bool {
        self.members
            .get(&marker)
            .is_some_and(|set| set.contains(&element))
    }
}

/// Immutable inputs shared by every check of one pass
pub struct PassContext<'a> {
    pub model: &'a dyn SymbolModel,
    pub tags: TagIndex,
}

impl<'a> PassContext<'a> {
    pub fn new(model: &'a dyn SymbolModel) -> Self {
        Self {
            model,
            tags: TagIndex::build(model),
        }
    }
}
