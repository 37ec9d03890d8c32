use crate::catalog::{CatalogItem, Category};

/* ───────────────────────── criteria ─────────────────────────────── */

/// Per-category checkbox state. Always mirrors the UI controls
/// (controlled form); absence of every flag means "no category filter".
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct CategoryFlags {
    car: bool,
    forest: bool,
    beach: bool,
    watch: bool,
}

impl CategoryFlags {
    pub fn contains(self, category: Category) -> bool {
        match category {
            Category::Car => self.car,
            Category::Forest => self.forest,
            Category::Beach => self.beach,
            Category::Watch => self.watch,
        }
    }

    /// Mutable handle for binding a checkbox to one category.
    pub fn flag_mut(&mut self, category: Category) -> &mut bool {
        match category {
            Category::Car => &mut self.car,
            Category::Forest => &mut self.forest,
            Category::Beach => &mut self.beach,
            Category::Watch => &mut self.watch,
        }
    }

    pub fn is_empty(self) -> bool {
        !(self.car || self.forest || self.beach || self.watch)
    }
}

/// What the user typed and ticked. Mutated freely by the form; only
/// applied to the displayed set on submit.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct FilterCriteria {
    pub tag_query: String,
    pub categories: CategoryFlags,
}

impl FilterCriteria {
    /// Empty criteria means "show all", not "show nothing".
    pub fn is_empty(&self) -> bool {
        self.tag_query.is_empty() && self.categories.is_empty()
    }
}

/* ───────────────────────── filter engine ────────────────────────── */

/// Narrow the catalog to the displayed subset. Returns catalog indices
/// in original order. Tag and category criteria combine with an
/// inclusive OR: a tag hit broadens results independent of the
/// selected categories.
pub fn compute_displayed_set(catalog: &[CatalogItem], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_empty() {
        return (0..catalog.len()).collect();
    }

    let query = criteria.tag_query.to_lowercase();
    catalog
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            let tag_hit =
                !query.is_empty() && item.tags.iter().any(|t| t.eq_ignore_ascii_case(&query));
            tag_hit || criteria.categories.contains(item.category)
        })
        .map(|(idx, _)| idx)
        .collect()
}
