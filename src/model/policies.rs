use std::collections::{BTreeMap, BTreeSet};

use crate::schema::GroupSchema;

/// Policy name -> the set of role names the policy references.
pub type PolicyCategoryMap = BTreeMap<String, BTreeSet<String>>;

/// Extracted policy maps for one report group, keyed by category path.
///
/// Built once per group when the export is scanned and read-only
/// afterwards. Every category in the group's schema is present, with or
/// without policies, so downstream consumers never have to special-case
/// unknown keys.
#[derive(Debug, Default)]
pub struct GroupPolicies {
    categories: BTreeMap<String, PolicyCategoryMap>,
}

impl GroupPolicies {
    /// A group whose subtree is absent from the export: every category
    /// present, none with policies.
    pub fn empty(schema: &GroupSchema) -> Self {
        let mut group = Self::default();
        for category in schema.categories {
            group.insert(category.path, PolicyCategoryMap::new());
        }
        group
    }

    pub fn insert(&mut self, category: &str, policies: PolicyCategoryMap) {
        self.categories.insert(category.to_string(), policies);
    }

    pub fn category(&self, category: &str) -> Option<&PolicyCategoryMap> {
        self.categories.get(category)
    }

    /// Total policies across all categories, after filtering.
    pub fn policy_count(&self) -> usize {
        self.categories.values().map(BTreeMap::len).sum()
    }
}
