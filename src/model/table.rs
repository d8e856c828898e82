use std::collections::BTreeMap;

/// Role -> category -> matched policy names, plus the padded row count.
///
/// The nested maps are wrapped so "make sure this (role, category) slot
/// exists, even when nothing matched" is a named operation; the CSV headers
/// are fixed per group, so a missing slot would shift every column after it.
#[derive(Debug, Default)]
pub struct RoleTable {
    rows: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    width: usize,
}

impl RoleTable {
    /// The entry list for (role, category), created empty if absent.
    pub fn ensure(&mut self, role: &str, category: &str) -> &mut Vec<String> {
        self.rows
            .entry(role.to_string())
            .or_default()
            .entry(category.to_string())
            .or_default()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Category keys present for a role, in map order.
    #[allow(dead_code)]
    pub fn categories(&self, role: &str) -> impl Iterator<Item = &str> {
        self.rows
            .get(role)
            .into_iter()
            .flat_map(|categories| categories.keys().map(String::as_str))
    }

    pub fn entries(&self, role: &str, category: &str) -> &[String] {
        self.rows
            .get(role)
            .and_then(|categories| categories.get(category))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn lists_mut(&mut self) -> impl Iterator<Item = &mut Vec<String>> {
        self.rows.values_mut().flat_map(|categories| categories.values_mut())
    }

    /// Rows each role occupies in the report; 0 until the padding pass ran
    /// or when nothing matched anywhere.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }
}
