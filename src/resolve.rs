use std::collections::BTreeSet;

use crate::model::policies::GroupPolicies;
use crate::model::table::RoleTable;
use crate::schema::GroupSchema;

/// Finds, for every idle role, the policies in each category that still
/// reference it.
///
/// Categories are visited in schema order and every (role, category) slot
/// is created even when nothing matches, so the table always lines up with
/// the group's CSV headers. Returns the table together with the list
/// lengths observed while filling it; `pad` needs their maximum. The
/// accumulator lives and dies with this call, so one report can never skew
/// another's padding.
pub fn resolve(
    group: &GroupPolicies,
    schema: &GroupSchema,
    idle_roles: &BTreeSet<String>,
) -> (RoleTable, Vec<usize>) {
    let mut table = RoleTable::default();
    let mut observed = Vec::new();

    for role in idle_roles {
        for category in schema.categories {
            let entries = table.ensure(role, category.path);
            if let Some(policies) = group.category(category.path) {
                for (policy_name, roles) in policies {
                    if roles.contains(role) {
                        entries.push(policy_name.clone());
                    }
                }
            }
            observed.push(entries.len());
        }
    }

    (table, observed)
}

/// Aligns every per-category list to the longest one seen in this run.
///
/// Each list is sorted, then filled up with empty-string entries; the
/// sentinels always follow the real policy names. Policy names are
/// non-empty by construction, so a sentinel can never be mistaken for one.
/// When nothing matched anywhere (`max_len == 0`) the table is returned
/// unchanged and the report degrades to a header-only file.
pub fn pad(mut table: RoleTable, observed: &[usize]) -> RoleTable {
    let max_len = observed.iter().copied().max().unwrap_or(0);
    if max_len == 0 {
        return table;
    }

    table.set_width(max_len);
    for entries in table.lists_mut() {
        entries.sort();
        entries.resize(max_len, String::new());
    }
    table
}
