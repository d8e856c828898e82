use std::path::Path;

use anyhow::{Context, Result};

use crate::model::table::RoleTable;
use crate::schema::{GroupSchema, ROLE_COLUMN};

/// Writes one group's padded role table as a fixed-schema CSV file and
/// returns the number of data rows.
///
/// One row per (role, index) pair. The role name is shown on the role's
/// first row only; later rows carry a single-space placeholder, matching
/// how the padded columns continue past the first line. A zero-width table
/// produces just the header row.
pub fn write_report(path: &Path, schema: &GroupSchema, table: &RoleTable) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = Vec::with_capacity(schema.categories.len() + 1);
    header.push(ROLE_COLUMN);
    header.extend(schema.categories.iter().map(|c| c.header));
    writer
        .write_record(&header)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let mut rows = 0;
    for role in table.roles() {
        for index in 0..table.width() {
            let mut record = Vec::with_capacity(header.len());
            record.push(if index == 0 { role } else { " " });
            for category in schema.categories {
                let entry = table
                    .entries(role, category.path)
                    .get(index)
                    .map(String::as_str)
                    .unwrap_or("");
                record.push(entry);
            }
            writer
                .write_record(&record)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            rows += 1;
        }
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(rows)
}
