use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::parsers::export_xml::ExportDoc;

/// Export document and idle-role set a reporting run works from.
pub struct LoadedInputs {
    pub export_path: PathBuf,
    pub doc: ExportDoc,
    pub idle_roles: BTreeSet<String>,
}

pub fn load(export: &Path, roles: &Path) -> Result<LoadedInputs> {
    let doc = ExportDoc::open(export)
        .with_context(|| format!("Failed to load export {}", export.display()))?;
    let idle_roles = load_idle_roles(roles)?;
    Ok(LoadedInputs {
        export_path: export.to_path_buf(),
        doc,
        idle_roles,
    })
}

/// One role name per line; blank lines and `#` comments are skipped.
pub fn load_idle_roles(path: &Path) -> Result<BTreeSet<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read role list {}", path.display()))?;
    Ok(parse_idle_roles(&content))
}

fn parse_idle_roles(content: &str) -> BTreeSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_one_role_per_line() {
        let roles = parse_idle_roles("Engineering\nContractors\n");
        assert_eq!(roles.len(), 2);
        assert!(roles.contains("Engineering"));
    }

    #[test]
    fn skips_blanks_and_comments() {
        let roles = parse_idle_roles("# review 2024-Q3\n\n  Operations  \n\n# done\n");
        assert_eq!(roles.len(), 1);
        assert!(roles.contains("Operations"));
    }

    #[test]
    fn duplicates_collapse() {
        let roles = parse_idle_roles("Guests\nGuests\n");
        assert_eq!(roles.len(), 1);
    }

    #[test]
    fn empty_file_is_a_valid_empty_set() {
        assert!(parse_idle_roles("").is_empty());
    }
}
