use std::path::Path;

use serde::Deserialize;

/// Configuration loaded from a `.rolecheckrc` TOML file.
///
/// Looked up first next to the export file, then in `$HOME`. CLI flags
/// always take precedence over file values.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RcConfig {
    pub output_dir: Option<String>,
    pub group: Option<Vec<String>>,
    pub verbose: Option<bool>,
    pub json: Option<bool>,
    pub no_color: Option<bool>,
}

impl RcConfig {
    /// Load `.rolecheckrc` from the export's directory, falling back to `$HOME`.
    pub fn load(export_dir: &Path) -> Self {
        let candidates = [
            Some(export_dir.join(".rolecheckrc")),
            dirs_home().map(|h| h.join(".rolecheckrc")),
        ];

        for candidate in candidates.iter().flatten() {
            if let Ok(contents) = std::fs::read_to_string(candidate) {
                if let Ok(cfg) = toml::from_str::<RcConfig>(&contents) {
                    return cfg;
                }
            }
        }

        RcConfig::default()
    }
}

fn dirs_home() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME").map(std::path::PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields() {
        let cfg: RcConfig = toml::from_str(
            r#"
            output_dir = "reports"
            group = ["web", "file"]
            verbose = true
            json = false
            no_color = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.output_dir.as_deref(), Some("reports"));
        assert_eq!(
            cfg.group.as_deref(),
            Some(&["web".to_string(), "file".to_string()][..])
        );
        assert_eq!(cfg.verbose, Some(true));
        assert_eq!(cfg.no_color, Some(true));
    }

    #[test]
    fn missing_fields_stay_unset() {
        let cfg: RcConfig = toml::from_str("verbose = true").unwrap();
        assert!(cfg.output_dir.is_none());
        assert!(cfg.group.is_none());
        assert_eq!(cfg.verbose, Some(true));
    }
}
