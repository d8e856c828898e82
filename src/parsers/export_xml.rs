use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::BTreeSet;
use std::path::Path;

use crate::model::policies::PolicyCategoryMap;
use crate::schema::CategorySpec;

/// An exported configuration tree, held in memory for the lifetime of a
/// reporting run.
///
/// Well-formedness is checked once on open; the per-category extractors can
/// then scan without re-validating. Paths are slash-separated element names
/// below the document root, so `users/resource-policies/web/acl` addresses
/// every `<acl>` policy element at that position.
#[derive(Debug)]
pub struct ExportDoc {
    content: String,
}

impl ExportDoc {
    pub fn open(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_xml(content)
    }

    pub fn from_xml(content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        check_well_formed(&content)?;
        Ok(Self { content })
    }

    /// Whether an element exists at the given path. Groups whose subtree is
    /// absent from the export degrade to empty rather than failing.
    pub fn has_subtree(&self, path: &str) -> bool {
        let want: Vec<&str> = path.split('/').collect();
        let mut reader = Reader::from_str(&self.content);
        let mut stack: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Err(_) | Ok(Event::Eof) => return false,
                Ok(Event::Start(e)) => {
                    let name = local_name(&e);
                    if path_matches(&stack, &name, &want) {
                        return true;
                    }
                    stack.push(name);
                }
                Ok(Event::Empty(e)) => {
                    if path_matches(&stack, &local_name(&e), &want) {
                        return true;
                    }
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                _ => {}
            }
        }
    }

    /// Extracts the category's policies as policy name -> role-name set.
    ///
    /// Policies with apply="all" are skipped; they are not per-role
    /// dependencies. For parent-scoped categories only policies whose
    /// parent-type is "none" are kept, which drops detail rules riding on a
    /// parent policy. Role references are the text of repeated child
    /// elements named by the category's role field.
    pub fn extract_policies(&self, spec: &CategorySpec) -> Result<PolicyCategoryMap> {
        let want: Vec<&str> = spec.path.split('/').collect();
        let mut reader = Reader::from_str(&self.content);
        let mut stack: Vec<String> = Vec::new();
        let mut policies = PolicyCategoryMap::new();

        let mut capture: Option<PolicyCapture> = None;
        // Stack depth of the policy element while one is being captured.
        let mut capture_depth = 0;
        let mut field: Option<String> = None;
        let mut text = String::new();

        loop {
            match reader.read_event() {
                Err(e) => anyhow::bail!(
                    "XML parse error at position {}: {}",
                    reader.error_position(),
                    e
                ),
                Ok(Event::Eof) => break,
                Ok(Event::Start(e)) => {
                    let name = local_name(&e);
                    if capture.is_none() && path_matches(&stack, &name, &want) {
                        capture = Some(PolicyCapture::default());
                        capture_depth = stack.len() + 1;
                    } else if capture.is_some() && stack.len() == capture_depth {
                        // Direct child of the policy element.
                        field = Some(name.clone());
                        text.clear();
                    }
                    stack.push(name);
                }
                Ok(Event::Empty(e)) => {
                    // An empty policy element has no name child and is
                    // skipped; an empty field child carries no text.
                    if capture.is_some() && stack.len() == capture_depth {
                        if let Some(cap) = capture.as_mut() {
                            cap.set_field(&local_name(&e), "", spec.role_field);
                        }
                    }
                }
                Ok(Event::Text(e)) => {
                    if field.is_some() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Ok(Event::End(_)) => {
                    let Some(name) = stack.pop() else { continue };
                    if capture.is_none() {
                        continue;
                    }
                    if stack.len() + 1 == capture_depth {
                        // Closing the policy element itself.
                        if let Some(cap) = capture.take() {
                            if let Some((policy_name, roles)) = cap.into_policy(spec) {
                                policies.insert(policy_name, roles);
                            }
                        }
                        field = None;
                    } else if stack.len() == capture_depth
                        && field.as_deref() == Some(name.as_str())
                    {
                        if let Some(cap) = capture.as_mut() {
                            cap.set_field(&name, text.trim(), spec.role_field);
                        }
                        field = None;
                    }
                }
                _ => {}
            }
        }

        Ok(policies)
    }
}

/// Fields of one policy element while its children are being read.
#[derive(Default)]
struct PolicyCapture {
    name: Option<String>,
    apply: Option<String>,
    parent_type: Option<String>,
    roles: BTreeSet<String>,
}

impl PolicyCapture {
    fn set_field(&mut self, field: &str, value: &str, role_field: &str) {
        if field == role_field {
            if !value.is_empty() {
                self.roles.insert(value.to_string());
            }
            return;
        }
        match field {
            "name" => self.name = Some(value.to_string()),
            "apply" => self.apply = Some(value.to_string()),
            "parent-type" => self.parent_type = Some(value.to_string()),
            _ => {}
        }
    }

    /// Applies the category's filters; None when the policy is excluded or
    /// carries no name.
    fn into_policy(self, spec: &CategorySpec) -> Option<(String, BTreeSet<String>)> {
        let name = self.name.filter(|n| !n.is_empty())?;
        if self.apply.as_deref() == Some("all") {
            return None;
        }
        if spec.parent_scoped && self.parent_type.as_deref() != Some("none") {
            return None;
        }
        Some((name, self.roles))
    }
}

/// True when `stack` (root element included) plus `name` spells `want`.
fn path_matches(stack: &[String], name: &str, want: &[&str]) -> bool {
    stack.len() == want.len()
        && name == want[want.len() - 1]
        && stack.iter().skip(1).zip(want).all(|(have, expect)| have == expect)
}

/// Check that the export parses as XML end to end.
fn check_well_formed(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Err(e) => anyhow::bail!(
                "XML error at position {}: {}",
                reader.error_position(),
                e
            ),
            _ => {}
        }
    }
    Ok(())
}

fn local_name(e: &quick_xml::events::BytesStart<'_>) -> String {
    let full = String::from_utf8_lossy(e.name().as_ref()).to_string();
    // Strip namespace prefix if present
    full.rsplit(':').next().unwrap_or(&full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CategorySpec;

    const ACL: CategorySpec = CategorySpec {
        path: "users/resource-policies/web/acl",
        header: "Web ACL",
        role_field: "roles",
        parent_scoped: true,
    };

    const SAML_ACL: CategorySpec = CategorySpec {
        path: "users/resource-policies/web/saml-acl",
        header: "SAML ACL",
        role_field: "roles",
        parent_scoped: false,
    };

    const WIN_ACL: CategorySpec = CategorySpec {
        path: "users/resource-policies/file/win-acl",
        header: "Windows ACL",
        role_field: "role",
        parent_scoped: true,
    };

    fn doc(xml: &str) -> ExportDoc {
        ExportDoc::from_xml(xml).unwrap()
    }

    #[test]
    fn extracts_policies_with_role_sets() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <web>
                <acl>
                  <name>Intranet</name>
                  <apply>selected</apply>
                  <parent-type>none</parent-type>
                  <roles>Engineering</roles>
                  <roles>Contractors</roles>
                </acl>
                <acl>
                  <name>Extranet</name>
                  <apply>selected</apply>
                  <parent-type>none</parent-type>
                  <roles>Partners</roles>
                </acl>
              </web>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&ACL).unwrap();
        assert_eq!(policies.len(), 2);
        let intranet = &policies["Intranet"];
        assert!(intranet.contains("Engineering"));
        assert!(intranet.contains("Contractors"));
        assert_eq!(policies["Extranet"].len(), 1);
    }

    #[test]
    fn apply_all_policies_are_skipped() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <web>
                <acl>
                  <name>Everyone</name>
                  <apply>all</apply>
                  <parent-type>none</parent-type>
                  <roles>Engineering</roles>
                </acl>
                <acl>
                  <name>Selected</name>
                  <apply>selected</apply>
                  <parent-type>none</parent-type>
                  <roles>Engineering</roles>
                </acl>
              </web>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&ACL).unwrap();
        assert_eq!(policies.len(), 1);
        assert!(policies.contains_key("Selected"));
    }

    #[test]
    fn parent_scoped_category_drops_detail_rules() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <web>
                <acl>
                  <name>Top Level</name>
                  <apply>selected</apply>
                  <parent-type>none</parent-type>
                  <roles>Engineering</roles>
                </acl>
                <acl>
                  <name>Detail Rule</name>
                  <apply>selected</apply>
                  <parent-type>web-acl</parent-type>
                  <roles>Engineering</roles>
                </acl>
                <acl>
                  <name>No Parent Type</name>
                  <apply>selected</apply>
                  <roles>Engineering</roles>
                </acl>
              </web>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&ACL).unwrap();
        assert_eq!(policies.len(), 1);
        assert!(policies.contains_key("Top Level"));
    }

    #[test]
    fn flat_category_ignores_parent_type() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <web>
                <saml-acl>
                  <name>Partner SAML</name>
                  <apply>selected</apply>
                  <roles>Partners</roles>
                </saml-acl>
              </web>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&SAML_ACL).unwrap();
        assert_eq!(policies.len(), 1);
    }

    #[test]
    fn singular_role_field_variant() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <file>
                <win-acl>
                  <name>Team Share</name>
                  <apply>selected</apply>
                  <parent-type>none</parent-type>
                  <role>Contractors</role>
                  <roles>IgnoredSpelling</roles>
                </win-acl>
              </file>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&WIN_ACL).unwrap();
        let share = &policies["Team Share"];
        assert_eq!(share.len(), 1);
        assert!(share.contains("Contractors"));
    }

    #[test]
    fn policy_without_roles_yields_empty_set() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <web>
                <acl>
                  <name>Orphan</name>
                  <apply>selected</apply>
                  <parent-type>none</parent-type>
                </acl>
              </web>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&ACL).unwrap();
        assert!(policies["Orphan"].is_empty());
    }

    #[test]
    fn path_must_match_exactly() {
        // An <acl> somewhere else in the tree must not be picked up.
        let doc = doc(r#"
        <configuration>
          <users>
            <acl>
              <name>Wrong Place</name>
              <apply>selected</apply>
              <parent-type>none</parent-type>
            </acl>
            <resource-policies>
              <web/>
            </resource-policies>
          </users>
        </configuration>
        "#);

        let policies = doc.extract_policies(&ACL).unwrap();
        assert!(policies.is_empty());
    }

    #[test]
    fn has_subtree_finds_present_roots() {
        let doc = doc(r#"
        <configuration>
          <users>
            <resource-policies>
              <web><acl><name>A</name></acl></web>
            </resource-policies>
          </users>
        </configuration>
        "#);

        assert!(doc.has_subtree("users/resource-policies/web"));
        assert!(!doc.has_subtree("users/resource-policies/html5"));
    }

    #[test]
    fn has_subtree_matches_empty_elements() {
        let doc = doc("<configuration><users><resource-policies><sam/></resource-policies></users></configuration>");
        assert!(doc.has_subtree("users/resource-policies/sam"));
    }

    #[test]
    fn malformed_export_is_rejected_on_open() {
        let err = ExportDoc::from_xml("<configuration><users></configuration>").unwrap_err();
        assert!(err.to_string().contains("XML error"));
    }
}
