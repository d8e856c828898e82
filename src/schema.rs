use anyhow::{anyhow, Result};

/// One policy category inside a report group: where its policy elements
/// live in the export tree, which CSV column it feeds, and how its role
/// references are spelled.
#[derive(Debug)]
pub struct CategorySpec {
    /// Slash-separated element path below the document root.
    pub path: &'static str,
    /// CSV column header.
    pub header: &'static str,
    /// Child element carrying one role reference. Most categories use
    /// "roles"; Windows file and VPN bandwidth policies use "role".
    pub role_field: &'static str,
    /// Parent-scoped categories keep only policies whose parent-type is
    /// "none"; detail rules riding on a parent policy are excluded.
    pub parent_scoped: bool,
}

/// A report group: subtree root, output file, and ordered columns.
#[derive(Debug)]
pub struct GroupSchema {
    pub name: &'static str,
    pub root: &'static str,
    pub file_name: &'static str,
    pub categories: &'static [CategorySpec],
}

/// Header of the leading role column in every report.
pub const ROLE_COLUMN: &str = "Roles";

const ROLES: &str = "roles";
const ROLE: &str = "role";

const fn parent(path: &'static str, header: &'static str, role_field: &'static str) -> CategorySpec {
    CategorySpec {
        path,
        header,
        role_field,
        parent_scoped: true,
    }
}

const fn flat(path: &'static str, header: &'static str, role_field: &'static str) -> CategorySpec {
    CategorySpec {
        path,
        header,
        role_field,
        parent_scoped: false,
    }
}

pub const GROUPS: &[GroupSchema] = &[
    GroupSchema {
        name: "web",
        root: "users/resource-policies/web",
        file_name: "web-policies.csv",
        categories: &[
            parent("users/resource-policies/web/acl", "Web ACL", ROLES),
            parent("users/resource-policies/web/sso-basic", "SSO Basic/NTLM", ROLES),
            parent("users/resource-policies/web/sso-post", "SSO Form POST", ROLES),
            parent("users/resource-policies/web/sso-headers", "SSO Headers", ROLES),
            parent("users/resource-policies/web/caching", "Caching", ROLES),
            parent("users/resource-policies/web/java-acl", "Java ACL", ROLES),
            parent("users/resource-policies/web/code-signing", "Java Code Signing", ROLES),
            parent(
                "users/resource-policies/web/selective-rewrite",
                "Selective Rewriting",
                ROLES,
            ),
            parent("users/resource-policies/web/compression", "Compression", ROLES),
            parent("users/resource-policies/web/launch-jsam", "Launch JSAM", ROLES),
            parent(
                "users/resource-policies/web/client-auth",
                "Client Authentication",
                ROLES,
            ),
            flat("users/resource-policies/web/saml-acl", "SAML ACL", ROLES),
            flat("users/resource-policies/web/saml-sso", "SAML SSO", ROLES),
            flat("users/resource-policies/web/custom-header", "Custom Headers", ROLES),
            flat(
                "users/resource-policies/web/cross-domain",
                "Cross Domain Access",
                ROLES,
            ),
            flat("users/resource-policies/web/web-proxy", "Web Proxy", ROLES),
            flat("users/resource-policies/web/protocol", "Protocol", ROLES),
            flat("users/resource-policies/web/encoding", "Encoding", ROLES),
            flat(
                "users/resource-policies/web/saml-external",
                "SAML External Apps SSO",
                ROLES,
            ),
        ],
    },
    GroupSchema {
        name: "file",
        root: "users/resource-policies/file",
        file_name: "file-policies.csv",
        categories: &[
            parent("users/resource-policies/file/win-acl", "Windows ACL", ROLE),
            parent("users/resource-policies/file/win-sso", "Windows SSO", ROLE),
            parent(
                "users/resource-policies/file/win-compression",
                "Windows Compression",
                ROLE,
            ),
        ],
    },
    GroupSchema {
        name: "sam",
        root: "users/resource-policies/sam",
        file_name: "sam-policies.csv",
        categories: &[parent("users/resource-policies/sam/acl", "SAM ACL", ROLES)],
    },
    GroupSchema {
        name: "terminal-services",
        root: "users/resource-policies/terminal-services",
        file_name: "terminal-services-policies.csv",
        categories: &[parent(
            "users/resource-policies/terminal-services/acl",
            "Terminal Services ACL",
            ROLES,
        )],
    },
    GroupSchema {
        name: "html5",
        root: "users/resource-policies/html5",
        file_name: "html5-policies.csv",
        categories: &[parent("users/resource-policies/html5/acl", "HTML5 ACL", ROLES)],
    },
    GroupSchema {
        name: "vpn-tunnel",
        root: "users/resource-policies/network-connect",
        file_name: "vpn-tunnel-policies.csv",
        categories: &[
            flat(
                "users/resource-policies/network-connect/acl",
                "VPN Tunneling ACL",
                ROLES,
            ),
            flat(
                "users/resource-policies/network-connect/connection-profile",
                "Connection Profiles",
                ROLES,
            ),
            flat(
                "users/resource-policies/network-connect/split-tunnel",
                "Split Tunneling",
                ROLES,
            ),
            flat(
                "users/resource-policies/network-connect/bandwidth",
                "Bandwidth Policies",
                ROLE,
            ),
            flat(
                "users/resource-policies/network-connect/node-connection-profile",
                "Node Connection Profiles",
                ROLES,
            ),
        ],
    },
];

/// Resolve `--group` names to schemas; an empty selection means all groups.
pub fn select(names: &[String]) -> Result<Vec<&'static GroupSchema>> {
    if names.is_empty() {
        return Ok(GROUPS.iter().collect());
    }
    names
        .iter()
        .map(|name| {
            GROUPS.iter().find(|g| g.name == name).ok_or_else(|| {
                anyhow!(
                    "Unknown report group '{}' (expected one of: {})",
                    name,
                    GROUPS
                        .iter()
                        .map(|g| g.name)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
        })
        .collect()
}
