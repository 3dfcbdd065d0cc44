//! Static mapping of dashboard paths to the roles allowed to open them.
//!
//! Role checks here drive routing only. The backend enforces authorization on
//! every API call regardless of what this table says.

use crate::session::Role;

/// Root of the role-gated application.
pub const DASHBOARD_ROOT: &str = "/dashboard";

/// Path prefix excluded from the edge gate.
pub const API_ROOT: &str = "/api";

/// A path prefix and the roles permitted under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub roles: Vec<Role>,
}

impl RouteRule {
    pub fn new(prefix: impl Into<String>, roles: &[Role]) -> Self {
        Self {
            prefix: prefix.into(),
            roles: roles.to_vec(),
        }
    }

    /// Whether `role` is on the allow-list. An unknown role is never allowed.
    pub fn allows(&self, role: Option<Role>) -> bool {
        role.is_some_and(|role| self.roles.contains(&role))
    }
}

/// Ordered route rules under a common application root.
#[derive(Debug, Clone)]
pub struct RouteTable {
    root: String,
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(root: impl Into<String>, rules: Vec<RouteRule>) -> Self {
        Self {
            root: root.into(),
            rules,
        }
    }

    /// The exam dashboard's rules.
    pub fn dashboard() -> Self {
        use Role::{Admin, Professor, Student};

        Self::new(
            DASHBOARD_ROOT,
            vec![
                RouteRule::new("/dashboard/users", &[Admin]),
                RouteRule::new("/dashboard/classes", &[Admin]),
                RouteRule::new("/dashboard/my-classes/create", &[Admin]),
                RouteRule::new("/dashboard/exams", &[Professor, Admin]),
                RouteRule::new("/dashboard/my-classes", &[Professor, Admin]),
                RouteRule::new("/dashboard/my-exams", &[Student]),
                RouteRule::new("/dashboard/results", &[Student]),
                RouteRule::new("/dashboard/exams/create", &[Professor, Admin]),
                RouteRule::new("/dashboard/exams/edit", &[Professor, Admin]),
            ],
        )
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Rule governing `path`, or `None` when the path is unprotected.
    ///
    /// An exact key wins. Otherwise the longest key that prefixes `path`
    /// applies; the bare root never acts as a prefix.
    pub fn rule_for(&self, path: &str) -> Option<&RouteRule> {
        if let Some(rule) = self.rules.iter().find(|rule| rule.prefix == path) {
            return Some(rule);
        }

        self.rules
            .iter()
            .filter(|rule| rule.prefix != self.root && path.starts_with(rule.prefix.as_str()))
            .max_by_key(|rule| rule.prefix.len())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::dashboard()
    }
}
