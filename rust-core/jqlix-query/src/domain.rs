// SPDX-License-Identifier: PMPL-1.0-or-later
//! Domain objects that clause values are resolved against.

use serde::{Deserialize, Serialize};

use crate::error::TranslateError;

/// A named constant with an id and a display order: status, priority,
/// resolution, issue type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueConstant {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sequence: i64,
}

impl IssueConstant {
    pub fn new(id: i64, name: impl Into<String>, sequence: i64) -> Self {
        Self {
            id,
            name: name.into(),
            sequence,
        }
    }
}

/// A project version. Names are only unique within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub sequence: i64,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub archived: bool,
}

impl Version {
    pub fn new(id: i64, project_id: i64, name: impl Into<String>, sequence: i64) -> Self {
        Self {
            id,
            project_id,
            name: name.into(),
            sequence,
            released: false,
            archived: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable key; what the index stores.
    pub key: String,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// The universes of known domain objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainCatalog {
    pub statuses: Vec<IssueConstant>,
    pub priorities: Vec<IssueConstant>,
    pub resolutions: Vec<IssueConstant>,
    pub issue_types: Vec<IssueConstant>,
    pub versions: Vec<Version>,
    pub users: Vec<User>,
}

impl DomainCatalog {
    pub fn from_json(json: &str) -> Result<Self, TranslateError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_json() {
        let catalog = DomainCatalog::from_json(
            r#"{
                "statuses": [{"id": 1, "name": "Open"}],
                "versions": [{"id": 5, "project_id": 10, "name": "1.0", "sequence": 1, "released": true}],
                "users": [{"key": "fred", "username": "fred", "display_name": "Fred Flintstone"}]
            }"#,
        )
        .unwrap();
        assert_eq!(catalog.statuses, vec![IssueConstant::new(1, "Open", 0)]);
        assert!(catalog.versions[0].released);
        assert!(!catalog.versions[0].archived);
        assert_eq!(catalog.users[0].email, None);
        assert!(catalog.priorities.is_empty());
    }

    #[test]
    fn test_catalog_rejects_malformed_json() {
        assert!(DomainCatalog::from_json(r#"{"statuses": [{"name": "Open"}]}"#).is_err());
    }
}
