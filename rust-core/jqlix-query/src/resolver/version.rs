// SPDX-License-Identifier: PMPL-1.0-or-later
//! Project versions.

use std::cmp::Ordering;

use crate::domain::Version;
use crate::resolver::{DomainOrdering, IndexInfoResolver, NameResolver};

/// Resolves version names to ids. A name shared by several projects
/// resolves to every matching id.
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    versions: Vec<Version>,
}

impl VersionResolver {
    pub fn new(versions: Vec<Version>) -> Self {
        Self { versions }
    }

    fn ids_for_name(&self, name: &str) -> Vec<String> {
        let name = name.trim().to_lowercase();
        self.versions
            .iter()
            .filter(|v| v.name.to_lowercase() == name)
            .map(|v| v.id.to_string())
            .collect()
    }

    fn id_if_known(&self, id: i64) -> Option<String> {
        self.versions.iter().any(|v| v.id == id).then(|| id.to_string())
    }
}

impl IndexInfoResolver<Version> for VersionResolver {
    fn indexed_values(&self, raw: &str) -> Vec<String> {
        let ids = self.ids_for_name(raw);
        if !ids.is_empty() {
            return ids;
        }
        raw.trim()
            .parse::<i64>()
            .ok()
            .and_then(|id| self.id_if_known(id))
            .into_iter()
            .collect()
    }

    fn indexed_values_for_number(&self, raw: i64) -> Vec<String> {
        match self.id_if_known(raw) {
            Some(id) => vec![id],
            None => self.ids_for_name(&raw.to_string()),
        }
    }

    fn indexed_value(&self, object: &Version) -> String {
        object.id.to_string()
    }
}

impl NameResolver<Version> for VersionResolver {
    fn get(&self, id: i64) -> Option<Version> {
        self.versions.iter().find(|v| v.id == id).cloned()
    }

    fn all(&self) -> Vec<Version> {
        self.versions.clone()
    }
}

/// Orders versions by sequence, only within one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionOrdering;

impl DomainOrdering<Version> for VersionOrdering {
    fn compare(&self, candidate: &Version, anchor: &Version) -> Option<Ordering> {
        (candidate.project_id == anchor.project_id).then(|| candidate.sequence.cmp(&anchor.sequence))
    }
}
