// SPDX-License-Identifier: PMPL-1.0-or-later
//! Issue constants: statuses, priorities, resolutions, issue types.

use std::cmp::Ordering;

use crate::domain::IssueConstant;
use crate::resolver::{DomainOrdering, IndexInfoResolver, NameResolver};

/// Resolves constant names (case-insensitively) or ids to indexed ids.
#[derive(Debug, Clone, Default)]
pub struct ConstantResolver {
    constants: Vec<IssueConstant>,
}

impl ConstantResolver {
    pub fn new(constants: Vec<IssueConstant>) -> Self {
        Self { constants }
    }

    fn ids_for_name(&self, name: &str) -> Vec<String> {
        let name = name.trim().to_lowercase();
        self.constants
            .iter()
            .filter(|c| c.name.to_lowercase() == name)
            .map(|c| c.id.to_string())
            .collect()
    }

    fn id_if_known(&self, id: i64) -> Option<String> {
        self.constants
            .iter()
            .any(|c| c.id == id)
            .then(|| id.to_string())
    }
}

impl IndexInfoResolver<IssueConstant> for ConstantResolver {
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

    fn indexed_value(&self, object: &IssueConstant) -> String {
        object.id.to_string()
    }
}

impl NameResolver<IssueConstant> for ConstantResolver {
    fn get(&self, id: i64) -> Option<IssueConstant> {
        self.constants.iter().find(|c| c.id == id).cloned()
    }

    fn all(&self) -> Vec<IssueConstant> {
        self.constants.clone()
    }
}

/// Orders constants by their sequence.
///
/// Priorities rank inversely: sequence 1 is the highest, so `priority >
/// Major` must select the lower sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceOrdering {
    inverted: bool,
}

impl SequenceOrdering {
    pub fn natural() -> Self {
        Self { inverted: false }
    }

    pub fn inverted() -> Self {
        Self { inverted: true }
    }
}

impl DomainOrdering<IssueConstant> for SequenceOrdering {
    fn compare(&self, candidate: &IssueConstant, anchor: &IssueConstant) -> Option<Ordering> {
        let ordering = candidate.sequence.cmp(&anchor.sequence);
        Some(if self.inverted { ordering.reverse() } else { ordering })
    }
}
