//! Validation service for checking catalog integrity.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::Config;
use crate::models::{GraphId, SmallGraph};
use crate::repositories::SmallGraphRepository;

/// A validation issue with a small graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Small graph ID.
    pub graph_id: GraphId,
    /// Small graph name.
    pub graph_name: String,
    /// Description of the issue.
    pub issue: String,
}

impl ValidationIssue {
    fn new(graph: &SmallGraph, issue: impl Into<String>) -> Self {
        Self {
            graph_id: graph.id(),
            graph_name: graph.name().to_string(),
            issue: issue.into(),
        }
    }
}

/// Service for validating catalog integrity.
///
/// Checks the complement links and union family structure that complement
/// derivation relies on.
pub struct ValidationService<'a> {
    repo: &'a SmallGraphRepository,
    config: &'a Config,
}

impl<'a> ValidationService<'a> {
    pub fn new(repo: &'a SmallGraphRepository, config: &'a Config) -> Self {
        Self { repo, config }
    }

    /// Run every check.
    pub fn validate_all(&self) -> Vec<ValidationIssue> {
        let mut issues = self.find_dangling_references();
        issues.extend(self.find_asymmetric_complements());
        issues.extend(self.find_empty_unions());
        issues.extend(self.find_subfamilies_without_complement());
        issues.extend(self.find_equivalent_unions());

        if !issues.is_empty() {
            tracing::warn!(count = issues.len(), "Catalog validation found issues");
        }
        issues
    }

    /// Find complements and subfamilies that point at unregistered ids.
    pub fn find_dangling_references(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for graph in self.repo.list() {
            if let Some(c) = graph.complement().filter(|&c| self.repo.get(c).is_none()) {
                issues.push(ValidationIssue::new(
                    graph,
                    format!("Complement {} is not registered", c),
                ));
            }
            for &sub in Self::subfamilies_of(graph) {
                if self.repo.get(sub).is_none() {
                    issues.push(ValidationIssue::new(
                        graph,
                        format!("Subfamily {} is not registered", sub),
                    ));
                }
            }
        }
        issues
    }

    /// Find complement links that do not point back.
    ///
    /// Disabled by `validation.require_symmetric = false`.
    pub fn find_asymmetric_complements(&self) -> Vec<ValidationIssue> {
        if !self.config.validation.require_symmetric {
            return Vec::new();
        }

        self.repo
            .list()
            .filter_map(|graph| {
                let complement = self.repo.get(graph.complement()?)?;
                (complement.complement() != Some(graph.id())).then(|| {
                    ValidationIssue::new(
                        graph,
                        format!(
                            "Complement {} does not have {} as its complement",
                            complement.name(),
                            graph.name()
                        ),
                    )
                })
            })
            .collect()
    }

    /// Find union families that have no subfamilies.
    pub fn find_empty_unions(&self) -> Vec<ValidationIssue> {
        self.repo
            .list()
            .filter(|g| g.as_union().is_some() && Self::subfamilies_of(g).is_empty())
            .map(|g| ValidationIssue::new(g, "Union family has no subfamilies"))
            .collect()
    }

    /// Find subfamilies without a complement in union families that have one.
    ///
    /// Deriving the complement of such a union family would fail.
    pub fn find_subfamilies_without_complement(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for graph in self.repo.list().filter(|g| g.complement().is_some()) {
            for &sub in Self::subfamilies_of(graph) {
                if let Some(sub) = self.repo.get(sub).filter(|s| s.complement().is_none()) {
                    issues.push(ValidationIssue::new(
                        graph,
                        format!("Subfamily {} has no complement", sub.name()),
                    ));
                }
            }
        }
        issues
    }

    /// Find union families with the same set of subfamilies.
    ///
    /// Reported on the later of each pair.
    pub fn find_equivalent_unions(&self) -> Vec<ValidationIssue> {
        self.repo
            .pairs_matching(same_members)
            .into_iter()
            .filter_map(|(first, second)| {
                let first = self.repo.get(first)?;
                let second = self.repo.get(second)?;
                Some(ValidationIssue::new(
                    second,
                    format!("Union family has the same subfamilies as {}", first.name()),
                ))
            })
            .collect()
    }

    fn subfamilies_of(graph: &SmallGraph) -> &[GraphId] {
        graph
            .as_union()
            .and_then(|u| u.subfamilies())
            .unwrap_or_default()
    }
}

/// Whether two populated union families have the same subfamilies,
/// ignoring order and repetition.
pub fn same_members(a: &SmallGraph, b: &SmallGraph) -> bool {
    let members = |g: &SmallGraph| {
        g.as_union()
            .and_then(|u| u.subfamilies())
            .filter(|s| !s.is_empty())
            .map(|s| s.iter().copied().collect::<BTreeSet<_>>())
    };

    match (members(a), members(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
