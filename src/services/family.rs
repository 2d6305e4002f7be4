//! Family service: union family composition and complement derivation.

use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{GraphId, SmallGraph, UnionFamily};
use crate::repositories::SmallGraphRepository;

/// Serializable overview of a union family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionFamilySummary {
    /// Union family ID.
    pub id: GraphId,
    /// Canonical name.
    pub name: String,
    /// Alternative names.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Documentation link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Complement name (if linked).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    /// Subfamily names in insertion order.
    pub subfamilies: Vec<String>,
    /// Whether the family is defined directly.
    pub primary: bool,
}

/// Changes computed from a complement, applied by `FamilyService::apply`.
struct Derivation {
    id: GraphId,
    complement: SmallGraph,
    mirrored: Option<UnionFamily>,
}

/// Service for union family operations over the registry.
pub struct FamilyService<'a> {
    repo: &'a mut SmallGraphRepository,
    config: &'a Config,
}

impl<'a> FamilyService<'a> {
    pub fn new(repo: &'a mut SmallGraphRepository, config: &'a Config) -> Self {
        Self { repo, config }
    }

    /// Append `subfamily` to the union family `union`.
    pub fn add_subfamily(&mut self, union: GraphId, subfamily: GraphId) -> Result<(), AppError> {
        self.repo.resolve(subfamily)?;

        let graph = self.repo.resolve_mut(union)?;
        let name = graph.name().to_string();
        graph
            .as_union_mut()
            .ok_or(AppError::NotAUnionFamily(name))?
            .add_subfamily(subfamily);

        Ok(())
    }

    /// Subfamilies of a union family, `None` if never populated.
    pub fn subfamilies(&self, union: GraphId) -> Result<Option<&[GraphId]>, AppError> {
        let graph = self.repo.resolve(union)?;
        graph
            .as_union()
            .map(|u| u.subfamilies())
            .ok_or_else(|| AppError::NotAUnionFamily(graph.name().to_string()))
    }

    /// Derive the content of `id` from its complement.
    ///
    /// The base step runs for every kind. For a union family whose
    /// complement is a populated union family, slot i of the subfamilies
    /// becomes the complement of the complement's subfamily i. Nothing is
    /// modified when an error is returned.
    pub fn derive_from_complement(&mut self, id: GraphId) -> Result<(), AppError> {
        let derivation = self.plan(id)?;
        self.apply(derivation)
    }

    /// Derive every non-primary small graph whose complement is primary.
    ///
    /// Non-primary entries without a complement are skipped. Every derivation
    /// is computed before any is applied, so on error the registry is
    /// unchanged. Returns the number of derived entries.
    pub fn derive_all(&mut self) -> Result<usize, AppError> {
        let mut pending = Vec::new();
        for graph in self.repo.list().filter(|g| !g.is_primary()) {
            match graph.complement().and_then(|c| self.repo.get(c)) {
                Some(complement) if complement.is_primary() => pending.push(graph.id()),
                Some(_) => {
                    tracing::warn!(name = graph.name(), "Complement is not primary, skipping")
                }
                None => tracing::warn!(name = graph.name(), "No complement, skipping"),
            }
        }

        let derivations = pending
            .into_iter()
            .map(|id| self.plan(id))
            .collect::<Result<Vec<_>, _>>()?;
        let derived = derivations.len();
        for derivation in derivations {
            self.apply(derivation)?;
        }

        tracing::info!(derived, "Derived small graphs from complements");
        Ok(derived)
    }

    /// Compute the derivation of `id` without touching the registry.
    fn plan(&self, id: GraphId) -> Result<Derivation, AppError> {
        let graph = self.repo.resolve(id)?;
        let complement_id = graph
            .complement()
            .ok_or_else(|| AppError::MissingComplement(graph.name().to_string()))?;
        let complement = self.repo.resolve(complement_id)?;

        let mirrored = match (graph.as_union(), complement.as_union()) {
            (Some(target), Some(source)) => {
                let mut union = target.clone();
                let changed = union.mirror(source, |sub: GraphId| self.repo.complement_of(sub))?;
                if !changed {
                    tracing::debug!(
                        name = graph.name(),
                        complement = complement.name(),
                        "Complement has no subfamilies, keeping subfamilies"
                    );
                }
                changed.then_some(union)
            }
            (Some(_), None) => {
                tracing::debug!(
                    name = graph.name(),
                    complement = complement.name(),
                    "Complement is not a union family, keeping subfamilies"
                );
                None
            }
            _ => None,
        };

        Ok(Derivation {
            id,
            complement: complement.clone(),
            mirrored,
        })
    }

    fn apply(&mut self, derivation: Derivation) -> Result<(), AppError> {
        let Derivation {
            id,
            complement,
            mirrored,
        } = derivation;
        let inherit_link = self.config.complement.inherit_link;
        let graph = self.repo.resolve_mut(id)?;

        graph.copy_base_from(&complement, inherit_link);
        if let (Some(union), Some(target)) = (mirrored, graph.as_union_mut()) {
            *target = union;
        }

        tracing::debug!(
            name = graph.name(),
            complement = complement.name(),
            "Derived from complement"
        );
        Ok(())
    }

    /// Human-readable multi-line description of a union family.
    ///
    /// Fails with `GraphNotFound` if the complement or a subfamily is not
    /// registered.
    pub fn describe(&self, id: GraphId) -> Result<String, AppError> {
        let graph = self.repo.resolve(id)?;
        let union = graph
            .as_union()
            .ok_or_else(|| AppError::NotAUnionFamily(graph.name().to_string()))?;

        let missing = &self.config.describe.missing;
        let complement = match graph.complement() {
            Some(c) => self.repo.name_of(c)?,
            None => missing.as_str(),
        };

        union.describe(
            graph.name(),
            |sub: GraphId| self.repo.name_of(sub).map(str::to_string),
            graph.link().unwrap_or(missing.as_str()),
            complement,
            &self.config.describe.separator,
        )
    }

    /// Serializable summary of a union family.
    pub fn summarize(&self, id: GraphId) -> Result<UnionFamilySummary, AppError> {
        let graph = self.repo.resolve(id)?;
        let union = graph
            .as_union()
            .ok_or_else(|| AppError::NotAUnionFamily(graph.name().to_string()))?;

        let subfamilies = union
            .subfamilies()
            .unwrap_or_default()
            .iter()
            .map(|&sub| self.repo.name_of(sub).map(str::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        let complement = graph
            .complement()
            .map(|c| self.repo.name_of(c).map(str::to_string))
            .transpose()?;

        Ok(UnionFamilySummary {
            id,
            name: graph.name().to_string(),
            aliases: graph.aliases().to_vec(),
            link: graph.link().map(str::to_string),
            complement,
            subfamilies,
            primary: graph.is_primary(),
        })
    }

    /// Union families, largest first. Ties keep insertion order.
    pub fn unions_by_size(&self) -> Vec<&SmallGraph> {
        self.repo
            .sorted_by(|g: &SmallGraph| -subfamily_count(g))
            .into_iter()
            .filter(|g| g.as_union().is_some())
            .collect()
    }
}

/// Number of subfamilies, 0 for other kinds.
pub fn subfamily_count(graph: &SmallGraph) -> i32 {
    graph
        .as_union()
        .and_then(|u| u.subfamilies())
        .map_or(0, |s| s.len() as i32)
}
