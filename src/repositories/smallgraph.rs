//! Small graph repository: the registry owning every catalog entity.

use std::collections::HashMap;

use crate::error::AppError;
use crate::functional::{BinaryPredicate, IntFunction, UnaryFunction};
use crate::models::{GraphId, SmallGraph};

/// In-memory registry of small graphs, keyed by id and by name.
///
/// Names and aliases share one namespace. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct SmallGraphRepository {
    graphs: HashMap<GraphId, SmallGraph>,
    order: Vec<GraphId>,
    names: HashMap<String, GraphId>,
}

impl SmallGraphRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a small graph under all of its names.
    ///
    /// The graph must have at least one name and no complement yet. Complements
    /// are linked afterwards with [`set_complement`](Self::set_complement). An
    /// empty subfamily list is stored as unset.
    pub fn insert(&mut self, mut graph: SmallGraph) -> Result<GraphId, AppError> {
        let id = graph.id();

        if self.graphs.contains_key(&id) {
            return Err(AppError::Validation(format!("Duplicate graph id {}", id)));
        }
        if graph.names().is_empty() {
            return Err(AppError::Validation(format!("Small graph {} has no name", id)));
        }
        if graph.complement().is_some() {
            return Err(AppError::Validation(format!(
                "{} already has a complement, link it with set_complement",
                graph.name()
            )));
        }
        for name in graph.names() {
            Self::check_name(name)?;
            if self.names.contains_key(name) {
                return Err(AppError::DuplicateName(name.clone()));
            }
        }

        if let Some(union) = graph.as_union_mut() {
            union.normalize();
        }
        for name in graph.names() {
            self.names.insert(name.clone(), id);
        }
        tracing::debug!(
            id = %id,
            name = graph.name(),
            kind = graph.kind().tag(),
            "Registered small graph"
        );
        self.order.push(id);
        self.graphs.insert(id, graph);

        Ok(id)
    }

    pub fn get(&self, id: GraphId) -> Option<&SmallGraph> {
        self.graphs.get(&id)
    }

    pub fn get_mut(&mut self, id: GraphId) -> Option<&mut SmallGraph> {
        self.graphs.get_mut(&id)
    }

    /// Get a small graph by id, failing if it is not registered.
    pub fn resolve(&self, id: GraphId) -> Result<&SmallGraph, AppError> {
        self.get(id)
            .ok_or_else(|| AppError::GraphNotFound(id.to_string()))
    }

    pub fn resolve_mut(&mut self, id: GraphId) -> Result<&mut SmallGraph, AppError> {
        self.graphs
            .get_mut(&id)
            .ok_or_else(|| AppError::GraphNotFound(id.to_string()))
    }

    /// Find a small graph by canonical name or alias.
    pub fn find_by_name(&self, name: &str) -> Option<&SmallGraph> {
        self.names.get(name).and_then(|id| self.graphs.get(id))
    }

    /// Id registered for a name or alias.
    pub fn id_of(&self, name: &str) -> Result<GraphId, AppError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| AppError::GraphNotFound(name.to_string()))
    }

    /// Add an alias to a registered small graph.
    pub fn add_alias(&mut self, id: GraphId, alias: &str) -> Result<(), AppError> {
        Self::check_name(alias)?;
        if self.names.contains_key(alias) {
            return Err(AppError::DuplicateName(alias.to_string()));
        }

        self.resolve_mut(id)?.add_name(alias.to_string());
        self.names.insert(alias.to_string(), id);
        Ok(())
    }

    /// Link `a` and `b` as each other's complement.
    ///
    /// Previous partners that still point back at `a` or `b` are unlinked.
    pub fn set_complement(&mut self, a: GraphId, b: GraphId) -> Result<(), AppError> {
        if a == b {
            let name = self.resolve(a)?.name().to_string();
            return Err(AppError::Validation(format!(
                "{} cannot be its own complement",
                name
            )));
        }

        let old_a = self.resolve(a)?.complement();
        let old_b = self.resolve(b)?.complement();

        for (old, owner) in [(old_a, a), (old_b, b)] {
            if let Some(old) = old.filter(|&old| old != a && old != b) {
                if let Some(partner) = self.graphs.get_mut(&old) {
                    if partner.complement() == Some(owner) {
                        partner.set_complement(None);
                    }
                }
            }
        }

        self.resolve_mut(a)?.set_complement(Some(b));
        self.resolve_mut(b)?.set_complement(Some(a));
        tracing::debug!(a = %a, b = %b, "Linked complements");

        Ok(())
    }

    /// Complement of a registered small graph.
    pub fn complement_of(&self, id: GraphId) -> Result<GraphId, AppError> {
        let graph = self.resolve(id)?;
        graph
            .complement()
            .ok_or_else(|| AppError::MissingComplement(graph.name().to_string()))
    }

    /// Name of a registered small graph.
    pub fn name_of(&self, id: GraphId) -> Result<&str, AppError> {
        self.resolve(id).map(SmallGraph::name)
    }

    /// All small graphs in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &SmallGraph> + '_ {
        self.order.iter().filter_map(|id| self.graphs.get(id))
    }

    pub fn ids(&self) -> &[GraphId] {
        &self.order
    }

    /// Small graphs accepted by `filter`, in insertion order.
    pub fn select<P>(&self, filter: P) -> Vec<&SmallGraph>
    where
        P: for<'g> UnaryFunction<&'g SmallGraph, bool>,
    {
        self.list().filter(|g| filter.evaluate(*g)).collect()
    }

    /// Small graphs ordered by `key`. Ties keep insertion order.
    pub fn sorted_by<K>(&self, key: K) -> Vec<&SmallGraph>
    where
        K: IntFunction<SmallGraph>,
    {
        let mut graphs: Vec<_> = self.list().collect();
        graphs.sort_by_key(|g| key.evaluate(*g));
        graphs
    }

    /// Unordered pairs `(earlier, later)` for which `pred` holds.
    pub fn pairs_matching<P>(&self, pred: P) -> Vec<(GraphId, GraphId)>
    where
        P: BinaryPredicate<SmallGraph>,
    {
        let graphs: Vec<_> = self.list().collect();
        let mut pairs = Vec::new();
        for (i, a) in graphs.iter().enumerate() {
            for b in &graphs[i + 1..] {
                if pred.evaluate(a, b) {
                    pairs.push((a.id(), b.id()));
                }
            }
        }
        pairs
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn check_name(name: &str) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "Small graph names must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with(names: &[&str]) -> (SmallGraphRepository, Vec<GraphId>) {
        let mut repo = SmallGraphRepository::new();
        let ids = names
            .iter()
            .map(|name| repo.insert(SmallGraph::graph(*name)).unwrap())
            .collect();
        (repo, ids)
    }

    #[test]
    fn test_insert_and_lookup() {
        let (repo, ids) = repo_with(&["C4", "claw"]);

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.find_by_name("claw").map(SmallGraph::id), Some(ids[1]));
        assert_eq!(repo.id_of("C4").unwrap(), ids[0]);
        assert_eq!(repo.name_of(ids[1]).unwrap(), "claw");
        assert!(repo.find_by_name("K4").is_none());
        assert!(matches!(repo.id_of("K4"), Err(AppError::GraphNotFound(_))));
    }

    #[test]
    fn test_duplicate_and_blank_names_rejected() {
        let (mut repo, ids) = repo_with(&["C4"]);

        let result = repo.insert(SmallGraph::family("C4"));
        assert!(matches!(result, Err(AppError::DuplicateName(name)) if name == "C4"));

        let result = repo.insert(SmallGraph::graph("  "));
        assert!(matches!(result, Err(AppError::Validation(_))));

        repo.add_alias(ids[0], "co-2K2").unwrap();
        assert!(matches!(
            repo.add_alias(ids[0], "co-2K2"),
            Err(AppError::DuplicateName(_))
        ));
        assert_eq!(repo.len(), 1);
    }

    /// Round-trips `graph` through JSON with `edit` applied to the value.
    fn edited(graph: SmallGraph, edit: impl FnOnce(&mut serde_json::Value)) -> SmallGraph {
        let mut value = serde_json::to_value(graph).unwrap();
        edit(&mut value);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_nameless_graph_rejected() {
        let mut repo = SmallGraphRepository::new();
        let graph = edited(SmallGraph::graph("C4"), |v| v["names"] = serde_json::json!([]));

        assert!(matches!(repo.insert(graph), Err(AppError::Validation(_))));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_preset_complement_rejected() {
        let (mut repo, ids) = repo_with(&["C4"]);
        let graph = edited(SmallGraph::graph("2K2"), |v| {
            v["complement"] = serde_json::json!(ids[0].to_string())
        });

        assert!(matches!(repo.insert(graph), Err(AppError::Validation(_))));
        assert!(repo.find_by_name("2K2").is_none());
        assert_eq!(repo.get(ids[0]).unwrap().complement(), None);
    }

    #[test]
    fn test_empty_subfamily_list_stored_as_unset() {
        let mut repo = SmallGraphRepository::new();
        let graph = edited(SmallGraph::union_family("U"), |v| {
            v["kind"]["subfamilies"] = serde_json::json!([])
        });
        assert_eq!(graph.as_union().unwrap().subfamilies(), Some(&[][..]));

        let id = repo.insert(graph).unwrap();

        assert_eq!(repo.get(id).unwrap().as_union().unwrap().subfamilies(), None);
    }

    #[test]
    fn test_alias_resolves_to_same_graph() {
        let (mut repo, ids) = repo_with(&["K1,3"]);
        repo.add_alias(ids[0], "claw").unwrap();

        let graph = repo.find_by_name("claw").unwrap();
        assert_eq!(graph.id(), ids[0]);
        assert_eq!(graph.name(), "K1,3");
        assert_eq!(graph.aliases(), &["claw".to_string()]);
    }

    #[test]
    fn test_set_complement_is_symmetric() {
        let (mut repo, ids) = repo_with(&["C4", "2K2"]);
        repo.set_complement(ids[0], ids[1]).unwrap();

        assert_eq!(repo.complement_of(ids[0]).unwrap(), ids[1]);
        assert_eq!(repo.complement_of(ids[1]).unwrap(), ids[0]);
    }

    #[test]
    fn test_set_complement_unlinks_previous_partner() {
        let (mut repo, ids) = repo_with(&["A", "B", "C"]);
        repo.set_complement(ids[0], ids[1]).unwrap();
        repo.set_complement(ids[0], ids[2]).unwrap();

        assert_eq!(repo.complement_of(ids[0]).unwrap(), ids[2]);
        assert_eq!(repo.complement_of(ids[2]).unwrap(), ids[0]);
        assert!(matches!(
            repo.complement_of(ids[1]),
            Err(AppError::MissingComplement(name)) if name == "B"
        ));
    }

    #[test]
    fn test_self_complement_rejected() {
        let (mut repo, ids) = repo_with(&["C5"]);
        assert!(matches!(
            repo.set_complement(ids[0], ids[0]),
            Err(AppError::Validation(_))
        ));
        assert_eq!(repo.get(ids[0]).unwrap().complement(), None);
    }

    #[test]
    fn test_set_complement_unknown_id() {
        let (mut repo, ids) = repo_with(&["C4"]);
        let result = repo.set_complement(ids[0], GraphId::new());
        assert!(matches!(result, Err(AppError::GraphNotFound(_))));
        assert_eq!(repo.get(ids[0]).unwrap().complement(), None);
    }

    #[test]
    fn test_select_and_sort() {
        let mut repo = SmallGraphRepository::new();
        repo.insert(SmallGraph::graph("P4")).unwrap();
        repo.insert(SmallGraph::family("XF1")).unwrap();
        repo.insert(SmallGraph::union_family("XF2")).unwrap();

        let families: Vec<_> = repo
            .select(|g: &SmallGraph| g.is_family())
            .into_iter()
            .map(SmallGraph::name)
            .collect();
        assert_eq!(families, vec!["XF1", "XF2"]);

        let by_length: Vec<_> = repo
            .sorted_by(|g: &SmallGraph| -(g.name().len() as i32))
            .into_iter()
            .map(SmallGraph::name)
            .collect();
        assert_eq!(by_length, vec!["XF1", "XF2", "P4"]);
    }

    #[test]
    fn test_pairs_matching() {
        let (repo, ids) = repo_with(&["C4", "C5", "P4"]);

        let same_prefix =
            |a: &SmallGraph, b: &SmallGraph| a.name().chars().next() == b.name().chars().next();
        assert_eq!(repo.pairs_matching(same_prefix), vec![(ids[0], ids[1])]);
    }
}
