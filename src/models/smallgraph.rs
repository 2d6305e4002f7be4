//! Small graph model: the base entity shared by graphs and graph families.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::Note;
use crate::error::AppError;
use crate::functional::UnaryFunction;

/// Registry key of a small graph (ULID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(Ulid);

impl GraphId {
    /// Generates a new id.
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GraphId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|e| AppError::Validation(format!("Invalid graph id '{}': {}", s, e)))
    }
}

/// Variant of a small graph entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphKind {
    /// A single named graph (e.g. C4, claw).
    Graph,
    /// A named collection of graphs.
    Family,
    /// A family given as the union of other small graphs.
    UnionFamily(UnionFamily),
}

impl GraphKind {
    /// Short type tag for log fields ("graph", "family", "union").
    pub fn tag(&self) -> &'static str {
        match self {
            GraphKind::Graph => "graph",
            GraphKind::Family => "family",
            GraphKind::UnionFamily(_) => "union",
        }
    }
}

/// Subfamily list of a union family.
///
/// `None` until the first subfamily is added or copied from a complement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionFamily {
    subfamilies: Option<Vec<GraphId>>,
}

impl UnionFamily {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subfamily. Duplicates are kept.
    pub fn add_subfamily(&mut self, subfamily: GraphId) {
        self.subfamilies
            .get_or_insert_with(|| Vec::with_capacity(2))
            .push(subfamily);
    }

    /// Subfamilies in insertion order, or `None` if never populated.
    pub fn subfamilies(&self) -> Option<&[GraphId]> {
        self.subfamilies.as_deref()
    }

    /// Resets an empty subfamily list to unset.
    pub(crate) fn normalize(&mut self) {
        if self.subfamilies.as_ref().is_some_and(Vec::is_empty) {
            self.subfamilies = None;
        }
    }

    /// Rebuilds the subfamilies from `source`, mapping each of its
    /// subfamilies through `complement_of`.
    ///
    /// Returns `Ok(false)` and leaves `self` unchanged when `source` has no
    /// subfamilies. On error `self` is also unchanged.
    pub fn mirror<F>(&mut self, source: &UnionFamily, complement_of: F) -> Result<bool, AppError>
    where
        F: UnaryFunction<GraphId, Result<GraphId, AppError>>,
    {
        let Some(subfamilies) = source.subfamilies().filter(|s| !s.is_empty()) else {
            return Ok(false);
        };

        let mirrored = subfamilies
            .iter()
            .map(|&id| complement_of.evaluate(id))
            .collect::<Result<Vec<_>, _>>()?;

        self.subfamilies = Some(mirrored);
        Ok(true)
    }

    /// Formats the multi-line description of the family named `name`.
    ///
    /// Each subfamily name is followed by `separator`, including the last.
    /// The first error from `subfamily_name` is returned.
    pub fn describe<F>(
        &self,
        name: &str,
        subfamily_name: F,
        link: &str,
        complement: &str,
        separator: &str,
    ) -> Result<String, AppError>
    where
        F: UnaryFunction<GraphId, Result<String, AppError>>,
    {
        let subfamilies = match self.subfamilies() {
            Some(subfamilies) if !subfamilies.is_empty() => subfamilies,
            _ => return Err(AppError::EmptySubfamilies(name.to_string())),
        };

        let mut s = format!("Name: {}\nSubfamilies: ", name);
        for &id in subfamilies {
            s.push_str(&subfamily_name.evaluate(id)?);
            s.push_str(separator);
        }
        s.push_str(&format!("\nLink: {}\nComplement: {}", link, complement));
        Ok(s)
    }
}

/// A small graph or graph family in the catalog.
///
/// The first name is canonical, the rest are aliases. The complement is a
/// key into the owning registry, never an owned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallGraph {
    id: GraphId,
    names: Vec<String>,
    link: Option<String>,
    complement: Option<GraphId>,
    primary: bool,
    notes: Vec<Note>,
    kind: GraphKind,
}

impl SmallGraph {
    /// Creates a primary entity of the given kind.
    pub fn new(name: impl Into<String>, kind: GraphKind) -> Self {
        Self {
            id: GraphId::new(),
            names: vec![name.into()],
            link: None,
            complement: None,
            primary: true,
            notes: Vec::new(),
            kind,
        }
    }

    pub fn graph(name: impl Into<String>) -> Self {
        Self::new(name, GraphKind::Graph)
    }

    /// Creates an empty family.
    pub fn family(name: impl Into<String>) -> Self {
        Self::new(name, GraphKind::Family)
    }

    /// Creates a union family without subfamilies.
    pub fn union_family(name: impl Into<String>) -> Self {
        Self::new(name, GraphKind::UnionFamily(UnionFamily::new()))
    }

    /// Builder-style link setter.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Builder-style marker for entities derived from their complement.
    pub fn derived(mut self) -> Self {
        self.primary = false;
        self
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Canonical name, empty if the entity has no names.
    pub fn name(&self) -> &str {
        self.names.first().map_or("", String::as_str)
    }

    /// Canonical name followed by all aliases.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn aliases(&self) -> &[String] {
        self.names.get(1..).unwrap_or_default()
    }

    /// Adds an alias. Uniqueness is checked by the registry.
    pub(crate) fn add_name(&mut self, name: String) {
        self.names.push(name);
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn set_link(&mut self, link: Option<String>) {
        self.link = link;
    }

    pub fn complement(&self) -> Option<GraphId> {
        self.complement
    }

    /// Complement links are kept symmetric by the registry.
    pub(crate) fn set_complement(&mut self, complement: Option<GraphId>) {
        self.complement = complement;
    }

    /// Whether this entity is defined directly rather than derived from
    /// its complement.
    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    pub fn kind(&self) -> &GraphKind {
        &self.kind
    }

    /// True for families and union families.
    pub fn is_family(&self) -> bool {
        matches!(self.kind, GraphKind::Family | GraphKind::UnionFamily(_))
    }

    pub fn as_union(&self) -> Option<&UnionFamily> {
        match &self.kind {
            GraphKind::UnionFamily(union) => Some(union),
            _ => None,
        }
    }

    pub fn as_union_mut(&mut self) -> Option<&mut UnionFamily> {
        match &mut self.kind {
            GraphKind::UnionFamily(union) => Some(union),
            _ => None,
        }
    }

    /// Base step of the complement derivation, shared by all variants.
    pub fn copy_base_from(&mut self, complement: &SmallGraph, inherit_link: bool) {
        if inherit_link && self.link.is_none() {
            self.link = complement.link.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_family_starts_unset() {
        let union = UnionFamily::new();
        assert_eq!(union.subfamilies(), None);
    }

    #[test]
    fn test_add_subfamily_keeps_order_and_duplicates() {
        let (a, b) = (GraphId::new(), GraphId::new());
        let mut union = UnionFamily::new();
        union.add_subfamily(a);
        union.add_subfamily(b);
        union.add_subfamily(a);

        assert_eq!(union.subfamilies(), Some(&[a, b, a][..]));
    }

    #[test]
    fn test_mirror_from_unset_source_is_noop() {
        let existing = GraphId::new();
        let mut union = UnionFamily::new();
        union.add_subfamily(existing);

        let changed = union
            .mirror(&UnionFamily::new(), |_: GraphId| -> Result<GraphId, AppError> {
                panic!("no subfamilies to map")
            })
            .unwrap();

        assert!(!changed);
        assert_eq!(union.subfamilies(), Some(&[existing][..]));
    }

    #[test]
    fn test_mirror_error_leaves_target_unchanged() {
        let mut source = UnionFamily::new();
        source.add_subfamily(GraphId::new());

        let mut union = UnionFamily::new();
        let result = union.mirror(&source, |id: GraphId| {
            Err(AppError::MissingComplement(id.to_string()))
        });

        assert!(matches!(result, Err(AppError::MissingComplement(_))));
        assert_eq!(union.subfamilies(), None);
    }

    #[test]
    fn test_describe_requires_subfamilies() {
        let union = UnionFamily::new();
        let result = union.describe(
            "U",
            |id: GraphId| -> Result<String, AppError> { Ok(id.to_string()) },
            "L1",
            "C",
            "; ",
        );
        assert!(matches!(result, Err(AppError::EmptySubfamilies(name)) if name == "U"));
    }

    #[test]
    fn test_describe_format() {
        let (a, b) = (GraphId::new(), GraphId::new());
        let mut union = UnionFamily::new();
        union.add_subfamily(a);
        union.add_subfamily(b);

        let name_of = |id: GraphId| -> Result<String, AppError> {
            Ok(if id == a { "A" } else { "B" }.to_string())
        };
        let text = union.describe("U", name_of, "L1", "C", "; ").unwrap();

        assert_eq!(text, "Name: U\nSubfamilies: A; B; \nLink: L1\nComplement: C");

        let unknown = |id: GraphId| -> Result<String, AppError> {
            Err(AppError::GraphNotFound(id.to_string()))
        };
        assert!(matches!(
            union.describe("U", unknown, "L1", "C", "; "),
            Err(AppError::GraphNotFound(_))
        ));
    }

    #[test]
    fn test_mirror_from_empty_source_is_noop() {
        let source: UnionFamily =
            serde_json::from_value(serde_json::json!({ "subfamilies": [] })).unwrap();
        let mut union = UnionFamily::new();

        let changed = union
            .mirror(&source, |id: GraphId| -> Result<GraphId, AppError> { Ok(id) })
            .unwrap();

        assert!(!changed);
        assert_eq!(union.subfamilies(), None);
    }

    #[test]
    fn test_nameless_graph_accessors_do_not_panic() {
        let mut value = serde_json::to_value(SmallGraph::graph("C4")).unwrap();
        value["names"] = serde_json::json!([]);
        let graph: SmallGraph = serde_json::from_value(value).unwrap();

        assert_eq!(graph.name(), "");
        assert!(graph.aliases().is_empty());
    }

    #[test]
    fn test_copy_base_inherits_missing_link_only() {
        let complement = SmallGraph::family("co-F").with_link("smallgraphs.html#F");

        let mut derived = SmallGraph::family("F").derived();
        derived.copy_base_from(&complement, true);
        assert_eq!(derived.link(), Some("smallgraphs.html#F"));
        assert!(!derived.is_primary());

        let mut own = SmallGraph::family("G").with_link("own");
        own.copy_base_from(&complement, true);
        assert_eq!(own.link(), Some("own"));

        let mut disabled = SmallGraph::family("H");
        disabled.copy_base_from(&complement, false);
        assert_eq!(disabled.link(), None);
    }

    #[test]
    fn test_kind_tags_and_accessors() {
        assert_eq!(SmallGraph::graph("C4").kind().tag(), "graph");
        assert_eq!(SmallGraph::family("F").kind().tag(), "family");

        let mut union = SmallGraph::union_family("U");
        assert_eq!(union.kind().tag(), "union");
        assert!(union.is_family());
        assert!(union.as_union_mut().is_some());
        assert!(SmallGraph::family("F").as_union().is_none());
        assert!(!SmallGraph::graph("C4").is_family());
    }

    #[test]
    fn test_serialized_shape() {
        let mut graph = SmallGraph::union_family("U");
        graph.add_note(Note::new(Some("text"), None));
        let value = serde_json::to_value(&graph).unwrap();

        assert_eq!(value["names"], serde_json::json!(["U"]));
        assert_eq!(value["kind"]["type"], "union_family");
        assert_eq!(value["kind"]["subfamilies"], serde_json::Value::Null);
        assert_eq!(value["id"], graph.id().to_string());
        assert_eq!(value["notes"][0]["text"], "text");
    }

    #[test]
    fn test_graph_id_parse() {
        let id = GraphId::new();
        assert_eq!(id.to_string().parse::<GraphId>().unwrap(), id);
        assert!("not-a-ulid".parse::<GraphId>().is_err());
    }
}
