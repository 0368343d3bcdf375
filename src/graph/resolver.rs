// Dependency resolution for the connections pane.
// Derives incoming and outgoing entity connections from the dependency map.

use std::collections::HashMap;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use super::types::DependencyMap;

/// Separators between an entity name and the rest of a property path.
const PATH_SEPARATORS: [char; 2] = ['.', '['];

/// Name of the entity owning a path: its first component.
pub fn path_owner(path: &str) -> &str {
    path.split(PATH_SEPARATORS).next().unwrap_or(path)
}

/// How a path is decided to belong to the queried entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchRule {
    /// The entity name occurs anywhere in the path. `Text1` also matches
    /// `Text10.value`; this is what the editor has always shown.
    #[default]
    Substring,
    /// The path's owning entity is exactly the queried entity.
    EntityBoundary,
}

impl MatchRule {
    pub fn belongs(&self, path: &PathRef, entity: &str) -> bool {
        match self {
            MatchRule::Substring => path.path.contains(entity),
            MatchRule::EntityBoundary => path.owner == entity,
        }
    }
}

/// A path together with the entity that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRef {
    pub owner: String,
    pub path: String,
}

impl PathRef {
    pub fn new(path: &str) -> Self {
        Self {
            owner: path_owner(path).to_string(),
            path: path.to_string(),
        }
    }
}

/// One `dependant -> dependency` edge of the dependency map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub dependant: PathRef,
    pub dependency: PathRef,
}

/// Entities connected to a queried entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencySets {
    /// Entities the queried entity depends on ("incoming connections").
    pub direct_dependencies: Vec<String>,
    /// Entities that depend on the queried entity ("outgoing connections").
    pub inverse_dependencies: Vec<String>,
}

impl DependencySets {
    pub fn is_empty(&self) -> bool {
        self.direct_dependencies.is_empty() && self.inverse_dependencies.is_empty()
    }
}

/// Flattened edges of a dependency map, with owners split out once.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    edges: Vec<Edge>,
}

impl EdgeIndex {
    /// Flatten a dependency map, keeping map order and list order.
    pub fn build(deps: &DependencyMap) -> Self {
        let edges = deps
            .iter()
            .flat_map(|(dependant, dependencies)| {
                let dependant = PathRef::new(dependant);
                dependencies.iter().map(move |dependency| Edge {
                    dependant: dependant.clone(),
                    dependency: PathRef::new(dependency),
                })
            })
            .collect();
        Self { edges }
    }

    /// Resolve the connections of `entity_name`. `None` when no entity is selected.
    pub fn resolve(&self, entity_name: Option<&str>, rule: MatchRule) -> Option<DependencySets> {
        let entity = entity_name.filter(|name| !name.is_empty())?;

        let mut direct = IndexSet::new();
        let mut inverse = IndexSet::new();

        for edge in &self.edges {
            let dependant_in = rule.belongs(&edge.dependant, entity);
            let dependency_in = rule.belongs(&edge.dependency, entity);

            match (dependant_in, dependency_in) {
                (true, false) => insert_owner(&mut direct, &edge.dependency, entity),
                (false, true) => insert_owner(&mut inverse, &edge.dependant, entity),
                // Self references and unrelated edges.
                _ => {}
            }
        }

        Some(DependencySets {
            direct_dependencies: direct.into_iter().collect(),
            inverse_dependencies: inverse.into_iter().collect(),
        })
    }
}

fn insert_owner(set: &mut IndexSet<String>, path: &PathRef, entity: &str) {
    if !path.owner.is_empty() && path.owner != entity {
        set.insert(path.owner.clone());
    }
}

/// Resolve connections straight from a dependency map with the default rule.
pub fn resolve(deps: &DependencyMap, entity_name: Option<&str>) -> Option<DependencySets> {
    EdgeIndex::build(deps).resolve(entity_name, MatchRule::default())
}

/// Memoizing resolver over the current dependency map.
///
/// Results are keyed on the entity name and dropped whenever the map or
/// the match rule changes.
#[derive(Debug, Default)]
pub struct ConnectionResolver {
    index: EdgeIndex,
    rule: MatchRule,
    revision: u64,
    memo: HashMap<String, DependencySets>,
}

impl ConnectionResolver {
    /// Replace the dependency map, invalidating memoized results.
    pub fn set_map(&mut self, deps: &DependencyMap) {
        self.index = EdgeIndex::build(deps);
        self.revision += 1;
        self.memo.clear();
        debug!(
            revision = self.revision,
            edges = self.index.edges.len(),
            "rebuilt dependency edge index"
        );
    }

    pub fn set_rule(&mut self, rule: MatchRule) {
        if self.rule != rule {
            self.rule = rule;
            self.memo.clear();
        }
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    /// Revision of the current map; bumps on every `set_map`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn resolve(&mut self, entity_name: Option<&str>) -> Option<DependencySets> {
        let entity = entity_name.filter(|name| !name.is_empty())?;

        if let Some(sets) = self.memo.get(entity) {
            return Some(sets.clone());
        }

        let sets = self.index.resolve(Some(entity), self.rule)?;
        self.memo.insert(entity.to_string(), sets.clone());
        Some(sets)
    }

    /// Number of memoized entities, for diagnostics.
    pub fn cached_entries(&self) -> usize {
        self.memo.len()
    }
}
