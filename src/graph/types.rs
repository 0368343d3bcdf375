// Editor snapshot types.
// Defines structs for deserializing the data tree, actions, plugins and datasources.

use std::fs;
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::resolver::path_owner;
use crate::error::{BindscopeError, Result};

/// Dependant path to the ordered paths it depends on.
pub type DependencyMap = IndexMap<String, Vec<String>>;

/// Entity name to entity descriptor, in editor order.
pub type DataTree = IndexMap<String, Entity>;

/// Entity kind discriminator, tagged the way the data tree tags it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "ENTITY_TYPE", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Entity {
    Widget(WidgetEntity),
    Action(ActionEntity),
    #[serde(other)]
    Unknown,
}

impl Entity {
    pub fn kind_label(&self) -> &'static str {
        match self {
            Entity::Widget(_) => "Widget",
            Entity::Action(_) => "Action",
            Entity::Unknown => "Unknown",
        }
    }
}

/// Widget entry in the data tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEntity {
    #[serde(rename = "type")]
    pub widget_type: String,
}

/// Action entry in the data tree. The full action lives in `Snapshot::actions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEntity {
    pub action_id: String,
}

/// API or query action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub id: String,
    pub name: String,
    pub plugin_id: String,
    #[serde(default)]
    pub datasource: DatasourceRef,
}

/// Datasource bound to an action. Stored datasources carry an id,
/// embedded ones only carry inline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl DatasourceRef {
    pub fn is_stored(&self) -> bool {
        self.id.is_some()
    }
}

/// Datasource plugin (REST API, Postgres, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub package_name: Option<String>,
}

/// Stored datasource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub id: String,
    pub name: String,
}

/// Read-only snapshot of the editor state the inspector works on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub data_tree: DataTree,
    #[serde(default)]
    pub inverse_dependency_map: DependencyMap,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub datasources: Vec<Datasource>,
}

impl Snapshot {
    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(BindscopeError::SnapshotNotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        Ok(snapshot)
    }

    /// Entity names sorted for display.
    pub fn entity_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data_tree.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains_entity(&self, name: &str) -> bool {
        self.data_tree.contains_key(name)
    }

    /// Owners referenced by the dependency map that the data tree does not
    /// know, in first-seen order. A non-empty result means the map is stale.
    pub fn missing_entities(&self) -> Vec<String> {
        let mut missing = IndexSet::new();
        for (dependant, dependencies) in &self.inverse_dependency_map {
            for path in std::iter::once(dependant).chain(dependencies) {
                let owner = path_owner(path);
                if !owner.is_empty() && !self.contains_entity(owner) {
                    missing.insert(owner.to_string());
                }
            }
        }
        missing.into_iter().collect()
    }
}
