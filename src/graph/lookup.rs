// Entity info lookup for option rows.
// Resolves display icons and the bound datasource name per entity kind.

use std::collections::HashMap;

use serde::Serialize;

use super::types::{Action, Datasource, Entity, Plugin, Snapshot};

/// Display info for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityInfo {
    pub name: String,
    pub icon: &'static str,
    /// Only set for actions; empty when the datasource is embedded or unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource_name: Option<String>,
}

/// Icon for a widget type.
pub fn widget_icon(widget_type: &str) -> &'static str {
    match widget_type {
        "INPUT_WIDGET" | "INPUT_WIDGET_V2" => "⌨",
        "TEXT_WIDGET" => "T",
        "BUTTON_WIDGET" => "▭",
        "TABLE_WIDGET" => "▦",
        "CHART_WIDGET" => "📈",
        "DROP_DOWN_WIDGET" | "SELECT_WIDGET" => "▾",
        "CHECKBOX_WIDGET" => "☑",
        "MODAL_WIDGET" => "❐",
        "IMAGE_WIDGET" => "🖼",
        "LIST_WIDGET" => "☰",
        "FORM_WIDGET" | "CONTAINER_WIDGET" => "□",
        _ => "◆",
    }
}

/// Icon for a datasource plugin.
pub fn plugin_icon(plugin: Option<&Plugin>) -> &'static str {
    let Some(plugin) = plugin else {
        return "⚡";
    };
    match plugin.package_name.as_deref() {
        Some("restapi-plugin") => "🌐",
        Some("graphql-plugin") => "◈",
        Some("postgres-plugin") | Some("mysql-plugin") | Some("mssql-plugin") => "🛢",
        Some("mongo-plugin") => "🍃",
        Some("js-plugin") => "JS",
        _ => "⚡",
    }
}

/// Lookup tables built once per snapshot.
#[derive(Debug, Default)]
pub struct EntityInfoLookup<'a> {
    snapshot: Option<&'a Snapshot>,
    actions: HashMap<&'a str, &'a Action>,
    plugins: HashMap<&'a str, &'a Plugin>,
    datasources: HashMap<&'a str, &'a Datasource>,
}

impl<'a> EntityInfoLookup<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            actions: snapshot.actions.iter().map(|a| (a.id.as_str(), a)).collect(),
            plugins: snapshot.plugins.iter().map(|p| (p.id.as_str(), p)).collect(),
            datasources: snapshot
                .datasources
                .iter()
                .map(|d| (d.id.as_str(), d))
                .collect(),
        }
    }

    /// Info for `name`, or `None` for unknown names and unsupported kinds.
    pub fn lookup(&self, name: &str) -> Option<EntityInfo> {
        let entity = self.snapshot?.data_tree.get(name)?;

        match entity {
            Entity::Widget(widget) => Some(EntityInfo {
                name: name.to_string(),
                icon: widget_icon(&widget.widget_type),
                datasource_name: None,
            }),
            Entity::Action(action_entity) => {
                let action = self.actions.get(action_entity.action_id.as_str());
                let icon = plugin_icon(
                    action.and_then(|a| self.plugins.get(a.plugin_id.as_str()).copied()),
                );
                let datasource_name = action
                    .filter(|a| a.datasource.is_stored())
                    .and_then(|a| a.datasource.id.as_deref())
                    .and_then(|id| self.datasources.get(id))
                    .map(|d| d.name.clone())
                    .unwrap_or_default();

                Some(EntityInfo {
                    name: name.to_string(),
                    icon,
                    datasource_name: Some(datasource_name),
                })
            }
            Entity::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        serde_json::from_str(
            r#"{
                "dataTree": {
                    "Table1": { "ENTITY_TYPE": "WIDGET", "type": "TABLE_WIDGET" },
                    "Api1": { "ENTITY_TYPE": "ACTION", "actionId": "a1" },
                    "Query1": { "ENTITY_TYPE": "ACTION", "actionId": "a2" },
                    "Orphan1": { "ENTITY_TYPE": "ACTION", "actionId": "missing" },
                    "theme": { "ENTITY_TYPE": "THEME" }
                },
                "actions": [
                    { "id": "a1", "name": "Api1", "pluginId": "p1", "datasource": { "id": "d1" } },
                    { "id": "a2", "name": "Query1", "pluginId": "p2",
                      "datasource": { "name": "DEFAULT_REST_DATASOURCE" } }
                ],
                "plugins": [
                    { "id": "p1", "name": "REST API", "packageName": "restapi-plugin" },
                    { "id": "p2", "name": "PostgreSQL", "packageName": "postgres-plugin" }
                ],
                "datasources": [{ "id": "d1", "name": "Users API" }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_widget_info() {
        let snapshot = snapshot();
        let lookup = EntityInfoLookup::new(&snapshot);

        let info = lookup.lookup("Table1").unwrap();
        assert_eq!(info.icon, "▦");
        assert_eq!(info.datasource_name, None);
    }

    #[test]
    fn test_action_with_stored_datasource() {
        let snapshot = snapshot();
        let lookup = EntityInfoLookup::new(&snapshot);

        let info = lookup.lookup("Api1").unwrap();
        assert_eq!(info.icon, "🌐");
        assert_eq!(info.datasource_name.as_deref(), Some("Users API"));
    }

    #[test]
    fn test_action_with_embedded_datasource() {
        let snapshot = snapshot();
        let lookup = EntityInfoLookup::new(&snapshot);

        let info = lookup.lookup("Query1").unwrap();
        assert_eq!(info.icon, "🛢");
        assert_eq!(info.datasource_name.as_deref(), Some(""));
    }

    #[test]
    fn test_action_without_record_falls_back() {
        let snapshot = snapshot();
        let lookup = EntityInfoLookup::new(&snapshot);

        let info = lookup.lookup("Orphan1").unwrap();
        assert_eq!(info.icon, "⚡");
        assert_eq!(info.datasource_name.as_deref(), Some(""));
    }

    #[test]
    fn test_unknown_names_and_kinds() {
        let snapshot = snapshot();
        let lookup = EntityInfoLookup::new(&snapshot);

        assert_eq!(lookup.lookup("theme"), None);
        assert_eq!(lookup.lookup("Nope"), None);
        assert_eq!(EntityInfoLookup::default().lookup("Table1"), None);
    }
}
