// Dropdown option lists for the connections pane.

use serde::Serialize;

use super::resolver::DependencySets;

/// A selectable entry in a connections dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyOption {
    pub label: String,
    pub value: String,
}

impl DependencyOption {
    pub fn new(name: &str) -> Self {
        Self {
            label: name.to_string(),
            value: name.to_string(),
        }
    }
}

/// Option lists for both connection dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyOptions {
    /// Incoming connections.
    pub dependency_options: Vec<DependencyOption>,
    /// Outgoing connections.
    pub inverse_dependency_options: Vec<DependencyOption>,
}

impl DependencyOptions {
    /// Project resolved sets; no selection yields two empty lists.
    pub fn from_sets(sets: Option<&DependencySets>) -> Self {
        let Some(sets) = sets else {
            return Self::default();
        };

        Self {
            dependency_options: to_options(&sets.direct_dependencies),
            inverse_dependency_options: to_options(&sets.inverse_dependencies),
        }
    }
}

fn to_options(names: &[String]) -> Vec<DependencyOption> {
    names.iter().map(|name| DependencyOption::new(name)).collect()
}

/// Trigger text shown on a closed dropdown.
pub fn entity_count_label(count: usize) -> String {
    if count > 0 {
        format!("{} entities", count)
    } else {
        "No Entity".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_selection_gives_empty_lists() {
        let options = DependencyOptions::from_sets(None);
        assert!(options.dependency_options.is_empty());
        assert!(options.inverse_dependency_options.is_empty());
    }

    #[test]
    fn test_projection_keeps_order() {
        let sets = DependencySets {
            direct_dependencies: vec!["Input1".to_string(), "Select1".to_string()],
            inverse_dependencies: vec!["Table1".to_string()],
        };
        let options = DependencyOptions::from_sets(Some(&sets));

        assert_eq!(
            options.dependency_options,
            vec![DependencyOption::new("Input1"), DependencyOption::new("Select1")]
        );
        assert_eq!(options.inverse_dependency_options[0].label, "Table1");
        assert_eq!(options.inverse_dependency_options[0].value, "Table1");
    }

    #[test]
    fn test_entity_count_label() {
        assert_eq!(entity_count_label(0), "No Entity");
        assert_eq!(entity_count_label(3), "3 entities");
    }
}
