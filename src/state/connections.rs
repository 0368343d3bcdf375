// Connections pane state management.
// Handles the entity explorer list and the incoming/outgoing connection dropdowns.

use ratatui::widgets::ListState;

use crate::graph::{DependencyOption, DependencyOptions};

/// Load state for snapshot-backed data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// State for a selectable list with keyboard navigation.
#[derive(Debug, Clone)]
pub struct SelectableList<T> {
    pub items: Vec<T>,
    pub list_state: ListState,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            list_state: ListState::default(),
        }
    }
}

impl<T> SelectableList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Select the next item in the list.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.items.len() - 1 {
                    i // Stay at end
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous item in the list.
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Get the selected item.
    pub fn selected_item(&self) -> Option<&T> {
        let index = self.list_state.selected()?;
        self.items.get(index)
    }

    /// Reset selection to first item.
    pub fn reset_selection(&mut self) {
        if self.items.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }

    /// Replace the items and select the first one.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.reset_selection();
    }

    /// Select the first item matching `pred`, keeping the selection otherwise.
    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        match self.items.iter().position(pred) {
            Some(i) => {
                self.list_state.select(Some(i));
                true
            }
            None => false,
        }
    }
}

/// Which connections dropdown is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dropdown {
    Incoming,
    Outgoing,
}

impl Dropdown {
    pub fn header_label(&self) -> &'static str {
        match self {
            Dropdown::Incoming => "Incoming connections",
            Dropdown::Outgoing => "Outgoing connections",
        }
    }
}

/// State of the connections pane for the selected entity.
#[derive(Debug, Default)]
pub struct ConnectionsPane {
    /// Entity whose connections are shown.
    pub entity: Option<String>,
    /// Entities the selected entity depends on.
    pub incoming: SelectableList<DependencyOption>,
    /// Entities depending on the selected entity.
    pub outgoing: SelectableList<DependencyOption>,
    /// Dropdown currently open, if any.
    pub open: Option<Dropdown>,
}

impl ConnectionsPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the connections of `entity`.
    pub fn set_entity(&mut self, entity: Option<&str>, options: DependencyOptions) {
        self.entity = entity.map(str::to_string);
        self.incoming.set_items(options.dependency_options);
        self.outgoing.set_items(options.inverse_dependency_options);
        self.open = None;
    }

    pub fn list(&self, dropdown: Dropdown) -> &SelectableList<DependencyOption> {
        match dropdown {
            Dropdown::Incoming => &self.incoming,
            Dropdown::Outgoing => &self.outgoing,
        }
    }

    pub fn list_mut(&mut self, dropdown: Dropdown) -> &mut SelectableList<DependencyOption> {
        match dropdown {
            Dropdown::Incoming => &mut self.incoming,
            Dropdown::Outgoing => &mut self.outgoing,
        }
    }

    /// A dropdown with no options is disabled.
    pub fn is_enabled(&self, dropdown: Dropdown) -> bool {
        !self.list(dropdown).is_empty()
    }

    /// Open a dropdown. Returns false when it is disabled.
    pub fn open(&mut self, dropdown: Dropdown) -> bool {
        if !self.is_enabled(dropdown) {
            return false;
        }
        self.list_mut(dropdown).reset_selection();
        self.open = Some(dropdown);
        true
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn select_next(&mut self) {
        if let Some(dropdown) = self.open {
            self.list_mut(dropdown).select_next();
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(dropdown) = self.open {
            self.list_mut(dropdown).select_prev();
        }
    }

    /// Close the open dropdown and return the value of its selected option.
    pub fn confirm(&mut self) -> Option<String> {
        let dropdown = self.open.take()?;
        self.list(dropdown)
            .selected_item()
            .map(|option| option.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencySets;

    fn options(direct: &[&str], inverse: &[&str]) -> DependencyOptions {
        let sets = DependencySets {
            direct_dependencies: direct.iter().map(|s| s.to_string()).collect(),
            inverse_dependencies: inverse.iter().map(|s| s.to_string()).collect(),
        };
        DependencyOptions::from_sets(Some(&sets))
    }

    #[test]
    fn test_selectable_list_navigation() {
        let mut list = SelectableList::new();
        list.select_next();
        assert_eq!(list.list_state.selected(), None);

        list.set_items(vec!["a", "b", "c"]);
        assert_eq!(list.list_state.selected(), Some(0));

        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected_item(), Some(&"c"));

        list.select_prev();
        assert_eq!(list.selected_item(), Some(&"b"));

        assert!(list.select_where(|s| *s == "a"));
        assert_eq!(list.list_state.selected(), Some(0));
        assert!(!list.select_where(|s| *s == "z"));
        assert_eq!(list.list_state.selected(), Some(0));
    }

    #[test]
    fn test_disabled_dropdown_does_not_open() {
        let mut pane = ConnectionsPane::new();
        pane.set_entity(Some("Input1"), options(&[], &["Api1"]));

        assert!(!pane.is_enabled(Dropdown::Incoming));
        assert!(!pane.open(Dropdown::Incoming));
        assert_eq!(pane.open, None);

        assert!(pane.open(Dropdown::Outgoing));
        assert_eq!(pane.open, Some(Dropdown::Outgoing));
    }

    #[test]
    fn test_confirm_returns_selected_entity() {
        let mut pane = ConnectionsPane::new();
        pane.set_entity(Some("Text1"), options(&["Api1", "Query1"], &[]));

        assert!(pane.open(Dropdown::Incoming));
        pane.select_next();

        assert_eq!(pane.confirm(), Some("Query1".to_string()));
        assert_eq!(pane.open, None);
        assert_eq!(pane.confirm(), None);
    }

    #[test]
    fn test_no_selection_clears_lists() {
        let mut pane = ConnectionsPane::new();
        pane.set_entity(Some("Text1"), options(&["Api1"], &["Chart1"]));
        pane.set_entity(None, DependencyOptions::from_sets(None));

        assert_eq!(pane.entity, None);
        assert!(pane.incoming.is_empty());
        assert!(pane.outgoing.is_empty());
    }

    #[test]
    fn test_loading_state() {
        let state: LoadingState<u32> = LoadingState::Loaded(3);
        assert_eq!(state.data(), Some(&3));
        assert_eq!(LoadingState::<u32>::Error("x".into()).data(), None);
    }
}
