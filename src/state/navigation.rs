// Navigation state management.
// Tracks the entities visited through the connections pane as a breadcrumb trail.

/// A node in the navigation breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbNode {
    /// Entity name shown in the trail.
    pub label: String,
}

/// Stack of visited entities (bottom = first selected, top = current).
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    stack: Vec<String>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entity, if any was selected.
    pub fn current(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    /// Visit an entity. Visiting the current entity again is a no-op.
    pub fn push(&mut self, entity: &str) -> bool {
        if self.current() == Some(entity) {
            return false;
        }
        self.stack.push(entity.to_string());
        true
    }

    /// Go back to the previously visited entity. Returns false at the root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Get the breadcrumb trail.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbNode> {
        self.stack
            .iter()
            .map(|label| BreadcrumbNode {
                label: label.clone(),
            })
            .collect()
    }

    /// Forget the trail, e.g. after loading another snapshot.
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_stack() {
        let mut nav = NavigationStack::new();

        assert!(nav.breadcrumbs().is_empty());
        assert_eq!(nav.current(), None);
        assert!(!nav.pop());

        assert!(nav.push("Input1"));
        assert!(nav.push("Api1"));
        assert_eq!(nav.breadcrumbs().len(), 2);

        // Re-visiting the current entity does not grow the trail
        assert!(!nav.push("Api1"));
        assert_eq!(nav.breadcrumbs().len(), 2);

        assert!(nav.pop());
        assert_eq!(nav.current(), Some("Input1"));

        // Can't pop past root
        assert!(!nav.pop());
        assert_eq!(nav.breadcrumbs().len(), 1);
    }

    #[test]
    fn test_breadcrumbs() {
        let mut nav = NavigationStack::new();
        nav.push("Input1");
        nav.push("Api1");
        nav.push("Table1");

        let breadcrumbs = nav.breadcrumbs();
        assert_eq!(breadcrumbs.len(), 3);
        assert_eq!(breadcrumbs[0].label, "Input1");
        assert_eq!(breadcrumbs[2].label, "Table1");

        nav.clear();
        assert!(nav.breadcrumbs().is_empty());
    }
}
