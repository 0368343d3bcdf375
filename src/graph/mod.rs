// Binding graph module.
// Snapshot types, dependency resolution, and entity display lookups.

pub mod lookup;
pub mod options;
pub mod resolver;
pub mod types;

pub use lookup::EntityInfoLookup;
pub use options::{DependencyOption, DependencyOptions, entity_count_label};
pub use resolver::{ConnectionResolver, DependencySets, EdgeIndex, MatchRule, resolve};
pub use types::*;
