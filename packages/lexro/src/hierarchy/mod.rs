//! Book / title / chapter / section / subsection hierarchy.
//!
//! Containers are discovered from the ancestors of each article. They are
//! created the first time an article inside them is seen, registered by
//! source id, and linked to their parent exactly once.

pub mod arena;
pub mod resolver;

pub use arena::{ContainerArena, ContainerNode};
pub use resolver::{section_number, HierarchyResolver, Placement};
