//! Classification, navigation and text extraction over parsed HTML.

pub mod kind;
pub mod text;
pub mod utils;

pub use kind::{classify, is_kind, kind_of_class, ContainerPart, ElementKind, Level};
pub use text::{collapse_whitespace, compact_text, normalize_whitespace, spaced_text};
pub use utils::{
    ancestors, closest_ancestor, container_bodies, element_children, element_id, find_descendant,
    find_outermost, node_path, preceding_part,
};
