//! Arena of structural containers.
//!
//! All containers of one parse live in a single `Vec`, addressed by index.
//! Each level has its own key → index registry, and every node stores its
//! parent index, so "already attached" is a field check rather than a scan
//! of the parent's children.

use std::collections::HashMap;

use crate::dom::Level;
use crate::types::{Book, Chapter, Section, Subsection, Title};

/// A container while the hierarchy is being assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerNode {
    pub level: Level,
    /// Registry key: the source id, or a synthesized key when the source
    /// element has none.
    pub key: String,
    /// Identifier written to the output.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// Nesting level of sections (dotted segments or structural depth).
    pub section_level: u32,
    pub placeholder: bool,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub articles: Vec<String>,
}

impl ContainerNode {
    /// Create a container found in the source.
    pub fn new(level: Level, key: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            level,
            key: key.into(),
            id: id.into(),
            title: String::new(),
            description: None,
            section_level: 1,
            placeholder: false,
            parent: None,
            children: Vec::new(),
            articles: Vec::new(),
        }
    }

    /// Create a synthetic container standing in for a missing level.
    pub fn placeholder(level: Level, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            placeholder: true,
            ..Self::new(level, id.clone(), id)
        }
    }
}

/// Containers of one parse, with per-level registries.
#[derive(Debug, Default)]
pub struct ContainerArena {
    nodes: Vec<ContainerNode>,
    registries: HashMap<Level, HashMap<String, usize>>,
    /// Numbered sections keyed by enclosing container and dotted number.
    numbered: HashMap<(Option<usize>, String), usize>,
}

impl ContainerArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a container by index.
    pub fn get(&self, index: usize) -> Option<&ContainerNode> {
        self.nodes.get(index)
    }

    /// Get a container by index for update.
    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut ContainerNode> {
        self.nodes.get_mut(index)
    }

    /// Look up a registered container.
    pub fn lookup(&self, level: Level, key: &str) -> Option<usize> {
        self.registries.get(&level)?.get(key).copied()
    }

    /// Register a new container and return its index.
    ///
    /// A container already registered under the same level and key is
    /// returned instead, so a source element is never instantiated twice.
    pub fn insert(&mut self, node: ContainerNode) -> usize {
        if let Some(existing) = self.lookup(node.level, &node.key) {
            return existing;
        }
        let index = self.nodes.len();
        self.registries
            .entry(node.level)
            .or_default()
            .insert(node.key.clone(), index);
        self.nodes.push(node);
        index
    }

    /// Register a section under its dotted number within `scope`.
    ///
    /// The first section registered under a number keeps it.
    pub fn register_number(&mut self, scope: Option<usize>, number: &str, index: usize) {
        self.numbered
            .entry((scope, number.to_string()))
            .or_insert(index);
    }

    /// Find a section by its dotted number within `scope`.
    pub fn numbered(&self, scope: Option<usize>, number: &str) -> Option<usize> {
        self.numbered.get(&(scope, number.to_string())).copied()
    }

    /// Whether the container already has a parent.
    pub fn is_attached(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(|node| node.parent.is_some())
    }

    /// Attach `child` under `parent`.
    ///
    /// A container is attached at most once; later calls for an attached
    /// child are no-ops and return `false`. Attachments that would create
    /// a cycle are refused.
    pub fn attach(&mut self, parent: usize, child: usize) -> bool {
        if parent >= self.nodes.len() || child >= self.nodes.len() {
            return false;
        }
        if self.nodes[child].parent.is_some() || self.is_ancestor_or_self(child, parent) {
            return false;
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        true
    }

    fn is_ancestor_or_self(&self, candidate: usize, node: usize) -> bool {
        let mut current = Some(node);
        while let Some(index) = current {
            if index == candidate {
                return true;
            }
            current = self.nodes.get(index).and_then(|n| n.parent);
        }
        false
    }

    /// Record an article directly owned by a container.
    pub fn push_article(&mut self, index: usize, article_id: &str) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.articles.push(article_id.to_string());
        }
    }

    /// Materialize the book trees, in registration order.
    ///
    /// Containers that never reached a book are not part of the result;
    /// their articles remain available in the flat article list.
    pub fn into_books(self) -> Vec<Book> {
        let orphans = self
            .nodes
            .iter()
            .filter(|node| node.parent.is_none() && node.level != Level::Book)
            .count();
        if orphans > 0 {
            tracing::debug!(orphans, "Containers outside any book left out of the hierarchy");
        }

        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.level == Level::Book && node.parent.is_none())
            .map(|(index, _)| self.book(index))
            .collect()
    }

    fn children_at(&self, index: usize, level: Level) -> impl Iterator<Item = usize> + '_ {
        self.nodes[index]
            .children
            .iter()
            .copied()
            .filter(move |child| self.nodes[*child].level == level)
    }

    fn book(&self, index: usize) -> Book {
        let node = &self.nodes[index];
        Book {
            book_id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            placeholder: node.placeholder,
            titles: self.children_at(index, Level::Title).map(|i| self.title(i)).collect(),
            chapters: self.children_at(index, Level::Chapter).map(|i| self.chapter(i)).collect(),
            sections: self.children_at(index, Level::Section).map(|i| self.section(i)).collect(),
            articles: node.articles.clone(),
        }
    }

    fn title(&self, index: usize) -> Title {
        let node = &self.nodes[index];
        Title {
            title_id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            placeholder: node.placeholder,
            chapters: self.children_at(index, Level::Chapter).map(|i| self.chapter(i)).collect(),
            sections: self.children_at(index, Level::Section).map(|i| self.section(i)).collect(),
            articles: node.articles.clone(),
        }
    }

    fn chapter(&self, index: usize) -> Chapter {
        let node = &self.nodes[index];
        Chapter {
            chapter_id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            placeholder: node.placeholder,
            sections: self.children_at(index, Level::Section).map(|i| self.section(i)).collect(),
            articles: node.articles.clone(),
        }
    }

    fn section(&self, index: usize) -> Section {
        let node = &self.nodes[index];
        Section {
            section_id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            level: node.section_level,
            placeholder: node.placeholder,
            sections: self.children_at(index, Level::Section).map(|i| self.section(i)).collect(),
            subsections: self
                .children_at(index, Level::Subsection)
                .map(|i| self.subsection(i))
                .collect(),
            articles: node.articles.clone(),
        }
    }

    fn subsection(&self, index: usize) -> Subsection {
        let node = &self.nodes[index];
        Subsection {
            subsection_id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            placeholder: node.placeholder,
            articles: node.articles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with(nodes: &[(Level, &str)]) -> (ContainerArena, Vec<usize>) {
        let mut arena = ContainerArena::new();
        let indices = nodes
            .iter()
            .map(|(level, id)| arena.insert(ContainerNode::new(*level, *id, *id)))
            .collect();
        (arena, indices)
    }

    impl ContainerArena {
        fn len(&self) -> usize {
            self.nodes.len()
        }
    }

    #[test]
    fn test_insert_deduplicates_by_level_and_key() {
        let (mut arena, indices) = arena_with(&[(Level::Chapter, "c1"), (Level::Section, "c1")]);
        assert_eq!(arena.len(), 2);
        assert_ne!(indices[0], indices[1]);

        let again = arena.insert(ContainerNode::new(Level::Chapter, "c1", "c1"));
        assert_eq!(again, indices[0]);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.lookup(Level::Chapter, "c1"), Some(indices[0]));
        assert_eq!(arena.lookup(Level::Title, "c1"), None);
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (mut arena, ids) = arena_with(&[(Level::Book, "b"), (Level::Chapter, "c")]);
        assert!(arena.attach(ids[0], ids[1]));
        assert!(!arena.attach(ids[0], ids[1]));
        assert_eq!(arena.get(ids[0]).unwrap().children, vec![ids[1]]);
        assert!(arena.is_attached(ids[1]));
    }

    #[test]
    fn test_attach_refuses_cycles() {
        let (mut arena, ids) = arena_with(&[(Level::Section, "s1"), (Level::Section, "s2")]);
        assert!(arena.attach(ids[0], ids[1]));
        assert!(!arena.attach(ids[1], ids[0]));
        assert!(!arena.attach(ids[0], ids[0]));
    }

    #[test]
    fn test_numbered_sections_are_scoped() {
        let (mut arena, ids) = arena_with(&[(Level::Section, "s1"), (Level::Section, "s2")]);
        arena.register_number(Some(7), "1", ids[0]);
        arena.register_number(Some(8), "1", ids[1]);
        arena.register_number(Some(7), "1", ids[1]);
        assert_eq!(arena.numbered(Some(7), "1"), Some(ids[0]));
        assert_eq!(arena.numbered(Some(8), "1"), Some(ids[1]));
        assert_eq!(arena.numbered(None, "1"), None);
    }

    #[test]
    fn test_into_books_materializes_tree() {
        let (mut arena, ids) = arena_with(&[
            (Level::Book, "b"),
            (Level::Title, "t"),
            (Level::Chapter, "c"),
            (Level::Section, "s"),
            (Level::Subsection, "ss"),
        ]);
        for pair in ids.windows(2) {
            arena.attach(pair[0], pair[1]);
        }
        arena.push_article(ids[4], "art1");
        arena.push_article(ids[2], "art2");

        let books = arena.into_books();
        assert_eq!(books.len(), 1);
        let chapter = &books[0].titles[0].chapters[0];
        assert_eq!(chapter.chapter_id, "c");
        assert_eq!(chapter.articles, vec!["art2".to_string()]);
        assert_eq!(chapter.sections[0].subsections[0].articles, vec!["art1".to_string()]);
    }

    #[test]
    fn test_into_books_skips_orphans() {
        let (arena, _) = arena_with(&[(Level::Chapter, "c")]);
        assert!(arena.into_books().is_empty());
    }

    #[test]
    fn test_placeholder_node() {
        let node = ContainerNode::placeholder(Level::Title, "b#title");
        assert!(node.placeholder);
        assert_eq!(node.key, "b#title");
        assert_eq!(node.id, "b#title");
    }
}
