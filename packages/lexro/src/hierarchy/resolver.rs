//! Placement of articles in the container hierarchy.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

use super::arena::{ContainerArena, ContainerNode};
use crate::dom::{container_bodies, element_id, node_path, preceding_part, spaced_text, ContainerPart, Level};
use crate::types::Book;

/// Dotted number at the start of a section heading, after an optional word:
/// "Secțiunea 2.3", "2.3. Obiectul", "Punctul 4".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static SECTION_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[^\d\s]+\s+)?(\d+(?:\.\d+)*)\.?(?:\s|$)").expect("valid regex")
});

/// Dotted number of a section heading, if it has one.
///
/// # Examples
/// ```
/// use lexro::hierarchy::section_number;
///
/// assert_eq!(section_number("Secțiunea 2.3"), Some("2.3"));
/// assert_eq!(section_number("1.2.1. Domeniu"), Some("1.2.1"));
/// assert_eq!(section_number("Secțiunea a 2-a"), None);
/// ```
pub fn section_number(heading: &str) -> Option<&str> {
    SECTION_NUMBER
        .captures(heading.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Containers enclosing one article, outermost level first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub book: Option<usize>,
    pub title: Option<usize>,
    pub chapter: Option<usize>,
    /// Enclosing sections, outermost first.
    pub sections: Vec<usize>,
    pub subsection: Option<usize>,
}

impl Placement {
    /// The container that directly owns the article.
    pub fn deepest(&self) -> Option<usize> {
        self.subsection
            .or_else(|| self.sections.last().copied())
            .or(self.chapter)
            .or(self.title)
            .or(self.book)
    }

    /// Nearest enclosing container above the section level.
    fn outer(&self) -> Option<usize> {
        self.chapter.or(self.title).or(self.book)
    }
}

/// Builds the container hierarchy one article at a time.
///
/// Registries live for a single parse; a resolver must not be reused
/// across documents.
#[derive(Debug, Default)]
pub struct HierarchyResolver {
    arena: ContainerArena,
    placeholders: bool,
}

impl HierarchyResolver {
    /// Create a resolver. With `placeholders`, missing intermediate levels
    /// are filled with synthetic containers so that every chain reaches a
    /// book without skipping a level.
    pub fn new(placeholders: bool) -> Self {
        Self {
            arena: ContainerArena::new(),
            placeholders,
        }
    }

    /// Resolve the containers of an article and record the article id in
    /// the deepest one.
    pub fn place_article(&mut self, article: ElementRef<'_>, article_id: &str) -> Placement {
        let placement = self.resolve(article);
        if let Some(owner) = placement.deepest() {
            self.arena.push_article(owner, article_id);
        }
        placement
    }

    /// Resolve (and link) the containers enclosing an element.
    ///
    /// Levels are handled outward-in: book, title, chapter, every enclosing
    /// section, subsection. Each container is created on first sight and
    /// attached to its parent once.
    pub fn resolve(&mut self, element: ElementRef<'_>) -> Placement {
        let bodies: Vec<(Level, ElementRef<'_>)> = container_bodies(element).collect();
        let nearest = |level: Level| {
            bodies
                .iter()
                .find(|(found, _)| *found == level)
                .map(|(_, body)| *body)
        };

        let mut placement = Placement::default();

        placement.book = nearest(Level::Book).map(|body| self.ensure(Level::Book, body));

        placement.title = nearest(Level::Title).map(|body| self.ensure(Level::Title, body));
        if let Some(title) = placement.title {
            self.link(placement.book, title);
        }

        placement.chapter = nearest(Level::Chapter).map(|body| self.ensure(Level::Chapter, body));
        if let Some(chapter) = placement.chapter {
            self.link(placement.title.or(placement.book), chapter);
        }

        // Sections can nest; walk them from the outermost one in.
        let section_bodies = bodies
            .iter()
            .rev()
            .filter(|(level, _)| *level == Level::Section)
            .map(|(_, body)| *body);
        for (depth, body) in section_bodies.enumerate() {
            let section = self.ensure_section(body, depth, &placement);
            placement.sections.push(section);
        }

        let section = placement.sections.last().copied();
        if section.is_some() || self.placeholders {
            placement.subsection = nearest(Level::Subsection).map(|body| self.ensure(Level::Subsection, body));
            if let Some(subsection) = placement.subsection {
                self.link(section.or_else(|| placement.outer()), subsection);
            }
        }

        placement
    }

    /// Consume the resolver and return the finished book trees.
    pub fn into_books(self) -> Vec<Book> {
        self.arena.into_books()
    }

    /// Get or create the container of a body element.
    fn ensure(&mut self, level: Level, body: ElementRef<'_>) -> usize {
        let key = container_key(body);
        if let Some(index) = self.arena.lookup(level, &key) {
            return index;
        }

        let mut node = ContainerNode::new(level, key, element_id(body));
        node.title = preceding_part(body, level, ContainerPart::Title)
            .map(|title| spaced_text(title, &[]))
            .unwrap_or_default();
        node.description =
            preceding_part(body, level, ContainerPart::Description).map(|den| spaced_text(den, &[]));

        tracing::trace!(%level, key = %node.key, title = %node.title, "New container");
        self.arena.insert(node)
    }

    /// Get or create a section and attach it.
    ///
    /// A section numbered "2.3" nests under the section numbered "2" of the
    /// same enclosing container when there is one; otherwise under the
    /// enclosing section, or the enclosing chapter, title or book.
    fn ensure_section(&mut self, body: ElementRef<'_>, depth: usize, placement: &Placement) -> usize {
        let scope = placement.outer();
        let known = self.arena.lookup(Level::Section, &container_key(body));
        let index = self.ensure(Level::Section, body);

        let heading = self.arena.get(index).map(|node| node.title.clone()).unwrap_or_default();
        let number = section_number(&heading).map(str::to_string);

        if known.is_none() {
            let level = match &number {
                Some(number) => number.split('.').count(),
                None => depth + 1,
            };
            self.set_section_level(index, u32::try_from(level).unwrap_or(u32::MAX));
            if let Some(number) = &number {
                self.arena.register_number(scope, number, index);
            }
        }

        let numeric_parent = number
            .as_deref()
            .and_then(|number| number.rsplit_once('.'))
            .and_then(|(prefix, _)| self.arena.numbered(scope, prefix))
            .filter(|parent| *parent != index);

        let parent = numeric_parent
            .or_else(|| placement.sections.last().copied())
            .or(scope);
        self.link(parent, index);
        index
    }

    fn set_section_level(&mut self, index: usize, level: u32) {
        if let Some(node) = self.arena.get_mut(index) {
            node.section_level = level;
        }
    }

    /// Attach `child` under `parent`, filling skipped levels when
    /// placeholders are enabled.
    fn link(&mut self, parent: Option<usize>, child: usize) {
        if self.arena.is_attached(child) {
            return;
        }
        let Some(child_level) = self.arena.get(child).map(|node| node.level) else {
            return;
        };

        if !self.placeholders {
            if let Some(parent) = parent {
                self.arena.attach(parent, child);
            }
            return;
        }

        let mut parent = match parent {
            Some(parent) => Some(parent),
            None if child_level == Level::Book => return,
            None => Some(self.placeholder(None, Level::Book)),
        };

        let start = parent
            .and_then(|p| self.arena.get(p))
            .map(|node| node.level.depth() + 1)
            .unwrap_or(0);
        for level in Level::ALL
            .into_iter()
            .skip(start)
            .take_while(|level| *level < child_level)
        {
            parent = Some(self.placeholder(parent, level));
        }

        if let Some(parent) = parent {
            self.arena.attach(parent, child);
        }
    }

    /// Get or create the placeholder of `level` under `parent`.
    fn placeholder(&mut self, parent: Option<usize>, level: Level) -> usize {
        let parent_key = parent
            .and_then(|p| self.arena.get(p))
            .map(|node| node.key.clone())
            .unwrap_or_default();
        let id = format!("{parent_key}#{level}");

        if let Some(index) = self.arena.lookup(level, &id) {
            return index;
        }
        tracing::debug!(%level, id = %id, "Inserting placeholder container");
        let index = self.arena.insert(ContainerNode::placeholder(level, id));
        if let Some(parent) = parent {
            self.arena.attach(parent, index);
        }
        index
    }
}

/// Registry key of a container body: its id, or its tree position when
/// the source omits the id.
fn container_key(body: ElementRef<'_>) -> String {
    let id = element_id(body);
    if id.is_empty() {
        format!("@{}", node_path(body))
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn articles(page: &Html) -> Vec<ElementRef<'_>> {
        let selector = Selector::parse(".S_ART").unwrap();
        page.select(&selector).collect()
    }

    fn resolve_all(html: &str, placeholders: bool) -> Vec<Book> {
        let page = Html::parse_fragment(html);
        let mut resolver = HierarchyResolver::new(placeholders);
        for article in articles(&page) {
            let id = element_id(article);
            resolver.place_article(article, &id);
        }
        resolver.into_books()
    }

    fn article(id: &str) -> String {
        format!(r#"<span class="S_ART" id="{id}"><span class="S_ART_BDY"></span></span>"#)
    }

    #[test]
    fn test_section_number() {
        assert_eq!(section_number("Secțiunea 1"), Some("1"));
        assert_eq!(section_number("Secţiunea 2.3 Dispoziții"), Some("2.3"));
        assert_eq!(section_number("4. Obiect"), Some("4"));
        assert_eq!(section_number("Secțiunea I"), None);
        assert_eq!(section_number(""), None);
    }

    #[test]
    fn test_shared_chapter_is_created_once() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_CAP_TTL">Capitolul I</span>
               <span class="S_CAP_BDY" id="c1">{}{}{}</span></span>"#,
            article("a1"),
            article("a2"),
            article("a3")
        );
        let books = resolve_all(&html, false);
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].chapters.len(), 1);
        assert_eq!(books[0].chapters[0].title, "Capitolul I");
        assert_eq!(books[0].chapters[0].articles, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_article_attaches_to_deepest_container() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1">{}<span class="S_TTL_BDY" id="t1">{}
               <span class="S_CAP_BDY" id="c1">{}</span></span></span>"#,
            article("in_book"),
            article("in_title"),
            article("in_chapter")
        );
        let books = resolve_all(&html, false);
        let book = &books[0];
        assert_eq!(book.articles, vec!["in_book"]);
        assert_eq!(book.titles[0].articles, vec!["in_title"]);
        assert_eq!(book.titles[0].chapters[0].articles, vec!["in_chapter"]);
        assert!(book.chapters.is_empty());
        assert!(book.titles[0].chapters[0].sections.is_empty());
    }

    #[test]
    fn test_chapter_without_title_attaches_to_book() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_CAP_BDY" id="c1">{}</span></span>"#,
            article("a1")
        );
        let books = resolve_all(&html, false);
        assert!(books[0].titles.is_empty());
        assert_eq!(books[0].chapters[0].chapter_id, "c1");
    }

    #[test]
    fn test_numbered_sections_nest_by_prefix() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_CAP_BDY" id="c1">
               <span class="S_SEC_TTL">Secțiunea 2</span><span class="S_SEC_BDY" id="s2">{}</span>
               <span class="S_SEC_TTL">Secțiunea 2.1</span><span class="S_SEC_BDY" id="s21">{}</span>
               </span></span>"#,
            article("a1"),
            article("a2")
        );
        let books = resolve_all(&html, false);
        let sections = &books[0].chapters[0].sections;
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].section_id, "s2");
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].sections[0].section_id, "s21");
        assert_eq!(sections[0].sections[0].level, 2);
        assert_eq!(sections[0].sections[0].articles, vec!["a2"]);
    }

    #[test]
    fn test_structurally_nested_sections() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_SEC_BDY" id="outer">
               <span class="S_PCT_BDY" id="inner">{}</span></span></span>"#,
            article("a1")
        );
        let books = resolve_all(&html, false);
        let outer = &books[0].sections[0];
        assert_eq!(outer.section_id, "outer");
        assert_eq!(outer.sections[0].section_id, "inner");
        assert_eq!(outer.sections[0].level, 2);
        assert_eq!(outer.sections[0].articles, vec!["a1"]);
    }

    #[test]
    fn test_subsection_requires_section_without_placeholders() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_SSEC_BDY" id="ss">{}</span></span>"#,
            article("a1")
        );
        let books = resolve_all(&html, false);
        assert_eq!(books[0].articles, vec!["a1"]);
        assert!(books[0].sections.is_empty());
    }

    #[test]
    fn test_placeholders_fill_missing_levels() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_SEC_BDY" id="s1">{}</span></span>"#,
            article("a1")
        );
        let books = resolve_all(&html, true);
        let book = &books[0];
        assert!(book.sections.is_empty());
        let title = &book.titles[0];
        assert!(title.placeholder);
        assert_eq!(title.title_id, "b1#title");
        let chapter = &title.chapters[0];
        assert!(chapter.placeholder);
        assert_eq!(chapter.chapter_id, "b1#title#chapter");
        assert_eq!(chapter.sections[0].section_id, "s1");
        assert_eq!(chapter.sections[0].articles, vec!["a1"]);
    }

    #[test]
    fn test_placeholders_reach_a_book() {
        let html = format!(r#"<span class="S_CAP_BDY" id="c1">{}{}</span>"#, article("a1"), article("a2"));

        assert!(resolve_all(&html, false).is_empty());

        let books = resolve_all(&html, true);
        assert_eq!(books.len(), 1);
        assert!(books[0].placeholder);
        assert_eq!(books[0].book_id, "#book");
        assert_eq!(books[0].titles.len(), 1);
        assert_eq!(books[0].titles[0].chapters[0].articles, vec!["a1", "a2"]);
    }

    #[test]
    fn test_placeholders_not_created_below_deepest_container() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1"><span class="S_TTL_BDY" id="t1">
               <span class="S_CAP_BDY" id="c1">{}</span></span></span>"#,
            article("a1")
        );
        let books = resolve_all(&html, true);
        let chapter = &books[0].titles[0].chapters[0];
        assert!(chapter.sections.is_empty());
        assert_eq!(chapter.articles, vec!["a1"]);
    }

    #[test]
    fn test_bodies_without_id_are_distinct() {
        let html = format!(
            r#"<span class="S_CRT_BDY" id="b1">
               <span class="S_CAP_TTL">Capitolul I</span><span class="S_CAP_BDY">{}</span>
               <span class="S_CAP_TTL">Capitolul II</span><span class="S_CAP_BDY">{}</span>
               </span>"#,
            article("a1"),
            article("a2")
        );
        let books = resolve_all(&html, false);
        let chapters = &books[0].chapters;
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Capitolul I");
        assert_eq!(chapters[1].title, "Capitolul II");
        assert_eq!(chapters[0].chapter_id, "");
    }
}
