//! Navigation helpers for the classified HTML tree.

use scraper::ElementRef;

use super::kind::{classify, is_kind, ContainerPart, ElementKind, Level};

/// Get the `id` attribute of an element, or an empty string.
pub fn element_id(element: ElementRef<'_>) -> String {
    element.value().id().unwrap_or_default().to_string()
}

/// Get all element children of an element (text and comments excluded).
pub fn element_children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

/// Find the first descendant of the given kind, in document order.
///
/// The element itself is not considered.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use lexro::dom::{find_descendant, ElementKind};
///
/// let html = r#"<span class="S_ART" id="a"><span class="S_ART_BDY" id="b"></span></span>"#;
/// let page = Html::parse_fragment(html);
/// let article = page.select(&Selector::parse("#a").unwrap()).next().unwrap();
///
/// let body = find_descendant(article, ElementKind::ArticleBody).unwrap();
/// assert_eq!(body.value().id(), Some("b"));
/// assert!(find_descendant(article, ElementKind::Note).is_none());
/// ```
pub fn find_descendant(element: ElementRef<'_>, kind: ElementKind) -> Option<ElementRef<'_>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|candidate| is_kind(*candidate, kind))
}

/// Find the outermost descendants of the given kind, in document order.
///
/// Matches nested inside an earlier match are not returned separately,
/// since their text already belongs to the enclosing match.
pub fn find_outermost<'a>(element: ElementRef<'a>, kind: ElementKind) -> Vec<ElementRef<'a>> {
    let mut found = Vec::new();
    collect_outermost(element, kind, &mut found);
    found
}

fn collect_outermost<'a>(element: ElementRef<'a>, kind: ElementKind, out: &mut Vec<ElementRef<'a>>) {
    for child in element_children(element) {
        if is_kind(child, kind) {
            out.push(child);
        } else {
            collect_outermost(child, kind, out);
        }
    }
}

/// Iterate over the element ancestors of an element, innermost first.
pub fn ancestors<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.ancestors().filter_map(ElementRef::wrap)
}

/// Find the nearest ancestor of the given kind.
pub fn closest_ancestor(element: ElementRef<'_>, kind: ElementKind) -> Option<ElementRef<'_>> {
    ancestors(element).find(|ancestor| is_kind(*ancestor, kind))
}

/// Container bodies enclosing an element, innermost first.
pub fn container_bodies<'a>(element: ElementRef<'a>) -> impl Iterator<Item = (Level, ElementRef<'a>)> {
    ancestors(element).filter_map(|ancestor| match classify(ancestor) {
        Some(ElementKind::Container {
            level,
            part: ContainerPart::Body,
        }) => Some((level, ancestor)),
        _ => None,
    })
}

/// Find the heading part of a container, searching backward from its body.
///
/// Preceding siblings of the body are searched nearest first. The search
/// stops at another body of the same level, whose headings belong to that
/// other container. When the siblings are exhausted the search climbs to
/// the parent and continues with its preceding siblings, unless the parent
/// is itself a container body.
pub fn preceding_part<'a>(body: ElementRef<'a>, level: Level, part: ContainerPart) -> Option<ElementRef<'a>> {
    let target = ElementKind::Container { level, part };
    let boundary = ElementKind::body(level);

    let mut current = body;
    loop {
        for sibling in current.prev_siblings().filter_map(ElementRef::wrap) {
            match classify(sibling) {
                Some(kind) if kind == target => return Some(sibling),
                Some(kind) if kind == boundary => return None,
                _ => {}
            }
        }

        let parent = current.parent().and_then(ElementRef::wrap)?;
        if classify(parent).is_some_and(ElementKind::is_container_body) {
            return None;
        }
        current = parent;
    }
}

/// Position of an element in the tree as dotted child indices.
///
/// Stable for one parsed tree, which makes it usable as an identity key for
/// elements that carry no `id` attribute.
pub fn node_path(element: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut node = *element;
    while let Some(parent) = node.parent() {
        segments.push(node.prev_siblings().count().to_string());
        node = parent;
    }
    segments.reverse();
    segments.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn by_id<'a>(page: &'a Html, id: &str) -> ElementRef<'a> {
        let selector = Selector::parse(&format!("#{id}")).unwrap();
        page.select(&selector).next().unwrap()
    }

    const NESTED: &str = r#"
        <span class="S_CAP_TTL" id="cap1_ttl">Capitolul I</span>
        <span class="S_CAP_DEN" id="cap1_den">Dispoziții generale</span>
        <span class="S_CAP_BDY" id="cap1">
            <span class="S_SEC_TTL" id="sec1_ttl">Secțiunea 1</span>
            <span class="S_SEC_BDY" id="sec1">
                <span class="S_ART" id="art1">
                    <span class="S_ART_BDY" id="art1_bdy">
                        <span class="S_PAR" id="par1">Text <span class="S_PAR" id="n1">nota</span></span>
                    </span>
                </span>
            </span>
        </span>
        <span class="S_CAP_TTL" id="cap2_ttl">Capitolul II</span>
        <span class="S_CAP_BDY" id="cap2">
            <span class="S_SEC_BDY" id="sec2"></span>
        </span>
    "#;

    #[test]
    fn test_element_id() {
        let page = Html::parse_fragment(r#"<span id="x"></span><b></b>"#);
        assert_eq!(element_id(by_id(&page, "x")), "x");

        let selector = Selector::parse("b").unwrap();
        let bold = page.select(&selector).next().unwrap();
        assert_eq!(element_id(bold), "");
    }

    #[test]
    fn test_element_children_skips_text() {
        let page = Html::parse_fragment(r#"<span id="p">a<i>1</i>b<i>2</i></span>"#);
        assert_eq!(element_children(by_id(&page, "p")).count(), 2);
    }

    #[test]
    fn test_find_outermost_ignores_nested_matches() {
        let page = Html::parse_fragment(NESTED);
        let body = by_id(&page, "art1_bdy");
        let found = find_outermost(body, ElementKind::Paragraph);
        assert_eq!(found.len(), 1);
        assert_eq!(element_id(found[0]), "par1");
    }

    #[test]
    fn test_closest_ancestor() {
        let page = Html::parse_fragment(NESTED);
        let article = by_id(&page, "art1");
        let chapter = closest_ancestor(article, ElementKind::body(Level::Chapter)).unwrap();
        assert_eq!(element_id(chapter), "cap1");
        assert!(closest_ancestor(article, ElementKind::body(Level::Book)).is_none());
    }

    #[test]
    fn test_container_bodies_innermost_first() {
        let page = Html::parse_fragment(NESTED);
        let levels: Vec<_> = container_bodies(by_id(&page, "art1"))
            .map(|(level, body)| (level, element_id(body)))
            .collect();
        assert_eq!(
            levels,
            vec![
                (Level::Section, "sec1".to_string()),
                (Level::Chapter, "cap1".to_string()),
            ]
        );
    }

    #[test]
    fn test_preceding_part_finds_heading_siblings() {
        let page = Html::parse_fragment(NESTED);
        let body = by_id(&page, "cap1");
        let title = preceding_part(body, Level::Chapter, ContainerPart::Title).unwrap();
        let description = preceding_part(body, Level::Chapter, ContainerPart::Description).unwrap();
        assert_eq!(element_id(title), "cap1_ttl");
        assert_eq!(element_id(description), "cap1_den");
    }

    #[test]
    fn test_preceding_part_stops_at_previous_container() {
        let page = Html::parse_fragment(NESTED);
        let body = by_id(&page, "cap2");
        let title = preceding_part(body, Level::Chapter, ContainerPart::Title).unwrap();
        assert_eq!(element_id(title), "cap2_ttl");
        // cap1's description lies behind cap1's body.
        assert!(preceding_part(body, Level::Chapter, ContainerPart::Description).is_none());
    }

    #[test]
    fn test_preceding_part_does_not_leave_enclosing_body() {
        let page = Html::parse_fragment(NESTED);
        let body = by_id(&page, "sec2");
        assert!(preceding_part(body, Level::Section, ContainerPart::Title).is_none());
    }

    #[test]
    fn test_node_path_is_unique_per_element() {
        let page = Html::parse_fragment(r#"<span><b></b><b></b></span>"#);
        let selector = Selector::parse("b").unwrap();
        let paths: Vec<_> = page.select(&selector).map(node_path).collect();
        assert_eq!(paths.len(), 2);
        assert_ne!(paths[0], paths[1]);
    }
}
