//! Element kinds recognised in legislatie.just.ro pages.
//!
//! The source marks every structural span with a class such as `S_ART` or
//! `S_CAP_BDY`. Each element is classified once into an [`ElementKind`] and
//! all extraction code dispatches on that value.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use scraper::ElementRef;

/// Level of a structural container, from the outermost to the innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Carte.
    Book,
    /// Titlu.
    Title,
    /// Capitol.
    Chapter,
    /// Secțiune (also the "punct" variant).
    Section,
    /// Subsecțiune.
    Subsection,
}

impl Level {
    /// All levels in nesting order.
    pub const ALL: [Level; 5] = [
        Level::Book,
        Level::Title,
        Level::Chapter,
        Level::Section,
        Level::Subsection,
    ];

    /// Position of this level in [`Level::ALL`].
    #[must_use]
    pub fn depth(self) -> usize {
        self as usize
    }

    /// Lowercase name used in placeholder ids and logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Title => "title",
            Self::Chapter => "chapter",
            Self::Section => "section",
            Self::Subsection => "subsection",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of a structural container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerPart {
    /// Wraps the nested content (`*_BDY`).
    Body,
    /// Label such as "Capitolul I" (`*_TTL`).
    Title,
    /// Descriptive heading (`*_DEN`).
    Description,
}

/// Classification of a source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Article,
    ArticleTitle,
    ArticleBody,
    /// Plain paragraph. Nested inside another paragraph or item body the
    /// same class marks an embedded amendment note.
    Paragraph,
    NumberedParagraph,
    NumberedParagraphTitle,
    NumberedParagraphBody,
    Letter,
    LetterTitle,
    LetterBody,
    Line,
    LineTitle,
    LineBody,
    Note,
    NoteTitle,
    /// Hidden short form that renders as "...".
    Ellipsis,
    Container { level: Level, part: ContainerPart },
}

impl ElementKind {
    /// Body kind of a container level.
    #[must_use]
    pub const fn body(level: Level) -> Self {
        Self::Container {
            level,
            part: ContainerPart::Body,
        }
    }

    /// Title kind of a container level.
    #[must_use]
    pub const fn title(level: Level) -> Self {
        Self::Container {
            level,
            part: ContainerPart::Title,
        }
    }

    /// Description kind of a container level.
    #[must_use]
    pub const fn description(level: Level) -> Self {
        Self::Container {
            level,
            part: ContainerPart::Description,
        }
    }

    /// Whether this kind is the body of any container level.
    #[must_use]
    pub fn is_container_body(self) -> bool {
        matches!(
            self,
            Self::Container {
                part: ContainerPart::Body,
                ..
            }
        )
    }
}

/// Class name → kind dispatch table.
static CLASS_KINDS: LazyLock<HashMap<&'static str, ElementKind>> = LazyLock::new(|| {
    use ElementKind as K;

    HashMap::from([
        ("S_ART", K::Article),
        ("S_ART_TTL", K::ArticleTitle),
        ("S_ART_BDY", K::ArticleBody),
        ("S_PAR", K::Paragraph),
        ("S_ALN", K::NumberedParagraph),
        ("S_ALN_TTL", K::NumberedParagraphTitle),
        ("S_ALN_BDY", K::NumberedParagraphBody),
        ("S_LIT", K::Letter),
        ("S_LIT_TTL", K::LetterTitle),
        ("S_LIT_BDY", K::LetterBody),
        ("S_LIN", K::Line),
        ("S_LIN_TTL", K::LineTitle),
        ("S_LIN_BDY", K::LineBody),
        ("S_NTA", K::Note),
        ("S_NTA_TTL", K::NoteTitle),
        ("S_LIT_SHORT", K::Ellipsis),
        ("S_LIN_SHORT", K::Ellipsis),
        // Containers
        ("S_CRT_BDY", K::body(Level::Book)),
        ("S_CRT_TTL", K::title(Level::Book)),
        ("S_CRT_DEN", K::description(Level::Book)),
        ("S_TTL_BDY", K::body(Level::Title)),
        ("S_TTL_TTL", K::title(Level::Title)),
        ("S_TTL_DEN", K::description(Level::Title)),
        ("S_CAP_BDY", K::body(Level::Chapter)),
        ("S_CAP_TTL", K::title(Level::Chapter)),
        ("S_CAP_DEN", K::description(Level::Chapter)),
        ("S_SEC_BDY", K::body(Level::Section)),
        ("S_SEC_TTL", K::title(Level::Section)),
        ("S_SEC_DEN", K::description(Level::Section)),
        ("S_PCT_BDY", K::body(Level::Section)),
        ("S_PCT_TTL", K::title(Level::Section)),
        ("S_PCT_DEN", K::description(Level::Section)),
        ("S_SSEC_BDY", K::body(Level::Subsection)),
        ("S_SSEC_TTL", K::title(Level::Subsection)),
        ("S_SSEC_DEN", K::description(Level::Subsection)),
    ])
});

/// Classify a class name.
#[must_use]
pub fn kind_of_class(class: &str) -> Option<ElementKind> {
    CLASS_KINDS.get(class).copied()
}

/// Classify an element by its first recognised class.
///
/// Elements without a recognised class return `None` and are ignored by
/// the extraction rules.
///
/// # Examples
/// ```
/// use scraper::{Html, Selector};
/// use lexro::dom::{classify, ElementKind};
///
/// let page = Html::parse_fragment(r#"<span class="x S_ART_BDY"></span>"#);
/// let span = page.select(&Selector::parse("span").unwrap()).next().unwrap();
/// assert_eq!(classify(span), Some(ElementKind::ArticleBody));
/// ```
#[must_use]
pub fn classify(element: ElementRef<'_>) -> Option<ElementKind> {
    element.value().classes().find_map(kind_of_class)
}

/// Check whether an element has the given kind.
#[must_use]
pub fn is_kind(element: ElementRef<'_>, kind: ElementKind) -> bool {
    classify(element) == Some(kind)
}
