use crate::element::Element;

/// A simple element matcher, the subset of CSS selectors widgets need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Tag(String),
    Class(String),
    Id(String),
    /// Attribute present, optionally with an exact value.
    Attr(String, Option<String>),
    /// All of the inner selectors must match.
    All(Vec<Selector>),
}

impl Selector {
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn has_attr(key: impl Into<String>) -> Self {
        Self::Attr(key.into(), None)
    }

    pub fn attr(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attr(key.into(), Some(value.into()))
    }

    /// Combine with another selector; both must match.
    pub fn and(self, other: Selector) -> Self {
        match self {
            Self::All(mut all) => {
                all.push(other);
                Self::All(all)
            }
            first => Self::All(vec![first, other]),
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Class(class) => element.has_class(class),
            Self::Id(id) => element.id == *id,
            Self::Attr(key, None) => element.attrs.contains_key(key),
            Self::Attr(key, Some(value)) => element.get_attr(key) == Some(value.as_str()),
            Self::All(all) => all.iter().all(|s| s.matches(element)),
        }
    }
}

/// All elements under (and including) `root` matching `selector`, in
/// document order.
pub fn query_all<'a>(root: &'a Element, selector: &Selector) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect(root, selector, &mut found);
    found
}

fn collect<'a>(element: &'a Element, selector: &Selector, found: &mut Vec<&'a Element>) {
    if selector.matches(element) {
        found.push(element);
    }
    for child in element.child_elements() {
        collect(child, selector, found);
    }
}

/// First element in document order matching `selector`.
pub fn query_first<'a>(root: &'a Element, selector: &Selector) -> Option<&'a Element> {
    if selector.matches(root) {
        return Some(root);
    }
    root.child_elements()
        .iter()
        .find_map(|child| query_first(child, selector))
}

/// IDs of every match. Useful when the tree is about to be mutated.
pub fn query_ids(root: &Element, selector: &Selector) -> Vec<String> {
    query_all(root, selector)
        .into_iter()
        .map(|el| el.id.clone())
        .collect()
}
