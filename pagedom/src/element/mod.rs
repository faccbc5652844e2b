mod content;
mod node;

pub use content::Content;
pub use node::Element;

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements() {
        if let Some(found) = find_element(child, id) {
            return Some(found);
        }
    }

    None
}

/// Find an element by ID in the tree, mutably.
pub fn find_element_mut<'a>(root: &'a mut Element, id: &str) -> Option<&'a mut Element> {
    if root.id == id {
        return Some(root);
    }

    for child in root.child_elements_mut() {
        if let Some(found) = find_element_mut(child, id) {
            return Some(found);
        }
    }

    None
}

/// IDs from `root` down to the element with `id`, both inclusive.
pub fn path_to(root: &Element, id: &str) -> Option<Vec<String>> {
    if root.id == id {
        return Some(vec![root.id.clone()]);
    }

    for child in root.child_elements() {
        if let Some(mut path) = path_to(child, id) {
            path.insert(0, root.id.clone());
            return Some(path);
        }
    }

    None
}

/// Whether the element `id` is `ancestor_id` or one of its descendants.
pub fn contains(root: &Element, ancestor_id: &str, id: &str) -> bool {
    find_element(root, ancestor_id).is_some_and(|ancestor| find_element(ancestor, id).is_some())
}

/// Nearest ancestor-or-self of `id` that satisfies `pred`.
pub fn closest<'a>(
    root: &'a Element,
    id: &str,
    pred: impl Fn(&Element) -> bool,
) -> Option<&'a Element> {
    let path = path_to(root, id)?;
    path.iter()
        .rev()
        .filter_map(|ancestor| find_element(root, ancestor))
        .find(|el| pred(*el))
}

/// Replace the element `id` with `replacement`, keeping its position.
///
/// Returns the removed element. The root itself cannot be replaced.
pub fn replace_element(root: &mut Element, id: &str, replacement: Element) -> Option<Element> {
    let replaced = replace_element_inner(root, id, replacement).ok();
    if replaced.is_none() {
        log::debug!("replace_element: no element with id {id}");
    }
    replaced
}

fn replace_element_inner(root: &mut Element, id: &str, replacement: Element) -> Result<Element, Element> {
    let children = match &mut root.content {
        Content::Children(children) => children,
        _ => return Err(replacement),
    };

    if let Some(index) = children.iter().position(|c| c.id == id) {
        return Ok(std::mem::replace(&mut children[index], replacement));
    }

    let mut replacement = replacement;
    for child in children.iter_mut() {
        match replace_element_inner(child, id, replacement) {
            Ok(old) => return Ok(old),
            Err(r) => replacement = r,
        }
    }

    Err(replacement)
}

/// Detach the element `id` from the tree and return it.
pub fn remove_element(root: &mut Element, id: &str) -> Option<Element> {
    let children = match &mut root.content {
        Content::Children(children) => children,
        _ => return None,
    };

    if let Some(index) = children.iter().position(|c| c.id == id) {
        return Some(children.remove(index));
    }

    children.iter_mut().find_map(|child| remove_element(child, id))
}
