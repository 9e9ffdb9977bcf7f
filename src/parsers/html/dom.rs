use html5ever::interface::{create_element, Attribute, NodeOrText, QualName, TreeSink};
use html5ever::parse_document;
use html5ever::tendril::{format_tendril, StrTendril, TendrilSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parses an HTML document into a DOM
pub fn html_to_dom(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(StrTendril::from(html))
}

/// Collects every element named `node_name` below `node`, in document order.
///
/// The search does not descend into the children of a match unless `nested` is set.
pub fn find_elements(node: &Handle, node_name: &str, nested: bool) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_elements(node, node_name, nested, &mut found);
    found
}

fn collect_elements(node: &Handle, node_name: &str, nested: bool, found: &mut Vec<Handle>) {
    for child in node.children.borrow().iter() {
        let is_match = get_node_name(child) == Some(node_name);
        if is_match {
            found.push(child.clone());
        }
        if !is_match || nested {
            collect_elements(child, node_name, nested, found);
        }
    }
}

/// Collects every element below `node` carrying `attr_name`, in document order
pub fn find_elements_with_attr(node: &Handle, attr_name: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    walk_elements(node, &mut |element| {
        if get_node_attr(element, attr_name).is_some() {
            found.push(element.clone());
        }
    });
    found
}

/// Depth-first visit of every element below `node`
pub fn walk_elements(node: &Handle, visit: &mut dyn FnMut(&Handle)) {
    for child in node.children.borrow().iter() {
        if let NodeData::Element { .. } = child.data {
            visit(child);
        }
        walk_elements(child, visit);
    }
}

/// First direct child element named `node_name`
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| get_node_name(child) == Some(node_name))
        .cloned()
}

/// Attribute value of an element node
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Local element name, `None` for non-element nodes
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// Parent node, if still attached
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    let weak = child.parent.take();
    let parent = weak.as_ref().and_then(|node| node.upgrade());
    child.parent.set(weak);
    parent
}

/// Element ancestors of `node`, nearest first
pub fn ancestors(node: &Handle) -> Vec<Handle> {
    let mut result = Vec::new();
    let mut current = get_parent_node(node);
    while let Some(parent) = current {
        current = get_parent_node(&parent);
        if let NodeData::Element { .. } = parent.data {
            result.push(parent);
        }
    }
    result
}

/// Sets, replaces or (with `None`) removes an attribute
pub fn set_node_attr(node: &Handle, attr_name: &str, attr_value: Option<String>) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let attrs_mut = &mut attrs.borrow_mut();

        match attr_value {
            Some(value) => {
                if let Some(existing) = attrs_mut
                    .iter_mut()
                    .find(|attr| &*attr.name.local == attr_name)
                {
                    existing.value = StrTendril::from(value.as_str());
                } else {
                    attrs_mut.push(Attribute {
                        name: QualName::new(None, ns!(), LocalName::from(attr_name)),
                        value: format_tendril!("{}", value),
                    });
                }
            }
            None => attrs_mut.retain(|attr| &*attr.name.local != attr_name),
        }
    }
}

/// Concatenated text of all descendant text nodes
pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => text.push_str(&contents.borrow()),
            NodeData::Element { .. } => text.push_str(&text_content(child)),
            _ => {}
        }
    }
    text
}

/// Rewrites every direct text child of `node` in place (used for `<style>` contents)
pub fn map_child_text(node: &Handle, rewrite: &mut dyn FnMut(&str) -> String) {
    for child in node.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            let next = rewrite(&contents.borrow());
            *contents.borrow_mut() = StrTendril::from(next.as_str());
        }
    }
}

/// Rewrites every text node below `node`, at any depth
pub fn map_descendant_text(node: &Handle, rewrite: &mut dyn FnMut(&str) -> String) {
    for child in node.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                let next = rewrite(&contents.borrow());
                *contents.borrow_mut() = StrTendril::from(next.as_str());
            }
            _ => map_descendant_text(child, rewrite),
        }
    }
}

/// Creates a detached HTML element
pub fn create_html_element(dom: &RcDom, name: &str, attrs: &[(&str, &str)]) -> Handle {
    create_element(
        dom,
        QualName::new(None, ns!(html), LocalName::from(name)),
        attrs
            .iter()
            .map(|(attr_name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*attr_name)),
                value: format_tendril!("{}", value),
            })
            .collect(),
    )
}

/// Puts `replacement` where `target` was and detaches `target`
pub fn replace_node(dom: &RcDom, target: &Handle, replacement: Handle) {
    if get_parent_node(target).is_none() {
        return;
    }
    dom.append_before_sibling(target, NodeOrText::AppendNode(replacement));
    dom.remove_from_parent(target);
}
