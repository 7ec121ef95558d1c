//! Shared test support: a declarative tree builder and label helpers, so
//! selector tests can state trees and expected matches compactly.

#![allow(dead_code)]

use quokka_dom::{Attribute, DomTree, ElementData, NodeId, NodeType};
use quokka_selectors::compile;

/// Declarative description of a node in a test document.
pub enum Fixture {
    /// An element with a tag, namespace, attributes, and children.
    Element {
        tag: &'static str,
        namespace: &'static str,
        attrs: Vec<(&'static str, &'static str)>,
        children: Vec<Fixture>,
    },
    /// A text node.
    Text(&'static str),
    /// A comment node.
    Comment(&'static str),
}

/// An element with no namespace.
pub fn el(
    tag: &'static str,
    attrs: &[(&'static str, &'static str)],
    children: Vec<Fixture>,
) -> Fixture {
    Fixture::Element {
        tag,
        namespace: "",
        attrs: attrs.to_vec(),
        children,
    }
}

/// An element in the given namespace.
pub fn el_ns(
    tag: &'static str,
    namespace: &'static str,
    attrs: &[(&'static str, &'static str)],
    children: Vec<Fixture>,
) -> Fixture {
    Fixture::Element {
        tag,
        namespace,
        attrs: attrs.to_vec(),
        children,
    }
}

/// A text node.
pub fn text(content: &'static str) -> Fixture {
    Fixture::Text(content)
}

/// A comment node.
pub fn comment(content: &'static str) -> Fixture {
    Fixture::Comment(content)
}

/// Build a document tree with the given fixtures as children of the
/// document node.
pub fn build(fixtures: Vec<Fixture>) -> DomTree {
    let mut tree = DomTree::new();
    let root = tree.root();
    for fixture in fixtures {
        attach(&mut tree, root, fixture);
    }
    tree
}

fn attach(tree: &mut DomTree, parent: NodeId, fixture: Fixture) {
    match fixture {
        Fixture::Element {
            tag,
            namespace,
            attrs,
            children,
        } => {
            let mut data = ElementData::with_namespace(tag, namespace);
            for (name, value) in attrs {
                data.attrs.push(Attribute::new(name, value));
            }
            let id = tree.append(parent, NodeType::Element(data));
            for child in children {
                attach(tree, id, child);
            }
        }
        Fixture::Text(content) => {
            let _ = tree.append(parent, NodeType::Text(content.to_string()));
        }
        Fixture::Comment(content) => {
            let _ = tree.append(parent, NodeType::Comment(content.to_string()));
        }
    }
}

/// A compact, unique-enough label for an element: `tag`, plus `#id` and
/// `.class` parts when present.
pub fn label(tree: &DomTree, id: NodeId) -> String {
    let element = tree.as_element(id).expect("matched node is an element");
    let mut out = element.tag_name.clone();
    if let Some(id_value) = element.id() {
        out.push('#');
        out.push_str(id_value);
    }
    for class in element.classes() {
        out.push('.');
        out.push_str(class);
    }
    out
}

/// Compile `selector`, select from the document root, and return the
/// matches as labels.
pub fn select_labels(tree: &DomTree, selector: &str) -> Vec<String> {
    let compiled = compile(selector).unwrap_or_else(|err| {
        panic!("compile({selector:?}) failed at byte {}: {err}", err.pos())
    });
    compiled
        .select(tree, tree.root())
        .into_iter()
        .map(|id| label(tree, id))
        .collect()
}
