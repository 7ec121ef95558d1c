//! Tests for tree construction and navigation: sibling links, iterators,
//! element data helpers.

use quokka_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

// ========== append_child ==========

#[test]
fn test_append_child_sets_parent_and_sibling_links() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.parent(b), Some(parent));

    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.next_sibling(c), None);

    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
}

#[test]
fn test_append_allocates_and_attaches() {
    let mut tree = DomTree::new();
    let div = tree.append(NodeId::ROOT, NodeType::Element(ElementData::new("div")));
    let text = tree.append(div, NodeType::Text("hello".to_string()));

    assert_eq!(tree.parent(text), Some(div));
    assert_eq!(tree.as_text(text), Some("hello"));
    assert_eq!(tree.len(), 3); // document + div + text
    assert!(!tree.is_empty());
}

// ========== iterators ==========

#[test]
fn test_ancestors_walks_to_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);
    let p = alloc_element(&mut tree, "p");
    tree.append_child(body, p);

    let ancestors: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(ancestors, vec![body, html, NodeId::ROOT]);
}

#[test]
fn test_preceding_and_following_siblings() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, parent);

    let mut items = Vec::new();
    for _ in 0..4 {
        let li = alloc_element(&mut tree, "li");
        tree.append_child(parent, li);
        items.push(li);
    }

    let preceding: Vec<NodeId> = tree.preceding_siblings(items[2]).collect();
    assert_eq!(preceding, vec![items[1], items[0]]);

    let following: Vec<NodeId> = tree.following_siblings(items[1]).collect();
    assert_eq!(following, vec![items[2], items[3]]);
}

// ========== node kinds ==========

#[test]
fn test_as_element_filters_non_elements() {
    let mut tree = DomTree::new();
    let div = tree.append(NodeId::ROOT, NodeType::Element(ElementData::new("div")));
    let text = tree.append(div, NodeType::Text("x".to_string()));
    let comment = tree.append(div, NodeType::Comment("c".to_string()));

    assert!(tree.as_element(div).is_some());
    assert!(tree.as_element(text).is_none());
    assert!(tree.as_element(comment).is_none());
    assert!(tree.is_document(NodeId::ROOT));
    assert!(!tree.is_document(div));
}

#[test]
fn test_document_element_skips_non_elements() {
    let mut tree = DomTree::new();
    let _ = tree.append(NodeId::ROOT, NodeType::Comment("doctype-ish".to_string()));
    let html = tree.append(NodeId::ROOT, NodeType::Element(ElementData::new("html")));

    assert_eq!(tree.document_element(), Some(html));
}

// ========== element data ==========

#[test]
fn test_element_attribute_lookup_is_ordered() {
    let data = ElementData::new("input")
        .attr("type", "text")
        .attr("type", "shadowed");

    // First match wins; the attribute list preserves document order.
    assert_eq!(data.attribute("type"), Some("text"));
    assert_eq!(data.attribute("missing"), None);
}

#[test]
fn test_element_id_and_classes() {
    let data = ElementData::new("div")
        .attr("id", "main")
        .attr("class", "  foo \t bar ");

    assert_eq!(data.id(), Some("main"));
    let classes: Vec<&str> = data.classes().collect();
    assert_eq!(classes, vec!["foo", "bar"]);

    let bare = ElementData::new("div");
    assert_eq!(bare.classes().count(), 0);
}

#[test]
fn test_element_namespace() {
    let svg = ElementData::with_namespace("a", "svg");
    assert_eq!(svg.namespace, "svg");
    assert_eq!(svg.tag_name, "a");

    let html = ElementData::new("a");
    assert!(html.namespace.is_empty());
}
