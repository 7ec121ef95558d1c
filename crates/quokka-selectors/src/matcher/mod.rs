//! Selector matching against a document tree.
//!
//! Matching never mutates the tree and never fails: a compiled selector is
//! well-formed by construction, and traversal over a finite, acyclic tree
//! always terminates. Recursion depth is bounded by document depth.
//!
//! Only element nodes can match a compound selector; text and comment
//! nodes are skipped by every traversal and sibling count.

use std::collections::HashSet;

use quokka_dom::{DomTree, ElementData, NodeId};

use crate::compiler::{
    AttributePredicate, ComplexMatcher, CompoundMatcher, Predicate, Selector, TagCheck, TypeCheck,
};
use crate::parser::{AttrOperator, Combinator, Nth};

impl Selector {
    /// Find every node under (and including) `root` matched by this
    /// selector list.
    ///
    /// The result is the concatenation of each comma-separated member's
    /// matches, in selector-list order: results are deduplicated within a
    /// member but not across members, so selecting `"p, p"` against a
    /// single `<p>` returns that node twice. Within a member, nodes appear
    /// in the order the combinator expansion visits them, which is document
    /// order for the common single-compound case; no final document-order
    /// re-sort is performed.
    #[must_use]
    pub fn select(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        let mut matched = Vec::new();
        for member in &self.members {
            member.select_into(tree, root, &mut matched);
        }
        matched
    }

    /// Whether `id` is matched by any member of this selector list.
    ///
    /// Combinator links are checked with the same relationships `select`
    /// expands, so `sel.matches(tree, id)` agrees with membership in
    /// `sel.select(tree, root)` for any root above the chain.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.members.iter().any(|m| m.matches(tree, id))
    }
}

impl ComplexMatcher {
    /// Evaluate this complex selector from `root`, appending matches to
    /// `out`.
    ///
    /// Step 1: every node matching the first compound selector is found by
    /// unrestricted depth-first pre-order search (the root itself is tested
    /// too). Step 2: each `(combinator, compound)` link expands the current
    /// candidate set through the combinator's relationship. The final
    /// candidate set is the result, in expansion order.
    fn select_into(&self, tree: &DomTree, root: NodeId, out: &mut Vec<NodeId>) {
        let mut current = Vec::new();
        collect_subtree_matches(tree, root, &self.first, &mut current);

        for (combinator, compound) in &self.rest {
            let mut next = Vec::new();
            let mut seen = HashSet::new();
            for &candidate in &current {
                expand_combinator(tree, candidate, *combinator, compound, &mut next, &mut seen);
            }
            current = next;
        }

        out.extend(current);
    }

    /// Whether `id` satisfies the whole chain, with `id` matched by the
    /// final compound selector.
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.link_matches(tree, id, self.rest.len())
    }

    fn compound_at(&self, index: usize) -> &CompoundMatcher {
        if index == 0 {
            &self.first
        } else {
            &self.rest[index - 1].1
        }
    }

    /// Check the chain prefix ending at link `index` against `id`,
    /// backtracking over every node related to `id` by the link's
    /// combinator. The sibling relationships look both directions, mirroring
    /// the expansion in `select_into`.
    fn link_matches(&self, tree: &DomTree, id: NodeId, index: usize) -> bool {
        if !self.compound_at(index).matches(tree, id) {
            return false;
        }
        if index == 0 {
            return true;
        }
        let combinator = self.rest[index - 1].0;
        match combinator {
            Combinator::Descendant => tree
                .ancestors(id)
                .any(|ancestor| self.link_matches(tree, ancestor, index - 1)),
            Combinator::Child => tree
                .parent(id)
                .is_some_and(|parent| self.link_matches(tree, parent, index - 1)),
            Combinator::NextSibling => {
                nearest_element(tree.preceding_siblings(id), tree)
                    .is_some_and(|s| self.link_matches(tree, s, index - 1))
                    || nearest_element(tree.following_siblings(id), tree)
                        .is_some_and(|s| self.link_matches(tree, s, index - 1))
            }
            Combinator::SubsequentSibling => {
                tree.preceding_siblings(id)
                    .chain(tree.following_siblings(id))
                    .any(|s| {
                        tree.as_element(s).is_some() && self.link_matches(tree, s, index - 1)
                    })
            }
            // Rejected at compile time.
            Combinator::Column => false,
        }
    }
}

impl CompoundMatcher {
    /// AND of the type check (if present) and every predicate. Non-element
    /// nodes never match.
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(element) = tree.as_element(id) else {
            return false;
        };
        if let Some(type_check) = &self.type_check {
            if !type_check.matches(element) {
                return false;
            }
        }
        self.predicates
            .iter()
            .all(|p| p.matches(tree, id, element))
    }
}

impl TypeCheck {
    fn matches(&self, element: &ElementData) -> bool {
        if !self.namespace.allows(&element.namespace) {
            return false;
        }
        match self.tag {
            TagCheck::Universal => true,
            TagCheck::Tag(tag) => element.tag_name.eq_ignore_ascii_case(tag),
        }
    }
}

impl Predicate {
    fn matches(&self, tree: &DomTree, id: NodeId, element: &ElementData) -> bool {
        match self {
            Predicate::Id(name) => element.id() == Some(name.as_str()),
            Predicate::Class(name) => element.classes().any(|class| class == name),
            Predicate::Attribute(attr) => attr.matches(element),

            // ":empty" - no children of element type. Text (even
            // non-whitespace) and comment children do not disqualify.
            Predicate::Empty => tree
                .children(id)
                .iter()
                .all(|&child| tree.as_element(child).is_none()),

            // ":first-child" / ":last-child" - no element sibling on the
            // respective side. Text and comment siblings don't count.
            Predicate::FirstChild => no_element(tree.preceding_siblings(id), tree),
            Predicate::LastChild => no_element(tree.following_siblings(id), tree),
            Predicate::OnlyChild => {
                no_element(tree.preceding_siblings(id), tree)
                    && no_element(tree.following_siblings(id), tree)
            }

            // ":first-of-type" / ":last-of-type" - no element sibling with
            // the same tag identity on the respective side.
            Predicate::FirstOfType => {
                no_same_type(tree.preceding_siblings(id), tree, &element.tag_name)
            }
            Predicate::LastOfType => {
                no_same_type(tree.following_siblings(id), tree, &element.tag_name)
            }
            Predicate::OnlyOfType => {
                no_same_type(tree.preceding_siblings(id), tree, &element.tag_name)
                    && no_same_type(tree.following_siblings(id), tree, &element.tag_name)
            }

            // ":root" - no parent element. The arena keeps an explicit
            // document node above the root element, which counts as "no
            // parent".
            Predicate::Root => match tree.parent(id) {
                None => true,
                Some(parent) => tree.is_document(parent),
            },

            Predicate::NthChild(nth) => {
                nth_matches(*nth, sibling_position(tree.preceding_siblings(id), tree, None))
            }
            Predicate::NthLastChild(nth) => {
                nth_matches(*nth, sibling_position(tree.following_siblings(id), tree, None))
            }
            Predicate::NthOfType(nth) => nth_matches(
                *nth,
                sibling_position(tree.preceding_siblings(id), tree, Some(&element.tag_name)),
            ),
            Predicate::NthLastOfType(nth) => nth_matches(
                *nth,
                sibling_position(tree.following_siblings(id), tree, Some(&element.tag_name)),
            ),
        }
    }
}

impl AttributePredicate {
    /// Scan the element's attribute list for a namespace+name match, then
    /// apply the value operator. A missing attribute is a mismatch, never
    /// an error.
    fn matches(&self, element: &ElementData) -> bool {
        let Some(attr) = element
            .attrs
            .iter()
            .find(|a| self.namespace.allows(&a.namespace) && a.name == self.name)
        else {
            return false;
        };

        if self.case_insensitive {
            self.value_matches(
                &attr.value.to_ascii_lowercase(),
                &self.value.to_ascii_lowercase(),
            )
        } else {
            self.value_matches(&attr.value, &self.value)
        }
    }

    fn value_matches(&self, actual: &str, expected: &str) -> bool {
        match self.operator {
            AttrOperator::Presence => true,
            AttrOperator::Equals => actual == expected,
            AttrOperator::Includes => actual.split_ascii_whitespace().any(|word| word == expected),
            AttrOperator::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected)
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            AttrOperator::Prefix => actual.starts_with(expected),
            AttrOperator::Suffix => actual.ends_with(expected),
            AttrOperator::Substring => actual.contains(expected),
        }
    }
}

/// Depth-first pre-order search testing every node in the subtree,
/// including `id` itself.
fn collect_subtree_matches(
    tree: &DomTree,
    id: NodeId,
    compound: &CompoundMatcher,
    out: &mut Vec<NodeId>,
) {
    if compound.matches(tree, id) {
        out.push(id);
    }
    for &child in tree.children(id) {
        collect_subtree_matches(tree, child, compound, out);
    }
}

/// Expand one candidate through one combinator, appending matching related
/// nodes. `seen` deduplicates across the whole expansion step: distinct
/// candidates can reach the same node (two `<div>`s flanking one `<p>` both
/// reach it through `+`), and the result is a candidate set.
fn expand_combinator(
    tree: &DomTree,
    id: NodeId,
    combinator: Combinator,
    compound: &CompoundMatcher,
    out: &mut Vec<NodeId>,
    seen: &mut HashSet<NodeId>,
) {
    match combinator {
        // All element descendants, pre-order.
        Combinator::Descendant => {
            for &child in tree.children(id) {
                collect_descendant_matches(tree, child, compound, out, seen);
            }
        }

        // Direct element children only.
        Combinator::Child => {
            for &child in tree.children(id) {
                if compound.matches(tree, child) {
                    push_unique(out, seen, child);
                }
            }
        }

        // The nearest element sibling on each side. Strict CSS only looks
        // forward; testing both directions is the reference behavior this
        // engine preserves (see DESIGN.md).
        Combinator::NextSibling => {
            if let Some(prev) = nearest_element(tree.preceding_siblings(id), tree) {
                if compound.matches(tree, prev) {
                    push_unique(out, seen, prev);
                }
            }
            if let Some(next) = nearest_element(tree.following_siblings(id), tree) {
                if compound.matches(tree, next) {
                    push_unique(out, seen, next);
                }
            }
        }

        // Every element sibling on each side: preceding siblings in
        // document order first, then following siblings.
        Combinator::SubsequentSibling => {
            let mut preceding: Vec<NodeId> = tree
                .preceding_siblings(id)
                .filter(|&s| tree.as_element(s).is_some())
                .collect();
            preceding.reverse();
            for sibling in preceding {
                if compound.matches(tree, sibling) {
                    push_unique(out, seen, sibling);
                }
            }
            for sibling in tree.following_siblings(id) {
                if tree.as_element(sibling).is_some() && compound.matches(tree, sibling) {
                    push_unique(out, seen, sibling);
                }
            }
        }

        // Rejected at compile time; no candidates.
        Combinator::Column => {}
    }
}

/// Pre-order search over a candidate's descendants.
fn collect_descendant_matches(
    tree: &DomTree,
    id: NodeId,
    compound: &CompoundMatcher,
    out: &mut Vec<NodeId>,
    seen: &mut HashSet<NodeId>,
) {
    if compound.matches(tree, id) {
        push_unique(out, seen, id);
    }
    for &child in tree.children(id) {
        collect_descendant_matches(tree, child, compound, out, seen);
    }
}

fn push_unique(out: &mut Vec<NodeId>, seen: &mut HashSet<NodeId>, id: NodeId) {
    if seen.insert(id) {
        out.push(id);
    }
}

/// The first element node produced by a sibling iterator.
fn nearest_element(mut siblings: impl Iterator<Item = NodeId>, tree: &DomTree) -> Option<NodeId> {
    siblings.find(|&s| tree.as_element(s).is_some())
}

/// Whether the sibling iterator contains no element nodes.
fn no_element(mut siblings: impl Iterator<Item = NodeId>, tree: &DomTree) -> bool {
    siblings.all(|s| tree.as_element(s).is_none())
}

/// Whether the sibling iterator contains no element with the given tag
/// identity (ASCII-case-insensitive, per HTML tag semantics).
fn no_same_type(mut siblings: impl Iterator<Item = NodeId>, tree: &DomTree, tag: &str) -> bool {
    siblings.all(|s| !same_type(tree, s, tag))
}

fn same_type(tree: &DomTree, id: NodeId, tag: &str) -> bool {
    tree.as_element(id)
        .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag))
}

/// 1-based position among element siblings, counted over the given sibling
/// iterator (preceding siblings for `:nth-child`, following for
/// `:nth-last-child`), optionally restricted to a tag identity for the
/// `-of-type` variants.
fn sibling_position(
    siblings: impl Iterator<Item = NodeId>,
    tree: &DomTree,
    of_type: Option<&str>,
) -> i64 {
    let count = siblings
        .filter(|&s| match of_type {
            None => tree.as_element(s).is_some(),
            Some(tag) => same_type(tree, s, tag),
        })
        .count();
    i64::try_from(count).unwrap_or(i64::MAX) + 1
}

/// Membership in the arithmetic progression `a·n + b` for n ≥ 0:
/// if a is zero the position must equal b exactly; otherwise `position - b`
/// must be divisible by a with a non-negative quotient.
fn nth_matches(nth: Nth, position: i64) -> bool {
    let diff = position - nth.b;
    if nth.a == 0 {
        return diff == 0;
    }
    diff % nth.a == 0 && diff / nth.a >= 0
}
