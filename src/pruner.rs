//! Residual pruning: whatever no rule claimed becomes "Other Controls".
//!
//! Claimed nodes are recognized by their structural [`NodeSignature`] rather
//! than by handle, so the same claimed set can be applied to a tree rebuilt
//! from a later scan. The output is a fresh [`ElementTree`] holding pruned
//! copies; the snapshot tree is never modified.

use std::collections::HashSet;
use std::sync::Arc;

use crate::components::{SemanticComponent, OTHER_CONTROLS};
use crate::tree::{ElementTree, NodeId};
use crate::types::{ComponentType, NodeSignature};

/// Signatures of every node owned by any of `components`.
pub fn claimed_signatures(components: &[SemanticComponent]) -> HashSet<NodeSignature> {
    components
        .iter()
        .flat_map(|component| component.signatures())
        .collect()
}

/// Build the "Other Controls" component for `tree`.
///
/// Candidates are the children of the primary root followed by any
/// additional roots. Component roots are skipped by identity. Below that, a
/// node whose signature is claimed is dropped on its own: its surviving
/// children move up to the nearest kept ancestor, or become roots. A node
/// that had children but kept none is dropped as well. Returns `None` when
/// nothing survives.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use semantic_components::classifier::classify;
/// use semantic_components::components::build_components;
/// use semantic_components::matcher::Matcher;
/// use semantic_components::pruner::prune_residual;
/// use semantic_components::rules::{Rule, RuleSet};
/// use semantic_components::tree::ElementTree;
/// use semantic_components::types::ScrapedElement;
///
/// let tree = Arc::new(ElementTree::build(&[
///     ScrapedElement::new("w", "Window"),
///     ScrapedElement::new("t", "TitleBar").with_parent("w"),
///     ScrapedElement::new("ok", "Button").with_parent("w").with_name("OK"),
/// ]));
/// let rules = RuleSet::new(vec![
///     Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100),
/// ]).unwrap();
/// let components = build_components(&tree, &classify(&tree, &rules), &rules);
///
/// let other = prune_residual(&tree, &components).unwrap();
/// assert_eq!(other.name, "Other Controls");
/// assert_eq!(other.root_elements().next().unwrap().id, "ok");
/// ```
pub fn prune_residual(
    tree: &Arc<ElementTree>,
    components: &[SemanticComponent],
) -> Option<SemanticComponent> {
    let root = tree.root()?;
    let claimed = claimed_signatures(components);
    let component_roots: HashSet<NodeId> = components
        .iter()
        .filter(|component| std::ptr::eq(component.tree(), tree.as_ref()))
        .flat_map(|component| component.roots().iter().copied())
        .collect();

    if component_roots.contains(&root) {
        return None;
    }

    let candidates: Vec<NodeId> = tree
        .children(root)
        .iter()
        .chain(tree.roots().iter().skip(1))
        .copied()
        .filter(|node| !component_roots.contains(node))
        .collect();

    let mut fates = vec![Fate::Drop; tree.len()];
    for &candidate in &candidates {
        decide(tree, candidate, &claimed, &mut fates);
    }

    let mut residual = ElementTree::default();
    for &candidate in &candidates {
        copy_survivors(tree, candidate, &fates, &mut residual);
    }

    if residual.is_empty() {
        log::debug!("[PRUNER] Every top-level control is claimed, no residual component");
        return None;
    }

    let roots = residual.roots().to_vec();
    log::debug!(
        "[PRUNER] {} residual roots, {} nodes kept",
        roots.len(),
        residual.len()
    );

    Some(SemanticComponent::new(
        OTHER_CONTROLS,
        ComponentType::Variable,
        Arc::new(residual),
        roots,
    ))
}

/// What pruning does with one source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fate {
    /// Copied into the residual tree.
    Keep,
    /// Signature claimed, but something below survives and moves up.
    Lift,
    /// Nothing in the subtree survives.
    Drop,
}

/// Fill in `fates` for every node under `top`, children before parents.
fn decide(tree: &ElementTree, top: NodeId, claimed: &HashSet<NodeSignature>, fates: &mut [Fate]) {
    let order: Vec<NodeId> = tree.subtree(top).collect();
    for &node in order.iter().rev() {
        let children = tree.children(node);
        let survivor_below = children
            .iter()
            .any(|child| fates[child.index()] != Fate::Drop);

        fates[node.index()] = if claimed.contains(&tree.element(node).signature()) {
            if survivor_below {
                Fate::Lift
            } else {
                Fate::Drop
            }
        } else if children.is_empty() || survivor_below {
            Fate::Keep
        } else {
            Fate::Drop
        };
    }
}

/// Copy the kept nodes under `top` into `residual`, preserving pre-order.
fn copy_survivors(tree: &ElementTree, top: NodeId, fates: &[Fate], residual: &mut ElementTree) {
    let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(top, None)];
    while let Some((node, parent)) = stack.pop() {
        let parent = match fates[node.index()] {
            Fate::Drop => continue,
            Fate::Lift => parent,
            Fate::Keep => Some(residual.push(tree.element(node).clone(), parent)),
        };
        stack.extend(tree.children(node).iter().rev().map(|&child| (child, parent)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::components::build_components;
    use crate::matcher::Matcher;
    use crate::rules::{Rule, RuleSet};
    use crate::types::ScrapedElement;
    use pretty_assertions::assert_eq;

    fn outline(component: &SemanticComponent) -> Vec<String> {
        let tree = component.tree();
        component
            .nodes()
            .map(|node| format!("{}{}", "  ".repeat(tree.depth(node)), tree.element(node).id))
            .collect()
    }

    fn run(elements: &[ScrapedElement], rules: Vec<Rule>) -> Option<SemanticComponent> {
        let tree = Arc::new(ElementTree::build(elements));
        let rules = RuleSet::new(rules).unwrap();
        let components = build_components(&tree, &classify(&tree, &rules), &rules);
        prune_residual(&tree, &components)
    }

    #[test]
    fn test_mixed_subtree_keeps_only_unclaimed_descendants() {
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("p", "Pane").with_parent("w"),
                ScrapedElement::new("s", "StatusBar").with_parent("p"),
                ScrapedElement::new("s1", "Text").with_parent("s").with_name("3 items"),
                ScrapedElement::new("b", "Button").with_parent("p").with_name("Share"),
            ],
            vec![Rule::variable("Status Bar", Matcher::control_type("StatusBar"), 10)],
        )
        .unwrap();

        assert_eq!(outline(&other), vec!["p", "  b"]);
        assert_eq!(other.component_type, ComponentType::Variable);
    }

    #[test]
    fn test_fully_claimed_container_is_dropped() {
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("p", "Pane").with_parent("w"),
                ScrapedElement::new("t", "Tree").with_parent("p").with_name("Navigation Pane"),
                ScrapedElement::new("l", "List").with_parent("p").with_name("Items View"),
                ScrapedElement::new("x", "Button").with_parent("w").with_name("Help"),
            ],
            vec![
                Rule::variable("Navigation Pane", Matcher::control_type("Tree"), 10),
                Rule::variable("Items View", Matcher::control_type("List"), 10),
            ],
        )
        .unwrap();

        assert_eq!(outline(&other), vec!["x"]);
    }

    #[test]
    fn test_unclaimed_leaves_survive_and_nothing_left_gives_none() {
        let none_left = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("t", "TitleBar").with_parent("w"),
            ],
            vec![Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100)],
        );
        assert!(none_left.is_none());

        let empty_pane = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("p", "Pane").with_parent("w"),
            ],
            vec![Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100)],
        )
        .unwrap();
        // A childless pane is a leaf, not an emptied shell.
        assert_eq!(outline(&empty_pane), vec!["p"]);
    }

    #[test]
    fn test_claimed_root_leaves_no_residual() {
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("b", "Button").with_parent("w"),
            ],
            vec![Rule::variable("Window", Matcher::control_type("Window"), 1)],
        );
        assert!(other.is_none());
    }

    #[test]
    fn test_signature_match_drops_lookalikes() {
        // Both "Close" buttons share a signature; claiming the one in the
        // title bar removes its twin from the residual as well.
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("t", "TitleBar").with_parent("w"),
                ScrapedElement::new("c1", "Button").with_parent("t").with_name("Close"),
                ScrapedElement::new("d", "Pane").with_parent("w"),
                ScrapedElement::new("c2", "Button").with_parent("d").with_name("Close"),
                ScrapedElement::new("o", "Button").with_parent("d").with_name("Open"),
            ],
            vec![Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100)],
        )
        .unwrap();

        assert_eq!(outline(&other), vec!["d", "  o"]);
    }

    #[test]
    fn test_claimed_wrapper_signature_lifts_unclaimed_controls() {
        // The nameless pane inside the navigation tree shares its signature
        // with the pane holding the buttons. Only the pane itself goes.
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("nav", "Tree").with_parent("w").with_name("Navigation Pane"),
                ScrapedElement::new("np", "Pane").with_parent("nav"),
                ScrapedElement::new("desk", "TreeItem").with_parent("np").with_name("Desktop"),
                ScrapedElement::new("p", "Pane").with_parent("w"),
                ScrapedElement::new("help", "Button").with_parent("p").with_name("Help"),
                ScrapedElement::new("share", "Button").with_parent("p").with_name("Share"),
            ],
            vec![Rule::variable("Navigation Pane", Matcher::control_type("Tree"), 70)],
        )
        .unwrap();

        assert_eq!(outline(&other), vec!["help", "share"]);
        assert_eq!(other.roots().len(), 2);
    }

    #[test]
    fn test_lifted_children_keep_their_position() {
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("nav", "Tree").with_parent("w"),
                ScrapedElement::new("np", "Pane").with_parent("nav"),
                ScrapedElement::new("d", "Pane").with_parent("w").with_name("Dialog"),
                ScrapedElement::new("a", "Button").with_parent("d").with_name("A"),
                ScrapedElement::new("x", "Pane").with_parent("d"),
                ScrapedElement::new("b", "Button").with_parent("x").with_name("B"),
                ScrapedElement::new("c", "Button").with_parent("d").with_name("C"),
            ],
            vec![Rule::variable("Navigation", Matcher::control_type("Tree"), 70)],
        )
        .unwrap();

        assert_eq!(outline(&other), vec!["d", "  a", "  b", "  c"]);
    }

    #[test]
    fn test_deep_chain_is_copied_without_recursion() {
        let depth = 100_000;
        let mut elements = vec![ScrapedElement::new("0", "Window")];
        for i in 1..=depth {
            elements.push(ScrapedElement::new(i.to_string(), "Custom").with_parent((i - 1).to_string()));
        }

        let other = run(
            &elements,
            vec![Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100)],
        )
        .unwrap();

        assert_eq!(other.tree().len(), depth);
        assert_eq!(other.roots().len(), 1);
        assert_eq!(other.node_count(), depth);
    }

    #[test]
    fn test_additional_roots_are_candidates() {
        let other = run(
            &[
                ScrapedElement::new("w", "Window"),
                ScrapedElement::new("t", "TitleBar").with_parent("w"),
                ScrapedElement::new("popup", "Menu").with_parent("detached"),
                ScrapedElement::new("m", "MenuItem").with_parent("popup").with_name("Copy"),
            ],
            vec![Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100)],
        )
        .unwrap();

        assert_eq!(outline(&other), vec!["popup", "  m"]);
    }

    #[test]
    fn test_residual_tree_is_a_copy() {
        let tree = Arc::new(ElementTree::build(&[
            ScrapedElement::new("w", "Window"),
            ScrapedElement::new("b", "Button").with_parent("w").with_name("OK"),
        ]));
        let other = prune_residual(&tree, &[]).unwrap();

        assert!(!std::ptr::eq(other.tree(), tree.as_ref()));
        assert_eq!(tree.len(), 2);
        assert_eq!(other.tree().len(), 1);
        assert_eq!(other.tree().parent(other.roots()[0]), None);
    }
}
