//! Greedy, breadth-first, subtree-claiming classifier.
//!
//! Nodes are visited level by level starting at the roots. At each unclaimed
//! node the rule set is tried in priority order and the first matching rule
//! wins: the node starts a component and its whole subtree is claimed, so
//! nothing beneath it is visited. A node without a match passes its children
//! on to the next level.
//!
//! Priority only breaks ties between rules competing for the same node. A
//! shallow match always beats a deeper one, whatever their priorities,
//! because the deeper node is never reached once an ancestor is claimed.

use std::collections::VecDeque;

use crate::rules::RuleSet;
use crate::tree::{ElementTree, NodeId};

/// One node that started a component, and the rule that matched it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub node: NodeId,
    /// Index into [`RuleSet::rules`]
    pub rule: usize,
}

/// Result of classifying one tree against one rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Matched nodes in breadth-first visiting order
    pub assignments: Vec<Assignment>,
    claimed: Vec<bool>,
}

impl Classification {
    /// Whether `node` lies inside a matched subtree.
    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.claimed.get(node.index()).copied().unwrap_or(false)
    }

    /// Number of claimed nodes, matched roots included.
    pub fn claimed_count(&self) -> usize {
        self.claimed.iter().filter(|&&claimed| claimed).count()
    }

    /// Rule index assigned to `node`, if `node` started a component.
    pub fn rule_for(&self, node: NodeId) -> Option<usize> {
        self.assignments
            .iter()
            .find(|assignment| assignment.node == node)
            .map(|assignment| assignment.rule)
    }
}

/// Classify every node of `tree` reachable from its roots.
///
/// Each node is dequeued at most once, so the traversal is linear in the
/// number of nodes times the cost of evaluating the rules.
///
/// # Example
///
/// ```
/// use semantic_components::classifier::classify;
/// use semantic_components::matcher::Matcher;
/// use semantic_components::rules::{Rule, RuleSet};
/// use semantic_components::tree::ElementTree;
/// use semantic_components::types::ScrapedElement;
///
/// let tree = ElementTree::build(&[
///     ScrapedElement::new("0", "Window"),
///     ScrapedElement::new("1", "TitleBar").with_parent("0"),
///     ScrapedElement::new("2", "Button").with_parent("1").with_name("Close"),
/// ]);
/// let rules = RuleSet::new(vec![
///     Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100),
///     Rule::fixed("Buttons", Matcher::control_type("Button"), 200),
/// ])
/// .unwrap();
///
/// let result = classify(&tree, &rules);
/// // The title bar is reached first and claims the button beneath it.
/// assert_eq!(result.assignments.len(), 1);
/// assert!(result.is_claimed(tree.find("2").unwrap()));
/// ```
pub fn classify(tree: &ElementTree, rules: &RuleSet) -> Classification {
    let mut claimed = vec![false; tree.len()];
    let mut assignments = Vec::new();
    let mut queue: VecDeque<NodeId> = tree.roots().iter().copied().collect();

    while let Some(node) = queue.pop_front() {
        if claimed[node.index()] {
            continue;
        }

        match rules.first_match(tree, node) {
            Some(rule) => {
                log::trace!(
                    "[CLASSIFIER] '{}' ({}) -> {}",
                    tree.element(node).display_name(),
                    tree.element(node).control_type,
                    rules.rules()[rule].component
                );
                for member in tree.subtree(node) {
                    claimed[member.index()] = true;
                }
                assignments.push(Assignment { node, rule });
            }
            None => queue.extend(tree.children(node).iter().copied()),
        }
    }

    log::debug!(
        "[CLASSIFIER] {} component roots, {} of {} nodes claimed",
        assignments.len(),
        claimed.iter().filter(|&&c| c).count(),
        tree.len()
    );

    Classification {
        assignments,
        claimed,
    }
}
