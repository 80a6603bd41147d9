//! Human-readable summaries of semantic components.
//!
//! The renderer walks a component's roots depth-first and produces indented
//! lines of the form `<id>:<label> (<controlType>)`, the same shape as an
//! action-plan step, so a planner can echo a line back as an action.
//!
//! Which nodes produce lines is decided by the type lists in
//! [`SummaryConfig`]:
//!
//! 1. Wrappers (Group, Pane) with exactly one child are transparent: the
//!    child is rendered at the same depth and the wrapper emits nothing.
//! 2. Items (TreeItem, ListItem, ...) always emit a line labelled with the
//!    text gathered from their subtree, then render their non-text children
//!    one level deeper.
//! 3. Leaves (Button, CheckBox, ...) emit their own name and stop.
//! 4. Anything else emits a line only when it is important (important type,
//!    or a name distinct from its class name and control type). Unimportant
//!    nodes are flattened: their children render at the same depth.
//!
//! Rendering is a pure function of the tree and the configuration.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::components::SemanticComponent;
use crate::roles;
use crate::tree::{ElementTree, NodeId};
use crate::types::ScrapedElement;

/// Control-type lists driving the renderer heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Containers unwrapped when they have exactly one child
    pub unwrap_types: Vec<String>,

    /// Types labelled from their descendants' text
    pub item_types: Vec<String>,

    /// Types emitted with their own name, without recursion
    pub leaf_types: Vec<String>,

    /// Types always emitted
    pub important_types: Vec<String>,

    /// Types that only carry text
    pub text_types: Vec<String>,

    /// Container types skipped under an item when they only hold text
    pub group_types: Vec<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        fn owned(types: &[&str]) -> Vec<String> {
            types.iter().map(|t| t.to_string()).collect()
        }

        Self {
            unwrap_types: owned(roles::WRAPPER_TYPES),
            item_types: owned(roles::ITEM_TYPES),
            leaf_types: owned(roles::LEAF_TYPES),
            important_types: owned(roles::IMPORTANT_TYPES),
            text_types: owned(roles::TEXT_TYPES),
            group_types: owned(&[roles::GROUP]),
        }
    }
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub depth: usize,
    pub element_id: String,
    pub text: String,
}

/// Ordered lines describing one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub component: String,
    pub lines: Vec<SummaryLine>,
}

impl Summary {
    /// Lines joined with newlines, indented two spaces per depth level.
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{}{}", "  ".repeat(line.depth), line.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// SHA-256 of the rendered text, lowercase hex.
    ///
    /// Two summaries with the same digest render identically, which lets a
    /// caller skip re-sending an unchanged component.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.render().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Line-level difference between two renderings of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SummaryDiff {
    /// Compare line texts, ignoring depth. Repeated lines are counted, so a
    /// line that appears twice before and once after is reported removed once.
    pub fn between(before: &Summary, after: &Summary) -> Self {
        SummaryDiff {
            added: unmatched(&after.lines, &before.lines),
            removed: unmatched(&before.lines, &after.lines),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

fn unmatched(lines: &[SummaryLine], against: &[SummaryLine]) -> Vec<String> {
    let mut available: HashMap<&str, usize> = HashMap::new();
    for line in against {
        *available.entry(line.text.as_str()).or_default() += 1;
    }

    let mut result = Vec::new();
    for line in lines {
        match available.get_mut(line.text.as_str()) {
            Some(count) if *count > 0 => *count -= 1,
            _ => result.push(line.text.clone()),
        }
    }
    result
}

/// Renders components into [`Summary`] values.
#[derive(Debug, Clone, Default)]
pub struct SummaryRenderer {
    config: SummaryConfig,
}

impl SummaryRenderer {
    pub fn new(config: SummaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Summarize one component.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use semantic_components::components::SemanticComponent;
    /// use semantic_components::summary::SummaryRenderer;
    /// use semantic_components::tree::ElementTree;
    /// use semantic_components::types::{ComponentType, ScrapedElement};
    ///
    /// let tree = Arc::new(ElementTree::build(&[
    ///     ScrapedElement::new("1", "ToolBar").with_name("Navigation"),
    ///     ScrapedElement::new("2", "Button").with_parent("1").with_name("Back"),
    /// ]));
    /// let roots = tree.roots().to_vec();
    /// let component = SemanticComponent::new("Toolbar", ComponentType::Static, tree, roots);
    ///
    /// let summary = SummaryRenderer::default().summarize(&component);
    /// assert_eq!(summary.render(), "1:Navigation (ToolBar)\n  2:Back (Button)");
    /// ```
    pub fn summarize(&self, component: &SemanticComponent) -> Summary {
        let tree = component.tree();
        let mut lines = Vec::new();
        let mut pending: Vec<(NodeId, usize)> =
            component.roots().iter().rev().map(|&root| (root, 0)).collect();
        while let Some((node, depth)) = pending.pop() {
            self.visit(tree, node, depth, &mut lines, &mut pending);
        }

        Summary {
            component: component.name.clone(),
            lines,
        }
    }

    /// Emit the line for `node`, if any, and queue its children so they pop
    /// in document order.
    fn visit(
        &self,
        tree: &ElementTree,
        node: NodeId,
        depth: usize,
        lines: &mut Vec<SummaryLine>,
        pending: &mut Vec<(NodeId, usize)>,
    ) {
        let element = tree.element(node);
        let children = tree.children(node);

        if has_type(&self.config.unwrap_types, element) && children.len() == 1 {
            pending.push((children[0], depth));
            return;
        }

        if has_type(&self.config.item_types, element) {
            let label = self.item_label(tree, node);
            lines.push(line(element, depth, &label));

            pending.extend(
                children
                    .iter()
                    .rev()
                    .filter(|&&child| {
                        !self.is_text(tree.element(child)) && !self.is_text_group(tree, child)
                    })
                    .map(|&child| (child, depth + 1)),
            );
            return;
        }

        if has_type(&self.config.leaf_types, element) {
            lines.push(line(element, depth, element.display_name()));
            return;
        }

        let child_depth = if self.is_important(element) {
            lines.push(line(element, depth, element.display_name()));
            depth + 1
        } else {
            depth
        };

        pending.extend(children.iter().rev().map(|&child| (child, child_depth)));
    }

    /// Label for an item: the distinct, meaningful text fragments of its
    /// subtree, with fragments contained in a longer one dropped, joined in
    /// discovery order.
    fn item_label(&self, tree: &ElementTree, node: NodeId) -> String {
        let mut fragments: Vec<&str> = Vec::new();
        for member in tree.subtree(node) {
            if let Some(name) = tree.element(member).trimmed_name() {
                if is_meaningful(name) && !fragments.contains(&name) {
                    fragments.push(name);
                }
            }
        }

        let mut by_length: Vec<(usize, &str)> = fragments.iter().copied().enumerate().collect();
        by_length.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()));

        let mut kept: Vec<(usize, &str)> = Vec::new();
        for (position, fragment) in by_length {
            if !kept.iter().any(|(_, longer)| longer.contains(fragment)) {
                kept.push((position, fragment));
            }
        }
        kept.sort_by_key(|(position, _)| *position);

        if kept.is_empty() {
            return tree.element(node).display_name().to_string();
        }

        kept.iter()
            .map(|(_, fragment)| *fragment)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn is_text(&self, element: &ScrapedElement) -> bool {
        has_type(&self.config.text_types, element)
    }

    fn is_text_group(&self, tree: &ElementTree, node: NodeId) -> bool {
        has_type(&self.config.group_types, tree.element(node))
            && !tree.children(node).is_empty()
            && tree
                .descendants(node)
                .all(|descendant| self.is_text(tree.element(descendant)))
    }

    fn is_important(&self, element: &ScrapedElement) -> bool {
        if has_type(&self.config.important_types, element) {
            return true;
        }

        match element.trimmed_name() {
            Some(name) => {
                element.class_name.as_deref() != Some(name) && element.control_type != name
            }
            None => false,
        }
    }
}

fn has_type(types: &[String], element: &ScrapedElement) -> bool {
    types.iter().any(|t| *t == element.control_type)
}

fn line(element: &ScrapedElement, depth: usize, label: &str) -> SummaryLine {
    SummaryLine {
        depth,
        element_id: element.id.clone(),
        text: format!("{}:{} ({})", element.id, label, element.control_type),
    }
}

/// Whether a fragment has any letter, digit or punctuation in it.
fn is_meaningful(fragment: &str) -> bool {
    fragment
        .chars()
        .any(|c| c.is_alphanumeric() || c.is_ascii_punctuation())
}

/// Distinct element ids mentioned by a summary.
pub fn mentioned_ids(summary: &Summary) -> HashSet<&str> {
    summary
        .lines
        .iter()
        .map(|line| line.element_id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComponentType;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn component(elements: &[ScrapedElement]) -> SemanticComponent {
        let tree = Arc::new(ElementTree::build(elements));
        let roots = tree.roots().to_vec();
        SemanticComponent::new("Test", ComponentType::Variable, tree, roots)
    }

    fn render(elements: &[ScrapedElement]) -> String {
        SummaryRenderer::default().summarize(&component(elements)).render()
    }

    #[test]
    fn test_single_child_wrapper_is_unwrapped() {
        let rendered = render(&[
            ScrapedElement::new("g", "Group"),
            ScrapedElement::new("p", "Pane").with_parent("g").with_name("Inner"),
            ScrapedElement::new("b", "Button").with_parent("p").with_name("Run"),
        ]);
        assert_eq!(rendered, "b:Run (Button)");
    }

    #[test]
    fn test_named_wrapper_with_many_children_is_kept() {
        let rendered = render(&[
            ScrapedElement::new("g", "Group").with_name("Source Control"),
            ScrapedElement::new("b1", "Button").with_parent("g").with_name("Commit"),
            ScrapedElement::new("b2", "Button").with_parent("g").with_name("Refresh"),
        ]);
        assert_eq!(
            rendered,
            "g:Source Control (Group)\n  b1:Commit (Button)\n  b2:Refresh (Button)"
        );
    }

    #[test]
    fn test_unimportant_nodes_are_flattened() {
        let rendered = render(&[
            ScrapedElement::new("p", "Pane").with_class_name("DUIViewWndClassName"),
            ScrapedElement::new("b1", "Button").with_parent("p").with_name("New"),
            ScrapedElement::new("c", "Custom").with_parent("p"),
            ScrapedElement::new("b2", "Button").with_parent("c").with_name("Sort"),
        ]);
        assert_eq!(rendered, "b1:New (Button)\nb2:Sort (Button)");
    }

    #[test]
    fn test_name_equal_to_class_or_type_is_unimportant() {
        let rendered = render(&[
            ScrapedElement::new("r", "Custom"),
            ScrapedElement::new("a", "Custom").with_parent("r").with_name("Custom"),
            ScrapedElement::new("b", "Custom")
                .with_parent("r")
                .with_name("DirectUIHWND")
                .with_class_name("DirectUIHWND"),
            ScrapedElement::new("c", "Custom").with_parent("r").with_name("Breadcrumb"),
        ]);
        assert_eq!(rendered, "c:Breadcrumb (Custom)");
    }

    #[test]
    fn test_important_type_without_name_uses_fallback_label() {
        let rendered = render(&[
            ScrapedElement::new("s", "StatusBar").with_class_name("msctls_statusbar32"),
            ScrapedElement::new("t", "Text").with_parent("s").with_name("12 items"),
        ]);
        assert_eq!(
            rendered,
            "s:msctls_statusbar32 (StatusBar)\n  t:12 items (Text)"
        );
    }

    #[test]
    fn test_item_label_merges_descendant_text() {
        let rendered = render(&[
            ScrapedElement::new("i", "ListItem").with_name("report.pdf"),
            ScrapedElement::new("n", "Text").with_parent("i").with_name("report"),
            ScrapedElement::new("d", "Text").with_parent("i").with_name("2024-05-01 10:32"),
            ScrapedElement::new("s", "Text").with_parent("i").with_name("  "),
            ScrapedElement::new("z", "Text").with_parent("i").with_name("1.2 MB"),
            ScrapedElement::new("dup", "Text").with_parent("i").with_name("1.2 MB"),
        ]);
        assert_eq!(rendered, "i:report.pdf 2024-05-01 10:32 1.2 MB (ListItem)");
    }

    #[test]
    fn test_item_skips_text_children_and_text_only_groups() {
        let rendered = render(&[
            ScrapedElement::new("i", "TreeItem").with_name("src"),
            ScrapedElement::new("g", "Group").with_parent("i"),
            ScrapedElement::new("g1", "Text").with_parent("g").with_name("3 files"),
            ScrapedElement::new("g2", "Text").with_parent("g").with_name("modified"),
            ScrapedElement::new("t", "Text").with_parent("i").with_name("folder"),
            ScrapedElement::new("c", "TreeItem").with_parent("i").with_name("main.rs"),
            ScrapedElement::new("x", "Button").with_parent("i").with_name("Expand"),
        ]);
        assert_eq!(
            rendered,
            "i:src 3 files modified folder main.rs Expand (TreeItem)\n  c:main.rs (TreeItem)\n  x:Expand (Button)"
        );
    }

    #[test]
    fn test_childless_group_under_item_is_rendered() {
        let rendered = render(&[
            ScrapedElement::new("i", "ListItem").with_name("a.txt"),
            ScrapedElement::new("g", "Group").with_parent("i").with_name("Tags"),
        ]);
        assert_eq!(rendered, "i:a.txt Tags (ListItem)\n  g:Tags (Group)");
    }

    #[test]
    fn test_deep_chain_renders_without_recursion() {
        let depth = 100_000;
        let mut elements = vec![ScrapedElement::new("0", "Custom")];
        for i in 1..=depth {
            elements.push(ScrapedElement::new(i.to_string(), "Custom").with_parent((i - 1).to_string()));
        }
        elements.push(
            ScrapedElement::new("b", "Button")
                .with_parent(depth.to_string())
                .with_name("OK"),
        );

        assert_eq!(render(&elements), "b:OK (Button)");
    }

    #[test]
    fn test_item_label_drops_contained_fragments() {
        let rendered = render(&[
            ScrapedElement::new("tab", "TabItem").with_name("lib.rs"),
            ScrapedElement::new("t1", "Text").with_parent("tab").with_name("lib.rs, preview"),
            ScrapedElement::new("t2", "Text").with_parent("tab").with_name("preview"),
        ]);
        assert_eq!(rendered, "tab:lib.rs, preview (TabItem)");
    }

    #[test]
    fn test_item_without_text_falls_back_to_type() {
        let rendered = render(&[ScrapedElement::new("i", "ListItem").with_name("\u{200b}")]);
        assert_eq!(rendered, "i:ListItem (ListItem)");
    }

    #[test]
    fn test_leaf_does_not_recurse() {
        let rendered = render(&[
            ScrapedElement::new("b", "Button").with_name("Back"),
            ScrapedElement::new("i", "Image").with_parent("b").with_name("Back arrow"),
        ]);
        assert_eq!(rendered, "b:Back (Button)");
    }

    #[test]
    fn test_custom_config_changes_heuristics() {
        let config = SummaryConfig {
            leaf_types: vec!["Image".into()],
            ..SummaryConfig::default()
        };
        let summary = SummaryRenderer::new(config).summarize(&component(&[
            ScrapedElement::new("b", "Button").with_name("Back"),
            ScrapedElement::new("i", "Image").with_parent("b").with_name("Arrow"),
        ]));
        // Button is no longer a leaf; its name makes it important.
        assert_eq!(summary.render(), "b:Back (Button)\n  i:Arrow (Image)");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let elements = [
            ScrapedElement::new("l", "List").with_name("Items View"),
            ScrapedElement::new("a", "ListItem").with_parent("l").with_name("a.txt"),
            ScrapedElement::new("b", "ListItem").with_parent("l").with_name("b.txt"),
        ];
        let first = SummaryRenderer::default().summarize(&component(&elements));
        let second = SummaryRenderer::default().summarize(&component(&elements));
        assert_eq!(first, second);
        assert_eq!(first.digest(), second.digest());
        assert_eq!(first.digest().len(), 64);
        assert_eq!(mentioned_ids(&first).len(), 3);
    }

    #[test]
    fn test_diff_counts_repeated_lines() {
        let summary = |texts: &[&str]| Summary {
            component: "Items View".into(),
            lines: texts
                .iter()
                .map(|t| SummaryLine {
                    depth: 0,
                    element_id: String::new(),
                    text: t.to_string(),
                })
                .collect(),
        };

        let before = summary(&["1:a.txt (ListItem)", "2:b.txt (ListItem)", "2:b.txt (ListItem)"]);
        let after = summary(&["2:b.txt (ListItem)", "3:c.txt (ListItem)"]);

        let diff = SummaryDiff::between(&before, &after);
        assert_eq!(diff.added, vec!["3:c.txt (ListItem)"]);
        assert_eq!(diff.removed, vec!["1:a.txt (ListItem)", "2:b.txt (ListItem)"]);
        assert!(SummaryDiff::between(&after, &after).is_empty());
    }

    #[test]
    fn test_config_from_toml_keeps_defaults() {
        let config: SummaryConfig = toml::from_str("leaf_types = [\"Button\"]").unwrap();
        assert_eq!(config.leaf_types, vec!["Button"]);
        assert_eq!(config.item_types, SummaryConfig::default().item_types);
    }
}
