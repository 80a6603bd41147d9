//! Semantic components and the component builder.

use std::sync::Arc;

use crate::classifier::Classification;
use crate::rules::RuleSet;
use crate::tree::{ElementTree, NodeId};
use crate::types::{ComponentType, NodeSignature, ScrapedElement};

/// Name of the synthetic component holding everything no rule claimed.
pub const OTHER_CONTROLS: &str = "Other Controls";

/// A named region of the window.
///
/// `roots` are handles into `tree`. Components produced by classification
/// share the snapshot's tree; the "Other Controls" component carries its own
/// pruned copy.
#[derive(Debug, Clone)]
pub struct SemanticComponent {
    pub name: String,
    pub component_type: ComponentType,
    tree: Arc<ElementTree>,
    roots: Vec<NodeId>,
}

impl SemanticComponent {
    pub fn new(
        name: impl Into<String>,
        component_type: ComponentType,
        tree: Arc<ElementTree>,
        roots: Vec<NodeId>,
    ) -> Self {
        SemanticComponent {
            name: name.into(),
            component_type,
            tree,
            roots,
        }
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_elements(&self) -> impl Iterator<Item = &ScrapedElement> + '_ {
        self.roots.iter().map(|&root| self.tree.element(root))
    }

    /// Every node owned by the component, root by root, in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.iter().flat_map(|&root| self.tree.subtree(root))
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Structural signatures of every owned node.
    pub fn signatures(&self) -> impl Iterator<Item = NodeSignature> + '_ {
        self.nodes().map(|node| self.tree.element(node).signature())
    }

    /// Whether the element with snapshot id `element_id` belongs to this component.
    pub fn contains_element(&self, element_id: &str) -> bool {
        self.nodes()
            .any(|node| self.tree.element(node).id == element_id)
    }

    pub fn is_static(&self) -> bool {
        self.component_type == ComponentType::Static
    }
}

/// Group classified nodes into components by component name.
///
/// Several rules may feed one component; they are merged by name, not by
/// rule identity. The stability tag comes from the first rule that
/// contributed to the name. Components are ordered by their first root in
/// classification order, and each component's roots keep that order too.
pub fn build_components(
    tree: &Arc<ElementTree>,
    classification: &Classification,
    rules: &RuleSet,
) -> Vec<SemanticComponent> {
    let mut components: Vec<SemanticComponent> = Vec::new();

    for assignment in &classification.assignments {
        let Some(rule) = rules.get(assignment.rule) else {
            log::warn!(
                "[COMPONENTS] Assignment refers to missing rule #{}",
                assignment.rule
            );
            continue;
        };

        match components.iter_mut().find(|c| c.name == rule.component) {
            Some(component) => component.roots.push(assignment.node),
            None => components.push(SemanticComponent::new(
                rule.component.clone(),
                rule.component_type,
                Arc::clone(tree),
                vec![assignment.node],
            )),
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::matcher::Matcher;
    use crate::rules::Rule;
    use pretty_assertions::assert_eq;

    fn landmark_tree() -> Arc<ElementTree> {
        Arc::new(ElementTree::build(&[
            ScrapedElement::new("w", "Window"),
            ScrapedElement::new("side", "Group")
                .with_parent("w")
                .with_landmark("Navigation"),
            ScrapedElement::new("outline", "Tree")
                .with_parent("side")
                .with_name("Outline"),
            ScrapedElement::new("files", "Tree")
                .with_parent("w")
                .with_name("Files Explorer"),
            ScrapedElement::new("status", "StatusBar").with_parent("w"),
        ]))
    }

    fn landmark_rules() -> RuleSet {
        RuleSet::new(vec![
            Rule::variable("Navigation Landmark", Matcher::landmark_is("Navigation"), 80),
            Rule::variable("Navigation Landmark", Matcher::name_is("Files Explorer"), 80),
            Rule::variable("Status Bar", Matcher::control_type("StatusBar"), 10),
        ])
        .unwrap()
    }

    #[test]
    fn test_rules_sharing_a_name_build_one_component() {
        let tree = landmark_tree();
        let rules = landmark_rules();
        let components = build_components(&tree, &classify(&tree, &rules), &rules);

        let names: Vec<&str> = components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Navigation Landmark", "Status Bar"]);

        let navigation = &components[0];
        let root_ids: Vec<&str> = navigation.root_elements().map(|e| e.id.as_str()).collect();
        assert_eq!(root_ids, vec!["side", "files"]);
        assert_eq!(navigation.node_count(), 3);
        assert!(navigation.contains_element("outline"));
        assert!(!navigation.contains_element("status"));
        assert!(!navigation.is_static());
    }

    #[test]
    fn test_components_share_the_snapshot_tree() {
        let tree = landmark_tree();
        let rules = landmark_rules();
        let components = build_components(&tree, &classify(&tree, &rules), &rules);

        for component in &components {
            assert!(std::ptr::eq(component.tree(), tree.as_ref()));
        }
    }

    #[test]
    fn test_no_matches_builds_no_components() {
        let tree = landmark_tree();
        let rules = RuleSet::new(vec![Rule::fixed(
            "Title Bar",
            Matcher::control_type("TitleBar"),
            100,
        )])
        .unwrap();

        assert!(build_components(&tree, &classify(&tree, &rules), &rules).is_empty());
    }
}
