//! Classification rules and validated rule sets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matcher::Matcher;
use crate::tree::{ElementTree, NodeId};
use crate::types::{ComponentType, RuleError};

/// One classification rule: nodes matching `matcher` start a component
/// called `component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Component name; several rules may feed the same component
    pub component: String,

    /// Predicate evaluated against a candidate node
    pub matcher: Matcher,

    /// Higher priorities are tried first at a given node
    pub priority: i32,

    /// Stability tag of the component
    pub component_type: ComponentType,
}

impl Rule {
    pub fn new(
        component: impl Into<String>,
        matcher: Matcher,
        priority: i32,
        component_type: ComponentType,
    ) -> Self {
        Rule {
            component: component.into(),
            matcher,
            priority,
            component_type,
        }
    }

    /// Shorthand for a rule on a [`ComponentType::Static`] component.
    pub fn fixed(component: impl Into<String>, matcher: Matcher, priority: i32) -> Self {
        Self::new(component, matcher, priority, ComponentType::Static)
    }

    /// Shorthand for a rule on a [`ComponentType::Variable`] component.
    pub fn variable(component: impl Into<String>, matcher: Matcher, priority: i32) -> Self {
        Self::new(component, matcher, priority, ComponentType::Variable)
    }
}

/// Priority-ordered, validated list of rules.
///
/// Rules are sorted by descending priority; rules with equal priority keep
/// their declaration order. Construction fails when two rules give the same
/// component name different stability tags, so every component name in a
/// `RuleSet` has exactly one [`ComponentType`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<Rule>,
    component_types: HashMap<String, ComponentType>,
}

impl RuleSet {
    /// Validate and sort `rules`.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::matcher::Matcher;
    /// use semantic_components::rules::{Rule, RuleSet};
    ///
    /// let rules = RuleSet::new(vec![
    ///     Rule::variable("Status Bar", Matcher::control_type("StatusBar"), 10),
    ///     Rule::fixed("Title Bar", Matcher::control_type("TitleBar"), 100),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(rules.rules()[0].component, "Title Bar");
    /// ```
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        let mut component_types: HashMap<String, ComponentType> = HashMap::new();

        for rule in &rules {
            match component_types.get(&rule.component) {
                Some(&existing) if existing != rule.component_type => {
                    return Err(RuleError::NameTypeConflict {
                        name: rule.component.clone(),
                        first: existing,
                        second: rule.component_type,
                    });
                }
                Some(_) => {}
                None => {
                    component_types.insert(rule.component.clone(), rule.component_type);
                }
            }
        }

        let mut rules = rules;
        // Vec::sort_by is stable, so equal priorities keep declaration order.
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));

        Ok(RuleSet {
            rules,
            component_types,
        })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Index of the first rule, in priority order, that matches `node`.
    pub fn first_match(&self, tree: &ElementTree, node: NodeId) -> Option<usize> {
        self.rules
            .iter()
            .position(|rule| rule.matcher.matches(tree, node))
    }

    /// Stability tag declared for a component name.
    pub fn component_type(&self, component: &str) -> Option<ComponentType> {
        self.component_types.get(component).copied()
    }

    /// Distinct component names, in priority order of their first rule.
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for rule in &self.rules {
            if !names.contains(&rule.component.as_str()) {
                names.push(&rule.component);
            }
        }
        names
    }

    /// Return a new set with `extra` rules appended, re-validated and re-sorted.
    pub fn extended(&self, extra: impl IntoIterator<Item = Rule>) -> Result<Self, RuleError> {
        let mut rules = self.rules.clone();
        rules.extend(extra);
        RuleSet::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScrapedElement;

    #[test]
    fn test_sorted_by_descending_priority() {
        let set = RuleSet::new(vec![
            Rule::variable("Low", Matcher::control_type("List"), 1),
            Rule::fixed("High", Matcher::control_type("TitleBar"), 100),
            Rule::variable("Mid", Matcher::control_type("Tree"), 50),
        ])
        .unwrap();

        let order: Vec<&str> = set.rules().iter().map(|r| r.component.as_str()).collect();
        assert_eq!(order, vec!["High", "Mid", "Low"]);
    }

    #[test]
    fn test_equal_priorities_keep_declaration_order() {
        let set = RuleSet::new(vec![
            Rule::variable("First", Matcher::control_type("Pane"), 10),
            Rule::variable("Second", Matcher::control_type("Pane"), 10),
            Rule::variable("Third", Matcher::control_type("Pane"), 10),
        ])
        .unwrap();

        let order: Vec<&str> = set.rules().iter().map(|r| r.component.as_str()).collect();
        assert_eq!(order, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_name_type_conflict_is_rejected() {
        let result = RuleSet::new(vec![
            Rule::fixed("Panel", Matcher::control_type("Pane"), 10),
            Rule::variable("Panel", Matcher::control_type("Group"), 20),
        ]);

        assert_eq!(
            result,
            Err(RuleError::NameTypeConflict {
                name: "Panel".into(),
                first: ComponentType::Static,
                second: ComponentType::Variable,
            })
        );
    }

    #[test]
    fn test_shared_name_with_same_type_is_allowed() {
        let set = RuleSet::new(vec![
            Rule::variable("Navigation Landmark", Matcher::landmark_is("Navigation"), 80),
            Rule::variable("Navigation Landmark", Matcher::control_type("Tree"), 80),
        ])
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.component_names(), vec!["Navigation Landmark"]);
        assert_eq!(
            set.component_type("Navigation Landmark"),
            Some(ComponentType::Variable)
        );
    }

    #[test]
    fn test_first_match_respects_priority() {
        let tree = ElementTree::build(&[ScrapedElement::new("0", "Tree").with_name("Navigation Pane")]);
        let set = RuleSet::new(vec![
            Rule::variable("Any Tree", Matcher::control_type("Tree"), 10),
            Rule::fixed("Navigation Pane", Matcher::name_is("Navigation Pane"), 100),
        ])
        .unwrap();

        let index = set.first_match(&tree, tree.root().unwrap()).unwrap();
        assert_eq!(set.get(index).unwrap().component, "Navigation Pane");
    }

    #[test]
    fn test_extended_revalidates() {
        let base = RuleSet::new(vec![Rule::fixed(
            "Title Bar",
            Matcher::control_type("TitleBar"),
            100,
        )])
        .unwrap();

        let extended = base
            .extended(vec![Rule::variable("Items", Matcher::control_type("List"), 200)])
            .unwrap();
        assert_eq!(extended.rules()[0].component, "Items");

        let conflict = base.extended(vec![Rule::variable(
            "Title Bar",
            Matcher::control_type("Pane"),
            1,
        )]);
        assert!(conflict.is_err());
    }
}
