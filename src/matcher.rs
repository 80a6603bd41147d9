//! Declarative predicates over tree nodes.
//!
//! Rules are data, not closures: a [`Matcher`] is a small expression tree
//! that can be printed, compared, deserialized from configuration and unit
//! tested against a hand-built [`ElementTree`]. A matcher may look at the
//! node's descendants (`HasDescendant`, `HasChild`), never at its ancestors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::{ElementTree, NodeId};
use crate::types::ScrapedElement;

/// Element property a matcher can compare against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    ControlType,
    ClassName,
    LandmarkType,
}

impl Field {
    /// Read the field from an element. Absent optional fields read as `None`.
    pub fn read<'a>(&self, element: &'a ScrapedElement) -> Option<&'a str> {
        match self {
            Field::Name => element.name.as_deref(),
            Field::ControlType => Some(element.control_type.as_str()),
            Field::ClassName => element.class_name.as_deref(),
            Field::LandmarkType => element.landmark_type.as_deref(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::ControlType => "control_type",
            Field::ClassName => "class_name",
            Field::LandmarkType => "landmark_type",
        }
    }
}

/// Predicate over a node and its subtree.
///
/// In TOML the variant is selected by `kind`:
///
/// ```toml
/// [matcher]
/// kind = "and"
///
/// [[matcher.all]]
/// kind = "control_type_is"
/// control_type = "Tree"
///
/// [[matcher.all]]
/// kind = "field_equals"
/// field = "name"
/// value = "Navigation Pane"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    /// Field equals `value` exactly
    FieldEquals { field: Field, value: String },

    /// Field contains `value`, ignoring ASCII case
    FieldContains { field: Field, value: String },

    /// Control type equals the given tag
    ControlTypeIs { control_type: String },

    /// Some direct child matches
    HasChild { matcher: Box<Matcher> },

    /// Some node strictly below this one matches
    HasDescendant { matcher: Box<Matcher> },

    /// Every sub-matcher matches (true when empty)
    And { all: Vec<Matcher> },

    /// At least one sub-matcher matches (false when empty)
    Or { any: Vec<Matcher> },

    /// The sub-matcher does not match
    Not { matcher: Box<Matcher> },
}

impl Matcher {
    pub fn control_type(control_type: impl Into<String>) -> Self {
        Matcher::ControlTypeIs {
            control_type: control_type.into(),
        }
    }

    pub fn field_equals(field: Field, value: impl Into<String>) -> Self {
        Matcher::FieldEquals {
            field,
            value: value.into(),
        }
    }

    pub fn field_contains(field: Field, value: impl Into<String>) -> Self {
        Matcher::FieldContains {
            field,
            value: value.into(),
        }
    }

    pub fn name_is(name: impl Into<String>) -> Self {
        Self::field_equals(Field::Name, name)
    }

    pub fn class_is(class_name: impl Into<String>) -> Self {
        Self::field_equals(Field::ClassName, class_name)
    }

    pub fn landmark_is(landmark: impl Into<String>) -> Self {
        Self::field_equals(Field::LandmarkType, landmark)
    }

    pub fn has_child(matcher: Matcher) -> Self {
        Matcher::HasChild {
            matcher: Box::new(matcher),
        }
    }

    pub fn has_descendant(matcher: Matcher) -> Self {
        Matcher::HasDescendant {
            matcher: Box::new(matcher),
        }
    }

    pub fn all(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::And {
            all: matchers.into_iter().collect(),
        }
    }

    pub fn any(matchers: impl IntoIterator<Item = Matcher>) -> Self {
        Matcher::Or {
            any: matchers.into_iter().collect(),
        }
    }

    pub fn negate(matcher: Matcher) -> Self {
        Matcher::Not {
            matcher: Box::new(matcher),
        }
    }

    /// Evaluate the predicate against `node` in `tree`.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::matcher::Matcher;
    /// use semantic_components::tree::ElementTree;
    /// use semantic_components::types::ScrapedElement;
    ///
    /// let tree = ElementTree::build(&[
    ///     ScrapedElement::new("0", "Pane"),
    ///     ScrapedElement::new("1", "List").with_parent("0").with_name("Items View"),
    /// ]);
    ///
    /// let has_items = Matcher::has_descendant(Matcher::name_is("Items View"));
    /// assert!(has_items.matches(&tree, tree.root().unwrap()));
    /// ```
    pub fn matches(&self, tree: &ElementTree, node: NodeId) -> bool {
        match self {
            Matcher::FieldEquals { field, value } => {
                field.read(tree.element(node)) == Some(value.as_str())
            }
            Matcher::FieldContains { field, value } => field
                .read(tree.element(node))
                .map(|actual| contains_ignore_ascii_case(actual, value))
                .unwrap_or(false),
            Matcher::ControlTypeIs { control_type } => {
                tree.element(node).control_type == *control_type
            }
            Matcher::HasChild { matcher } => tree
                .children(node)
                .iter()
                .any(|&child| matcher.matches(tree, child)),
            Matcher::HasDescendant { matcher } => tree
                .descendants(node)
                .any(|descendant| matcher.matches(tree, descendant)),
            Matcher::And { all } => all.iter().all(|m| m.matches(tree, node)),
            Matcher::Or { any } => any.iter().any(|m| m.matches(tree, node)),
            Matcher::Not { matcher } => !matcher.matches(tree, node),
        }
    }
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Matcher], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", item)?;
            }
            write!(f, ")")
        }

        match self {
            Matcher::FieldEquals { field, value } => write!(f, "{} == {:?}", field.as_str(), value),
            Matcher::FieldContains { field, value } => {
                write!(f, "{} ~= {:?}", field.as_str(), value)
            }
            Matcher::ControlTypeIs { control_type } => write!(f, "type {}", control_type),
            Matcher::HasChild { matcher } => write!(f, "child[{}]", matcher),
            Matcher::HasDescendant { matcher } => write!(f, "descendant[{}]", matcher),
            Matcher::And { all } => join(f, all, "and"),
            Matcher::Or { any } => join(f, any, "or"),
            Matcher::Not { matcher } => write!(f, "not {}", matcher),
        }
    }
}
