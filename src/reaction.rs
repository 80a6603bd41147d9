//! Reaction map: what to re-scan after interacting with a component.
//!
//! Entries are declarative and carry no runtime state. A collaborator that
//! just clicked inside component `X` looks up `X` and learns which
//! components are now out of date and how to treat them.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::components::OTHER_CONTROLS;
use crate::providers::{code_editor, file_explorer, TITLE_BAR};
use crate::types::AppKind;

/// How targets of a reaction are invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    /// Targets must be re-scanned and re-summarized from scratch
    Refresh,
    /// Interaction opened a transient surface (menu, flyout) that will close
    Temporary,
    /// Targets changed incrementally; report a line diff
    Diff,
}

/// Directive attached to one component name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRule {
    pub kind: ReactionKind,
    #[serde(default)]
    pub targets: Vec<String>,
}

impl ReactionRule {
    pub fn new(kind: ReactionKind, targets: &[&str]) -> Self {
        Self {
            kind,
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Component name → reaction directive, for one application kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionMap {
    entries: HashMap<String, ReactionRule>,
}

impl ReactionMap {
    /// Built-in reactions for `kind`. Unknown applications have none.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::reaction::{ReactionKind, ReactionMap};
    /// use semantic_components::AppKind;
    ///
    /// let map = ReactionMap::for_app(AppKind::FileExplorer);
    /// let rule = map.lookup("Navigation Pane").unwrap();
    /// assert_eq!(rule.kind, ReactionKind::Refresh);
    /// assert!(rule.targets.iter().any(|t| t == "Items View"));
    /// assert!(ReactionMap::for_app(AppKind::Unknown).is_empty());
    /// ```
    pub fn for_app(kind: AppKind) -> Self {
        let entries: Vec<(&str, ReactionRule)> = match kind {
            AppKind::FileExplorer => vec![
                (
                    file_explorer::NAVIGATION_PANE,
                    ReactionRule::new(
                        ReactionKind::Refresh,
                        &[file_explorer::ITEMS_VIEW, file_explorer::ADDRESS_BAR, TITLE_BAR],
                    ),
                ),
                (
                    file_explorer::ADDRESS_BAR,
                    ReactionRule::new(
                        ReactionKind::Refresh,
                        &[file_explorer::ITEMS_VIEW, file_explorer::NAVIGATION_PANE, TITLE_BAR],
                    ),
                ),
                (
                    file_explorer::ITEMS_VIEW,
                    ReactionRule::new(
                        ReactionKind::Diff,
                        &[
                            file_explorer::ITEMS_VIEW,
                            file_explorer::DETAILS_PANE,
                            file_explorer::STATUS_BAR,
                        ],
                    ),
                ),
                (
                    file_explorer::COMMAND_BAR,
                    ReactionRule::new(ReactionKind::Temporary, &[OTHER_CONTROLS]),
                ),
                (
                    file_explorer::TAB_STRIP,
                    ReactionRule::new(
                        ReactionKind::Refresh,
                        &[
                            file_explorer::ITEMS_VIEW,
                            file_explorer::ADDRESS_BAR,
                            file_explorer::NAVIGATION_PANE,
                            TITLE_BAR,
                        ],
                    ),
                ),
            ],
            AppKind::CodeEditor => vec![
                (
                    code_editor::NAVIGATION_LANDMARK,
                    ReactionRule::new(
                        ReactionKind::Refresh,
                        &[code_editor::EDITOR, code_editor::EDITOR_TABS, TITLE_BAR],
                    ),
                ),
                (
                    code_editor::ACTIVITY_BAR,
                    ReactionRule::new(ReactionKind::Refresh, &[code_editor::NAVIGATION_LANDMARK]),
                ),
                (
                    code_editor::MENU_BAR,
                    ReactionRule::new(ReactionKind::Temporary, &[OTHER_CONTROLS]),
                ),
                (
                    code_editor::EDITOR,
                    ReactionRule::new(
                        ReactionKind::Diff,
                        &[code_editor::EDITOR, code_editor::STATUS_BAR],
                    ),
                ),
                (
                    code_editor::EDITOR_TABS,
                    ReactionRule::new(
                        ReactionKind::Refresh,
                        &[code_editor::EDITOR, TITLE_BAR],
                    ),
                ),
            ],
            AppKind::Unknown => Vec::new(),
        };

        ReactionMap {
            entries: entries
                .into_iter()
                .map(|(name, rule)| (name.to_string(), rule))
                .collect(),
        }
    }

    /// Replace or add entries. Later overrides win over built-ins.
    pub fn with_overrides(mut self, overrides: &HashMap<String, ReactionRule>) -> Self {
        for (component, rule) in overrides {
            log::debug!(
                "[REACTION] Override for '{}': {:?} {:?}",
                component,
                rule.kind,
                rule.targets
            );
            self.entries.insert(component.clone(), rule.clone());
        }
        self
    }

    /// Directive for interactions inside `component`, if any.
    pub fn lookup(&self, component: &str) -> Option<&ReactionRule> {
        self.entries.get(component)
    }

    /// Components made stale by interacting with any of `touched`, sorted
    /// and without duplicates.
    pub fn stale_components<'a, I>(&self, touched: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let stale: BTreeSet<&str> = touched
            .into_iter()
            .filter_map(|component| self.lookup(component))
            .flat_map(|rule| rule.targets.iter().map(String::as_str))
            .collect();
        stale.into_iter().map(str::to_string).collect()
    }

    /// Component names that have an entry, sorted.
    pub fn components(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
