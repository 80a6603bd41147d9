//! Rules for Visual Studio Code.
//!
//! VS Code renders through Chromium, so most regions are only recognizable
//! by their ARIA landmarks and accessible names. Several rules feed the same
//! "Navigation Landmark" component because the side bar is reported
//! differently depending on which view container is open.

use super::{RuleProvider, TITLE_BAR};
use crate::matcher::{Field, Matcher};
use crate::roles::{self, landmarks};
use crate::rules::Rule;
use crate::types::AppKind;

pub const MENU_BAR: &str = "Menu Bar";
pub const ACTIVITY_BAR: &str = "Activity Bar";
pub const NAVIGATION_LANDMARK: &str = "Navigation Landmark";
pub const EDITOR_TABS: &str = "Editor Tabs";
pub const EDITOR: &str = "Editor";
pub const PANEL: &str = "Panel";
pub const STATUS_BAR: &str = "Status Bar";

pub struct CodeEditorRules;

impl RuleProvider for CodeEditorRules {
    fn app_kind(&self) -> AppKind {
        AppKind::CodeEditor
    }

    fn rules(&self) -> Vec<Rule> {
        vec![
            Rule::fixed(TITLE_BAR, Matcher::control_type(roles::TITLE_BAR), 100),
            Rule::fixed(MENU_BAR, Matcher::control_type(roles::MENU_BAR), 95),
            Rule::fixed(
                ACTIVITY_BAR,
                Matcher::any([
                    Matcher::name_is("Active View Switcher"),
                    Matcher::class_is("activitybar"),
                ]),
                90,
            ),
            Rule::variable(
                NAVIGATION_LANDMARK,
                Matcher::landmark_is(landmarks::NAVIGATION),
                80,
            ),
            Rule::variable(
                NAVIGATION_LANDMARK,
                Matcher::all([
                    Matcher::control_type(roles::TREE),
                    Matcher::field_contains(Field::Name, "Files Explorer"),
                ]),
                80,
            ),
            Rule::variable(
                NAVIGATION_LANDMARK,
                Matcher::all([
                    Matcher::control_type(roles::GROUP),
                    Matcher::has_child(Matcher::control_type(roles::TREE)),
                    Matcher::field_contains(Field::ClassName, "sidebar"),
                ]),
                80,
            ),
            Rule::variable(
                EDITOR_TABS,
                Matcher::all([
                    Matcher::control_type(roles::TAB),
                    Matcher::has_child(Matcher::control_type(roles::TAB_ITEM)),
                ]),
                75,
            ),
            Rule::variable(EDITOR, Matcher::landmark_is(landmarks::MAIN), 70),
            Rule::variable(
                EDITOR,
                Matcher::all([
                    Matcher::control_type(roles::EDIT),
                    Matcher::field_contains(Field::Name, "Editor content"),
                ]),
                70,
            ),
            Rule::variable(
                PANEL,
                Matcher::any([
                    Matcher::landmark_is(landmarks::COMPLEMENTARY),
                    Matcher::all([
                        Matcher::control_type(roles::GROUP),
                        Matcher::name_is("Panel"),
                    ]),
                ]),
                60,
            ),
            Rule::variable(
                STATUS_BAR,
                Matcher::any([
                    Matcher::control_type(roles::STATUS_BAR),
                    Matcher::landmark_is(landmarks::CONTENT_INFO),
                ]),
                50,
            ),
        ]
    }
}
