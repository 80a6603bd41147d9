//! Rules for Windows File Explorer.
//!
//! Explorer exposes a classic Win32/XAML hybrid tree: the address band and
//! search box are identified by class name, the navigation tree and item list
//! by their accessible names.

use super::{RuleProvider, TITLE_BAR};
use crate::matcher::{Field, Matcher};
use crate::roles;
use crate::rules::Rule;
use crate::types::AppKind;

pub const ADDRESS_BAR: &str = "Address Bar";
pub const SEARCH_BOX: &str = "Search Box";
pub const TAB_STRIP: &str = "Tab Strip";
pub const COMMAND_BAR: &str = "Command Bar";
pub const NAVIGATION_PANE: &str = "Navigation Pane";
pub const ITEMS_VIEW: &str = "Items View";
pub const DETAILS_PANE: &str = "Details Pane";
pub const STATUS_BAR: &str = "Status Bar";

pub struct FileExplorerRules;

impl RuleProvider for FileExplorerRules {
    fn app_kind(&self) -> AppKind {
        AppKind::FileExplorer
    }

    fn rules(&self) -> Vec<Rule> {
        vec![
            Rule::fixed(TITLE_BAR, Matcher::control_type(roles::TITLE_BAR), 100),
            Rule::fixed(
                ADDRESS_BAR,
                Matcher::any([
                    Matcher::class_is("Address Band Root"),
                    Matcher::all([
                        Matcher::control_type(roles::TOOL_BAR),
                        Matcher::field_contains(Field::Name, "Address"),
                    ]),
                ]),
                90,
            ),
            Rule::fixed(
                SEARCH_BOX,
                Matcher::any([
                    Matcher::class_is("UniversalSearchBand"),
                    Matcher::all([
                        Matcher::control_type(roles::EDIT),
                        Matcher::field_contains(Field::Name, "Search"),
                    ]),
                ]),
                85,
            ),
            Rule::fixed(
                TAB_STRIP,
                Matcher::all([
                    Matcher::control_type(roles::TAB),
                    Matcher::has_descendant(Matcher::control_type(roles::TAB_ITEM)),
                ]),
                80,
            ),
            Rule::fixed(
                COMMAND_BAR,
                Matcher::any([
                    Matcher::class_is("UIRibbonCommandBarDock"),
                    Matcher::all([
                        Matcher::control_type(roles::TOOL_BAR),
                        Matcher::name_is("Command Bar"),
                    ]),
                ]),
                75,
            ),
            Rule::variable(
                NAVIGATION_PANE,
                Matcher::all([
                    Matcher::control_type(roles::TREE),
                    Matcher::name_is("Navigation Pane"),
                ]),
                70,
            ),
            Rule::variable(
                ITEMS_VIEW,
                Matcher::any([
                    Matcher::class_is("UIItemsView"),
                    Matcher::all([
                        Matcher::control_type(roles::LIST),
                        Matcher::name_is("Items View"),
                    ]),
                ]),
                60,
            ),
            Rule::variable(
                DETAILS_PANE,
                Matcher::any([
                    Matcher::name_is("Details Pane"),
                    Matcher::name_is("Preview Pane"),
                ]),
                50,
            ),
            Rule::variable(STATUS_BAR, Matcher::control_type(roles::STATUS_BAR), 40),
        ]
    }
}
