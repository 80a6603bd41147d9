//! Control-type tags and role lists.
//!
//! Snapshots carry control types as plain strings so that unknown tags from a
//! newer accessibility API pass through untouched. This module names the tags
//! the rule sets and the summary renderer care about.

pub const WINDOW: &str = "Window";
pub const TITLE_BAR: &str = "TitleBar";
pub const MENU_BAR: &str = "MenuBar";
pub const MENU_ITEM: &str = "MenuItem";
pub const TOOL_BAR: &str = "ToolBar";
pub const STATUS_BAR: &str = "StatusBar";
pub const PANE: &str = "Pane";
pub const GROUP: &str = "Group";
pub const TEXT: &str = "Text";
pub const EDIT: &str = "Edit";
pub const DOCUMENT: &str = "Document";
pub const BUTTON: &str = "Button";
pub const SPLIT_BUTTON: &str = "SplitButton";
pub const CHECK_BOX: &str = "CheckBox";
pub const RADIO_BUTTON: &str = "RadioButton";
pub const HYPERLINK: &str = "Hyperlink";
pub const COMBO_BOX: &str = "ComboBox";
pub const TREE: &str = "Tree";
pub const TREE_ITEM: &str = "TreeItem";
pub const LIST: &str = "List";
pub const LIST_ITEM: &str = "ListItem";
pub const TAB: &str = "Tab";
pub const TAB_ITEM: &str = "TabItem";
pub const DATA_GRID: &str = "DataGrid";
pub const TABLE: &str = "Table";
pub const HEADER: &str = "Header";
pub const SLIDER: &str = "Slider";
pub const PROGRESS_BAR: &str = "ProgressBar";

/// Landmark tags reported by Chromium-based applications.
pub mod landmarks {
    pub const NAVIGATION: &str = "Navigation";
    pub const MAIN: &str = "Main";
    pub const COMPLEMENTARY: &str = "Complementary";
    pub const CONTENT_INFO: &str = "ContentInfo";
    pub const SEARCH: &str = "Search";
}

/// Container types that are transparent when they wrap exactly one child.
pub const WRAPPER_TYPES: &[&str] = &[GROUP, PANE];

/// Collection items whose label is assembled from their descendants' text.
pub const ITEM_TYPES: &[&str] = &[TREE_ITEM, LIST_ITEM, TAB_ITEM, SPLIT_BUTTON];

/// Actionable controls summarized by their own name only.
pub const LEAF_TYPES: &[&str] = &[BUTTON, CHECK_BOX, RADIO_BUTTON, MENU_ITEM, HYPERLINK];

/// Types always worth a summary line, whatever their name.
pub const IMPORTANT_TYPES: &[&str] = &[
    WINDOW,
    TITLE_BAR,
    MENU_BAR,
    TOOL_BAR,
    STATUS_BAR,
    EDIT,
    DOCUMENT,
    COMBO_BOX,
    TREE,
    LIST,
    TAB,
    DATA_GRID,
    TABLE,
    HEADER,
    SLIDER,
    PROGRESS_BAR,
];

/// Types that carry nothing but text.
pub const TEXT_TYPES: &[&str] = &[TEXT];
