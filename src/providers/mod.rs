//! Per-application rule providers.
//!
//! Each provider knows the accessibility layout of one application family and
//! returns its rules in declaration order. The [`crate::registry`] turns that
//! list into a validated [`crate::rules::RuleSet`].

pub mod code_editor;
pub mod default;
pub mod file_explorer;

use crate::rules::Rule;
use crate::types::AppKind;

pub use code_editor::CodeEditorRules;
pub use default::DefaultRules;
pub use file_explorer::FileExplorerRules;

/// Source of classification rules for one application kind.
pub trait RuleProvider: Send + Sync {
    /// The application kind these rules describe.
    fn app_kind(&self) -> AppKind;

    /// Rules in declaration order. Order matters for equal priorities.
    fn rules(&self) -> Vec<Rule>;
}

/// All built-in providers.
pub fn builtin_providers() -> Vec<Box<dyn RuleProvider>> {
    vec![
        Box::new(FileExplorerRules),
        Box::new(CodeEditorRules),
        Box::new(DefaultRules),
    ]
}

/// Component name shared by every provider's title-bar rule.
pub const TITLE_BAR: &str = "Title Bar";
