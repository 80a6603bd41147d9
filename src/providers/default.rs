//! Fallback rules for applications without a dedicated provider.

use super::{RuleProvider, TITLE_BAR};
use crate::matcher::Matcher;
use crate::roles;
use crate::rules::Rule;
use crate::types::AppKind;

/// Minimal rule set: only the title bar is recognized, everything else ends
/// up in "Other Controls".
pub struct DefaultRules;

impl RuleProvider for DefaultRules {
    fn app_kind(&self) -> AppKind {
        AppKind::Unknown
    }

    fn rules(&self) -> Vec<Rule> {
        vec![Rule::fixed(
            TITLE_BAR,
            Matcher::control_type(roles::TITLE_BAR),
            100,
        )]
    }
}
