//! Rule registry keyed by application kind.

use std::collections::HashMap;

use crate::providers::{builtin_providers, DefaultRules, RuleProvider};
use crate::rules::{Rule, RuleSet};
use crate::types::{AppKind, RuleError};

/// Maps each [`AppKind`] to its validated [`RuleSet`].
///
/// Lookups never fail: kinds without a dedicated rule set get the fallback
/// set, which always recognizes at least the title bar.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rule_sets: HashMap<AppKind, RuleSet>,
    fallback: RuleSet,
}

impl RuleRegistry {
    /// Registry with the built-in providers.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::registry::RuleRegistry;
    /// use semantic_components::AppKind;
    ///
    /// let registry = RuleRegistry::new().unwrap();
    /// assert_eq!(registry.rules_for(AppKind::Unknown).len(), 1);
    /// assert!(registry.rules_for(AppKind::FileExplorer).len() > 1);
    /// ```
    pub fn new() -> Result<Self, RuleError> {
        Self::from_providers(builtin_providers())
    }

    /// Registry built from an explicit provider list.
    ///
    /// A later provider for the same kind replaces an earlier one. When no
    /// provider covers [`AppKind::Unknown`], [`DefaultRules`] is used for it.
    pub fn from_providers(providers: Vec<Box<dyn RuleProvider>>) -> Result<Self, RuleError> {
        let mut rule_sets = HashMap::new();

        for provider in providers {
            let kind = provider.app_kind();
            let set = RuleSet::new(provider.rules())?;
            log::debug!("[REGISTRY] Registered {} rules for {}", set.len(), kind);
            rule_sets.insert(kind, set);
        }

        let fallback = match rule_sets.get(&AppKind::Unknown) {
            Some(set) => set.clone(),
            None => {
                let set = RuleSet::new(DefaultRules.rules())?;
                rule_sets.insert(AppKind::Unknown, set.clone());
                set
            }
        };

        Ok(RuleRegistry {
            rule_sets,
            fallback,
        })
    }

    /// Append rules to the set of one application kind.
    ///
    /// The merged set is validated again, so an extra rule that reuses a
    /// component name with a different stability tag is rejected.
    pub fn add_rules(&mut self, kind: AppKind, rules: Vec<Rule>) -> Result<(), RuleError> {
        if rules.is_empty() {
            return Ok(());
        }

        let count = rules.len();
        let merged = self.rules_for(kind).extended(rules)?;
        if kind == AppKind::Unknown {
            self.fallback = merged.clone();
        }
        self.rule_sets.insert(kind, merged);

        log::info!("[REGISTRY] Added {} custom rules for {}", count, kind);
        Ok(())
    }

    /// Priority-ordered rules for `kind`.
    pub fn rules_for(&self, kind: AppKind) -> &RuleSet {
        self.rule_sets.get(&kind).unwrap_or(&self.fallback)
    }

    /// Rules for the application owning a process, by executable name.
    pub fn rules_for_process(&self, process_name: Option<&str>) -> &RuleSet {
        self.rules_for(AppKind::from_process(process_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::providers::TITLE_BAR;
    use crate::types::ComponentType;

    struct OnlyExplorer;

    impl RuleProvider for OnlyExplorer {
        fn app_kind(&self) -> AppKind {
            AppKind::FileExplorer
        }

        fn rules(&self) -> Vec<Rule> {
            vec![Rule::variable("Everything", Matcher::control_type("Window"), 1)]
        }
    }

    struct Conflicting;

    impl RuleProvider for Conflicting {
        fn app_kind(&self) -> AppKind {
            AppKind::CodeEditor
        }

        fn rules(&self) -> Vec<Rule> {
            vec![
                Rule::fixed("Side Bar", Matcher::control_type("Group"), 10),
                Rule::variable("Side Bar", Matcher::control_type("Tree"), 10),
            ]
        }
    }

    #[test]
    fn test_builtin_registry_dispatch() {
        let registry = RuleRegistry::new().unwrap();

        assert!(registry
            .rules_for(AppKind::FileExplorer)
            .component_names()
            .contains(&"Navigation Pane"));
        assert!(registry
            .rules_for(AppKind::CodeEditor)
            .component_names()
            .contains(&"Navigation Landmark"));
        assert_eq!(
            registry.rules_for(AppKind::Unknown).component_names(),
            vec![TITLE_BAR]
        );
    }

    #[test]
    fn test_process_lookup() {
        let registry = RuleRegistry::new().unwrap();
        assert_eq!(
            registry.rules_for_process(Some("explorer.exe")),
            registry.rules_for(AppKind::FileExplorer)
        );
        assert_eq!(
            registry.rules_for_process(None),
            registry.rules_for(AppKind::Unknown)
        );
    }

    #[test]
    fn test_missing_kind_falls_back_to_default() {
        let registry = RuleRegistry::from_providers(vec![Box::new(OnlyExplorer)]).unwrap();

        let code = registry.rules_for(AppKind::CodeEditor);
        assert_eq!(code.len(), 1);
        assert_eq!(code.rules()[0].component, TITLE_BAR);
        assert_eq!(registry.rules_for(AppKind::FileExplorer).rules()[0].component, "Everything");
    }

    #[test]
    fn test_conflicting_provider_is_rejected() {
        let result = RuleRegistry::from_providers(vec![Box::new(Conflicting)]);
        assert!(matches!(
            result,
            Err(RuleError::NameTypeConflict { ref name, .. }) if name == "Side Bar"
        ));
    }

    #[test]
    fn test_add_rules_merges_and_validates() {
        let mut registry = RuleRegistry::new().unwrap();

        registry
            .add_rules(
                AppKind::Unknown,
                vec![Rule::variable("Document", Matcher::control_type("Document"), 50)],
            )
            .unwrap();
        let unknown = registry.rules_for(AppKind::Unknown);
        assert_eq!(unknown.component_names(), vec![TITLE_BAR, "Document"]);
        assert_eq!(unknown.component_type("Document"), Some(ComponentType::Variable));

        let conflict = registry.add_rules(
            AppKind::FileExplorer,
            vec![Rule::fixed("Items View", Matcher::control_type("List"), 1)],
        );
        assert!(conflict.is_err());
        // The failed merge leaves the existing set untouched.
        assert_eq!(
            registry.rules_for(AppKind::FileExplorer).component_type("Items View"),
            Some(ComponentType::Variable)
        );
    }
}
