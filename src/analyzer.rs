//! High-level facade running the whole classification pipeline.
//!
//! ```text
//! elements → ElementTree → classify → build_components → prune_residual → summarize
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::classifier::classify;
use crate::components::{build_components, SemanticComponent};
use crate::config::Config;
use crate::pruner::prune_residual;
use crate::reaction::{ReactionMap, ReactionRule};
use crate::registry::RuleRegistry;
use crate::snapshot::Snapshot;
use crate::summary::{Summary, SummaryRenderer};
use crate::tree::ElementTree;
use crate::types::{AppKind, ComponentType, ConfigError, RuleError, ScrapedElement};

/// Classifies snapshots into semantic components.
pub struct ComponentAnalyzer {
    registry: RuleRegistry,
    renderer: SummaryRenderer,
    reaction_overrides: HashMap<AppKind, HashMap<String, ReactionRule>>,
}

impl ComponentAnalyzer {
    /// Analyzer with the built-in rules and default rendering.
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            registry: RuleRegistry::new()?,
            renderer: SummaryRenderer::default(),
            reaction_overrides: HashMap::new(),
        })
    }

    /// Analyzer with configured extra rules, renderer lists and reaction
    /// overrides applied on top of the built-ins.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut registry = RuleRegistry::new()?;
        for (kind, rules) in config.custom_rules()? {
            registry.add_rules(kind, rules)?;
        }

        let mut reaction_overrides = HashMap::new();
        for kind in [AppKind::FileExplorer, AppKind::CodeEditor, AppKind::Unknown] {
            let overrides = config.reactions_for(kind);
            if !overrides.is_empty() {
                reaction_overrides.insert(kind, overrides);
            }
        }

        Ok(Self {
            registry,
            renderer: SummaryRenderer::new(config.summary.clone()),
            reaction_overrides,
        })
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Reaction map for `kind`, with configured overrides applied.
    pub fn reactions(&self, kind: AppKind) -> ReactionMap {
        let map = ReactionMap::for_app(kind);
        match self.reaction_overrides.get(&kind) {
            Some(overrides) => map.with_overrides(overrides),
            None => map,
        }
    }

    /// Classify a flat element list using the rules for `app_kind`.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::analyzer::ComponentAnalyzer;
    /// use semantic_components::types::ScrapedElement;
    /// use semantic_components::AppKind;
    ///
    /// let elements = vec![
    ///     ScrapedElement::new("0", "Window").with_name("Notes"),
    ///     ScrapedElement::new("1", "TitleBar").with_parent("0").with_name("Notes"),
    ///     ScrapedElement::new("2", "Button").with_parent("0").with_name("Save"),
    /// ];
    ///
    /// let analysis = ComponentAnalyzer::new().unwrap().analyze(&elements, AppKind::Unknown);
    /// let names: Vec<&str> = analysis.components().iter().map(|c| c.name.as_str()).collect();
    /// assert_eq!(names, vec!["Title Bar", "Other Controls"]);
    /// ```
    pub fn analyze(&self, elements: &[ScrapedElement], app_kind: AppKind) -> Analysis {
        let tree = Arc::new(ElementTree::build(elements));
        let rules = self.registry.rules_for(app_kind);
        let classification = classify(&tree, rules);

        let mut components = build_components(&tree, &classification, rules);
        if let Some(other) = prune_residual(&tree, &components) {
            components.push(other);
        }

        let summaries = components
            .iter()
            .map(|component| self.renderer.summarize(component))
            .collect();

        log::info!(
            "[ANALYZER] {} elements of {} app classified into {} components",
            tree.len(),
            app_kind,
            components.len()
        );

        Analysis {
            app_kind,
            tree,
            components,
            summaries,
            reactions: self.reactions(app_kind),
        }
    }

    /// Classify a scanned snapshot using the rules for its owning process.
    pub fn analyze_snapshot<H>(&self, snapshot: &Snapshot<H>) -> Analysis {
        self.analyze(snapshot.elements(), snapshot.app_kind())
    }
}

/// Result of analyzing one snapshot.
#[derive(Debug, Clone)]
pub struct Analysis {
    app_kind: AppKind,
    tree: Arc<ElementTree>,
    components: Vec<SemanticComponent>,
    summaries: Vec<Summary>,
    reactions: ReactionMap,
}

impl Analysis {
    pub fn app_kind(&self) -> AppKind {
        self.app_kind
    }

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Components in classification order, "Other Controls" last.
    pub fn components(&self) -> &[SemanticComponent] {
        &self.components
    }

    pub fn get(&self, name: &str) -> Option<&SemanticComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn summaries(&self) -> &[Summary] {
        &self.summaries
    }

    pub fn summary(&self, name: &str) -> Option<&Summary> {
        self.summaries.iter().find(|s| s.component == name)
    }

    /// Component owning the element with snapshot id `element_id`.
    pub fn component_of(&self, element_id: &str) -> Option<&SemanticComponent> {
        self.components
            .iter()
            .find(|component| component.contains_element(element_id))
    }

    pub fn reactions(&self) -> &ReactionMap {
        &self.reactions
    }

    /// Serializable overview.
    pub fn report(&self) -> AnalysisReport {
        let components = self
            .components
            .iter()
            .zip(&self.summaries)
            .map(|(component, summary)| ComponentReport {
                name: component.name.clone(),
                component_type: component.component_type,
                root_ids: component.root_elements().map(|e| e.id.clone()).collect(),
                node_count: component.node_count(),
                digest: summary.digest(),
                summary: summary.render(),
            })
            .collect();

        AnalysisReport {
            app_kind: self.app_kind,
            element_count: self.tree.len(),
            components,
        }
    }
}

/// JSON form of an [`Analysis`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub app_kind: AppKind,
    pub element_count: usize,
    pub components: Vec<ComponentReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentReport {
    pub name: String,
    pub component_type: ComponentType,
    pub root_ids: Vec<String>,
    pub node_count: usize,
    pub digest: String,
    pub summary: String,
}
