//! Semantic Components - Partition accessibility-tree snapshots into named UI regions.
//!
//! This crate takes a flat snapshot of an application window's accessibility
//! tree and splits it into a small number of named, stable "semantic
//! components" (title bar, address bar, navigation pane, editor, ...) using
//! per-application, priority-ordered rules. Whatever no rule claims is
//! collected into an "Other Controls" component.
//!
//! # Quick Start
//!
//! ```
//! use semantic_components::{AppKind, ComponentAnalyzer, ScrapedElement};
//!
//! let elements = vec![
//!     ScrapedElement::new("0", "Window").with_name("Downloads"),
//!     ScrapedElement::new("1", "TitleBar").with_parent("0").with_name("Downloads"),
//!     ScrapedElement::new("2", "Tree").with_parent("0").with_name("Navigation Pane"),
//!     ScrapedElement::new("3", "TreeItem").with_parent("2").with_name("Desktop"),
//! ];
//!
//! let analyzer = ComponentAnalyzer::new().unwrap();
//! let analysis = analyzer.analyze(&elements, AppKind::from_process_name("explorer.exe"));
//!
//! for summary in analysis.summaries() {
//!     println!("== {} ==\n{}", summary.component, summary.render());
//! }
//! assert!(analysis.get("Navigation Pane").is_some());
//! ```
//!
//! # Modules
//!
//! - [`types`]: Core data types (ScrapedElement, AppKind, ComponentType, errors)
//! - [`tree`]: Arena-backed element tree built from the flat snapshot
//! - [`matcher`], [`rules`]: Rule predicates as inspectable data
//! - [`providers`], [`registry`]: Per-application rule sets
//! - [`classifier`], [`components`], [`pruner`]: The classification pipeline
//! - [`summary`]: Indented text summaries of components
//! - [`reaction`]: What to re-scan after interacting with a component
//! - [`snapshot`], [`interaction`]: Scanning and acting through a platform backend
//! - [`analyzer`]: Facade running the whole pipeline
//! - [`config`]: TOML configuration

pub mod analyzer;
pub mod classifier;
pub mod components;
pub mod config;
pub mod interaction;
pub mod matcher;
pub mod providers;
pub mod pruner;
pub mod reaction;
pub mod registry;
pub mod roles;
pub mod rules;
pub mod snapshot;
pub mod summary;
pub mod tree;
pub mod types;

// Re-export the pipeline entry points
pub use analyzer::{Analysis, AnalysisReport, ComponentAnalyzer, ComponentReport};
pub use components::{SemanticComponent, OTHER_CONTROLS};
pub use config::Config;

// Re-export core types
pub use types::{
    AppKind, BoundingRect, ComponentType, ConfigError, NodeSignature, PlanError, RuleError,
    ScrapeError, ScrapedElement,
};
