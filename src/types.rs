//! Core data types for the semantic-components crate.
//!
//! This module defines the fundamental types used throughout the crate:
//! - `ScrapedElement`: One element of an accessibility-tree snapshot
//! - `BoundingRect`: Screen rectangle reported for an element
//! - `NodeSignature`: Structural identity used by the residual pruner
//! - `ComponentType`: Static/Variable stability tag for a component
//! - `AppKind`: Application family used to pick a rule set
//! - `ScrapeError`, `RuleError`, `PlanError`, `ConfigError`: Error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Screen rectangle of an element, in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// One element discovered while scanning a window.
///
/// Elements are produced once per snapshot, in pre-order discovery sequence,
/// and never mutated afterwards. `id` is opaque and only unique within the
/// snapshot that issued it.
///
/// The JSON form uses camelCase keys (`parentId`, `controlType`, ...), which is
/// the format snapshot files are exchanged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedElement {
    /// Opaque identifier, unique within one snapshot
    pub id: String,

    /// Identifier of the parent element, `None` for the window itself
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Accessible name
    #[serde(default)]
    pub name: Option<String>,

    /// Control type tag (e.g. "Button", "TreeItem", "TitleBar")
    pub control_type: String,

    /// Native class name
    #[serde(default)]
    pub class_name: Option<String>,

    /// Landmark tag (e.g. "Navigation", "Main")
    #[serde(default)]
    pub landmark_type: Option<String>,

    /// On-screen bounds
    #[serde(default)]
    pub bounding_rect: BoundingRect,
}

impl ScrapedElement {
    /// Creates an element with only the required fields set.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::types::ScrapedElement;
    ///
    /// let button = ScrapedElement::new("7", "Button")
    ///     .with_parent("3")
    ///     .with_name("Back");
    ///
    /// assert_eq!(button.display_name(), "Back");
    /// assert_eq!(button.parent_id.as_deref(), Some("3"));
    /// ```
    pub fn new(id: impl Into<String>, control_type: impl Into<String>) -> Self {
        ScrapedElement {
            id: id.into(),
            parent_id: None,
            name: None,
            control_type: control_type.into(),
            class_name: None,
            landmark_type: None,
            bounding_rect: BoundingRect::default(),
        }
    }

    /// Sets the parent id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the accessible name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the class name.
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Sets the landmark type.
    pub fn with_landmark(mut self, landmark_type: impl Into<String>) -> Self {
        self.landmark_type = Some(landmark_type.into());
        self
    }

    /// Sets the bounding rectangle.
    pub fn with_rect(mut self, rect: BoundingRect) -> Self {
        self.bounding_rect = rect;
        self
    }

    /// Accessible name with surrounding whitespace removed, `None` when blank.
    pub fn trimmed_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Human-readable label: the name, falling back to the class name and
    /// then to the control type. Never empty unless the control type is.
    pub fn display_name(&self) -> &str {
        self.trimmed_name()
            .or_else(|| {
                self.class_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|class| !class.is_empty())
            })
            .unwrap_or(&self.control_type)
    }

    /// Structural signature of this element.
    pub fn signature(&self) -> NodeSignature {
        NodeSignature {
            control_type: self.control_type.clone(),
            name: self.name.clone(),
            class_name: self.class_name.clone(),
        }
    }
}

/// Structural identity of an element: (control type, name, class name).
///
/// Two independently scanned trees produce equal signatures for the same
/// on-screen control, which element ids do not guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeSignature {
    pub control_type: String,
    pub name: Option<String>,
    pub class_name: Option<String>,
}

/// Stability tag of a semantic component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    /// Structurally constant across interactions (title bar, menu bar)
    Static,
    /// Content expected to change (file list, editor)
    Variable,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Static => "Static",
            ComponentType::Variable => "Variable",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application families with a dedicated rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    /// Windows File Explorer
    FileExplorer,
    /// Visual Studio Code and its forks
    CodeEditor,
    /// Anything else, including unresolvable processes
    Unknown,
}

impl AppKind {
    /// Returns the string identifier for this application kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use semantic_components::AppKind;
    ///
    /// assert_eq!(AppKind::FileExplorer.as_str(), "file_explorer");
    /// assert_eq!(AppKind::Unknown.as_str(), "unknown");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            AppKind::FileExplorer => "file_explorer",
            AppKind::CodeEditor => "code_editor",
            AppKind::Unknown => "unknown",
        }
    }

    /// Creates an AppKind from the executable name of the owning process.
    ///
    /// Matching is case-insensitive and ignores a trailing `.exe`.
    ///
    /// # Examples
    ///
    /// ```
    /// use semantic_components::AppKind;
    ///
    /// assert_eq!(AppKind::from_process_name("explorer.exe"), AppKind::FileExplorer);
    /// assert_eq!(AppKind::from_process_name("Code.exe"), AppKind::CodeEditor);
    /// assert_eq!(AppKind::from_process_name("notepad.exe"), AppKind::Unknown);
    /// ```
    pub fn from_process_name(process_name: &str) -> Self {
        let lower = process_name.trim().to_lowercase();
        let stem = lower.strip_suffix(".exe").unwrap_or(&lower);

        match stem {
            "explorer" => AppKind::FileExplorer,
            "code" | "code - insiders" | "code-insiders" | "codium" | "vscodium" => {
                AppKind::CodeEditor
            }
            _ => AppKind::Unknown,
        }
    }

    /// Same as [`AppKind::from_process_name`], with `None` mapping to `Unknown`.
    pub fn from_process(process_name: Option<&str>) -> Self {
        process_name
            .map(Self::from_process_name)
            .unwrap_or(AppKind::Unknown)
    }

    /// Parses the snake_case identifier used in configuration files.
    pub fn from_config_key(key: &str) -> Option<Self> {
        match key {
            "file_explorer" => Some(AppKind::FileExplorer),
            "code_editor" => Some(AppKind::CodeEditor),
            "unknown" | "default" => Some(AppKind::Unknown),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while acquiring a snapshot or acting on it.
///
/// Subtree-level failures are absorbed by the scanner; the variants here are
/// the ones that reach callers. `Invalidated`, `Interrupted` and `Empty` mean
/// "no reliable result right now", not "the window has no elements".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    /// No active window, or the window handle is zero
    #[error("Scrape unavailable: {0}")]
    Unavailable(String),

    /// Failure while traversing the accessibility tree
    #[error("Scrape interrupted: {0}")]
    Interrupted(String),

    /// Foreground window changed between the start and the end of a scan
    #[error("Scrape invalidated: foreground window changed from {before} to {after:?}")]
    Invalidated { before: u64, after: Option<u64> },

    /// A previously issued element id no longer resolves
    #[error("Element stale: {0}")]
    ElementStale(String),

    /// The scan completed but collected nothing
    #[error("Scrape produced no elements")]
    Empty,
}

impl ScrapeError {
    /// Whether retrying the scan later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Invalidated { .. } | ScrapeError::Interrupted(_) | ScrapeError::Empty
        )
    }
}

/// Rule-set configuration errors, raised when a rule set is assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Two rules name the same component with different stability tags
    #[error("Component '{name}' declared as both {first} and {second}")]
    NameTypeConflict {
        name: String,
        first: ComponentType,
        second: ComponentType,
    },

    /// Configuration referenced an application kind that does not exist
    #[error("Unknown application kind: {0}")]
    UnknownAppKind(String),
}

/// Errors raised while parsing a textual action plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A non-blank line is not of the form `<id>:<name> (<controlType>)[EXPANDS]`
    #[error("Line {line}: malformed action step '{text}'")]
    Malformed { line: usize, text: String },

    #[error("Action step pattern failed to compile: {0}")]
    Pattern(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Rule(#[from] RuleError),
}
