//! Snapshot acquisition over an abstract accessibility backend.
//!
//! A [`Scanner`] walks the foreground window through an
//! [`AccessibilityBackend`] and produces a [`Snapshot`]: the flat element
//! list plus the id → native handle cache for that one scan.
//!
//! The scan is bracketed by two foreground-window queries. If the window
//! changed by the time the walk finishes, the whole result is discarded with
//! [`ScrapeError::Invalidated`]; partial results are never returned. A
//! failure while reading one element stops descent into that branch only.
//!
//! Element ids are `<scan-prefix>-<pre-order index>`, where the prefix comes
//! from a fresh UUID per scan. Ids are only resolvable through the snapshot
//! that issued them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScanConfig;
use crate::tree::ElementTree;
use crate::types::{AppKind, BoundingRect, ScrapeError, ScrapedElement};

/// Native window handle. Zero is never a valid window.
pub type WindowHandle = u64;

/// Default bound on how deep a scan descends.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Properties read from one live element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementProperties {
    pub name: Option<String>,
    pub control_type: String,
    pub class_name: Option<String>,
    pub landmark_type: Option<String>,
    pub bounding_rect: BoundingRect,
}

impl ElementProperties {
    fn into_element(self, id: String, parent_id: Option<String>) -> ScrapedElement {
        ScrapedElement {
            id,
            parent_id,
            name: self.name,
            control_type: self.control_type,
            class_name: self.class_name,
            landmark_type: self.landmark_type,
            bounding_rect: self.bounding_rect,
        }
    }
}

/// Platform accessibility API, as seen by the scanner.
///
/// Implementations wrap UI Automation, AT-SPI, AX and so on. Every call may
/// fail because the live UI changes underneath the caller.
pub trait AccessibilityBackend {
    /// Native element reference
    type Handle: Clone;

    /// Currently active top-level window, if any.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Root element of `window`.
    fn window_root(&self, window: WindowHandle) -> Result<Self::Handle, ScrapeError>;

    /// Executable name of the process owning `window`.
    fn process_name(&self, window: WindowHandle) -> Option<String>;

    fn properties(&self, element: &Self::Handle) -> Result<ElementProperties, ScrapeError>;

    fn children(&self, element: &Self::Handle) -> Result<Vec<Self::Handle>, ScrapeError>;
}

/// Point-in-time view of one window, owning the handle cache for its ids.
#[derive(Debug, Clone)]
pub struct Snapshot<H> {
    scan_id: Uuid,
    window: WindowHandle,
    process_name: Option<String>,
    app_kind: AppKind,
    captured_at: DateTime<Utc>,
    elements: Vec<ScrapedElement>,
    handles: HashMap<String, H>,
}

impl<H> Snapshot<H> {
    pub fn scan_id(&self) -> Uuid {
        self.scan_id
    }

    pub fn window(&self) -> WindowHandle {
        self.window
    }

    pub fn process_name(&self) -> Option<&str> {
        self.process_name.as_deref()
    }

    pub fn app_kind(&self) -> AppKind {
        self.app_kind
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Elements in discovery (pre-order) sequence.
    pub fn elements(&self) -> &[ScrapedElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Native handle for an id issued by this snapshot.
    ///
    /// Ids from any other scan, including earlier scans of the same window,
    /// fail with [`ScrapeError::ElementStale`].
    pub fn resolve(&self, id: &str) -> Result<&H, ScrapeError> {
        self.handles
            .get(id)
            .ok_or_else(|| ScrapeError::ElementStale(id.to_string()))
    }

    pub fn tree(&self) -> ElementTree {
        ElementTree::build(&self.elements)
    }

    /// Serializable form without native handles.
    pub fn to_file(&self) -> SnapshotFile {
        SnapshotFile {
            process_name: self.process_name.clone(),
            captured_at: Some(self.captured_at),
            elements: self.elements.clone(),
        }
    }
}

/// On-disk snapshot format: `{ "process_name": ..., "elements": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    pub elements: Vec<ScrapedElement>,
}

impl SnapshotFile {
    pub fn app_kind(&self) -> AppKind {
        AppKind::from_process(self.process_name.as_deref())
    }
}

/// Walks the foreground window into a [`Snapshot`].
pub struct Scanner<B> {
    backend: B,
    max_depth: usize,
}

struct Walk<H> {
    prefix: String,
    elements: Vec<ScrapedElement>,
    handles: HashMap<String, H>,
    truncated: usize,
}

impl<B: AccessibilityBackend> Scanner<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Scanner bounded by the configured `[scan]` settings.
    pub fn from_config(backend: B, config: &ScanConfig) -> Self {
        Self::new(backend).with_max_depth(config.max_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Scan the current foreground window.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Unavailable`] when there is no foreground window
    /// - [`ScrapeError::Invalidated`] when the foreground window changed
    ///   during the walk
    /// - [`ScrapeError::Empty`] when nothing could be read
    /// - any error from [`AccessibilityBackend::window_root`]
    pub fn scan(&self) -> Result<Snapshot<B::Handle>, ScrapeError> {
        let before = match self.backend.foreground_window() {
            Some(window) if window != 0 => window,
            _ => {
                return Err(ScrapeError::Unavailable(
                    "no active window".to_string(),
                ))
            }
        };

        let root = self.backend.window_root(before)?;
        let scan_id = Uuid::new_v4();
        let mut walk = Walk {
            prefix: scan_id.simple().to_string()[..8].to_string(),
            elements: Vec::new(),
            handles: HashMap::new(),
            truncated: 0,
        };

        self.walk(root, &mut walk);

        let after = self.backend.foreground_window();
        if after != Some(before) {
            log::warn!(
                "[SCANNER] Foreground window changed during scan ({} -> {:?}), discarding {} elements",
                before,
                after,
                walk.elements.len()
            );
            return Err(ScrapeError::Invalidated { before, after });
        }

        if walk.elements.is_empty() {
            return Err(ScrapeError::Empty);
        }

        let process_name = self.backend.process_name(before);
        let app_kind = AppKind::from_process(process_name.as_deref());

        log::info!(
            "[SCANNER] Scan {} of window {}: {} elements, {} branches truncated, app {}",
            walk.prefix,
            before,
            walk.elements.len(),
            walk.truncated,
            app_kind
        );

        Ok(Snapshot {
            scan_id,
            window: before,
            process_name,
            app_kind,
            captured_at: Utc::now(),
            elements: walk.elements,
            handles: walk.handles,
        })
    }

    /// Depth-first walk from `root`, assigning ids in pre-order.
    fn walk(&self, root: B::Handle, walk: &mut Walk<B::Handle>) {
        let mut pending: Vec<(B::Handle, Option<String>, usize)> = vec![(root, None, 0)];

        while let Some((handle, parent_id, depth)) = pending.pop() {
            if depth > self.max_depth {
                log::debug!("[SCANNER] Maximum depth reached at depth {}", depth);
                walk.truncated += 1;
                continue;
            }

            let properties = match self.backend.properties(&handle) {
                Ok(properties) => properties,
                Err(e) => {
                    log::debug!("[SCANNER] Skipping branch at depth {}: {}", depth, e);
                    walk.truncated += 1;
                    continue;
                }
            };

            let id = format!("{}-{}", walk.prefix, walk.elements.len());
            walk.elements.push(properties.into_element(id.clone(), parent_id));
            walk.handles.insert(id.clone(), handle.clone());

            let children = match self.backend.children(&handle) {
                Ok(children) => children,
                Err(e) => {
                    log::debug!("[SCANNER] Could not list children of {}: {}", id, e);
                    walk.truncated += 1;
                    continue;
                }
            };

            pending.extend(
                children
                    .into_iter()
                    .rev()
                    .map(|child| (child, Some(id.clone()), depth + 1)),
            );
        }
    }
}
