//! Guarded interaction with scanned elements, and the action-plan format.
//!
//! A plan is plain text, one step per line:
//!
//! ```text
//! 3f9a1c2e-12:Documents (TreeItem)[EXPANDS]
//! 3f9a1c2e-40:report.pdf (ListItem)
//! ```
//!
//! which is exactly the line format of a component summary, optionally
//! followed by `[EXPANDS]`. An expanding step (a gateway) changes the UI
//! enough that later steps must be resolved against a fresh scan.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;
use crate::types::{PlanError, ScrapeError};

const EXPANDS_MARKER: &str = "[EXPANDS]";

/// Live operations on a native element.
pub trait ElementInvoker {
    type Handle;

    /// Current accessible name of the live element.
    fn live_name(&self, element: &Self::Handle) -> Result<Option<String>, ScrapeError>;

    /// Click, select or otherwise activate the element.
    fn invoke(&self, element: &Self::Handle) -> Result<(), ScrapeError>;
}

/// Click element `id` if it still carries `expected_name`.
///
/// The id is resolved through `snapshot`'s handle cache and the live name is
/// re-read right before acting. Returns `false` without invoking anything
/// when the id is stale, the element is gone, or it has been renamed.
/// Failures are logged and never escape.
pub fn execute_click<H, I>(snapshot: &Snapshot<H>, invoker: &I, id: &str, expected_name: &str) -> bool
where
    I: ElementInvoker<Handle = H>,
{
    let handle = match snapshot.resolve(id) {
        Ok(handle) => handle,
        Err(e) => {
            log::warn!("[INTERACTION] {}", e);
            return false;
        }
    };

    let live_name = match invoker.live_name(handle) {
        Ok(name) => name.unwrap_or_default(),
        Err(e) => {
            log::warn!("[INTERACTION] Could not re-read {}: {}", id, e);
            return false;
        }
    };

    if live_name.trim() != expected_name.trim() {
        log::warn!(
            "[INTERACTION] Element {} renamed: expected '{}', found '{}'",
            id,
            expected_name,
            live_name
        );
        return false;
    }

    match invoker.invoke(handle) {
        Ok(()) => {
            log::info!("[INTERACTION] Invoked {} '{}'", id, expected_name);
            true
        }
        Err(e) => {
            log::warn!("[INTERACTION] Invoking {} failed: {}", id, e);
            false
        }
    }
}

/// One line of an action plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStep {
    pub id: String,
    pub name: String,
    pub control_type: String,
    /// Whether the target becomes the new search root for later steps
    pub expands: bool,
}

impl fmt::Display for ActionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} ({})", self.id, self.name, self.control_type)?;
        if self.expands {
            f.write_str(EXPANDS_MARKER)?;
        }
        Ok(())
    }
}

/// Compiled step-line pattern, built on first use.
fn step_pattern() -> Result<&'static Regex, PlanError> {
    static STEP_LINE: OnceLock<Result<Regex, String>> = OnceLock::new();
    STEP_LINE
        .get_or_init(|| {
            Regex::new(r"^([^:\s]+):(.*) \(([^()]+)\)\s*(\[EXPANDS\])?$").map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|e| PlanError::Pattern(e.clone()))
}

/// Ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub steps: Vec<ActionStep>,
}

impl ActionPlan {
    /// Parse a plan, skipping blank lines.
    ///
    /// # Example
    ///
    /// ```
    /// use semantic_components::interaction::ActionPlan;
    ///
    /// let plan = ActionPlan::parse("a-4:Documents (TreeItem)[EXPANDS]\n\na-9:Open (Ctrl+O) (Button)\n").unwrap();
    /// assert_eq!(plan.steps.len(), 2);
    /// assert_eq!(plan.steps[1].name, "Open (Ctrl+O)");
    /// assert_eq!(plan.gateways().count(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// [`PlanError::Malformed`] with the 1-based line number of the first
    /// line that is not a step.
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let pattern = step_pattern()?;

        let mut steps = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let caps = pattern.captures(line).ok_or_else(|| PlanError::Malformed {
                line: index + 1,
                text: line.to_string(),
            })?;

            let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();
            steps.push(ActionStep {
                id: field(1).to_string(),
                name: field(2).trim().to_string(),
                control_type: field(3).trim().to_string(),
                expands: caps.get(4).is_some(),
            });
        }

        Ok(ActionPlan { steps })
    }

    /// Steps whose target expands into a new search root.
    pub fn gateways(&self) -> impl Iterator<Item = &ActionStep> + '_ {
        self.steps.iter().filter(|step| step.expands)
    }

    /// Steps that can run against the current snapshot: everything up to
    /// and including the first gateway.
    pub fn until_gateway(&self) -> &[ActionStep] {
        match self.steps.iter().position(|step| step.expands) {
            Some(gateway) => &self.steps[..=gateway],
            None => &self.steps,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for ActionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Run the steps of `plan` that belong to `snapshot`, stopping at the first
/// failed click. Returns the number of steps executed successfully.
pub fn execute_plan<H, I>(snapshot: &Snapshot<H>, invoker: &I, plan: &ActionPlan) -> usize
where
    I: ElementInvoker<Handle = H>,
{
    let mut executed = 0;
    for step in plan.until_gateway() {
        if !execute_click(snapshot, invoker, &step.id, &step.name) {
            break;
        }
        executed += 1;
    }
    executed
}
