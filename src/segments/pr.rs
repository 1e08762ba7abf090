use crate::utils::run_command;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// `gh` may hit the GitHub API, so it gets a longer leash than git.
pub const GH_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

const GH_PR_FIELDS: &str = "number,isDraft,reviewDecision,statusCheckRollup";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    /// Approved, or checks passing.
    Passing,
    /// Draft, or checks still running.
    Pending,
    /// Changes requested, or a check failed.
    Failing,
}

impl PrState {
    pub fn symbol(self) -> &'static str {
        match self {
            PrState::Passing => "✓",
            PrState::Pending => "◐",
            PrState::Failing => "✗",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrStatus {
    pub number: u64,
    pub state: PrState,
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PR#{} {}", self.number, self.state.symbol())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrView {
    number: u64,
    #[serde(default)]
    is_draft: bool,
    #[serde(default)]
    review_decision: Option<String>,
    #[serde(default)]
    status_check_rollup: Option<Vec<CheckEntry>>,
}

/// A check run (`status`/`conclusion`) or a commit status context (`state`).
#[derive(Debug, Deserialize)]
struct CheckEntry {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    conclusion: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

impl CheckEntry {
    fn failed(&self) -> bool {
        let conclusion_failed = matches!(
            self.conclusion.as_deref(),
            Some("FAILURE" | "CANCELLED" | "TIMED_OUT" | "ACTION_REQUIRED" | "STARTUP_FAILURE")
        );
        let state_failed = matches!(self.state.as_deref(), Some("FAILURE" | "ERROR"));
        conclusion_failed || state_failed
    }

    fn pending(&self) -> bool {
        let run_pending = self.status.as_deref().is_some_and(|s| s != "COMPLETED");
        let state_pending = matches!(self.state.as_deref(), Some("PENDING" | "EXPECTED"));
        run_pending || state_pending
    }
}

/// PR associated with the branch checked out in `dir`, via the `gh` CLI.
pub async fn pr_status(dir: &Path) -> Option<PrStatus> {
    let output = run_command("gh", &["pr", "view", "--json", GH_PR_FIELDS], Some(dir), GH_COMMAND_TIMEOUT).await?;
    parse_pr_view(&output)
}

/// Classifies `gh pr view --json` output into exactly one state.
pub fn parse_pr_view(json: &str) -> Option<PrStatus> {
    let view: PrView = match serde_json::from_str(json) {
        Ok(view) => view,
        Err(e) => {
            debug!("Unexpected gh output: {}", e);
            return None;
        }
    };

    let checks = view.status_check_rollup.unwrap_or_default();
    let state = if view.is_draft {
        PrState::Pending
    } else if view.review_decision.as_deref() == Some("CHANGES_REQUESTED")
        || checks.iter().any(CheckEntry::failed)
    {
        PrState::Failing
    } else if checks.iter().any(CheckEntry::pending) {
        PrState::Pending
    } else {
        PrState::Passing
    };

    Some(PrStatus {
        number: view.number,
        state,
    })
}
