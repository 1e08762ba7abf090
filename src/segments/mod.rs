pub mod git;
pub mod pr;
pub mod runtime;
pub mod system;

pub use git::{GitInfo, GitStatus};
pub use pr::{PrState, PrStatus};

use chrono::{DateTime, Local};
use std::path::Path;

/// Best-effort queries against the machine the statusline runs on.
///
/// Implementations never fail: anything they cannot determine is `None`.
#[allow(async_fn_in_trait)]
pub trait Probe {
    /// Branch plus status and PR annotations for a working directory.
    async fn git_summary(&self, dir: &Path) -> Option<String>;

    async fn cpu_usage(&self) -> Option<u8>;

    async fn memory_usage(&self) -> Option<u8>;

    async fn battery(&self) -> Option<u8>;

    async fn python_version(&self) -> Option<String>;

    fn python_venv(&self) -> Option<String>;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Probes the real host through the filesystem and external commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe {
    /// Also ask `gh` for the PR attached to the branch.
    pub pr_status: bool,
}

impl HostProbe {
    pub fn new() -> Self {
        Self { pr_status: true }
    }
}

impl Probe for HostProbe {
    async fn git_summary(&self, dir: &Path) -> Option<String> {
        git::git_info(dir, self.pr_status).await.map(|info| info.summary())
    }

    async fn cpu_usage(&self) -> Option<u8> {
        system::cpu_usage().await
    }

    async fn memory_usage(&self) -> Option<u8> {
        system::memory_usage().await
    }

    async fn battery(&self) -> Option<u8> {
        system::battery().await
    }

    async fn python_version(&self) -> Option<String> {
        runtime::python_version().await
    }

    fn python_venv(&self) -> Option<String> {
        runtime::python_venv()
    }
}
