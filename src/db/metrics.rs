/// Write-path counters, reset on demand. Read paths are untracked: they
/// take shared references and leave the repository byte-identical.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RepoMetrics {
    pub nodes_created: u64,
    pub edges_created: u64,
    pub nodes_deleted: u64,
    pub edges_deleted: u64,
    pub patches_applied: u64,
}

impl RepoMetrics {
    pub fn reset(&mut self) {
        *self = RepoMetrics::default();
    }
}
