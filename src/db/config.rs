#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    /// Maximum nesting depth accepted in a create tree; deeper inputs are
    /// rejected with a validation error.
    pub max_create_depth: usize,
    /// When set, `find` with a list of queries drops duplicate ids across
    /// branches instead of concatenating them verbatim.
    pub dedupe_disjunction: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            max_create_depth: 64,
            dedupe_disjunction: false,
        }
    }
}

impl RepoConfig {
    pub fn deduplicating() -> Self {
        Self {
            dedupe_disjunction: true,
            ..Self::default()
        }
    }
}
