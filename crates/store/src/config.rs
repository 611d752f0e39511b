use std::path::PathBuf;

/// Store configuration loaded from environment variables.
///
/// The completed directory always lives inside the jobs directory, so a
/// pending→completed move is a same-filesystem rename.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory holding pending job files (default: `./jobs`).
    pub jobs_dir: PathBuf,
}

impl StoreConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Default  |
    /// |----------------------|----------|
    /// | `SWAPBATCH_JOBS_DIR` | `./jobs` |
    pub fn from_env() -> Self {
        let jobs_dir = std::env::var("SWAPBATCH_JOBS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./jobs"));
        Self { jobs_dir }
    }
}
