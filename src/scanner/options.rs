/// Configuration options for directory scanning operations.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Maximum depth to recurse (None = unlimited, 1 = immediate children only)
    pub max_depth: Option<usize>,

    /// Leave out entries whose name starts with `.` (and everything below them)
    pub skip_hidden: bool,

    /// Follow symbolic links
    pub follow_symlinks: bool,
}

impl ScanOptions {
    /// Create a new ScanOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the immediate children of the root.
    pub fn top_level() -> Self {
        Self::new().with_max_depth(1)
    }

    /// Set maximum recursion depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set whether to skip hidden files
    pub fn with_skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}
