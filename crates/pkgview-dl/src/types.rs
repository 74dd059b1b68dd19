use std::path::PathBuf;

/// Download progress events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Starting { total: u64 },
    Chunk { current: u64, total: u64 },
    Complete { total: u64 },
}

/// How to handle an existing file at the output path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteMode {
    /// Keep the existing file and do nothing.
    Skip,
    /// Replace the existing file without asking.
    Force,
    /// Ask through the configured confirmation hook.
    Prompt,
}

/// What [`Download::execute`](crate::download::Download::execute) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadStatus {
    /// The remote content was written to this path.
    Downloaded { path: PathBuf, bytes: u64 },
    /// Something already existed at this path and was left untouched.
    Kept { path: PathBuf },
}
