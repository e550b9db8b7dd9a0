// Shared constants (no magic values at call sites)

/// Per-cell execution timeout passed to the notebook tool, in seconds.
pub const DEFAULT_CELL_TIMEOUT_SECS: u64 = 300;

/// Grace added to the cell timeout for the caller-side wall-clock limit.
/// Covers kernel startup and conversion overhead around cell execution.
pub const WALL_CLOCK_GRACE_SECS: u64 = 60;
