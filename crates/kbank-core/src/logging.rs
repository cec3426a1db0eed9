//! Structured logging conventions shared by the kbank crates.
//!
//! Span fields declared as `tracing::field::Empty` and filled in later with
//! [`tracing::Span::record`] use the constants below. Fields set inline in a
//! macro use the same names as literals:
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `subsystem` | Always `"client"` |
//! | `component` | Operation group: "workspaces", "documents", "chat", "tasks", "search", "settings", "tools" |
//! | `op` | Operation name, e.g. "list", "global", "rename_thread" |
//! | `method`, `endpoint` | HTTP method and route of one transport call |
//! | `entity_kind` | Collection of a dropped search item |
//! | `index` | Position of a dropped row or search item |
//! | `slow` | Set on calls slower than the configured threshold |
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | The CLI could not complete a command |
//! | WARN  | Slow calls, dropped rows and search items, non-envelope error bodies |
//! | INFO  | CLI lifecycle (startup, configuration loaded) |
//! | DEBUG | Completed calls, envelope codes, aggregation summaries |
//! | TRACE | Raw response sizes |

/// HTTP status code of a transport call.
pub const STATUS: &str = "status";

/// Wall-clock duration of a transport call in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of validated rows or search items returned.
pub const RESULT_COUNT: &str = "result_count";

/// Number of rows or search items left out after failing validation.
pub const DROPPED_COUNT: &str = "dropped_count";
