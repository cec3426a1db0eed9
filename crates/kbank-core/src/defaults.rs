//! Centralized default constants for the kbank client.
//!
//! Organized by domain area. Every constraint the schemas enforce and every
//! fallback the client applies is defined here once.

// =============================================================================
// TRANSPORT
// =============================================================================

/// Backend address used when `KBANK_API_URL` is unset.
pub const API_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the backend address.
pub const ENV_API_URL: &str = "KBANK_API_URL";

/// Environment variable holding an optional default timeout in seconds.
pub const ENV_API_TIMEOUT_SECS: &str = "KBANK_API_TIMEOUT_SECS";

/// Content type sent with every request.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Calls slower than this are logged at WARN.
pub const SLOW_CALL_MS: u64 = 5_000;

// =============================================================================
// WORKSPACES
// =============================================================================

/// Workspace identifiers are always exactly this many characters.
pub const WORKSPACE_ID_LEN: usize = 8;

pub const WORKSPACE_NAME_MAX_LEN: usize = 50;

pub const WORKSPACE_DESCRIPTION_MAX_LEN: usize = 200;

/// Embedding dimension of text-embedding-3-small.
pub const DEFAULT_EMBEDDING_DIM: u32 = 1536;

// =============================================================================
// SEARCH
// =============================================================================

/// Shortest query the search endpoint accepts.
pub const SEARCH_QUERY_MIN_LEN: usize = 2;

pub const HYBRID_ALPHA_MIN: f64 = 0.0;

pub const HYBRID_ALPHA_MAX: f64 = 1.0;

// =============================================================================
// SETTINGS
// =============================================================================

/// Settings keys that configure model providers.
pub const PROVIDER_KEYS: [&str; 4] = [
    "llm_provider",
    "llm_model",
    "embedding_provider",
    "embedding_model",
];

pub const DEFAULT_SHOW_REASONING: bool = true;

// =============================================================================
// TASKS
// =============================================================================

pub const TASK_PROGRESS_MAX: i64 = 100;
