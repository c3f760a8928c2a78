//! Shared constants for designer-ext.

/// Maximum page IDs handled by one reconciliation chunk.
pub const MAX_PAGES_PER_CHUNK: usize = 10;

/// Maximum page IDs sent in a single page-status request.
pub const PAGE_STATUS_BATCH_SIZE: usize = 5;

/// Default pause between sequential status requests, in milliseconds.
pub const DEFAULT_CHUNK_DELAY_MS: u64 = 100;

/// Default idle period before a status cache entry is evicted, in seconds.
pub const DEFAULT_STATUS_IDLE_SECS: u64 = 300;

/// Upper bound on cached status entries.
pub const STATUS_CACHE_CAPACITY: u64 = 1_000;

/// Wall-clock bound after which element inspection gives up on a mapping.
pub const ELEMENT_MAPPING_TIMEOUT_SECS: u64 = 10;

/// Maximum depth walked when mapping an element subtree.
pub const MAX_ELEMENT_DEPTH: usize = 32;

/// Version string attached to newly registered scripts.
pub const DEFAULT_SCRIPT_VERSION: &str = "1.0.0";

/// OAuth `state` value identifying the designer extension.
pub const AUTHORIZE_STATE: &str = "webflow_designer";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "DESIGNER_EXT_API_URL";

/// Environment variable holding an optional request timeout.
pub const TIMEOUT_SECS_ENV: &str = "DESIGNER_EXT_TIMEOUT_SECS";

/// Environment variable overriding the status cache idle period.
pub const STATUS_IDLE_SECS_ENV: &str = "DESIGNER_EXT_STATUS_IDLE_SECS";

/// Environment variable overriding the delay between status requests.
pub const CHUNK_DELAY_MS_ENV: &str = "DESIGNER_EXT_CHUNK_DELAY_MS";

/// Environment variable overriding where the session file lives.
pub const DATA_DIR_ENV: &str = "DESIGNER_EXT_DATA_DIR";
