//! Logging utilities for llm-router
//!
//! Re-exports tracing macros with log_* naming convention for consistency.

// Re-export tracing macros with log_* naming
pub use tracing::{
    debug as log_debug, error as log_error, info as log_info, info_span as log_span,
    warn as log_warn,
};
