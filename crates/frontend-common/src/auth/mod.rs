//! Authentication module

pub mod classify;
pub mod error_handler;
pub mod error_messages;
pub mod guard;

// Re-export commonly used items
pub use classify::{Classification, ResponseLike, classify};
pub use error_handler::{
    clear_global_interceptor, handle_error, install_global_interceptor, report_failure,
};
pub use error_messages::{extract_error_message, garage_error_extractor};
pub use guard::SessionGuard;
