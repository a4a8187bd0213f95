//! Common frontend plumbing for the garage management app
//!
//! Two collaborators live here: the session guard, which is the single
//! authority for detecting authentication expiry anywhere in the app, and
//! the wrapped client, which routes every dispatcher failure through the
//! guard before any generic error UI fires.

pub mod auth;
pub mod client_wrapper;
pub mod config;
pub mod services;
pub mod ui;

pub use auth::classify::{Classification, ResponseLike, classify};
pub use auth::guard::SessionGuard;
pub use client_wrapper::{CallHandlers, WrappedClient};
pub use config::SessionDefaults;
