#[cfg(feature = "cli")]
pub mod cli;
pub mod site;

/// Shipped-asset logo the UI falls back to when no candidate resolves.
pub const DEFAULT_FALLBACK_LOGO_URL: &str = "/images/logo-fallback.svg";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
