//! Photo Frame Server Library
//!
//! This library backs a small web application that loads photo queues from
//! the Google Photos Library API and serves them to a photo-frame display
//! client. The user signs in with Google, searches their library or picks
//! an album, and the selection is cached per user so the frame keeps
//! working without the user resubmitting search criteria.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for pages, OAuth and the photo endpoints
//! - `cli` - Command-line entry points (`serve`, `cache`, `completions`)
//! - `config` - Configuration management and environment variables
//! - `library` - Google Photos Library API client and aggregation loops
//! - `management` - Per-user caches, sessions and the request orchestrator
//! - `server` - HTTP server wiring
//! - `types` - Data structures and type definitions
//! - `utils` - Pure helpers (query normalization, item filtering, PKCE)
//!
//! # Example
//!
//! ```
//! use photoframe::config;
//!
//! #[tokio::main]
//! async fn main() -> photoframe::Res<()> {
//!     config::load_env().await?;
//!     photoframe::server::start_api_server().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod library;
pub mod management;
pub mod server;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object while maintaining Send + Sync
/// bounds for async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Loading queue for user {}", user_id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Cached {} media items", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Immediately terminates the program with exit code 1, so it should only
/// be used for fatal startup errors where recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues or important information that users should
/// notice without terminating the program.
///
/// # Example
///
/// ```
/// warning!("Album cache could not be cleared for user {}", user_id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
