//! Plugin system for gluegun.
//!
//! A plugin lives in its own directory:
//!
//! ```text
//! <directory>/
//!   commands/          recursive scan, one command per matching file
//!   extensions/        top-level scan only, one extension per matching file
//!   <brand>.toml       optional config (`name`, `description`, `defaults`, `[<brand>]`)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use gluegun::plugins::{load_from_directory, LoadOptions};
//!
//! let options = LoadOptions::default().with_brand("movie").with_hidden(true);
//! let plugin = load_from_directory("./plugins/imdb", &options)?;
//! for command in &plugin.commands {
//!     println!("{} -> {}", command.name, command.file_path.display());
//! }
//! ```
//!
//! Example `movie.toml`:
//!
//! ```toml
//! name = "imdb"
//! description = "Movie lookups"
//!
//! [defaults]
//! region = "us"
//!
//! [movie]
//! color = true
//! ```

pub mod error;
pub mod loader;
pub mod matcher;
pub mod options;
pub mod registry;
pub mod traits;

pub use error::PluginLoadError;
pub use loader::{load_from_directory, PluginLoader};
pub use matcher::{list_files, FileMatcher};
pub use options::{LoadOptions, DEFAULT_BRAND};
pub use registry::{PluginRegistry, DEFAULT_PLUGIN_MATCH};
pub use traits::{
    Command, CommandLoader, ConfigParser, Extension, ExtensionLoader, FileCommandLoader,
    FileExtensionLoader, Plugin, TomlConfigParser,
};
