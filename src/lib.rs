//! Plugin discovery for gluegun-style command-line tools.
//!
//! A plugin is a directory holding `commands/`, `extensions/` and an optional
//! `<brand>.toml` file. [`plugins::load_from_directory`] turns such a
//! directory into a [`plugins::Plugin`] record.

pub mod plugins;

pub use plugins::{
    load_from_directory, Command, Extension, LoadOptions, Plugin, PluginLoadError, PluginLoader,
    PluginRegistry,
};
