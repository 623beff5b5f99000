//! Plugin registry for discovery and lookup.
//!
//! The registry loads plugins from one directory at a time or from every
//! subdirectory of a plugins folder, and keeps them in load order.

use std::fs;
use std::path::Path;

use anyhow::Result;
use parking_lot::RwLock;

use super::loader::PluginLoader;
use super::matcher::FileMatcher;
use super::options::LoadOptions;
use super::traits::{Command, Plugin};

/// Default subdirectory pattern for [`PluginRegistry::add_plugins`].
pub const DEFAULT_PLUGIN_MATCH: &[&str] = &["*"];

/// Registry for loaded plugins.
///
/// Thread-safe; the lock is only held while reading or updating the list,
/// never while touching the filesystem.
pub struct PluginRegistry {
    loader: PluginLoader,
    plugins: RwLock<Vec<Plugin>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(PluginLoader::new())
    }
}

impl PluginRegistry {
    /// Create an empty registry that loads plugins with `loader`.
    pub fn new(loader: PluginLoader) -> Self {
        Self {
            loader,
            plugins: RwLock::new(Vec::new()),
        }
    }

    /// Load the plugin in `directory` and register it.
    ///
    /// A plugin with the same name replaces the earlier one in place.
    pub fn add_plugin(&self, directory: impl AsRef<Path>, options: &LoadOptions) -> Result<Plugin> {
        let plugin = self.loader.load(directory, options)?;
        self.insert(plugin.clone());
        Ok(plugin)
    }

    /// Load every subdirectory of `directory` whose name matches `matching`.
    ///
    /// Subdirectories are visited in name order. Plain files are skipped and
    /// `options.name` is ignored so each plugin keeps its own name. Nothing is
    /// registered unless every subdirectory loads.
    pub fn add_plugins<S: AsRef<str>>(
        &self,
        directory: impl AsRef<Path>,
        matching: &[S],
        options: &LoadOptions,
    ) -> Result<Vec<Plugin>> {
        let directory = directory.as_ref();
        let matcher = FileMatcher::new(matching)?;
        let options = LoadOptions {
            name: None,
            ..options.clone()
        };

        let mut subdirs = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if matcher.is_match(&name) {
                subdirs.push((name, entry.path()));
            }
        }
        subdirs.sort_by(|a, b| a.0.cmp(&b.0));

        tracing::debug!(
            directory = %directory.display(),
            candidates = subdirs.len(),
            "Scanning plugin directories"
        );

        let loaded = subdirs
            .iter()
            .map(|(_, path)| self.loader.load(path, &options))
            .collect::<Result<Vec<_>>>()?;
        for plugin in &loaded {
            self.insert(plugin.clone());
        }
        Ok(loaded)
    }

    fn insert(&self, plugin: Plugin) {
        tracing::info!(
            plugin = %plugin.name,
            directory = %plugin.directory.display(),
            "Registered plugin"
        );

        let mut plugins = self.plugins.write();
        match plugins.iter_mut().find(|p| p.name == plugin.name) {
            Some(existing) => *existing = plugin,
            None => plugins.push(plugin),
        }
    }

    /// Get a plugin by name.
    pub fn get(&self, name: &str) -> Option<Plugin> {
        self.plugins.read().iter().find(|p| p.name == name).cloned()
    }

    /// Names of all registered plugins, in load order.
    pub fn plugin_names(&self) -> Vec<String> {
        self.plugins.read().iter().map(|p| p.name.clone()).collect()
    }

    /// Snapshot of all registered plugins.
    pub fn plugins(&self) -> Vec<Plugin> {
        self.plugins.read().clone()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// Whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }

    /// Find a command by plugin name and command name.
    pub fn find_command(&self, plugin: &str, command: &str) -> Option<Command> {
        self.plugins
            .read()
            .iter()
            .find(|p| p.name == plugin)
            .and_then(|p| p.command(command).cloned())
    }

    /// `(plugin name, command)` pairs for every command that is not hidden.
    pub fn visible_commands(&self) -> Vec<(String, Command)> {
        self.plugins
            .read()
            .iter()
            .flat_map(|p| {
                p.commands
                    .iter()
                    .filter(|c| !c.hidden)
                    .map(|c| (p.name.clone(), c.clone()))
            })
            .collect()
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugin_count", &self.plugins.read().len())
            .finish_non_exhaustive()
    }
}
