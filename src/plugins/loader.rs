//! Plugin directory loader.
//!
//! Turns a directory into a [`Plugin`]: commands from `commands/`, extensions
//! from `extensions/`, and name/description/defaults/brand config from
//! `<brand>.toml`.

use std::fs;
use std::path::Path;

use anyhow::Result;

use super::error::PluginLoadError;
use super::matcher::{list_files, FileMatcher};
use super::options::{is_blank, LoadOptions};
use super::traits::{
    CommandLoader, ConfigParser, ExtensionLoader, FileCommandLoader, FileExtensionLoader, Plugin,
    TomlConfigParser,
};

const COMMANDS_DIR: &str = "commands";
const EXTENSIONS_DIR: &str = "extensions";

/// Loads plugins from directories.
///
/// Holds the collaborators that turn individual files into commands,
/// extensions and config tables. Stateless between calls, so one loader can
/// be shared across threads.
pub struct PluginLoader {
    command_loader: Box<dyn CommandLoader>,
    extension_loader: Box<dyn ExtensionLoader>,
    config_parser: Box<dyn ConfigParser>,
}

impl Default for PluginLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginLoader {
    /// Create a loader with the file-based collaborators and the TOML parser.
    pub fn new() -> Self {
        Self {
            command_loader: Box::new(FileCommandLoader),
            extension_loader: Box::new(FileExtensionLoader),
            config_parser: Box::new(TomlConfigParser),
        }
    }

    /// Replace the collaborator that builds commands from files.
    pub fn with_command_loader(mut self, loader: impl CommandLoader + 'static) -> Self {
        self.command_loader = Box::new(loader);
        self
    }

    /// Replace the collaborator that builds extensions from files.
    pub fn with_extension_loader(mut self, loader: impl ExtensionLoader + 'static) -> Self {
        self.extension_loader = Box::new(loader);
        self
    }

    /// Replace the parser used for `<brand>.toml`.
    pub fn with_config_parser(mut self, parser: impl ConfigParser + 'static) -> Self {
        self.config_parser = Box::new(parser);
        self
    }

    /// Load the plugin found in `directory`.
    ///
    /// Fails with [`PluginLoadError::InvalidInput`] for a blank path and
    /// [`PluginLoadError::NotADirectory`] when the path is not a directory.
    /// Errors from the collaborators and from directory scanning are returned
    /// unchanged.
    pub fn load(&self, directory: impl AsRef<Path>, options: &LoadOptions) -> Result<Plugin> {
        let directory = directory.as_ref();
        let explicit_name = options.explicit_name();

        let mut plugin = Plugin {
            hidden: options.hidden,
            ..Plugin::default()
        };
        if let Some(name) = explicit_name {
            plugin.name = name.to_string();
        }

        let display = directory.to_string_lossy();
        if is_blank(&display) {
            return Err(PluginLoadError::invalid_input(display).into());
        }
        if !directory.is_dir() {
            return Err(PluginLoadError::not_a_directory(display).into());
        }

        plugin.directory = directory.to_path_buf();
        if explicit_name.is_none() {
            plugin.name = base_name(directory);
        }

        tracing::debug!(
            directory = %directory.display(),
            name = %plugin.name,
            "Loading plugin"
        );

        let commands_dir = directory.join(COMMANDS_DIR);
        if commands_dir.is_dir() {
            let matcher = FileMatcher::new(&options.command_file_pattern)?;
            for file in list_files(&commands_dir, &matcher, true)? {
                let command = self.command_loader.load_command(&commands_dir.join(file))?;
                plugin.commands.push(command);
            }
        }

        let extensions_dir = directory.join(EXTENSIONS_DIR);
        if extensions_dir.is_dir() {
            let matcher = FileMatcher::new(&options.extension_file_pattern)?;
            for file in list_files(&extensions_dir, &matcher, false)? {
                let extension = self
                    .extension_loader
                    .load_extension(&extensions_dir.join(file))?;
                plugin.extensions.push(extension);
            }
        }

        let config_file = directory.join(options.config_file_name());
        if config_file.is_file() {
            self.apply_config(&mut plugin, &config_file, options, explicit_name.is_some())?;
        }

        if options.hidden {
            for command in &mut plugin.commands {
                command.hidden = true;
            }
        }

        tracing::info!(
            plugin = %plugin.name,
            directory = %directory.display(),
            commands = plugin.commands.len(),
            extensions = plugin.extensions.len(),
            "Plugin loaded"
        );

        Ok(plugin)
    }

    fn apply_config(
        &self,
        plugin: &mut Plugin,
        config_file: &Path,
        options: &LoadOptions,
        keep_name: bool,
    ) -> Result<()> {
        let text = match fs::read(config_file) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %e,
                    "Failed to read plugin config, treating it as empty"
                );
                String::new()
            }
        };
        let config = self.config_parser.parse(&text)?;

        tracing::debug!(
            path = %config_file.display(),
            keys = config.len(),
            "Parsed plugin config"
        );

        if !keep_name {
            match config.get("name") {
                Some(toml::Value::String(name)) if !name.is_empty() => {
                    plugin.name = name.clone();
                }
                Some(toml::Value::String(_)) | None => {}
                Some(other) => warn_unexpected(config_file, "name", other),
            }
        }

        if let Some(brand) = config.get(&options.brand) {
            plugin
                .brand_config
                .insert(options.brand.clone(), brand.clone());
        }

        plugin.defaults = match config.get("defaults") {
            Some(toml::Value::Table(defaults)) => defaults.clone(),
            Some(other) => {
                warn_unexpected(config_file, "defaults", other);
                toml::Table::new()
            }
            None => toml::Table::new(),
        };

        plugin.description = match config.get("description") {
            Some(toml::Value::String(description)) => Some(description.clone()),
            Some(other) => {
                warn_unexpected(config_file, "description", other);
                None
            }
            None => None,
        };

        Ok(())
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader").finish_non_exhaustive()
    }
}

/// Load the plugin in `directory` with the default collaborators.
pub fn load_from_directory(directory: impl AsRef<Path>, options: &LoadOptions) -> Result<Plugin> {
    PluginLoader::new().load(directory, options)
}

fn warn_unexpected(config_file: &Path, field: &str, value: &toml::Value) {
    tracing::warn!(
        path = %config_file.display(),
        field,
        found = value.type_str(),
        "Ignoring plugin config field with unexpected type"
    );
}

/// Last path segment, falling back to the canonical path's last segment and
/// then to the path text for inputs like `.`.
///
/// A plain basename would give `"."` for `.`; resolving it to the real
/// directory name keeps `Plugin::name` meaningful.
fn base_name(directory: &Path) -> String {
    directory
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .or_else(|| {
            fs::canonicalize(directory)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| directory.to_string_lossy().into_owned())
}
