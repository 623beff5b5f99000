//! Plugin record types and the collaborators that build their parts.
//!
//! The loader does not interpret command or extension files itself. It hands
//! every discovered path to a [`CommandLoader`] or [`ExtensionLoader`] and the
//! config text to a [`ConfigParser`]. Default file-based implementations are
//! provided.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

/// A plugin assembled from a directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Plugin {
    /// Explicit name, config `name`, or the directory's base name.
    pub name: String,
    /// Directory the plugin was loaded from, as given by the caller.
    pub directory: PathBuf,
    /// When set, every entry in `commands` is hidden too.
    pub hidden: bool,
    /// Commands found under `commands/`, in discovery order.
    pub commands: Vec<Command>,
    /// Extensions found directly in `extensions/`, in discovery order.
    pub extensions: Vec<Extension>,
    /// The config file's `[defaults]` table.
    pub defaults: toml::Table,
    /// The config file's `description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Brand-specific config keyed by brand, e.g. `"gluegun"` holds the
    /// `[gluegun]` table of `gluegun.toml`.
    #[serde(flatten)]
    pub brand_config: BTreeMap<String, toml::Value>,
}

impl Plugin {
    /// The config sub-table for `brand`, if the config file had one.
    pub fn brand(&self, brand: &str) -> Option<&toml::Value> {
        self.brand_config.get(brand)
    }

    /// Finds a command by name.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }
}

/// A command discovered under `commands/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    /// Command name, the file stem by default.
    pub name: String,
    /// File the command was loaded from.
    pub file_path: PathBuf,
    /// Path segments below `commands/`, e.g. `["db", "migrate"]` for
    /// `commands/db/migrate.js`.
    pub command_path: Vec<String>,
    /// Hidden commands are left out of help listings.
    pub hidden: bool,
    /// One-line summary, if the loader found one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An extension discovered under `extensions/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    /// Extension name, the file stem by default.
    pub name: String,
    /// File the extension was loaded from.
    pub file_path: PathBuf,
}

/// Builds a [`Command`] from a file.
pub trait CommandLoader: Send + Sync {
    fn load_command(&self, file_path: &Path) -> Result<Command>;
}

/// Builds an [`Extension`] from a file.
pub trait ExtensionLoader: Send + Sync {
    fn load_extension(&self, file_path: &Path) -> Result<Extension>;
}

/// Parses config file text into a table.
pub trait ConfigParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<toml::Table>;
}

/// Derives commands from file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCommandLoader;

impl CommandLoader for FileCommandLoader {
    fn load_command(&self, file_path: &Path) -> Result<Command> {
        ensure_file(file_path, "command")?;
        let name = file_stem(file_path);

        Ok(Command {
            command_path: command_path(file_path, &name),
            name,
            file_path: file_path.to_path_buf(),
            hidden: false,
            description: None,
        })
    }
}

/// Derives extensions from file names.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtensionLoader;

impl ExtensionLoader for FileExtensionLoader {
    fn load_extension(&self, file_path: &Path) -> Result<Extension> {
        ensure_file(file_path, "extension")?;
        Ok(Extension {
            name: file_stem(file_path),
            file_path: file_path.to_path_buf(),
        })
    }
}

/// Parses TOML with the `toml` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlConfigParser;

impl ConfigParser for TomlConfigParser {
    fn parse(&self, text: &str) -> Result<toml::Table> {
        Ok(toml::from_str::<toml::Table>(text)?)
    }
}

fn ensure_file(file_path: &Path, kind: &str) -> Result<()> {
    if file_path.as_os_str().to_string_lossy().trim().is_empty() || !file_path.is_file() {
        anyhow::bail!(
            "couldn't load {kind} (this isn't a file): {}",
            file_path.display()
        );
    }
    Ok(())
}

fn file_stem(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Segments after the last `commands` directory, ending with `name`.
fn command_path(file_path: &Path, name: &str) -> Vec<String> {
    let components: Vec<Component<'_>> = file_path.components().collect();
    let parent_len = components.len().saturating_sub(1);
    let start = components[..parent_len]
        .iter()
        .rposition(|c| c.as_os_str() == "commands")
        .map_or(parent_len, |i| i + 1);

    components[start..parent_len]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .chain(std::iter::once(name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn command_loader_uses_file_stem_and_nested_path() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("commands").join("db");
        fs::create_dir_all(&nested).unwrap();
        let file = nested.join("migrate.js");
        fs::write(&file, "module.exports = {}").unwrap();

        let command = FileCommandLoader.load_command(&file).unwrap();
        assert_eq!(command.name, "migrate");
        assert_eq!(command.command_path, vec!["db", "migrate"]);
        assert_eq!(command.file_path, file);
        assert!(!command.hidden);
        assert!(command.description.is_none());
    }

    #[test]
    fn command_path_without_commands_dir_is_just_the_name() {
        assert_eq!(command_path(Path::new("/x/y/run.ts"), "run"), vec!["run"]);
    }

    #[test]
    fn loaders_reject_missing_files() {
        let err = FileCommandLoader
            .load_command(Path::new("/definitely/not/here.js"))
            .unwrap_err();
        assert!(err.to_string().contains("couldn't load command"));

        let err = FileExtensionLoader
            .load_extension(Path::new(""))
            .unwrap_err();
        assert!(err.to_string().contains("couldn't load extension"));
    }

    #[test]
    fn extension_loader_uses_file_stem() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("http.ts");
        fs::write(&file, "").unwrap();
        let ext = FileExtensionLoader.load_extension(&file).unwrap();
        assert_eq!(ext.name, "http");
    }

    #[test]
    fn toml_parser_reports_syntax_errors() {
        let err = TomlConfigParser.parse("name = ").unwrap_err();
        assert!(err.downcast_ref::<toml::de::Error>().is_some());

        let table = TomlConfigParser.parse("name = \"x\"").unwrap();
        assert_eq!(table["name"].as_str(), Some("x"));
    }

    #[test]
    fn plugin_serializes_brand_config_under_brand_key() {
        let mut plugin = Plugin {
            name: "movies".into(),
            ..Plugin::default()
        };
        let mut table = toml::Table::new();
        table.insert("color".into(), toml::Value::Boolean(true));
        plugin
            .brand_config
            .insert("gluegun".into(), toml::Value::Table(table));

        let json = serde_json::to_value(&plugin).unwrap();
        assert_eq!(json["name"], "movies");
        assert_eq!(json["gluegun"]["color"], true);
        assert!(json.get("description").is_none());
    }
}
