//! Options controlling how a plugin directory is loaded.

use serde::Deserialize;

/// Brand used when none is configured.
pub const DEFAULT_BRAND: &str = "gluegun";

/// Default pattern list for command and extension files.
const DEFAULT_FILE_PATTERN: &[&str] = &["*.{js,ts}", "!*.test.{js,ts}"];

fn default_brand() -> String {
    DEFAULT_BRAND.into()
}

fn default_file_pattern() -> Vec<String> {
    DEFAULT_FILE_PATTERN.iter().map(|p| (*p).to_string()).collect()
}

/// Options for [`PluginLoader::load`](super::PluginLoader::load).
///
/// Can be embedded in a host's TOML config:
///
/// ```toml
/// [plugin_loader]
/// brand = "movie"
/// hidden = true
/// command_file_pattern = ["*.js", "!*.spec.js"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Names the config file (`<brand>.toml`) and the config sub-table kept
    /// in [`Plugin::brand_config`](super::Plugin::brand_config).
    pub brand: String,
    /// Patterns for files under `commands/` (scanned recursively).
    pub command_file_pattern: Vec<String>,
    /// Patterns for files under `extensions/` (top level only).
    pub extension_file_pattern: Vec<String>,
    /// Forces every loaded command to be hidden.
    pub hidden: bool,
    /// Fixed plugin name; wins over the directory name and the config file.
    pub name: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            command_file_pattern: default_file_pattern(),
            extension_file_pattern: default_file_pattern(),
            hidden: false,
            name: None,
        }
    }
}

impl LoadOptions {
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_command_file_pattern<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command_file_pattern = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extension_file_pattern<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extension_file_pattern = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The configured name, if it is not blank.
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !is_blank(name))
    }

    /// File name of the config file for this brand.
    pub fn config_file_name(&self) -> String {
        format!("{}.toml", self.brand)
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_gluegun() {
        let options = LoadOptions::default();
        assert_eq!(options.brand, "gluegun");
        assert_eq!(options.command_file_pattern, vec!["*.{js,ts}", "!*.test.{js,ts}"]);
        assert_eq!(options.extension_file_pattern, options.command_file_pattern);
        assert!(!options.hidden);
        assert!(options.name.is_none());
        assert_eq!(options.config_file_name(), "gluegun.toml");
    }

    #[test]
    fn blank_name_is_not_explicit() {
        assert_eq!(LoadOptions::default().with_name("   ").explicit_name(), None);
        assert_eq!(LoadOptions::default().with_name("x").explicit_name(), Some("x"));
    }

    #[test]
    fn deserializes_partial_toml() {
        let options: LoadOptions = toml::from_str(
            r#"
brand = "movie"
hidden = true
"#,
        )
        .unwrap();
        assert_eq!(options.brand, "movie");
        assert!(options.hidden);
        assert_eq!(options.command_file_pattern, default_file_pattern());
        assert_eq!(options.config_file_name(), "movie.toml");
    }
}
