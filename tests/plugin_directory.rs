use std::fs;
use std::path::Path;

use gluegun::plugins::{
    load_from_directory, Command, CommandLoader, LoadOptions, PluginLoadError, PluginLoader,
    PluginRegistry, DEFAULT_PLUGIN_MATCH,
};
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn movie_plugin(root: &Path) -> std::path::PathBuf {
    let dir = root.join("movie-plugin");
    write(&dir.join("commands/search.js"), "");
    write(&dir.join("commands/search.test.js"), "");
    write(&dir.join("commands/admin/reindex.ts"), "");
    write(&dir.join("extensions/imdb.js"), "");
    write(&dir.join("extensions/helpers/format.js"), "");
    write(
        &dir.join("gluegun.toml"),
        r#"
name = "movies"
description = "Find movies"

[defaults]
limit = 10

[gluegun]
aliases = ["m"]
"#,
    );
    dir
}

#[test]
fn loads_a_complete_plugin_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = movie_plugin(tmp.path());

    let plugin = load_from_directory(&dir, &LoadOptions::default()).unwrap();

    assert_eq!(plugin.name, "movies");
    assert_eq!(plugin.directory, dir);
    assert_eq!(plugin.description.as_deref(), Some("Find movies"));
    assert_eq!(plugin.defaults["limit"].as_integer(), Some(10));

    let commands: Vec<_> = plugin.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(commands, vec!["reindex", "search"]);
    let extensions: Vec<_> = plugin.extensions.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(extensions, vec!["imdb"]);

    let json = serde_json::to_value(&plugin).unwrap();
    assert_eq!(json["gluegun"]["aliases"][0], "m");
    assert_eq!(json["commands"][0]["command_path"][0], "admin");
}

#[test]
fn local_errors_are_distinguishable() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    write(&file, "");

    let err = load_from_directory("   ", &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PluginLoadError>(),
        Some(PluginLoadError::InvalidInput { .. })
    ));

    let err = load_from_directory(&file, &LoadOptions::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PluginLoadError>(),
        Some(PluginLoadError::NotADirectory { .. })
    ));
}

#[test]
fn custom_command_loader_sees_joined_paths() {
    struct Recording;
    impl CommandLoader for Recording {
        fn load_command(&self, file_path: &Path) -> anyhow::Result<Command> {
            Ok(Command {
                name: file_path.to_string_lossy().into_owned(),
                file_path: file_path.to_path_buf(),
                command_path: Vec::new(),
                hidden: false,
                description: None,
            })
        }
    }

    let tmp = TempDir::new().unwrap();
    let dir = movie_plugin(tmp.path());
    let plugin = PluginLoader::new()
        .with_command_loader(Recording)
        .load(&dir, &LoadOptions::default().with_hidden(true))
        .unwrap();

    let commands = dir.join("commands");
    assert_eq!(plugin.commands[0].file_path, commands.join("admin").join("reindex.ts"));
    assert_eq!(plugin.commands[1].file_path, commands.join("search.js"));
    assert!(plugin.commands.iter().all(|c| c.hidden));
}

#[test]
fn registry_collects_a_plugins_folder() {
    let tmp = TempDir::new().unwrap();
    movie_plugin(tmp.path());
    write(&tmp.path().join("empty-plugin/.keep"), "");

    let registry = PluginRegistry::default();
    registry
        .add_plugins(tmp.path(), DEFAULT_PLUGIN_MATCH, &LoadOptions::default())
        .unwrap();

    assert_eq!(registry.plugin_names(), vec!["empty-plugin", "movies"]);
    assert!(registry.find_command("movies", "reindex").is_some());
    assert!(registry.get("empty-plugin").unwrap().commands.is_empty());
}
