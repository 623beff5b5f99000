use std::path::PathBuf;

use clap::Parser;
use gluegun::plugins::{load_from_directory, LoadOptions, DEFAULT_BRAND};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "gluegun-inspect",
    version,
    about = "Load a plugin directory and print it as JSON"
)]
struct Cli {
    /// Plugin directory to load.
    directory: PathBuf,

    /// Brand naming the config file (`<brand>.toml`) and its sub-table.
    #[arg(long, default_value = DEFAULT_BRAND)]
    brand: String,

    /// Fixed plugin name, overriding the directory and config names.
    #[arg(long)]
    name: Option<String>,

    /// Mark the plugin and all of its commands hidden.
    #[arg(long, default_value_t = false)]
    hidden: bool,

    /// Command file pattern; repeat for several. `!` excludes.
    #[arg(long = "command-pattern", value_name = "GLOB")]
    command_patterns: Vec<String>,

    /// Extension file pattern; repeat for several. `!` excludes.
    #[arg(long = "extension-pattern", value_name = "GLOB")]
    extension_patterns: Vec<String>,

    /// Pretty-print the JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        let mut options = LoadOptions::default()
            .with_brand(self.brand.clone())
            .with_hidden(self.hidden);
        if let Some(name) = &self.name {
            options = options.with_name(name.clone());
        }
        if !self.command_patterns.is_empty() {
            options = options.with_command_file_pattern(self.command_patterns.clone());
        }
        if !self.extension_patterns.is_empty() {
            options = options.with_extension_file_pattern(self.extension_patterns.clone());
        }
        options
    }
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_telemetry(&cli);

    let plugin = load_from_directory(&cli.directory, &cli.load_options())?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&plugin)?
    } else {
        serde_json::to_string(&plugin)?
    };
    println!("{json}");
    Ok(())
}
