//! hsgen CLI - generate typed TypeScript bindings for HubSpot portals

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use color_eyre::eyre::{Context, Result, bail};
use hsgen_lib::hubspot::DEFAULT_BASE_URL;
use hsgen_lib::{Emitter, GeneratorConfig, GeneratorOptions, PortalConfig};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hsgen", version)]
#[command(about = "Generate typed TypeScript bindings from HubSpot CRM schemas", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["token", "config"])))]
struct Cli {
    /// Private app token for a single portal (writes one combined file)
    #[arg(long, requires = "path", conflicts_with = "config")]
    token: Option<String>,

    /// Output file for single-portal mode
    #[arg(long, value_name = "FILE")]
    path: Option<PathBuf>,

    /// JSON config listing several portals (writes client, shared and per-portal files)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Snapshot name for the single portal
    #[arg(long, default_value = "portal")]
    name: String,

    /// Directory holding `<portal>_api.json` snapshots; existing ones are used instead of the API
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// Save a snapshot after fetching from the API (needs --cache-dir)
    #[arg(long)]
    write_cache: bool,

    /// Suffix appended to every generated interface name (e.g. "Props")
    #[arg(long, value_name = "SUFFIX")]
    interface_suffix: Option<String>,

    #[arg(long, hide = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::new()
            .base_url(self.base_url.as_str())
            .write_cache(self.write_cache);
        if let Some(dir) = &self.cache_dir {
            options = options.cache_dir(dir);
        }
        if let Some(suffix) = &self.interface_suffix {
            options = options.interface_suffix(suffix.as_str());
        }
        options
    }
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,hsgen_lib=info".to_string(),
            2 => "info,hsgen_lib=debug".to_string(),
            _ => "debug,hsgen_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    let options = cli.options();
    let emitter = Emitter::default();

    println!("Starting code generation");

    let written = match (&cli.config, &cli.token, &cli.path) {
        (Some(config_path), _, _) => {
            let config = GeneratorConfig::from_path(config_path)
                .wrap_err_with(|| format!("Failed to load config {}", config_path.display()))?;
            let options = config.options(options);
            tracing::info!(portals = config.schemas.len(), "Generating multi-portal client");

            hsgen_lib::generate_multi(&config, &options, &emitter)
                .await
                .wrap_err("Code generation failed")?
        }
        (None, Some(token), Some(path)) => {
            let portal = PortalConfig::new(cli.name.as_str(), token.as_str());
            tracing::info!(portal = %portal.name, "Generating single-portal client");

            let path = hsgen_lib::generate_single(&portal, path, &options, &emitter)
                .await
                .wrap_err("Code generation failed")?;
            vec![path]
        }
        _ => bail!("either --config or --token with --path is required"),
    };

    for path in &written {
        println!("Wrote {}", path.display());
    }
    println!("Code generation complete");

    Ok(())
}
