use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use worldbuilder::{
    scenario::{Scenario, ScenarioLoader},
    snapshot::{self, MapSnapshot},
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Procedural tile map builder")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, global = true, default_value = "scenarios/river_valley.yaml")]
    scenario: PathBuf,

    /// Override the scenario seed
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the scenario once and print it
    Render {
        #[arg(long, value_enum, default_value_t = Format::Ascii)]
        format: Format,
    },
    /// Keep re-rendering in the background and serve the latest map over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Ascii,
    Json,
}

fn init_logging(scenario: &Scenario) -> Result<()> {
    let directive = format!("worldbuilder={}", scenario.logging.level).parse()?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    init_logging(&scenario)?;
    info!(scenario = %scenario.name, "loaded scenario");

    match cli.command {
        Command::Render { format } => render_once(&scenario, cli.seed, format),
        Command::Serve { host, port } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(web::run(WebServerConfig {
                scenario,
                seed: cli.seed,
                host,
                port,
            }))
        }
    }
}

fn render_once(scenario: &Scenario, seed: Option<u64>, format: Format) -> Result<()> {
    let seed = scenario.seed(seed);
    let instance = scenario.build_map().render(&scenario.render, seed)?;
    let snapshot = MapSnapshot::capture(&scenario.name, seed, &instance);
    match format {
        Format::Ascii => {
            print!("{}", snapshot.to_ascii());
            println!();
            println!("{}", snapshot::legend());
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }
    Ok(())
}
