use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgMatches, Command};
use framedeck_model::{Demo, DemoSeed};
use framedeck_server::{bootstrap, telemetry, LogFormat, RunningServer, ServerConfig};
use std::path::PathBuf;

fn database_arg() -> Arg {
    Arg::new("database")
        .long("database")
        .value_parser(value_parser!(PathBuf))
        .help("SQLite database file (overrides config and FRAMEDECK_DATABASE)")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("TOML configuration file")
}

fn cli() -> Command {
    Command::new("framedeck")
        .version(framedeck_server::VERSION)
        .about("Serve and edit demos made of ordered HTML frames")
        .subcommand_required(true)
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("pretty")
                .value_parser(value_parser!(LogFormat))
                .help("Log output: pretty or json"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(config_arg())
                .arg(database_arg())
                .arg(Arg::new("host").long("host").help("Bind host"))
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Bind port"),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Load demos from a JSON file")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of { name, frames: [{ order, html }] }"),
                )
                .arg(config_arg())
                .arg(database_arg()),
        )
        .subcommand(
            Command::new("list")
                .about("Print stored demos with their frames in presentation order")
                .arg(config_arg())
                .arg(database_arg()),
        )
}

/// Defaults, then config file, then environment, then flags.
fn load_config(args: &ArgMatches) -> Result<ServerConfig> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let mut config = config.apply_env().context("reading FRAMEDECK_* environment")?;

    if let Some(database) = args.get_one::<PathBuf>("database") {
        config = config.with_database(database.clone());
    }
    if let Ok(Some(host)) = args.try_get_one::<String>("host") {
        config = config.with_host(host.clone());
    }
    if let Ok(Some(port)) = args.try_get_one::<u16>("port") {
        config = config.with_port(*port);
    }
    Ok(config)
}

async fn serve(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let addr = config.socket_addr()?;
    let store = bootstrap(&config)
        .await
        .context("failed to start the application")?;

    let server = RunningServer::start(addr, store).context("binding HTTP listener")?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "cannot listen for shutdown signal");
            }
        })
        .await;
    Ok(())
}

async fn seed(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let file = args
        .get_one::<PathBuf>("file")
        .context("--file is required")?;
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let seeds: Vec<DemoSeed> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;

    let store = bootstrap(&config).await?;
    for seed in seeds {
        let name = seed.name.clone();
        let demo = store
            .create_demo(seed)
            .await
            .with_context(|| format!("seeding demo {name:?}"))?;
        println!("{}  {} ({} frames)", demo.id, demo.name, demo.frames.len());
    }
    Ok(())
}

async fn list(args: &ArgMatches) -> Result<()> {
    let config = load_config(args)?;
    let store = bootstrap(&config).await?;

    for demo in store.list_demos_with_frames().await? {
        let demo: Demo = demo.sorted();
        println!("{}  {}", demo.id, demo.name);
        for frame in &demo.frames {
            println!("    {}  {:<10} {} bytes", frame.id, frame.label(), frame.html.len());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    let format = matches
        .get_one::<LogFormat>("log-format")
        .copied()
        .unwrap_or_default();
    telemetry::init(format);

    let result = match matches.subcommand() {
        Some(("serve", args)) => serve(args).await,
        Some(("seed", args)) => seed(args).await,
        Some(("list", args)) => list(args).await,
        _ => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}
