mod crawler;
mod dom;
mod extract;
mod logger;
mod media_info;
mod server;
mod service;
mod title;
mod video;

use std::{fs, net::SocketAddr, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crawler::Crawler;
use logger::{Logger, Logging};
use media_info::MediaInspector;
use server::AppState;
use service::VideoService;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 5)]
    log_level: u8,

    #[arg(short, long, default_value = "./config.json")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the video results of a web search as JSON
    Search { term: Option<String> },
    /// Print the sehatra.com films matching a term as JSON
    Films { term: Option<String> },
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
struct Config {
    host: String,
    port: u16,
    default_query: String,
    ytdlp_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_owned(),
            port: 5000,
            default_query: "film malagasy".to_owned(),
            ytdlp_path: "yt-dlp".to_owned(),
        }
    }
}

fn read_config<L: Logging>(path: &str, logger: &L) -> Config {
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Config>(&contents) {
            Ok(config) => {
                logger.debug(&format!("config parsed as {config:?} from '{path}'"));
                config
            }
            Err(error) => {
                logger.warn(&format!("malformed config '{path}' ({error}), using defaults"));
                Config::default()
            }
        },
        Err(_) => {
            logger.warn(&format!("config '{path}' not found, using defaults"));
            Config::default()
        }
    }
}

async fn run(args: Args, logger: Arc<Logger>) -> Result<()> {
    let config = read_config(&args.config, &logger);
    let crawler = Crawler::new(logger.clone()).context("failed to build http client")?;
    let service = VideoService::new(crawler, logger.clone());

    match args.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let addr: SocketAddr = format!("{}:{}", config.host, port)
                .parse()
                .with_context(|| format!("invalid listen address '{}:{port}'", config.host))?;
            let state = Arc::new(AppState {
                service,
                inspector: MediaInspector::new(&config.ytdlp_path),
                logger,
                default_query: config.default_query,
            });
            server::serve(state, addr).await
        }
        Command::Search { term } => {
            let term = term.unwrap_or(config.default_query);
            let videos = service.search(&term).await?;
            println!("{}", serde_json::to_string_pretty(&videos)?);
            Ok(())
        }
        Command::Films { term } => {
            let films = service.films(&term.unwrap_or_default()).await?;
            println!("{}", serde_json::to_string_pretty(&films)?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Args = Args::parse();
    let logger = Arc::new(Logger::new(args.log_level));
    logger.debug(&format!("args are: {:#?}", args));

    match run(args, logger.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            logger.fatal(&format!("{error:#}"));
            ExitCode::FAILURE
        }
    }
}
