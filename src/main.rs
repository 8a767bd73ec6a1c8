use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncReadExt;

use dom_simplifier::{DomSimplifier, PageFetcher, SimplifierConfig};

mod api;

use api::AppState;

#[derive(Parser)]
#[command(name = "dom-simplifier", version, about = "Simplify HTML pages for automation agents")]
struct Cli {
    /// TOML file overriding the classification tables
    #[arg(long, global = true, env = "DOM_SIMPLIFIER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the simplified markup and/or JSON structure of a page
    Simplify {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Markup)]
        format: OutputFormat,
    },
    /// List interactive elements with their selectors
    Selectors {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: String,

        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Read HTML from a file (stdin when neither --file nor --url is given)
    #[arg(long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Fetch HTML over HTTP(S)
    #[arg(long)]
    url: Option<String>,

    /// Request timeout in seconds for --url
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markup,
    Json,
    Both,
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let config = SimplifierConfig::load_or_default(cli.config.as_ref())?;
    let simplifier = DomSimplifier::with_config(config);

    match cli.command {
        Command::Simplify { input, format } => {
            let html = read_input(&input).await?;
            let result = simplifier.simplify_html(&html);
            match format {
                OutputFormat::Markup => print!("{}", result.markup),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result.structure)?),
                OutputFormat::Both => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
        Command::Selectors { input } => {
            let html = read_input(&input).await?;
            let result = simplifier.simplify_html(&html);
            for item in simplifier.interactive_elements(&result.structure) {
                println!("{}", item.to_line());
            }
        }
        Command::Serve { host, port } => serve(simplifier, host, port).await?,
    }

    Ok(())
}

async fn read_input(input: &InputArgs) -> Result<String> {
    if let Some(path) = &input.file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    if let Some(url) = &input.url {
        let fetcher = PageFetcher::new(Duration::from_secs(input.timeout))?;
        return fetcher.fetch(url).await;
    }

    let mut html = String::new();
    tokio::io::stdin()
        .read_to_string(&mut html)
        .await
        .context("Failed to read HTML from stdin")?;
    Ok(html)
}

async fn serve(simplifier: DomSimplifier, host: String, port: u16) -> Result<()> {
    let state = web::Data::new(AppState {
        simplifier,
        fetch_timeout: Duration::from_secs(30),
    });

    log::info!("Starting DOM simplifier API");
    log::info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(16 * 1024 * 1024))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(cors)
            .configure(api::configure)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {}:{}", host, port))?
    .run()
    .await
    .context("HTTP server failed")
}
