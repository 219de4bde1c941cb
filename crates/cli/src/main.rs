mod command;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinebrowse_core::{
    create_view_system, load_config, validate_config, ImageUrls, MovieCatalog, SanitizedConfig,
    TmdbClient, TracingReporter, ViewEvent, ViewHandle,
};

use command::{Command, HELP};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Logs go to stderr so they don't interleave with the listing on stdout.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::var("CINEBROWSE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded: {:?}", SanitizedConfig::from(&config));

    let catalog: Arc<dyn MovieCatalog> =
        Arc::new(TmdbClient::new(&config.tmdb).context("Failed to create TMDB client")?);

    let (handle, controller) = create_view_system(
        catalog,
        ImageUrls::from(&config.tmdb),
        Arc::new(TracingReporter),
        &config.browser,
    );
    let controller_task = tokio::spawn(controller.run());
    let render_task = tokio::spawn(render::watch_states(handle.subscribe()));

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match command::parse(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => dispatch(&handle, command).await?,
            Ok(None) => {}
            Err(msg) => println!("{}", msg),
        }
    }

    handle.shutdown().await?;
    controller_task.await.context("View controller panicked")?;
    render_task.abort();
    info!("Bye");
    Ok(())
}

async fn dispatch(handle: &ViewHandle, command: Command) -> Result<()> {
    match command {
        Command::Type(text) => handle.set_query_text(text).await?,
        Command::Search(text) => {
            handle
                .send_batch(vec![
                    ViewEvent::QueryTextChanged(text),
                    ViewEvent::SearchSubmitted,
                ])
                .await?
        }
        Command::Submit => handle.submit_search().await?,
        Command::Page(page) => handle.change_page(page).await?,
        Command::Open(index) => {
            let state = handle.state();
            match index
                .checked_sub(1)
                .and_then(|i| state.listing.results.get(i))
            {
                Some(movie) => handle.select_movie(movie.clone()).await?,
                None => warn!(
                    "No movie #{} on this page ({} shown)",
                    index,
                    state.listing.results.len()
                ),
            }
        }
        Command::Close => handle.close_modal().await?,
        Command::Show => println!("{}", render::render(&handle.state())),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}
