#![allow(dead_code)]

mod avatar;
mod config;
mod filter;
mod github;
mod http;
mod options;
mod poller;
mod render;

use clap::Parser as _;
use color_eyre::eyre::{self, WrapErr as _};

use crate::{
    config::Config, filter::TextFilter, http::GitHubClient, options::Options, poller::Poller,
    render::Renderer,
};

fn init_tracing(level: &str) -> eyre::Result<()> {
    let level: tracing::Level = level
        .parse()
        .wrap_err_with(|| format!("Invalid log level `{}`", level))?;
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(level)
            .finish(),
    )?;
    Ok(())
}

#[actix_rt::main]
async fn main() -> eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install()?;

    let options = Options::parse();
    let config = Config::from_env().wrap_err("Failed to read GHFEED_* environment")?;
    init_tracing(&config.log_level)?;

    let user = options
        .user
        .clone()
        .or_else(|| config.user.clone())
        .filter(|user| !user.is_empty())
        .ok_or_else(|| eyre::eyre!("No user given: pass one as an argument or set GHFEED_USER"))?;
    let filter = TextFilter::new(options.include.as_deref(), options.exclude.as_deref())
        .wrap_err("Invalid include/exclude pattern")?;

    let client = GitHubClient::new(config.api_url.clone(), config.token.clone(), config.timeout());
    let poller = Poller::new(
        client.clone(),
        Renderer::new(client, options.avatar_size()),
        filter,
    );

    tracing::info!(
        user = user.as_str(),
        pages = options.pages,
        "Fetching received events"
    );
    let summary = poller
        .run(&user, options.pages, &mut std::io::stdout())
        .await?;
    tracing::info!(
        printed = summary.printed,
        filtered = summary.filtered,
        skipped = summary.skipped,
        failed_pages = summary.failed_pages,
        "Done"
    );

    if summary.all_failed(options.pages) {
        eyre::bail!("Failed to fetch any of {} page(s) for {}", options.pages, user);
    }
    Ok(())
}
