use anyhow::Result;
use reqwest::Client;
use sheetcards::{fetch, process, render};
use std::{env, fs, path::PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) configure source + output ────────────────────────────────
    let source = fetch::SheetSource {
        sheet_id: env::var("SHEET_ID").unwrap_or_else(|_| fetch::DEFAULT_SHEET_ID.to_string()),
        tab_name: env::var("TAB_NAME").unwrap_or_else(|_| fetch::DEFAULT_TAB_NAME.to_string()),
    };
    let out_path = PathBuf::from(env::var("OUT_PATH").unwrap_or_else(|_| "packages.html".into()));
    let client = Client::new();

    // ─── 3) fetch → map → render, or fall back ───────────────────────
    let html = match build_page(&client, &source).await {
        Ok(html) => html,
        Err(err) => {
            // Every failure kind gets the same apology page.
            error!("{err:#}");
            render::fallback_page()
        }
    };

    // ─── 4) replace the page wholesale ───────────────────────────────
    fs::write(&out_path, html)?;
    info!(path = %out_path.display(), "wrote page");
    Ok(())
}

async fn build_page(client: &Client, source: &fetch::SheetSource) -> Result<String> {
    let rows = fetch::load_rows(client, source).await?;
    let packages = process::to_packages(&rows);
    info!(packages = packages.len(), "mapped sheet rows");
    Ok(render::page(&render::render_cards(&packages)))
}
