// Engine main entry point: replays a price stream from stdin into the live
// buffer and prints the assembled chart data for one item.
use anyhow::Context;
use engine::config::EngineSettings;
use engine::data::historical_loader::HistoricalLoader;
use engine::error::EngineError;
use engine::services::ChartService;
use shared::models::ItemId;
use shared::TimePeriod;
use tokio::io::BufReader;
use tracing::{error, info};

const USAGE: &str = "usage: engine <item-id> [period] [historical-file]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the chart JSON.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    if let Err(err) = run().await {
        let is_configuration = err
            .downcast_ref::<EngineError>()
            .is_some_and(EngineError::is_configuration);
        if is_configuration {
            error!("{}", USAGE);
        }
        return Err(err);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let item_id: ItemId = args
        .next()
        .context(USAGE)?
        .parse()
        .context("item id must be a non-negative integer")?;

    let settings = EngineSettings::from_env().context("failed to load engine settings")?;
    let period = match args.next() {
        Some(id) => id.parse::<TimePeriod>().map_err(EngineError::from)?,
        None => settings.default_period,
    };
    let historical = match args.next() {
        Some(path) => HistoricalLoader::load(&path)
            .with_context(|| format!("failed to load historical series from '{}'", path))?,
        None => Vec::new(),
    };
    info!(item_id, %period, historical_points = historical.len(), "Starting GE tracker engine");

    let service = ChartService::from_settings(&settings);
    let stdin = BufReader::new(tokio::io::stdin());
    let ingested = service
        .ingest_lines(stdin, settings.ingest_channel_capacity)
        .await?;
    info!(ingested, "Stream input exhausted");

    let data = service.chart_data(item_id, period, &historical).await;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
