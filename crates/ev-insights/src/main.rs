mod bootstrap;
mod report;

use anyhow::Result;
use insights_core::settings::Settings;
use insights_data::engine::RegistryEngine;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("EV Insights v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Format: {}, Top: {}",
        settings.view,
        settings.format,
        settings.top
    );

    let data_path = bootstrap::resolve_data_path(settings.data_path.as_deref())?;
    tracing::info!("Loading dataset from {}", data_path.display());

    let mut engine = RegistryEngine::new();
    let loaded = engine.load_from_path(&data_path)?;

    if let Some(meta) = engine.last_load() {
        tracing::info!(
            "Loaded {} records in {:.2}s ({} rows skipped)",
            loaded,
            meta.load_time_seconds,
            meta.rows_skipped
        );
    }

    let output = report::render(
        &engine,
        &settings.view,
        usize::from(settings.top),
        &settings.format,
    )?;
    print!("{output}");

    Ok(())
}
