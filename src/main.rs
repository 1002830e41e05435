mod color;
mod config;
mod data;
mod error;
mod render;

use config::PlotConfig;
use data::group::group_by_n;
use data::loader::load_file;
use error::PlotError;

/// Load → group → render, once. Returns the number of series drawn.
fn run(config: &PlotConfig) -> Result<usize, PlotError> {
    let dataset = load_file(&config.input)?;
    if dataset.is_empty() {
        log::warn!(
            "{} has no data rows; the chart will be empty",
            config.input.display()
        );
    }

    let groups = group_by_n(&dataset);
    log::info!("Grouped into {} series by n", groups.len());

    render::render(&groups, config)?;
    Ok(groups.len())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PlotConfig::default();
    run(&config)?;
    Ok(())
}
