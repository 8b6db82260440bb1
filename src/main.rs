mod app;
mod color;
mod config;
mod data;
mod error;
mod plot;
mod report;

use anyhow::Result;

use app::ReportGenerator;
use config::ReportConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    plot::register_fonts()?;

    if let Err(err) = ReportGenerator::new(ReportConfig::default()).run() {
        log::error!("report failed: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
