use anyhow::Result;
use loadwatch::{
    api::HttpApi, config::Config, logger::Logger, service::DashboardService, session::Session, ui,
    ui::core::AppContext,
};
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().skip(1).any(|arg| arg == "--generate-config") {
        let path = Config::get_default_config_path()?;
        Config::generate_default_config(&path)?;
        return Ok(());
    }

    let config = Config::load()?;
    if let Some(path) = Logger::init_file_logging(config.logging.enabled)? {
        info!("Logging to {}", path.display());
    }

    let session = match Session::default_path().filter(|_| config.session.persist) {
        Some(path) => Session::persistent(path),
        None => Session::in_memory(),
    };

    let api = HttpApi::new(config.api.base_url.clone(), config.api.timeout(), session.clone())?;
    let service = DashboardService::new(Arc::new(api), Logger::new(), config.api.fetch_page_size);
    info!("Using monitoring API at {}", config.api.base_url);

    // Run the TUI application
    ui::run_app(AppContext::new(service, session, config)).await?;

    Ok(())
}
