use crate::{config::Config, logger::Logger, service::DashboardService, session::Session};

/// Services and settings shared by the UI components
#[derive(Clone)]
pub struct AppContext {
    pub service: DashboardService,
    pub session: Session,
    pub config: Config,
    pub logger: Logger,
}

impl AppContext {
    pub fn new(service: DashboardService, session: Session, config: Config) -> Self {
        let logger = service.logger().clone();
        Self {
            service,
            session,
            config,
            logger,
        }
    }
}
