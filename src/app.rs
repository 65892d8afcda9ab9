use std::io;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::bootstrap;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::http::start_server;

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run() -> io::Result<()> {
    let config = ConfigService::load()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

    init_tracing(&config.logging.filter);

    let log = ActivityLog::new(config.logging.max_entries);
    let service = bootstrap::setup(&config, log.clone())
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    let config = Arc::new(config);

    actix_web::rt::System::new().block_on(async move {
        let server = start_server(service.clone(), log.clone(), config.clone())?;
        log.info(
            "Server",
            &format!(
                "Listening on http://{}:{}/api",
                config.server.host, config.server.port
            ),
        );

        let warm_log = log.clone();
        actix_web::rt::spawn(async move {
            if let Err(err) = service.refresh().await {
                warm_log.warn("Server", &format!("Initial data load failed: {}", err));
            }
        });

        server.await
    })
}
