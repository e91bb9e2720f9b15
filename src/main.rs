use std::error::Error;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use swarm_choreo::adapters::inbound::FilesystemAnalysisSource;
use swarm_choreo::adapters::outbound::{init_buffered_logger, init_combined_logger, AlwaysReady, LogActuator};
use swarm_choreo::application::{ActuatorSet, ChoreographyService};
use swarm_choreo::domains::fleet::Actuator;
use swarm_choreo::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // fast_log owns the `log` facade, so tracing is installed without the log bridge.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(&config_path)?;
    info!("Configuration loaded from {} (missing file means defaults)", config_path);
    info!("Fleet: {} agents, tick {}s", config.fleet.agents.len(), config.dispatch.tick_width_secs);

    let logger = init_buffered_logger(
        init_combined_logger(config.logging.file.as_deref()),
        config.logging.buffer_capacity,
    );

    let source = FilesystemAnalysisSource::new(None);
    let mut service = ChoreographyService::new(config.clone(), logger);
    service.load_primitive_files(&source)?;

    let analysis = service.load_analysis(&source)?;
    let schedule = match service.build_schedule(&analysis) {
        Ok(s) => s,
        Err(e) => {
            error!("Schedule rejected, nothing dispatched: {}", e);
            return Err(e.into());
        }
    };

    service.prepare(&AlwaysReady).await?;

    let actuators: ActuatorSet = config
        .fleet
        .agents
        .iter()
        .map(|a| (a.id, Arc::new(LogActuator::new(a)) as Arc<dyn Actuator>))
        .collect();

    info!("Starting choreography");
    let run = service.start(schedule, actuators)?;
    let abort = run.abort_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, sending every agent home");
            abort.abort();
        }
    });

    let report = run.wait().await?;
    info!("{}", report.summary());
    Ok(())
}
