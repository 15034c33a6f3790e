use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};
use log::{error, info};
use playbridge::config::Config;
use playbridge::dispatch::spawn_player_task;
use playbridge::error::App;
use playbridge::player::build_player_state;
use playbridge::server::Server;
use tokio::fs;
use tokio::signal;
use tokio::sync::watch;
use tokio::task;

const JOB_QUEUE_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> Result<(), App> {
    let config_dir = Config::dir()?;
    let log_dir = config_dir.join("logs");
    fs::create_dir_all(&log_dir).await?;

    // Create an empty config on first run
    let config_path = config_dir.join("config.toml");
    if !config_path.exists() {
        fs::write(&config_path, "").await?;
    }
    let config = Config::load_from_file(&config_path).await?;

    let _logger = Logger::try_with_str(&config.log_level)?
        .log_to_file(FileSpec::default().directory(&log_dir))
        .rotate(
            Criterion::Size(1_000_000),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(3),
        )
        .duplicate_to_stderr(if config.log_to_stderr {
            Duplicate::All
        } else {
            Duplicate::None
        })
        .start()?;

    let state = build_player_state(&config).await;
    let jobs = spawn_player_task(state, JOB_QUEUE_CAPACITY);
    let server = Server::bind(&config.address(), jobs).await?;

    let (stop_sender, stop_receiver) = watch::channel(());
    task::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                let _ = stop_sender.send(());
            }
            Err(e) => {
                error!("Failed to listen for Ctrl-C: {}", e);
                stop_sender.closed().await;
            }
        }
    });

    task::spawn(server.run(stop_receiver)).await??;
    info!("playbridge stopped");
    Ok(())
}
