use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;
use tracing::{info, trace, warn};

#[macro_use]
extern crate quick_error;

mod config;
mod detect;
mod device;
mod notify;
mod pipeline;

#[derive(Debug, StructOpt)]
#[structopt(name = "wildwatch", about = "Wildlife detection-to-alert controller.")]
struct CliArgs {
    #[structopt(
        parse(from_os_str),
        short = "c",
        long = "config",
        default_value = "config.toml",
        help = "Path to configuration file. See sample_config.toml for format.",
        env = "WILDWATCH_CONFIG"
    )]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = CliArgs::from_args();
    let cfg = config::load_config(args.config).unwrap();

    let filter = tracing_subscriber::EnvFilter::new(&cfg.system.log_level);
    let stdout_subscriber = tracing_subscriber::fmt()
        // Filter from user
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(stdout_subscriber).unwrap();

    info!("WildWatch alert controller running");
    trace!("Config: {:?}", cfg);

    // Open the buzzer link up front; a missing device degrades the hardware
    // channel rather than stopping the controller.
    let device = match &cfg.serial {
        Some(serial) => {
            match device::DeviceSession::connect(&serial.port, serial.baud_rate).await {
                Ok(session) => session,
                Err(e) => {
                    warn!("Device unavailable, hardware channel disabled: {}", e);
                    device::DeviceSession::disconnected()
                }
            }
        }
        None => {
            info!("No serial port configured, hardware channel disabled");
            device::DeviceSession::disconnected()
        }
    };

    let sms = notify::TwilioClient::new(cfg.sms.account_sid.clone(), cfg.sms.auth_token.clone())
        .unwrap();
    let sound = notify::RodioPlayer::new(cfg.audio.alert_sound_path.clone());
    let notifier = notify::Notifier::new(sms, sound, cfg.sms.from.clone(), cfg.sms.to.clone());

    // Stub source and classifier until a camera + model adapter is wired in.
    let mut pipeline = pipeline::Pipeline::new(
        detect::StubFrameSource::new(640, 480),
        detect::StubClassifier,
        cfg.detection.allow_list.clone(),
        cfg.detection.confidence_threshold,
        Duration::from_millis(cfg.system.frame_interval_ms),
        notifier,
        device,
    );

    tokio::select! {
        _ = pipeline.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
        }
    }
    pipeline.shutdown().await;
}
