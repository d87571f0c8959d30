use anyhow::Result;
use rusttheremin::audio::{AudioHandle, CpalBackend};
use rusttheremin::config::ThereminConfig;
use rusttheremin::engine::Theremin;
use rusttheremin::synth::SharedParams;
use rusttheremin::{api, mapping, tracking};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "theremin_config.json";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ThereminConfig::load(&config_path)?;
    config.validate()?;

    let params = Arc::new(SharedParams::new(
        mapping::DEFAULT_FREQUENCY,
        0.0,
        config.wave_type,
    ));

    let audio = AudioHandle::spawn({
        let params = Arc::clone(&params);
        let config = config.clone();
        move || Box::new(CpalBackend::new(params, &config))
    });

    let (frame_width, frame_height) = (config.frame_width, config.frame_height);
    let theremin = Arc::new(Theremin::new(
        config.clone(),
        params,
        audio,
        Box::new(move || tracking::default_tracker(frame_width, frame_height)),
    )?);

    #[cfg(feature = "leap")]
    info!("tracking: Ultraleap hardware");
    #[cfg(not(feature = "leap"))]
    info!("tracking: simulated motion (build with --features leap for hardware)");

    let serving = api::serve(Arc::clone(&theremin), &config.listen_addr);
    tokio::select! {
        result = serving => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
            theremin.stop()?;
        }
    }

    Ok(())
}
