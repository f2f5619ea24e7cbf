use candle_core::Device;
use tracing::info;

/// Metal when compiled with the `metal` feature and available, else CPU.
/// `APP_DEVICE=cpu` forces the CPU path.
pub fn select_device() -> Device {
    let forced_cpu = std::env::var("APP_DEVICE").is_ok_and(|v| v.eq_ignore_ascii_case("cpu"));
    #[cfg(feature = "metal")]
    {
        if !forced_cpu {
            match Device::new_metal(0) {
                Ok(dev) => {
                    info!("embedding device: metal");
                    return dev;
                }
                Err(e) => tracing::warn!(error = %e, "metal unavailable, falling back to cpu"),
            }
        }
    }
    info!(forced = forced_cpu, "embedding device: cpu");
    Device::Cpu
}
