mod audio;
mod sms;

pub use audio::{AudioError, RodioPlayer, SoundPlayer};
pub use sms::{SmsError, SmsSender, TwilioClient};

use tracing::{info, warn};

use crate::detect::AlertEvent;
use crate::device::DeviceSession;

/// Per-channel outcome of one fan-out. Exposed for observability and tests;
/// the frame loop only logs it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FanoutStatus {
    pub audio_ok: bool,
    pub sms_ok: bool,
    pub device_ok: bool,
}

fn alert_body(species: &str) -> String {
    format!("🚨 Alert! Wild animal detected: {}. Stay Safe!", species)
}

/// Dispatches one alert event to the audio, SMS, and device channels.
///
/// Channels are constructed and injected up front (no process-wide clients)
/// and invoked independently: each result is captured on its own, so a
/// failing channel never keeps another from running. Failures are logged
/// and absorbed here; nothing propagates back into frame processing.
pub struct Notifier<S, P> {
    sms: S,
    sound: P,
    sms_from: String,
    sms_to: String,
}

impl<S: SmsSender, P: SoundPlayer> Notifier<S, P> {
    pub fn new(sms: S, sound: P, sms_from: String, sms_to: String) -> Notifier<S, P> {
        Notifier {
            sms,
            sound,
            sms_from,
            sms_to,
        }
    }

    pub async fn notify(&self, event: &AlertEvent, device: &mut DeviceSession) -> FanoutStatus {
        info!(species = %event.species, timestamp = %event.timestamp, "Dispatching alert");

        let audio_ok = match self.sound.play() {
            Ok(()) => true,
            Err(e) => {
                warn!("Audio alert failed: {}", e);
                false
            }
        };

        // At most one delivery attempt per event; provider errors are not retried.
        let sms_ok = match self
            .sms
            .send(&alert_body(&event.species), &self.sms_from, &self.sms_to)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("SMS alert failed: {}", e);
                false
            }
        };

        let device_ok = match device.send_signal(true).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Device alert failed: {}", e);
                false
            }
        };

        FanoutStatus {
            audio_ok,
            sms_ok,
            device_ok,
        }
    }
}
