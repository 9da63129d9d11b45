use std::collections::HashSet;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::detect::{filter, AlertStateMachine, Classifier, FrameSource};
use crate::device::DeviceSession;
use crate::notify::{Notifier, SmsSender, SoundPlayer};

/// The frame loop driver: pulls frames at a fixed cadence and runs one full
/// pass per tick (classify → filter → state transition → fan-out).
///
/// Single in-flight pass by construction: the next tick is not taken until
/// the previous pass, including any fan-out it triggered, has finished.
/// Device signals therefore hit the serial link in frame order.
pub struct Pipeline<F, C, S, P> {
    source: F,
    classifier: C,
    allow_list: HashSet<String>,
    confidence_threshold: f32,
    frame_interval: Duration,
    state: AlertStateMachine,
    notifier: Notifier<S, P>,
    device: DeviceSession,
}

impl<F, C, S, P> Pipeline<F, C, S, P>
where
    F: FrameSource,
    C: Classifier,
    S: SmsSender,
    P: SoundPlayer,
{
    pub fn new(
        source: F,
        classifier: C,
        allow_list: HashSet<String>,
        confidence_threshold: f32,
        frame_interval: Duration,
        notifier: Notifier<S, P>,
        device: DeviceSession,
    ) -> Pipeline<F, C, S, P> {
        Pipeline {
            source,
            classifier,
            allow_list,
            confidence_threshold,
            frame_interval,
            state: AlertStateMachine::new(),
            notifier,
            device,
        }
    }

    /// Runs until the frame source is exhausted. All channel and device
    /// failures are absorbed below this loop; nothing here aborts frame
    /// processing.
    pub async fn run(&mut self) {
        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let frame = match self.source.next_frame() {
                Some(frame) => frame,
                None => {
                    info!("Frame source ended");
                    return;
                }
            };
            let detections = self.classifier.classify(&frame);
            let result = filter(
                &detections,
                &self.allow_list,
                self.confidence_threshold,
            );
            debug!(present = result.present, species = ?result.species, "Frame filtered");
            if let Some(event) = self.state.on_frame(&result) {
                let status = self.notifier.notify(&event, &mut self.device).await;
                debug!(?status, "Alert fan-out complete");
            }
        }
    }

    /// Releases the device link. Best effort; in-flight deliveries are not
    /// awaited beyond the current pass.
    pub async fn shutdown(&mut self) {
        self.device.close().await;
    }
}
