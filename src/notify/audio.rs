use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::mpsc;

use rodio::Source;
use tracing::{debug, warn};

/// Fire-and-forget alert sound boundary.
pub trait SoundPlayer {
    fn play(&self) -> Result<(), AudioError>;
}

/// Plays the configured alert clip through the default output device.
///
/// The rodio output stream lives on a dedicated worker thread (it is tied to
/// the audio backend and is not `Send`); `play` posts a request and returns
/// immediately. Decode and playback failures are logged on the worker, never
/// surfaced to the alert flow.
pub struct RodioPlayer {
    requests: mpsc::Sender<()>,
}

impl RodioPlayer {
    pub fn new(clip: PathBuf) -> RodioPlayer {
        let (requests, queue) = mpsc::channel::<()>();
        std::thread::spawn(move || playback_worker(clip, queue));
        RodioPlayer { requests }
    }
}

impl SoundPlayer for RodioPlayer {
    fn play(&self) -> Result<(), AudioError> {
        self.requests.send(()).map_err(|_| AudioError::WorkerGone)
    }
}

fn playback_worker(clip: PathBuf, queue: mpsc::Receiver<()>) {
    let (_stream, handle) = match rodio::OutputStream::try_default() {
        Ok(out) => out,
        Err(e) => {
            warn!("No audio output device, alert sound disabled: {}", e);
            return;
        }
    };
    while queue.recv().is_ok() {
        let decoded = File::open(&clip)
            .map_err(|e| e.to_string())
            .and_then(|f| rodio::Decoder::new(BufReader::new(f)).map_err(|e| e.to_string()));
        match decoded {
            Ok(source) => {
                if let Err(e) = handle.play_raw(source.convert_samples()) {
                    warn!("Unable to play alert sound: {}", e);
                } else {
                    debug!(clip = %clip.display(), "Alert sound playing");
                }
            }
            Err(e) => warn!(clip = %clip.display(), "Unable to decode alert sound: {}", e),
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum AudioError {
        WorkerGone {
            display("audio playback worker has exited")
        }
    }
}
