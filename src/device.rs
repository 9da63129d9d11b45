use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

/// Warm-up after the port opens; the microcontroller drops bytes written
/// before its UART settles.
const SETTLE_DELAY: Duration = Duration::from_secs(2);
const IO_TIMEOUT: Duration = Duration::from_secs(1);

const ASSERT_COMMAND: &[u8] = b"1\n";
const DEASSERT_COMMAND: &[u8] = b"0\n";

/// Owns the serial link to the buzzer microcontroller.
///
/// Exactly one live connection at a time. A failed write drops the handle;
/// the session then reports `NotConnected` until an explicit `connect`
/// builds a fresh one. There is no automatic reconnect or backoff: the
/// surrounding alert flow tolerates a missing device.
pub struct DeviceSession {
    stream: Option<SerialStream>,
}

impl DeviceSession {
    /// A session with no underlying port. Every `send_signal` fails with
    /// `NotConnected` without panicking.
    pub fn disconnected() -> DeviceSession {
        DeviceSession { stream: None }
    }

    /// Opens the named port and waits out the device's settle delay before
    /// the link is considered ready.
    pub async fn connect(port: &str, baud_rate: u32) -> Result<DeviceSession, DeviceError> {
        let stream = tokio_serial::new(port, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .timeout(IO_TIMEOUT)
            .open_native_async()
            .map_err(DeviceError::Open)?;
        tokio::time::sleep(SETTLE_DELAY).await;
        info!(port, baud_rate, "Device connected");
        Ok(DeviceSession {
            stream: Some(stream),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Writes the single-byte alert command (`'1'` to assert, `'0'` to
    /// deassert), newline-terminated.
    pub async fn send_signal(&mut self, asserted: bool) -> Result<(), DeviceError> {
        let stream = self.stream.as_mut().ok_or(DeviceError::NotConnected)?;
        let command = if asserted {
            ASSERT_COMMAND
        } else {
            DEASSERT_COMMAND
        };
        let written = async {
            stream.write_all(command).await?;
            stream.flush().await
        }
        .await;
        match written {
            Ok(()) => {
                debug!(asserted, "Device signal sent");
                Ok(())
            }
            Err(e) => {
                // Port unplugged or OS error. Drop the handle so later calls
                // report a clean NotConnected instead of hammering a dead fd.
                self.stream = None;
                Err(DeviceError::Io(e))
            }
        }
    }

    /// Best-effort deassert and release of the port at shutdown.
    pub async fn close(&mut self) {
        if self.stream.is_some() {
            if let Err(e) = self.send_signal(false).await {
                warn!("Unable to deassert device on shutdown: {}", e);
            }
            self.stream = None;
            info!("Device session closed");
        }
    }
}

quick_error! {
    #[derive(Debug)]
    pub enum DeviceError {
        NotConnected {
            display("no open device session")
        }
        Open(error: tokio_serial::Error) {
            display("unable to open serial port: {}", error)
            source(error)
        }
        Io(error: std::io::Error) {
            display("serial write failed: {}", error)
            source(error)
        }
    }
}
