//! Byte sink abstraction under [`McuSerial`](super::McuSerial)
//!
//! The link only ever pushes whole frames and flushes, so that is all the
//! backend has to provide. Tests swap in [`mocks::MockSerialPort`].

use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;

/// Write side of a microcontroller link
#[async_trait]
pub trait SerialPortIO: Send {
    /// Writes one complete frame
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Pushes buffered bytes out to the device
    async fn flush(&mut self) -> io::Result<()>;
}

/// USB CDC / UART backend built on `tokio_serial`
pub struct TokioSerialPort {
    stream: tokio_serial::SerialStream,
}

impl TokioSerialPort {
    pub fn new(stream: tokio_serial::SerialStream) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl SerialPortIO for TokioSerialPort {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.stream.flush().await
    }
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct LinkState {
        frames: Vec<Vec<u8>>,
        write_failure: Option<io::ErrorKind>,
        flush_failure: Option<io::ErrorKind>,
        write_delay: Option<Duration>,
    }

    /// In-memory microcontroller link. Clones share state, so a test can keep
    /// one handle while `McuSerial` owns the other.
    #[derive(Debug, Clone, Default)]
    pub struct MockSerialPort {
        state: Arc<Mutex<LinkState>>,
    }

    impl MockSerialPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Frames accepted so far, oldest first
        pub fn frames(&self) -> Vec<Vec<u8>> {
            self.state.lock().unwrap().frames.clone()
        }

        pub fn fail_writes(&self, kind: io::ErrorKind) {
            self.state.lock().unwrap().write_failure = Some(kind);
        }

        pub fn heal_writes(&self) {
            self.state.lock().unwrap().write_failure = None;
        }

        pub fn fail_flush(&self, kind: io::ErrorKind) {
            self.state.lock().unwrap().flush_failure = Some(kind);
        }

        /// Makes every write sleep first, to exercise the write timeout
        pub fn stall_writes(&self, delay: Duration) {
            self.state.lock().unwrap().write_delay = Some(delay);
        }
    }

    #[async_trait]
    impl SerialPortIO for MockSerialPort {
        async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
            let delay = self.state.lock().unwrap().write_delay;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut state = self.state.lock().unwrap();
            match state.write_failure {
                Some(kind) => Err(io::Error::new(kind, "link write rejected")),
                None => {
                    state.frames.push(data.to_vec());
                    Ok(())
                }
            }
        }

        async fn flush(&mut self) -> io::Result<()> {
            match self.state.lock().unwrap().flush_failure {
                Some(kind) => Err(io::Error::new(kind, "link flush rejected")),
                None => Ok(()),
            }
        }
    }
}
