use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::errors::Error;
use crate::errors::ProtocolError::NotInitialized;
use crate::io::IoTransport;

/// Mock [`IoTransport`]: written bytes are recorded, read bytes are served from a preloaded buffer.
///
/// Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct MockTransportLayer {
    pub opened: Arc<AtomicBool>,
    pub written: Arc<Mutex<Vec<u8>>>,
    pub readable: Arc<Mutex<VecDeque<u8>>>,
}

impl MockTransportLayer {
    /// Creates a transport which is already opened.
    pub fn opened() -> Self {
        let transport = Self::default();
        transport.opened.store(true, Ordering::SeqCst);
        transport
    }

    pub fn is_opened(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Display for MockTransportLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "MockTransportLayer")
    }
}

impl IoTransport for MockTransportLayer {
    fn open(&mut self) -> Result<(), Error> {
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> Result<(), Error> {
        self.opened.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn set_timeout(&mut self, _: Duration) -> Result<(), Error> {
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> Result<(), Error> {
        if !self.is_opened() {
            return Err(NotInitialized.into());
        }
        self.written.lock().extend_from_slice(buf);
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        if !self.is_opened() {
            return Err(NotInitialized.into());
        }
        let mut readable = self.readable.lock();
        if readable.len() < buf.len() {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }
        for byte in buf.iter_mut() {
            *byte = readable.pop_front().unwrap_or_default();
        }
        Ok(())
    }
}
