// src/transport.rs
use std::ops::{Deref, DerefMut};

use log::warn;

use crate::error::{NfcError, Result};

/// Which write capability the tag exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdefSupport {
    /// The tag holds an NDEF file and reports size/writability.
    Ndef,
    /// No NDEF file yet, but the tag can be formatted with one.
    Formattable,
    /// Neither; the write path refuses the tag.
    Unsupported,
}

/// Abstract tag transport supplied by the platform layer. The core only
/// depends on this contract, never on a concrete tag technology.
///
/// Callers must serialize access; the core performs no locking of its own.
pub trait NdefTransport {
    fn support(&self) -> NdefSupport;

    fn connect(&mut self) -> Result<()>;
    fn close(&mut self);

    fn is_writable(&self) -> bool;
    fn max_size(&self) -> usize;
    fn can_make_read_only(&self) -> bool;

    /// Raw bytes of the message cached at discovery time, if any.
    fn read_cached_message(&mut self) -> Result<Vec<u8>>;

    /// Writes a serialized NDEF message to the tag's NDEF file.
    fn write_message(&mut self, bytes: &[u8]) -> Result<()>;

    /// Formats a formattable tag directly with a serialized message.
    fn format(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Scoped connection: `close` runs when the guard drops, on every exit path.
pub struct Connection<'a, T: NdefTransport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: NdefTransport + ?Sized> Connection<'a, T> {
    pub fn open(transport: &'a mut T) -> Result<Self> {
        transport.connect().map_err(|err| {
            warn!("ndef connection error: {}", err);
            NfcError::ConnectionFailed
        })?;
        Ok(Connection { transport })
    }
}

impl<T: NdefTransport + ?Sized> Deref for Connection<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.transport
    }
}

impl<T: NdefTransport + ?Sized> DerefMut for Connection<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.transport
    }
}

impl<T: NdefTransport + ?Sized> Drop for Connection<'_, T> {
    fn drop(&mut self) {
        self.transport.close();
    }
}
