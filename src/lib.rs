//! NDEF tag toolkit: binary codec for NDEF messages and well-known Text/URI
//! records, a read/write/erase path over an abstract tag transport, and the
//! APDU state machine for host card emulation of a two-file NDEF card.
//!
//! Platform wiring (adapter lifecycle, foreground dispatch, service
//! registration) lives outside this crate; the host delivers discovery
//! events, transports and APDU commands through the types in [`types`],
//! [`transport`] and [`hce`].

pub mod dispatch;
pub mod error;
pub mod hce;
pub mod message;
pub mod ndef;
pub mod tag;
pub mod transport;
pub mod types;
pub mod utils;
pub mod write;

pub use dispatch::{EventDispatcher, NfcEvent};
pub use error::{NfcError, Result};
pub use hce::{CardFileState, SelectedFile, process_command};
pub use message::{NdefMessage, NdefRecord};
pub use tag::read_tag;
pub use transport::{NdefSupport, NdefTransport};
pub use types::{TagHandle, TagSnapshot, TextEntry, UriEntry, WriteRequest};
pub use write::{build_message, erase_tag, write_tag};
