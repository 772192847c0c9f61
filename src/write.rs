// src/write.rs
use crate::error::{NfcError, Result};
use crate::message::NdefMessage;
use crate::ndef::{empty_record, text_record, uri_record};
use crate::transport::{Connection, NdefSupport, NdefTransport};
use crate::types::WriteRequest;

/// Builds the message for a write request: text entries in request order,
/// then uri entries in request order. Unspecified ids become empty.
pub fn build_message(request: &WriteRequest) -> NdefMessage {
    let mut records = Vec::with_capacity(request.text_records.len() + request.uri_records.len());

    for entry in &request.text_records {
        records.push(text_record(
            entry.language_code.as_deref(),
            &entry.text,
            entry.id.clone().unwrap_or_default(),
        ));
    }
    for entry in &request.uri_records {
        records.push(uri_record(&entry.uri, entry.id.clone().unwrap_or_default()));
    }

    NdefMessage::new(records)
}

pub fn write_tag<T: NdefTransport + ?Sized>(
    transport: &mut T,
    request: &WriteRequest,
) -> Result<()> {
    write_message(transport, &build_message(request))
}

/// Erasing writes a single empty record over the current content.
pub fn erase_tag<T: NdefTransport + ?Sized>(transport: &mut T) -> Result<()> {
    write_message(transport, &NdefMessage::new(vec![empty_record()]))
}

fn write_message<T: NdefTransport + ?Sized>(
    transport: &mut T,
    message: &NdefMessage,
) -> Result<()> {
    let bytes = message.to_bytes();

    match transport.support() {
        NdefSupport::Unsupported => Err(NfcError::NoNdefSupport),
        NdefSupport::Formattable => {
            let mut conn = Connection::open(transport)?;
            conn.format(&bytes)
        }
        NdefSupport::Ndef => {
            let mut conn = Connection::open(transport)?;
            if !conn.is_writable() {
                return Err(NfcError::NotWritable);
            }

            let max_size = conn.max_size();
            if bytes.len() > max_size {
                return Err(NfcError::CapacityExceeded {
                    max_size,
                    actual_size: bytes.len(),
                });
            }

            conn.write_message(&bytes)
        }
    }
}
