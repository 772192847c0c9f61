// src/tag.rs
use log::warn;

use crate::error::Result;
use crate::message::{NdefMessage, NdefRecord};
use crate::ndef::{RTD_TEXT, RTD_URI, URI_PROTOCOLS};
use crate::types::{NdefInfo, NdefRecordInfo, TagHandle, TagSnapshot};
use crate::utils::decode_utf8;

const PUSH_PROTOCOL_TYPE: &str = "NDEF Push Protocol";

/// Builds a snapshot of a discovered tag. Decode failures of the cached
/// message are recovered locally: the snapshot simply carries no message.
pub fn read_tag(handle: &TagHandle) -> TagSnapshot {
    let ndef = match &handle.ndef {
        Some(status) => Some(NdefInfo {
            tag_type: status.tag_type.clone(),
            max_size: status.max_size,
            writable: status.writable,
            can_make_read_only: status.can_make_read_only,
            message: status.cached_message.as_deref().and_then(decode_records),
        }),
        None => legacy_info(handle),
    };

    TagSnapshot {
        id: handle.id.clone(),
        tech_list: handle.tech_list.clone(),
        ndef,
    }
}

/// Push-style discovery hands over whole messages instead of an NDEF
/// capability; only the first one is taken.
fn legacy_info(handle: &TagHandle) -> Option<NdefInfo> {
    let first = handle.legacy_messages.first()?;
    if handle.legacy_messages.len() > 1 {
        warn!(
            "expected 1 ndef message but found {}",
            handle.legacy_messages.len()
        );
    }

    Some(NdefInfo {
        tag_type: PUSH_PROTOCOL_TYPE.to_string(),
        max_size: 0,
        writable: false,
        can_make_read_only: false,
        message: decode_records(first),
    })
}

fn decode_records(bytes: &[u8]) -> Option<Vec<NdefRecordInfo>> {
    let message = match NdefMessage::parse(bytes) {
        Ok(message) => message,
        Err(err) => {
            warn!("failed to parse cached ndef message: {}", err);
            return None;
        }
    };

    let mut records = Vec::with_capacity(message.records.len());
    for record in &message.records {
        match record_info(record) {
            Ok(info) => records.push(info),
            Err(err) => {
                warn!("failed to decode ndef record: {}", err);
                return None;
            }
        }
    }
    Some(records)
}

/// Derives the display fields for one record. The plain decoded payload is
/// kept as-is; the type-aware string strips the language header for Text
/// records and expands the table prefix for URI records.
pub fn record_info(record: &NdefRecord) -> Result<NdefRecordInfo> {
    let payload_as_string_with_prefix = decode_utf8(&record.payload)?;
    let mut payload_as_string = payload_as_string_with_prefix.clone();

    match record.record_type.first() {
        Some(&RTD_TEXT) => {
            let lang_len = record.payload.first().copied().unwrap_or(0) as usize;
            payload_as_string = payload_as_string_with_prefix
                .chars()
                .skip(1 + lang_len)
                .collect();
        }
        Some(&RTD_URI) => {
            if let Some(&index) = record.payload.first() {
                let prefix = URI_PROTOCOLS.get(index as usize).copied().unwrap_or("");
                let rest: String = payload_as_string_with_prefix.chars().skip(1).collect();
                payload_as_string = format!("{}{}", prefix, rest);
            }
        }
        _ => {}
    }

    Ok(NdefRecordInfo {
        tnf: record.tnf,
        record_type: record.record_type.clone(),
        id: record.id.clone(),
        payload: record.payload.clone(),
        payload_as_hex: hex::encode(&record.payload),
        payload_as_string_with_prefix,
        payload_as_string,
    })
}
