// src/message.rs
use crate::error::{NfcError, Result};

// Header byte flags: MB, ME, CF, SR, IL, TNF (bits 2-0)
const FLAG_MB: u8 = 0x80;
const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    pub tnf: u8,
    pub record_type: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl NdefRecord {
    pub fn new(tnf: u8, record_type: Vec<u8>, id: Vec<u8>, payload: Vec<u8>) -> Self {
        NdefRecord {
            tnf,
            record_type,
            id,
            payload,
        }
    }
}

/// An ordered sequence of records. The binary framing marks the first record
/// as message-begin and the last as message-end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NdefMessage {
    pub records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(records: Vec<NdefRecord>) -> Self {
        NdefMessage { records }
    }

    /// Parses a raw NDEF message. Only the short-record form is supported;
    /// chunked and long-format records fail the whole parse, as does any
    /// declared length running past the end of the buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut records = Vec::new();
        let mut cursor = 0usize;

        while cursor < data.len() {
            let header = data[cursor];
            cursor += 1;

            if header & FLAG_CF != 0 {
                return Err(NfcError::Decode("chunked records not supported".into()));
            }
            if header & FLAG_SR == 0 {
                return Err(NfcError::Decode(
                    "long-format payload length not supported".into(),
                ));
            }

            let tnf = header & TNF_MASK;
            let has_id = header & FLAG_IL != 0;
            let is_end = header & FLAG_ME != 0;

            let type_len = take_byte(data, &mut cursor)? as usize;
            let payload_len = take_byte(data, &mut cursor)? as usize;
            let id_len = if has_id {
                take_byte(data, &mut cursor)? as usize
            } else {
                0
            };

            let record_type = take(data, &mut cursor, type_len)?.to_vec();
            let id = take(data, &mut cursor, id_len)?.to_vec();
            let payload = take(data, &mut cursor, payload_len)?.to_vec();

            records.push(NdefRecord {
                tnf,
                record_type,
                id,
                payload,
            });

            if is_end {
                break;
            }
        }

        Ok(NdefMessage { records })
    }

    /// Serializes the message in short-record form. The id length field is
    /// omitted entirely when a record's id is empty.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let last = self.records.len().saturating_sub(1);

        for (i, record) in self.records.iter().enumerate() {
            let mut header = (record.tnf & TNF_MASK) | FLAG_SR;
            if i == 0 {
                header |= FLAG_MB;
            }
            if i == last {
                header |= FLAG_ME;
            }
            if !record.id.is_empty() {
                header |= FLAG_IL;
            }

            out.push(header);
            out.push(record.record_type.len() as u8);
            out.push(record.payload.len() as u8);
            if !record.id.is_empty() {
                out.push(record.id.len() as u8);
            }
            out.extend_from_slice(&record.record_type);
            out.extend_from_slice(&record.id);
            out.extend_from_slice(&record.payload);
        }

        out
    }
}

fn take_byte(data: &[u8], cursor: &mut usize) -> Result<u8> {
    let byte = *data
        .get(*cursor)
        .ok_or_else(|| NfcError::Decode("record header truncated".into()))?;
    *cursor += 1;
    Ok(byte)
}

fn take<'a>(data: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = cursor
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| NfcError::Decode("declared length exceeds buffer".into()))?;
    let slice = &data[*cursor..end];
    *cursor = end;
    Ok(slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ndef::{RTD_TEXT, TNF_WELL_KNOWN};

    fn text_record(payload: &[u8]) -> NdefRecord {
        NdefRecord::new(TNF_WELL_KNOWN, vec![RTD_TEXT], Vec::new(), payload.to_vec())
    }

    #[test]
    fn single_record_framing() {
        let message = NdefMessage::new(vec![text_record(b"\x02enhi")]);
        let bytes = message.to_bytes();

        // MB | ME | SR | TNF=1
        assert_eq!(bytes[0], 0xD1);
        assert_eq!(bytes[1], 1); // type length
        assert_eq!(bytes[2], 5); // payload length
        assert_eq!(bytes[3], 0x54);

        assert_eq!(NdefMessage::parse(&bytes).unwrap(), message);
    }

    #[test]
    fn multi_record_flags() {
        let message = NdefMessage::new(vec![
            text_record(b"\x02enone"),
            text_record(b"\x02entwo"),
            text_record(b"\x02enthree"),
        ]);
        let bytes = message.to_bytes();

        assert_eq!(bytes[0] & 0xC0, 0x80); // first: MB only
        let parsed = NdefMessage::parse(&bytes).unwrap();
        assert_eq!(parsed.records.len(), 3);
        assert_eq!(parsed, message);
    }

    #[test]
    fn id_roundtrip() {
        let record = NdefRecord::new(
            TNF_WELL_KNOWN,
            vec![RTD_TEXT],
            b"rec1".to_vec(),
            b"\x02enhello".to_vec(),
        );
        let message = NdefMessage::new(vec![record]);
        let bytes = message.to_bytes();

        assert_eq!(bytes[0] & 0x08, 0x08); // IL set
        assert_eq!(bytes[3], 4); // id length
        assert_eq!(NdefMessage::parse(&bytes).unwrap(), message);
    }

    #[test]
    fn chunked_record_rejected() {
        // CF flag set
        let err = NdefMessage::parse(&[0xF1, 0x01, 0x00, 0x54]).unwrap_err();
        assert!(matches!(err, NfcError::Decode(_)));
    }

    #[test]
    fn long_record_rejected() {
        // SR flag clear
        let err = NdefMessage::parse(&[0xC1, 0x01, 0x00, 0x00, 0x00, 0x05, 0x54]).unwrap_err();
        assert!(matches!(err, NfcError::Decode(_)));
    }

    #[test]
    fn truncated_payload_rejected() {
        // declares 5 payload bytes, provides 2
        let err = NdefMessage::parse(&[0xD1, 0x01, 0x05, 0x54, 0xAA, 0xBB]).unwrap_err();
        assert!(matches!(err, NfcError::Decode(_)));
    }

    #[test]
    fn empty_buffer_is_empty_message() {
        let message = NdefMessage::parse(&[]).unwrap();
        assert!(message.records.is_empty());
    }

    #[test]
    fn parse_stops_at_message_end() {
        let mut bytes = NdefMessage::new(vec![text_record(b"\x02enx")]).to_bytes();
        bytes.extend_from_slice(&[0xFE, 0x00, 0x00]); // trailing garbage
        let parsed = NdefMessage::parse(&bytes).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }
}
