// src/ndef.rs
use crate::error::{NfcError, Result};
use crate::message::NdefRecord;
use crate::utils::{decode_utf8, encode_utf8};

pub const TNF_EMPTY: u8 = 0x00;
pub const TNF_WELL_KNOWN: u8 = 0x01;

/// Well-known type tags: 'T' for Text, 'U' for URI.
pub const RTD_TEXT: u8 = 0x54;
pub const RTD_URI: u8 = 0x55;

const DEFAULT_LANGUAGE: &str = "en";

/// URI prefix codes from the NFC Forum RTD URI specification.
/// Index 0 means no prefix; the payload carries the literal URI.
pub const URI_PROTOCOLS: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPayload {
    pub language_code: String,
    pub text: String,
}

/// Text record payload: [lang length] + lang code (ASCII) + UTF-8 text.
pub fn encode_text_payload(language_code: &str, text: &str) -> Vec<u8> {
    let lang = language_code.as_bytes();
    let mut payload = Vec::with_capacity(1 + lang.len() + text.len());
    payload.push(lang.len() as u8);
    payload.extend_from_slice(lang);
    payload.extend_from_slice(&encode_utf8(text));
    payload
}

pub fn decode_text_payload(payload: &[u8]) -> Result<TextPayload> {
    let lang_len = *payload
        .first()
        .ok_or_else(|| NfcError::Decode("empty text payload".into()))? as usize;
    if 1 + lang_len > payload.len() {
        return Err(NfcError::Decode(
            "text payload shorter than language code".into(),
        ));
    }

    let language_code = std::str::from_utf8(&payload[1..1 + lang_len])
        .map_err(|_| NfcError::Decode("language code is not ASCII".into()))?
        .to_string();
    let text = decode_utf8(&payload[1 + lang_len..])?;

    Ok(TextPayload {
        language_code,
        text,
    })
}

/// URI record payload: [prefix table index] + UTF-8 remainder. Encoding
/// picks the first table entry (from index 1 upward) that prefixes the URI.
pub fn encode_uri_payload(uri: &str) -> Vec<u8> {
    let index = URI_PROTOCOLS
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, prefix)| uri.starts_with(**prefix))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let remainder = &uri[URI_PROTOCOLS[index].len()..];
    let mut payload = Vec::with_capacity(1 + remainder.len());
    payload.push(index as u8);
    payload.extend_from_slice(&encode_utf8(remainder));
    payload
}

pub fn decode_uri_payload(payload: &[u8]) -> Result<String> {
    let index = *payload
        .first()
        .ok_or_else(|| NfcError::Decode("empty uri payload".into()))? as usize;

    // Out-of-range index decodes with an empty prefix.
    let prefix = URI_PROTOCOLS.get(index).copied().unwrap_or("");
    let remainder = decode_utf8(&payload[1..])?;

    Ok(format!("{}{}", prefix, remainder))
}

pub fn text_record(language_code: Option<&str>, text: &str, id: Vec<u8>) -> NdefRecord {
    let lang = language_code.unwrap_or(DEFAULT_LANGUAGE);
    NdefRecord::new(
        TNF_WELL_KNOWN,
        vec![RTD_TEXT],
        id,
        encode_text_payload(lang, text),
    )
}

pub fn uri_record(uri: &str, id: Vec<u8>) -> NdefRecord {
    NdefRecord::new(TNF_WELL_KNOWN, vec![RTD_URI], id, encode_uri_payload(uri))
}

/// The record used by the erase path: TNF empty, no type, id or payload.
pub fn empty_record() -> NdefRecord {
    NdefRecord::new(TNF_EMPTY, Vec::new(), Vec::new(), Vec::new())
}
