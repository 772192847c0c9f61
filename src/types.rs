// src/types.rs
use serde::{Deserialize, Serialize};

/// Capability handle delivered by the platform layer with a discovery event.
/// A tag may expose an NDEF capability, a legacy list of whole raw messages
/// (push-style discovery), both, or neither.
#[derive(Debug, Clone, Default)]
pub struct TagHandle {
    pub id: Vec<u8>,
    pub tech_list: Vec<String>,
    pub ndef: Option<NdefStatus>,
    pub legacy_messages: Vec<Vec<u8>>,
}

/// NDEF capability introspection as reported by the tag technology.
#[derive(Debug, Clone)]
pub struct NdefStatus {
    pub tag_type: String,
    pub max_size: usize,
    pub writable: bool,
    pub can_make_read_only: bool,
    pub cached_message: Option<Vec<u8>>,
}

/// Structured, serializable view of a discovered tag. Built once per
/// discovery event and discarded after use.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TagSnapshot {
    pub id: Vec<u8>,
    pub tech_list: Vec<String>,
    pub ndef: Option<NdefInfo>,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NdefInfo {
    pub tag_type: String,
    pub max_size: usize,
    pub writable: bool,
    pub can_make_read_only: bool,
    pub message: Option<Vec<NdefRecordInfo>>,
}

/// Display view of a decoded record: raw bytes plus derived strings.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NdefRecordInfo {
    pub tnf: u8,
    pub record_type: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
    pub payload_as_hex: String,
    pub payload_as_string_with_prefix: String,
    pub payload_as_string: String,
}

/// What to put on a tag: text entries first, then uri entries, both in
/// request order.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WriteRequest {
    #[serde(default)]
    pub text_records: Vec<TextEntry>,
    #[serde(default)]
    pub uri_records: Vec<UriEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TextEntry {
    pub text: String,
    pub language_code: Option<String>,
    pub id: Option<Vec<u8>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UriEntry {
    pub uri: String,
    pub id: Option<Vec<u8>>,
}

impl TextEntry {
    pub fn new(text: impl Into<String>) -> Self {
        TextEntry {
            text: text.into(),
            language_code: None,
            id: None,
        }
    }
}

impl UriEntry {
    pub fn new(uri: impl Into<String>) -> Self {
        UriEntry {
            uri: uri.into(),
            id: None,
        }
    }
}
