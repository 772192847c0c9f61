// src/hce.rs
use log::debug;

use crate::error::{NfcError, Result};
use crate::types::WriteRequest;
use crate::write::build_message;

// APDU layout: [class, instruction, P1, P2, Lc/Le, data...]
const APDU_INS: usize = 1;
const APDU_P1: usize = 2;
const APDU_P2: usize = 3;
const APDU_LC: usize = 4;
const APDU_LE: usize = 4;
const DATA_OFFSET: usize = 5;

const INS_SELECT: u8 = 0xA4;
const INS_READ: u8 = 0xB0;

const P1_SELECT_BY_NAME: u8 = 0x04;
const P1_SELECT_BY_ID: u8 = 0x00;

/// NDEF tag application identifier.
pub const NDEF_AID: [u8; 7] = [0xD2, 0x76, 0x00, 0x00, 0x85, 0x01, 0x01];

pub const FILE_ID_CC: u16 = 0xE103;
pub const FILE_ID_NDEF: u16 = 0xE104;

pub const SW_COMPLETE: [u8; 2] = [0x90, 0x00];
pub const SW_NOT_FOUND: [u8; 2] = [0x6A, 0x82];

/// Capability Container file: length, mapping version 2.0, MLe, MLc, then
/// the NDEF file control TLV (tag 0x04, file id 0xE104, max NDEF size
/// 0x0032, open read/write access). The max size field is a constant, not
/// derived from the emulated content.
pub const CC_FILE: [u8; 15] = [
    0x00, 0x0F, // LEN
    0x20, // mapping version
    0x00, 0x40, // MLe
    0x00, 0x40, // MLc
    0x04, 0x06, // TLV tag + length
    0xE1, 0x04, // file id
    0x00, 0x32, // max ndef size
    0x00, // read access
    0x00, // write access
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectedFile {
    #[default]
    None,
    CapabilityContainer,
    NdefFile,
}

/// Emulated two-file card state. Lives for one emulation session; the NDEF
/// file buffer survives deactivation and is reusable across sessions.
#[derive(Debug, Clone, Default)]
pub struct CardFileState {
    selected_file: SelectedFile,
    ndef_application_selected: bool,
    ndef_file: Option<Vec<u8>>,
}

impl CardFileState {
    pub fn new() -> Self {
        CardFileState::default()
    }

    pub fn selected_file(&self) -> SelectedFile {
        self.selected_file
    }

    pub fn ndef_application_selected(&self) -> bool {
        self.ndef_application_selected
    }

    pub fn has_content(&self) -> bool {
        self.ndef_file.is_some()
    }

    /// Builds the NDEF file from a write request and returns a copy of the
    /// raw buffer: 2-byte big-endian message length, then the message.
    pub fn set_emulated_content(&mut self, request: &WriteRequest) -> Vec<u8> {
        let bytes = build_message(request).to_bytes();
        self.load_raw_message(&bytes)
    }

    /// Same framing from an already-serialized message, the session-start
    /// path where the host hands over an initial content buffer.
    pub fn load_raw_message(&mut self, message_bytes: &[u8]) -> Vec<u8> {
        let mut file = Vec::with_capacity(2 + message_bytes.len());
        file.extend_from_slice(&(message_bytes.len() as u16).to_be_bytes());
        file.extend_from_slice(message_bytes);
        self.ndef_file = Some(file.clone());
        file
    }

    /// Session end: selection state resets, the NDEF file buffer stays.
    pub fn deactivate(&mut self) {
        self.selected_file = SelectedFile::None;
        self.ndef_application_selected = false;
    }
}

/// Answers one reader command. Never fails: every invalid or out-of-sequence
/// command maps to the `6A82` trailer, since an emulation session has no way
/// to surface an error to the reading device.
pub fn process_command(state: &mut CardFileState, apdu: &[u8]) -> Vec<u8> {
    match handle_command(state, apdu) {
        Ok(response) => response,
        Err(err) => {
            debug!("apdu rejected: {}", err);
            SW_NOT_FOUND.to_vec()
        }
    }
}

fn handle_command(state: &mut CardFileState, apdu: &[u8]) -> Result<Vec<u8>> {
    if apdu.len() < DATA_OFFSET {
        return Err(NfcError::Decode("apdu too short".into()));
    }

    match apdu[APDU_INS] {
        INS_SELECT => match apdu[APDU_P1] {
            P1_SELECT_BY_NAME => select_by_name(state, apdu),
            P1_SELECT_BY_ID => select_by_id(state, apdu),
            _ => Err(NfcError::InvalidSelectTarget),
        },
        INS_READ => read_binary(state, apdu),
        ins => Err(NfcError::UnknownCommand(ins)),
    }
}

fn command_data<'a>(apdu: &'a [u8]) -> Result<&'a [u8]> {
    let lc = apdu[APDU_LC] as usize;
    apdu.get(DATA_OFFSET..DATA_OFFSET + lc)
        .ok_or_else(|| NfcError::Decode("apdu data shorter than Lc".into()))
}

fn select_by_name(state: &mut CardFileState, apdu: &[u8]) -> Result<Vec<u8>> {
    if command_data(apdu)? != NDEF_AID {
        return Err(NfcError::InvalidSelectTarget);
    }
    state.ndef_application_selected = true;
    Ok(SW_COMPLETE.to_vec())
}

fn select_by_id(state: &mut CardFileState, apdu: &[u8]) -> Result<Vec<u8>> {
    if !state.ndef_application_selected {
        return Err(NfcError::InvalidSelectTarget);
    }

    let file_id = command_data(apdu)?
        .iter()
        .fold(0u16, |id, &byte| (id << 8) | byte as u16);

    state.selected_file = match file_id {
        FILE_ID_CC => SelectedFile::CapabilityContainer,
        FILE_ID_NDEF => SelectedFile::NdefFile,
        _ => return Err(NfcError::InvalidSelectTarget),
    };
    Ok(SW_COMPLETE.to_vec())
}

fn read_binary(state: &mut CardFileState, apdu: &[u8]) -> Result<Vec<u8>> {
    if !state.ndef_application_selected {
        return Err(NfcError::InvalidSelectTarget);
    }

    let src: &[u8] = match state.selected_file {
        SelectedFile::CapabilityContainer => &CC_FILE,
        SelectedFile::NdefFile => state
            .ndef_file
            .as_deref()
            .ok_or(NfcError::UnsetEmulationContent)?,
        SelectedFile::None => return Err(NfcError::InvalidSelectTarget),
    };

    let offset = ((apdu[APDU_P1] as usize) << 8) | apdu[APDU_P2] as usize;
    let length = apdu[APDU_LE] as usize;
    let data = src
        .get(offset..offset + length)
        .ok_or_else(|| NfcError::Decode("read beyond end of file".into()))?;

    let mut response = Vec::with_capacity(length + SW_COMPLETE.len());
    response.extend_from_slice(data);
    response.extend_from_slice(&SW_COMPLETE);
    Ok(response)
}
