// src/dispatch.rs
use crossbeam_channel::{Receiver, Sender, unbounded};
use log::info;
use serde::Serialize;

use crate::tag::read_tag;
use crate::types::{TagHandle, TagSnapshot};

/// Events emitted for the application layer.
#[derive(Serialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum NfcEvent {
    TagDiscovered { tag: TagSnapshot },
    NdefDiscovered { tag: TagSnapshot },
}

/// Per-instance event fan-out. Replaces listener globals: each dispatcher
/// owns its channel and the host hands discovery events to exactly one.
pub struct EventDispatcher {
    events: Sender<NfcEvent>,
}

impl EventDispatcher {
    pub fn new() -> (Self, Receiver<NfcEvent>) {
        let (tx, rx) = unbounded();
        (EventDispatcher { events: tx }, rx)
    }

    /// Builds a snapshot for a discovered tag and emits the matching event:
    /// `NdefDiscovered` when the tag carries NDEF content (capability or
    /// push-style message list), `TagDiscovered` otherwise.
    pub fn handle_discovery(&self, handle: &TagHandle) {
        let snapshot = read_tag(handle);

        let event = if handle.ndef.is_some() || !handle.legacy_messages.is_empty() {
            NfcEvent::NdefDiscovered { tag: snapshot }
        } else {
            NfcEvent::TagDiscovered { tag: snapshot }
        };

        if self.events.send(event).is_err() {
            info!("tag discovered, but no subscriber is listening");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::NdefMessage;
    use crate::ndef::text_record;
    use crate::types::NdefStatus;

    fn plain_handle() -> TagHandle {
        TagHandle {
            id: vec![0x04, 0x11],
            tech_list: vec!["android.nfc.tech.NfcA".into()],
            ndef: None,
            legacy_messages: Vec::new(),
        }
    }

    #[test]
    fn plain_tag_emits_tag_discovered() {
        let (dispatcher, rx) = EventDispatcher::new();
        dispatcher.handle_discovery(&plain_handle());

        match rx.try_recv().unwrap() {
            NfcEvent::TagDiscovered { tag } => assert_eq!(tag.id, vec![0x04, 0x11]),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn ndef_tag_emits_ndef_discovered() {
        let mut handle = plain_handle();
        handle.ndef = Some(NdefStatus {
            tag_type: "org.nfcforum.ndef.type2".into(),
            max_size: 64,
            writable: true,
            can_make_read_only: false,
            cached_message: Some(
                NdefMessage::new(vec![text_record(None, "hi", Vec::new())]).to_bytes(),
            ),
        });

        let (dispatcher, rx) = EventDispatcher::new();
        dispatcher.handle_discovery(&handle);

        match rx.try_recv().unwrap() {
            NfcEvent::NdefDiscovered { tag } => {
                assert!(tag.ndef.unwrap().message.is_some());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn dropped_receiver_is_not_an_error() {
        let (dispatcher, rx) = EventDispatcher::new();
        drop(rx);
        dispatcher.handle_discovery(&plain_handle());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let (dispatcher, rx) = EventDispatcher::new();
        dispatcher.handle_discovery(&plain_handle());

        let event = rx.try_recv().unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"TagDiscovered\""));
    }
}
