//! Event record decoding and assembly.
//!
//! One event record carries identifiers, timing, status flags and a
//! nested descriptor loop. Decoding collapses the loop into one
//! normalized [`Event`] with a title, a short synopsis and the long
//! synopsis reassembled from its extended-event fragments.

use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::descriptor::{self, Descriptor, ExtendedEvent, ShortEvent};
use crate::error::EitError;
use crate::time;

/// Title substituted when an event carries no short-event descriptor.
pub const NO_INFORMATION: &str = "<no information>";

/// Enumerated running status of an event (top three bits of the
/// status word).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningStatus {
    Undefined,
    NotRunning,
    StartsSoon,
    Pausing,
    Running,
    Reserved(u8),
}

impl From<u8> for RunningStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => RunningStatus::Undefined,
            1 => RunningStatus::NotRunning,
            2 => RunningStatus::StartsSoon,
            3 => RunningStatus::Pausing,
            4 => RunningStatus::Running,
            other => RunningStatus::Reserved(other),
        }
    }
}

/// Title and short synopsis of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortText {
    /// ISO 639-2 language code.
    pub language: String,
    /// Event title.
    pub name: String,
    /// One-line synopsis.
    pub text: String,
}

/// Long synopsis assembled from extended-event fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedText {
    pub text: String,
}

/// One normalized program-guide event.
///
/// Serializes to the exact shape stored in the persisted guide document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identity within its service.
    #[serde(rename = "eventId")]
    pub event_id: u16,
    /// Raw 16-bit status word as broadcast.
    pub status: u16,
    /// Running status, top three bits of `status`.
    pub running: u8,
    /// Free-CA flag: the event is transmitted scrambled.
    pub scrambled: bool,
    /// Start time in Unix seconds; the broadcast wall clock taken as UTC.
    pub start: i64,
    /// Duration in seconds.
    pub duration: u32,
    pub short: ShortText,
    pub extended: ExtendedText,
}

impl Event {
    /// End time of the event in Unix seconds.
    pub fn end(&self) -> i64 {
        self.start + self.duration as i64
    }

    /// Enumerated running status.
    pub fn running_status(&self) -> RunningStatus {
        RunningStatus::from(self.running)
    }
}

/// Decode one event record at the cursor position.
pub fn read_event(cursor: &mut ByteCursor) -> Result<Event, EitError> {
    let event_id = cursor.read_u16()?;
    let mjd = cursor.read_u16()?;
    let start_hour = cursor.read_u8()?;
    let start_minute = cursor.read_u8()?;
    let start_second = cursor.read_u8()?;
    let duration_hour = cursor.read_u8()?;
    let duration_minute = cursor.read_u8()?;
    let duration_second = cursor.read_u8()?;

    let status = cursor.read_u16()?;
    let running = ((status >> 13) & 0x07) as u8;
    let scrambled = status & 0x1000 != 0;
    let loop_length = (status & 0x0FFF) as usize;

    let loop_end = cursor.position() + loop_length;
    let mut short: Option<ShortEvent> = None;
    let mut extended: Vec<ExtendedEvent> = Vec::new();
    while cursor.position() < loop_end {
        match descriptor::read_descriptor(cursor)? {
            Descriptor::ShortEvent(d) => {
                // First short-event descriptor wins.
                if short.is_none() {
                    short = Some(d);
                }
            }
            Descriptor::ExtendedEvent(d) => extended.push(d),
            Descriptor::Unknown(_) => {}
        }
    }

    // Fragments arrive in arbitrary order; the 4-bit descriptor number
    // gives the concatenation order.
    extended.sort_by_key(|d| d.number);
    let extended_text: String = extended.into_iter().map(|d| d.text).collect();

    let short = match short {
        Some(d) => ShortText {
            language: d.language,
            name: d.name,
            text: d.text,
        },
        None => ShortText {
            language: String::new(),
            name: NO_INFORMATION.to_string(),
            text: String::new(),
        },
    };

    Ok(Event {
        event_id,
        status,
        running,
        scrambled,
        start: time::start_timestamp(mjd, start_hour, start_minute, start_second),
        duration: time::duration_seconds(duration_hour, duration_minute, duration_second),
        short,
        extended: ExtendedText {
            text: extended_text,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An extended-event descriptor with no items and a one-char text.
    fn extended_descriptor(number: u8, last: u8, text: u8) -> Vec<u8> {
        vec![
            0x4E,
            0x07, // length
            (number << 4) | last,
            b'e', b'n', b'g',
            0x00, // no items
            0x01, text,
        ]
    }

    #[test]
    fn test_read_event() {
        let mut data = vec![
            0x00, 0x64, // event_id = 100
            0xEB, 0x96, // MJD 60310 = 2024-01-01
            0x12, 0x00, 0x00, // start 12:00:00
            0x01, 0x30, 0x00, // duration 01:30:00
        ];
        // running = 4, not scrambled, loop length = 11
        data.extend_from_slice(&[0x80, 0x0B]);
        data.extend_from_slice(&[
            0x4D, 0x09, // short event, length 9
            b'e', b'n', b'g',
            0x04, b'N', b'e', b'w', b's',
            0x00, // empty text
        ]);

        let mut cursor = ByteCursor::new(&data);
        let event = read_event(&mut cursor).unwrap();

        assert_eq!(event.event_id, 100);
        assert_eq!(event.start, 1_704_110_400); // 2024-01-01T12:00:00Z
        assert_eq!(event.duration, 5400);
        assert_eq!(event.running, 4);
        assert_eq!(event.running_status(), RunningStatus::Running);
        assert!(!event.scrambled);
        assert_eq!(event.status, 0x800B);
        assert_eq!(event.short.name, "News");
        assert_eq!(event.short.text, "");
        assert_eq!(event.extended.text, "");
        assert_eq!(event.end(), 1_704_110_400 + 5400);
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_extended_fragments_ordered_by_number() {
        let mut descriptors = Vec::new();
        // Fragments submitted out of order: 2, 0, 1.
        descriptors.extend(extended_descriptor(2, 2, b'C'));
        descriptors.extend(extended_descriptor(0, 2, b'A'));
        descriptors.extend(extended_descriptor(1, 2, b'B'));

        let mut data = vec![
            0x00, 0x01, // event_id
            0xEB, 0x96, 0x00, 0x00, 0x00, // start
            0x00, 0x05, 0x00, // duration 5 seconds
        ];
        let status = 0x8000u16 | descriptors.len() as u16;
        data.extend_from_slice(&status.to_be_bytes());
        data.extend(descriptors);

        let mut cursor = ByteCursor::new(&data);
        let event = read_event(&mut cursor).unwrap();

        assert_eq!(event.extended.text, "ABC");
        // No short-event descriptor: placeholder title, empty text.
        assert_eq!(event.short.name, NO_INFORMATION);
        assert_eq!(event.short.text, "");
    }

    #[test]
    fn test_first_short_event_wins() {
        let mut data = vec![
            0x00, 0x02,
            0xEB, 0x96, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x05,
        ];
        let descriptors: Vec<u8> = [
            vec![0x4D, 0x07, b'e', b'n', b'g', 0x02, b'o', b'k', 0x00],
            vec![0x4D, 0x07, b'e', b'n', b'g', 0x02, b'n', b'o', 0x00],
        ]
        .concat();
        let status = descriptors.len() as u16;
        data.extend_from_slice(&status.to_be_bytes());
        data.extend(descriptors);

        let event = read_event(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(event.short.name, "ok");
        assert_eq!(event.running, 0);
        assert!(!event.scrambled);
    }

    #[test]
    fn test_scrambled_flag() {
        let data = [
            0x00, 0x03,
            0xEB, 0x96, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x05,
            0x10, 0x00, // free_CA set, empty descriptor loop
        ];
        let event = read_event(&mut ByteCursor::new(&data)).unwrap();
        assert!(event.scrambled);
    }

    #[test]
    fn test_event_serializes_to_store_shape() {
        let data = [
            0x00, 0x64,
            0xEB, 0x96, 0x12, 0x00, 0x00,
            0x01, 0x30, 0x00,
            0x80, 0x00,
        ];
        let event = read_event(&mut ByteCursor::new(&data)).unwrap();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventId"], 100);
        assert_eq!(json["running"], 4);
        assert_eq!(json["scrambled"], false);
        assert_eq!(json["start"], 1_704_110_400);
        assert_eq!(json["duration"], 5400);
        assert_eq!(json["short"]["name"], NO_INFORMATION);
        assert_eq!(json["extended"]["text"], "");
    }
}
