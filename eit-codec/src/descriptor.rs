//! Event descriptor decoding.
//!
//! Every descriptor is a 1-byte tag, a 1-byte length and a payload. Only
//! the short-event (0x4D) and extended-event (0x4E) descriptors carry
//! data the guide uses; any other tag is skipped by its declared length
//! so future descriptor kinds never break the decoder.

use crate::cursor::ByteCursor;
use crate::error::EitError;
use crate::text::decode_text;

/// Descriptor tags recognized by the event decoder.
pub mod tag {
    /// Short event descriptor: title and one-line synopsis.
    pub const SHORT_EVENT: u8 = 0x4D;
    /// Extended event descriptor: one fragment of the long synopsis.
    pub const EXTENDED_EVENT: u8 = 0x4E;
}

/// Title and short synopsis of an event (tag 0x4D).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortEvent {
    /// ISO 639-2 language code.
    pub language: String,
    /// Event title.
    pub name: String,
    /// One-line synopsis.
    pub text: String,
}

/// One fragment of an event's long synopsis (tag 0x4E).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedEvent {
    /// Position of this fragment in the synopsis (0..=15).
    pub number: u8,
    /// Position of the final fragment.
    pub last_number: u8,
    /// ISO 639-2 language code.
    pub language: String,
    /// Synopsis fragment.
    pub text: String,
}

/// A decoded descriptor, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    ShortEvent(ShortEvent),
    ExtendedEvent(ExtendedEvent),
    /// Unrecognized tag; the payload was skipped by its declared length.
    Unknown(u8),
}

/// Decode one descriptor at the cursor position.
///
/// Recognized descriptors consume their own internal length fields;
/// an unknown tag advances the cursor by exactly its declared length.
pub fn read_descriptor(cursor: &mut ByteCursor) -> Result<Descriptor, EitError> {
    let tag = cursor.read_u8()?;
    let length = cursor.read_u8()? as usize;
    let payload_start = cursor.position();

    match tag {
        tag::SHORT_EVENT => read_short_event(cursor).map(Descriptor::ShortEvent),
        tag::EXTENDED_EVENT => read_extended_event(cursor).map(Descriptor::ExtendedEvent),
        other => {
            cursor.seek(payload_start + length);
            Ok(Descriptor::Unknown(other))
        }
    }
}

fn language_code(raw: &[u8]) -> String {
    raw.iter().map(|&b| b as char).collect()
}

fn read_short_event(cursor: &mut ByteCursor) -> Result<ShortEvent, EitError> {
    let language = language_code(cursor.read_bytes(3)?);
    let name_length = cursor.read_u8()? as usize;
    let name = decode_text(cursor.read_bytes(name_length)?);
    let text_length = cursor.read_u8()? as usize;
    let text = decode_text(cursor.read_bytes(text_length)?);

    Ok(ShortEvent {
        language,
        name,
        text,
    })
}

fn read_extended_event(cursor: &mut ByteCursor) -> Result<ExtendedEvent, EitError> {
    let numbers = cursor.read_u8()?;
    let number = numbers >> 4;
    let last_number = numbers & 0x0F;
    let language = language_code(cursor.read_bytes(3)?);

    // Item sub-loop of (description, value) pairs; walked and discarded.
    let items_length = cursor.read_u8()? as usize;
    let items_end = cursor.position() + items_length;
    while cursor.position() < items_end {
        let description_length = cursor.read_u8()? as usize;
        cursor.read_bytes(description_length)?;
        let item_length = cursor.read_u8()? as usize;
        cursor.read_bytes(item_length)?;
    }

    let text_length = cursor.read_u8()? as usize;
    let text = decode_text(cursor.read_bytes(text_length)?);

    Ok(ExtendedEvent {
        number,
        last_number,
        language,
        text,
    })
}
