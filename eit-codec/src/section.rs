//! EIT section decoding.

use log::trace;

use crate::cursor::ByteCursor;
use crate::error::EitError;
use crate::event::{self, Event};

/// One decoded EIT section.
///
/// Transient: only its events survive into the aggregated guide.
#[derive(Debug, Clone)]
pub struct Section {
    pub table_id: u8,
    pub service_id: u16,
    /// Version number (5 bits).
    pub version_number: u8,
    pub section_number: u8,
    pub last_section_number: u8,
    pub transport_stream_id: u16,
    pub original_network_id: u16,
    pub segment_last_section_number: u8,
    pub last_table_id: u8,
    /// Events sorted ascending by event id.
    pub events: Vec<Event>,
}

/// Decode one section at the cursor position.
///
/// The section end is fixed from the 12-bit length field before any
/// event is read, and the cursor is forced there once the event loop
/// finishes; trailing CRC and reserved bytes are skipped that way and
/// the next section starts at the correct offset even if event parsing
/// under- or over-consumed.
pub fn read_section(cursor: &mut ByteCursor) -> Result<Section, EitError> {
    let table_id = cursor.read_u8()?;
    let section_length = (cursor.read_u16()? & 0x0FFF) as usize;
    if section_length > cursor.remaining() {
        return Err(EitError::TruncatedInput {
            offset: cursor.position(),
            needed: section_length,
            available: cursor.remaining(),
        });
    }
    let section_end = cursor.position() + section_length;

    let service_id = cursor.read_u16()?;
    let version_number = (cursor.read_u8()? & 0x3E) >> 1;
    let section_number = cursor.read_u8()?;
    let last_section_number = cursor.read_u8()?;
    let transport_stream_id = cursor.read_u16()?;
    let original_network_id = cursor.read_u16()?;
    let segment_last_section_number = cursor.read_u8()?;
    let last_table_id = cursor.read_u8()?;

    trace!(
        "Section: table 0x{:02X} service {} ts {} section {}/{}",
        table_id,
        service_id,
        transport_stream_id,
        section_number,
        last_section_number
    );

    let mut events = Vec::new();
    // Keep reading while at least five bytes remain before the section
    // end; the trailing four CRC bytes never start an event.
    while cursor.position() + 4 < section_end {
        events.push(event::read_event(cursor)?);
    }
    events.sort_by_key(|e| e.event_id);

    cursor.seek(section_end);

    Ok(Section {
        table_id,
        service_id,
        version_number,
        section_number,
        last_section_number,
        transport_stream_id,
        original_network_id,
        segment_last_section_number,
        last_table_id,
        events,
    })
}
