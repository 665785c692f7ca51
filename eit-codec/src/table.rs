//! Whole-buffer EIT parsing.

use std::collections::BTreeMap;

use log::debug;

use crate::cursor::ByteCursor;
use crate::error::EitError;
use crate::event::Event;
use crate::section;

/// Decoded guide data bucketed
/// `transport stream → service → table → event`.
pub type EitBuckets = BTreeMap<u16, BTreeMap<u16, BTreeMap<u8, BTreeMap<u16, Event>>>>;

/// Parse every section in the buffer, from offset 0 until exhaustion.
///
/// Within a bucket a later decode of the same event id replaces the
/// earlier one. A section whose length field points past the buffer
/// fails the whole remainder of the buffer; there is no partial-section
/// recovery.
pub fn parse_eit(data: &[u8]) -> Result<EitBuckets, EitError> {
    let mut cursor = ByteCursor::new(data);
    let mut buckets = EitBuckets::new();

    while !cursor.is_exhausted() {
        let section = section::read_section(&mut cursor)?;
        debug!(
            "Table 0x{:02X}: {} events for service {} on ts {}",
            section.table_id,
            section.events.len(),
            section.service_id,
            section.transport_stream_id
        );
        let table = buckets
            .entry(section.transport_stream_id)
            .or_default()
            .entry(section.service_id)
            .or_default()
            .entry(section.table_id)
            .or_default();
        for event in section.events {
            table.insert(event.event_id, event);
        }
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One section with a single short-event-only event record.
    fn titled_section(
        table_id: u8,
        ts_id: u16,
        service_id: u16,
        event_id: u16,
        title: &str,
    ) -> Vec<u8> {
        let mut descriptor = vec![0x4D, (3 + 1 + title.len() + 1) as u8];
        descriptor.extend_from_slice(b"eng");
        descriptor.push(title.len() as u8);
        descriptor.extend_from_slice(title.as_bytes());
        descriptor.push(0x00);

        let mut event = event_id.to_be_bytes().to_vec();
        event.extend_from_slice(&[
            0xEB, 0x96, // MJD 60310 = 2024-01-01
            0x12, 0x00, 0x00, // start 12:00:00
            0x01, 0x30, 0x00, // duration 01:30:00
        ]);
        event.extend_from_slice(&(0x8000u16 | descriptor.len() as u16).to_be_bytes());
        event.extend(descriptor);

        let section_length = 11 + event.len() + 4;
        let mut data = vec![table_id];
        data.extend_from_slice(&(section_length as u16).to_be_bytes());
        data.extend_from_slice(&service_id.to_be_bytes());
        data.push(0x02); // version 1
        data.push(0x00);
        data.push(0x00);
        data.extend_from_slice(&ts_id.to_be_bytes());
        data.extend_from_slice(&0x0001u16.to_be_bytes());
        data.push(0x00);
        data.push(table_id);
        data.extend(event);
        data.extend_from_slice(&[0x00; 4]); // CRC placeholder
        data
    }

    #[test]
    fn test_parse_empty_buffer() {
        assert!(parse_eit(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_end_to_end() {
        let data = titled_section(0x50, 10000, 55, 100, "News");
        let buckets = parse_eit(&data).unwrap();

        let event = &buckets[&10000][&55][&0x50][&100];
        assert_eq!(event.event_id, 100);
        assert_eq!(event.start, 1_704_110_400); // 2024-01-01T12:00:00Z
        assert_eq!(event.duration, 5400);
        assert_eq!(event.running, 4);
        assert!(!event.scrambled);
        assert_eq!(event.short.name, "News");
        assert_eq!(event.short.text, "");
    }

    #[test]
    fn test_multiple_sections_bucketed() {
        let mut data = titled_section(0x50, 10000, 55, 100, "One");
        data.extend(titled_section(0x51, 10000, 55, 101, "Two"));
        data.extend(titled_section(0x50, 10000, 56, 100, "Three"));

        let buckets = parse_eit(&data).unwrap();
        assert_eq!(buckets.len(), 1);
        let services = &buckets[&10000];
        assert_eq!(services.len(), 2);
        assert_eq!(services[&55][&0x50][&100].short.name, "One");
        assert_eq!(services[&55][&0x51][&101].short.name, "Two");
        assert_eq!(services[&56][&0x50][&100].short.name, "Three");
    }

    #[test]
    fn test_later_section_replaces_event() {
        let mut data = titled_section(0x50, 10000, 55, 100, "Old");
        data.extend(titled_section(0x50, 10000, 55, 100, "New"));

        let buckets = parse_eit(&data).unwrap();
        assert_eq!(buckets[&10000][&55][&0x50].len(), 1);
        assert_eq!(buckets[&10000][&55][&0x50][&100].short.name, "New");
    }

    #[test]
    fn test_truncated_buffer_aborts() {
        let mut data = titled_section(0x50, 10000, 55, 100, "News");
        data.truncate(data.len() - 10);
        assert!(parse_eit(&data).is_err());
    }
}
