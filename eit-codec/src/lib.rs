//! DVB EIT (Event Information Table) decoding.
//!
//! This crate decodes the binary program-guide tables broadcast inside a
//! digital television transport stream (ETSI EN 300 468) into normalized
//! event records: identifiers, UTC start time, duration, running status
//! and the title/synopsis texts carried in the descriptor loop.
//!
//! Decoding is pure and synchronous: a raw capture buffer goes in,
//! events bucketed by transport stream, service and table id come out.
//! The only failure mode is [`EitError::TruncatedInput`], raised when a
//! length field promises bytes the buffer does not contain; unknown
//! descriptor tags and unknown character tables never fail.
//!
//! # Example
//!
//! ```rust
//! use eit_codec::parse_eit;
//!
//! // An empty capture decodes to an empty guide.
//! let buckets = parse_eit(&[]).unwrap();
//! assert!(buckets.is_empty());
//! ```

pub mod cursor;
pub mod descriptor;
pub mod error;
pub mod event;
pub mod section;
pub mod table;
pub mod text;
pub mod time;

pub use cursor::ByteCursor;
pub use descriptor::{Descriptor, ExtendedEvent, ShortEvent};
pub use error::EitError;
pub use event::{Event, ExtendedText, RunningStatus, ShortText};
pub use section::Section;
pub use table::{parse_eit, EitBuckets};
