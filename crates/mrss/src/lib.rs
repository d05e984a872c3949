// ABOUTME: Media RSS metadata extraction library for digests-core.
// ABOUTME: Provides typed media/thumbnail descriptors with default-member inheritance.

pub mod coerce;
pub mod element;
pub mod error;
pub mod group;
pub mod media;
pub mod media_ext;
pub mod thumbnail;
pub mod time_offset;

pub use coerce::{parse_bool, parse_int, parse_medium};
pub use element::{MarkupElement, XmlElement, MAX_DEPTH, MEDIA_RSS_NAMESPACE};
pub use error::MediaError;
pub use group::MediaGroup;
pub use media::{Media, Medium};
pub use media_ext::{parse_media_extensions, ItemMedia, ParsedMediaExtensions};
pub use thumbnail::Thumbnail;
pub use time_offset::parse_time_offset;
