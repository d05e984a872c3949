// ABOUTME: Extraction of media:thumbnail elements into Thumbnail records.
// ABOUTME: Uses the same permissive coercion as media entries; no inheritance at this level.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coerce::{non_blank, parse_count};
use crate::element::MarkupElement;
use crate::time_offset::parse_time_offset;

/// A representative image for a media object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    url: Option<String>,
    height: Option<u32>,
    width: Option<u32>,
    time: Option<String>,
}

impl Thumbnail {
    /// Reads `url`, `height`, `width` and `time` from a thumbnail element.
    pub fn from_element<E: MarkupElement>(element: &E) -> Self {
        Thumbnail {
            url: non_blank(element.attribute("url")),
            height: parse_count(element.attribute("height")),
            width: parse_count(element.attribute("width")),
            time: non_blank(element.attribute("time")),
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Raw time attribute, as written in the feed.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Offset into the media object this image was taken from.
    pub fn time_offset(&self) -> Option<Duration> {
        self.time.as_deref().and_then(parse_time_offset)
    }
}
