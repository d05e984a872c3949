// ABOUTME: Media descriptor extraction from media:content (and similar) elements.
// ABOUTME: Applies field-level fallback to an optional base descriptor from the same group.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::coerce::{non_blank, parse_bool, parse_count, parse_medium};
use crate::element::{MarkupElement, MEDIA_RSS_NAMESPACE};
use crate::thumbnail::Thumbnail;

/// General type of a media object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medium {
    Image,
    Audio,
    Video,
    Document,
    Executable,
    #[default]
    Unknown,
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Medium::Image => "image",
            Medium::Audio => "audio",
            Medium::Video => "video",
            Medium::Document => "document",
            Medium::Executable => "executable",
            Medium::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Metadata of one media object.
///
/// Built once by [`Media::from_element`]; fields are read through accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    url: Option<String>,
    file_size: Option<u64>,
    mime_type: Option<String>,
    medium: Medium,
    is_default: Option<bool>,
    duration: Option<u32>,
    height: Option<u32>,
    width: Option<u32>,
    language: Option<String>,
    thumbnails: Vec<Thumbnail>,
}

impl Media {
    /// Builds a descriptor from `element`'s attributes and its media:thumbnail children.
    ///
    /// When `base` is given, every field the element leaves unset is taken from it;
    /// `Medium::Unknown` counts as unset.
    /// Thumbnails fall back as a whole: the base list is used only if the element has none.
    pub fn from_element<E: MarkupElement>(element: &E, base: Option<&Media>) -> Self {
        let mut media = Media {
            url: non_blank(element.attribute("url")),
            file_size: parse_count(element.attribute("fileSize")),
            mime_type: non_blank(element.attribute("type")),
            medium: parse_medium(element.attribute("medium")),
            is_default: parse_bool(element.attribute("isDefault")),
            duration: parse_count(element.attribute("duration")),
            height: parse_count(element.attribute("height")),
            width: parse_count(element.attribute("width")),
            language: non_blank(element.attribute("lang")),
            thumbnails: element
                .children(MEDIA_RSS_NAMESPACE, "thumbnail")
                .into_iter()
                .map(Thumbnail::from_element)
                .collect(),
        };

        if let Some(base) = base {
            media.inherit_from(base);
        }
        media
    }

    fn inherit_from(&mut self, base: &Media) {
        fill(&mut self.url, &base.url);
        fill(&mut self.file_size, &base.file_size);
        fill(&mut self.mime_type, &base.mime_type);
        fill(&mut self.is_default, &base.is_default);
        fill(&mut self.duration, &base.duration);
        fill(&mut self.height, &base.height);
        fill(&mut self.width, &base.width);
        fill(&mut self.language, &base.language);

        if self.medium == Medium::Unknown {
            self.medium = base.medium;
        }

        if self.thumbnails.is_empty() && !base.thumbnails.is_empty() {
            trace!(
                count = base.thumbnails.len(),
                "media entry inherits thumbnails from base"
            );
            self.thumbnails = base.thumbnails.clone();
        }
    }

    /// Direct URL of the media object.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Size in bytes.
    pub fn file_size(&self) -> Option<u64> {
        self.file_size
    }

    /// MIME type from the `type` attribute.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    /// Whether this entry is the representative one of its group.
    pub fn is_default(&self) -> Option<bool> {
        self.is_default
    }

    /// Play length in seconds.
    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    /// Language tag from the `lang` attribute, unvalidated.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Thumbnails in document order.
    pub fn thumbnails(&self) -> &[Thumbnail] {
        &self.thumbnails
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, fallback: &Option<T>) {
    if slot.is_none() {
        slot.clone_from(fallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::XmlElement;
    use pretty_assertions::assert_eq;

    fn parse(xml: &str) -> XmlElement {
        XmlElement::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_reads_every_attribute() {
        let el = parse(
            r#"<media:content xmlns:media="http://search.yahoo.com/mrss/"
                url="https://cdn/v.mp4" fileSize="12216320" type="video/mp4"
                medium="video" isDefault="true" duration="185"
                height="200" width="300" lang="en"/>"#,
        );
        let media = Media::from_element(&el, None);

        assert_eq!(media.url(), Some("https://cdn/v.mp4"));
        assert_eq!(media.file_size(), Some(12_216_320));
        assert_eq!(media.mime_type(), Some("video/mp4"));
        assert_eq!(media.medium(), Medium::Video);
        assert_eq!(media.is_default(), Some(true));
        assert_eq!(media.duration(), Some(185));
        assert_eq!(media.height(), Some(200));
        assert_eq!(media.width(), Some(300));
        assert_eq!(media.language(), Some("en"));
        assert!(media.thumbnails().is_empty());
    }

    #[test]
    fn test_medium_inherits_when_unknown() {
        let base = Media::from_element(&parse(r#"<content medium="audio"/>"#), None);
        let own = Media::from_element(&parse(r#"<content medium="image"/>"#), Some(&base));
        let unset = Media::from_element(&parse(r#"<content medium="hologram"/>"#), Some(&base));

        assert_eq!(own.medium(), Medium::Image);
        assert_eq!(unset.medium(), Medium::Audio);
    }

    #[test]
    fn test_blank_text_is_filled_from_base() {
        let base = Media::from_element(
            &parse(r#"<content url="https://cdn/base.mp3" type="audio/mpeg" lang="de"/>"#),
            None,
        );
        let media = Media::from_element(&parse(r#"<content url=" " type="" />"#), Some(&base));

        assert_eq!(media.url(), Some("https://cdn/base.mp3"));
        assert_eq!(media.mime_type(), Some("audio/mpeg"));
        assert_eq!(media.language(), Some("de"));
    }

    #[test]
    fn test_explicit_false_is_kept() {
        let base = Media::from_element(&parse(r#"<content isDefault="true"/>"#), None);
        let media = Media::from_element(&parse(r#"<content isDefault="false"/>"#), Some(&base));
        assert_eq!(media.is_default(), Some(false));
    }

    #[test]
    fn test_medium_display_and_serde() {
        assert_eq!(Medium::Executable.to_string(), "executable");
        assert_eq!(serde_json::to_string(&Medium::Video).unwrap(), "\"video\"");
        assert_eq!(
            serde_json::from_str::<Medium>("\"document\"").unwrap(),
            Medium::Document
        );
    }
}
