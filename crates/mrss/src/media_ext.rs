// ABOUTME: Scans raw RSS/Atom bytes for Media RSS elements attached to each item.
// ABOUTME: Builds per-item media entries and groups with item-level fallback values.

use std::collections::HashMap;

use tracing::debug;

use crate::element::{MarkupElement, XmlElement, MEDIA_RSS_NAMESPACE};
use crate::error::MediaError;
use crate::group::MediaGroup;
use crate::media::Media;

/// Media RSS data found on a single item/entry.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemMedia {
    /// Item guid (RSS) or id (Atom) text, if present.
    pub guid: Option<String>,
    /// Item-level values: the item's own media:thumbnail children.
    pub item_level: Media,
    /// media:content elements placed directly on the item.
    pub contents: Vec<Media>,
    /// media:group elements on the item.
    pub groups: Vec<MediaGroup>,
}

impl ItemMedia {
    fn from_element(item: &XmlElement) -> Self {
        let guid = item
            .elements()
            .iter()
            .find(|e| e.name() == "guid" || e.name() == "id")
            .map(|e| e.text().to_string())
            .filter(|g| !g.is_empty());

        let item_level = Media::from_element(item, None);
        let contents = item
            .children(MEDIA_RSS_NAMESPACE, "content")
            .into_iter()
            .map(|c| Media::from_element(c, Some(&item_level)))
            .collect();
        let groups = item
            .children(MEDIA_RSS_NAMESPACE, "group")
            .into_iter()
            .map(|g| MediaGroup::from_element(g, Some(&item_level)))
            .collect();

        ItemMedia {
            guid,
            item_level,
            contents,
            groups,
        }
    }

    /// The first group's primary member, else the first direct media:content.
    pub fn primary_media(&self) -> Option<&Media> {
        self.groups
            .iter()
            .find_map(MediaGroup::primary)
            .or_else(|| self.contents.first())
    }

    /// First thumbnail URL of the primary media, else of the item itself.
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.primary_media()
            .and_then(|m| m.thumbnails().iter().find_map(|t| t.url()))
            .or_else(|| self.item_level.thumbnails().iter().find_map(|t| t.url()))
    }

    /// True if the item carries any Media RSS element.
    pub fn has_media(&self) -> bool {
        !self.contents.is_empty()
            || self.groups.iter().any(|g| !g.is_empty())
            || !self.item_level.thumbnails().is_empty()
    }
}

/// Media RSS data for a complete feed.
#[derive(Debug, Default, Clone)]
pub struct ParsedMediaExtensions {
    /// Map from item guid (or `__index_N` if no guid) to item media.
    pub items: HashMap<String, ItemMedia>,
    /// Items by index for fallback lookup.
    pub items_by_index: Vec<ItemMedia>,
}

/// Parses Media RSS elements from raw RSS/Atom bytes.
///
/// Broken markup does not discard the feed: items read before the damage are kept.
/// Fails only when the bytes contain no element at all.
pub fn parse_media_extensions(data: &[u8]) -> Result<ParsedMediaExtensions, MediaError> {
    let root = XmlElement::parse_lenient(data)?;
    let mut result = ParsedMediaExtensions::default();

    for (index, item) in root
        .descendants("item")
        .into_iter()
        .chain(root.descendants("entry"))
        .enumerate()
    {
        let item_media = ItemMedia::from_element(item);
        let key = item_media
            .guid
            .clone()
            .unwrap_or_else(|| format!("__index_{}", index));
        result.items.insert(key, item_media.clone());
        result.items_by_index.push(item_media);
    }

    debug!(
        items = result.items_by_index.len(),
        with_media = result.items_by_index.iter().filter(|i| i.has_media()).count(),
        "scanned media rss extensions"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rss_items_keyed_by_guid() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
    <channel>
        <item>
            <guid>ep-1</guid>
            <media:content url="https://cdn/ep1.mp3" type="audio/mpeg" medium="audio"/>
        </item>
        <item>
            <title>No guid</title>
        </item>
    </channel>
</rss>"#;

        let ext = parse_media_extensions(rss.as_bytes()).unwrap();
        assert_eq!(ext.items_by_index.len(), 2);

        let ep1 = ext.items.get("ep-1").unwrap();
        assert_eq!(ep1.contents.len(), 1);
        assert_eq!(ep1.primary_media().and_then(|m| m.url()), Some("https://cdn/ep1.mp3"));

        let second = ext.items.get("__index_1").unwrap();
        assert!(!second.has_media());
        assert!(second.primary_media().is_none());
    }

    #[test]
    fn test_item_thumbnail_is_fallback_for_contents() {
        let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <media:thumbnail url="https://cdn/item.jpg"/>
            <media:content url="https://cdn/a.mp4"/>
        </item></channel></rss>"#;

        let ext = parse_media_extensions(rss.as_bytes()).unwrap();
        let item = &ext.items_by_index[0];
        assert_eq!(item.contents[0].thumbnails().len(), 1);
        assert_eq!(item.thumbnail_url(), Some("https://cdn/item.jpg"));
    }

    #[test]
    fn test_group_preferred_over_direct_content() {
        let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <media:content url="https://cdn/direct.mp4"/>
            <media:group>
                <media:content url="https://cdn/alt.mp4"/>
                <media:content url="https://cdn/main.mp4" isDefault="true"/>
            </media:group>
        </item></channel></rss>"#;

        let ext = parse_media_extensions(rss.as_bytes()).unwrap();
        let item = &ext.items_by_index[0];
        assert_eq!(item.groups.len(), 1);
        assert_eq!(
            item.primary_media().and_then(|m| m.url()),
            Some("https://cdn/main.mp4")
        );
    }

    #[test]
    fn test_atom_entries() {
        let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
            <entry>
                <id>urn:entry:1</id>
                <media:content url="https://cdn/photo.jpg" medium="image" width="800"/>
            </entry>
        </feed>"#;

        let ext = parse_media_extensions(atom.as_bytes()).unwrap();
        let entry = ext.items.get("urn:entry:1").unwrap();
        assert_eq!(entry.contents[0].width(), Some(800));
    }

    #[test]
    fn test_bad_tag_in_one_item_keeps_the_others() {
        let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel>
            <item>
                <guid>a</guid>
                <media:content url="https://cdn/a.mp4" medium="video"/>
            </item>
            <item>
                <guid>b</guid>
                <description>x<br>y</description>
                <media:content url="https://cdn/b.mp4"/>
            </item>
        </channel></rss>"#;

        let ext = parse_media_extensions(rss.as_bytes()).unwrap();
        let a = ext.items.get("a").unwrap();
        assert_eq!(a.primary_media().and_then(|m| m.url()), Some("https://cdn/a.mp4"));
        let b = ext.items.get("b").unwrap();
        assert_eq!(b.primary_media().and_then(|m| m.url()), Some("https://cdn/b.mp4"));
    }

    #[test]
    fn test_truncated_document_keeps_read_items() {
        let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel>
            <item><guid>a</guid><media:content url="https://cdn/a.mp3"/></item>
            <item><guid>b</guid><media:content url="https://cdn/b"#;

        let ext = parse_media_extensions(rss.as_bytes()).unwrap();
        assert_eq!(
            ext.items.get("a").and_then(|i| i.primary_media()).and_then(|m| m.url()),
            Some("https://cdn/a.mp3")
        );
    }

    #[test]
    fn test_item_thumbnails_reach_group_members() {
        let rss = r#"<rss xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
            <media:thumbnail url="https://cdn/item.jpg"/>
            <media:group>
                <media:content url="https://cdn/a.mp4" isDefault="true"/>
                <media:content url="https://cdn/b.mp4"/>
            </media:group>
        </item></channel></rss>"#;

        let ext = parse_media_extensions(rss.as_bytes()).unwrap();
        let group = &ext.items_by_index[0].groups[0];
        assert_eq!(group.media().len(), 2);
        for media in group.media() {
            let urls: Vec<_> = media.thumbnails().iter().map(|t| t.url()).collect();
            assert_eq!(urls, vec![Some("https://cdn/item.jpg")]);
        }
    }

    #[test]
    fn test_document_without_elements_is_error() {
        assert!(matches!(
            parse_media_extensions(b"   "),
            Err(MediaError::Empty)
        ));
    }
}
