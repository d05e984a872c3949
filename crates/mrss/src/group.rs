// ABOUTME: media:group extraction, where alternate renditions inherit from the group default.
// ABOUTME: Chains inheritance item -> group -> default member -> other members.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coerce::parse_bool;
use crate::element::{MarkupElement, MEDIA_RSS_NAMESPACE};
use crate::media::Media;

/// Alternate renditions of one logical media object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaGroup {
    media: Vec<Media>,
    default_index: Option<usize>,
}

impl MediaGroup {
    /// Builds the group's members from its media:content children.
    ///
    /// The group element's own attributes and thumbnails form the base for the
    /// member marked `isDefault="true"`; that member is then the base for the rest.
    /// `item_base` supplies item-level values the group itself leaves unset.
    pub fn from_element<E: MarkupElement>(group: &E, item_base: Option<&Media>) -> Self {
        let group_level = Media::from_element(group, item_base);
        let contents = group.children(MEDIA_RSS_NAMESPACE, "content");

        let default_index = contents
            .iter()
            .position(|c| parse_bool(c.attribute("isDefault")) == Some(true));
        let default_media =
            default_index.map(|i| Media::from_element(contents[i], Some(&group_level)));
        let base = default_media.as_ref().unwrap_or(&group_level);

        let media = contents
            .iter()
            .enumerate()
            .map(|(i, content)| match (&default_media, default_index) {
                (Some(default), Some(idx)) if idx == i => default.clone(),
                _ => Media::from_element(*content, Some(base)),
            })
            .collect::<Vec<_>>();

        debug!(
            members = media.len(),
            has_default = default_index.is_some(),
            "extracted media group"
        );

        MediaGroup {
            media,
            default_index,
        }
    }

    /// Members in document order.
    pub fn media(&self) -> &[Media] {
        &self.media
    }

    /// The member marked default in markup.
    ///
    /// Other members may report `is_default() == Some(true)` after inheriting from it,
    /// so this tracks the original position instead of the flag.
    pub fn default_media(&self) -> Option<&Media> {
        self.default_index.and_then(|i| self.media.get(i))
    }

    /// The default member, else the first one.
    pub fn primary(&self) -> Option<&Media> {
        self.default_media().or_else(|| self.media.first())
    }

    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }
}
