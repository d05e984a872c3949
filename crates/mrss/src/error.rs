// ABOUTME: Failures of materialising a markup tree from raw feed bytes.
// ABOUTME: Extraction over a built tree is total; only XmlElement::parse can report these.

use thiserror::Error;

/// Why a document could not be turned into an element tree.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read markup: {0}")]
    Reader(#[from] quick_xml::Error),

    /// A start tag was left open at end of input, or an end tag had no start.
    #[error("unbalanced element <{element}>")]
    Unbalanced { element: String },

    #[error("document has more than one root element")]
    MultipleRoots,

    /// Nesting went past the tree's depth limit.
    #[error("elements nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("markup is empty: no root element found")]
    Empty,
}
