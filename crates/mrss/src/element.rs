// ABOUTME: Markup element capability used by the extractors, plus a quick-xml backed tree.
// ABOUTME: Resolves namespaces so Media RSS children are found regardless of prefix spelling.

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use tracing::debug;

use crate::error::MediaError;

/// Namespace URI of the Media RSS extension.
pub const MEDIA_RSS_NAMESPACE: &str = "http://search.yahoo.com/mrss/";

/// Conventional prefix used by feeds that forget to declare the namespace.
const MEDIA_RSS_PREFIX: &str = "media";

/// The read-only view of a markup element the extractors depend on.
pub trait MarkupElement {
    /// Returns the raw value of the attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Returns the direct children named `local_name` in `namespace`, in document order.
    /// An empty `namespace` selects unqualified children.
    fn children(&self, namespace: &str, local_name: &str) -> Vec<&Self>;
}

/// An owned element of a materialised XML document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    prefix: Option<String>,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    elements: Vec<XmlElement>,
    text: String,
}

impl XmlElement {
    /// Builds the element tree for a complete, well-formed document and returns its root.
    pub fn parse(data: &[u8]) -> Result<XmlElement, MediaError> {
        build(data, false)
    }

    /// Builds as much of the tree as the document allows.
    ///
    /// An end tag closes the nearest open element with the same name, and stray end tags
    /// are ignored. Reading stops at the first reader error or at the depth limit; whatever
    /// is still open is closed. Fails only when no root element was started.
    pub fn parse_lenient(data: &[u8]) -> Result<XmlElement, MediaError> {
        build(data, true)
    }

    fn from_start(ns: &ResolveResult, start: &BytesStart) -> Self {
        let namespace = match ns {
            ResolveResult::Bound(bound) => Some(String::from_utf8_lossy(bound.0).into_owned()),
            _ => None,
        };
        let prefix = start
            .name()
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let raw = String::from_utf8_lossy(&attr.value);
                let value = unescape(&raw)
                    .map(|v| v.into_owned())
                    .ok()
                    .unwrap_or_else(|| raw.to_string());
                (key, value)
            })
            .collect();

        XmlElement {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            prefix,
            namespace,
            attributes,
            elements: Vec::new(),
            text: String::new(),
        }
    }

    /// Local name without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved namespace URI, if the prefix was declared.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Text content with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// All direct child elements in document order.
    pub fn elements(&self) -> &[XmlElement] {
        &self.elements
    }

    /// All descendants with the given local name, in document order.
    pub fn descendants(&self, local_name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        let mut pending: Vec<&XmlElement> = self.elements.iter().rev().collect();
        while let Some(element) = pending.pop() {
            if element.name == local_name {
                found.push(element);
            }
            pending.extend(element.elements.iter().rev());
        }
        found
    }

    fn in_namespace(&self, namespace: &str) -> bool {
        if namespace.is_empty() {
            return self.namespace.is_none() && self.prefix.is_none();
        }
        match self.namespace.as_deref() {
            Some(bound) => same_namespace(bound, namespace),
            None => {
                same_namespace(namespace, MEDIA_RSS_NAMESPACE)
                    && self.prefix.as_deref() == Some(MEDIA_RSS_PREFIX)
            }
        }
    }
}

impl MarkupElement for XmlElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn children(&self, namespace: &str, local_name: &str) -> Vec<&Self> {
        self.elements
            .iter()
            .filter(|child| child.name == local_name && child.in_namespace(namespace))
            .collect()
    }
}

/// Deepest element nesting a tree may have.
pub const MAX_DEPTH: usize = 512;

fn build(data: &[u8], lenient: bool) -> Result<XmlElement, MediaError> {
    let mut reader = NsReader::from_reader(data);
    reader.config_mut().check_end_names = !lenient;
    reader.config_mut().allow_unmatched_ends = lenient;
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    // Start tags minus end tags as the reader counts them; can exceed the stack when
    // lenient closing pops several elements for one end tag.
    let mut reader_depth = 0usize;

    let outcome = loop {
        let step = match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(ref e))) => {
                if reader_depth.max(stack.len()) >= MAX_DEPTH {
                    Err(MediaError::TooDeep { limit: MAX_DEPTH })
                } else {
                    reader_depth += 1;
                    stack.push(XmlElement::from_start(&ns, e));
                    Ok(())
                }
            }
            Ok((ns, Event::Empty(ref e))) => {
                attach(&mut stack, &mut root, XmlElement::from_start(&ns, e))
            }
            Ok((_, Event::End(ref e))) => {
                reader_depth = reader_depth.saturating_sub(1);
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                close(&mut stack, &mut root, &name, lenient)
            }
            Ok((_, Event::Text(ref e))) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.decode().map(|s| s.into_owned()).unwrap_or_default();
                    current.text.push_str(&text);
                }
                Ok(())
            }
            Ok((_, Event::CData(e))) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Ok(())
            }
            Ok((_, Event::GeneralRef(ref e))) => {
                if let Some(current) = stack.last_mut() {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        current.text.push(ch);
                    } else if let Ok(name) = e.decode() {
                        if let Some(resolved) = resolve_predefined_entity(&name) {
                            current.text.push_str(resolved);
                        }
                    }
                }
                Ok(())
            }
            Ok((_, Event::Eof)) => break Ok(()),
            Ok(_) => Ok(()),
            Err(err) => Err(MediaError::from(err)),
        };
        if let Err(err) = step {
            break Err(err);
        }
        buf.clear();
    };

    if !lenient {
        outcome?;
        if let Some(open) = stack.last() {
            return Err(MediaError::Unbalanced {
                element: open.name.clone(),
            });
        }
    } else if let Err(err) = outcome {
        debug!(error = %err, open = stack.len(), "stopped reading markup early");
    }

    while let Some(element) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.elements.push(element),
            None => {
                root.get_or_insert(element);
            }
        }
    }
    root.ok_or(MediaError::Empty)
}

/// Handles an end tag. Strict mode closes the innermost element; lenient mode closes
/// everything up to the nearest element named `name`.
fn close(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    name: &str,
    lenient: bool,
) -> Result<(), MediaError> {
    let open = if lenient {
        stack.iter().rposition(|e| e.name == name)
    } else {
        stack.len().checked_sub(1)
    };
    let open = match open {
        Some(open) => open,
        None if lenient => return Ok(()),
        None => {
            return Err(MediaError::Unbalanced {
                element: name.to_string(),
            })
        }
    };

    while stack.len() > open {
        if let Some(element) = stack.pop() {
            attach(stack, root, element)?;
        }
    }
    Ok(())
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), MediaError> {
    match stack.last_mut() {
        Some(parent) => parent.elements.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(MediaError::MultipleRoots),
    }
    Ok(())
}

/// Namespace URIs compare equal with or without a trailing slash.
fn same_namespace(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}
