//! Element-path walking over quick-xml events.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::Result;

/// What the walker reports, with the element path from the document root.
#[derive(Debug)]
pub enum Node<'a> {
    /// Text content of the innermost element of `path`.
    Text { path: &'a [String], text: String },
    /// `path` was just closed; its last segment is the closed element.
    Close { path: &'a [String] },
}

/// Walks `content`, calling `visit` for every text node and closing tag.
/// Namespace prefixes are dropped from element names.
pub fn walk(content: &str, mut visit: impl FnMut(Node<'_>)) -> Result<()> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::End(_) => {
                visit(Node::Close { path: &path });
                path.pop();
            }
            Event::Text(e) => {
                let text = e.unescape()?.trim().to_string();
                if !text.is_empty() {
                    visit(Node::Text { path: &path, text });
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).trim().to_string();
                if !text.is_empty() {
                    visit(Node::Text { path: &path, text });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

/// `path` equals `expected` segment by segment.
pub fn is_path(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}
