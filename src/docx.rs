use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::DocxError;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const FALLBACK_STYLE: &str = "Normal";

/// One body paragraph: resolved style name and raw (untrimmed) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub style: String,
    pub text: String,
}

/// Read the body paragraphs of a `.docx` file in document order.
pub fn read_paragraphs(path: &Path) -> Result<Vec<Paragraph>, DocxError> {
    let file = File::open(path)?;
    read_paragraphs_from(BufReader::new(file))
}

pub fn read_paragraphs_from<R: Read + Seek>(reader: R) -> Result<Vec<Paragraph>, DocxError> {
    let mut archive = ZipArchive::new(reader)?;
    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(xml) => parse_styles(&xml)?,
        None => StyleMap::default(),
    };
    let document =
        read_part(&mut archive, DOCUMENT_PART)?.ok_or(DocxError::MissingPart(DOCUMENT_PART))?;
    parse_body(&document, &styles)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, DocxError> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(Some(xml))
}

// ── Styles ──

/// Paragraph style id → display name. Without a styles part, names are derived from the ids.
#[derive(Debug, Default)]
struct StyleMap {
    names: Option<HashMap<String, String>>,
    default_name: Option<String>,
}

impl StyleMap {
    fn resolve(&self, style_id: Option<&str>) -> String {
        let named = match &self.names {
            Some(names) => style_id.and_then(|id| names.get(id)).cloned(),
            None => style_id.map(builtin_name),
        };
        named.unwrap_or_else(|| {
            self.default_name
                .clone()
                .unwrap_or_else(|| FALLBACK_STYLE.to_string())
        })
    }
}

/// Name Word gives a built-in style id: `Heading2` → `heading 2`, `ListBullet2` →
/// `List Bullet 2`, `IntenseQuote` → `Intense Quote`. Other ids come back as they are.
fn builtin_name(id: &str) -> String {
    if let Some(level) = id.strip_prefix("Heading") {
        if !level.is_empty() && level.bytes().all(|b| b.is_ascii_digit()) {
            return format!("heading {}", level);
        }
    }
    if !id.starts_with(|c: char| c.is_ascii_uppercase())
        || !id.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return id.to_string();
    }
    let mut name = String::with_capacity(id.len() + 4);
    let mut prev: Option<char> = None;
    for c in id.chars() {
        let boundary = match prev {
            Some(p) => {
                (c.is_ascii_uppercase() && p.is_ascii_lowercase())
                    || (c.is_ascii_digit() && p.is_ascii_alphabetic())
            }
            None => false,
        };
        if boundary {
            name.push(' ');
        }
        name.push(c);
        prev = Some(c);
    }
    name
}

fn parse_styles(xml: &str) -> Result<StyleMap, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut names = HashMap::new();
    let mut default_name = None;
    // (style id, is default) of the paragraph style whose <w:name> is still pending
    let mut pending: Option<(String, bool)> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                b"style" => {
                    pending = None;
                    if attr(&e, b"type")?.as_deref() == Some("paragraph") {
                        if let Some(id) = attr(&e, b"styleId")? {
                            let is_default =
                                matches!(attr(&e, b"default")?.as_deref(), Some("1" | "true" | "on"));
                            pending = Some((id, is_default));
                        }
                    }
                }
                b"name" => {
                    if let Some((id, is_default)) = pending.take() {
                        if let Some(name) = attr(&e, b"val")? {
                            if is_default {
                                default_name = Some(name.clone());
                            }
                            names.insert(id, name);
                        }
                    }
                }
                _ => {}
            },
            Event::End(e) if e.local_name().as_ref() == b"style" => pending = None,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(StyleMap {
        names: Some(names),
        default_name,
    })
}

/// Value of the attribute with the given local name, ignoring its namespace prefix.
fn attr(e: &BytesStart, local: &[u8]) -> Result<Option<String>, DocxError> {
    for a in e.attributes() {
        let a = a?;
        if a.key.local_name().as_ref() == local {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

// ── Body ──

struct OpenParagraph {
    level: usize,
    style_id: Option<String>,
    text: String,
}

/// Tracks element nesting so only direct `<w:body>` paragraphs and their own runs count.
/// Levels are the number of open ancestors of an element.
#[derive(Default)]
struct BodyWalker {
    paragraphs: Vec<Paragraph>,
    body: Option<usize>,
    para: Option<OpenParagraph>,
    hyperlink: Option<usize>,
    run: Option<usize>,
    in_text: bool,
}

fn is_child(parent: Option<usize>, level: usize) -> bool {
    parent.is_some_and(|p| p + 1 == level)
}

impl BodyWalker {
    fn para_level(&self) -> Option<usize> {
        self.para.as_ref().map(|p| p.level)
    }

    fn open(&mut self, e: &BytesStart, level: usize) -> Result<(), DocxError> {
        match e.local_name().as_ref() {
            b"body" => self.body = Some(level),
            b"p" if self.para.is_none() && is_child(self.body, level) => {
                self.para = Some(OpenParagraph {
                    level,
                    style_id: None,
                    text: String::new(),
                });
            }
            b"hyperlink" if is_child(self.para_level(), level) => self.hyperlink = Some(level),
            b"r" if is_child(self.para_level(), level) || is_child(self.hyperlink, level) => {
                self.run = Some(level)
            }
            b"t" if is_child(self.run, level) => self.in_text = true,
            _ => self.leaf(e, level)?,
        }
        Ok(())
    }

    /// Elements that carry meaning through attributes or by their presence alone.
    fn leaf(&mut self, e: &BytesStart, level: usize) -> Result<(), DocxError> {
        let in_run = is_child(self.run, level);
        let style_level = self.para_level().map(|p| p + 2);
        match e.local_name().as_ref() {
            b"pStyle" if style_level == Some(level) => {
                let id = attr(e, b"val")?;
                if let Some(p) = self.para.as_mut() {
                    p.style_id = id;
                }
            }
            b"tab" | b"ptab" if in_run => self.push_text("\t"),
            // Page and column breaks carry no text.
            b"br" if in_run => {
                if matches!(attr(e, b"type")?.as_deref(), None | Some("textWrapping")) {
                    self.push_text("\n");
                }
            }
            b"cr" if in_run => self.push_text("\n"),
            b"noBreakHyphen" if in_run => self.push_text("-"),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8], level: usize, styles: &StyleMap) {
        match name {
            b"t" => self.in_text = false,
            b"r" if self.run == Some(level) => self.run = None,
            b"hyperlink" if self.hyperlink == Some(level) => self.hyperlink = None,
            b"p" if self.para_level() == Some(level) => {
                if let Some(p) = self.para.take() {
                    self.paragraphs.push(Paragraph {
                        style: styles.resolve(p.style_id.as_deref()),
                        text: p.text,
                    });
                }
            }
            b"body" => self.body = None,
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(p) = self.para.as_mut() {
            p.text.push_str(text);
        }
    }
}

fn parse_body(xml: &str, styles: &StyleMap) -> Result<Vec<Paragraph>, DocxError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut walker = BodyWalker::default();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                walker.open(&e, depth)?;
                depth += 1;
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"p" {
                    // <w:p/> has no runs and no pStyle
                    if walker.para.is_none() && is_child(walker.body, depth) {
                        walker.paragraphs.push(Paragraph {
                            style: styles.resolve(None),
                            text: String::new(),
                        });
                    }
                } else {
                    walker.leaf(&e, depth)?;
                }
            }
            Event::Text(e) if walker.in_text => {
                let text = e.unescape()?;
                walker.push_text(&text);
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                walker.close(e.local_name().as_ref(), depth, styles);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(walker.paragraphs)
}
