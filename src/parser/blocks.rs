use serde::{Deserialize, Serialize};

use crate::docx::Paragraph;

/// One unit of article content. Serialized with the `type` tags the site renderer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "p")]
    Paragraph { text: String },
    #[serde(rename = "h2")]
    Heading { text: String },
    #[serde(rename = "quote")]
    Quote { text: String },
    #[serde(rename = "ul")]
    UnorderedList { items: Vec<String> },
    #[serde(rename = "ol")]
    OrderedList { items: Vec<String> },
}

/// What a paragraph style name maps to. Checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StyleKind {
    Heading,
    Bullet,
    Number,
    Quote,
    Body,
}

impl StyleKind {
    fn of(style: &str) -> Self {
        let style = style.to_lowercase();
        // "Heading 1" is the document title. Any style naming a 1 falls through with it
        if style.starts_with("heading") && !style.contains('1') {
            StyleKind::Heading
        } else if style.starts_with("list bullet") {
            StyleKind::Bullet
        } else if style.starts_with("list number") {
            StyleKind::Number
        } else if style.contains("quote") {
            StyleKind::Quote
        } else {
            StyleKind::Body
        }
    }
}

/// Fold paragraphs into blocks in one pass, merging runs of same-kind list paragraphs.
pub fn classify_paragraphs<I>(paragraphs: I) -> Vec<Block>
where
    I: IntoIterator<Item = Paragraph>,
{
    paragraphs.into_iter().fold(Vec::new(), |mut blocks, para| {
        push_paragraph(&mut blocks, &para);
        blocks
    })
}

fn push_paragraph(blocks: &mut Vec<Block>, para: &Paragraph) {
    let text = para.text.trim();
    if text.is_empty() {
        return;
    }
    let text = text.to_string();

    match StyleKind::of(&para.style) {
        StyleKind::Heading => blocks.push(Block::Heading { text }),
        StyleKind::Bullet => match blocks.last_mut() {
            Some(Block::UnorderedList { items }) => items.push(text),
            _ => blocks.push(Block::UnorderedList { items: vec![text] }),
        },
        StyleKind::Number => match blocks.last_mut() {
            Some(Block::OrderedList { items }) => items.push(text),
            _ => blocks.push(Block::OrderedList { items: vec![text] }),
        },
        StyleKind::Quote => blocks.push(Block::Quote { text }),
        StyleKind::Body => blocks.push(Block::Paragraph { text }),
    }
}
