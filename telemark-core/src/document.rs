// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

//! The crate's own node model and the lowering from the comrak arena tree.
//!
//! The parser is consumed as a black box: one deterministic parse produces
//! one immutable [`Document`], and both the escaped and the raw output view
//! are renders of that tree. The model is a closed pair of enumerations so
//! every renderer rule is an exhaustiveness-checked match arm.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeList, NodeValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        setext: bool,
        spans: Vec<Span>,
    },
    Paragraph {
        spans: Vec<Span>,
    },
    /// Items are always [`Block::ListItem`].
    List {
        items: Vec<Block>,
    },
    ListItem {
        /// The source marker, e.g. `1.`, `2)`, `-`, `*`.
        leader: String,
        blocks: Vec<Block>,
    },
    CodeFence {
        language: String,
        content: String,
    },
    BlockQuote {
        blocks: Vec<Block>,
    },
    Table {
        rows: Vec<TableRow>,
    },
    ThematicBreak,
    LinkReferenceDefinition {
        label: String,
        dest: String,
        title: String,
    },
    BlankLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub header: bool,
    pub cells: Vec<Vec<Span>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    RawText(String),
    Emphasis(Vec<Span>),
    Strong(Vec<Span>),
    Strikethrough(Vec<Span>),
    InlineCode {
        backticks: usize,
        content: String,
    },
    Link {
        kind: LinkKind,
        spans: Vec<Span>,
        dest: String,
        label: String,
    },
    Image {
        kind: LinkKind,
        spans: Vec<Span>,
        dest: String,
        label: String,
    },
    AutoLink {
        url: String,
    },
    /// A backslash escape in the source; the content is already literal.
    EscapeSequence(String),
}

/// How a link's destination was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Uri,
    AngleUri,
    Full,
    Collapsed,
    Shortcut,
}

pub fn parse_document(markdown: &str) -> Document {
    let arena = comrak::Arena::new();
    let root = comrak::parse_document(&arena, markdown, &comrak_options());
    Document {
        blocks: lower_blocks(root),
    }
}

fn comrak_options() -> comrak::Options<'static> {
    let mut options = comrak::Options::default();
    options.extension.autolink = true;
    options.extension.strikethrough = true;
    options.extension.table = true;
    options
}

fn lower_blocks<'a>(parent: &'a AstNode<'a>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut prev_end = 0usize;
    for node in parent.children() {
        let sourcepos = node.data.borrow().sourcepos;
        if !blocks.is_empty() && sourcepos.start.line > prev_end + 1 {
            blocks.push(Block::BlankLine);
        }
        prev_end = sourcepos.end.line;
        if let Some(block) = lower_block(node) {
            blocks.push(block);
        }
    }
    blocks
}

fn lower_block<'a>(node: &'a AstNode<'a>) -> Option<Block> {
    match &node.data.borrow().value {
        NodeValue::Paragraph => Some(Block::Paragraph {
            spans: lower_spans(node),
        }),
        NodeValue::Heading(heading) => Some(Block::Heading {
            level: heading.level,
            setext: heading.setext,
            spans: lower_spans(node),
        }),
        NodeValue::BlockQuote => Some(Block::BlockQuote {
            blocks: lower_blocks(node),
        }),
        NodeValue::CodeBlock(code) => Some(Block::CodeFence {
            language: code
                .info
                .trim()
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_string(),
            content: code.literal.clone(),
        }),
        NodeValue::List(list) => Some(lower_list(node, list)),
        NodeValue::Table(_) => Some(lower_table(node)),
        NodeValue::ThematicBreak => Some(Block::ThematicBreak),
        _ => None,
    }
}

fn lower_list<'a>(node: &'a AstNode<'a>, list: &NodeList) -> Block {
    let mut items = Vec::new();
    for (index, item) in node.children().enumerate() {
        let leader = match list.list_type {
            ListType::Bullet => (list.bullet_char as char).to_string(),
            ListType::Ordered => {
                let delimiter = match list.delimiter {
                    ListDelimType::Period => '.',
                    ListDelimType::Paren => ')',
                };
                format!("{}{delimiter}", list.start + index)
            }
        };
        items.push(Block::ListItem {
            leader,
            blocks: lower_blocks(item),
        });
    }
    Block::List { items }
}

fn lower_table<'a>(node: &'a AstNode<'a>) -> Block {
    let mut rows = Vec::new();
    for row in node.children() {
        let header = match &row.data.borrow().value {
            NodeValue::TableRow(header) => *header,
            _ => continue,
        };
        let cells = row.children().map(lower_spans).collect();
        rows.push(TableRow { header, cells });
    }
    Block::Table { rows }
}

fn lower_spans<'a>(parent: &'a AstNode<'a>) -> Vec<Span> {
    let mut spans = Vec::new();
    for child in parent.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => push_text(&mut spans, text),
            NodeValue::SoftBreak | NodeValue::LineBreak => push_text(&mut spans, "\n"),
            NodeValue::Code(code) => spans.push(Span::InlineCode {
                backticks: code.num_backticks,
                content: code.literal.clone(),
            }),
            NodeValue::Emph => spans.push(Span::Emphasis(lower_spans(child))),
            NodeValue::Strong => spans.push(Span::Strong(lower_spans(child))),
            NodeValue::Strikethrough => spans.push(Span::Strikethrough(lower_spans(child))),
            NodeValue::Link(link) => {
                let inner = lower_spans(child);
                if link_text_is_exact_url(&inner, &link.url) {
                    spans.push(Span::AutoLink {
                        url: link.url.clone(),
                    });
                } else {
                    spans.push(Span::Link {
                        kind: LinkKind::Uri,
                        spans: inner,
                        dest: link.url.clone(),
                        label: String::new(),
                    });
                }
            }
            NodeValue::Image(link) => spans.push(Span::Image {
                kind: LinkKind::Uri,
                spans: lower_spans(child),
                dest: link.url.clone(),
                label: String::new(),
            }),
            NodeValue::HtmlInline(_) => {}
            _ => spans.extend(lower_spans(child)),
        }
    }
    spans
}

fn push_text(spans: &mut Vec<Span>, text: &str) {
    if let Some(Span::RawText(prev)) = spans.last_mut() {
        prev.push_str(text);
    } else {
        spans.push(Span::RawText(text.to_string()));
    }
}

// Angle and bare autolinks surface from the parser as links whose only text
// child equals the destination.
fn link_text_is_exact_url(spans: &[Span], url: &str) -> bool {
    matches!(spans, [Span::RawText(text)] if text == url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_synthesized_between_blocks() {
        let document = parse_document("one\n\ntwo\n");
        assert_eq!(document.blocks.len(), 3);
        assert_eq!(document.blocks[1], Block::BlankLine);
    }

    #[test]
    fn adjacent_blocks_have_no_blank_line() {
        let document = parse_document("# a\n# b\n");
        assert_eq!(document.blocks.len(), 2);
    }

    #[test]
    fn angle_autolink_is_classified() {
        let document = parse_document("<https://example.com>\n");
        let Block::Paragraph { spans } = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            spans.as_slice(),
            [Span::AutoLink {
                url: "https://example.com".to_string()
            }]
        );
    }

    #[test]
    fn inline_link_keeps_text_and_destination() {
        let document = parse_document("[docs](https://example.com)\n");
        let Block::Paragraph { spans } = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        let [Span::Link { kind, dest, .. }] = spans.as_slice() else {
            panic!("expected a link span");
        };
        assert_eq!(*kind, LinkKind::Uri);
        assert_eq!(dest, "https://example.com");
    }

    #[test]
    fn setext_heading_is_flagged() {
        let document = parse_document("Title\n=====\n");
        assert!(matches!(
            document.blocks[0],
            Block::Heading {
                level: 1,
                setext: true,
                ..
            }
        ));
    }

    #[test]
    fn fence_language_is_the_first_info_word() {
        let document = parse_document("```rust ignore\nlet x = 1;\n```\n");
        let Block::CodeFence { language, content } = &document.blocks[0] else {
            panic!("expected code fence");
        };
        assert_eq!(language, "rust");
        assert_eq!(content, "let x = 1;\n");
    }

    #[test]
    fn soft_breaks_fold_into_text() {
        let document = parse_document("one\ntwo\n");
        let Block::Paragraph { spans } = &document.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(spans.as_slice(), [Span::RawText("one\ntwo".to_string())]);
    }

    #[test]
    fn ordered_list_leaders_count_from_start() {
        let document = parse_document("3. a\n4. b\n");
        let Block::List { items } = &document.blocks[0] else {
            panic!("expected list");
        };
        let leaders: Vec<_> = items
            .iter()
            .map(|item| match item {
                Block::ListItem { leader, .. } => leader.as_str(),
                _ => panic!("expected list item"),
            })
            .collect();
        assert_eq!(leaders, ["3.", "4."]);
    }
}
