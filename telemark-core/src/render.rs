// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

//! Per-node MarkdownV2 rendering.
//!
//! A single tree serves both output views: [`RenderMode::Escaped`] passes raw
//! text content through the escaper, [`RenderMode::Raw`] leaves it untouched.
//! Structural delimiters are identical in both views, and code content is
//! verbatim in both.

use crate::config::Options;
use crate::document::{Block, Span, TableRow};
use crate::escape::{escape_link_url, escape_markdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderMode {
    Escaped,
    Raw,
}

/// Separator line emitted for thematic breaks; escaping it is a no-op, the
/// em-dash is not a reserved character.
const THEMATIC_BREAK_LINE: &str = "————————";
/// Underline appended below setext headings.
const SETEXT_UNDERLINE: &str = "——————————";
/// Leader glyph for unordered list items.
const BULLET: &str = "⦁";

pub(crate) fn render_blocks(blocks: &[Block], options: &Options, mode: RenderMode) -> String {
    blocks
        .iter()
        .map(|block| render_block(block, options, mode))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_block(block: &Block, options: &Options, mode: RenderMode) -> String {
    match block {
        Block::Heading {
            setext: true,
            spans,
            ..
        } => {
            let content = render_spans(spans, options, mode);
            format!("{content}\n{SETEXT_UNDERLINE}")
        }
        Block::Heading { level, spans, .. } => {
            let content = render_spans(spans, options, mode);
            match options.symbols.heading_glyph(*level) {
                Some(glyph) if !glyph.is_empty() => format!("*{glyph} {content}*"),
                _ => format!("*{content}*"),
            }
        }
        Block::Paragraph { spans } => render_spans(spans, options, mode),
        Block::List { items } => items
            .iter()
            .map(|item| render_block(item, options, mode))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::ListItem { leader, blocks } => render_list_item(leader, blocks, options, mode),
        Block::CodeFence { language, content } => render_code_fence(language, content),
        Block::BlockQuote { blocks } => {
            let content = render_blocks(blocks, options, mode);
            content
                .split('\n')
                .map(|line| {
                    if line.is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {line}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
        Block::Table { rows } => {
            let grid = render_grid(rows, options, mode);
            format!("```\n{grid}\n```")
        }
        Block::ThematicBreak => THEMATIC_BREAK_LINE.to_string(),
        Block::LinkReferenceDefinition { label, dest, title } => {
            let text = if title.is_empty() { label } else { title };
            let body = render_link_body(
                crate::document::LinkKind::Uri,
                &[Span::RawText(text.clone())],
                dest,
                "",
                options,
                mode,
            );
            format!("{}{body}", options.symbols.link)
        }
        Block::BlankLine => String::new(),
    }
}

fn render_list_item(leader: &str, blocks: &[Block], options: &Options, mode: RenderMode) -> String {
    let leader = if leader.trim_end().ends_with('.') {
        format!("{} ", escape_markdown(leader))
    } else {
        format!("{BULLET} ")
    };
    let indent = " ".repeat(leader.chars().count());

    let content = render_blocks(blocks, options, mode);
    let mut lines = content.split('\n');
    let mut out = format!("{leader}{}", lines.next().unwrap_or(""));
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&indent);
            out.push_str(line);
        }
    }
    out
}

fn render_code_fence(language: &str, content: &str) -> String {
    let mut out = String::new();
    out.push_str("```");
    out.push_str(language);
    out.push('\n');
    out.push_str(content.trim_end_matches('\n'));
    out.push('\n');
    out.push_str("```");
    out
}

// Visual alignment only; the grid ends up inside a verbatim fence, so the
// column widths carry no dialect meaning.
fn render_grid(rows: &[TableRow], options: &Options, mode: RenderMode) -> String {
    let rendered: Vec<(bool, Vec<String>)> = rows
        .iter()
        .map(|row| {
            let cells = row
                .cells
                .iter()
                .map(|cell| render_spans(cell, options, mode))
                .collect();
            (row.header, cells)
        })
        .collect();

    let columns = rendered
        .iter()
        .map(|(_, cells)| cells.len())
        .max()
        .unwrap_or(0);
    let mut widths = vec![1usize; columns];
    for (_, cells) in &rendered {
        for (index, cell) in cells.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let mut lines = Vec::new();
    for (index, (header, cells)) in rendered.iter().enumerate() {
        let mut line = String::new();
        for (column, width) in widths.iter().enumerate() {
            let cell = cells.get(column).map(String::as_str).unwrap_or("");
            let padding = width - cell.chars().count().min(*width);
            line.push_str("| ");
            line.push_str(cell);
            line.push_str(&" ".repeat(padding));
            line.push(' ');
        }
        line.push('|');
        lines.push(line);

        let next_is_body = rendered.get(index + 1).is_some_and(|(header, _)| !header);
        if *header && next_is_body {
            let mut separator = String::new();
            for width in &widths {
                separator.push_str("| ");
                separator.push_str(&"-".repeat(*width));
                separator.push(' ');
            }
            separator.push('|');
            lines.push(separator);
        }
    }
    lines.join("\n")
}

fn render_spans(spans: &[Span], options: &Options, mode: RenderMode) -> String {
    spans
        .iter()
        .map(|span| render_span(span, options, mode))
        .collect()
}

fn render_span(span: &Span, options: &Options, mode: RenderMode) -> String {
    match span {
        Span::RawText(text) => match mode {
            RenderMode::Escaped => escape_markdown(text),
            RenderMode::Raw => text.clone(),
        },
        Span::Emphasis(children) => {
            let delimiter = if options.strict_markdown { "_" } else { "__" };
            format!(
                "{delimiter}{}{delimiter}",
                render_spans(children, options, mode)
            )
        }
        Span::Strong(children) => {
            let delimiter = if options.strict_markdown { "*" } else { "**" };
            format!(
                "{delimiter}{}{delimiter}",
                render_spans(children, options, mode)
            )
        }
        Span::Strikethrough(children) => {
            format!("~{}~", render_spans(children, options, mode))
        }
        Span::InlineCode { backticks, content } => {
            // A one-backtick span widens to three; a three-backtick delimiter
            // renders as the fenced form so the content survives untouched.
            let backticks = if *backticks == 1 { 3 } else { *backticks };
            let delimiter = "`".repeat(backticks);
            if backticks == 3 {
                format!("{delimiter}\n{content}{delimiter}")
            } else {
                format!("{delimiter}{content}{delimiter}")
            }
        }
        Span::Link {
            kind,
            spans,
            dest,
            label,
        } => render_link_body(*kind, spans, dest, label, options, mode),
        Span::Image {
            kind,
            spans,
            dest,
            label,
        } => {
            let body = render_link_body(*kind, spans, dest, label, options, mode);
            format!("{}{body}", options.symbols.image)
        }
        Span::AutoLink { url } => format!("<{url}\\>"),
        Span::EscapeSequence(content) => content.clone(),
    }
}

fn render_link_body(
    kind: crate::document::LinkKind,
    spans: &[Span],
    dest: &str,
    label: &str,
    options: &Options,
    mode: RenderMode,
) -> String {
    use crate::document::LinkKind;

    let text = render_spans(spans, options, mode);
    match kind {
        LinkKind::Uri | LinkKind::AngleUri => {
            let url = match mode {
                RenderMode::Escaped => escape_link_url(dest),
                RenderMode::Raw => dest.to_string(),
            };
            format!("[{text}]({url})")
        }
        LinkKind::Full => format!("\\[{text}\\]\\[{label}\\]"),
        LinkKind::Collapsed => "\\[\\]".to_string(),
        LinkKind::Shortcut => format!("\\[{text}\\]"),
    }
}
