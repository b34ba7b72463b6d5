// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

pub mod config;

mod chunk;
mod document;
mod escape;
mod interpret;
mod latex;
mod mermaid;
mod render;

pub type Error = Box<dyn std::error::Error>;
pub type Result<T> = std::result::Result<T, Error>;

pub use chunk::Pack;
pub use config::{Options, Symbols};
pub use document::{Block, Document, LinkKind, Span, TableRow, parse_document};
pub use escape::escape_markdown;
pub use interpret::{
    BASE_TAG, BaseInterpreter, DIAGRAM_TAG, DiagramInterpreter, Interpreter, Pipeline, SendUnit,
    Task,
};
pub use mermaid::{DiagramRenderer, MermaidInkClient, RenderedDiagram};

/// Transcode a whole document into MarkdownV2 text, without chunking.
pub fn convert_str(markdown: &str) -> Result<String> {
    convert_str_with_options(markdown, &Options::default())
}

pub fn convert_str_with_options(markdown: &str, options: &Options) -> Result<String> {
    let document = parse_with_options(markdown, options);
    let mut out = render::render_blocks(&document.blocks, options, render::RenderMode::Escaped);
    if out.is_empty() {
        return Ok(out);
    }
    out.push('\n');
    Ok(out)
}

/// Transcode and partition a document into send units, using the built-in
/// interpreters and the mermaid.ink renderer.
pub fn split_str(markdown: &str) -> Result<Vec<SendUnit>> {
    split_str_with_options(markdown, &Options::default())
}

pub fn split_str_with_options(markdown: &str, options: &Options) -> Result<Vec<SendUnit>> {
    let pipeline = Pipeline::standard(Box::new(MermaidInkClient::new()?));
    split_str_with_pipeline(markdown, options, &pipeline)
}

/// As [`split_str_with_options`], with a caller-assembled interpreter stack.
pub fn split_str_with_pipeline(
    markdown: &str,
    options: &Options,
    pipeline: &Pipeline,
) -> Result<Vec<SendUnit>> {
    let document = parse_with_options(markdown, options);
    let packs = chunk::chunk_blocks(document.blocks, options);
    pipeline.run(packs, options)
}

fn parse_with_options(markdown: &str, options: &Options) -> Document {
    if options.latex_escape {
        parse_document(&latex::latex_to_text(markdown))
    } else {
        parse_document(markdown)
    }
}
