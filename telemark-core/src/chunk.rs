// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

//! Greedy packing of top-level blocks into size-bounded packs.

use crate::config::Options;
use crate::document::Block;
use crate::render::{RenderMode, render_blocks};

/// An ordered run of sibling blocks destined for one delivery decision,
/// together with its cached escaped render.
#[derive(Debug, Clone)]
pub struct Pack {
    blocks: Vec<Block>,
    rendered: String,
}

impl Pack {
    pub fn new(blocks: Vec<Block>, options: &Options) -> Self {
        let rendered = render_blocks(&blocks, options, RenderMode::Escaped)
            .trim_matches('\n')
            .to_string();
        Self { blocks, rendered }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// The escaped render, trimmed of leading and trailing blank lines.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn rendered_len(&self) -> usize {
        self.rendered.chars().count()
    }

    /// The raw view of the same blocks; content is not escaped.
    pub fn rendered_raw(&self, options: &Options) -> String {
        render_blocks(&self.blocks, options, RenderMode::Raw)
            .trim_matches('\n')
            .to_string()
    }
}

/// Single forward pass: append each block to the accumulator unless doing so
/// would overflow the budget, in which case the accumulator is flushed first.
/// A lone block larger than the budget still forms a pack of its own — the
/// greedy rule cannot split inside one atomic node; downstream rendering
/// redirects such packs away from plain text.
pub(crate) fn chunk_blocks(blocks: Vec<Block>, options: &Options) -> Vec<Pack> {
    let mut packs = Vec::new();
    let mut accumulator: Vec<Block> = Vec::new();
    for block in blocks {
        let mut tentative = accumulator.clone();
        tentative.push(block.clone());
        let tentative = Pack::new(tentative, options);
        if tentative.rendered_len() > options.max_message_length && !accumulator.is_empty() {
            packs.push(Pack::new(std::mem::take(&mut accumulator), options));
        }
        accumulator.push(block);
    }
    if !accumulator.is_empty() {
        packs.push(Pack::new(accumulator, options));
    }
    packs
}
