// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

use std::path::Path;

use serde::Deserialize;

/// Presentation glyphs prepended by the renderer. Read-only during a
/// conversion; customized through the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Symbols {
    pub head_level_1: String,
    pub head_level_2: String,
    pub head_level_3: String,
    pub head_level_4: String,
    pub link: String,
    pub image: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Self {
            head_level_1: "📌".to_string(),
            head_level_2: "✏️".to_string(),
            head_level_3: "📚".to_string(),
            head_level_4: "🔖".to_string(),
            link: "🔗".to_string(),
            image: "🖼".to_string(),
        }
    }
}

impl Symbols {
    /// Heading glyph for levels 1 through 4. Deeper levels carry no glyph.
    pub fn heading_glyph(&self, level: u8) -> Option<&str> {
        match level {
            1 => Some(&self.head_level_1),
            2 => Some(&self.head_level_2),
            3 => Some(&self.head_level_3),
            4 => Some(&self.head_level_4),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Upper bound on the rendered length of one text message.
    pub max_message_length: usize,
    /// Strict dialect delimiters: `*`/`_` when set, `**`/`__` otherwise.
    pub strict_markdown: bool,
    /// Run the LaTeX-to-readable-text pre-pass before parsing.
    pub latex_escape: bool,
    pub symbols: Symbols,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_message_length: 4090,
            strict_markdown: true,
            latex_escape: false,
            symbols: Symbols::default(),
        }
    }
}

pub fn load_options_from_yaml_file(path: &Path) -> crate::Result<Options> {
    let content = std::fs::read_to_string(path)?;
    let options = serde_yaml::from_str::<Options>(&content)?;
    Ok(options)
}
