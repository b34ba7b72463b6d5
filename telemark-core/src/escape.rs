// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

/// The characters MarkdownV2 reserves outside of code spans and link
/// destinations. Every one of them must be backslash-prefixed in rendered
/// text content.
const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Prefix every reserved character with a backslash, leaving everything else
/// untouched. Callers apply this exactly once per raw content node; applying
/// it to already-escaped text double-escapes.
pub fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Inside a `(...)` link destination the dialect only reserves the closing
/// parenthesis and the backslash itself.
pub(crate) fn escape_link_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        if ch == ')' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
