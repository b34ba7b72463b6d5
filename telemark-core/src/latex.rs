// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

//! Optional pre-pass turning `$...$` / `$$...$$` segments into readable
//! plain text before the document is parsed. Purely textual; the parser
//! never sees the dollar delimiters.

/// Replacement table for common commands. Within a shared prefix the longer
/// command must come first (`\leftrightarrow` before `\leftarrow` before
/// `\left`).
const COMMANDS: &[(&str, &str)] = &[
    ("\\leftrightarrow", "↔"),
    ("\\leftarrow", "←"),
    ("\\left", ""),
    ("\\rightarrow", "→"),
    ("\\right", ""),
    ("\\Leftarrow", "⇐"),
    ("\\Rightarrow", "⇒"),
    ("\\alpha", "α"),
    ("\\beta", "β"),
    ("\\gamma", "γ"),
    ("\\delta", "δ"),
    ("\\epsilon", "ε"),
    ("\\zeta", "ζ"),
    ("\\eta", "η"),
    ("\\theta", "θ"),
    ("\\lambda", "λ"),
    ("\\mu", "μ"),
    ("\\nu", "ν"),
    ("\\xi", "ξ"),
    ("\\pi", "π"),
    ("\\rho", "ρ"),
    ("\\sigma", "σ"),
    ("\\tau", "τ"),
    ("\\phi", "φ"),
    ("\\chi", "χ"),
    ("\\psi", "ψ"),
    ("\\omega", "ω"),
    ("\\Gamma", "Γ"),
    ("\\Delta", "Δ"),
    ("\\Theta", "Θ"),
    ("\\Lambda", "Λ"),
    ("\\Pi", "Π"),
    ("\\Sigma", "Σ"),
    ("\\Phi", "Φ"),
    ("\\Psi", "Ψ"),
    ("\\Omega", "Ω"),
    ("\\to", "→"),
    ("\\times", "×"),
    ("\\cdot", "·"),
    ("\\pm", "±"),
    ("\\mp", "∓"),
    ("\\leq", "≤"),
    ("\\geq", "≥"),
    ("\\neq", "≠"),
    ("\\approx", "≈"),
    ("\\equiv", "≡"),
    ("\\infty", "∞"),
    ("\\partial", "∂"),
    ("\\nabla", "∇"),
    ("\\sum", "∑"),
    ("\\prod", "∏"),
    ("\\int", "∫"),
    ("\\sqrt", "√"),
    ("\\in", "∈"),
    ("\\notin", "∉"),
    ("\\subset", "⊂"),
    ("\\supset", "⊃"),
    ("\\cup", "∪"),
    ("\\cap", "∩"),
    ("\\emptyset", "∅"),
    ("\\forall", "∀"),
    ("\\exists", "∃"),
    ("\\land", "∧"),
    ("\\lor", "∨"),
    ("\\neg", "¬"),
    ("\\,", " "),
    ("\\;", " "),
    ("\\ ", " "),
];

/// Argument-wrapping commands whose braces are dropped, keeping the inner
/// text.
const WRAPPERS: &[&str] = &["\\text", "\\mathrm", "\\mathbf", "\\mathit", "\\operatorname"];

pub(crate) fn latex_to_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('$') {
        let (before, after) = rest.split_at(start);
        out.push_str(before);

        let (delimiter, body_start) = if after.starts_with("$$") {
            ("$$", 2)
        } else {
            ("$", 1)
        };
        match after[body_start..].find(delimiter) {
            Some(end) => {
                let body = &after[body_start..body_start + end];
                out.push_str(&rewrite_segment(body));
                rest = &after[body_start + end + delimiter.len()..];
            }
            None => {
                // Unbalanced delimiter; leave the rest of the text alone.
                out.push_str(after);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

fn rewrite_segment(body: &str) -> String {
    let mut text = rewrite_fractions(body);
    for wrapper in WRAPPERS {
        text = unwrap_command(&text, wrapper);
    }
    for (command, replacement) in COMMANDS {
        text = text.replace(command, replacement);
    }
    text.trim().to_string()
}

fn rewrite_fractions(body: &str) -> String {
    let mut out = String::new();
    let mut rest = body;
    while let Some(position) = rest.find("\\frac") {
        out.push_str(&rest[..position]);
        let after = &rest[position + "\\frac".len()..];
        let parsed = parse_brace_group(after).and_then(|(numerator, tail)| {
            parse_brace_group(tail).map(|(denominator, tail)| (numerator, denominator, tail))
        });
        match parsed {
            Some((numerator, denominator, tail)) => {
                out.push_str(&fraction_side(&rewrite_fractions(numerator)));
                out.push('/');
                out.push_str(&fraction_side(&rewrite_fractions(denominator)));
                rest = tail;
            }
            None => {
                out.push_str("\\frac");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn fraction_side(side: &str) -> String {
    if side.contains(' ') || side.contains('+') || side.contains('-') {
        format!("({side})")
    } else {
        side.to_string()
    }
}

fn unwrap_command(text: &str, name: &str) -> String {
    let pattern = format!("{name}{{");
    let mut out = String::new();
    let mut rest = text;
    while let Some(position) = rest.find(&pattern) {
        out.push_str(&rest[..position]);
        let after = &rest[position + pattern.len() - 1..];
        match parse_brace_group(after) {
            Some((inner, tail)) => {
                out.push_str(inner);
                rest = tail;
            }
            None => {
                out.push_str(&rest[position..position + pattern.len()]);
                rest = &rest[position + pattern.len()..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn parse_brace_group(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('{')?;
    let mut depth = 0usize;
    for (index, ch) in rest.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some((&rest[..index], &rest[index + 1..])),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}
