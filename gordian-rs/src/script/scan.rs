//! Character-level scanning helpers.
//!
//! Gordian has no tokenizer: operators are found by scanning the raw
//! expression text.  These helpers only report positions that are outside
//! double-quoted text and outside parentheses ("top level").

/// Byte offsets of every top-level character in `s`, paired with the char.
fn top_level_chars(s: &str) -> Vec<(usize, char)> {
    let mut out = Vec::new();
    let mut in_quote = false;
    let mut depth = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => depth = depth.saturating_sub(1),
            c if !in_quote && depth == 0 => out.push((i, c)),
            _ => {}
        }
    }
    out
}

/// `true` when the occurrence of `op` at byte `i` is really part of a longer
/// operator (`<` inside `<=`, `==` inside `!==`, `=` inside `>=`, …).
fn clashes(s: &str, i: usize, op: &str) -> bool {
    let prev = s[..i].chars().next_back();
    let next = s[i + op.len()..].chars().next();
    match op {
        "<" | ">" => next == Some('='),
        "==" | "!=" | "<=" | ">=" | "=" => {
            next == Some('=') || matches!(prev, Some('=' | '!' | '<' | '>'))
        }
        "&&" => next == Some('&') || prev == Some('&'),
        "||" => next == Some('|') || prev == Some('|'),
        _ => false,
    }
}

/// Top-level positions of `op` in `s`, rightmost first.
///
/// Positions touching either end of `s` are never reported: an operator
/// there is a sign or a dangling symbol, not a binary split point.
pub fn operator_positions(s: &str, op: &str) -> Vec<usize> {
    let Some(first) = op.chars().next() else {
        return Vec::new();
    };
    let mut found: Vec<usize> = top_level_chars(s)
        .into_iter()
        .filter(|&(i, c)| {
            c == first
                && i > 0
                && i + op.len() < s.len()
                && s[i..].starts_with(op)
                && !clashes(s, i, op)
        })
        .map(|(i, _)| i)
        .collect();
    found.reverse();
    found
}

/// `true` if one pair of parentheses encloses the whole of `s`.
pub fn is_wrapped(s: &str) -> bool {
    if !(s.starts_with('(') && s.ends_with(')')) {
        return false;
    }
    let mut in_quote = false;
    let mut depth = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            '(' if !in_quote => depth += 1,
            ')' if !in_quote => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == s.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Split `s` at top-level occurrences of `sep`.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in top_level_chars(s) {
        if c == sep {
            parts.push(&s[start..i]);
            start = i + sep.len_utf8();
        }
    }
    parts.push(&s[start..]);
    parts
}

/// `true` for `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// ── Tests ─────────────────────────────────────────────────────────────────────
