//! Centralized filename and slug conventions.
//!
//! Content authors encode sheet layout directly into asset filenames:
//!
//! ```text
//! {sequence}_{width}_{order}[_anything-else].ext
//!
//! 3_40_B.jpg   → group "3", 40% of the row, second in the group
//! 12_25_C.png  → group "12", 25% of the row, third in the group
//! 5_07_aa.jpg  → group "5", 7% of the row, 27th in the group
//! ```
//!
//! This module owns the string-level parsing of that convention plus the
//! slug/title helpers used when normalizing project records. It knows
//! nothing about assets or rows; [`crate::sheet`] turns a [`SheetName`]
//! into a layout.

const WIDTH_MIN: i64 = 1;
const WIDTH_MAX: i64 = 100;

/// Layout tokens parsed from an underscore-delimited filename stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetName {
    /// Raw first segment; assets sharing it render in the same row.
    pub sequence: String,
    /// Width percentage, clamped to `[1, 100]`.
    pub width: u32,
    /// Order token, trimmed and uppercased. `None` if blank.
    pub order_key: Option<String>,
    /// Zero-based position resolved from `order_key`.
    pub order_index: Option<u32>,
}

/// Extract the filename stem from a URL or path.
///
/// Query strings and fragments are dropped, then everything up to the last
/// `/`, then the final extension:
/// - `"/assets/p/3_40_B.jpg?v=2#top"` → `"3_40_B"`
/// - `"archive.tar.gz"` → `"archive.tar"`
/// - `"/assets/dir/"` → `""`
pub fn file_stem_from_url(url: &str) -> &str {
    let path = url.split('?').next().unwrap_or_default();
    let path = path.split('#').next().unwrap_or_default();
    let file_name = path.rsplit('/').next().unwrap_or_default();
    strip_extension(file_name)
}

/// Drop a trailing `.ext` (at least one character after the dot, no `/`).
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() && !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}

/// Parse a filename stem following the `{sequence}_{width}_{order}` convention.
///
/// Empty segments are ignored, so doubled underscores are harmless. Returns
/// `None` for "plain" names with fewer than three segments, and when the
/// width segment has no leading integer. Segments past the third are ignored.
pub fn parse_sheet_name(stem: &str) -> Option<SheetName> {
    let segments: Vec<&str> = stem.split('_').filter(|s| !s.is_empty()).collect();
    let [sequence, width, order, ..] = segments.as_slice() else {
        return None;
    };

    let width = parse_leading_int(width)?.clamp(WIDTH_MIN, WIDTH_MAX) as u32;
    let order_key = order.trim().to_uppercase();
    let order_index = order_index(&order_key);

    Some(SheetName {
        sequence: (*sequence).to_string(),
        width,
        order_key: (!order_key.is_empty()).then_some(order_key),
        order_index,
    })
}

/// Read a leading base-10 integer the way authoring tools tend to write them.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit (`"40px"` → 40). Returns `None` when no digit follows.
/// Saturates instead of overflowing.
fn parse_leading_int(token: &str) -> Option<i64> {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return None;
    }
    let magnitude = digits[..len].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Resolve an order token to a zero-based index.
///
/// - Purely numeric tokens are one-based: `"1"` → 0, `"12"` → 11. `"0"` is
///   unresolved.
/// - Anything else is read as a spreadsheet-style column code after dropping
///   non-letters: `"A"` → 0, `"Z"` → 25, `"AA"` → 26, `"a1"` → 0.
/// - Empty tokens, tokens with no letters, and codes that overflow `u32`
///   are unresolved.
pub fn order_index(token: &str) -> Option<u32> {
    if token.is_empty() {
        return None;
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token.parse::<u32>().ok()?.checked_sub(1);
    }

    let letters: Vec<u8> = token
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return None;
    }

    let mut index: u32 = 0;
    for letter in letters {
        let value = match letter {
            b'A'..=b'Z' => u32::from(letter - b'A' + 1),
            _ => return None,
        };
        index = index.checked_mul(26)?.checked_add(value)?;
    }
    index.checked_sub(1)
}

/// Turn arbitrary text into a URL slug.
///
/// Lowercases, drops a trailing extension, and collapses every run of
/// characters outside `[a-z0-9]` into a single dash:
/// - `"Ollie's Leash.png"` → `"ollie-s-leash"`
/// - `"  Hello,  World  "` → `"hello-world"`
pub fn slugify(value: &str) -> String {
    let lower = value.to_lowercase();
    let stem = strip_extension(&lower);
    let mut slug = String::with_capacity(stem.len());
    let mut pending_dash = false;
    for c in stem.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Turn a slug back into a display title: `"coffee-grinder"` → `"Coffee Grinder"`.
pub fn titleize(value: &str) -> String {
    let words: Vec<String> = value
        .split('-')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        "Untitled Project".to_string()
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
