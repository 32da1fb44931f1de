//! Query string tokenizer and value parsers.

#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::ParseWarning;
use crate::color::Background;
use crate::config::{GridFit, LayoutConfig, LayoutMode, ScalePolicy};

/// Fields seen so far, so repeats can be reported.
#[derive(Default)]
struct Seen {
    mode: bool,
    scale: bool,
    rows: bool,
    cols: bool,
    fit: bool,
    background: bool,
    transparent: bool,
    max: bool,
}

/// Parse a query string into a config + warnings.
pub(crate) fn parse_query(query: &str) -> (LayoutConfig, Vec<ParseWarning>) {
    let mut config = LayoutConfig::default();
    let mut warnings = Vec::new();
    let mut seen = Seen::default();
    // `transparent=true` wins over any `bgcolor`, whatever the order.
    let mut force_transparent = false;

    for pair in split_query(query) {
        let (raw_key, raw_value) = split_pair(pair);
        let key = percent_decode(raw_key).to_ascii_lowercase();
        let value = percent_decode(raw_value);
        let mut ctx = Ctx {
            key: &key,
            value: &value,
            warnings: &mut warnings,
        };

        match key.as_str() {
            "mode" | "layout" => {
                if let Some(m) = ctx.parsed(parse_mode(&value), "expected column|row|grid") {
                    ctx.note_repeat(&mut seen.mode);
                    config.mode = m;
                }
            }
            "scale" | "scaling" => {
                if let Some(s) = ctx.parsed(parse_scale(&value), "expected smallest|largest") {
                    ctx.note_repeat(&mut seen.scale);
                    config.scale = s;
                }
            }
            "rows" => {
                if let Some(r) = ctx.parsed(parse_count(&value), "expected a positive integer") {
                    ctx.note_repeat(&mut seen.rows);
                    config.grid.rows = r;
                }
            }
            "cols" | "columns" => {
                if let Some(c) = ctx.parsed(parse_count(&value), "expected a positive integer") {
                    ctx.note_repeat(&mut seen.cols);
                    config.grid.cols = c;
                }
            }
            "fit" => {
                if let Some(f) = ctx.parsed(parse_fit(&value), "expected letterbox|crop") {
                    ctx.note_repeat(&mut seen.fit);
                    config.grid.fit = f;
                }
            }
            "bgcolor" | "background" => {
                let parsed = value.parse::<Background>().ok();
                if let Some(bg) = ctx.parsed(parsed, "expected hex color or transparent") {
                    ctx.note_repeat(&mut seen.background);
                    config.background = bg;
                }
            }
            "transparent" => {
                if let Some(t) = ctx.parsed(parse_bool(&value), "expected true|false|1|0|yes|no|on|off") {
                    ctx.note_repeat(&mut seen.transparent);
                    force_transparent = t;
                }
            }
            "maxsize" | "max" => {
                if let Some(m) = ctx.parsed(parse_positive(&value), "expected a positive number") {
                    ctx.note_repeat(&mut seen.max);
                    config.max_canvas_dimension = m;
                }
            }
            _ => warnings.push(ParseWarning::KeyNotRecognized {
                key: key.clone(),
                value: value.clone(),
            }),
        }
    }

    if force_transparent {
        config.background = Background::Transparent;
    }
    (config, warnings)
}

/// Per-pair warning context.
struct Ctx<'a> {
    key: &'a str,
    value: &'a str,
    warnings: &'a mut Vec<ParseWarning>,
}

impl Ctx<'_> {
    /// Pass a parsed value through, warning when it is missing.
    fn parsed<T>(&mut self, parsed: Option<T>, reason: &'static str) -> Option<T> {
        if parsed.is_none() {
            self.warnings.push(ParseWarning::ValueInvalid {
                key: String::from(self.key),
                value: String::from(self.value),
                reason,
            });
        }
        parsed
    }

    /// Mark a field as set, warning if it already was.
    fn note_repeat(&mut self, flag: &mut bool) {
        if *flag {
            self.warnings.push(ParseWarning::DuplicateKey {
                key: String::from(self.key),
                value: String::from(self.value),
            });
        }
        *flag = true;
    }
}

// ---- Value parsers ----

fn parse_mode(s: &str) -> Option<LayoutMode> {
    match s.trim().to_ascii_lowercase().as_str() {
        "column" | "col" | "vertical" => Some(LayoutMode::Column),
        "row" | "horizontal" => Some(LayoutMode::Row),
        "grid" => Some(LayoutMode::Grid),
        _ => None,
    }
}

fn parse_scale(s: &str) -> Option<ScalePolicy> {
    match s.trim().to_ascii_lowercase().as_str() {
        "smallest" | "shrink" | "down" | "shrinktosmallest" => Some(ScalePolicy::ShrinkToSmallest),
        "largest" | "biggest" | "grow" | "up" | "growtolargest" => Some(ScalePolicy::GrowToLargest),
        _ => None,
    }
}

fn parse_fit(s: &str) -> Option<GridFit> {
    match s.trim().to_ascii_lowercase().as_str() {
        "letterbox" | "pad" | "fit" => Some(GridFit::Letterbox),
        "crop" | "fill" => Some(GridFit::Crop),
        _ => None,
    }
}

/// Positive row/column count. Zero and negatives are rejected so the
/// field keeps its default of 2.
fn parse_count(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&v| v > 0)
}

fn parse_positive(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---- Query string tokenizer ----

/// Split query string on '&'.
fn split_query(query: &str) -> impl Iterator<Item = &str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').filter(|s| !s.is_empty())
}

/// Split a single "key=value" pair on the first '='.
fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}

/// Percent-decode a URL component. Also handles '+' as space.
///
/// Decoded bytes that don't form valid UTF-8 are replaced.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
