//! Positional composite formatting.
//!
//! Placeholder format sections use composite format strings in the
//! `string.Format` tradition: literal text, `{{` / `}}` brace escapes, and
//! items of the form `{index}`, `{index,alignment}`, `{index:spec}` or
//! `{index,alignment:spec}`. Format strings are parsed once at template
//! compile time — which doubles as the trial validation the compiler
//! requires — and applied per render.
//!
//! Supported value specs are the ones template patterns actually use:
//! custom numeric patterns of `0`/`#` with an optional fraction part
//! (`00` zero-pads to two digits, `0.00` renders two decimals), and
//! `x`/`X` hex for integers. Anything else falls back to the value's
//! plain rendering, as lenient custom format strings do.

use stencil_resolve::Value;

/// Why a format string failed to parse.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum FormatError {
    #[error("unmatched '{{'")]
    UnmatchedOpen,
    #[error("unmatched '}}'")]
    UnmatchedClose,
    #[error("format item has no argument index")]
    MissingIndex,
    #[error("malformed format item")]
    MalformedItem,
    #[error("invalid alignment '{text}'")]
    InvalidAlignment { text: String },
    #[error("argument index {index} out of range for {count} parameter(s)")]
    IndexOutOfRange { index: usize, count: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Item {
    Text(String),
    Arg {
        index: usize,
        /// Minimum field width; positive right-aligns, negative
        /// left-aligns.
        alignment: Option<i64>,
        spec: Option<String>,
    },
}

/// A parsed composite format string, ready to apply to argument slices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CompiledFormat {
    items: Vec<Item>,
}

impl CompiledFormat {
    /// Parse `pattern`, validating every argument index against
    /// `arg_count`.
    pub(crate) fn parse(pattern: &str, arg_count: usize) -> Result<Self, FormatError> {
        let mut items = Vec::new();
        let mut text = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    if chars.peek() == Some(&'{') {
                        chars.next();
                        text.push('{');
                        continue;
                    }
                    if !text.is_empty() {
                        items.push(Item::Text(std::mem::take(&mut text)));
                    }

                    let mut index_text = String::new();
                    while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                        index_text.push(d);
                        chars.next();
                    }
                    if index_text.is_empty() {
                        return Err(FormatError::MissingIndex);
                    }
                    let index: usize = index_text
                        .parse()
                        .map_err(|_| FormatError::MissingIndex)?;
                    if index >= arg_count {
                        return Err(FormatError::IndexOutOfRange {
                            index,
                            count: arg_count,
                        });
                    }

                    let mut alignment = None;
                    if chars.peek() == Some(&',') {
                        chars.next();
                        let mut alignment_text = String::new();
                        if chars.peek() == Some(&'-') {
                            alignment_text.push('-');
                            chars.next();
                        }
                        while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                            alignment_text.push(d);
                            chars.next();
                        }
                        let parsed: i64 = alignment_text.parse().map_err(|_| {
                            FormatError::InvalidAlignment {
                                text: alignment_text.clone(),
                            }
                        })?;
                        alignment = Some(parsed);
                    }

                    let mut spec = None;
                    if chars.peek() == Some(&':') {
                        chars.next();
                        let mut spec_text = String::new();
                        loop {
                            match chars.peek() {
                                Some('}') => break,
                                Some(&s) => {
                                    spec_text.push(s);
                                    chars.next();
                                }
                                None => return Err(FormatError::UnmatchedOpen),
                            }
                        }
                        spec = Some(spec_text);
                    }

                    match chars.next() {
                        Some('}') => {}
                        Some(_) => return Err(FormatError::MalformedItem),
                        None => return Err(FormatError::UnmatchedOpen),
                    }

                    items.push(Item::Arg {
                        index,
                        alignment,
                        spec,
                    });
                }
                '}' => {
                    if chars.peek() == Some(&'}') {
                        chars.next();
                        text.push('}');
                    } else {
                        return Err(FormatError::UnmatchedClose);
                    }
                }
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            items.push(Item::Text(text));
        }
        Ok(CompiledFormat { items })
    }

    /// Render the format against positional arguments. Absent arguments
    /// format as the empty string.
    pub(crate) fn apply(&self, args: &[Option<Value>]) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Text(t) => out.push_str(t),
                Item::Arg {
                    index,
                    alignment,
                    spec,
                } => {
                    let rendered = match args.get(*index).and_then(Option::as_ref) {
                        None => String::new(),
                        Some(value) => format_value(value, spec.as_deref()),
                    };
                    match alignment {
                        None => out.push_str(&rendered),
                        Some(a) => push_aligned(&mut out, &rendered, *a),
                    }
                }
            }
        }
        out
    }
}

fn push_aligned(out: &mut String, rendered: &str, alignment: i64) {
    let width = alignment.unsigned_abs() as usize;
    let len = rendered.chars().count();
    if len >= width {
        out.push_str(rendered);
        return;
    }
    let padding = width - len;
    if alignment > 0 {
        for _ in 0..padding {
            out.push(' ');
        }
        out.push_str(rendered);
    } else {
        out.push_str(rendered);
        for _ in 0..padding {
            out.push(' ');
        }
    }
}

fn format_value(value: &Value, spec: Option<&str>) -> String {
    let Some(spec) = spec else {
        return value.to_string();
    };
    if spec.is_empty() {
        return value.to_string();
    }
    match value {
        Value::Int(n) => format_int(*n, spec),
        Value::Float(x) => format_float(*x, spec),
        _ => value.to_string(),
    }
}

/// `0`/`#` custom numeric pattern → (zero-pad width, fraction digits).
fn custom_numeric(spec: &str) -> Option<(usize, usize)> {
    let (int_part, frac_part) = match spec.split_once('.') {
        Some((i, f)) => (i, f),
        None => (spec, ""),
    };
    let is_digit_pattern = |s: &str| s.chars().all(|c| c == '0' || c == '#');
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !is_digit_pattern(int_part) || !is_digit_pattern(frac_part) {
        return None;
    }
    Some((int_part.matches('0').count(), frac_part.len()))
}

/// `x`/`X` hex spec with optional width, e.g. `X4`.
fn hex_spec(spec: &str) -> Option<(bool, usize)> {
    let mut chars = spec.chars();
    let upper = match chars.next() {
        Some('x') => false,
        Some('X') => true,
        _ => return None,
    };
    let rest = chars.as_str();
    if rest.is_empty() {
        Some((upper, 0))
    } else {
        rest.parse().ok().map(|width| (upper, width))
    }
}

/// Zero-pad the integer digits of a rendered number to `width`, keeping
/// the sign and any fraction in place.
fn pad_integer_digits(rendered: &str, width: usize) -> String {
    let (sign, digits) = rendered
        .strip_prefix('-')
        .map_or(("", rendered), |rest| ("-", rest));
    let int_len = digits.find('.').unwrap_or(digits.len());
    if int_len >= width {
        return rendered.to_owned();
    }
    format!("{sign}{}{digits}", "0".repeat(width - int_len))
}

#[allow(clippy::cast_precision_loss)]
fn format_int(n: i64, spec: &str) -> String {
    if let Some((width, precision)) = custom_numeric(spec) {
        let rendered = if precision > 0 {
            format!("{:.precision$}", n as f64)
        } else {
            n.to_string()
        };
        return pad_integer_digits(&rendered, width);
    }
    if let Some((upper, width)) = hex_spec(spec) {
        let digits = if upper {
            format!("{n:X}")
        } else {
            format!("{n:x}")
        };
        return format!("{digits:0>width$}");
    }
    n.to_string()
}

fn format_float(x: f64, spec: &str) -> String {
    if let Some((width, precision)) = custom_numeric(spec) {
        let rendered = format!("{x:.precision$}");
        return pad_integer_digits(&rendered, width);
    }
    x.to_string()
}
