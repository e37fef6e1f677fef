use lazy_static::lazy_static;
use regex::Regex;

/// Placeholder convention used by a SQL string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `:name`, `@name`, or `$name` tokens.
    Named,
    /// Numbered `?N` slots.
    Numeric,
    /// Bare `?` slots.
    Anonymous,
    /// No placeholders at all.
    None,
}

/// Per-statement parameter metadata, computed once at prepare time and never
/// recomputed on later calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlMeta {
    pub style: PlaceholderStyle,
    /// Positional slot count: the highest `?N` for numeric SQL, the `?`
    /// occurrence count for anonymous SQL, zero otherwise (named slots are
    /// not statically tracked).
    pub param_count: usize,
    /// True when a named token coexists with positional markers; the named
    /// interpretation wins but callers are warned at prepare time.
    pub mixed: bool,
}

lazy_static! {
    static ref NAMED_TOKEN: Regex = Regex::new(r"[:@$][A-Za-z_][A-Za-z0-9_]*").unwrap();
    static ref NUMBERED_SLOT: Regex = Regex::new(r"\?([0-9]+)").unwrap();
}

/// Classify the placeholder convention of `sql`.
///
/// This is a lexical scan, not a SQL parse: placeholder-shaped tokens inside
/// string literals or comments are counted. Precedence is named over numeric
/// over anonymous.
#[must_use]
pub fn classify(sql: &str) -> SqlMeta {
    let has_named = NAMED_TOKEN.is_match(sql);
    let max_numbered = NUMBERED_SLOT
        .captures_iter(sql)
        .filter_map(|caps| caps[1].parse::<usize>().ok())
        .max();
    let anonymous = count_anonymous(sql);

    if has_named {
        return SqlMeta {
            style: PlaceholderStyle::Named,
            param_count: 0,
            mixed: max_numbered.is_some() || anonymous > 0,
        };
    }
    if let Some(max) = max_numbered {
        return SqlMeta {
            style: PlaceholderStyle::Numeric,
            param_count: max,
            mixed: anonymous > 0,
        };
    }
    if anonymous > 0 {
        return SqlMeta {
            style: PlaceholderStyle::Anonymous,
            param_count: anonymous,
            mixed: false,
        };
    }
    SqlMeta {
        style: PlaceholderStyle::None,
        param_count: 0,
        mixed: false,
    }
}

/// Count `?` markers that do not begin a numbered slot.
fn count_anonymous(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    for (idx, b) in bytes.iter().enumerate() {
        if *b == b'?' && !bytes.get(idx + 1).is_some_and(u8::is_ascii_digit) {
            count += 1;
        }
    }
    count
}
