//! Split a raw model response into candidate records
//!
//! Never fails: anything that does not look like a record is skipped.

use crate::config::WireFormat;

/// Split `raw` into field lists, one per candidate record
///
/// 1. Text from the first completion marker on is discarded.
/// 2. The rest is split on the record delimiter.
/// 3. Each chunk is trimmed and loses an enclosing `( ... )` pair if present,
///    along with any commentary before the opening paren.
/// 4. The chunk is split on the tuple delimiter; fields are trimmed.
/// 5. Chunks with no non-empty field are dropped.
///
/// Fields borrow from `raw`.
pub fn tokenize<'a>(raw: &'a str, wire: &WireFormat) -> Vec<Vec<&'a str>> {
    let body = truncate_at_marker(raw, &wire.completion_marker);

    split_non_empty(body, &wire.record_delimiter)
        .into_iter()
        .filter_map(|chunk| {
            let record = strip_enclosing_parens(chunk, &wire.tuple_delimiter);
            let fields: Vec<&str> = split_non_empty(record, &wire.tuple_delimiter)
                .into_iter()
                .map(str::trim)
                .collect();

            if fields.iter().all(|f| f.is_empty()) {
                None
            } else {
                Some(fields)
            }
        })
        .collect()
}

fn truncate_at_marker<'a>(raw: &'a str, marker: &str) -> &'a str {
    if marker.is_empty() {
        return raw;
    }
    match raw.find(marker) {
        Some(end) => &raw[..end],
        None => raw,
    }
}

/// `str::split` that treats an empty delimiter as "do not split"
fn split_non_empty<'a>(text: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() {
        vec![text]
    } else {
        text.split(delimiter).collect()
    }
}

/// Remove surrounding whitespace and one enclosing parenthesis pair
///
/// Models sometimes put commentary before the record, on the same line or
/// earlier ones. The record's opening paren is then the last `(` before the
/// first field delimiter; a chunk with no `(` there is left as is.
fn strip_enclosing_parens<'a>(chunk: &'a str, tuple_delimiter: &str) -> &'a str {
    let chunk = chunk.trim();
    let Some(inner) = chunk.strip_suffix(')') else {
        return chunk;
    };
    if let Some(inner) = inner.strip_prefix('(') {
        return inner.trim();
    }
    if tuple_delimiter.is_empty() {
        return chunk;
    }

    let head = match inner.find(tuple_delimiter) {
        Some(end) => &inner[..end],
        None => return chunk,
    };
    match head.rfind('(') {
        Some(start) => inner[start + 1..].trim(),
        None => chunk,
    }
}
