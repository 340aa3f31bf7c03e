//! Source path parsing and graph-safe identifier encoding.
//!
//! A source path identifies a connection/schema/table (or equivalent) and is
//! used as the stable key of a source within a view definition:
//!
//! ```text
//! connection=pgConn/schema=public/table=account
//! ```
//!
//! The first segment's value is the connection name; the last segment gives
//! the source's kind and name.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Separator between path segments.
pub const SEGMENT_DELIMITER: char = '/';

/// Separator between a segment's type and value.
pub const TYPE_VALUE_DELIMITER: char = '=';

/// Escape character used by [`encode_id`].
const ESCAPE: char = '%';

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// One `type=value` segment of a source path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: &'a str,
    pub value: &'a str,
}

/// Split a path into its `type=value` segments.
///
/// Segments without a `=` are skipped; they carry no addressable information.
pub fn segments(path: &str) -> Vec<Segment<'_>> {
    path.split(SEGMENT_DELIMITER)
        .filter_map(|segment| {
            segment
                .split_once(TYPE_VALUE_DELIMITER)
                .map(|(kind, value)| Segment { kind, value })
        })
        .collect()
}

/// Name of the connection a source path belongs to (first segment's value).
pub fn connection_name(path: &str) -> Option<&str> {
    first_segment(path).map(|s| s.value)
}

/// Name of the source itself (last segment's value).
pub fn source_name(path: &str) -> Option<&str> {
    last_segment(path).map(|s| s.value)
}

/// Kind of the source, e.g. `table` or `view` (last segment's type).
pub fn source_type(path: &str) -> Option<&str> {
    last_segment(path).map(|s| s.kind)
}

/// The path with its leading connection segment removed.
///
/// Returns an empty string for a single-segment path.
pub fn path_without_connection(path: &str) -> String {
    match path.split_once(SEGMENT_DELIMITER) {
        Some((_, rest)) => rest.to_string(),
        None => String::new(),
    }
}

fn first_segment(path: &str) -> Option<Segment<'_>> {
    let first = path.split(SEGMENT_DELIMITER).next()?;
    first
        .split_once(TYPE_VALUE_DELIMITER)
        .map(|(kind, value)| Segment { kind, value })
}

fn last_segment(path: &str) -> Option<Segment<'_>> {
    let last = path.rsplit(SEGMENT_DELIMITER).next()?;
    last.split_once(TYPE_VALUE_DELIMITER)
        .map(|(kind, value)| Segment { kind, value })
}

// ---------------------------------------------------------------------------
// Identifier codec
// ---------------------------------------------------------------------------

/// Encode a source path into an identifier free of `/` and `=`.
///
/// Reserved characters are replaced by `%XX` hex escapes (the escape
/// character itself included), so [`decode_id`] restores the path exactly.
pub fn encode_id(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for ch in path.chars() {
        match ch {
            SEGMENT_DELIMITER | TYPE_VALUE_DELIMITER | ESCAPE => {
                out.push(ESCAPE);
                out.push_str(&format!("{:02X}", ch as u32));
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Decode an identifier produced by [`encode_id`].
///
/// Escape sequences that do not name a reserved character are kept verbatim.
pub fn decode_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut rest = id;
    while let Some(pos) = rest.find(ESCAPE) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let decoded = tail
            .get(..2)
            .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            .map(char::from)
            .filter(|ch| matches!(*ch, SEGMENT_DELIMITER | TYPE_VALUE_DELIMITER | ESCAPE));
        match decoded {
            Some(ch) => {
                out.push(ch);
                rest = &tail[2..];
            }
            None => {
                out.push(ESCAPE);
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PATH: &str = "connection=pgConn/schema=public/table=account";

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn connection_name_is_first_value() {
        assert_eq!(connection_name(PATH), Some("pgConn"));
    }

    #[test]
    fn source_name_and_type_come_from_last_segment() {
        assert_eq!(source_name(PATH), Some("account"));
        assert_eq!(source_type(PATH), Some("table"));
    }

    #[test]
    fn path_without_connection_drops_first_segment() {
        assert_eq!(path_without_connection(PATH), "schema=public/table=account");
        assert_eq!(path_without_connection("connection=pgConn"), "");
    }

    #[test]
    fn malformed_path_yields_none() {
        assert_eq!(connection_name("sourcePath1"), None);
        assert_eq!(source_name("sourcePath1"), None);
        assert_eq!(source_type(""), None);
    }

    #[test]
    fn segments_skip_untyped_parts() {
        let segs = segments("connection=c/junk/table=t");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1], Segment { kind: "table", value: "t" });
    }

    // -- Identifier codec ---------------------------------------------------

    #[test]
    fn encoded_id_has_no_reserved_characters() {
        let id = encode_id(PATH);
        assert!(!id.contains('/'));
        assert!(!id.contains('='));
    }

    #[test]
    fn id_codec_round_trips() {
        for path in [
            PATH,
            "connection=a%2F/table=b",
            "a==b//c",
            "%",
            "",
            "connection=ünïcødé/table=x",
        ] {
            assert_eq!(decode_id(&encode_id(path)), path, "path {path:?}");
        }
    }

    #[test]
    fn decode_keeps_unknown_escapes() {
        assert_eq!(decode_id("a%ZZb"), "a%ZZb");
        assert_eq!(decode_id("a%41"), "a%41");
        assert_eq!(decode_id("end%"), "end%");
    }
}
