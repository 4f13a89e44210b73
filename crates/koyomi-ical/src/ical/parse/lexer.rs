//! Logical-line assembly and property-line tokenization (RFC 2445 §4.1).

/// Splits input into logical lines, merging folded continuations.
///
/// Handles both CRLF and bare LF line endings. A physical line starting with
/// SP/HTAB continues the previous logical line; unfolding removes the
/// terminator and that single whitespace character, restoring the logical
/// line byte-for-byte. Each logical line keeps the 1-based number of its
/// first physical line for error reporting. Empty lines are skipped.
#[must_use]
pub fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines: Vec<(usize, String)> = Vec::new();

    for (i, raw_line) in input.lines().enumerate() {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.is_empty() {
            continue;
        }

        if let Some(continuation) = line.strip_prefix([' ', '\t']) {
            if let Some((_, prev)) = lines.last_mut() {
                prev.push_str(continuation);
            } else {
                lines.push((i + 1, continuation.to_string()));
            }
        } else {
            lines.push((i + 1, line.to_string()));
        }
    }

    lines
}

/// Tokenizes one property line: an uppercase-and-hyphen name, an optional
/// semicolon-delimited run of `PARAM=value` assignments, a colon, and the
/// raw value text.
///
/// Returns `None` when the line does not fit the shape at all (no colon, or
/// a name outside the `[A-Z-]+` alphabet). Parameter chunks that are not a
/// `NAME=value` pair are dropped with a debug log rather than failing the
/// line; this leniency is deliberate, matching what real-world feeds get
/// away with.
#[must_use]
pub fn tokenize_property_line(line: &str) -> Option<(String, Vec<(String, String)>, String)> {
    let (head, value) = line.split_once(':')?;

    let mut chunks = head.split(';');
    let name = chunks.next()?;
    if !is_name(name) {
        return None;
    }

    let mut params = Vec::new();
    for chunk in chunks {
        match chunk.split_once('=') {
            Some((pname, pvalue)) if is_name(pname) && !pvalue.is_empty() => {
                params.push((pname.to_string(), pvalue.to_string()));
            }
            _ => {
                tracing::debug!(chunk, "ignoring unparsable parameter");
            }
        }
    }

    Some((name.to_string(), params, value.to_string()))
}

fn is_name(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_uppercase() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folded_lines_are_merged() {
        let input = "SUMMARY:This summary was\r\n  folded over\r\n\ttwo continuations\r\n";
        let lines = logical_lines(input);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            (1, "SUMMARY:This summary was folded overtwo continuations".to_string())
        );
    }

    #[test]
    fn bare_lf_is_tolerated() {
        let lines = logical_lines("LINE-A:1\nLINE-B:2\n continues\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].1, "LINE-B:2continues");
    }

    #[test]
    fn line_numbers_are_physical() {
        let lines = logical_lines("A:1\r\nB:2\r\n more\r\nC:3\r\n");
        assert_eq!(
            lines.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
    }

    #[test]
    fn tokenize_plain_property() {
        let (name, params, value) = tokenize_property_line("SUMMARY:Team Meeting").unwrap();
        assert_eq!(name, "SUMMARY");
        assert!(params.is_empty());
        assert_eq!(value, "Team Meeting");
    }

    #[test]
    fn tokenize_with_parameters() {
        let (name, params, value) =
            tokenize_property_line("DTSTART;TZID=Europe/Athens;VALUE=DATE-TIME:20260114T090000")
                .unwrap();
        assert_eq!(name, "DTSTART");
        assert_eq!(
            params,
            vec![
                ("TZID".to_string(), "Europe/Athens".to_string()),
                ("VALUE".to_string(), "DATE-TIME".to_string())
            ]
        );
        assert_eq!(value, "20260114T090000");
    }

    #[test]
    fn value_may_contain_colons() {
        let (_, _, value) =
            tokenize_property_line("ATTENDEE;CN=Jane:mailto:jane@example.com").unwrap();
        assert_eq!(value, "mailto:jane@example.com");
    }

    #[test]
    fn unparsable_parameters_are_dropped() {
        let (name, params, _) =
            tokenize_property_line("DTSTART;TZID=Europe/Athens;garbage:20260114T090000").unwrap();
        assert_eq!(name, "DTSTART");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn lines_without_a_colon_are_rejected() {
        assert!(tokenize_property_line("NO COLON HERE").is_none());
    }

    #[test]
    fn lowercase_names_are_rejected() {
        assert!(tokenize_property_line("summary:Hi").is_none());
    }
}
