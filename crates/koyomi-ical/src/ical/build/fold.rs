//! Content line folding (RFC 2445 §4.1).

/// Maximum physical line length in octets (not characters).
const MAX_LINE_OCTETS: usize = 75;

/// Folds a logical line so no physical line exceeds 75 octets.
///
/// Continuation lines are prefixed with a single space; folds land on UTF-8
/// character boundaries. Purely syntactic — unfolding restores the input
/// exactly.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut current_len = 0;
    let mut first_segment = true;

    for c in line.chars() {
        let char_len = c.len_utf8();

        // Continuation lines lose one octet to the space prefix.
        let effective_max = if first_segment {
            MAX_LINE_OCTETS
        } else {
            MAX_LINE_OCTETS - 1
        };

        if current_len + char_len > effective_max {
            result.push_str("\r\n ");
            current_len = 1;
            first_segment = false;
        }

        result.push(c);
        current_len += char_len;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_line_unchanged() {
        let line = "SUMMARY:Team meeting";
        assert_eq!(fold_line(line), line);
    }

    #[test]
    fn folds_at_75_octets() {
        let line = format!("DESCRIPTION:{}", "X".repeat(100));
        let folded = fold_line(&line);
        assert!(folded.contains("\r\n "));

        let first: String = folded.chars().take_while(|&c| c != '\r').collect();
        assert_eq!(first.len(), 75);
    }

    #[test]
    fn every_physical_line_fits() {
        let line = format!("DESCRIPTION:{}", "word ".repeat(60));
        for physical in fold_line(&line).split("\r\n") {
            assert!(physical.len() <= 75);
        }
    }

    #[test]
    fn folds_on_utf8_boundaries() {
        // Multi-byte characters must not be split mid-sequence.
        let line = format!("SUMMARY:{}", "カレンダー".repeat(10));
        let folded = fold_line(&line);
        for part in folded.split("\r\n ") {
            assert!(part.is_char_boundary(part.len()));
        }
    }

    #[test]
    fn unfolding_reverses_folding() {
        let line = format!("DESCRIPTION:{}", "abcdefghij".repeat(20));
        let folded = fold_line(&line);
        let unfolded = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }
}
