//! Document parser: a stack machine over BEGIN/END markers.
//!
//! Each open component is a stack frame owning its raw-line buffer and its
//! (already instantiated) tree node. When a frame closes, its accumulated
//! text is re-parsed by the same procedure — a component's serialized form
//! is itself a parseable document of that kind — and the populated child is
//! attached to the enclosing frame, or to the outermost tree when the stack
//! is empty (an explicit root case, not a sentinel).
//!
//! Errors accumulate; the parser never aborts early. A non-empty error list
//! means the returned tree is best-effort and must not be trusted without
//! validation.

use super::error::{ParseError, ParseErrorKind};
use super::lexer::{logical_lines, tokenize_property_line};
use crate::ical::core::{Component, ComponentKind};

/// Outcome of parsing one document: the populated tree plus every error
/// encountered.
#[derive(Debug)]
pub struct ParseReport {
    /// The parsed tree; partially populated when `errors` is non-empty.
    pub root: Component,
    /// Accumulated (line, kind) errors, in document order.
    pub errors: Vec<ParseError>,
}

impl ParseReport {
    /// Whether the document parsed without a single error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parses a calendar document, taking the root kind from the first
/// `BEGIN:` line. An unusable first line yields an empty VCALENDAR root
/// and an [`ParseErrorKind::InvalidComponentStart`] error.
#[must_use]
#[tracing::instrument(skip(input), fields(input_len = input.len()))]
pub fn parse(input: &str) -> ParseReport {
    let lines = logical_lines(input);
    tracing::debug!(count = lines.len(), "split logical lines");

    let kind = lines
        .first()
        .and_then(|(_, line)| line.strip_prefix("BEGIN:"))
        .and_then(ComponentKind::from_name);

    match kind {
        Some(kind) => {
            let mut root = Component::new(kind);
            let mut errors = Vec::new();
            parse_lines(&mut root, &lines, &mut errors);
            tracing::debug!(errors = errors.len(), %kind, "document parsed");
            ParseReport { root, errors }
        }
        None => {
            tracing::warn!("input does not start with a known BEGIN tag");
            ParseReport {
                root: Component::calendar(),
                errors: vec![ParseError::new(ParseErrorKind::InvalidComponentStart, 1)],
            }
        }
    }
}

impl Component {
    /// Populates this component from serialized text, checking that the
    /// text's BEGIN tag names this component's kind. Returns every error
    /// encountered; an empty list means a clean parse.
    pub fn parse_into(&mut self, input: &str) -> Vec<ParseError> {
        let lines = logical_lines(input);
        let mut errors = Vec::new();
        parse_lines(self, &lines, &mut errors);
        errors
    }
}

/// A component that is open on the parse stack.
struct Frame {
    node: Component,
    begin_line: usize,
    buffer: Vec<(usize, String)>,
}

fn parse_lines(root: &mut Component, lines: &[(usize, String)], errors: &mut Vec<ParseError>) {
    let Some(((first_line, first), rest)) = lines.split_first() else {
        errors.push(ParseError::new(ParseErrorKind::InvalidComponentStart, 1));
        return;
    };

    let begin = format!("BEGIN:{}", root.kind());
    if !first.eq_ignore_ascii_case(&begin) {
        errors.push(ParseError::new(
            ParseErrorKind::InvalidComponentStart,
            *first_line,
        ));
    }

    let end = format!("END:{}", root.kind());
    let body = match rest.split_last() {
        Some(((_, last), body)) if last.eq_ignore_ascii_case(&end) => body,
        _ => {
            let line = rest.last().map_or(*first_line, |(n, _)| *n);
            errors.push(ParseError::new(ParseErrorKind::MalformedLine, line));
            rest
        }
    };

    let mut stack: Vec<Frame> = Vec::new();

    for (line_no, line) in body {
        // A known nested component opens a frame, at any depth.
        if let Some(name) = line.strip_prefix("BEGIN:")
            && let Some(kind) = ComponentKind::from_name(name)
            && kind != ComponentKind::Calendar
        {
            stack.push(Frame {
                node: Component::new(kind),
                begin_line: *line_no,
                buffer: Vec::new(),
            });
            continue;
        }

        if line.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("END:")) {
            match stack.pop() {
                Some(frame) => close_frame(root, &mut stack, frame, *line_no, line, errors),
                None => errors.push(ParseError::new(ParseErrorKind::MalformedLine, *line_no)),
            }
            continue;
        }

        // Inside an open frame, lines accumulate verbatim; they are parsed
        // when the frame closes.
        if let Some(top) = stack.last_mut() {
            top.buffer.push((*line_no, line.clone()));
            continue;
        }

        match tokenize_property_line(line) {
            Some((name, params, value)) => {
                let params: Vec<(&str, &str)> = params
                    .iter()
                    .map(|(n, v)| (n.as_str(), v.as_str()))
                    .collect();
                if let Err(err) = root.add_property(&name, Some(&value), &params) {
                    tracing::trace!(line = *line_no, property = %name, %err, "property rejected");
                    errors.push(ParseError::new(
                        ParseErrorKind::PropertyAttachFailure,
                        *line_no,
                    ));
                }
            }
            None => errors.push(ParseError::new(ParseErrorKind::MalformedLine, *line_no)),
        }
    }

    // Frames still open at end of input never saw their END line; their
    // partial nodes are discarded.
    for frame in stack {
        errors.push(ParseError::new(
            ParseErrorKind::SubcomponentParseFailure,
            frame.begin_line,
        ));
    }
}

fn close_frame(
    root: &mut Component,
    stack: &mut [Frame],
    frame: Frame,
    end_line: usize,
    end_text: &str,
    errors: &mut Vec<ParseError>,
) {
    let Frame {
        mut node,
        begin_line,
        buffer,
    } = frame;

    // Reconstitute the frame's text and parse it as a standalone document
    // of its kind.
    let mut sequence: Vec<(usize, String)> = Vec::with_capacity(buffer.len() + 2);
    sequence.push((begin_line, format!("BEGIN:{}", node.kind())));
    sequence.extend(buffer);
    sequence.push((end_line, end_text.to_string()));

    let mut sub_errors = Vec::new();
    parse_lines(&mut node, &sequence, &mut sub_errors);
    if !sub_errors.is_empty() {
        tracing::debug!(
            kind = %node.kind(),
            count = sub_errors.len(),
            line = end_line,
            "sub-component had parse errors"
        );
        errors.push(ParseError::new(
            ParseErrorKind::SubcomponentParseFailure,
            end_line,
        ));
    }

    let attached = match stack.last_mut() {
        Some(parent) => parent.node.add_component(node),
        None => root.add_component(node),
    };
    if attached.is_err() {
        errors.push(ParseError::new(
            ParseErrorKind::SubcomponentAttachFailure,
            end_line,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_VEVENT: &str = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:test-uid-123@example.com\r\n\
DTSTAMP:20260123T120000Z\r\n\
DTSTART:20260123T140000Z\r\n\
DTEND:20260123T150000Z\r\n\
SUMMARY:Test Event\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    #[test_log::test]
    fn parse_simple_vevent() {
        let report = parse(SIMPLE_VEVENT);
        assert!(report.is_success(), "errors: {:?}", report.errors);

        let calendar = &report.root;
        assert_eq!(calendar.kind(), ComponentKind::Calendar);
        assert_eq!(
            calendar.property("VERSION").and_then(|p| p.as_text()),
            Some("2.0")
        );

        let events = calendar.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid(), Some("test-uid-123@example.com"));
        assert_eq!(events[0].summary(), Some("Test Event"));
    }

    #[test]
    fn malformed_line_is_recorded_and_parsing_continues() {
        let input = "\
BEGIN:VEVENT\r\n\
THIS LINE HAS NO COLON\r\n\
END:VEVENT\r\n";

        let report = parse(input);
        assert!(!report.is_success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ParseErrorKind::MalformedLine);
        assert_eq!(report.errors[0].line, 2);
        assert_eq!(report.root.kind(), ComponentKind::Event);
    }

    #[test]
    fn rejected_property_is_an_attach_failure() {
        let input = "\
BEGIN:VEVENT\r\n\
UID:ok@example.com\r\n\
FREEBUSY:20260101T000000Z/PT1H\r\n\
END:VEVENT\r\n";

        let report = parse(input);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ParseErrorKind::PropertyAttachFailure);
        assert_eq!(report.errors[0].line, 3);
        // The rest of the document still landed.
        assert_eq!(report.root.uid(), Some("ok@example.com"));
    }

    #[test]
    fn unknown_first_line_reports_invalid_start() {
        let report = parse("VERSION:2.0\r\n");
        assert!(!report.is_success());
        assert_eq!(
            report.errors[0].kind,
            ParseErrorKind::InvalidComponentStart
        );
        assert_eq!(report.root.kind(), ComponentKind::Calendar);
    }

    #[test]
    fn nested_alarm_stays_nested() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VEVENT\r\n\
UID:alarm@example.com\r\n\
DTSTAMP:20260123T120000Z\r\n\
DTSTART:20260123T090000Z\r\n\
SUMMARY:Event with Alarm\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT15M\r\n\
DESCRIPTION:Reminder\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let report = parse(input);
        assert!(report.is_success(), "errors: {:?}", report.errors);

        let events = report.root.events();
        assert_eq!(events.len(), 1);
        let alarms = events[0].alarms();
        assert_eq!(alarms.len(), 1);
        assert_eq!(
            alarms[0].property("ACTION").and_then(|p| p.as_text()),
            Some("DISPLAY")
        );
        // Not hoisted to the top level.
        assert!(report.root.alarms().is_empty());
    }

    #[test]
    fn deeply_nested_timezone_phases() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:-//Test//Test//EN\r\n\
BEGIN:VTIMEZONE\r\n\
TZID:Europe/Athens\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19971026T040000\r\n\
TZOFFSETFROM:+0300\r\n\
TZOFFSETTO:+0200\r\n\
TZNAME:EET\r\n\
END:STANDARD\r\n\
BEGIN:DAYLIGHT\r\n\
DTSTART:19970330T030000\r\n\
TZOFFSETFROM:+0200\r\n\
TZOFFSETTO:+0300\r\n\
TZNAME:EEST\r\n\
END:DAYLIGHT\r\n\
END:VTIMEZONE\r\n\
END:VCALENDAR\r\n";

        let report = parse(input);
        assert!(report.is_success(), "errors: {:?}", report.errors);

        let timezones = report.root.timezones();
        assert_eq!(timezones.len(), 1);
        assert_eq!(
            timezones[0].children_of(ComponentKind::Standard).len(),
            1
        );
        assert_eq!(
            timezones[0].children_of(ComponentKind::Daylight).len(),
            1
        );
    }

    #[test]
    fn misplaced_component_is_an_attach_failure() {
        // STANDARD is only legal inside VTIMEZONE.
        let input = "\
BEGIN:VEVENT\r\n\
UID:x@example.com\r\n\
BEGIN:STANDARD\r\n\
DTSTART:19971026T040000\r\n\
TZOFFSETFROM:+0300\r\n\
TZOFFSETTO:+0200\r\n\
END:STANDARD\r\n\
END:VEVENT\r\n";

        let report = parse(input);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].kind,
            ParseErrorKind::SubcomponentAttachFailure
        );
        assert_eq!(report.root.child_count(), 0);
    }

    #[test]
    fn broken_subcomponent_is_reported_once() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:broken@example.com\r\n\
NOT A PROPERTY LINE\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let report = parse(input);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].kind,
            ParseErrorKind::SubcomponentParseFailure
        );
        assert_eq!(report.errors[0].line, 6);
        // Best-effort: the event is still attached with its good lines.
        assert_eq!(report.root.events().len(), 1);
        assert_eq!(report.root.events()[0].uid(), Some("broken@example.com"));
    }

    #[test]
    fn stray_end_is_malformed() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        let report = parse(input);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ParseErrorKind::MalformedLine);
    }

    #[test]
    fn unclosed_subcomponent_is_discarded() {
        let input = "\
BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
UID:lost@example.com\r\n\
END:VCALENDAR\r\n";

        let report = parse(input);
        assert!(!report.is_success());
        assert!(
            report
                .errors
                .iter()
                .any(|e| e.kind == ParseErrorKind::SubcomponentParseFailure)
        );
        assert!(report.root.events().is_empty());
    }

    #[test]
    fn parse_into_checks_the_component_kind() {
        let mut todo = Component::todo();
        let errors = todo.parse_into("BEGIN:VEVENT\r\nUID:x@example.com\r\nEND:VEVENT\r\n");
        assert!(
            errors
                .iter()
                .any(|e| e.kind == ParseErrorKind::InvalidComponentStart)
        );
    }

    #[test]
    fn folded_property_survives_parsing() {
        let input = "\
BEGIN:VEVENT\r\n\
UID:folded@example.com\r\n\
SUMMARY:This is a very long summary that needs to be folded across mul\r\n\
\x20tiple physical lines to stay under the octet limit\r\n\
END:VEVENT\r\n";

        let report = parse(input);
        assert!(report.is_success(), "errors: {:?}", report.errors);
        let summary = report.root.summary().unwrap();
        assert!(summary.contains("folded across multiple physical lines"));
    }
}
