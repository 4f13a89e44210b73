//! Round-trip tests: parse → serialize → parse must reproduce the tree.

use super::fixtures::*;
use crate::ical::parse::parse;

/// Parses a document, serializes the tree, parses the output again, and
/// requires the two trees to be semantically equal with zero errors on both
/// passes.
fn round_trip(input: &str) {
    let mut first = parse(input);
    assert!(first.is_success(), "first parse failed: {:?}", first.errors);

    let text = first.root.serialize().expect("tree should serialize");

    let second = parse(&text);
    assert!(
        second.is_success(),
        "second parse failed: {:?}\n{text}",
        second.errors
    );

    assert_eq!(first.root, second.root, "round trip diverged:\n{text}");
}

#[test]
fn vevent_minimal() {
    round_trip(VEVENT_MINIMAL);
}

#[test]
fn vevent_recurring() {
    round_trip(VEVENT_RECURRING);
}

#[test]
fn vevent_with_alarm() {
    round_trip(VEVENT_WITH_ALARM);
}

#[test]
fn vevent_escaped_text_and_params() {
    round_trip(VEVENT_ESCAPED_AND_PARAMS);
}

#[test]
fn vtodo_basic() {
    round_trip(VTODO_BASIC);
}

#[test]
fn vjournal_basic() {
    round_trip(VJOURNAL_BASIC);
}

#[test]
fn vfreebusy_request() {
    round_trip(VFREEBUSY_REQUEST);
}

#[test]
fn vtimezone_full() {
    round_trip(VTIMEZONE_FULL);
}

#[test]
fn alarm_stays_nested_through_round_trip() {
    let mut first = parse(VEVENT_WITH_ALARM);
    let text = first.root.serialize().expect("tree should serialize");
    let second = parse(&text);

    let events = second.root.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].alarms().len(), 1);
    assert!(second.root.alarms().is_empty());
}

#[test]
fn programmatic_tree_round_trips() {
    use crate::ical::core::Component;

    let mut event = Component::event();
    event
        .add_property("UID", Some("built@example.com"), &[])
        .unwrap();
    event
        .add_property("DTSTAMP", Some("20260113T120000Z"), &[])
        .unwrap();
    event
        .add_property(
            "DTSTART",
            Some("20260114"),
            &[("VALUE", "DATE"), ("X-SOURCE", "importer")],
        )
        .unwrap();
    event
        .add_property("SUMMARY", Some("All day; offsite, remote"), &[])
        .unwrap();

    let mut calendar = Component::calendar();
    calendar.add_component(event).unwrap();

    let text = calendar.serialize().expect("tree should serialize");
    let report = parse(&text);
    assert!(report.is_success(), "errors: {:?}", report.errors);
    assert_eq!(report.root, calendar);

    let parsed_event = &report.root.events()[0];
    assert_eq!(parsed_event.summary(), Some("All day; offsite, remote"));
    assert!(parsed_event.property("DTSTART").unwrap().as_date().is_some());
}
