//! Atomicity of mutation: a rejected add leaves the tree identical.

use crate::error::MutationError;
use crate::ical::core::Component;

fn populated_event() -> Component {
    let mut event = Component::event();
    event
        .add_property("UID", Some("atomic@example.com"), &[])
        .unwrap();
    event
        .add_property("DTSTAMP", Some("20260113T120000Z"), &[])
        .unwrap();
    event
        .add_property("DTSTART", Some("20260114T090000Z"), &[])
        .unwrap();
    event
        .add_property("DTEND", Some("20260114T100000Z"), &[])
        .unwrap();
    event
}

#[test]
fn each_failure_mode_maps_to_its_error() {
    let event = populated_event();

    let failures: Vec<(Result<(), MutationError>, MutationError)> = vec![
        // Name outside schema and extension pattern.
        (
            event
                .clone()
                .add_property("TZID", Some("Europe/Athens"), &[]),
            MutationError::InvalidProperty,
        ),
        // Parameter not in the property's vocabulary.
        (
            event
                .clone()
                .add_property("SUMMARY", Some("x"), &[("TZID", "Europe/Athens")]),
            MutationError::InvalidParameter,
        ),
        // ENCODING=BASE64 without VALUE=BINARY.
        (
            event.clone().add_property(
                "ATTACH",
                Some("http://example.com/a.pdf"),
                &[("ENCODING", "BASE64")],
            ),
            MutationError::PropertyInvariantViolation,
        ),
        // Value text that is not a date-time.
        (
            event.clone().add_property("DTSTART", Some("yesterday"), &[]),
            MutationError::InvalidValue,
        ),
        // DURATION alongside the existing DTEND.
        (
            event.clone().add_property("DURATION", Some("PT1H"), &[]),
            MutationError::ComponentInvariantViolation,
        ),
        // No value and no default.
        (
            event.clone().add_property("UID", None, &[]),
            MutationError::NoDefaultValue,
        ),
    ];
    for (result, expected) in failures {
        assert_eq!(result, Err(expected));
    }
}

#[test]
fn rejected_add_preserves_contents_exactly() {
    let mut event = populated_event();
    let before = event.clone();

    assert!(event.add_property("DURATION", Some("PT1H"), &[]).is_err());
    assert_eq!(event, before);
    assert_eq!(event.property_count(), before.property_count());

    assert!(
        event
            .add_property("DTEND", Some("20260114T080000Z"), &[])
            .is_err()
    );
    assert_eq!(event, before);

    assert!(event.add_component(Component::todo()).is_err());
    assert_eq!(event, before);
    assert_eq!(event.child_count(), 0);
}

#[test]
fn rejected_component_leaves_children_unchanged() {
    let mut event = populated_event();
    event.add_component(Component::alarm()).unwrap();
    let before = event.clone();

    assert_eq!(
        event.add_component(Component::event()),
        Err(MutationError::InvalidComponentKind)
    );
    assert_eq!(event, before);
    assert_eq!(event.alarms().len(), 1);
}
