//! Component-level invariants beyond schema cardinality.
//!
//! Two tiers: [`mutation_invariant`] must hold after every property
//! addition (additions that would break it are rolled back), while
//! [`validation_invariant`] adds the ACTION-dependent VALARM completion
//! rules checked by `is_valid` and serialization. The completion rules
//! cannot be per-addition rules: ACTION is required, so an EMAIL alarm
//! under per-addition checking could only be assembled in one property
//! order.

use std::cmp::Ordering;

use super::core::component::{Component, ComponentKind};

/// Rules every component must satisfy at all times.
#[must_use]
pub(crate) fn mutation_invariant(component: &Component) -> bool {
    match component.kind() {
        ComponentKind::Event | ComponentKind::FreeBusy => temporal_rules(component),
        ComponentKind::Todo => temporal_rules(component) && strictly_after(component, "DUE", "DTSTART"),
        _ => true,
    }
}

/// [`mutation_invariant`] plus completion rules.
#[must_use]
pub(crate) fn validation_invariant(component: &Component) -> bool {
    mutation_invariant(component) && alarm_completion(component)
}

/// DTEND/DURATION exclusivity and DTEND > DTSTART.
fn temporal_rules(component: &Component) -> bool {
    if component.property("DTEND").is_some() && component.property("DURATION").is_some() {
        return false;
    }
    strictly_after(component, "DTEND", "DTSTART")
}

/// When both properties are present, `later`'s value must compare strictly
/// greater than `earlier`'s. The two must share a value type: a DATE
/// against a DATE-TIME does not compare and is a violation, never an
/// implicit coercion.
fn strictly_after(component: &Component, later: &str, earlier: &str) -> bool {
    match (component.property(later), component.property(earlier)) {
        (Some(l), Some(e)) => match (l.value(), e.value()) {
            (Some(lv), Some(ev)) => {
                matches!(lv.compare_same_kind(ev), Some(Ordering::Greater))
            }
            _ => true,
        },
        _ => true,
    }
}

/// ACTION decides which companion properties a VALARM must carry.
fn alarm_completion(component: &Component) -> bool {
    if component.kind() != ComponentKind::Alarm {
        return true;
    }
    let Some(action) = component.property("ACTION").and_then(|p| p.as_text()) else {
        return true;
    };
    match action {
        "AUDIO" => !component.properties("ATTACH").is_empty(),
        "DISPLAY" => component.property("DESCRIPTION").is_some(),
        "EMAIL" => {
            component.property("DESCRIPTION").is_some()
                && component.property("SUMMARY").is_some()
                && !component.properties("ATTACH").is_empty()
        }
        "PROCEDURE" => component.properties("ATTACH").len() == 1,
        _ => true,
    }
}
