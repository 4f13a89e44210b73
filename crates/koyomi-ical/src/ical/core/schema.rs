//! Per-kind component schemas: allowed properties with cardinality flags,
//! and allowed child component kinds.
//!
//! These tables are the format contract. STANDARD and DAYLIGHT share one
//! table parameterized by the kind tag; they are distinct kinds, not an
//! inheritance relationship.

use super::component::ComponentKind;

/// REQUIRED/OPTIONAL × ONCE/MULTI flags for one property entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub required: bool,
    pub once: bool,
}

pub const REQUIRED_ONCE: Cardinality = Cardinality {
    required: true,
    once: true,
};
pub const OPTIONAL_ONCE: Cardinality = Cardinality {
    required: false,
    once: true,
};
pub const OPTIONAL_MULTI: Cardinality = Cardinality {
    required: false,
    once: false,
};

/// Schema entry for one component kind.
#[derive(Debug)]
pub struct Schema {
    /// Allowed property names with their cardinality, in canonical emission
    /// order for default filling.
    pub properties: &'static [(&'static str, Cardinality)],
    /// Allowed child component kinds.
    pub components: &'static [ComponentKind],
}

impl Schema {
    /// Looks up the cardinality for a property name (exact, uppercase).
    #[must_use]
    pub fn cardinality(&self, name: &str) -> Option<Cardinality> {
        self.properties
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
    }

    /// Whether `kind` may be nested under a component with this schema.
    #[must_use]
    pub fn allows_component(&self, kind: ComponentKind) -> bool {
        self.components.contains(&kind)
    }

    /// Cardinality of the extension wildcard: extension properties are
    /// always optional and multi-instance.
    #[must_use]
    pub const fn extension_cardinality() -> Cardinality {
        OPTIONAL_MULTI
    }
}

/// Whether `name` is a syntactically valid extension (X-) name: the `X-`
/// prefix followed by at least one alphanumeric-or-hyphen character.
/// Expects an already-uppercased name.
#[must_use]
pub fn is_extension_name(name: &str) -> bool {
    match name.strip_prefix("X-") {
        Some(rest) => {
            !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        }
        None => false,
    }
}

pub static VCALENDAR: Schema = Schema {
    properties: &[
        ("CALSCALE", OPTIONAL_ONCE),
        ("METHOD", OPTIONAL_ONCE),
        ("PRODID", REQUIRED_ONCE),
        ("VERSION", REQUIRED_ONCE),
    ],
    components: &[
        ComponentKind::Event,
        ComponentKind::Todo,
        ComponentKind::Journal,
        ComponentKind::FreeBusy,
        ComponentKind::Timezone,
        ComponentKind::Alarm,
    ],
};

pub static VEVENT: Schema = Schema {
    properties: &[
        ("CLASS", OPTIONAL_ONCE),
        ("CREATED", OPTIONAL_ONCE),
        ("DESCRIPTION", OPTIONAL_ONCE),
        // RFC 2445 is ambiguous on DTSTAMP/DTSTART/UID (optional in §4.6.1,
        // required in §4.8); required here.
        ("DTSTAMP", REQUIRED_ONCE),
        ("DTSTART", REQUIRED_ONCE),
        ("GEO", OPTIONAL_ONCE),
        ("LAST-MODIFIED", OPTIONAL_ONCE),
        ("LOCATION", OPTIONAL_ONCE),
        ("ORGANIZER", OPTIONAL_ONCE),
        ("PRIORITY", OPTIONAL_ONCE),
        ("SEQUENCE", OPTIONAL_ONCE),
        ("STATUS", OPTIONAL_ONCE),
        ("SUMMARY", OPTIONAL_ONCE),
        ("TRANSP", OPTIONAL_ONCE),
        ("UID", REQUIRED_ONCE),
        ("URL", OPTIONAL_ONCE),
        ("RECURRENCE-ID", OPTIONAL_ONCE),
        ("DTEND", OPTIONAL_ONCE),
        ("DURATION", OPTIONAL_ONCE),
        ("ATTACH", OPTIONAL_MULTI),
        ("ATTENDEE", OPTIONAL_MULTI),
        ("CATEGORIES", OPTIONAL_MULTI),
        ("COMMENT", OPTIONAL_MULTI),
        ("CONTACT", OPTIONAL_MULTI),
        ("EXDATE", OPTIONAL_MULTI),
        ("EXRULE", OPTIONAL_MULTI),
        ("REQUEST-STATUS", OPTIONAL_MULTI),
        ("RELATED-TO", OPTIONAL_MULTI),
        ("RESOURCES", OPTIONAL_MULTI),
        ("RDATE", OPTIONAL_MULTI),
        ("RRULE", OPTIONAL_MULTI),
    ],
    components: &[ComponentKind::Alarm],
};

pub static VTODO: Schema = Schema {
    properties: &[
        ("CLASS", OPTIONAL_ONCE),
        ("COMPLETED", OPTIONAL_ONCE),
        ("CREATED", OPTIONAL_ONCE),
        ("DESCRIPTION", OPTIONAL_ONCE),
        ("DTSTAMP", OPTIONAL_ONCE),
        ("DTSTART", OPTIONAL_ONCE),
        ("GEO", OPTIONAL_ONCE),
        ("LAST-MODIFIED", OPTIONAL_ONCE),
        ("LOCATION", OPTIONAL_ONCE),
        ("ORGANIZER", OPTIONAL_ONCE),
        ("PERCENT-COMPLETE", OPTIONAL_ONCE),
        ("PRIORITY", OPTIONAL_ONCE),
        ("RECURRENCE-ID", OPTIONAL_ONCE),
        ("SEQUENCE", OPTIONAL_ONCE),
        ("STATUS", OPTIONAL_ONCE),
        ("SUMMARY", OPTIONAL_ONCE),
        ("UID", OPTIONAL_ONCE),
        ("URL", OPTIONAL_ONCE),
        ("DUE", OPTIONAL_ONCE),
        ("DURATION", OPTIONAL_ONCE),
        ("ATTACH", OPTIONAL_MULTI),
        ("ATTENDEE", OPTIONAL_MULTI),
        ("CATEGORIES", OPTIONAL_MULTI),
        ("COMMENT", OPTIONAL_MULTI),
        ("CONTACT", OPTIONAL_MULTI),
        ("EXDATE", OPTIONAL_MULTI),
        ("EXRULE", OPTIONAL_MULTI),
        ("REQUEST-STATUS", OPTIONAL_MULTI),
        ("RELATED-TO", OPTIONAL_MULTI),
        ("RESOURCES", OPTIONAL_MULTI),
        ("RDATE", OPTIONAL_MULTI),
        ("RRULE", OPTIONAL_MULTI),
    ],
    components: &[ComponentKind::Alarm],
};

pub static VJOURNAL: Schema = Schema {
    properties: &[
        ("CLASS", OPTIONAL_ONCE),
        ("CREATED", OPTIONAL_ONCE),
        ("DESCRIPTION", OPTIONAL_ONCE),
        ("DTSTART", OPTIONAL_ONCE),
        ("DTSTAMP", OPTIONAL_ONCE),
        ("LAST-MODIFIED", OPTIONAL_ONCE),
        ("ORGANIZER", OPTIONAL_ONCE),
        ("RECURRENCE-ID", OPTIONAL_ONCE),
        ("SEQUENCE", OPTIONAL_ONCE),
        ("STATUS", OPTIONAL_ONCE),
        ("SUMMARY", OPTIONAL_ONCE),
        ("UID", OPTIONAL_ONCE),
        ("URL", OPTIONAL_ONCE),
        ("ATTACH", OPTIONAL_MULTI),
        ("ATTENDEE", OPTIONAL_MULTI),
        ("CATEGORIES", OPTIONAL_MULTI),
        ("COMMENT", OPTIONAL_MULTI),
        ("CONTACT", OPTIONAL_MULTI),
        ("EXDATE", OPTIONAL_MULTI),
        ("EXRULE", OPTIONAL_MULTI),
        ("RELATED-TO", OPTIONAL_MULTI),
        ("RDATE", OPTIONAL_MULTI),
        ("RRULE", OPTIONAL_MULTI),
    ],
    components: &[],
};

pub static VFREEBUSY: Schema = Schema {
    properties: &[
        ("CONTACT", OPTIONAL_ONCE),
        ("DTSTART", OPTIONAL_ONCE),
        ("DTEND", OPTIONAL_ONCE),
        ("DURATION", OPTIONAL_ONCE),
        ("DTSTAMP", OPTIONAL_ONCE),
        ("ORGANIZER", OPTIONAL_ONCE),
        ("UID", OPTIONAL_ONCE),
        ("URL", OPTIONAL_ONCE),
        ("ATTENDEE", OPTIONAL_MULTI),
        ("COMMENT", OPTIONAL_MULTI),
        ("FREEBUSY", OPTIONAL_MULTI),
        ("REQUEST-STATUS", OPTIONAL_MULTI),
    ],
    components: &[],
};

pub static VALARM: Schema = Schema {
    properties: &[
        ("ACTION", REQUIRED_ONCE),
        ("TRIGGER", REQUIRED_ONCE),
        // DURATION and REPEAT: if one occurs, so must the other.
        ("DURATION", OPTIONAL_ONCE),
        ("REPEAT", OPTIONAL_ONCE),
        ("ATTACH", OPTIONAL_MULTI),
        ("DESCRIPTION", OPTIONAL_ONCE),
        ("SUMMARY", OPTIONAL_ONCE),
        ("ATTENDEE", OPTIONAL_MULTI),
    ],
    components: &[],
};

pub static VTIMEZONE: Schema = Schema {
    properties: &[
        ("TZID", REQUIRED_ONCE),
        ("LAST-MODIFIED", OPTIONAL_ONCE),
        ("TZURL", OPTIONAL_ONCE),
    ],
    components: &[ComponentKind::Standard, ComponentKind::Daylight],
};

/// Shared by STANDARD and DAYLIGHT.
pub static TZ_PHASE: Schema = Schema {
    properties: &[
        ("DTSTART", REQUIRED_ONCE),
        ("TZOFFSETTO", REQUIRED_ONCE),
        ("TZOFFSETFROM", REQUIRED_ONCE),
        ("COMMENT", OPTIONAL_MULTI),
        ("RDATE", OPTIONAL_MULTI),
        ("RRULE", OPTIONAL_MULTI),
        ("TZNAME", OPTIONAL_MULTI),
    ],
    components: &[],
};
