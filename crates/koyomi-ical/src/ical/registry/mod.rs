//! Property type registry.
//!
//! Maps every property name of the format vocabulary to a static descriptor:
//! the value kinds the property accepts (first entry is the default), the
//! parameters it allows, whether comma-separated value lists are legal, its
//! intrinsic default value, and an optional vocabulary check. Extension
//! (`X-`) names resolve to one generic descriptor.
//!
//! The table is registered once and resolved at first use via `LazyLock`;
//! per-call behavior is a plain map lookup. Site-specific default material
//! (the PRODID string) comes in through [`RegistryConfig`], not ambient
//! state.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::core::component::ComponentKind;
use super::core::property::Property;
use super::core::schema::is_extension_name;
use super::core::value::{Value, ValueKind};

/// Explicit configuration for registry-provided defaults.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Value emitted for a defaulted PRODID.
    pub prodid: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            prodid: "-//Koyomi//Koyomi iCalendar Library//EN".to_string(),
        }
    }
}

/// How a property's intrinsic default is produced, if at all.
#[derive(Debug, Clone, Copy)]
enum DefaultValue {
    None,
    Fixed(&'static str),
    ProdId,
}

/// Vocabulary check applied after a value parses; the component kind is the
/// property's parent, for the handful of properties whose legal values
/// depend on where they live.
type ValueCheck = fn(&Value, ComponentKind) -> bool;

/// Static descriptor for one property name.
#[derive(Debug)]
pub struct PropertySpec {
    pub name: &'static str,
    /// Accepted value kinds; the first is the default when no VALUE
    /// parameter is given.
    pub kinds: &'static [ValueKind],
    /// Accepted parameter names (X- parameters are always accepted).
    pub params: &'static [&'static str],
    /// Whether comma-separated multi-valued text is legal.
    pub lists: bool,
    default: DefaultValue,
    pub check: Option<ValueCheck>,
    /// Marks the generic extension descriptor, which accepts any parameter.
    pub extension: bool,
}

const NO_PARAMS: &[&str] = &[];
const TEXT_PARAMS: &[&str] = &["ALTREP", "LANGUAGE"];
const LANG_PARAMS: &[&str] = &["LANGUAGE"];
const DATE_PARAMS: &[&str] = &["VALUE", "TZID"];
const RECURRENCE_ID_PARAMS: &[&str] = &["VALUE", "TZID", "RANGE"];
const TRIGGER_PARAMS: &[&str] = &["VALUE", "RELATED"];
const ATTACH_PARAMS: &[&str] = &["FMTTYPE", "VALUE", "ENCODING"];
const ATTENDEE_PARAMS: &[&str] = &[
    "CUTYPE",
    "MEMBER",
    "ROLE",
    "PARTSTAT",
    "RSVP",
    "DELEGATED-TO",
    "DELEGATED-FROM",
    "SENT-BY",
    "CN",
    "DIR",
    "LANGUAGE",
];
const ORGANIZER_PARAMS: &[&str] = &["CN", "DIR", "SENT-BY", "LANGUAGE"];
const RELATED_TO_PARAMS: &[&str] = &["RELTYPE"];
const FREEBUSY_PARAMS: &[&str] = &["FBTYPE"];

const fn spec(
    name: &'static str,
    kinds: &'static [ValueKind],
    params: &'static [&'static str],
) -> PropertySpec {
    PropertySpec {
        name,
        kinds,
        params,
        lists: false,
        default: DefaultValue::None,
        check: None,
        extension: false,
    }
}

const fn checked(
    name: &'static str,
    kinds: &'static [ValueKind],
    params: &'static [&'static str],
    check: ValueCheck,
) -> PropertySpec {
    PropertySpec {
        name,
        kinds,
        params,
        lists: false,
        default: DefaultValue::None,
        check: Some(check),
        extension: false,
    }
}

const fn listed(
    name: &'static str,
    kinds: &'static [ValueKind],
    params: &'static [&'static str],
) -> PropertySpec {
    PropertySpec {
        name,
        kinds,
        params,
        lists: true,
        default: DefaultValue::None,
        check: None,
        extension: false,
    }
}

fn text_is(value: &Value, allowed: &[&str]) -> bool {
    value.as_text().is_some_and(|t| allowed.contains(&t))
}

fn text_is_or_extension(value: &Value, allowed: &[&str]) -> bool {
    value
        .as_text()
        .is_some_and(|t| allowed.contains(&t) || is_extension_name(t))
}

fn check_version(value: &Value, _: ComponentKind) -> bool {
    text_is(value, &["2.0"])
}

fn check_calscale(value: &Value, _: ComponentKind) -> bool {
    text_is(value, &["GREGORIAN"])
}

fn check_class(value: &Value, _: ComponentKind) -> bool {
    text_is_or_extension(value, &["PUBLIC", "PRIVATE", "CONFIDENTIAL"])
}

fn check_transp(value: &Value, _: ComponentKind) -> bool {
    text_is(value, &["OPAQUE", "TRANSPARENT"])
}

fn check_action(value: &Value, _: ComponentKind) -> bool {
    text_is_or_extension(value, &["AUDIO", "DISPLAY", "EMAIL", "PROCEDURE"])
}

/// STATUS draws its vocabulary from the parent component kind.
fn check_status(value: &Value, parent: ComponentKind) -> bool {
    match parent {
        ComponentKind::Event => text_is(value, &["TENTATIVE", "CONFIRMED", "CANCELLED"]),
        ComponentKind::Todo => text_is(
            value,
            &["NEEDS-ACTION", "COMPLETED", "IN-PROCESS", "CANCELLED"],
        ),
        ComponentKind::Journal => text_is(value, &["DRAFT", "FINAL", "CANCELLED"]),
        _ => value.as_text().is_some(),
    }
}

fn check_priority(value: &Value, _: ComponentKind) -> bool {
    value.as_integer().is_some_and(|n| (0..=9).contains(&n))
}

fn check_percent(value: &Value, _: ComponentKind) -> bool {
    value.as_integer().is_some_and(|n| (0..=100).contains(&n))
}

fn check_non_negative(value: &Value, _: ComponentKind) -> bool {
    value.as_integer().is_some_and(|n| n >= 0)
}

static SPECS: &[PropertySpec] = &[
    // Calendar properties
    PropertySpec {
        name: "CALSCALE",
        kinds: &[ValueKind::Text],
        params: NO_PARAMS,
        lists: false,
        default: DefaultValue::Fixed("GREGORIAN"),
        check: Some(check_calscale),
        extension: false,
    },
    spec("METHOD", &[ValueKind::Text], NO_PARAMS),
    PropertySpec {
        name: "PRODID",
        kinds: &[ValueKind::Text],
        params: NO_PARAMS,
        lists: false,
        default: DefaultValue::ProdId,
        check: None,
        extension: false,
    },
    PropertySpec {
        name: "VERSION",
        kinds: &[ValueKind::Text],
        params: NO_PARAMS,
        lists: false,
        default: DefaultValue::Fixed("2.0"),
        check: Some(check_version),
        extension: false,
    },
    // Descriptive properties
    spec("ATTACH", &[ValueKind::Uri, ValueKind::Binary], ATTACH_PARAMS),
    spec("CATEGORIES", &[ValueKind::Text], LANG_PARAMS),
    checked(
        "CLASS",
        &[ValueKind::Text],
        NO_PARAMS,
        check_class,
    ),
    spec("COMMENT", &[ValueKind::Text], TEXT_PARAMS),
    spec("DESCRIPTION", &[ValueKind::Text], TEXT_PARAMS),
    spec("GEO", &[ValueKind::Geo], NO_PARAMS),
    spec("LOCATION", &[ValueKind::Text], TEXT_PARAMS),
    checked(
        "PERCENT-COMPLETE",
        &[ValueKind::Integer],
        NO_PARAMS,
        check_percent,
    ),
    checked(
        "PRIORITY",
        &[ValueKind::Integer],
        NO_PARAMS,
        check_priority,
    ),
    spec("RESOURCES", &[ValueKind::Text], TEXT_PARAMS),
    checked(
        "STATUS",
        &[ValueKind::Text],
        NO_PARAMS,
        check_status,
    ),
    spec("SUMMARY", &[ValueKind::Text], TEXT_PARAMS),
    // Date and time properties
    spec("COMPLETED", &[ValueKind::DateTime], NO_PARAMS),
    spec("DTEND", &[ValueKind::DateTime, ValueKind::Date], DATE_PARAMS),
    spec("DUE", &[ValueKind::DateTime, ValueKind::Date], DATE_PARAMS),
    spec(
        "DTSTART",
        &[ValueKind::DateTime, ValueKind::Date],
        DATE_PARAMS,
    ),
    spec("DURATION", &[ValueKind::Duration], NO_PARAMS),
    listed("FREEBUSY", &[ValueKind::Period], FREEBUSY_PARAMS),
    checked(
        "TRANSP",
        &[ValueKind::Text],
        NO_PARAMS,
        check_transp,
    ),
    // Timezone properties
    spec("TZID", &[ValueKind::Text], NO_PARAMS),
    spec("TZNAME", &[ValueKind::Text], LANG_PARAMS),
    spec("TZOFFSETFROM", &[ValueKind::UtcOffset], NO_PARAMS),
    spec("TZOFFSETTO", &[ValueKind::UtcOffset], NO_PARAMS),
    spec("TZURL", &[ValueKind::Uri], NO_PARAMS),
    // Relationship properties
    spec("ATTENDEE", &[ValueKind::CalAddress], ATTENDEE_PARAMS),
    spec("CONTACT", &[ValueKind::Text], TEXT_PARAMS),
    spec("ORGANIZER", &[ValueKind::CalAddress], ORGANIZER_PARAMS),
    spec(
        "RECURRENCE-ID",
        &[ValueKind::DateTime, ValueKind::Date],
        RECURRENCE_ID_PARAMS,
    ),
    spec("RELATED-TO", &[ValueKind::Text], RELATED_TO_PARAMS),
    spec("URL", &[ValueKind::Uri], NO_PARAMS),
    spec("UID", &[ValueKind::Text], NO_PARAMS),
    // Recurrence properties
    listed(
        "EXDATE",
        &[ValueKind::DateTime, ValueKind::Date],
        DATE_PARAMS,
    ),
    spec("EXRULE", &[ValueKind::Recur], NO_PARAMS),
    listed(
        "RDATE",
        &[ValueKind::DateTime, ValueKind::Date, ValueKind::Period],
        DATE_PARAMS,
    ),
    spec("RRULE", &[ValueKind::Recur], NO_PARAMS),
    // Alarm properties
    checked(
        "ACTION",
        &[ValueKind::Text],
        NO_PARAMS,
        check_action,
    ),
    checked(
        "REPEAT",
        &[ValueKind::Integer],
        NO_PARAMS,
        check_non_negative,
    ),
    spec(
        "TRIGGER",
        &[ValueKind::Duration, ValueKind::DateTime],
        TRIGGER_PARAMS,
    ),
    // Change management properties
    spec("CREATED", &[ValueKind::DateTime], NO_PARAMS),
    spec("DTSTAMP", &[ValueKind::DateTime], NO_PARAMS),
    spec("LAST-MODIFIED", &[ValueKind::DateTime], NO_PARAMS),
    checked(
        "SEQUENCE",
        &[ValueKind::Integer],
        NO_PARAMS,
        check_non_negative,
    ),
    spec("REQUEST-STATUS", &[ValueKind::Text], LANG_PARAMS),
];

/// The generic descriptor every extension property resolves to: text-valued,
/// any parameters, no default.
static EXTENSION: PropertySpec = PropertySpec {
    name: "X-",
    kinds: &[ValueKind::Text],
    params: NO_PARAMS,
    lists: false,
    default: DefaultValue::None,
    check: None,
    extension: true,
};

/// The resolved registry: name → descriptor plus default-value material.
#[derive(Debug)]
pub struct Registry {
    config: RegistryConfig,
    by_name: HashMap<&'static str, &'static PropertySpec>,
}

impl Registry {
    /// Builds a registry over the full property table with the given
    /// configuration.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let by_name = SPECS.iter().map(|s| (s.name, s)).collect();
        Self { config, by_name }
    }

    /// Creates a fresh property instance for `name` under `parent`, or
    /// `None` when the name is neither registered nor an extension name.
    /// The instance has no value yet; parameters and value are applied by
    /// the caller.
    #[must_use]
    pub fn instantiate(&self, name: &str, parent: ComponentKind) -> Option<Property> {
        let upper = name.to_ascii_uppercase();
        if let Some(spec) = self.by_name.get(upper.as_str()).copied() {
            let default = self.resolve_default(spec);
            Some(Property::new(upper, spec, parent, default))
        } else if is_extension_name(&upper) {
            Some(Property::new(upper, &EXTENSION, parent, None))
        } else {
            None
        }
    }

    fn resolve_default(&self, spec: &PropertySpec) -> Option<String> {
        match spec.default {
            DefaultValue::None => None,
            DefaultValue::Fixed(s) => Some(s.to_string()),
            DefaultValue::ProdId => Some(self.config.prodid.clone()),
        }
    }
}

static DEFAULT_REGISTRY: LazyLock<Registry> =
    LazyLock::new(|| Registry::new(RegistryConfig::default()));

/// The process-wide registry built from [`RegistryConfig::default`].
#[must_use]
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_name_resolves() {
        let prop = default_registry()
            .instantiate("summary", ComponentKind::Event)
            .unwrap();
        assert_eq!(prop.name(), "SUMMARY");
    }

    #[test]
    fn extension_name_resolves_generically() {
        let prop = default_registry()
            .instantiate("X-MOZ-LASTACK", ComponentKind::Event)
            .unwrap();
        assert_eq!(prop.name(), "X-MOZ-LASTACK");
        assert!(prop.default_value().is_none());
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(
            default_registry()
                .instantiate("NOT-A-PROPERTY", ComponentKind::Event)
                .is_none()
        );
    }

    #[test]
    fn defaults_resolve_from_config() {
        let registry = Registry::new(RegistryConfig {
            prodid: "-//Example//Test//EN".to_string(),
        });
        let prodid = registry
            .instantiate("PRODID", ComponentKind::Calendar)
            .unwrap();
        assert_eq!(prodid.default_value(), Some("-//Example//Test//EN"));

        let version = registry
            .instantiate("VERSION", ComponentKind::Calendar)
            .unwrap();
        assert_eq!(version.default_value(), Some("2.0"));

        let uid = registry.instantiate("UID", ComponentKind::Event).unwrap();
        assert_eq!(uid.default_value(), None);
    }
}
