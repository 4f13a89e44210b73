//! Properties: a named, typed field on a component (RFC 2445 §4.1, §4.7-4.8).

use super::component::ComponentKind;
use super::parameter::Parameter;
use super::schema::is_extension_name;
use super::value::{Value, ValueKind};
use crate::error::MutationError;
use crate::ical::build::{CRLF, fold_line};
use crate::ical::registry::PropertySpec;

/// One property occurrence.
///
/// Instances are produced by the registry, which fixes the descriptor and
/// the parent-kind back-reference; parameters and the value are applied
/// afterwards. The back-reference only selects kind-dependent behavior
/// (e.g. the STATUS vocabulary); it implies no ownership.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    spec: &'static PropertySpec,
    params: Vec<Parameter>,
    value: Option<Value>,
    parent_kind: ComponentKind,
    default: Option<String>,
}

impl Property {
    pub(crate) fn new(
        name: String,
        spec: &'static PropertySpec,
        parent_kind: ComponentKind,
        default: Option<String>,
    ) -> Self {
        Self {
            name,
            spec,
            params: Vec::new(),
            value: None,
            parent_kind,
            default,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn parent_kind(&self) -> ComponentKind {
        self.parent_kind
    }

    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Returns a parameter's value by name.
    #[must_use]
    pub fn param_value(&self, name: &str) -> Option<&str> {
        let upper = name.to_ascii_uppercase();
        self.params
            .iter()
            .find(|p| p.name == upper)
            .map(|p| p.value.as_str())
    }

    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Sets (or replaces) a parameter.
    ///
    /// Extension properties accept anything; otherwise the parameter must be
    /// in the property's parameter vocabulary or itself be an X- name, and
    /// VALUE/ENCODING values are checked against what the property can
    /// carry.
    ///
    /// ## Errors
    ///
    /// [`MutationError::InvalidParameter`] on rejection; the parameter set
    /// is unchanged.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), MutationError> {
        let upper = name.to_ascii_uppercase();

        if !self.spec.extension {
            if !self.spec.params.contains(&upper.as_str()) && !is_extension_name(&upper) {
                return Err(MutationError::InvalidParameter);
            }
            match upper.as_str() {
                "VALUE" => {
                    let declared =
                        ValueKind::from_param(value).ok_or(MutationError::InvalidParameter)?;
                    if !self.spec.kinds.contains(&declared) {
                        return Err(MutationError::InvalidParameter);
                    }
                }
                "ENCODING" => {
                    if !value.eq_ignore_ascii_case("8BIT")
                        && !value.eq_ignore_ascii_case("BASE64")
                    {
                        return Err(MutationError::InvalidParameter);
                    }
                }
                _ => {}
            }
        }

        if let Some(existing) = self.params.iter_mut().find(|p| p.name == upper) {
            existing.value = value.to_string();
        } else {
            self.params.push(Parameter::new(upper, value));
        }
        Ok(())
    }

    /// Whether the parameters, taken together, are coherent. Individually
    /// valid parameters can still conflict: ENCODING=BASE64 demands
    /// VALUE=BINARY and the reverse.
    #[must_use]
    pub fn invariant_holds(&self) -> bool {
        if self.spec.extension {
            return true;
        }
        let base64 = self
            .param_value("ENCODING")
            .is_some_and(|v| v.eq_ignore_ascii_case("BASE64"));
        let binary = self.declared_kind() == Some(ValueKind::Binary);
        base64 == binary
    }

    /// Parses and assigns the raw value text under the effective value kind
    /// (the VALUE parameter if declared, the property's default kind
    /// otherwise), then applies the property's vocabulary check.
    ///
    /// ## Errors
    ///
    /// [`MutationError::InvalidValue`]; the previous value, if any, is kept.
    pub fn set_value(&mut self, raw: &str) -> Result<(), MutationError> {
        let kind = self.effective_kind();
        let value =
            Value::parse(kind, raw, self.spec.lists).map_err(|_| MutationError::InvalidValue)?;
        if let Some(check) = self.spec.check
            && !check(&value, self.parent_kind)
        {
            return Err(MutationError::InvalidValue);
        }
        self.value = Some(value);
        Ok(())
    }

    /// The property's intrinsic default value text, if it has one.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Renders this property as a folded, CRLF-terminated content line.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut line = self.name.clone();
        for p in &self.params {
            line.push(';');
            line.push_str(&p.name);
            line.push('=');
            line.push_str(&p.value);
        }
        line.push(':');
        if let Some(value) = &self.value {
            line.push_str(&value.serialize_raw());
        }
        let mut out = fold_line(&line);
        out.push_str(CRLF);
        out
    }

    /// The kind named by the VALUE parameter, if any.
    #[must_use]
    pub fn declared_kind(&self) -> Option<ValueKind> {
        self.param_value("VALUE").and_then(ValueKind::from_param)
    }

    /// The kind value text will be read as.
    #[must_use]
    pub fn effective_kind(&self) -> ValueKind {
        self.declared_kind().unwrap_or(self.spec.kinds[0])
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        self.value()?.as_text()
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i32> {
        self.value()?.as_integer()
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&super::value::Date> {
        self.value()?.as_date()
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<&super::value::DateTime> {
        self.value()?.as_datetime()
    }

    #[must_use]
    pub fn as_duration(&self) -> Option<&super::value::Duration> {
        self.value()?.as_duration()
    }
}

/// Two properties are equal when their observable state matches; the
/// descriptor is derived from the name and does not participate.
impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.value == other.value
            && self.parent_kind == other.parent_kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ical::registry::default_registry;

    fn prop(name: &str, parent: ComponentKind) -> Property {
        default_registry().instantiate(name, parent).unwrap()
    }

    #[test]
    fn value_parameter_switches_the_kind() {
        let mut dtstart = prop("DTSTART", ComponentKind::Event);
        dtstart.set_parameter("VALUE", "DATE").unwrap();
        dtstart.set_value("20260114").unwrap();
        assert!(dtstart.as_date().is_some());

        let mut plain = prop("DTSTART", ComponentKind::Event);
        plain.set_value("20260114").unwrap_err();
        plain.set_value("20260114T090000Z").unwrap();
        assert!(plain.as_datetime().is_some());
    }

    #[test]
    fn value_parameter_must_name_an_allowed_kind() {
        let mut dtstart = prop("DTSTART", ComponentKind::Event);
        assert_eq!(
            dtstart.set_parameter("VALUE", "BINARY"),
            Err(MutationError::InvalidParameter)
        );
        assert_eq!(
            dtstart.set_parameter("VALUE", "NOT-A-KIND"),
            Err(MutationError::InvalidParameter)
        );
    }

    #[test]
    fn unknown_parameter_is_rejected_but_x_param_allowed() {
        let mut summary = prop("SUMMARY", ComponentKind::Event);
        assert_eq!(
            summary.set_parameter("TZID", "Europe/Athens"),
            Err(MutationError::InvalidParameter)
        );
        summary.set_parameter("X-SOURCE", "imported").unwrap();
        assert_eq!(summary.param_value("X-SOURCE"), Some("imported"));
    }

    #[test]
    fn setting_a_parameter_twice_replaces_it() {
        let mut dtstart = prop("DTSTART", ComponentKind::Event);
        dtstart.set_parameter("TZID", "Europe/Athens").unwrap();
        dtstart.set_parameter("TZID", "Europe/Berlin").unwrap();
        assert_eq!(dtstart.params().len(), 1);
        assert_eq!(dtstart.param_value("TZID"), Some("Europe/Berlin"));
    }

    #[test]
    fn encoding_and_value_must_agree() {
        let mut attach = prop("ATTACH", ComponentKind::Event);
        attach.set_parameter("ENCODING", "BASE64").unwrap();
        assert!(!attach.invariant_holds());

        attach.set_parameter("VALUE", "BINARY").unwrap();
        assert!(attach.invariant_holds());
        attach.set_value("SGVsbG8=").unwrap();

        let mut plain = prop("ATTACH", ComponentKind::Event);
        plain.set_parameter("VALUE", "BINARY").unwrap();
        assert!(!plain.invariant_holds());
    }

    #[test]
    fn status_vocabulary_depends_on_parent_kind() {
        let mut event_status = prop("STATUS", ComponentKind::Event);
        event_status.set_value("CONFIRMED").unwrap();
        assert_eq!(
            event_status.set_value("IN-PROCESS"),
            Err(MutationError::InvalidValue)
        );

        let mut todo_status = prop("STATUS", ComponentKind::Todo);
        todo_status.set_value("IN-PROCESS").unwrap();
    }

    #[test]
    fn serialize_renders_params_and_value() {
        let mut dtstart = prop("DTSTART", ComponentKind::Event);
        dtstart.set_parameter("TZID", "Europe/Athens").unwrap();
        dtstart.set_value("20260114T090000").unwrap();
        assert_eq!(
            dtstart.serialize(),
            "DTSTART;TZID=Europe/Athens:20260114T090000\r\n"
        );
    }

    #[test]
    fn serialize_escapes_text() {
        let mut summary = prop("SUMMARY", ComponentKind::Event);
        summary.set_value("Lunch\\, then planning").unwrap();
        assert_eq!(summary.as_text(), Some("Lunch, then planning"));
        assert_eq!(summary.serialize(), "SUMMARY:Lunch\\, then planning\r\n");
    }
}
