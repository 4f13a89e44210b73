//! Calendar components and the component tree (RFC 2445 §4.6).

use std::fmt;

use super::property::Property;
use super::schema::{self, Schema};
use crate::error::MutationError;
use crate::ical::registry::default_registry;
use crate::ical::validate;

/// The fixed set of component kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// VCALENDAR wrapper component.
    Calendar,
    /// VEVENT component.
    Event,
    /// VTODO component.
    Todo,
    /// VJOURNAL component.
    Journal,
    /// VFREEBUSY component.
    FreeBusy,
    /// VALARM component (nested within VEVENT/VTODO).
    Alarm,
    /// VTIMEZONE component.
    Timezone,
    /// STANDARD sub-component of VTIMEZONE.
    Standard,
    /// DAYLIGHT sub-component of VTIMEZONE.
    Daylight,
}

impl ComponentKind {
    /// Returns the wire name for this component kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Calendar => "VCALENDAR",
            Self::Event => "VEVENT",
            Self::Todo => "VTODO",
            Self::Journal => "VJOURNAL",
            Self::FreeBusy => "VFREEBUSY",
            Self::Alarm => "VALARM",
            Self::Timezone => "VTIMEZONE",
            Self::Standard => "STANDARD",
            Self::Daylight => "DAYLIGHT",
        }
    }

    /// Parses a component kind from its wire name (case-insensitive).
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "VCALENDAR" => Some(Self::Calendar),
            "VEVENT" => Some(Self::Event),
            "VTODO" => Some(Self::Todo),
            "VJOURNAL" => Some(Self::Journal),
            "VFREEBUSY" => Some(Self::FreeBusy),
            "VALARM" => Some(Self::Alarm),
            "VTIMEZONE" => Some(Self::Timezone),
            "STANDARD" => Some(Self::Standard),
            "DAYLIGHT" => Some(Self::Daylight),
            _ => None,
        }
    }

    /// The schema entry for this kind. STANDARD and DAYLIGHT share one
    /// table.
    #[must_use]
    pub fn schema(self) -> &'static Schema {
        match self {
            Self::Calendar => &schema::VCALENDAR,
            Self::Event => &schema::VEVENT,
            Self::Todo => &schema::VTODO,
            Self::Journal => &schema::VJOURNAL,
            Self::FreeBusy => &schema::VFREEBUSY,
            Self::Alarm => &schema::VALARM,
            Self::Timezone => &schema::VTIMEZONE,
            Self::Standard | Self::Daylight => &schema::TZ_PHASE,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Property instances sharing one name, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PropertyGroup {
    pub(crate) name: String,
    pub(crate) instances: Vec<Property>,
}

/// Child components sharing one kind, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChildGroup {
    pub(crate) kind: ComponentKind,
    pub(crate) instances: Vec<Component>,
}

/// Bookkeeping to fully revert one property insertion.
enum Undo {
    NewGroup,
    Appended(usize),
    Replaced(usize, Vec<Property>),
}

/// One node of a calendar object tree.
///
/// A component owns its properties and children exclusively. All mutation
/// goes through [`Component::add_property`] and [`Component::add_component`];
/// both are atomic — a rejected call leaves the component untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    kind: ComponentKind,
    pub(crate) properties: Vec<PropertyGroup>,
    pub(crate) children: Vec<ChildGroup>,
}

impl Component {
    /// Creates an empty component of the given kind.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Creates a VCALENDAR component.
    #[must_use]
    pub fn calendar() -> Self {
        Self::new(ComponentKind::Calendar)
    }

    /// Creates a VEVENT component.
    #[must_use]
    pub fn event() -> Self {
        Self::new(ComponentKind::Event)
    }

    /// Creates a VTODO component.
    #[must_use]
    pub fn todo() -> Self {
        Self::new(ComponentKind::Todo)
    }

    /// Creates a VALARM component.
    #[must_use]
    pub fn alarm() -> Self {
        Self::new(ComponentKind::Alarm)
    }

    /// Creates a VTIMEZONE component.
    #[must_use]
    pub fn timezone() -> Self {
        Self::new(ComponentKind::Timezone)
    }

    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    #[must_use]
    pub fn schema(&self) -> &'static Schema {
        self.kind.schema()
    }

    /// Adds a property, atomically.
    ///
    /// `value` of `None` requests the property's intrinsic default. A ONCE
    /// property that is already present is blindly overwritten; extension
    /// properties always accumulate.
    ///
    /// ## Errors
    ///
    /// Any [`MutationError`]; the component is unchanged in every error
    /// case, including a component-invariant failure after a ONCE
    /// overwrite (the displaced instance is restored).
    pub fn add_property(
        &mut self,
        name: &str,
        value: Option<&str>,
        parameters: &[(&str, &str)],
    ) -> Result<(), MutationError> {
        let upper = name.to_ascii_uppercase();

        let (cardinality, extension) = match self.schema().cardinality(&upper) {
            Some(c) => (c, false),
            None if schema::is_extension_name(&upper) => (Schema::extension_cardinality(), true),
            None => return Err(MutationError::InvalidProperty),
        };

        // The registry instance carries the parent-kind back-reference from
        // birth; parameters can then adjust how the value text is read.
        let Some(mut property) = default_registry().instantiate(&upper, self.kind) else {
            return Err(MutationError::InvalidProperty);
        };

        let raw = match value {
            Some(v) => v.to_string(),
            None => property
                .default_value()
                .ok_or(MutationError::NoDefaultValue)?
                .to_string(),
        };

        for (pname, pvalue) in parameters {
            property.set_parameter(pname, pvalue)?;
        }
        if !property.invariant_holds() {
            return Err(MutationError::PropertyInvariantViolation);
        }
        property.set_value(&raw)?;

        let undo = self.insert_property(property, cardinality.once && !extension);
        if validate::mutation_invariant(self) {
            Ok(())
        } else {
            self.undo_insert(undo);
            Err(MutationError::ComponentInvariantViolation)
        }
    }

    /// Adds a child component; accepted only when the child's kind is in
    /// this component's schema.
    ///
    /// ## Errors
    ///
    /// [`MutationError::InvalidComponentKind`] when the nesting is not
    /// allowed; this component is unchanged and the rejected child is
    /// dropped.
    pub fn add_component(&mut self, child: Component) -> Result<(), MutationError> {
        if !self.schema().allows_component(child.kind) {
            return Err(MutationError::InvalidComponentKind);
        }
        match self.children.iter_mut().find(|g| g.kind == child.kind) {
            Some(group) => group.instances.push(child),
            None => self.children.push(ChildGroup {
                kind: child.kind,
                instances: vec![child],
            }),
        }
        Ok(())
    }

    /// Whether this subtree is fit for serialization: every child subtree is
    /// valid, the component invariant holds (including the ACTION-dependent
    /// VALARM completion rules), and every REQUIRED property either has an
    /// explicit value or a registry default (checked against a throwaway
    /// instance, without mutating the tree).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        for group in &self.children {
            for child in &group.instances {
                if !child.is_valid() {
                    return false;
                }
            }
        }

        if !validate::validation_invariant(self) {
            return false;
        }

        for (name, cardinality) in self.schema().properties {
            if cardinality.required && self.property(name).is_none() {
                let has_default = default_registry()
                    .instantiate(name, self.kind)
                    .is_some_and(|p| p.default_value().is_some());
                if !has_default {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the first (canonical) instance of a property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        let upper = name.to_ascii_uppercase();
        self.properties
            .iter()
            .find(|g| g.name == upper)
            .and_then(|g| g.instances.first())
    }

    /// Returns every instance of a property, in insertion order.
    #[must_use]
    pub fn properties(&self, name: &str) -> &[Property] {
        let upper = name.to_ascii_uppercase();
        self.properties
            .iter()
            .find(|g| g.name == upper)
            .map_or(&[], |g| &g.instances)
    }

    /// Iterates property groups as `(name, instances)` in insertion order.
    pub fn property_groups(&self) -> impl Iterator<Item = (&str, &[Property])> {
        self.properties
            .iter()
            .map(|g| (g.name.as_str(), g.instances.as_slice()))
    }

    /// Total number of property instances.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.iter().map(|g| g.instances.len()).sum()
    }

    /// Returns the children of one kind, in insertion order.
    #[must_use]
    pub fn children_of(&self, kind: ComponentKind) -> &[Component] {
        self.children
            .iter()
            .find(|g| g.kind == kind)
            .map_or(&[], |g| &g.instances)
    }

    /// Iterates child groups as `(kind, instances)` in insertion order.
    pub fn child_groups(&self) -> impl Iterator<Item = (ComponentKind, &[Component])> {
        self.children
            .iter()
            .map(|g| (g.kind, g.instances.as_slice()))
    }

    /// Total number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.iter().map(|g| g.instances.len()).sum()
    }

    /// Returns the UID text if present.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.property("UID")?.as_text()
    }

    /// Returns the SUMMARY text if present.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.property("SUMMARY")?.as_text()
    }

    /// Returns all VEVENT children.
    #[must_use]
    pub fn events(&self) -> &[Component] {
        self.children_of(ComponentKind::Event)
    }

    /// Returns all VTODO children.
    #[must_use]
    pub fn todos(&self) -> &[Component] {
        self.children_of(ComponentKind::Todo)
    }

    /// Returns all VALARM children.
    #[must_use]
    pub fn alarms(&self) -> &[Component] {
        self.children_of(ComponentKind::Alarm)
    }

    /// Returns all VTIMEZONE children.
    #[must_use]
    pub fn timezones(&self) -> &[Component] {
        self.children_of(ComponentKind::Timezone)
    }

    fn insert_property(&mut self, property: Property, once: bool) -> Undo {
        match self
            .properties
            .iter()
            .position(|g| g.name == property.name())
        {
            Some(idx) => {
                if once {
                    let previous =
                        std::mem::replace(&mut self.properties[idx].instances, vec![property]);
                    Undo::Replaced(idx, previous)
                } else {
                    self.properties[idx].instances.push(property);
                    Undo::Appended(idx)
                }
            }
            None => {
                let name = property.name().to_string();
                self.properties.push(PropertyGroup {
                    name,
                    instances: vec![property],
                });
                Undo::NewGroup
            }
        }
    }

    fn undo_insert(&mut self, undo: Undo) {
        match undo {
            Undo::NewGroup => {
                self.properties.pop();
            }
            Undo::Appended(idx) => {
                self.properties[idx].instances.pop();
            }
            Undo::Replaced(idx, previous) => {
                self.properties[idx].instances = previous;
            }
        }
    }
}
