// ── Unit definition translator ──
//
// A service definition is an ordered map of unit-file sections to ordered
// directives. Translation into the wire payload is pure and deterministic:
// section order, then directive order, list values expanded in place.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use fleet_api::{DesiredState, UnitOption, UnitPayload};

use crate::error::CoreError;
use crate::unit_name::UnitName;

/// Value of one directive: a single string or a repeated directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveValue {
    Single(String),
    Multiple(Vec<String>),
}

impl DirectiveValue {
    /// Values in emission order.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multiple(vs) => vs,
        }
    }
}

impl From<&str> for DirectiveValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<String> for DirectiveValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for DirectiveValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for DirectiveValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_owned).collect())
    }
}

type Sections = IndexMap<String, IndexMap<String, DirectiveValue>>;

/// Declarative description of a unit: `section -> directive -> value`.
///
/// Immutable once built. Construct with [`ServiceDefinition::builder`],
/// from a JSON value or `IndexMap`, or deserialize from JSON/YAML/TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Sections")]
pub struct ServiceDefinition {
    sections: Sections,
}

impl ServiceDefinition {
    pub fn builder() -> ServiceDefinitionBuilder {
        ServiceDefinitionBuilder::default()
    }

    /// Validate and wrap an already-structured map.
    pub fn from_sections(sections: Sections) -> Result<Self, CoreError> {
        for (section, directives) in &sections {
            check_key("section", section)?;
            for (name, value) in directives {
                check_key("directive", name)?;
                for v in value.values() {
                    if v.contains('\n') {
                        return Err(invalid(format!(
                            "value of [{section}] {name} contains a newline"
                        )));
                    }
                }
            }
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &IndexMap<String, DirectiveValue>)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, section: &str, directive: &str) -> Option<&DirectiveValue> {
        self.sections.get(section)?.get(directive)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Flatten into wire options.
    pub fn options(&self) -> Vec<UnitOption> {
        self.sections
            .iter()
            .flat_map(|(section, directives)| {
                directives.iter().flat_map(move |(name, value)| {
                    value.values().iter().map(move |v| UnitOption {
                        section: section.clone(),
                        name: name.clone(),
                        value: v.clone(),
                    })
                })
            })
            .collect()
    }
}

fn check_key(kind: &str, key: &str) -> Result<(), CoreError> {
    if key.trim().is_empty() {
        return Err(invalid(format!("{kind} name must not be empty")));
    }
    if key.contains(['\n', '[', ']', '=']) {
        return Err(invalid(format!("{kind} name {key:?} contains a reserved character")));
    }
    Ok(())
}

fn invalid(message: String) -> CoreError {
    CoreError::InvalidDefinition { message }
}

impl TryFrom<Sections> for ServiceDefinition {
    type Error = CoreError;

    fn try_from(sections: Sections) -> Result<Self, Self::Error> {
        Self::from_sections(sections)
    }
}

impl From<ServiceDefinition> for Sections {
    fn from(def: ServiceDefinition) -> Self {
        def.sections
    }
}

impl TryFrom<Value> for ServiceDefinition {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(raw_sections) = value else {
            return Err(invalid(format!(
                "expected an object of sections, got {}",
                kind_of(&value)
            )));
        };

        let mut sections = Sections::with_capacity(raw_sections.len());
        for (section, body) in raw_sections {
            let Value::Object(raw_directives) = body else {
                return Err(invalid(format!(
                    "section [{section}] must be an object, got {}",
                    kind_of(&body)
                )));
            };
            let mut directives = IndexMap::with_capacity(raw_directives.len());
            for (name, raw) in raw_directives {
                let value = match raw {
                    Value::Array(items) => DirectiveValue::Multiple(
                        items
                            .into_iter()
                            .map(|item| scalar(&section, &name, item))
                            .collect::<Result<_, _>>()?,
                    ),
                    other => DirectiveValue::Single(scalar(&section, &name, other)?),
                };
                directives.insert(name, value);
            }
            sections.insert(section, directives);
        }
        Self::from_sections(sections)
    }
}

fn scalar(section: &str, name: &str, value: Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(invalid(format!(
            "[{section}] {name} must be a string or list of strings, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Builder ──────────────────────────────────────────────────────────

/// Incremental construction of a [`ServiceDefinition`].
#[derive(Debug, Default)]
pub struct ServiceDefinitionBuilder {
    sections: Sections,
}

impl ServiceDefinitionBuilder {
    /// Add a directive. Repeating the same directive appends to a list.
    #[must_use]
    pub fn directive(
        mut self,
        section: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<DirectiveValue>,
    ) -> Self {
        let value = value.into();
        let slot = self
            .sections
            .entry(section.into())
            .or_default()
            .entry(name.into());
        match slot {
            indexmap::map::Entry::Vacant(v) => {
                v.insert(value);
            }
            indexmap::map::Entry::Occupied(mut o) => {
                let existing = o.get_mut();
                let mut merged = existing.values().to_vec();
                merged.extend(value.values().iter().cloned());
                *existing = DirectiveValue::Multiple(merged);
            }
        }
        self
    }

    pub fn build(self) -> Result<ServiceDefinition, CoreError> {
        ServiceDefinition::from_sections(self.sections)
    }
}

// ── Raw input ────────────────────────────────────────────────────────

/// Anything that can be turned into a validated [`ServiceDefinition`].
pub trait IntoServiceDefinition: Send {
    fn into_service_definition(self) -> Result<ServiceDefinition, CoreError>;
}

impl IntoServiceDefinition for ServiceDefinition {
    fn into_service_definition(self) -> Result<ServiceDefinition, CoreError> {
        Ok(self)
    }
}

impl IntoServiceDefinition for &ServiceDefinition {
    fn into_service_definition(self) -> Result<ServiceDefinition, CoreError> {
        Ok(self.clone())
    }
}

impl IntoServiceDefinition for Value {
    fn into_service_definition(self) -> Result<ServiceDefinition, CoreError> {
        ServiceDefinition::try_from(self)
    }
}

impl IntoServiceDefinition for Sections {
    fn into_service_definition(self) -> Result<ServiceDefinition, CoreError> {
        ServiceDefinition::from_sections(self)
    }
}

/// Translate a definition into the creation payload for `name`.
///
/// New units start `inactive`.
pub fn to_unit_payload(name: &UnitName, definition: &ServiceDefinition) -> UnitPayload {
    UnitPayload {
        name: name.to_string(),
        desired_state: DesiredState::Inactive,
        options: definition.options(),
    }
}
