// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The mapping-document metadata source.
//!
//! Constraint mapping documents are declarative YAML overlays applied on
//! top of declared metadata, with a `behavior` control deciding whether
//! they merge with, override, or abstain from what the types declare.
//!
//! # Example
//! ```yaml
//! behavior: merge
//! entities:
//!   - type: User
//!     group_sequence: [Basic, Extended]
//!     fields:
//!       - name: email
//!         constraints:
//!           - kind: Email
//!             groups: [Signup]
//!       - name: orders
//!         cascade: true
//!         conversions:
//!           - { from: Default, to: OrderChecks }
//!         containers:
//!           - type_arg_index: 0
//!             container: sequence
//!             constraints:
//!               - kind: NotNull
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::constraint::{AttributeValue, ConstraintDeclaration, ConstraintTarget};
use crate::descriptor::ContainerElementKey;
use crate::errors::ConfigError;
use crate::metadata::raw::{MappingBehavior, MetadataSource, RawElement, RawEntity, RawExecutable};
use crate::value::ValueType;

#[derive(Debug, Deserialize)]
struct MappingDocument {
    #[serde(default = "BehaviorMapping::merge")]
    behavior: BehaviorMapping,
    #[serde(default)]
    entities: Vec<EntityMapping>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BehaviorMapping {
    Merge,
    Override,
    Abstain,
}

impl BehaviorMapping {
    fn merge() -> Self {
        BehaviorMapping::Merge
    }
}

impl From<BehaviorMapping> for MappingBehavior {
    fn from(value: BehaviorMapping) -> Self {
        match value {
            BehaviorMapping::Merge => MappingBehavior::Merge,
            BehaviorMapping::Override => MappingBehavior::Override,
            BehaviorMapping::Abstain => MappingBehavior::Abstain,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntityMapping {
    #[serde(rename = "type")]
    type_name: String,
    behavior: Option<BehaviorMapping>,
    #[serde(default)]
    constraints: Vec<ConstraintMapping>,
    group_sequence: Option<Vec<String>>,
    #[serde(default)]
    fields: Vec<ElementMapping>,
    #[serde(default)]
    getters: Vec<ElementMapping>,
    #[serde(default)]
    methods: Vec<ExecutableMapping>,
    #[serde(default)]
    constructors: Vec<ExecutableMapping>,
}

#[derive(Debug, Deserialize)]
struct ElementMapping {
    name: String,
    #[serde(default)]
    cascade: bool,
    #[serde(default)]
    conversions: Vec<ConversionMapping>,
    #[serde(default)]
    constraints: Vec<ConstraintMapping>,
    #[serde(default)]
    containers: Vec<ContainerMapping>,
}

#[derive(Debug, Deserialize)]
struct ConversionMapping {
    from: String,
    to: String,
}

#[derive(Debug, Deserialize)]
struct ContainerMapping {
    type_arg_index: usize,
    container: String,
    #[serde(default)]
    cascade: bool,
    #[serde(default)]
    conversions: Vec<ConversionMapping>,
    #[serde(default)]
    constraints: Vec<ConstraintMapping>,
    #[serde(default)]
    containers: Vec<ContainerMapping>,
}

#[derive(Debug, Deserialize)]
struct ConstraintMapping {
    kind: String,
    message: Option<String>,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    payloads: Vec<String>,
    applies_to: Option<TargetMapping>,
    #[serde(default)]
    attributes: IndexMap<String, serde_yaml::Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TargetMapping {
    Parameters,
    AnnotatedElement,
}

#[derive(Debug, Deserialize)]
struct ExecutableMapping {
    signature: String,
    #[serde(default)]
    constraints: Vec<ConstraintMapping>,
    #[serde(default)]
    parameters: Vec<ParameterMapping>,
    return_value: Option<ReturnMapping>,
}

#[derive(Debug, Deserialize)]
struct ParameterMapping {
    index: usize,
    #[serde(default)]
    cascade: bool,
    #[serde(default)]
    conversions: Vec<ConversionMapping>,
    #[serde(default)]
    constraints: Vec<ConstraintMapping>,
    #[serde(default)]
    containers: Vec<ContainerMapping>,
}

#[derive(Debug, Deserialize)]
struct ReturnMapping {
    #[serde(default)]
    cascade: bool,
    #[serde(default)]
    conversions: Vec<ConversionMapping>,
    #[serde(default)]
    constraints: Vec<ConstraintMapping>,
    #[serde(default)]
    containers: Vec<ContainerMapping>,
}

/// A loaded mapping document, usable as a metadata source.
#[derive(Debug, Default)]
pub struct MappingSource {
    entities: HashMap<String, RawEntity>,
}

impl MappingSource {
    /// Parse a mapping document from YAML text.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let document: MappingDocument = serde_yaml::from_str(content)?;
        let default_behavior: MappingBehavior = document.behavior.into();

        let mut entities = HashMap::new();
        for entity in document.entities {
            let raw = convert_entity(&entity, default_behavior)?;
            entities.insert(raw.type_name.clone(), raw);
        }
        Ok(MappingSource { entities })
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl MetadataSource for MappingSource {
    fn entity(&self, type_name: &str) -> Option<RawEntity> {
        self.entities.get(type_name).cloned()
    }
}

/// Load a mapping document from a YAML file.
pub fn load_mapping<P: AsRef<Path>>(path: P) -> Result<MappingSource, ConfigError> {
    let content = fs::read_to_string(path)?;
    MappingSource::from_str(&content)
}

fn convert_entity(
    mapping: &EntityMapping,
    default_behavior: MappingBehavior,
) -> Result<RawEntity, ConfigError> {
    let type_name = &mapping.type_name;
    let mut raw = RawEntity::new(type_name.clone()).with_behavior(
        mapping
            .behavior
            .map(MappingBehavior::from)
            .unwrap_or(default_behavior),
    );

    for constraint in &mapping.constraints {
        raw.constraints.push(convert_constraint(type_name, constraint)?);
    }
    raw.group_sequence = mapping.group_sequence.clone();

    for field in &mapping.fields {
        let element = convert_element(
            type_name,
            field.cascade,
            &field.conversions,
            &field.constraints,
            &field.containers,
        )?;
        raw.fields.insert(field.name.clone(), element);
    }
    for getter in &mapping.getters {
        let element = convert_element(
            type_name,
            getter.cascade,
            &getter.conversions,
            &getter.constraints,
            &getter.containers,
        )?;
        raw.getters.insert(getter.name.clone(), element);
    }
    for method in &mapping.methods {
        raw.methods
            .insert(method.signature.clone(), convert_executable(type_name, method)?);
    }
    for constructor in &mapping.constructors {
        raw.constructors.insert(
            constructor.signature.clone(),
            convert_executable(type_name, constructor)?,
        );
    }

    Ok(raw)
}

fn convert_executable(
    type_name: &str,
    mapping: &ExecutableMapping,
) -> Result<RawExecutable, ConfigError> {
    // The executable name is the signature up to its parameter list.
    let name = mapping
        .signature
        .split('(')
        .next()
        .unwrap_or(&mapping.signature)
        .to_string();
    let mut raw = RawExecutable::new(name);

    for constraint in &mapping.constraints {
        raw.declarations.push(convert_constraint(type_name, constraint)?);
    }
    for parameter in &mapping.parameters {
        let element = convert_element(
            type_name,
            parameter.cascade,
            &parameter.conversions,
            &parameter.constraints,
            &parameter.containers,
        )?;
        raw = raw.with_parameter(parameter.index, element);
    }
    if let Some(return_value) = &mapping.return_value {
        let element = convert_element(
            type_name,
            return_value.cascade,
            &return_value.conversions,
            &return_value.constraints,
            &return_value.containers,
        )?;
        raw.return_element = Some(element);
    }
    Ok(raw)
}

fn convert_element(
    type_name: &str,
    cascade: bool,
    conversions: &[ConversionMapping],
    constraints: &[ConstraintMapping],
    containers: &[ContainerMapping],
) -> Result<RawElement, ConfigError> {
    let mut element = RawElement::new();
    element.cascade = cascade;
    for conversion in conversions {
        element
            .conversions
            .push((conversion.from.clone(), conversion.to.clone()));
    }
    for constraint in constraints {
        element
            .declarations
            .push(convert_constraint(type_name, constraint)?);
    }
    for container in containers {
        let key = ContainerElementKey::new(
            container.type_arg_index,
            parse_container_type(&container.container),
        );
        let inner = convert_element(
            type_name,
            container.cascade,
            &container.conversions,
            &container.constraints,
            &container.containers,
        )?;
        element.containers.insert(key, inner);
    }
    Ok(element)
}

fn convert_constraint(
    type_name: &str,
    mapping: &ConstraintMapping,
) -> Result<ConstraintDeclaration, ConfigError> {
    let mut declaration = ConstraintDeclaration::new(mapping.kind.clone());
    declaration.groups = mapping.groups.clone();
    declaration.payloads = mapping.payloads.clone();
    declaration.message = mapping.message.clone();
    declaration.applies_to = match mapping.applies_to {
        Some(TargetMapping::Parameters) => ConstraintTarget::Parameters,
        Some(TargetMapping::AnnotatedElement) => ConstraintTarget::AnnotatedElement,
        None => ConstraintTarget::Implicit,
    };
    for (name, value) in &mapping.attributes {
        declaration
            .attributes
            .insert(name.clone(), convert_attribute(type_name, name, value)?);
    }
    Ok(declaration)
}

fn convert_attribute(
    type_name: &str,
    attribute: &str,
    value: &serde_yaml::Value,
) -> Result<AttributeValue, ConfigError> {
    match value {
        serde_yaml::Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(AttributeValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(AttributeValue::Decimal(f))
            } else {
                Err(invalid_attribute(type_name, attribute))
            }
        }
        serde_yaml::Value::String(s) => Ok(AttributeValue::Text(s.clone())),
        serde_yaml::Value::Sequence(items) => {
            let mut texts = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    serde_yaml::Value::String(s) => texts.push(s.clone()),
                    _ => return Err(invalid_attribute(type_name, attribute)),
                }
            }
            Ok(AttributeValue::TextList(texts))
        }
        _ => Err(invalid_attribute(type_name, attribute)),
    }
}

fn invalid_attribute(type_name: &str, attribute: &str) -> ConfigError {
    ConfigError::InvalidMapping {
        type_name: type_name.to_string(),
        detail: format!("unsupported attribute value for '{}'", attribute),
    }
}

/// Parse a container-type keyword; anything unrecognised is an entity name.
fn parse_container_type(name: &str) -> ValueType {
    match name {
        "sequence" => ValueType::Sequence,
        "mapping" => ValueType::Mapping,
        "optional" => ValueType::Optional,
        other => ValueType::Entity(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
behavior: override
entities:
  - type: User
    behavior: merge
    group_sequence: [Basic, Extended]
    constraints:
      - kind: PasswordsMatch
    fields:
      - name: email
        constraints:
          - kind: Email
            message: bad email
            groups: [Signup]
            attributes:
              regexp: "^[^@]+@[^@]+$"
      - name: tags
        cascade: true
        conversions:
          - { from: Default, to: TagChecks }
        containers:
          - type_arg_index: 0
            container: sequence
            constraints:
              - kind: NotBlank
  - type: Order
    methods:
      - signature: "total()"
        constraints:
          - kind: Min
            attributes:
              value: 0
        return_value:
          cascade: false
"#;

    #[test]
    fn test_document_round_trip() {
        let source = MappingSource::from_str(DOCUMENT).unwrap();

        let user = source.entity("User").unwrap();
        // The per-entity behavior wins over the document default.
        assert_eq!(user.behavior, MappingBehavior::Merge);
        assert_eq!(user.group_sequence, Some(vec!["Basic".into(), "Extended".into()]));
        assert_eq!(user.constraints.len(), 1);

        let email = &user.fields["email"];
        assert_eq!(email.declarations.len(), 1);
        let decl = &email.declarations[0];
        assert_eq!(decl.kind, "Email");
        assert_eq!(decl.message.as_deref(), Some("bad email"));
        assert_eq!(decl.groups, vec!["Signup"]);
        assert_eq!(
            decl.attributes.get("regexp"),
            Some(&AttributeValue::text("^[^@]+@[^@]+$"))
        );

        let tags = &user.fields["tags"];
        assert!(tags.cascade);
        assert_eq!(tags.conversions, vec![("Default".into(), "TagChecks".into())]);
        let key = ContainerElementKey::new(0, ValueType::Sequence);
        assert_eq!(tags.containers[&key].declarations[0].kind, "NotBlank");
    }

    #[test]
    fn test_document_default_behavior_applies() {
        let source = MappingSource::from_str(DOCUMENT).unwrap();
        let order = source.entity("Order").unwrap();
        assert_eq!(order.behavior, MappingBehavior::Override);

        let total = &order.methods["total()"];
        assert_eq!(total.name, "total");
        assert_eq!(total.declarations.len(), 1);
        assert_eq!(
            total.declarations[0].attributes.get("value"),
            Some(&AttributeValue::Int(0))
        );
        assert!(total.return_element.is_some());
    }

    #[test]
    fn test_unsupported_attribute_value_rejected() {
        let yaml = r#"
entities:
  - type: User
    fields:
      - name: email
        constraints:
          - kind: Email
            attributes:
              regexp: { nested: mapping }
"#;
        let err = MappingSource::from_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMapping { .. }));
    }

    #[test]
    fn test_load_mapping_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("constraints.yaml");
        std::fs::write(&path, DOCUMENT).unwrap();

        let source = load_mapping(&path).unwrap();
        assert!(source.entity("User").is_some());
        assert!(source.entity("Missing").is_none());
    }
}
