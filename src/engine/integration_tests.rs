// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end scenarios across the descriptor build, validator resolution
//! and traversal engine.

use crate::constraint::{
    AttributeValue, ConstraintDeclaration, ConstraintDefinition, OverrideDeclaration,
    UNWRAP_PAYLOAD,
};
use crate::descriptor::{ContainerElementKey, ElementKind};
use crate::engine::{ConstraintContext, EngineBuilder};
use crate::metadata::{MappingSource, RawElement, RawEntity, RawExecutable};
use crate::path::{Path, PathNode};
use crate::registry::{ValidatorInfo, ValidatorRegistry};
use crate::traits::{
    CollaboratorError, ConstraintValidator, TraversableResolver, ValueRef,
};
use crate::value::{
    EntityShape, ExecutableShape, FieldValue, InstanceId, ObjectGraph, ParameterShape, TypeArg,
    TypeRegistry, TypeUse, ValueType,
};

#[test]
fn test_not_blank_on_empty_name() {
    let engine = EngineBuilder::new()
        .register_type(
            "User",
            EntityShape::new().with_property("name", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("User").with_field(
            "name",
            RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let user = graph.add_instance("User");
    graph.set_property(user, "name", FieldValue::text(""));

    let violations = engine.validate(&graph, user, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "name");
    assert_eq!(violations[0].message_template, "{NotBlank.message}");
    assert_eq!(violations[0].invalid_value, Some(FieldValue::text("")));
    assert_eq!(violations[0].root_type, "User");
}

#[test]
fn test_redefined_default_sequence_short_circuits() {
    // age is -1 against Min(0) in the default group; a second constraint in
    // Extended would also fail, but the sequence stops after the first
    // violating group.
    let engine = EngineBuilder::new()
        .register_type(
            "Person",
            EntityShape::new().with_property("age", TypeUse::raw(ValueType::Integer)),
        )
        .register_entity(
            RawEntity::new("Person")
                .with_group_sequence(vec!["Default".into(), "Extended".into()])
                .with_field(
                    "age",
                    RawElement::new()
                        .constrained(
                            ConstraintDeclaration::new("Min")
                                .with_attribute("value", AttributeValue::Int(0)),
                        )
                        .constrained(
                            ConstraintDeclaration::new("Min")
                                .with_attribute("value", AttributeValue::Int(100))
                                .with_group("Extended"),
                        ),
                ),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let person = graph.add_instance("Person");
    graph.set_property(person, "age", FieldValue::Int(-1));

    let violations = engine.validate(&graph, person, &["Default"]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "age");
    assert_eq!(violations[0].kind, "Min");
    // The Extended group never ran.
    assert!(violations
        .iter()
        .all(|v| v.message != "must be greater than or equal to 100"));
}

#[test]
fn test_mutual_cascade_terminates_and_visits_once() {
    let engine = EngineBuilder::new()
        .register_type(
            "A",
            EntityShape::new()
                .with_property("name", TypeUse::raw(ValueType::Text))
                .with_property("b", TypeUse::raw(ValueType::Entity("B".into()))),
        )
        .register_type(
            "B",
            EntityShape::new()
                .with_property("name", TypeUse::raw(ValueType::Text))
                .with_property("a", TypeUse::raw(ValueType::Entity("A".into()))),
        )
        .register_entity(
            RawEntity::new("A")
                .with_field(
                    "name",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                )
                .with_field("b", RawElement::new().cascaded()),
        )
        .register_entity(
            RawEntity::new("B")
                .with_field(
                    "name",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                )
                .with_field("a", RawElement::new().cascaded()),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let a0 = graph.add_instance("A");
    let b0 = graph.add_instance("B");
    graph.set_property(a0, "name", FieldValue::text(""));
    graph.set_property(a0, "b", FieldValue::Entity(b0));
    graph.set_property(b0, "name", FieldValue::text(""));
    graph.set_property(b0, "a", FieldValue::Entity(a0));

    let violations = engine.validate(&graph, a0, &[]).unwrap();
    // One violation per instance: each was evaluated exactly once.
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].path.to_string(), "name");
    assert_eq!(violations[1].path.to_string(), "b.name");
}

#[test]
fn test_email_reports_single_violation_on_null() {
    let engine = EngineBuilder::new()
        .register_type(
            "Account",
            EntityShape::new().with_property("email", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("Account").with_field(
            "email",
            RawElement::new().constrained(ConstraintDeclaration::new("Email")),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let account = graph.add_instance("Account");
    graph.set_property(account, "email", FieldValue::Null);

    let violations = engine.validate(&graph, account, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, "Email");
    assert_eq!(violations[0].message_template, "{Email.message}");
    assert_eq!(violations[0].path.to_string(), "email");
}

#[test]
fn test_email_passes_when_all_composing_pass() {
    let engine = EngineBuilder::new()
        .register_type(
            "Account",
            EntityShape::new().with_property("email", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("Account").with_field(
            "email",
            RawElement::new().constrained(ConstraintDeclaration::new("Email")),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let account = graph.add_instance("Account");
    graph.set_property(account, "email", FieldValue::text("ada@example.org"));

    let violations = engine.validate(&graph, account, &[]).unwrap();
    assert!(violations.is_empty());
}

#[test]
fn test_map_value_size_violation_path() {
    let declared_map = TypeUse::parameterised(
        ValueType::Mapping,
        vec![
            TypeArg::Exact(TypeUse::raw(ValueType::Text)),
            TypeArg::Exact(TypeUse::raw(ValueType::Text)),
        ],
    );
    let engine = EngineBuilder::new()
        .register_type(
            "Holder",
            EntityShape::new().with_property("field", declared_map),
        )
        .register_entity(RawEntity::new("Holder").with_field(
            "field",
            RawElement::new().with_container(
                ContainerElementKey::new(1, ValueType::Mapping),
                RawElement::new().constrained(
                    ConstraintDeclaration::new("Size")
                        .with_attribute("min", AttributeValue::Int(1)),
                ),
            ),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let holder = graph.add_instance("Holder");
    graph.set_property(
        holder,
        "field",
        FieldValue::Mapping(vec![("k".into(), FieldValue::text(""))]),
    );

    let violations = engine.validate(&graph, holder, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "field[k].<map value>");
    assert_eq!(violations[0].invalid_value, Some(FieldValue::text("")));
}

#[test]
fn test_parameter_validation_with_node_metadata() {
    let engine = EngineBuilder::new()
        .register_type(
            "Service",
            EntityShape::new().with_method(
                "m(Text)",
                ExecutableShape {
                    name: "m".into(),
                    parameters: vec![ParameterShape {
                        name: Some("x".into()),
                        declared: TypeUse::raw(ValueType::Text),
                    }],
                    return_type: None,
                },
            ),
        )
        .register_entity(RawEntity::new("Service").with_method(
            "m(Text)",
            RawExecutable::new("m").with_parameter(
                0,
                RawElement::new().constrained(ConstraintDeclaration::new("NotNull")),
            ),
        ))
        .build()
        .unwrap();

    let graph = ObjectGraph::new();
    let violations = engine
        .validate_parameters(&graph, "Service", "m(Text)", &[FieldValue::Null], &[])
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "m.x");
    assert_eq!(
        violations[0].path.nodes()[1],
        PathNode::Parameter {
            name: "x".into(),
            index: 0
        }
    );
}

#[test]
fn test_job_results_are_idempotent() {
    let engine = EngineBuilder::new()
        .register_type(
            "User",
            EntityShape::new()
                .with_property("first", TypeUse::raw(ValueType::Text))
                .with_property("last", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(
            RawEntity::new("User")
                .with_field(
                    "first",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                )
                .with_field(
                    "last",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                ),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let user = graph.add_instance("User");
    graph.set_property(user, "first", FieldValue::text(""));
    graph.set_property(user, "last", FieldValue::text(" "));

    let first_run = engine.validate(&graph, user, &[]).unwrap();
    let second_run = engine.validate(&graph, user, &[]).unwrap();
    assert_eq!(first_run, second_run);
    // Deterministic order: registration order of the properties.
    assert_eq!(first_run[0].path.to_string(), "first");
    assert_eq!(first_run[1].path.to_string(), "last");
}

#[test]
fn test_requested_sequence_short_circuits() {
    let engine = EngineBuilder::new()
        .register_sequence("Checkout", vec!["Basic".into(), "Payment".into()])
        .register_type(
            "Order",
            EntityShape::new()
                .with_property("id", TypeUse::raw(ValueType::Text))
                .with_property("card", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(
            RawEntity::new("Order")
                .with_field(
                    "id",
                    RawElement::new().constrained(
                        ConstraintDeclaration::new("NotBlank").with_group("Basic"),
                    ),
                )
                .with_field(
                    "card",
                    RawElement::new().constrained(
                        ConstraintDeclaration::new("NotBlank").with_group("Payment"),
                    ),
                ),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let order = graph.add_instance("Order");
    graph.set_property(order, "id", FieldValue::text(""));
    graph.set_property(order, "card", FieldValue::text(""));

    let violations = engine.validate(&graph, order, &["Checkout"]).unwrap();
    // Basic fails, so Payment never runs.
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "id");
}

#[test]
fn test_attribute_override_reaches_composing_validator() {
    let engine = EngineBuilder::new()
        .register_constraint(
            ConstraintDefinition::new("Limited")
                .required_attribute("limit")
                .composed_of(
                    ConstraintDeclaration::new("Size")
                        .with_attribute("max", AttributeValue::Int(1000)),
                )
                .with_override(OverrideDeclaration::new("limit", "Size").to_attribute("max")),
        )
        .register_type(
            "Note",
            EntityShape::new().with_property("body", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("Note").with_field(
            "body",
            RawElement::new().constrained(
                ConstraintDeclaration::new("Limited")
                    .with_attribute("limit", AttributeValue::Int(2)),
            ),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let note = graph.add_instance("Note");
    graph.set_property(note, "body", FieldValue::text("abc"));

    let violations = engine.validate(&graph, note, &[]).unwrap();
    // The composing Size saw max = 2 copied from Limited.limit.
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, "Size");
    assert_eq!(violations[0].message, "size must be between 0 and 2");
}

struct HiddenPropertyResolver;

impl TraversableResolver for HiddenPropertyResolver {
    fn is_reachable(
        &self,
        _graph: &ObjectGraph,
        _host: InstanceId,
        node: &PathNode,
        _root_type: &str,
        _path_to_host: &Path,
        _element: ElementKind,
    ) -> Result<bool, CollaboratorError> {
        Ok(!matches!(node, PathNode::Property { name, .. } if name == "hidden"))
    }

    fn is_cascadable(
        &self,
        _graph: &ObjectGraph,
        _host: InstanceId,
        _node: &PathNode,
        _root_type: &str,
        _path_to_host: &Path,
        _element: ElementKind,
    ) -> Result<bool, CollaboratorError> {
        Ok(true)
    }
}

#[test]
fn test_unreachable_property_is_fully_skipped() {
    let engine = EngineBuilder::new()
        .with_traversable_resolver(Box::new(HiddenPropertyResolver))
        .register_type(
            "Doc",
            EntityShape::new()
                .with_property("hidden", TypeUse::raw(ValueType::Entity("Doc".into())))
                .with_property("title", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(
            RawEntity::new("Doc")
                .with_field(
                    "hidden",
                    RawElement::new()
                        .constrained(ConstraintDeclaration::new("NotNull"))
                        .cascaded(),
                )
                .with_field(
                    "title",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                ),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let outer = graph.add_instance("Doc");
    let inner = graph.add_instance("Doc");
    graph.set_property(inner, "title", FieldValue::text(""));
    graph.set_property(outer, "hidden", FieldValue::Entity(inner));
    graph.set_property(outer, "title", FieldValue::text("ok"));

    let violations = engine.validate(&graph, outer, &[]).unwrap();
    // Neither the constraint on `hidden` nor anything below it ran.
    assert!(violations.is_empty());
}

struct DistinctParamsValidator;

impl ConstraintValidator for DistinctParamsValidator {
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        _ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        let params = match value.parameters() {
            Some(params) => params,
            None => return Ok(true),
        };
        for (i, left) in params.iter().enumerate() {
            for right in &params[i + 1..] {
                if left == right {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

fn distinct_params() -> Box<dyn ConstraintValidator> {
    Box::new(DistinctParamsValidator)
}

#[test]
fn test_cross_parameter_constraint_path() {
    let engine = EngineBuilder::new()
        .register_constraint(ConstraintDefinition::new("DistinctParams"))
        .register_validator(
            "DistinctParams",
            ValidatorInfo::new(
                "DistinctParams.Params",
                TypeUse::raw(ValueType::ParameterArray),
                distinct_params,
            )
            .cross_parameter(),
        )
        .register_type(
            "Transfer",
            EntityShape::new().with_method(
                "move(Text,Text)",
                ExecutableShape {
                    name: "move".into(),
                    parameters: vec![
                        ParameterShape {
                            name: Some("from".into()),
                            declared: TypeUse::raw(ValueType::Text),
                        },
                        ParameterShape {
                            name: Some("to".into()),
                            declared: TypeUse::raw(ValueType::Text),
                        },
                    ],
                    return_type: None,
                },
            ),
        )
        .register_entity(RawEntity::new("Transfer").with_method(
            "move(Text,Text)",
            RawExecutable::new("move")
                .constrained(ConstraintDeclaration::new("DistinctParams").with_message("accounts must differ")),
        ))
        .build()
        .unwrap();

    let graph = ObjectGraph::new();
    let violations = engine
        .validate_parameters(
            &graph,
            "Transfer",
            "move(Text,Text)",
            &[FieldValue::text("acc1"), FieldValue::text("acc1")],
            &[],
        )
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "move.<cross-parameter>");
    assert_eq!(violations[0].message, "accounts must differ");
}

struct KeyedCustomViolationValidator;

impl ConstraintValidator for KeyedCustomViolationValidator {
    fn is_valid(
        &self,
        value: ValueRef<'_>,
        ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        let entries = match value.value() {
            Some(FieldValue::Mapping(entries)) => entries,
            _ => return Ok(true),
        };
        let mut valid = true;
        for (key, entry) in entries {
            if matches!(entry, FieldValue::Text(text) if text.is_empty()) {
                ctx.disable_default_violation();
                ctx.violation_template("entry must not be empty")
                    .add_container_element_node("<map value>", ValueType::Mapping, 1)
                    .at_key(key.clone())
                    .add();
                valid = false;
            }
        }
        Ok(valid)
    }
}

fn keyed_custom() -> Box<dyn ConstraintValidator> {
    Box::new(KeyedCustomViolationValidator)
}

#[test]
fn test_custom_violation_builder_extends_path() {
    let engine = EngineBuilder::new()
        .register_constraint(ConstraintDefinition::new("EntriesNotEmpty"))
        .register_validator(
            "EntriesNotEmpty",
            ValidatorInfo::new(
                "EntriesNotEmpty.Mapping",
                TypeUse::raw(ValueType::Mapping),
                keyed_custom,
            ),
        )
        .register_type(
            "Holder",
            EntityShape::new().with_property("entries", TypeUse::raw(ValueType::Mapping)),
        )
        .register_entity(RawEntity::new("Holder").with_field(
            "entries",
            RawElement::new().constrained(ConstraintDeclaration::new("EntriesNotEmpty")),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let holder = graph.add_instance("Holder");
    graph.set_property(
        holder,
        "entries",
        FieldValue::Mapping(vec![("k".into(), FieldValue::text(""))]),
    );

    let violations = engine.validate(&graph, holder, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    // The default template was disabled; only the custom one surfaced.
    assert_eq!(violations[0].message, "entry must not be empty");
    assert_eq!(violations[0].path.to_string(), "entries[k].<map value>");
}

#[test]
fn test_validate_property_ignores_other_properties_and_cascades() {
    let engine = EngineBuilder::new()
        .register_type(
            "User",
            EntityShape::new()
                .with_property("name", TypeUse::raw(ValueType::Text))
                .with_property("alias", TypeUse::raw(ValueType::Text))
                .with_property("friend", TypeUse::raw(ValueType::Entity("User".into()))),
        )
        .register_entity(
            RawEntity::new("User")
                .with_field(
                    "name",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                )
                .with_field(
                    "alias",
                    RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
                )
                .with_field("friend", RawElement::new().cascaded()),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let friend = graph.add_instance("User");
    graph.set_property(friend, "name", FieldValue::text(""));
    let user = graph.add_instance("User");
    graph.set_property(user, "name", FieldValue::text(""));
    graph.set_property(user, "alias", FieldValue::text(""));
    graph.set_property(user, "friend", FieldValue::Entity(friend));

    let violations = engine.validate_property(&graph, user, "name", &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "name");
}

#[test]
fn test_group_conversion_applies_on_cascade() {
    let engine = EngineBuilder::new()
        .register_type(
            "Order",
            EntityShape::new().with_property("item", TypeUse::raw(ValueType::Entity("Item".into()))),
        )
        .register_type(
            "Item",
            EntityShape::new().with_property("sku", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("Order").with_field(
            "item",
            RawElement::new().cascaded().converting("Default", "ItemChecks"),
        ))
        .register_entity(RawEntity::new("Item").with_field(
            "sku",
            RawElement::new().constrained(
                ConstraintDeclaration::new("NotBlank").with_group("ItemChecks"),
            ),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let item = graph.add_instance("Item");
    graph.set_property(item, "sku", FieldValue::text(""));
    let order = graph.add_instance("Order");
    graph.set_property(order, "item", FieldValue::Entity(item));

    // Requesting the default group reaches the ItemChecks constraint
    // through the conversion.
    let violations = engine.validate(&graph, order, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "item.sku");
}

#[test]
fn test_unwrap_payload_applies_constraint_to_optional_payload() {
    let declared_optional = TypeUse::parameterised(
        ValueType::Optional,
        vec![TypeArg::Exact(TypeUse::raw(ValueType::Text))],
    );
    let engine = EngineBuilder::new()
        .register_type(
            "Profile",
            EntityShape::new().with_property("nickname", declared_optional),
        )
        .register_entity(RawEntity::new("Profile").with_field(
            "nickname",
            RawElement::new().constrained(
                ConstraintDeclaration::new("NotBlank").with_payload(UNWRAP_PAYLOAD),
            ),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let profile = graph.add_instance("Profile");
    graph.set_property(
        profile,
        "nickname",
        FieldValue::Optional(Some(Box::new(FieldValue::text("")))),
    );

    let violations = engine.validate(&graph, profile, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, "NotBlank");
    assert_eq!(violations[0].path.to_string(), "nickname");
}

#[test]
fn test_mapping_source_overlays_declared_metadata() {
    let mapping = MappingSource::from_str(
        r#"
behavior: merge
entities:
  - type: Account
    fields:
      - name: email
        constraints:
          - kind: Email
"#,
    )
    .unwrap();

    let engine = EngineBuilder::new()
        .register_type(
            "Account",
            EntityShape::new().with_property("email", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("Account").with_field(
            "email",
            RawElement::new().constrained(ConstraintDeclaration::new("NotBlank")),
        ))
        .add_source(Box::new(mapping))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let account = graph.add_instance("Account");
    graph.set_property(account, "email", FieldValue::text("not-an-email"));

    let violations = engine.validate(&graph, account, &[]).unwrap();
    // NotBlank passes; the overlaid Email fails.
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, "Email");
}

#[test]
fn test_class_level_constraint_reports_at_root_path() {
    struct NamesDiffer;
    impl ConstraintValidator for NamesDiffer {
        fn is_valid(
            &self,
            value: ValueRef<'_>,
            ctx: &mut ConstraintContext<'_>,
        ) -> Result<bool, CollaboratorError> {
            let instance = match value.value() {
                Some(FieldValue::Entity(id)) => *id,
                _ => return Ok(true),
            };
            let first = ctx.graph().property(instance, "first").clone();
            let last = ctx.graph().property(instance, "last").clone();
            Ok(first != last)
        }
    }
    fn names_differ() -> Box<dyn ConstraintValidator> {
        Box::new(NamesDiffer)
    }

    let engine = EngineBuilder::new()
        .register_constraint(ConstraintDefinition::new("NamesDiffer"))
        .register_validator(
            "NamesDiffer",
            ValidatorInfo::new("NamesDiffer.Any", TypeUse::raw(ValueType::Any), names_differ),
        )
        .register_type(
            "User",
            EntityShape::new()
                .with_property("first", TypeUse::raw(ValueType::Text))
                .with_property("last", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(
            RawEntity::new("User").constrained(
                ConstraintDeclaration::new("NamesDiffer").with_message("names must differ"),
            ),
        )
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let user = graph.add_instance("User");
    graph.set_property(user, "first", FieldValue::text("same"));
    graph.set_property(user, "last", FieldValue::text("same"));

    let violations = engine.validate(&graph, user, &[]).unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "");
    assert_eq!(violations[0].message, "names must differ");
}

#[test]
fn test_return_value_validation() {
    let engine = EngineBuilder::new()
        .register_type(
            "Repo",
            EntityShape::new().with_method(
                "find()",
                ExecutableShape {
                    name: "find".into(),
                    parameters: vec![],
                    return_type: Some(TypeUse::raw(ValueType::Text)),
                },
            ),
        )
        .register_entity(RawEntity::new("Repo").with_method(
            "find()",
            RawExecutable::new("find").constrained(ConstraintDeclaration::new("NotNull")),
        ))
        .build()
        .unwrap();

    let graph = ObjectGraph::new();
    let violations = engine
        .validate_return_value(&graph, "Repo", "find()", &FieldValue::Null, &[])
        .unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "find.<return value>");
    assert_eq!(violations[0].kind, "NotNull");
}

struct FailWithExtraViolation;

impl ConstraintValidator for FailWithExtraViolation {
    fn is_valid(
        &self,
        _value: ValueRef<'_>,
        ctx: &mut ConstraintContext<'_>,
    ) -> Result<bool, CollaboratorError> {
        ctx.violation_template("extra detail").add();
        Ok(false)
    }
}

fn fail_with_extra() -> Box<dyn ConstraintValidator> {
    Box::new(FailWithExtraViolation)
}

#[test]
fn test_violation_order_own_default_then_custom_then_composing() {
    // Locks the accumulation order: the composed constraint's own default
    // template, its custom-built violations in build order, then composing
    // violations in declaration order.
    let engine = EngineBuilder::new()
        .register_constraint(
            ConstraintDefinition::new("Strict")
                .composed_of(ConstraintDeclaration::new("NotBlank")),
        )
        .register_validator(
            "Strict",
            ValidatorInfo::new("Strict.Text", TypeUse::raw(ValueType::Text), fail_with_extra),
        )
        .register_type(
            "Form",
            EntityShape::new().with_property("field", TypeUse::raw(ValueType::Text)),
        )
        .register_entity(RawEntity::new("Form").with_field(
            "field",
            RawElement::new().constrained(ConstraintDeclaration::new("Strict")),
        ))
        .build()
        .unwrap();

    let mut graph = ObjectGraph::new();
    let form = graph.add_instance("Form");
    graph.set_property(form, "field", FieldValue::text(""));

    let violations = engine.validate(&graph, form, &[]).unwrap();
    assert_eq!(violations.len(), 3);
    assert_eq!(violations[0].kind, "Strict");
    assert_eq!(violations[0].message_template, "{Strict.message}");
    assert_eq!(violations[1].message, "extra detail");
    assert_eq!(violations[2].kind, "NotBlank");
}

#[test]
fn test_min_resolves_number_validator_for_integer_element() {
    // Sanity check over the full stack: the Integer element reaches the
    // Number validator through the hierarchy walk.
    let registry = {
        let mut registry = ValidatorRegistry::new();
        crate::builtin::register_builtin_validators(&mut registry);
        registry
    };
    let types = TypeRegistry::new();
    let resolved = crate::registry::resolve_validator(
        &registry,
        &types,
        "Min",
        &TypeUse::raw(ValueType::Integer),
        crate::registry::ValidationTarget::AnnotatedElement,
    )
    .unwrap();
    assert_eq!(resolved.id, "Min.Number");
}
