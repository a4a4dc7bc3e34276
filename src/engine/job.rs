// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validation jobs: the traversal engine.
//!
//! A job walks one root — an entity, a single property, an executable's
//! parameter array or its return value — for every group of its computed
//! plan. Frames are visited depth-first: an entity frame evaluates
//! class-level constraints and recurses into constrained properties; a
//! sprout frame evaluates an element's own constraints, descends into its
//! container elements, and finally cascades into referenced entities; a
//! parameters frame evaluates cross-parameter constraints and then visits
//! each parameter as a sprout.
//!
//! Cycle safety is twofold: a seen-set keyed by `(instance, group)` makes
//! entity frames idempotent, and the ancestor chain is scanned before a
//! cascade so a child context is never created for an instance already on
//! the current path.
//!
//! Jobs are single-use by construction: [`ValidationJob::run`] consumes
//! the job, so a result set can be realised exactly once.

use std::collections::HashSet;

use crate::config::consts::DEFAULT_GROUP;
use crate::constraint::ConstraintTarget;
use crate::descriptor::{
    ConstraintDescriptor, ElementDescriptor, ElementKind, EntityDescriptor, ExecutableDescriptor,
    ExecutableKind,
};
use crate::engine::context::ConstraintContext;
use crate::engine::factory::ValidationEngine;
use crate::engine::groups::GroupPlan;
use crate::engine::violation::ConstraintViolation;
use crate::errors::{DefinitionError, EngineError, EvaluationError};
use crate::observability::messages::engine::{JobCompleted, JobStarted, SequenceShortCircuited};
use crate::observability::messages::StructuredLog;
use crate::path::{Path, PathNode};
use crate::registry::{resolve_validator, ContainerKey, ExtractorBinding, ValidationTarget};
use crate::traits::{ExtractedValueReceiver, InterpolationContext, ValueRef};
use crate::value::{FieldValue, InstanceId, ObjectGraph, TypeUse, ValueType};

/// What a job validates.
pub(crate) enum JobTarget<'v> {
    Entity {
        root: InstanceId,
    },
    Property {
        root: InstanceId,
        property: String,
    },
    Parameters {
        signature: String,
        arguments: &'v [FieldValue],
    },
    ReturnValue {
        signature: String,
        value: &'v FieldValue,
    },
}

/// A single-use validation request.
pub struct ValidationJob<'e, 'v> {
    pub(crate) engine: &'e ValidationEngine,
    pub(crate) graph: &'v ObjectGraph,
    pub(crate) target: JobTarget<'v>,
    pub(crate) plan: GroupPlan,
    pub(crate) root_type: String,
}

impl<'e, 'v> ValidationJob<'e, 'v> {
    /// Run the job and realise its result set. Consumes the job.
    pub fn run(self) -> Result<Vec<ConstraintViolation>, EngineError> {
        JobStarted {
            root_type: &self.root_type,
            simple_group_count: self.plan.simple.len(),
            sequence_count: self.plan.sequences.len(),
        }
        .log();

        let mut state = JobState {
            engine: self.engine,
            graph: self.graph,
            root_type: self.root_type.clone(),
            path: Path::root(),
            violations: Vec::new(),
            seen: HashSet::new(),
        };

        for group in &self.plan.simple {
            state.visit_target(&self.target, group)?;
        }
        for sequence in &self.plan.sequences {
            for (position, group) in sequence.iter().enumerate() {
                let before = state.violations.len();
                state.visit_target(&self.target, group)?;
                if state.violations.len() > before {
                    SequenceShortCircuited {
                        group,
                        position,
                        sequence_length: sequence.len(),
                    }
                    .log();
                    break;
                }
            }
        }

        JobCompleted {
            root_type: &self.root_type,
            violation_count: state.violations.len(),
        }
        .log();
        Ok(state.violations)
    }
}

/// Extracted container pair, materialised from the push-style receiver.
struct ExtractedPair {
    name: String,
    index: Option<usize>,
    key: Option<String>,
    value: FieldValue,
}

#[derive(Default)]
struct PairCollector {
    pairs: Vec<ExtractedPair>,
}

impl ExtractedValueReceiver for PairCollector {
    fn value(&mut self, node_name: &str, value: &FieldValue) {
        self.pairs.push(ExtractedPair {
            name: node_name.to_string(),
            index: None,
            key: None,
            value: value.clone(),
        });
    }

    fn indexed(&mut self, node_name: &str, index: usize, value: &FieldValue) {
        self.pairs.push(ExtractedPair {
            name: node_name.to_string(),
            index: Some(index),
            key: None,
            value: value.clone(),
        });
    }

    fn keyed(&mut self, node_name: &str, key: &str, value: &FieldValue) {
        self.pairs.push(ExtractedPair {
            name: node_name.to_string(),
            index: None,
            key: Some(key.to_string()),
            value: value.clone(),
        });
    }
}

/// Mutable per-job state: the working path, the result set and the
/// identity-keyed seen-set.
struct JobState<'e, 'v> {
    engine: &'e ValidationEngine,
    graph: &'v ObjectGraph,
    root_type: String,
    path: Path,
    violations: Vec<ConstraintViolation>,
    seen: HashSet<(InstanceId, String)>,
}

impl<'e, 'v> JobState<'e, 'v> {
    fn visit_target(&mut self, target: &JobTarget<'v>, group: &str) -> Result<(), EngineError> {
        match target {
            JobTarget::Entity { root } => {
                let descriptor = self.engine.descriptor(self.graph.type_name(*root))?;
                let mut ancestors = Vec::new();
                self.visit_entity(*root, &descriptor, group, &mut ancestors)
            }
            JobTarget::Property { root, property } => {
                let descriptor = self.engine.descriptor(self.graph.type_name(*root))?;
                match redirected_sequence(&descriptor, group) {
                    Some(sequence) => {
                        for local_group in &sequence {
                            let before = self.violations.len();
                            self.visit_property(*root, &descriptor, property, local_group)?;
                            if self.violations.len() > before {
                                break;
                            }
                        }
                        Ok(())
                    }
                    None => self.visit_property(*root, &descriptor, property, group),
                }
            }
            JobTarget::Parameters {
                signature,
                arguments,
            } => {
                let descriptor = self.engine.descriptor(&self.root_type)?;
                match redirected_sequence(&descriptor, group) {
                    Some(sequence) => {
                        for local_group in &sequence {
                            let before = self.violations.len();
                            self.visit_parameters(&descriptor, signature, arguments, local_group)?;
                            if self.violations.len() > before {
                                break;
                            }
                        }
                        Ok(())
                    }
                    None => self.visit_parameters(&descriptor, signature, arguments, group),
                }
            }
            JobTarget::ReturnValue { signature, value } => {
                let descriptor = self.engine.descriptor(&self.root_type)?;
                match redirected_sequence(&descriptor, group) {
                    Some(sequence) => {
                        for local_group in &sequence {
                            let before = self.violations.len();
                            self.visit_return(&descriptor, signature, value, local_group)?;
                            if self.violations.len() > before {
                                break;
                            }
                        }
                        Ok(())
                    }
                    None => self.visit_return(&descriptor, signature, value, group),
                }
            }
        }
    }

    /// Entity frame entry: applies per-bean default redirection before the
    /// frame itself runs.
    fn visit_entity(
        &mut self,
        instance: InstanceId,
        descriptor: &EntityDescriptor,
        group: &str,
        ancestors: &mut Vec<InstanceId>,
    ) -> Result<(), EngineError> {
        if let Some(sequence) = redirected_sequence(descriptor, group) {
            for (position, local_group) in sequence.iter().enumerate() {
                let before = self.violations.len();
                self.visit_entity_frame(instance, descriptor, local_group, ancestors)?;
                if self.violations.len() > before {
                    SequenceShortCircuited {
                        group: local_group,
                        position,
                        sequence_length: sequence.len(),
                    }
                    .log();
                    break;
                }
            }
            return Ok(());
        }
        self.visit_entity_frame(instance, descriptor, group, ancestors)
    }

    fn visit_entity_frame(
        &mut self,
        instance: InstanceId,
        descriptor: &EntityDescriptor,
        group: &str,
        ancestors: &mut Vec<InstanceId>,
    ) -> Result<(), EngineError> {
        // skip(): each instance is evaluated at most once per group.
        if !self.seen.insert((instance, group.to_string())) {
            return Ok(());
        }
        ancestors.push(instance);

        let self_value = FieldValue::Entity(instance);
        let declared = TypeUse::raw(ValueType::Entity(descriptor.type_name.clone()));
        for constraint in &descriptor.constraints {
            if constraint.in_group(group) {
                self.apply_constraint(
                    constraint,
                    ValueRef::Value(&self_value),
                    &declared,
                    Some(self_value.clone()),
                )?;
            }
        }

        for property in descriptor.properties.values() {
            let node = PathNode::property(&property.name);
            if !self.reachable(instance, &node)? {
                continue;
            }
            let value = self.graph.property(instance, &property.name);
            self.path.push(node.clone());
            self.visit_element(
                &property.element,
                value,
                group,
                Some((instance, node)),
                ancestors,
            )?;
            self.path.pop();
        }

        ancestors.pop();
        Ok(())
    }

    /// Property target: own constraints only, no recursion.
    fn visit_property(
        &mut self,
        root: InstanceId,
        descriptor: &EntityDescriptor,
        property: &str,
        group: &str,
    ) -> Result<(), EngineError> {
        let descriptor = match descriptor.property(property) {
            Some(descriptor) => descriptor,
            None => {
                if self.engine.property_declared(self.graph.type_name(root), property) {
                    return Ok(());
                }
                return Err(DefinitionError::UnknownProperty {
                    type_name: self.graph.type_name(root).to_string(),
                    property: property.to_string(),
                }
                .into());
            }
        };

        let node = PathNode::property(property);
        if !self.reachable(root, &node)? {
            return Ok(());
        }
        let value = self.graph.property(root, property);
        self.path.push(node);
        for constraint in &descriptor.element.constraints {
            if constraint.in_group(group) {
                if constraint.unwraps() {
                    self.apply_unwrapped(constraint, &descriptor.element, value)?;
                } else {
                    self.apply_constraint(
                        constraint,
                        ValueRef::Value(value),
                        &descriptor.element.declared,
                        Some(value.clone()),
                    )?;
                }
            }
        }
        self.path.pop();
        Ok(())
    }

    /// Parameters frame: cross-parameter constraints, then each parameter
    /// as a sprout.
    fn visit_parameters(
        &mut self,
        descriptor: &EntityDescriptor,
        signature: &str,
        arguments: &[FieldValue],
        group: &str,
    ) -> Result<(), EngineError> {
        let executable = match self.find_executable(descriptor, signature)? {
            Some(executable) => executable,
            None => return Ok(()),
        };

        self.path.push(executable_node(&executable));

        self.path.push(PathNode::CrossParameter);
        let declared = TypeUse::raw(ValueType::ParameterArray);
        for constraint in &executable.cross_parameter {
            if constraint.in_group(group) {
                self.apply_constraint(constraint, ValueRef::Parameters(arguments), &declared, None)?;
            }
        }
        self.path.pop();

        let mut ancestors = Vec::new();
        for parameter in &executable.parameters {
            let value = arguments.get(parameter.index).unwrap_or(&FieldValue::Null);
            self.path
                .push(PathNode::parameter(&parameter.name, parameter.index));
            self.visit_element(&parameter.element, value, group, None, &mut ancestors)?;
            self.path.pop();
        }

        self.path.pop();
        Ok(())
    }

    fn visit_return(
        &mut self,
        descriptor: &EntityDescriptor,
        signature: &str,
        value: &FieldValue,
        group: &str,
    ) -> Result<(), EngineError> {
        let executable = match self.find_executable(descriptor, signature)? {
            Some(executable) => executable,
            None => return Ok(()),
        };
        let element = match &executable.return_value {
            Some(element) => element.clone(),
            None => return Ok(()),
        };

        self.path.push(executable_node(&executable));
        self.path.push(PathNode::ReturnValue);
        let mut ancestors = Vec::new();
        self.visit_element(&element, value, group, None, &mut ancestors)?;
        self.path.pop();
        self.path.pop();
        Ok(())
    }

    fn find_executable(
        &self,
        descriptor: &EntityDescriptor,
        signature: &str,
    ) -> Result<Option<ExecutableDescriptor>, EngineError> {
        if let Some(executable) = descriptor
            .method(signature)
            .or_else(|| descriptor.constructor(signature))
        {
            return Ok(Some(executable.clone()));
        }
        if self
            .engine
            .executable_declared(&descriptor.type_name, signature)
        {
            // Declared but unconstrained: nothing to evaluate.
            return Ok(None);
        }
        Err(DefinitionError::UnknownExecutable {
            type_name: descriptor.type_name.clone(),
            signature: signature.to_string(),
        }
        .into())
    }

    /// Sprout frame body. The caller has already pushed this element's
    /// path node.
    fn visit_element(
        &mut self,
        element: &ElementDescriptor,
        value: &FieldValue,
        group: &str,
        cascade_host: Option<(InstanceId, PathNode)>,
        ancestors: &mut Vec<InstanceId>,
    ) -> Result<(), EngineError> {
        self.apply_element_constraints(element, value, group)?;
        self.visit_containers(element, value, group, ancestors)?;
        self.maybe_cascade(element, value, group, cascade_host, ancestors)
    }

    fn apply_element_constraints(
        &mut self,
        element: &ElementDescriptor,
        value: &FieldValue,
        group: &str,
    ) -> Result<(), EngineError> {
        for constraint in &element.constraints {
            if !constraint.in_group(group) {
                continue;
            }
            if constraint.unwraps() {
                self.apply_unwrapped(constraint, element, value)?;
            } else {
                self.apply_constraint(
                    constraint,
                    ValueRef::Value(value),
                    &element.declared,
                    Some(value.clone()),
                )?;
            }
        }
        Ok(())
    }

    /// Apply one constraint to the unwrapped values of a container element.
    fn apply_unwrapped(
        &mut self,
        constraint: &ConstraintDescriptor,
        element: &ElementDescriptor,
        value: &FieldValue,
    ) -> Result<(), EngineError> {
        let container = element.declared.base.clone();
        let binding = self.find_extractor(&container, 0)?;
        let inner_declared = element
            .declared
            .arg_type(0)
            .cloned()
            .unwrap_or_else(|| TypeUse::raw(ValueType::Any));

        for pair in self.extract_pairs(&binding, value, &container)? {
            self.apply_constraint(
                constraint,
                ValueRef::Value(&pair.value),
                &inner_declared,
                Some(pair.value.clone()),
            )?;
        }
        Ok(())
    }

    fn visit_containers(
        &mut self,
        element: &ElementDescriptor,
        value: &FieldValue,
        group: &str,
        ancestors: &mut Vec<InstanceId>,
    ) -> Result<(), EngineError> {
        for container in element.containers.values() {
            let binding =
                self.find_extractor(&container.key.container, container.key.type_arg_index)?;
            let pairs = self.extract_pairs(&binding, value, &container.key.container)?;

            for pair in pairs {
                let has_local = !container.element.constraints.is_empty()
                    || !container.element.containers.is_empty();
                if has_local {
                    let mut node = PathNode::ContainerElement {
                        name: pair.name.clone(),
                        container: container.key.container.clone(),
                        type_arg_index: container.key.type_arg_index,
                        index: None,
                        key: None,
                    };
                    if let Some(index) = pair.index {
                        node = node.with_index(index);
                    }
                    if let Some(key) = &pair.key {
                        node = node.with_key(key.clone());
                    }
                    self.path.push(node);
                    self.apply_element_constraints(&container.element, &pair.value, group)?;
                    self.visit_containers(&container.element, &pair.value, group, ancestors)?;
                    self.path.pop();
                }

                // Cascaded entities inside containers travel under an
                // entity node carrying the container position.
                if container.element.cascade {
                    if let FieldValue::Entity(child) = pair.value {
                        let mut node = PathNode::entity();
                        if let Some(index) = pair.index {
                            node = node.with_index(index);
                        }
                        if let Some(key) = &pair.key {
                            node = node.with_key(key.clone());
                        }
                        self.path.push(node);
                        if !ancestors.contains(&child) {
                            let child_group = container.element.convert_group(group).to_string();
                            self.cascade_into(child, &child_group, ancestors)?;
                        }
                        self.path.pop();
                    }
                }
            }
        }
        Ok(())
    }

    fn maybe_cascade(
        &mut self,
        element: &ElementDescriptor,
        value: &FieldValue,
        group: &str,
        cascade_host: Option<(InstanceId, PathNode)>,
        ancestors: &mut Vec<InstanceId>,
    ) -> Result<(), EngineError> {
        if !element.cascade {
            return Ok(());
        }
        let child = match value {
            FieldValue::Entity(id) => *id,
            _ => return Ok(()),
        };

        if let Some((host, node)) = &cascade_host {
            let cascadable = self
                .engine
                .traversable()
                .is_cascadable(
                    self.graph,
                    *host,
                    node,
                    &self.root_type,
                    &self.path.without_leaf(),
                    ElementKind::Field,
                )
                .map_err(|source| EvaluationError::TraversableResolver {
                    path: self.path.clone(),
                    source,
                })?;
            if !cascadable {
                return Ok(());
            }
        }

        // Ancestor scan: no child context for an instance already on the path.
        if ancestors.contains(&child) {
            return Ok(());
        }
        let child_group = element.convert_group(group).to_string();
        self.cascade_into(child, &child_group, ancestors)
    }

    fn cascade_into(
        &mut self,
        child: InstanceId,
        group: &str,
        ancestors: &mut Vec<InstanceId>,
    ) -> Result<(), EngineError> {
        let descriptor = self.engine.descriptor(self.graph.type_name(child))?;
        self.visit_entity(child, &descriptor, group, ancestors)
    }

    /// The `validate(constraint)` core: resolve, initialize, evaluate,
    /// collect, then handle composition.
    fn apply_constraint(
        &mut self,
        constraint: &ConstraintDescriptor,
        value: ValueRef<'_>,
        declared: &TypeUse,
        leaf: Option<FieldValue>,
    ) -> Result<(), EngineError> {
        let mut own_failed = false;
        let mut own_pending: Vec<(String, Vec<PathNode>)> = Vec::new();

        if !constraint.is_composed_only() {
            let target = match constraint.validation_applies_to {
                ConstraintTarget::Parameters => ValidationTarget::Parameters,
                _ => ValidationTarget::AnnotatedElement,
            };
            let info = resolve_validator(
                self.engine.validators(),
                self.engine.types(),
                &constraint.kind,
                declared,
                target,
            )?;

            let mut validator = info.instantiate();
            validator
                .initialize(&constraint.attributes)
                .map_err(|source| DefinitionError::InitializeFailed {
                    kind: constraint.kind.clone(),
                    validator: info.id.clone(),
                    source,
                })?;

            let mut ctx = ConstraintContext::new(self.graph, self.engine.clock());
            let valid = validator.is_valid(value, &mut ctx).map_err(|source| {
                EvaluationError::ValidatorRuntime {
                    kind: constraint.kind.clone(),
                    path: self.path.clone(),
                    source,
                }
            })?;

            if !valid {
                own_failed = true;
                let pending = ctx.take_pending();
                if ctx.default_disabled() {
                    if pending.is_empty() {
                        return Err(EvaluationError::MissingCustomViolation {
                            kind: constraint.kind.clone(),
                            path: self.path.clone(),
                        }
                        .into());
                    }
                } else {
                    own_pending.push((constraint.message_template().to_string(), Vec::new()));
                }
                own_pending.extend(pending.into_iter().map(|p| (p.template, p.nodes)));
            }
        }

        if constraint.report_as_single_violation {
            // Composing violations are suppressed; any composing failure
            // fails the composed constraint, which reports exactly once.
            let mut composing_failed = false;
            for composed in &constraint.composing {
                let saved = std::mem::take(&mut self.violations);
                let result = self.apply_constraint(composed, value, declared, leaf.clone());
                let produced = !self.violations.is_empty();
                self.violations = saved;
                result?;
                if produced {
                    composing_failed = true;
                    break;
                }
            }
            if own_failed || composing_failed {
                self.emit(constraint, constraint.message_template(), &[], leaf);
            }
        } else {
            // Own violations first, then composing in declaration order.
            for (template, nodes) in &own_pending {
                self.emit(constraint, template, nodes, leaf.clone());
            }
            for composed in &constraint.composing {
                self.apply_constraint(composed, value, declared, leaf.clone())?;
            }
        }

        Ok(())
    }

    fn emit(
        &mut self,
        constraint: &ConstraintDescriptor,
        template: &str,
        extra_nodes: &[PathNode],
        leaf: Option<FieldValue>,
    ) {
        let mut path = self.path.clone();
        for node in extra_nodes {
            path.push(node.clone());
        }

        let interpolation = InterpolationContext {
            kind: &constraint.kind,
            attributes: &constraint.attributes,
            invalid_value: leaf.as_ref(),
        };
        let message = self
            .engine
            .interpolator()
            .interpolate(template, &interpolation);

        self.violations.push(ConstraintViolation {
            kind: constraint.kind.clone(),
            message,
            message_template: template.to_string(),
            path,
            invalid_value: leaf,
            root_type: self.root_type.clone(),
        });
    }

    fn reachable(&mut self, host: InstanceId, node: &PathNode) -> Result<bool, EngineError> {
        self.engine
            .traversable()
            .is_reachable(
                self.graph,
                host,
                node,
                &self.root_type,
                &self.path,
                ElementKind::Field,
            )
            .map_err(|source| {
                EvaluationError::TraversableResolver {
                    path: self.path.child(node.clone()),
                    source,
                }
                .into()
            })
    }

    fn find_extractor(
        &self,
        container: &ValueType,
        type_arg_index: usize,
    ) -> Result<std::sync::Arc<ExtractorBinding>, EngineError> {
        self.engine
            .extractors()
            .find(&ContainerKey::new(container.clone(), type_arg_index))
            .ok_or_else(|| {
                DefinitionError::MissingExtractor {
                    container: container.to_string(),
                    index: type_arg_index,
                }
                .into()
            })
    }

    fn extract_pairs(
        &self,
        binding: &ExtractorBinding,
        value: &FieldValue,
        container: &ValueType,
    ) -> Result<Vec<ExtractedPair>, EngineError> {
        let mut collector = PairCollector::default();
        binding
            .extractor
            .extract(value, &mut collector)
            .map_err(|source| EvaluationError::ValueExtractor {
                path: self.path.clone(),
                container: container.clone(),
                source,
            })?;
        Ok(collector.pairs)
    }
}

/// The redefined default sequence to evaluate in place of the default
/// group, when the descriptor declares one.
fn redirected_sequence(descriptor: &EntityDescriptor, group: &str) -> Option<Vec<String>> {
    if group == DEFAULT_GROUP {
        descriptor.group_sequence.clone()
    } else {
        None
    }
}

fn executable_node(executable: &ExecutableDescriptor) -> PathNode {
    match executable.kind {
        ExecutableKind::Method => PathNode::method(&executable.name),
        ExecutableKind::Constructor => PathNode::constructor(&executable.name),
    }
}
