// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine assembly and entry points.
//!
//! [`EngineBuilder`] collects registries, metadata sources and
//! collaborators — pre-populated with the built-in catalog, validators and
//! extractors — and freezes them into a [`ValidationEngine`]. The engine
//! is the process-wide, shareable façade: it owns the descriptor and
//! composition caches and spawns one single-use [`ValidationJob`] per
//! request.

use std::sync::Arc;

use crate::builtin::{register_builtin_constraints, register_builtin_validators, DefaultInterpolator};
use crate::config::EngineConfig;
use crate::constraint::{CompositionCache, ConstraintCatalog, ConstraintDefinition};
use crate::descriptor::{ConstraintBuildContext, DescriptorCache, EntityDescriptor};
use crate::engine::groups::{compute_plan, GroupCatalog};
use crate::engine::job::{JobTarget, ValidationJob};
use crate::engine::violation::ConstraintViolation;
use crate::errors::EngineError;
use crate::metadata::{DeclaredSource, MetadataPipeline, MetadataSource, RawEntity};
use crate::registry::{
    ContainerKey, ExtractorRegistry, ValidatorInfo, ValidatorRegistry,
};
use crate::traits::{
    ClockProvider, IndexedParameterNames, MessageInterpolator, ParameterNameProvider, SystemClock,
    TraversableResolver, TraverseAll, ValueExtractor,
};
use crate::value::{EntityShape, FieldValue, InstanceId, ObjectGraph, TypeRegistry};

/// Collects everything an engine needs, then builds it.
pub struct EngineBuilder {
    config: EngineConfig,
    catalog: ConstraintCatalog,
    validators: ValidatorRegistry,
    extractors: ExtractorRegistry,
    groups: GroupCatalog,
    types: TypeRegistry,
    declared: DeclaredSource,
    custom_sources: Vec<Box<dyn MetadataSource>>,
    traversable: Box<dyn TraversableResolver>,
    interpolator: Box<dyn MessageInterpolator>,
    clock: Box<dyn ClockProvider>,
    parameter_names: Box<dyn ParameterNameProvider>,
}

impl EngineBuilder {
    /// A builder with the built-in constraint library, extractors and
    /// default collaborators already in place.
    pub fn new() -> Self {
        let mut catalog = ConstraintCatalog::new();
        register_builtin_constraints(&mut catalog);
        let mut validators = ValidatorRegistry::new();
        register_builtin_validators(&mut validators);

        EngineBuilder {
            config: EngineConfig::default(),
            catalog,
            validators,
            extractors: ExtractorRegistry::with_defaults(),
            groups: GroupCatalog::new(),
            types: TypeRegistry::new(),
            declared: DeclaredSource::new(),
            custom_sources: Vec::new(),
            traversable: Box::new(TraverseAll),
            interpolator: Box::new(DefaultInterpolator::new()),
            clock: Box::new(SystemClock),
            parameter_names: Box::new(IndexedParameterNames),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an entity shape (structure only; constraints come through
    /// the metadata sources).
    pub fn register_type(mut self, name: impl Into<String>, shape: EntityShape) -> Self {
        self.types.register(name, shape);
        self
    }

    /// Register declared constraint metadata for a type.
    pub fn register_entity(mut self, entity: RawEntity) -> Self {
        self.declared.register(entity);
        self
    }

    /// Add a custom metadata source (mapping document, overlay).
    pub fn add_source(mut self, source: Box<dyn MetadataSource>) -> Self {
        self.custom_sources.push(source);
        self
    }

    /// Register a custom constraint kind.
    pub fn register_constraint(mut self, definition: ConstraintDefinition) -> Self {
        self.catalog.register(definition);
        self
    }

    /// Register a validator implementation for a constraint kind.
    pub fn register_validator(mut self, kind: impl Into<String>, info: ValidatorInfo) -> Self {
        self.validators.register(kind, info);
        self
    }

    /// Register a group sequence kind.
    pub fn register_sequence(mut self, name: impl Into<String>, groups: Vec<String>) -> Self {
        self.groups.register_sequence(name, groups);
        self
    }

    /// Bind a value extractor in the engine's registry scope.
    pub fn register_extractor(
        mut self,
        key: ContainerKey,
        node_name: impl Into<String>,
        extractor: Arc<dyn ValueExtractor>,
    ) -> Self {
        self.extractors.register(key, node_name, extractor);
        self
    }

    pub fn with_traversable_resolver(mut self, resolver: Box<dyn TraversableResolver>) -> Self {
        self.traversable = resolver;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Box<dyn MessageInterpolator>) -> Self {
        self.interpolator = interpolator;
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn ClockProvider>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_parameter_name_provider(
        mut self,
        provider: Box<dyn ParameterNameProvider>,
    ) -> Self {
        self.parameter_names = provider;
        self
    }

    /// Validate the configuration and freeze the engine.
    pub fn build(self) -> Result<ValidationEngine, EngineError> {
        self.config.validate().map_err(EngineError::Config)?;
        let composition = CompositionCache::new(self.config.constraints.cache.get_size());

        Ok(ValidationEngine {
            catalog: self.catalog,
            validators: self.validators,
            extractors: self.extractors,
            groups: self.groups,
            pipeline: MetadataPipeline::new(self.types, self.declared, self.custom_sources),
            descriptors: DescriptorCache::new(),
            composition,
            traversable: self.traversable,
            interpolator: self.interpolator,
            clock: self.clock,
            parameter_names: self.parameter_names,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The assembled engine: immutable registries, shared caches, job spawner.
pub struct ValidationEngine {
    catalog: ConstraintCatalog,
    validators: ValidatorRegistry,
    extractors: ExtractorRegistry,
    groups: GroupCatalog,
    pipeline: MetadataPipeline,
    descriptors: DescriptorCache,
    composition: CompositionCache,
    traversable: Box<dyn TraversableResolver>,
    interpolator: Box<dyn MessageInterpolator>,
    clock: Box<dyn ClockProvider>,
    parameter_names: Box<dyn ParameterNameProvider>,
}

impl ValidationEngine {
    /// The (cached) descriptor of a type, building it on first request.
    pub fn descriptor(&self, type_name: &str) -> Result<Arc<EntityDescriptor>, EngineError> {
        if let Some(descriptor) = self.descriptors.get(type_name) {
            return Ok(descriptor);
        }
        let ctx = ConstraintBuildContext {
            catalog: &self.catalog,
            validators: &self.validators,
            composition: &self.composition,
        };
        let descriptor = self
            .pipeline
            .build_descriptor(&ctx, self.parameter_names.as_ref(), type_name)?;
        Ok(self.descriptors.publish(descriptor))
    }

    /// Validate an entity graph rooted at `root`.
    pub fn validate(
        &self,
        graph: &ObjectGraph,
        root: InstanceId,
        groups: &[&str],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        let root_type = graph.type_name(root).to_string();
        self.job(graph, JobTarget::Entity { root }, root_type, groups)?
            .run()
    }

    /// Validate the constraints declared on one property, without
    /// cascading.
    pub fn validate_property(
        &self,
        graph: &ObjectGraph,
        root: InstanceId,
        property: &str,
        groups: &[&str],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        let root_type = graph.type_name(root).to_string();
        self.job(
            graph,
            JobTarget::Property {
                root,
                property: property.to_string(),
            },
            root_type,
            groups,
        )?
        .run()
    }

    /// Validate an executable's arguments (cross-parameter constraints
    /// plus each parameter's own).
    pub fn validate_parameters(
        &self,
        graph: &ObjectGraph,
        type_name: &str,
        signature: &str,
        arguments: &[FieldValue],
        groups: &[&str],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.job(
            graph,
            JobTarget::Parameters {
                signature: signature.to_string(),
                arguments,
            },
            type_name.to_string(),
            groups,
        )?
        .run()
    }

    /// Validate an executable's return value.
    pub fn validate_return_value(
        &self,
        graph: &ObjectGraph,
        type_name: &str,
        signature: &str,
        value: &FieldValue,
        groups: &[&str],
    ) -> Result<Vec<ConstraintViolation>, EngineError> {
        self.job(
            graph,
            JobTarget::ReturnValue {
                signature: signature.to_string(),
                value,
            },
            type_name.to_string(),
            groups,
        )?
        .run()
    }

    fn job<'e, 'v>(
        &'e self,
        graph: &'v ObjectGraph,
        target: JobTarget<'v>,
        root_type: String,
        groups: &[&str],
    ) -> Result<ValidationJob<'e, 'v>, EngineError> {
        let plan = compute_plan(&self.groups, groups)?;
        Ok(ValidationJob {
            engine: self,
            graph,
            target,
            plan,
            root_type,
        })
    }

    pub(crate) fn validators(&self) -> &ValidatorRegistry {
        &self.validators
    }

    pub(crate) fn types(&self) -> &TypeRegistry {
        self.pipeline.types()
    }

    pub(crate) fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    pub(crate) fn traversable(&self) -> &dyn TraversableResolver {
        self.traversable.as_ref()
    }

    pub(crate) fn interpolator(&self) -> &dyn MessageInterpolator {
        self.interpolator.as_ref()
    }

    pub(crate) fn clock(&self) -> &dyn ClockProvider {
        self.clock.as_ref()
    }

    pub(crate) fn property_declared(&self, type_name: &str, property: &str) -> bool {
        self.pipeline.property_declared(type_name, property)
    }

    pub(crate) fn executable_declared(&self, type_name: &str, signature: &str) -> bool {
        self.pipeline.executable_declared(type_name, signature)
    }
}
