// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The builder pipeline: metadata sources in, entity descriptors out.
//!
//! For each hierarchy level of a requested type, the pipeline asks the
//! primary declared source and every custom source for raw metadata,
//! reduces the custom answers with the composite merge, combines the
//! result with the declared metadata in the parallel merge, flattens the
//! levels, and finally builds the immutable descriptor graph. Constraints
//! declared on executables are sorted into cross-parameter or return-value
//! constraints here, based on each kind's registered validator targets.
//!
//! The pipeline itself is stateless per call; caching happens in the
//! engine's descriptor cache.

use indexmap::IndexMap;

use crate::constraint::{ConstraintDeclaration, ConstraintTarget};
use crate::descriptor::{
    ConstraintBuildContext, ConstraintDescriptor, ContainerElementDescriptor, DeclarationScope,
    ElementDescriptor, ElementKind, EntityDescriptor, ExecutableDescriptor, ExecutableKind,
    ParameterDescriptor, PropertyDescriptor,
};
use crate::errors::DefinitionError;
use crate::metadata::declared::DeclaredSource;
use crate::metadata::hierarchy::{flatten, linearize, FlatElement, FlatExecutable};
use crate::metadata::merge::{composite_merge, parallel_merge};
use crate::metadata::raw::{MetadataSource, RawEntity};
use crate::observability::messages::descriptor::DescriptorBuilt;
use crate::observability::messages::StructuredLog;
use crate::registry::ValidationTarget;
use crate::traits::ParameterNameProvider;
use crate::value::{ExecutableShape, TypeRegistry, TypeUse, ValueType};

/// The merged view over every metadata source, per type registry.
pub struct MetadataPipeline {
    types: TypeRegistry,
    declared: DeclaredSource,
    custom: Vec<Box<dyn MetadataSource>>,
}

impl MetadataPipeline {
    pub fn new(
        types: TypeRegistry,
        declared: DeclaredSource,
        custom: Vec<Box<dyn MetadataSource>>,
    ) -> Self {
        MetadataPipeline {
            types,
            declared,
            custom,
        }
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Build the effective descriptor for one type.
    pub(crate) fn build_descriptor(
        &self,
        ctx: &ConstraintBuildContext<'_>,
        names: &dyn ParameterNameProvider,
        type_name: &str,
    ) -> Result<EntityDescriptor, DefinitionError> {
        if !self.types.contains(type_name) {
            return Err(DefinitionError::UnknownType {
                type_name: type_name.to_string(),
            });
        }

        let levels = linearize(&self.types, type_name);
        let mut raw_levels: Vec<Option<RawEntity>> = Vec::with_capacity(levels.len());
        for level in &levels {
            let primary = self.declared.entity(level);
            let customs: Vec<RawEntity> = self
                .custom
                .iter()
                .filter_map(|source| source.entity(level))
                .collect();
            let composite = composite_merge(level, customs)?;
            raw_levels.push(parallel_merge(primary, composite));
        }
        let flat = flatten(type_name, raw_levels);

        let mut constraints = Vec::with_capacity(flat.constraints.len());
        for (declaration, scope) in &flat.constraints {
            constraints.push(ConstraintDescriptor::build(
                ctx,
                declaration,
                ElementKind::Type,
                *scope,
            )?);
        }

        let mut properties = IndexMap::new();
        for (name, element) in &flat.properties {
            let declared =
                self.find_property_type(&levels, name)
                    .ok_or_else(|| DefinitionError::UnknownProperty {
                        type_name: type_name.to_string(),
                        property: name.clone(),
                    })?;
            let built =
                self.build_element(ctx, element, declared, ElementKind::Field, name, type_name)?;
            if built.is_constrained() {
                properties.insert(
                    name.clone(),
                    PropertyDescriptor {
                        name: name.clone(),
                        element: built,
                    },
                );
            }
        }

        let mut methods = IndexMap::new();
        for (signature, executable) in &flat.methods {
            let shape = self.find_method_shape(&levels, signature).ok_or_else(|| {
                DefinitionError::UnknownExecutable {
                    type_name: type_name.to_string(),
                    signature: signature.clone(),
                }
            })?;
            methods.insert(
                signature.clone(),
                self.build_executable(
                    ctx,
                    names,
                    type_name,
                    signature,
                    executable,
                    shape,
                    ExecutableKind::Method,
                )?,
            );
        }

        let mut constructors = IndexMap::new();
        for (signature, executable) in &flat.constructors {
            let shape = self
                .types
                .shape(type_name)
                .and_then(|shape| shape.constructors.get(signature))
                .ok_or_else(|| DefinitionError::UnknownExecutable {
                    type_name: type_name.to_string(),
                    signature: signature.clone(),
                })?;
            constructors.insert(
                signature.clone(),
                self.build_executable(
                    ctx,
                    names,
                    type_name,
                    signature,
                    executable,
                    shape,
                    ExecutableKind::Constructor,
                )?,
            );
        }

        let descriptor = EntityDescriptor {
            type_name: type_name.to_string(),
            constraints,
            properties,
            methods,
            constructors,
            group_sequence: flat.group_sequence,
        };

        DescriptorBuilt {
            type_name,
            property_count: descriptor.properties.len(),
            executable_count: descriptor.methods.len() + descriptor.constructors.len(),
        }
        .log();

        Ok(descriptor)
    }

    /// Whether any level of a type's hierarchy declares this property.
    pub(crate) fn property_declared(&self, type_name: &str, name: &str) -> bool {
        let levels = linearize(&self.types, type_name);
        self.find_property_type(&levels, name).is_some()
    }

    /// Whether any level of a type's hierarchy declares this executable.
    pub(crate) fn executable_declared(&self, type_name: &str, signature: &str) -> bool {
        let levels = linearize(&self.types, type_name);
        if self.find_method_shape(&levels, signature).is_some() {
            return true;
        }
        self.types
            .shape(type_name)
            .map(|shape| shape.constructors.contains_key(signature))
            .unwrap_or(false)
    }

    fn find_property_type(&self, levels: &[String], name: &str) -> Option<TypeUse> {
        levels.iter().find_map(|level| {
            self.types
                .shape(level)
                .and_then(|shape| shape.properties.get(name).cloned())
        })
    }

    fn find_method_shape(&self, levels: &[String], signature: &str) -> Option<&ExecutableShape> {
        levels.iter().find_map(|level| {
            self.types
                .shape(level)
                .and_then(|shape| shape.methods.get(signature))
        })
    }

    fn build_element(
        &self,
        ctx: &ConstraintBuildContext<'_>,
        flat: &FlatElement,
        declared: TypeUse,
        kind: ElementKind,
        label: &str,
        type_name: &str,
    ) -> Result<ElementDescriptor, DefinitionError> {
        let mut constraints = Vec::with_capacity(flat.declarations.len());
        for (declaration, scope) in &flat.declarations {
            constraints.push(ConstraintDescriptor::build(ctx, declaration, kind, *scope)?);
        }

        let mut conversions = IndexMap::new();
        for (from, to) in &flat.conversions {
            if conversions.insert(from.clone(), to.clone()).is_some() {
                return Err(DefinitionError::DuplicateConversion {
                    element: label.to_string(),
                    from: from.clone(),
                });
            }
        }
        if !conversions.is_empty() && !flat.cascade {
            return Err(DefinitionError::ConversionOnNonCascadable {
                type_name: type_name.to_string(),
                element: label.to_string(),
            });
        }

        let mut containers = IndexMap::new();
        for (key, inner) in &flat.containers {
            let inner_declared = declared
                .arg_type(key.type_arg_index)
                .cloned()
                .unwrap_or_else(|| TypeUse::raw(ValueType::Any));
            let inner_label = format!("{}[{}]", label, key.type_arg_index);
            let element = self.build_element(
                ctx,
                inner,
                inner_declared,
                ElementKind::ContainerElement,
                &inner_label,
                type_name,
            )?;
            containers.insert(
                key.clone(),
                ContainerElementDescriptor {
                    key: key.clone(),
                    element,
                },
            );
        }

        Ok(ElementDescriptor {
            declared,
            constraints,
            cascade: flat.cascade,
            conversions,
            containers,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_executable(
        &self,
        ctx: &ConstraintBuildContext<'_>,
        names: &dyn ParameterNameProvider,
        type_name: &str,
        signature: &str,
        flat: &FlatExecutable,
        shape: &ExecutableShape,
        kind: ExecutableKind,
    ) -> Result<ExecutableDescriptor, DefinitionError> {
        let arity = shape.parameters.len();
        let fallback_names = names.parameter_names(signature, arity);

        let mut parameters = Vec::with_capacity(arity);
        for (index, parameter_shape) in shape.parameters.iter().enumerate() {
            let empty = FlatElement::default();
            let flat_parameter = flat.parameters.get(index).unwrap_or(&empty);
            let label = format!("{}#{}", signature, index);
            let element = self.build_element(
                ctx,
                flat_parameter,
                parameter_shape.declared.clone(),
                ElementKind::Parameter,
                &label,
                type_name,
            )?;
            let name = parameter_shape
                .name
                .clone()
                .or_else(|| fallback_names.get(index).cloned())
                .unwrap_or_else(|| format!("arg{}", index));
            parameters.push(ParameterDescriptor {
                name,
                index,
                element,
            });
        }

        // Sort executable-level declarations into cross-parameter and
        // return-value constraints based on each kind's validator targets.
        let mut cross_parameter = Vec::new();
        let mut return_declarations: Vec<(ConstraintDeclaration, DeclarationScope)> = Vec::new();
        for (declaration, scope) in &flat.declarations {
            let target = match declaration.applies_to {
                ConstraintTarget::Parameters => ConstraintTarget::Parameters,
                ConstraintTarget::AnnotatedElement => ConstraintTarget::AnnotatedElement,
                ConstraintTarget::Implicit => {
                    let cross = ctx
                        .validators
                        .supports_target(&declaration.kind, ValidationTarget::Parameters);
                    let generic = ctx
                        .validators
                        .supports_target(&declaration.kind, ValidationTarget::AnnotatedElement);
                    if cross && generic {
                        return Err(DefinitionError::ImplicitTargetAmbiguous {
                            kind: declaration.kind.clone(),
                        });
                    } else if cross {
                        ConstraintTarget::Parameters
                    } else {
                        ConstraintTarget::AnnotatedElement
                    }
                }
            };

            let mut resolved = declaration.clone();
            resolved.applies_to = target;
            match target {
                ConstraintTarget::Parameters => {
                    cross_parameter.push(ConstraintDescriptor::build(
                        ctx,
                        &resolved,
                        ElementKind::CrossParameter,
                        *scope,
                    )?);
                }
                _ => return_declarations.push((resolved, *scope)),
            }
        }

        let return_value = {
            let mut flat_return = flat.return_element.clone().unwrap_or_default();
            let mut declarations = return_declarations;
            declarations.extend(flat_return.declarations.drain(..));
            flat_return.declarations = declarations;

            if flat_return.declarations.is_empty()
                && !flat_return.cascade
                && flat_return.containers.is_empty()
            {
                None
            } else {
                let declared = shape
                    .return_type
                    .clone()
                    .unwrap_or_else(|| TypeUse::raw(ValueType::Any));
                let label = format!("{}#return", signature);
                Some(self.build_element(
                    ctx,
                    &flat_return,
                    declared,
                    ElementKind::ReturnValue,
                    &label,
                    type_name,
                )?)
            }
        };

        let name = if flat.name.is_empty() {
            signature
                .split('(')
                .next()
                .unwrap_or(signature)
                .to_string()
        } else {
            flat.name.clone()
        };

        Ok(ExecutableDescriptor {
            signature: signature.to_string(),
            name,
            kind,
            cross_parameter,
            parameters,
            return_value,
        })
    }
}
