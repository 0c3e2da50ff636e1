//! Type parameter resolution
//!
//! Every `synthesize` call starts by binding the requested type's own formal
//! parameters to the arguments it was requested with. An argument that is
//! itself a formal parameter of an enclosing class is looked up in the
//! caller's binding first, so a concrete type supplied at the top flows down
//! through any number of generic levels. The result is merged over the
//! caller's binding: ancestors stay visible to deeper levels that don't
//! redeclare them.

use crate::error::FixtureError;
use crate::types::{RawClass, TypeBinding, TypeDescriptor, TypeParam};

/// Binds `formals` to the arguments of `ty`, merged over `inherited`.
///
/// Arguments are paired positionally; surplus formals stay unbound and
/// surplus arguments are ignored.
pub fn resolve_binding(
    ty: &TypeDescriptor,
    formals: &[TypeParam],
    inherited: Option<&TypeBinding>,
) -> TypeBinding {
    let mut binding = inherited.cloned().unwrap_or_default();

    for (formal, arg) in formals.iter().zip(ty.args()) {
        let actual = match (arg, inherited) {
            (TypeDescriptor::Param(outer), Some(parent)) => {
                parent.get(outer).cloned().unwrap_or_else(|| arg.clone())
            }
            _ => arg.clone(),
        };
        binding.insert(formal.clone(), actual);
    }

    binding
}

/// Replaces a declared parameter type with what it is bound to.
///
/// Only a top-level formal parameter is replaced. Parameters nested inside
/// generic arguments are left for the resolver at the next level down.
pub fn substitute(declared: &TypeDescriptor, binding: &TypeBinding) -> TypeDescriptor {
    let mut current = declared;
    // a chain of symbolic bindings can't be longer than the binding itself
    for _ in 0..=binding.len() {
        match current {
            TypeDescriptor::Param(param) => match binding.get(param) {
                Some(bound) => current = bound,
                None => break,
            },
            _ => break,
        }
    }
    current.clone()
}

/// Replaces every bound formal parameter, at any depth of `declared`.
///
/// A parameter whose binding mentions itself again is left symbolic at the
/// inner occurrence.
pub fn substitute_deep(declared: &TypeDescriptor, binding: &TypeBinding) -> TypeDescriptor {
    expand(declared, binding, &mut Vec::new())
}

fn expand<'b>(
    declared: &'b TypeDescriptor,
    binding: &'b TypeBinding,
    expanding: &mut Vec<&'b TypeParam>,
) -> TypeDescriptor {
    match declared {
        TypeDescriptor::Param(param) if !expanding.contains(&param) => match binding.get(param) {
            Some(bound) => {
                expanding.push(param);
                let resolved = expand(bound, binding, expanding);
                expanding.pop();
                resolved
            }
            None => declared.clone(),
        },
        TypeDescriptor::Class { raw, args } => TypeDescriptor::Class {
            raw: raw.clone(),
            args: args.iter().map(|arg| expand(arg, binding, expanding)).collect(),
        },
        _ => declared.clone(),
    }
}

/// Type bound to the `index`th formal parameter of a built-in generic kind.
pub fn builtin_argument(
    raw: &RawClass,
    index: usize,
    binding: &TypeBinding,
) -> Result<TypeDescriptor, FixtureError> {
    let name = raw.builtin_params().get(index).ok_or_else(|| {
        FixtureError::TypeResolution(format!("{} has no type parameter #{}", raw, index))
    })?;
    let formal = TypeParam::new(raw.clone(), name);

    match binding.get(&formal) {
        Some(bound) => Ok(substitute_deep(bound, binding)),
        None => Err(FixtureError::TypeResolution(format!(
            "{} is not bound to any type",
            formal
        ))),
    }
}

/// Fails unless `ty` names a class, i.e. isn't a parameter or projection.
pub fn require_class(ty: &TypeDescriptor) -> Result<&RawClass, FixtureError> {
    match ty {
        TypeDescriptor::Class { raw, .. } => Ok(raw),
        TypeDescriptor::Param(param) => Err(FixtureError::TypeResolution(format!(
            "{} never resolved to a concrete type",
            param
        ))),
        TypeDescriptor::Star => Err(FixtureError::TypeResolution(
            "star-projected argument has no concrete type".to_string(),
        )),
    }
}
