//! Schema validation.
//!
//! Checks the structural invariants positional parsing depends on before a
//! schema is accepted into a registry: non-empty names, well-formed and
//! unique flags, unique parameters, and no required parameter declared after
//! an optional one.
//!
//! # Examples
//!
//! ```
//! use fsc_core::*;
//!
//! let schema = CommandSchema::new("read", CommandKind::Read)
//!     .with_parameter(Parameter::required("path", "File to read."));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: flag missing the leading dash
//! let bad = CommandSchema::new("read", CommandKind::Read)
//!     .with_flag(Flag::new("r", "Recursive."));
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandSchema, FLAG_MARKER, Flag, Parameter};

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("schema command cannot be empty")]
    EmptyCommandName,
    /// Command name itself looks like a flag and could never be matched.
    #[error("command name cannot start with '-': {0}")]
    FlagLikeCommandName(String),
    /// A parameter has an empty name.
    #[error("parameter name cannot be empty")]
    EmptyParameterName,
    /// Flag does not start with the marker or has nothing after it.
    #[error("invalid flag format: {0}")]
    InvalidFlag(String),
    /// Two flags in the same schema share a token.
    #[error("duplicate flag: {0}")]
    DuplicateFlag(String),
    /// Two parameters in the same schema share a name.
    #[error("duplicate parameter: {0}")]
    DuplicateParameter(String),
    /// A required parameter follows an optional one.
    #[error("required parameter \"{required}\" declared after optional parameter \"{optional}\"")]
    RequiredAfterOptional { required: String, optional: String },
}

/// Validates a command schema.
///
/// Returns the first problem found, or an empty list when the schema is
/// well-formed.
///
/// # Examples
///
/// ```
/// use fsc_core::*;
///
/// let schema = CommandSchema::new("copy", CommandKind::Clone)
///     .with_parameter(Parameter::optional("target", "Item."))
///     .with_parameter(Parameter::required("destination", "Directory."));
///
/// let errors = validate_schema(&schema);
/// assert!(matches!(errors[0], ValidationError::RequiredAfterOptional { .. }));
/// ```
pub fn validate_schema(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let name = schema.name.trim();
    if name.is_empty() {
        errors.push(ValidationError::EmptyCommandName);
        return errors;
    }
    if name.starts_with(FLAG_MARKER) {
        errors.push(ValidationError::FlagLikeCommandName(name.to_string()));
        return errors;
    }

    errors.extend(validate_parameters(&schema.parameters));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_flags(&schema.flags));
    errors
}

fn validate_parameters(parameters: &[Parameter]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut first_optional: Option<&str> = None;

    for parameter in parameters {
        let name = parameter.name.as_str();
        if name.trim().is_empty() {
            errors.push(ValidationError::EmptyParameterName);
            return errors;
        }

        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateParameter(name.to_string()));
            return errors;
        }

        match (parameter.is_required(), first_optional) {
            (true, Some(optional)) => {
                errors.push(ValidationError::RequiredAfterOptional {
                    required: name.to_string(),
                    optional: optional.to_string(),
                });
                return errors;
            }
            (false, None) => first_optional = Some(name),
            _ => {}
        }
    }

    errors
}

fn validate_flags(flags: &[Flag]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for flag in flags {
        let token = flag.name.as_str();
        if !token.starts_with(FLAG_MARKER) || token.len() < 2 || token.contains(char::is_whitespace)
        {
            errors.push(ValidationError::InvalidFlag(token.to_string()));
            return errors;
        }
        if !seen.insert(token) {
            errors.push(ValidationError::DuplicateFlag(token.to_string()));
            return errors;
        }
    }

    errors
}
