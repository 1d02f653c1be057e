//! Positional argument parser.
//!
//! Matches raw process arguments against the schema of the requested command.
//!
//! Tokens after the command name are walked left to right with a position
//! index that advances once per token. While the index still points at a
//! parameter slot, a plain token fills that slot, while a flag token is only
//! accepted if the slot is optional (and then the slot stays empty). Past the
//! last slot every token must be a flag the schema declares.
//!
//! # Examples
//!
//! ```
//! use fsc_core::{CommandRegistry, ParseError, parse};
//!
//! let registry = CommandRegistry::builtin();
//!
//! let invocation = parse(["fsc", "delete", "build", "-r", "-s"], &registry).unwrap();
//! assert_eq!(invocation.command(), "delete");
//! assert_eq!(invocation.argument("path").unwrap(), "build");
//! assert!(invocation.has_flag("-r"));
//!
//! let err = parse(["fsc", "delete", "-r", "build"], &registry).unwrap_err();
//! assert!(matches!(err, ParseError::FlagInPlaceOfRequiredParameter { .. }));
//! ```

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::{CommandKind, CommandRegistry, CommandSchema, is_flag_token};

/// Errors produced while matching arguments against a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing followed the program invocation.
    #[error("No command provided, see \"help\".")]
    MissingCommand,
    /// The command name is not registered.
    #[error("Unknown command \"{0}\", see \"help\".")]
    UnknownCommand(String),
    /// A flag the matched schema does not declare.
    #[error("Command \"{command}\" does not accept flag \"{flag}\".")]
    UnsupportedFlag { command: String, flag: String },
    /// A flag appeared where a required parameter was expected.
    #[error("Expected parameter \"{parameter}\", instead got flag \"{flag}\".")]
    FlagInPlaceOfRequiredParameter { parameter: String, flag: String },
    /// One or more required parameters received no value.
    #[error("Command \"{command}\" is missing arguments: {}.", quoted_list(.missing))]
    MissingRequiredParameters {
        command: String,
        missing: Vec<String>,
    },
    /// An argument was requested that the invocation does not carry.
    #[error("No argument named \"{0}\" was provided.")]
    NoSuchArgument(String),
}

fn quoted_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The validated result of matching arguments against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    command: String,
    kind: CommandKind,
    arguments: HashMap<String, String>,
    flags: Vec<String>,
}

impl ParsedInvocation {
    /// Name of the matched command.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Operation bound to the matched command.
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    /// Returns `true` if the parameter `name` received a value.
    pub fn has_argument(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Value of the parameter `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::NoSuchArgument`] if the parameter received no
    /// value; check [`has_argument`](Self::has_argument) first for optional
    /// parameters.
    pub fn argument(&self, name: &str) -> Result<&str, ParseError> {
        self.arguments
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ParseError::NoSuchArgument(name.to_string()))
    }

    /// Returns `true` if the flag token was supplied.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Active flags in the order they were first given.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    fn add_flag(&mut self, token: &str, schema: &CommandSchema) -> Result<(), ParseError> {
        if schema.find_flag(token).is_none() {
            return Err(ParseError::UnsupportedFlag {
                command: schema.name.clone(),
                flag: token.to_string(),
            });
        }
        if !self.has_flag(token) {
            self.flags.push(token.to_string());
        }
        Ok(())
    }
}

/// Parses the full process argument list against `registry`.
///
/// The first element is the program invocation and is ignored.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found: a missing or
/// unknown command, an undeclared flag, a flag given in place of a required
/// parameter, or required parameters left without a value.
pub fn parse<I, S>(args: I, registry: &CommandRegistry) -> Result<ParsedInvocation, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter().skip(1);

    let command = args.next().ok_or(ParseError::MissingCommand)?;
    let command = command.as_ref();
    let schema = registry
        .find(command)
        .ok_or_else(|| ParseError::UnknownCommand(command.to_string()))?;
    debug!(command, "Matched command schema");

    let mut invocation = ParsedInvocation {
        command: schema.name.clone(),
        kind: schema.kind,
        arguments: HashMap::new(),
        flags: Vec::new(),
    };

    for (position, token) in args.enumerate() {
        let token = token.as_ref();
        let Some(parameter) = schema.parameters.get(position) else {
            debug!(position, token, "Trailing token, expecting flag");
            invocation.add_flag(token, schema)?;
            continue;
        };

        if !is_flag_token(token) {
            debug!(position, parameter = %parameter.name, token, "Filled parameter");
            invocation
                .arguments
                .insert(parameter.name.clone(), token.to_string());
        } else if parameter.is_required() {
            return Err(ParseError::FlagInPlaceOfRequiredParameter {
                parameter: parameter.name.clone(),
                flag: token.to_string(),
            });
        } else {
            debug!(position, parameter = %parameter.name, token, "Flag in optional slot");
            invocation.add_flag(token, schema)?;
        }
    }

    let missing: Vec<String> = schema
        .parameters
        .iter()
        .filter(|p| p.is_required() && !invocation.has_argument(&p.name))
        .map(|p| p.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingRequiredParameters {
            command: schema.name.clone(),
            missing,
        });
    }

    Ok(invocation)
}
