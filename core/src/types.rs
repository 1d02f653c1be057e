//! Schema type definitions for the `fsc` command set.
//!
//! A [`CommandSchema`] declares everything the argument parser needs to know
//! about one command: its positional [`Parameter`]s in matching order, the
//! [`Flag`]s it accepts, and the [`CommandKind`] that selects the operation
//! executed once the arguments validate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Leading character that marks a token as a flag rather than a value.
pub const FLAG_MARKER: char = '-';

/// Returns `true` if `token` should be treated as a flag.
///
/// # Examples
///
/// ```
/// use fsc_core::is_flag_token;
///
/// assert!(is_flag_token("-r"));
/// assert!(!is_flag_token("src/main.rs"));
/// assert!(!is_flag_token(""));
/// ```
pub fn is_flag_token(token: &str) -> bool {
    token.starts_with(FLAG_MARKER)
}

/// Whether a positional parameter must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    /// The parameter must receive a value.
    Required,
    /// The parameter may be omitted; its slot may be taken by a flag instead.
    Optional,
}

impl Requirement {
    /// Returns `true` for [`Requirement::Required`].
    pub fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }
}

/// The operation bound to a schema.
///
/// The command set is closed, so operations are selected by matching on this
/// enum instead of storing function pointers in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Help,
    Create,
    Delete,
    List,
    Read,
    Clone,
    Move,
    Rename,
    Version,
}

impl CommandKind {
    /// Every kind, in the order the built-in registry lists them.
    pub const ALL: [CommandKind; 9] = [
        Self::Help,
        Self::Create,
        Self::Delete,
        Self::List,
        Self::Read,
        Self::Clone,
        Self::Move,
        Self::Rename,
        Self::Version,
    ];

    /// The command name this kind is registered under by default.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Read => "read",
            Self::Clone => "clone",
            Self::Move => "move",
            Self::Rename => "rename",
            Self::Version => "version",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named positional value a command consumes.
///
/// # Examples
///
/// ```
/// use fsc_core::{Parameter, Requirement};
///
/// let path = Parameter::required("path", "Path to create.");
/// assert_eq!(path.requirement, Requirement::Required);
///
/// let command = Parameter::optional("command", "Shows help for a specific command.");
/// assert!(!command.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name the value is stored under in the parse result
    pub name: String,
    /// Whether the parameter must be supplied
    pub requirement: Requirement,
    /// Human-readable purpose shown by `help`
    pub purpose: String,
}

impl Parameter {
    /// Creates a required parameter.
    pub fn required(name: &str, purpose: &str) -> Self {
        Self {
            name: name.to_string(),
            requirement: Requirement::Required,
            purpose: purpose.to_string(),
        }
    }

    /// Creates an optional parameter.
    pub fn optional(name: &str, purpose: &str) -> Self {
        Self {
            name: name.to_string(),
            requirement: Requirement::Optional,
            purpose: purpose.to_string(),
        }
    }

    /// Returns `true` if the parameter must be supplied.
    pub fn is_required(&self) -> bool {
        self.requirement.is_required()
    }
}

/// A flag token a command accepts, such as `-r`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// The full token including the marker (e.g. "-r")
    pub name: String,
    /// Human-readable purpose shown by `help`
    pub purpose: String,
}

impl Flag {
    /// Creates a flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use fsc_core::Flag;
    ///
    /// let flag = Flag::new("-r", "Recursively delete contents of a directory.");
    /// assert!(flag.matches("-r"));
    /// assert!(!flag.matches("-s"));
    /// ```
    pub fn new(name: &str, purpose: &str) -> Self {
        Self {
            name: name.to_string(),
            purpose: purpose.to_string(),
        }
    }

    /// Checks if this flag is spelled exactly as `token`.
    pub fn matches(&self, token: &str) -> bool {
        self.name == token
    }
}

/// Complete schema for one command.
///
/// Parameters are matched positionally in declaration order; flags may appear
/// anywhere an optional parameter is still open, or after all parameters.
///
/// # Examples
///
/// ```
/// use fsc_core::{CommandKind, CommandSchema, Flag, Parameter};
///
/// let schema = CommandSchema::new("delete", CommandKind::Delete)
///     .with_parameter(Parameter::required("path", "Path to delete."))
///     .with_flag(Flag::new("-r", "Recursively delete contents of a directory."))
///     .with_flag(Flag::new("-s", "Silence confirmation prompt."));
///
/// assert_eq!(schema.required_count(), 1);
/// assert!(schema.find_flag("-r").is_some());
/// assert!(schema.find_flag("-x").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Command name, unique within a registry
    pub name: String,
    /// Operation executed for this command
    pub kind: CommandKind,
    /// Positional parameters, in matching order
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Accepted flags
    #[serde(default)]
    pub flags: Vec<Flag>,
}

impl CommandSchema {
    /// Creates a schema with no parameters and no flags.
    pub fn new(name: &str, kind: CommandKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            parameters: Vec::new(),
            flags: Vec::new(),
        }
    }

    /// Appends a positional parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds an accepted flag.
    pub fn with_flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Finds an accepted flag by its exact token.
    pub fn find_flag(&self, token: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.matches(token))
    }

    /// Finds a parameter by name.
    pub fn find_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Number of required parameters.
    pub fn required_count(&self) -> usize {
        self.parameters.iter().filter(|p| p.is_required()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builder() {
        let schema = CommandSchema::new("clone", CommandKind::Clone)
            .with_parameter(Parameter::required("target", "Item to clone."))
            .with_parameter(Parameter::required("destination", "Directory."))
            .with_flag(Flag::new("-o", "Overwrite."));

        assert_eq!(schema.parameters.len(), 2);
        assert_eq!(schema.parameters[0].name, "target");
        assert_eq!(schema.required_count(), 2);
        assert!(schema.find_parameter("destination").is_some());
        assert!(schema.find_parameter("source").is_none());
    }

    #[test]
    fn test_flag_token_detection() {
        assert!(is_flag_token("-"));
        assert!(is_flag_token("--long"));
        assert!(!is_flag_token("file-with-dash"));
    }

    #[test]
    fn test_kind_names_are_lowercase() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.as_str(), kind.as_str().to_lowercase());
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_schema_serializes_to_json() {
        let schema = CommandSchema::new("list", CommandKind::List)
            .with_parameter(Parameter::optional("path", "Path to list."))
            .with_flag(Flag::new("-r", "List path recursively."));

        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["kind"], "list");
        assert_eq!(value["parameters"][0]["requirement"], "optional");
        assert_eq!(value["flags"][0]["name"], "-r");
    }
}
