//! Command registry.
//!
//! The registry is the single source of truth for which commands exist and
//! how their arguments validate. It is built once at startup, then only read.

use thiserror::Error;
use tracing::{debug, info};

use crate::{CommandKind, CommandSchema, Flag, Parameter, ValidationError, validate_schema};

/// Errors raised while building or querying a [`CommandRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A schema with the same name is already registered.
    #[error("duplicate command in registry: {0}")]
    DuplicateCommand(String),
    /// No schema with the requested name.
    #[error("failed to get command structure of command: \"{0}\"")]
    NotFound(String),
    /// The schema failed structural validation.
    #[error("invalid schema for command \"{command}\": {source}")]
    InvalidSchema {
        command: String,
        #[source]
        source: ValidationError,
    },
}

/// Ordered collection of command schemas, looked up by name.
///
/// # Examples
///
/// ```
/// use fsc_core::{CommandKind, CommandRegistry, CommandSchema, RegistryError};
///
/// let mut registry = CommandRegistry::new();
/// registry.register(CommandSchema::new("version", CommandKind::Version)).unwrap();
///
/// assert!(registry.exists("version"));
/// assert_eq!(registry.get("version").unwrap().kind, CommandKind::Version);
///
/// let err = registry
///     .register(CommandSchema::new("version", CommandKind::Version))
///     .unwrap_err();
/// assert_eq!(err, RegistryError::DuplicateCommand("version".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    schemas: Vec<CommandSchema>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from schemas, registering them in order.
    ///
    /// # Errors
    ///
    /// Fails on the first schema that is invalid or whose name is already
    /// taken.
    pub fn from_schemas(
        schemas: impl IntoIterator<Item = CommandSchema>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        Ok(registry)
    }

    /// Builds the registry of built-in `fsc` commands.
    ///
    /// Commands are listed in the order `help` prints them.
    ///
    /// # Examples
    ///
    /// ```
    /// use fsc_core::CommandRegistry;
    ///
    /// let registry = CommandRegistry::builtin();
    /// assert_eq!(
    ///     registry.names(),
    ///     vec!["help", "create", "delete", "list", "read", "clone", "move", "rename", "version"]
    /// );
    /// ```
    pub fn builtin() -> Self {
        let schemas = builtin_schemas();
        let mut registry = Self {
            schemas: Vec::with_capacity(schemas.len()),
        };
        for schema in schemas {
            debug_assert!(validate_schema(&schema).is_empty(), "{}", schema.name);
            debug!(command = %schema.name, "Registering command");
            registry.schemas.push(schema);
        }
        info!(count = registry.len(), "Command registry initialized");
        registry
    }

    /// Validates and appends a schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidSchema`] if the schema fails
    /// [`validate_schema`], or [`RegistryError::DuplicateCommand`] if the name
    /// is already registered.
    pub fn register(&mut self, schema: CommandSchema) -> Result<(), RegistryError> {
        if let Some(source) = validate_schema(&schema).into_iter().next() {
            return Err(RegistryError::InvalidSchema {
                command: schema.name,
                source,
            });
        }
        if self.exists(&schema.name) {
            return Err(RegistryError::DuplicateCommand(schema.name));
        }

        debug!(command = %schema.name, kind = %schema.kind, "Registering command");
        self.schemas.push(schema);
        Ok(())
    }

    /// Returns `true` if a schema with this name is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Finds a schema by name.
    pub fn find(&self, name: &str) -> Option<&CommandSchema> {
        self.schemas.iter().find(|s| s.name == name)
    }

    /// Gets a schema by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if no schema has this name.
    pub fn get(&self, name: &str) -> Result<&CommandSchema, RegistryError> {
        self.find(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// All schemas in registration order.
    pub fn all(&self) -> &[CommandSchema] {
        &self.schemas
    }

    /// All command names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

const SILENCE_PURPOSE: &str = "Silence confirmation prompt.";

fn builtin_schemas() -> Vec<CommandSchema> {
    CommandKind::ALL.into_iter().map(builtin_schema).collect()
}

fn builtin_schema(kind: CommandKind) -> CommandSchema {
    let schema = CommandSchema::new(kind.as_str(), kind);
    match kind {
        CommandKind::Help => schema.with_parameter(Parameter::optional(
            "command",
            "Shows help for a specific command.",
        )),
        CommandKind::Create => schema
            .with_parameter(Parameter::required("path", "Path to create."))
            .with_flag(Flag::new(
                "-f",
                "Specifies that the path is a file, otherwise auto detect.",
            ))
            .with_flag(Flag::new(
                "-d",
                "Specifies that the path is a directory, otherwise auto detect.",
            ))
            .with_flag(Flag::new(
                "-n",
                "Prevents automatic header guards for C and C++ related files.",
            )),
        CommandKind::Delete => schema
            .with_parameter(Parameter::required("path", "Path to delete."))
            .with_flag(Flag::new("-r", "Recursively delete contents of a directory."))
            .with_flag(Flag::new("-s", SILENCE_PURPOSE))
            .with_flag(Flag::new(
                "-c",
                "Delete only the contents of a directory, keeping the directory itself.",
            )),
        CommandKind::List => schema
            .with_parameter(Parameter::optional("path", "Path to list."))
            .with_flag(Flag::new("-r", "List path recursively."))
            .with_flag(Flag::new("-f", "List files only."))
            .with_flag(Flag::new("-d", "List directories only.")),
        CommandKind::Read => {
            schema.with_parameter(Parameter::required("path", "File to read."))
        }
        CommandKind::Clone => schema
            .with_parameter(Parameter::required("target", "Item to clone."))
            .with_parameter(Parameter::required(
                "destination",
                "Directory to clone the item into.",
            ))
            .with_flag(Flag::new("-o", "Overwrite an existing item in the destination."))
            .with_flag(Flag::new("-s", SILENCE_PURPOSE)),
        CommandKind::Move => schema
            .with_parameter(Parameter::required("target", "Item to move."))
            .with_parameter(Parameter::required(
                "destination",
                "Directory to move the item into.",
            ))
            .with_flag(Flag::new("-o", "Overwrite an existing item in the destination."))
            .with_flag(Flag::new("-s", SILENCE_PURPOSE)),
        CommandKind::Rename => schema
            .with_parameter(Parameter::required("target", "Item to rename."))
            .with_parameter(Parameter::required("new name", "New name of the item."))
            .with_flag(Flag::new("-o", "Overwrite an existing item with the new name."))
            .with_flag(Flag::new("-s", SILENCE_PURPOSE)),
        CommandKind::Version => schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag_names(schema: &CommandSchema) -> Vec<&str> {
        schema.flags.iter().map(|f| f.name.as_str()).collect()
    }

    fn parameter_table(schema: &CommandSchema) -> Vec<(&str, bool)> {
        schema
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.is_required()))
            .collect()
    }

    #[test]
    fn test_builtin_registry_table() {
        let registry = CommandRegistry::builtin();
        let get = |name| registry.get(name).unwrap();

        assert_eq!(parameter_table(get("help")), vec![("command", false)]);
        assert!(flag_names(get("help")).is_empty());

        assert_eq!(parameter_table(get("create")), vec![("path", true)]);
        assert_eq!(flag_names(get("create")), vec!["-f", "-d", "-n"]);

        assert_eq!(parameter_table(get("delete")), vec![("path", true)]);
        assert_eq!(flag_names(get("delete")), vec!["-r", "-s", "-c"]);

        assert_eq!(parameter_table(get("list")), vec![("path", false)]);
        assert_eq!(flag_names(get("list")), vec!["-r", "-f", "-d"]);

        assert_eq!(parameter_table(get("read")), vec![("path", true)]);
        assert!(flag_names(get("read")).is_empty());

        for name in ["clone", "move"] {
            assert_eq!(
                parameter_table(get(name)),
                vec![("target", true), ("destination", true)]
            );
            assert_eq!(flag_names(get(name)), vec!["-o", "-s"]);
        }

        assert_eq!(
            parameter_table(get("rename")),
            vec![("target", true), ("new name", true)]
        );
        assert_eq!(flag_names(get("rename")), vec!["-o", "-s"]);

        assert!(get("version").parameters.is_empty());
        assert!(get("version").flags.is_empty());
    }

    #[test]
    fn test_builtin_schemas_are_valid() {
        for schema in CommandRegistry::builtin().all() {
            assert!(validate_schema(schema).is_empty(), "{}", schema.name);
        }
        assert!(CommandRegistry::from_schemas(builtin_schemas()).is_ok());
    }

    #[test]
    fn test_get_unknown_command() {
        let registry = CommandRegistry::builtin();
        assert!(!registry.exists("copy"));
        assert_eq!(
            registry.get("copy").unwrap_err(),
            RegistryError::NotFound("copy".to_string())
        );
    }

    #[test]
    fn test_register_rejects_invalid_schema() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(CommandSchema::new("list", CommandKind::List).with_flag(Flag::new("r", "")))
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::InvalidSchema {
                command: "list".to_string(),
                source: ValidationError::InvalidFlag("r".to_string()),
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_from_schemas_rejects_duplicates() {
        let err = CommandRegistry::from_schemas([
            CommandSchema::new("read", CommandKind::Read),
            CommandSchema::new("read", CommandKind::List),
        ])
        .unwrap_err();

        assert_eq!(err, RegistryError::DuplicateCommand("read".to_string()));
    }

    #[test]
    fn test_registry_loads_from_json() {
        let json = serde_json::json!([
            {
                "name": "show",
                "kind": "read",
                "parameters": [
                    { "name": "path", "requirement": "required", "purpose": "File to show." }
                ]
            },
            { "name": "about", "kind": "version" }
        ]);
        let schemas: Vec<CommandSchema> = serde_json::from_value(json).unwrap();
        let registry = CommandRegistry::from_schemas(schemas).unwrap();

        assert_eq!(registry.names(), vec!["show", "about"]);
        assert_eq!(registry.get("show").unwrap().required_count(), 1);
        assert!(registry.get("about").unwrap().flags.is_empty());
    }
}
