//! Command schemas, registry and argument validation for `fsc`.
//!
//! This crate holds everything `fsc` knows about its command line before any
//! file is touched:
//!
//! - [`CommandSchema`] — a command's name, positional [`Parameter`]s, accepted
//!   [`Flag`]s and the [`CommandKind`] that selects its operation.
//! - [`CommandRegistry`] — the ordered, name-unique set of schemas, built once
//!   at startup.
//! - [`parse`] — matches raw process arguments against the registry and
//!   yields a [`ParsedInvocation`] or a [`ParseError`].
//!
//! Validation ([`validate_schema`]) rejects schemas that positional parsing
//! could not handle predictably, such as a required parameter declared after
//! an optional one.
//!
//! # Example
//!
//! ```
//! use fsc_core::*;
//!
//! let registry = CommandRegistry::builtin();
//! let invocation = parse(["fsc", "list", "src", "-r"], &registry).unwrap();
//!
//! assert_eq!(invocation.command(), "list");
//! assert_eq!(invocation.argument("path").unwrap(), "src");
//! assert!(invocation.has_flag("-r"));
//! assert_eq!(registry.get("list").unwrap().kind, CommandKind::List);
//! ```

mod parser;
mod registry;
mod types;
mod validate;

pub use parser::{ParseError, ParsedInvocation, parse};
pub use registry::{CommandRegistry, RegistryError};
pub use types::*;
pub use validate::{ValidationError, validate_schema};
