//! Non-validating parser for FortiGate configuration exports.
//!
//! A FortiGate export is a flat script of `config`, `edit`, `set`, `unset`,
//! `next` and `end` commands. [`parse`] turns it into a [`Config`] tree that
//! can be queried by path:
//!
//! ```
//! use fgt_config_core::{parse, Container};
//!
//! let text = "config system global\n    set admintimeout 30\nend\n";
//! let config = parse(text)?;
//! let timeout = config.root().get("system global admintimeout").and_then(|n| n.as_set());
//! assert_eq!(timeout.map(|s| s.values()), Some(vec!["30"]));
//! # Ok::<(), fgt_config_core::ParseError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod header;
pub mod lexer;
pub mod parser;
pub mod tree;
pub mod walk;

pub use catalog::{CatalogError, KnownSection, SectionCatalog, SectionKind, SectionMismatch};
pub use config::Config;
pub use error::{ParseError, ParseResult, QueryError};
pub use header::{ConfigHeader, ConfigVersion};
pub use lexer::{tokenize, Lexer, Line, Token};
pub use parser::{parse, parse_file};
pub use tree::{
    Children, ConfigNode, ConfigObject, ConfigRoot, ConfigTable, Container, SetCommand,
    UnsetCommand,
};
pub use walk::{traverse, Visitor, Walk};
