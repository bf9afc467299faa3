//! Core library for the scriptlet toolkit.
//!
//! Turns templates with embedded `<% code %>` and `<%= expression %>` directives
//! into plain scripts. Running the script writes out the template's literal text
//! and evaluates the embedded code and expressions in the same places.
//!
//! The entry point is [`scanner::Scanner`], configured with the four wrapper
//! strings of a [`delimiters::DelimiterConfig`] (usually taken from a named
//! [`preset::Preset`] or a [`config::TranspileConfig`] file). Running the script
//! is left to the caller through the [`engine::ScriptExecutor`] trait.
//!
//! ```
//! use scriptlet_core::delimiters::DelimiterConfig;
//! use scriptlet_core::scanner::Scanner;
//!
//! let scanner = Scanner::new(DelimiterConfig::new("print(\"", "\");", "print(", ");"));
//! let script = scanner.transpile_str("Hello <%= name %>!").unwrap();
//! assert_eq!(script, "print(\"Hello \");print( name );print(\"!\");");
//! ```

pub mod config;
pub mod delimiters;
pub mod engine;
pub mod error;
pub mod preset;
pub mod scanner;
pub mod source;
