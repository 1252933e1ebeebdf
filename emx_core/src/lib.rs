//! `emx_core` is the abbreviation compiler behind [emx]: it parses
//! Emmet-style shorthand for nested markup into a tree of element
//! descriptors and expands that tree into templated text with numbered
//! placeholder markers (`$1`, `$2`, ..., and a trailing `$0`) ready for an
//! editor's snippet-insertion mechanism.
//!
//! [emx]: https://github.com/emx-tools/emx
//!
//! ## Processing Pipeline
//!
//! ```text
//! Abbreviation text
//!   → Segmenter (depth-aware top-level comma split)
//!   → Parser (operator precedence: multiplier → climb-up → group → child → sibling → leaf)
//!   → Element descriptor lexer (tag / #id / .class / [attrs] / {content})
//!   → Expander (depth-first walk, placeholder numbering, void elements, repeat indexing)
//! ```
//!
//! Snippet overrides and the template-context tables sit in front of the
//! pipeline: an exact-name match in [`SnippetLibrary`] returns canned text
//! without parsing at all, and [`ContextEngine`] layers mnemonic and
//! namespaced-pattern lookups over plain expansion.
//!
//! ## Grammar notes
//!
//! The grammar is deliberately lenient and never errors: degenerate input
//! expands to nothing usable instead of failing, because the compiler runs
//! on every keystroke of an interactive completion session. Three historical
//! limitations are preserved on purpose and locked in by tests:
//!
//! - the `+` sibling operator keeps only its left operand;
//! - only the first `(...)` group in a segment is honored;
//! - the `^` climb-up operator is parsed and stored on [`Node`] but never
//!   moves the insertion point.
//!
//! ## Quick Start
//!
//! ```rust
//! use emx_core::Expander;
//!
//! let expander = Expander::new();
//! let markup = expander.expand("ul>li*3", false);
//! assert!(markup.contains("<ul>"));
//! assert!(markup.ends_with("$0"));
//! ```

pub use config::*;
pub use context::*;
pub use element::*;
pub use error::*;
pub use expand::*;
pub use parser::*;
pub use segment::*;
pub use snippets::*;

pub mod config;
mod context;
mod element;
mod error;
mod expand;
pub(crate) mod lexer;
mod parser;
mod segment;
mod snippets;

#[cfg(test)]
mod __tests;
