//! urlfilter - A trie-based URL filter engine for Rust
//!
//! This library compiles ad-blocking rule lists (Adblock Plus / AdGuard
//! filter syntax and classic hosts-file syntax) into a shared prefix tree
//! and answers, for any fully qualified URL, whether some rule matches it:
//!
//! - Domain rules (`||host^`) match a hostname at any label boundary
//! - Address rules (`|url`) match the full URL from its first byte
//! - Hosts rules (`0.0.0.0 host` / `127.0.0.1 host`) match the hostname
//! - Free patterns (anything else) match inside the path and query,
//!   with `*` single-token wildcards and `^` separator placeholders
//! - Content-type modifiers (`$image,~script`) are parsed and stored
//!
//! # Example
//!
//! ```rust
//! use urlfilter::Matcher;
//!
//! let matcher = Matcher::new();
//! matcher.add_rule("||ads.example.com^");
//! matcher.add_rule("0.0.0.0 tracker.test");
//! matcher.add_rule("/banner/*/img^$image");
//!
//! assert!(matcher.matches("https://ads.example.com/pixel.gif"));
//! assert!(matcher.matches("https://tracker.test/collect?id=1"));
//! assert!(matcher.matches("https://cdn.example.net/banner/42/img.png"));
//! assert!(!matcher.matches("https://example.org/index.html"));
//! ```
//!
//! # Rule Syntax
//!
//! | Shape | Example | Anchoring |
//! |-------|---------|-----------|
//! | Domain | `\|\|ads.example.com^` | any label boundary of the hostname |
//! | Address | `\|https://example.com/ads` | entire URL, start to end |
//! | Hosts | `0.0.0.0 tracker.test` | start of the hostname |
//! | Parts | `/banner/*/img^` | anywhere in path and query |
//!
//! Comments (`!`, `#`), `[Adblock Plus 2.0]` headers, cosmetic rules
//! (`##`, `#?#`, `#$#`, `#@#`) and exception rules (`@@`) are skipped.
//! Rules carrying `key=value` or unrecognized modifiers are dropped whole:
//! a rule whose scope cannot be represented must not fire overbroadly.
//!
//! # Concurrency
//!
//! [`Matcher`] is `Send + Sync`. Every node of the trie carries its own
//! readers-writer lock, so rule insertion and matching run concurrently
//! without a global lock; a rule is visible to any match sequenced after
//! the `add_rule` that inserted it. Nodes are never removed.

pub mod error;
pub mod matcher;
pub mod parser;
pub mod tokenizer;
mod trie;
pub mod types;

// Re-export commonly used items
pub use error::{FilterError, Result};
pub use matcher::Matcher;
pub use parser::parse_rule;
pub use tokenizer::tokenize;
pub use types::{ModifierAction, NodeKind, ParsedRule, RuleModifiers};
