//! Fuzzer - Mutation engine for structured request inputs
//!
//! Takes a baseline input set (a JSON-like tree of request fields) and a
//! payload, and lazily yields deduplicated mutants: every mutable leaf with
//! the payload substituted, the baseline with an injected reserved
//! parameter, and the baseline with the payload used as a parameter name.
//!
//! ```rust,ignore
//! use bodyfuzz::fuzzer::{generate, InputSet, MutationOptions};
//!
//! let baseline = InputSet::from_json_slice(br#"{"user": {"name": "alice"}}"#)?;
//! for mutant in generate(&baseline, "<script>", &MutationOptions::default()) {
//!     println!("{}", mutant?.input.to_json());
//! }
//! ```

pub mod config;
pub mod filters;
pub mod input;
pub mod ledger;
pub mod mutation;
pub mod session;
pub mod traversal;
pub mod value;

pub use config::{MutationConfig, MutationOptions};
pub use filters::{
    CollectingSink, DebugSink, DefaultValidator, ImmutabilityFilter, ImmutableFields,
    NameValidator, PayloadValidator, TracingSink,
};
pub use input::{InputSet, JsonSourceParser, SourceParser};
pub use ledger::{DedupKey, DedupLedger};
pub use mutation::format::{FormatId, Formatter, StandardFormat, StandardFormatter};
pub use mutation::strategy::MutationStrategy;
pub use mutation::Mutant;
pub use session::{
    generate, Collaborators, GenerationStats, MutationSession, Mutants, NoImmutableFields,
};
pub use traversal::Leaves;
pub use value::{Fields, Key, Path, Scalar, StructuredValue};
