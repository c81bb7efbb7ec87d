//! bodyfuzz - Structured-input mutation engine for web security scanners
//!
//! Generates attack variants of JSON-like request bodies. Given a baseline
//! input set and a payload, a mutation session yields every distinct
//! mutant produced by value substitution, extra-parameter injection, and
//! parameter-name fuzzing, honoring immutable fields and dropping
//! duplicates.
//!
//! # Modules
//!
//! - `fuzzer` - Structured values, traversal, dedup ledger, strategies, and sessions
//! - `errors` - Error types with diagnostic codes
//!
//! # Example
//!
//! ```rust,ignore
//! use bodyfuzz::{ImmutableFields, InputSet, MutationOptions, MutationSession};
//!
//! let baseline = InputSet::from_json_slice(br#"{"csrf": "t0k3n", "q": "shoes"}"#)?;
//! let immutable = ImmutableFields::new().with_name("csrf");
//! let session = MutationSession::new(MutationOptions::all_strategies())
//!     .with_immutability_filter(&immutable);
//!
//! for mutant in session.generate(&baseline, "' OR 1=1 --") {
//!     let mutant = mutant?;
//!     println!("{}: {}", mutant.describe(), mutant.input.to_json());
//! }
//! ```

pub mod errors;
pub mod fuzzer;

// Re-export commonly used types
pub use errors::{ConfigLoadError, MutationError};
pub use fuzzer::{
    generate, ImmutableFields, InputSet, Mutant, MutationConfig, MutationOptions,
    MutationSession, MutationStrategy, Mutants, Path, StructuredValue,
};
