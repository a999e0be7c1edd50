//! Devents Test - shared test utilities for devents.
//!
//! This crate provides recording callbacks, a foreign event target and
//! fixtures that can be used across devents crates as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! devents-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use devents::Emitter;
//! use devents_test::{Recorder, test_args};
//!
//! #[test]
//! fn test_trigger_records() {
//!     let emitter = Emitter::new();
//!     let recorder = Recorder::new();
//!
//!     emitter.on("change", &recorder.callback("a"), None).unwrap();
//!     emitter.trigger("change", &test_args());
//!
//!     assert_eq!(recorder.labels(), vec!["a"]);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
