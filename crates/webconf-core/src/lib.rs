//! # webconf-core
//!
//! Configuration parameters for an on-device web configuration form.
//!
//! This crate provides:
//! - Parameter types (text, number, password, separator) that render
//!   themselves as HTML form fields and absorb submitted values
//! - Fixed-capacity value buffers with silent truncation
//! - Flat, fixed-size persistence to any byte-addressable storage
//! - An ordered parameter collection driving render, validate/apply and
//!   save/load passes
//!
//! This crate is intentionally runtime-agnostic and contains no async code
//! or I/O, making it usable on both Linux and embedded targets. HTTP handling
//! and storage drivers live with the caller.

pub mod buffer;
pub mod parameter;
pub mod set;
pub mod storage;
pub mod store;
pub mod submission;
pub mod template;

pub use buffer::ValueBuffer;
pub use parameter::{
    NumberParameter, Parameter, ParameterError, ParameterId, ParameterInfo, ParameterKind,
    PasswordParameter, Persistable, Renderable, Separator, TextParameter, Updatable,
};
pub use set::{ParameterSet, ValidationErrors};
pub use storage::{ByteStorage, MemoryStorage, StorageError};
pub use store::{ConfigStore, LoadOutcome};
pub use submission::Submission;
