//! cwalk-util - Foundation types shared by every interpreter phase.
//!
//! This crate holds the pieces the rest of the workspace is built on:
//!
//! - [`CwalkError`], the error taxonomy of the interpreter. Every phase
//!   reports failures through this one enum, and the driver prints the
//!   kind name and message when a run aborts.
//! - [`IndexVec`] and [`Idx`], a typed vector used for the syntax tree
//!   arena. Child links in the tree are integer ids instead of owned
//!   boxes, so later phases can hold on to node references (for example
//!   a function binding in memory) without lifetime entanglement.

pub mod error;
pub mod index_vec;

pub use error::{CwalkError, Result};
pub use index_vec::{Idx, IndexVec};
