//! Foundation types for sprig.
//!
//! Every other sprig crate depends on `sprig-types`. It is deliberately
//! small: the content-addressed [`ObjectId`] and the errors produced when
//! parsing one from text.

pub mod error;
pub mod object;

pub use error::TypeError;
pub use object::{ObjectId, OBJECT_ID_HEX_LEN, OBJECT_ID_LEN};
