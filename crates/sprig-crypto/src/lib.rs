//! Cryptographic primitives for sprig.
//!
//! Objects are identified by a SHA-1 digest over their kind tag, a NUL byte
//! and their payload. All hashing wraps the RustCrypto `sha1` crate; there is
//! no custom cryptography here.

pub mod hasher;

pub use hasher::ContentHasher;
