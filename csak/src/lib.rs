//! # csak - Cardano wallet seed core
//!
//! Mnemonic handling and root key stretching shared by the csak toolbox.
//!
//! ## Features
//!
//! - **Cardano word policy**: only 15 and 24 word phrases are accepted
//! - **Icarus root keys**: PBKDF2-HMAC-SHA512 over the entropy, then clamped
//! - **Secrets wiped on drop**: phrases, entropy and root keys use `zeroize`
//!
//! ## Example
//!
//! ```
//! use csak::Wallet;
//!
//! let wallet = Wallet::from_entropy(&[0u8; 32], None)?;
//! assert_eq!(wallet.word_count(), 24);
//! assert_eq!(wallet.seed().as_bytes().len(), 96);
//! # Ok::<(), csak::Error>(())
//! ```

#![warn(
    missing_docs,
    rust_2018_idioms,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::unreadable_literal
)]
#![forbid(unsafe_code)]

pub mod error;
pub mod mnemonic;
pub mod seed;
mod wallet;

pub use error::{Error, Result};
pub use mnemonic::Mnemonic;
pub use seed::Seed;
pub use wallet::Wallet;
