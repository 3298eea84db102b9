//! # csak-ada - Cardano keys, addresses and message signing
//!
//! Builds on [`csak`] wallets to derive Cardano keys and sign data the way
//! CIP-30 wallets do.
//!
//! ## Features
//!
//! - **BIP32-Ed25519**: Icarus root keys with hardened and soft child derivation
//! - **CIP-1852 accounts**: all six roles, addresses for every network
//! - **CIP-19 addresses**: base, enterprise and reward, bech32 encoded
//! - **CIP-30 `signData`**: `COSE_Sign1` envelopes, optional Blake2b-224 pre-hash
//!
//! ## Example
//!
//! ```
//! use csak::Wallet;
//! use csak_ada::{Deriver, Network, cip30};
//!
//! let wallet = Wallet::from_entropy(&[0u8; 32], None)?;
//! let deriver = Deriver::new(&wallet, Network::Mainnet);
//! let account = deriver.account_keys(0)?;
//! let address = account.payment_address(Network::Mainnet);
//!
//! let key = deriver.payment_key(0)?;
//! let signed = cip30::sign(address.as_bytes(), b"hello", &key, false)?;
//! let result = cip30::verify(&signed.cose_sign1, None)?;
//! assert!(result.valid);
//! # Ok::<(), csak_ada::Error>(())
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
    clippy::missing_panics_doc,
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::similar_names
)]
#![forbid(unsafe_code)]

pub mod address;
pub mod bip32;
pub mod cip30;
pub mod cose;
pub mod deriver;
pub mod encoding;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod path;

pub use address::{Address, AddressKind};
pub use bip32::{XPrv, XPub};
pub use cip30::{DataSignature, VerificationResult};
pub use cose::{CoseKey, CoseSign1, HeaderMap};
pub use deriver::{AccountKeys, DerivedAccount, Deriver};
pub use error::{Error, Result};
pub use keys::{PrivateKey, PublicKey, Signature};
pub use network::Network;
pub use path::{ChildIndex, DerivationPath, Role};
