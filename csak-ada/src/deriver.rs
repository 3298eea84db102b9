//! Cardano account derivation from an HD wallet.

use zeroize::Zeroizing;

use csak::Wallet;

use crate::address::Address;
use crate::bip32::{XPrv, XPub};
use crate::keys::{PrivateKey, PublicKey};
use crate::network::Network;
use crate::path::{COIN_TYPE, ChildIndex, DerivationPath, PURPOSE, Role};
use crate::Result;

/// Keys for the six CIP-1852 roles of one account, all at address index 0.
#[derive(Debug, Clone)]
pub struct AccountKeys {
    account: u32,
    account_key: XPrv,
    roles: [XPrv; 6],
}

impl AccountKeys {
    /// Derive an account from the wallet root key.
    ///
    /// # Errors
    ///
    /// Returns an error if `account >= 2^31`.
    pub fn derive(root: &XPrv, account: u32) -> Result<Self> {
        let account_key = root.derive_path(&DerivationPath::account(account)?)?;
        let role_key = |role: Role| -> Result<XPrv> {
            account_key
                .derive_child(ChildIndex::Normal(role.index()))?
                .derive_child(ChildIndex::Normal(0))
        };
        let roles = [
            role_key(Role::External)?,
            role_key(Role::Internal)?,
            role_key(Role::Staking)?,
            role_key(Role::DRep)?,
            role_key(Role::CommitteeCold)?,
            role_key(Role::CommitteeHot)?,
        ];
        tracing::debug!(account, "derived account keys");
        Ok(Self {
            account,
            account_key,
            roles,
        })
    }

    /// Account index.
    #[inline]
    #[must_use]
    pub const fn account(&self) -> u32 {
        self.account
    }

    /// Account-level extended public key (`m/1852'/1815'/account'`).
    #[must_use]
    pub fn account_public(&self) -> XPub {
        self.account_key.public()
    }

    /// Extended key for `role` at index 0.
    #[must_use]
    pub fn role(&self, role: Role) -> &XPrv {
        &self.roles[role.index() as usize]
    }

    /// Public key for `role` at index 0.
    #[must_use]
    pub fn public_key(&self, role: Role) -> PublicKey {
        self.role(role).public().public_key()
    }

    /// Path string for `role` at index 0.
    #[must_use]
    pub fn path(&self, role: Role) -> String {
        format!("m/{PURPOSE}'/{COIN_TYPE}'/{}'/{}/0", self.account, role.index())
    }

    /// Base address from the external payment key and the staking key.
    #[must_use]
    pub fn payment_address(&self, network: Network) -> Address {
        Address::base(
            network,
            &self.public_key(Role::External),
            &self.public_key(Role::Staking),
        )
    }

    /// Reward address of the staking key.
    #[must_use]
    pub fn stake_address(&self, network: Network) -> Address {
        Address::reward(network, &self.public_key(Role::Staking))
    }

    /// Enterprise address of the external payment key.
    #[must_use]
    pub fn enterprise_address(&self, network: Network) -> Address {
        Address::enterprise(network, &self.public_key(Role::External))
    }
}

/// A derived Cardano account with rendered keys and addresses.
#[derive(Debug, Clone)]
pub struct DerivedAccount {
    /// Account index.
    pub account: u32,
    /// Role and derivation path for each of the six roles.
    pub paths: Vec<(Role, String)>,
    /// Base address (bech32).
    pub base_address: String,
    /// Stake address (bech32).
    pub stake_address: String,
    /// Enterprise address (bech32).
    pub enterprise_address: String,
    /// Payment extended private key `kL || kR` in hex (zeroized on drop).
    pub private_key_hex: Zeroizing<String>,
    /// Payment private key as CBOR hex (zeroized on drop).
    pub private_key_cbor_hex: Zeroizing<String>,
    /// Payment public key in hex.
    pub public_key_hex: String,
    /// Payment public key as CBOR hex.
    pub public_key_cbor_hex: String,
}

/// Cardano deriver bound to a wallet and a network.
#[derive(Debug)]
pub struct Deriver<'a> {
    wallet: &'a Wallet,
    network: Network,
}

impl<'a> Deriver<'a> {
    /// Create a new Cardano deriver.
    #[inline]
    #[must_use]
    pub const fn new(wallet: &'a Wallet, network: Network) -> Self {
        Self { wallet, network }
    }

    /// Network addresses are rendered for.
    #[inline]
    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Root extended key of the wallet.
    #[must_use]
    pub fn root(&self) -> XPrv {
        XPrv::from_seed(self.wallet.seed())
    }

    /// Role keys for one account.
    ///
    /// # Errors
    ///
    /// Returns an error if `account >= 2^31`.
    pub fn account_keys(&self, account: u32) -> Result<AccountKeys> {
        AccountKeys::derive(&self.root(), account)
    }

    /// Signing key of the external payment role at `account`.
    ///
    /// # Errors
    ///
    /// Returns an error if `account >= 2^31`.
    pub fn payment_key(&self, account: u32) -> Result<PrivateKey> {
        Ok(self.account_keys(account)?.role(Role::External).private_key())
    }

    /// Derive and render one account.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation or encoding fails.
    pub fn derive(&self, account: u32) -> Result<DerivedAccount> {
        self.render(account, &self.account_keys(account)?)
    }

    /// Derive accounts `start..start + count`.
    ///
    /// # Errors
    ///
    /// Returns an error if any derivation fails.
    pub fn derive_many(&self, start: u32, count: u32) -> Result<Vec<DerivedAccount>> {
        let root = self.root();
        (start..start.saturating_add(count))
            .map(|account| {
                let keys = AccountKeys::derive(&root, account)?;
                self.render(account, &keys)
            })
            .collect()
    }

    fn render(&self, account: u32, keys: &AccountKeys) -> Result<DerivedAccount> {
        let payment = keys.role(Role::External).private_key();
        let public = payment.public_key();
        Ok(DerivedAccount {
            account,
            paths: Role::ALL.iter().map(|r| (*r, keys.path(*r))).collect(),
            base_address: keys.payment_address(self.network).to_bech32()?,
            stake_address: keys.stake_address(self.network).to_bech32()?,
            enterprise_address: keys.enterprise_address(self.network).to_bech32()?,
            private_key_hex: payment.to_hex(),
            private_key_cbor_hex: payment.to_cbor_hex()?,
            public_key_hex: public.to_hex(),
            public_key_cbor_hex: public.to_cbor_hex()?,
        })
    }
}
