//! Property-based tests for BIP32-Ed25519 derivation.

use csak::Wallet;
use csak_ada::{ChildIndex, DerivationPath, Deriver, Error, Network, Role, XPrv};
use proptest::prelude::*;

fn root(entropy: &[u8; 32]) -> XPrv {
    let wallet = Wallet::from_entropy(entropy, None).expect("valid entropy");
    XPrv::from_seed(wallet.seed())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))] // PBKDF2 per case

    /// The same wallet and account always produce the same addresses.
    #[test]
    fn prop_derivation_is_deterministic(entropy in any::<[u8; 32]>(), account in 0u32..1000) {
        let wallet = Wallet::from_entropy(&entropy, None).unwrap();
        let deriver = Deriver::new(&wallet, Network::Mainnet);
        let first = deriver.derive(account).unwrap();
        let second = deriver.derive(account).unwrap();
        prop_assert_eq!(first.base_address, second.base_address);
        prop_assert_eq!(first.public_key_hex, second.public_key_hex);
    }

    /// Deriving a full path equals deriving its segments one after another.
    #[test]
    fn prop_path_is_compositional(
        entropy in any::<[u8; 32]>(),
        account in 0u32..(1 << 31),
        role in 0u32..6,
        index in 0u32..(1 << 31),
    ) {
        let root = root(&entropy);
        let role = Role::try_from(role).unwrap();
        let full = root
            .derive_path(&DerivationPath::cip1852(account, role, index).unwrap())
            .unwrap();

        let stepwise = root
            .derive_path(&DerivationPath::account(account).unwrap())
            .unwrap()
            .derive_child(ChildIndex::normal(role.index()).unwrap())
            .unwrap()
            .derive_child(ChildIndex::normal(index).unwrap())
            .unwrap();

        prop_assert_eq!(full.extended_key(), stepwise.extended_key());
        prop_assert_eq!(full.chain_code(), stepwise.chain_code());
    }

    /// Soft derivation from the account public key matches private derivation.
    #[test]
    fn prop_public_derivation_agrees(
        entropy in any::<[u8; 32]>(),
        account in 0u32..100,
        role in 0u32..6,
        index in 0u32..(1 << 31),
    ) {
        let account_key = root(&entropy)
            .derive_path(&DerivationPath::account(account).unwrap())
            .unwrap();
        let soft = DerivationPath::new(vec![
            ChildIndex::normal(role).unwrap(),
            ChildIndex::normal(index).unwrap(),
        ]);

        let from_private = account_key.derive_path(&soft).unwrap().public();
        let from_public = account_key.public().derive_path(&soft).unwrap();
        prop_assert_eq!(from_private, from_public);
    }

    /// A public key never yields a hardened child.
    #[test]
    fn prop_hardened_from_public_fails(entropy in any::<[u8; 32]>(), index in 0u32..(1 << 31)) {
        let xpub = root(&entropy).public();
        let result = xpub.derive_child(ChildIndex::hardened(index).unwrap());
        prop_assert!(matches!(result, Err(Error::HardenedFromPublic)));
    }
}
