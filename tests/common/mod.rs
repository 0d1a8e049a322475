//! Common test utilities for MOC explorer integration tests
//!
//! Throwaway vaults on disk and the small corpora the tests share.

pub mod vault;

pub use vault::{mutual_pair_vault, TestVault};
