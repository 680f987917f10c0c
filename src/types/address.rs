//! Case-normalized address identifier.
//!
//! Every equality, hash and map-key comparison in the engine goes through
//! the lowercased hex form; the original case is retained only so responses
//! can echo back whatever the caller sent.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use alloy::primitives::Address as AlloyAddress;
use serde::{Deserialize, Serialize};

/// A 20-byte identifier. `PartialEq`/`Hash` compare on the lowercased hex
/// form only, so two `Address`es built from differently-cased input are
/// equal and collide in maps.
///
/// Serializes/deserializes as alloy's own checksummed hex string - the
/// `inner` field is private but `serde(transparent)` only needs the single
/// field to carry an implementation, not to be visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    inner: AlloyAddress,
}

impl Address {
    pub fn new(inner: AlloyAddress) -> Self {
        Self { inner }
    }

    pub fn zero() -> Self {
        Self { inner: AlloyAddress::ZERO }
    }

    pub fn as_alloy(&self) -> AlloyAddress {
        self.inner
    }

    /// Lowercased hex form (no `0x` case variance), used for every
    /// comparison, hash and map key.
    pub fn lowercased(&self) -> String {
        format!("{:#x}", self.inner)
    }

    /// Checksum/original-case hex form, used only for response echo.
    pub fn to_checksum(&self) -> String {
        self.inner.to_checksum(None)
    }

    pub fn is_zero(&self) -> bool {
        self.inner.is_zero()
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.lowercased() == other.lowercased()
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lowercased().hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lowercased())
    }
}

impl FromStr for Address {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = AlloyAddress::from_str(s).map_err(|e| eyre::eyre!("invalid address: {e}"))?;
        Ok(Self { inner })
    }
}

impl From<AlloyAddress> for Address {
    fn from(inner: AlloyAddress) -> Self {
        Self { inner }
    }
}
