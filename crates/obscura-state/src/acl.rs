//! # Access Control Registry
//!
//! Tracks which principals may request plaintext disclosure of which
//! ciphertext handle. The table is append-only: [`AccessControlRegistry::grant`]
//! is the only mutation.
//!
//! A handle's grants belong to that handle alone. When a balance moves to a
//! new handle, the new handle starts with no grants and the processor must
//! re-grant explicitly. The old handle keeps its grants, which is harmless:
//! it no longer names anyone's current balance.

use std::collections::{BTreeMap, BTreeSet};

use obscura_core::{EncryptedValue, Principal};

/// Append-only `(handle, principal)` grant table.
#[derive(Debug, Clone, Default)]
pub struct AccessControlRegistry {
    grants: BTreeMap<EncryptedValue, BTreeSet<Principal>>,
    total: usize,
}

impl AccessControlRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `principal` to request disclosure of `value`.
    ///
    /// Idempotent. Returns `true` if the grant was new.
    pub fn grant(&mut self, value: EncryptedValue, principal: Principal) -> bool {
        let added = self.grants.entry(value).or_default().insert(principal);
        if added {
            self.total += 1;
            tracing::trace!(handle = %value, principal = %principal, "disclosure grant recorded");
        }
        added
    }

    /// Grant every principal in `principals` on `value`.
    pub fn grant_all<I>(&mut self, value: EncryptedValue, principals: I)
    where
        I: IntoIterator<Item = Principal>,
    {
        for principal in principals {
            self.grant(value, principal);
        }
    }

    /// Whether `principal` may request disclosure of `value`.
    pub fn is_authorized(&self, value: EncryptedValue, principal: Principal) -> bool {
        self.grants
            .get(&value)
            .is_some_and(|set| set.contains(&principal))
    }

    /// Principals allowed to request disclosure of `value`, in address order.
    pub fn authorized_principals(
        &self,
        value: EncryptedValue,
    ) -> impl Iterator<Item = Principal> + '_ {
        self.grants.get(&value).into_iter().flatten().copied()
    }

    /// Total number of distinct grants.
    pub fn len(&self) -> usize {
        self.total
    }

    /// Whether no grant has ever been recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
