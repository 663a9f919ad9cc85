//! Access to primitive storage values living at arbitrary, hashed slots.
//!
//! Upgradeable contracts keep proxy bookkeeping (the ERC-1967 implementation
//! address, the logic flag of an implementation) away from the sequential
//! layout of the contract behind the proxy. [`StorageSlot`] hands out a
//! storage accessor bound to such a slot.
use alloy_primitives::U256;
use stylus_sdk::{host::VMAccess, prelude::*};

const SLOT_BYTE_SPACE: u8 = 32;

/// Zero-sized storage field that resolves values at fixed slots.
///
/// Add it as a field of a `#[storage]` struct; it occupies no slot of its own.
#[storage]
pub struct StorageSlot;

impl StorageSlot {
    /// Returns a [`StorageType`] located at `slot`.
    ///
    /// Values narrower than a word are right-aligned inside the slot, the
    /// same way Solidity packs a lone `address` or `bool`.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `slot` - The slot to bind the accessor to.
    #[must_use]
    pub fn get_slot<ST: StorageType>(&self, slot: impl Into<U256>) -> ST {
        // SAFETY: `ST::SLOT_BYTES` is at most 32, so the subtraction never
        // underflows and the cast never truncates.
        #[allow(clippy::cast_possible_truncation)]
        unsafe {
            ST::new(
                slot.into(),
                SLOT_BYTE_SPACE - ST::SLOT_BYTES as u8,
                self.raw_vm(),
            )
        }
    }
}
