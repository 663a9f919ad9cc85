//! Host queries about other accounts.
use alloy_primitives::Address;
use stylus_sdk::prelude::AccountAccess;

/// Extra account queries on top of the host's [`AccountAccess`].
pub trait AccountAccessExt: AccountAccess {
    /// Returns `true` if `account` has deployed code.
    ///
    /// A contract only gets its code once its constructor returns, so an
    /// account that is still being constructed reads as codeless.
    fn has_code(&self, account: Address) -> bool {
        self.code_size(account) > 0
    }
}

impl<T: AccountAccess + ?Sized> AccountAccessExt for T {}
