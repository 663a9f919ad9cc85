//! Low-level calls that bubble up the callee's revert data.
use alloc::vec::Vec;

use alloy_primitives::Address;
#[allow(deprecated)]
use stylus_sdk::{
    call::{self, Call},
    prelude::*,
};

/// Performs a `delegatecall` of `data` into `target` from `context`.
///
/// Returns the callee's return data on success. On failure, the callee's
/// revert data is returned as is, so that the caller can revert with exactly
/// the same payload.
///
/// # Arguments
///
/// * `context` - The top level storage the call is made from. Its storage
///   cache is flushed before the call.
/// * `target` - The contract whose code runs against `context`'s storage.
/// * `data` - The calldata to delegate.
///
/// # Errors
///
/// * The raw revert data of `target`. Empty if the call failed without data.
#[allow(deprecated)]
pub fn function_delegate_call<T: TopLevelStorage>(
    context: &mut T,
    target: Address,
    data: &[u8],
) -> Result<Vec<u8>, Vec<u8>> {
    // SAFETY: the delegated code runs against `context`'s storage; every
    // caller in this crate only delegates into UUPS implementations that
    // share the proxy's layout.
    let result =
        unsafe { call::delegate_call(Call::new_in(context), target, data) };

    result.map_err(|e| match e {
        call::Error::Revert(data) => data,
        _ => Vec::new(),
    })
}
