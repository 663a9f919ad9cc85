//! The `proxiableUUID` probe of [ERC-1822].
//!
//! [ERC-1822]: https://eips.ethereum.org/EIPS/eip-1822
use alloy_primitives::B256;

/// Implemented by every UUPS implementation.
///
/// A proxy only switches to a new implementation after the new code reports
/// the ERC-1967 implementation slot here.
pub trait IErc1822Proxiable {
    /// Error returned when the probe is rejected.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// The slot this implementation expects its address to be stored in.
    ///
    /// # Errors
    ///
    /// * Reverts through a proxy, so a proxy can never become the
    ///   implementation of another proxy.
    fn proxiable_uuid(&self) -> Result<B256, Self::Error>;
}

pub use sol::Erc1822ProxiableInterface;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    #![allow(missing_docs)]

    use alloc::vec;

    use stylus_sdk::prelude::sol_interface;

    sol_interface! {
        interface Erc1822ProxiableInterface {
            function proxiableUUID() external view returns (bytes32);
        }
    }
}
