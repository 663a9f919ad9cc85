/*!
# Upgradeable Contracts for Stylus

Building blocks for the UUPS (Universal Upgradeable Proxy Standard) pattern on
[Arbitrum Stylus](https://docs.arbitrum.io/stylus/stylus-gentle-introduction),
together with two versions of a small contract that live behind one proxy.

A deployment consists of:

- an [`Erc1967Proxy`] whose address never changes and which holds all state,
- an implementation contract, first [`UpgradeableContractV1`] and later
  [`UpgradeableContractV2`], whose code runs against the proxy's storage.

Upgrades are authorized by the implementation itself (UUPS), restricted to the
owner, and keep the proxy's storage untouched apart from the ERC-1967
implementation slot.

Revert reasons are plain `Error(string)` payloads, so callers see messages
such as `"Ownable: caller is not the owner"`.

[`Erc1967Proxy`]: crate::proxy::erc1967::Erc1967Proxy
[`UpgradeableContractV1`]: crate::versions::v1::UpgradeableContractV1
[`UpgradeableContractV2`]: crate::versions::v2::UpgradeableContractV2
*/

#![allow(clippy::module_name_repetitions)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod access;
pub mod proxy;
pub mod utils;
pub mod versions;
