//! Common utilities shared by the access, proxy and versioned contracts.
pub mod account;
pub mod address;
pub mod revert;
pub mod storage_slot;
