use alloy::{
    primitives::Bytes,
    sol_types::{Revert, SolError},
};

/// Extension trait for asserting the reason of a reverted call.
pub trait RevertExt {
    /// Returns the raw revert data carried by the error, if any.
    fn revert_data(&self) -> Option<Bytes>;

    /// Returns `true` if the call reverted with `Error(reason)`.
    fn reverted_with_reason(&self, reason: &str) -> bool {
        self.revert_data()
            .and_then(|data| Revert::abi_decode(&data).ok())
            .is_some_and(|revert| revert.reason == reason)
    }
}

impl RevertExt for alloy::contract::Error {
    fn revert_data(&self) -> Option<Bytes> {
        self.as_revert_data()
    }
}

impl RevertExt for eyre::Report {
    fn revert_data(&self) -> Option<Bytes> {
        self.downcast_ref::<alloy::contract::Error>()
            .and_then(RevertExt::revert_data)
    }
}
