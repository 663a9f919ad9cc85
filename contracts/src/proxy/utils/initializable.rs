//! Protected initialization for contracts behind a proxy.
//!
//! A proxy cannot run the constructor of its implementation against its own
//! storage, so implementations expose initializer functions instead. This
//! module guards them:
//!
//! * [`Initializable::initializer`] opens version `1` and can run once;
//! * [`Initializable::reinitializer`] opens any later version, once, which
//!   allows extra setup steps after an upgrade;
//! * [`Initializable::disable_initializers`] locks the storage for good and
//!   is meant for the constructor of an implementation.
//!
//! Solidity modifiers have no Rust counterpart, so an initializer is written
//! as a call to [`Initializable::initializer`] (or
//! [`Initializable::reinitializer`]) at the top of the function and a call to
//! [`Initializable::finish`] at its end.
use alloc::vec::Vec;

use alloy_primitives::U64;
pub use sol::*;
#[allow(deprecated)]
use stylus_sdk::{
    call::MethodError,
    evm,
    prelude::*,
    storage::{StorageBool, StorageU64},
};

use crate::utils::revert::{encode_reason, RevertReason};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Triggered when the contract has been initialized or reinitialized.
        ///
        /// * `version` - The version that was initialized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Initialized(uint64 version);
    }
}

/// An [`Initializable`] error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested version was already initialized, or an initialization
    /// is in progress.
    AlreadyInitialized,
    /// Initializers cannot be disabled while initializing.
    Initializing,
    /// The function may only run from inside an initializer.
    NotInitializing,
}

impl RevertReason for Error {
    fn reason(&self) -> &'static str {
        match self {
            Error::AlreadyInitialized => {
                "Initializable: contract is already initialized"
            }
            Error::Initializing => "Initializable: contract is initializing",
            Error::NotInitializing => {
                "Initializable: contract is not initializing"
            }
        }
    }
}

impl From<Error> for Vec<u8> {
    fn from(e: Error) -> Self {
        encode_reason(e.reason())
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> Vec<u8> {
        self.into()
    }
}

/// State of an [`Initializable`] contract.
#[storage]
pub struct Initializable {
    /// The highest version this storage has been initialized to.
    initialized: StorageU64,
    /// Whether an initializer is currently running.
    initializing: StorageBool,
}

impl Initializable {
    /// Opens the initial version `1`. See [`Self::reinitializer`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::AlreadyInitialized`] - If the storage has already been
    ///   initialized or is being initialized.
    pub fn initializer(&mut self) -> Result<(), Error> {
        self.reinitializer(1)
    }

    /// Opens initialization step `version`.
    ///
    /// Succeeds only if the storage has not been initialized to `version` or
    /// any later version, and no initializer is running. Must be paired with
    /// a call to [`Self::finish`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `version` - The initialization step being run.
    ///
    /// # Errors
    ///
    /// * [`Error::AlreadyInitialized`] - If `version` is not greater than the
    ///   current version, or an initializer is already running.
    pub fn reinitializer(&mut self, version: u64) -> Result<(), Error> {
        if self.is_initializing() || self.get_initialized_version() >= version
        {
            return Err(Error::AlreadyInitialized);
        }

        self.initialized.set(U64::from(version));
        self.initializing.set(true);
        Ok(())
    }

    /// Closes the running initialization step.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Events
    ///
    /// * [`Initialized`].
    #[allow(deprecated)]
    pub fn finish(&mut self) {
        self.initializing.set(false);
        evm::log(Initialized { version: self.get_initialized_version() });
    }

    /// Locks the storage so that no initializer can ever run on it.
    ///
    /// Call it from the constructor of an implementation contract, so the
    /// implementation itself cannot be taken over through its initializers.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::Initializing`] - If an initializer is running.
    ///
    /// # Events
    ///
    /// * [`Initialized`] - Unless the storage was already locked.
    #[allow(deprecated)]
    pub fn disable_initializers(&mut self) -> Result<(), Error> {
        if self.is_initializing() {
            return Err(Error::Initializing);
        }

        if self.get_initialized_version() != u64::MAX {
            self.initialized.set(U64::MAX);
            evm::log(Initialized { version: u64::MAX });
        }

        Ok(())
    }

    /// Checks that an initializer is running.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::NotInitializing`] - If no initializer is running.
    pub fn only_initializing(&self) -> Result<(), Error> {
        if self.is_initializing() {
            Ok(())
        } else {
            Err(Error::NotInitializing)
        }
    }

    /// Returns the highest version that has been initialized.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn get_initialized_version(&self) -> u64 {
        self.initialized.get().to()
    }

    /// Returns `true` while an initializer is running.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.initializing.get()
    }
}
