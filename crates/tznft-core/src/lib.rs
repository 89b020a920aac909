//! tznft core: the orchestration layer between user descriptors and the network.
//!
//! - [`toolkit`]: builds an [`ExecutionHandle`] from an identity and the active network
//! - [`batch`]: compiles transfer and operator descriptors into typed instructions
//! - [`storage`]: encodes the initial storage of a fixed NFT collection
//! - [`originate`]: submits code + storage and waits for the contract address
//! - [`bootstrap`]: starts the sandbox, waits for readiness, deploys the inspector
//! - [`query`]: balance and metadata queries
//! - [`ops`]: mint, transfer and operator-update flows built from the above
//!
//! Sequential steps are strictly ordered. Independent per-item work (alias
//! resolution inside a batch) runs concurrently and is joined all-or-nothing:
//! the first failure is returned and the remaining futures are dropped.
//! Dropping a future does not withdraw a request the node already received.

pub mod batch;
pub mod bootstrap;
pub mod ops;
pub mod originate;
pub mod query;
pub mod retry;
pub mod storage;
pub mod toolkit;

pub use bootstrap::{Bootstrap, ProcessController, ShellProcessController};
pub use originate::{originate, InitialStorage};
pub use storage::{encode_nft_storage, NftStorage};
pub use toolkit::{create_execution_handle, CONFIRMATION_POLL_INTERVAL};
pub use tznft_transport::{ContractCode, ExecutionHandle, OperationReceipt};
