//! tznft Transport Layer
//!
//! Everything that talks to the network lives here.
//!
//! This crate provides:
//! - [`rpc`]: blocking JSON RPC client for block headers, operation receipts
//!   and contract storage, exposed as async methods
//! - [`octez`]: driver for the `octez-client` execution engine, which owns
//!   signing and injection
//! - [`handle`]: the [`ExecutionHandle`] abstraction the core drives, and the
//!   [`Connector`] that builds one from a signer and an endpoint
//! - [`network`]: network names and local paths
//!
//! # Example
//!
//! ```ignore
//! use tznft_transport::rpc::RpcClient;
//!
//! let rpc = RpcClient::new("http://localhost:20000");
//! let header = rpc.block_header("head").await?;
//! println!("level {}", header.level);
//! ```

pub mod handle;
pub mod network;
pub mod octez;
pub mod rpc;

pub use handle::{
    BlockHeader, Connector, ContractCode, ExecutionHandle, OctezConnector, OperationReceipt,
    ToolkitSpec,
};
pub use octez::OctezClient;
pub use rpc::RpcClient;
