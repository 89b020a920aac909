//! Error types shared by the tznft library crates.
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | `ActiveNetworkNotSet`, `NetworkNotConfigured`, `InspectorNotDeployed`, `Config` |
//! | Resolution | `UnknownAlias`, `AliasWithoutKey`, `InvalidAddress`, `TransferFormat`, `OperatorFormat`, `TokenFormat` |
//! | Network | `Origination`, `SchemaMismatch`, `NetworkUnreachable`, `Rpc`, `Engine`, `OperationFailed` |
//! | External process | `SandboxStart`, `SandboxStop` |
//!
//! Configuration errors are user-correctable and never retried. The only
//! retried path is the bootstrap readiness probe, which reports exhaustion as
//! [`TznftError::NetworkUnreachable`].

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, TznftError>;

#[derive(Debug, thiserror::Error)]
pub enum TznftError {
    // ==================== Configuration ====================
    /// No `activeNetwork` key in the configuration
    #[error("no active network configured; run `tznft set-network <network>`")]
    ActiveNetworkNotSet,

    /// The active network has no provider URL
    #[error("network '{network}' has no providerUrl configured")]
    NetworkNotConfigured { network: String },

    /// Balance queries need an inspector originated by `bootstrap`
    #[error("inspector contract is not deployed on network '{network}'; run `tznft bootstrap` first")]
    InspectorNotDeployed { network: String },

    /// Configuration file could not be read, parsed or written
    #[error("configuration error: {message}")]
    Config { message: String },

    // ==================== Resolution ====================
    /// Token is neither a configured alias nor a literal address/key
    #[error("'{alias}' is neither a configured alias nor a valid address or key")]
    UnknownAlias { alias: String },

    /// Alias exists but cannot sign
    #[error("alias '{alias}' has no secret key and cannot sign operations")]
    AliasWithoutKey { alias: String },

    #[error("invalid address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("invalid transfer descriptor '{descriptor}': {reason}")]
    TransferFormat { descriptor: String, reason: String },

    #[error("invalid operator descriptor '{descriptor}': {reason}")]
    OperatorFormat { descriptor: String, reason: String },

    #[error("invalid token descriptor '{descriptor}': {reason}")]
    TokenFormat { descriptor: String, reason: String },

    // ==================== Network ====================
    /// Submission or confirmation of an origination failed
    #[error("origination of '{label}' failed: {cause}")]
    Origination {
        label: String,
        #[source]
        cause: Box<TznftError>,
    },

    /// A value returned by the network did not have the expected shape
    #[error("schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: String, found: String },

    /// The readiness probe ran out of attempts
    #[error("network unreachable after {attempts} attempts: {last_error}")]
    NetworkUnreachable { attempts: usize, last_error: String },

    /// Node RPC call failed
    #[error("rpc error ({context}): {message}")]
    Rpc { context: String, message: String },

    /// The execution engine rejected or failed to run a command
    #[error("execution engine error ({context}): {message}")]
    Engine { context: String, message: String },

    /// An operation was included but not applied
    #[error("operation {hash} was included with status '{status}'")]
    OperationFailed { hash: String, status: String },

    // ==================== External process ====================
    #[error("failed to start sandbox: {reason}")]
    SandboxStart { reason: String },

    #[error("failed to stop sandbox: {reason}")]
    SandboxStop { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TznftError {
    pub fn schema(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn rpc(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Rpc {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn engine(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Engine {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }
}
