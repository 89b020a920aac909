//! Origination orchestrator.

use tznft_transport::{ContractCode, ExecutionHandle};
use tznft_types::{Address, Micheline, Result, TznftError};

/// Initial storage, either as Michelson source or as a structured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialStorage {
    Literal(String),
    Value(Micheline),
}

impl InitialStorage {
    /// Michelson text passed to the engine.
    pub fn render(&self) -> String {
        match self {
            Self::Literal(source) => source.clone(),
            Self::Value(value) => value.to_string(),
        }
    }
}

fn origination_error(label: &str, cause: TznftError) -> TznftError {
    TznftError::Origination {
        label: label.to_string(),
        cause: Box::new(cause),
    }
}

/// Originate `code` with `storage` and wait for the new contract's address.
///
/// Nothing here is retried. A submitted origination that later fails to
/// confirm has still been submitted.
pub async fn originate(
    handle: &dyn ExecutionHandle,
    code: &ContractCode,
    storage: &InitialStorage,
    label: &str,
) -> Result<Address> {
    tracing::info!(label, code = %code.path.display(), "originating contract");
    let hash = handle
        .originate(label, code, &storage.render())
        .await
        .map_err(|e| origination_error(label, e))?;

    let receipt = handle
        .confirm(&hash)
        .await
        .map_err(|e| origination_error(label, e))?;

    let address = receipt
        .originated_contracts
        .first()
        .ok_or_else(|| {
            origination_error(
                label,
                TznftError::schema("originated contract address", "operation without originated contracts"),
            )
        })
        .and_then(|raw| Address::parse(raw).map_err(|e| origination_error(label, e)))?;

    tracing::info!(label, contract = %address, operation = %hash, "contract originated");
    Ok(address)
}
