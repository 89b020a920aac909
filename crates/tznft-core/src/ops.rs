//! Mint, transfer and operator-update flows.
//!
//! Each flow takes an already-connected handle, so the signer and network are
//! fixed before any descriptor is compiled.

use futures::try_join;

use tznft_resolver::AliasResolver;
use tznft_transport::{ContractCode, ExecutionHandle, OperationReceipt};
use tznft_types::{
    transfer_param, update_operators_param, Address, OperatorUpdate, Result, TokenMetadata,
    TznftError,
};

use crate::batch::{compile_operator_list, compile_transfers, resolve_transfer_batch};
use crate::originate::{originate, InitialStorage};
use crate::storage::encode_nft_storage;

pub const NFT_LABEL: &str = "nft";
pub const TRANSFER_ENTRYPOINT: &str = "transfer";
pub const UPDATE_OPERATORS_ENTRYPOINT: &str = "update_operators";

/// Parse mint descriptors (`"id, symbol, name"`).
pub fn parse_tokens<S: AsRef<str>>(descriptors: &[S]) -> Result<Vec<TokenMetadata>> {
    if descriptors.is_empty() {
        return Err(TznftError::TokenFormat {
            descriptor: String::new(),
            reason: "at least one token is required".to_string(),
        });
    }
    descriptors
        .iter()
        .map(|d| TokenMetadata::from_descriptor(d.as_ref()))
        .collect()
}

/// Originate a new collection where `owner` holds every token.
pub async fn mint_collection(
    handle: &dyn ExecutionHandle,
    nft_code: &ContractCode,
    owner: &Address,
    tokens: &[TokenMetadata],
) -> Result<Address> {
    let storage = encode_nft_storage(tokens, owner);
    tracing::debug!(%owner, tokens = storage.ledger.len(), "minting collection");
    originate(
        handle,
        nft_code,
        &InitialStorage::Value(storage.to_micheline()),
        NFT_LABEL,
    )
    .await
}

/// Compile, resolve and submit a transfer batch, then wait for inclusion.
pub async fn transfer_tokens<S: AsRef<str>>(
    handle: &dyn ExecutionHandle,
    resolver: &AliasResolver<'_>,
    nft: &Address,
    descriptors: &[S],
) -> Result<OperationReceipt> {
    if descriptors.is_empty() {
        return Err(TznftError::TransferFormat {
            descriptor: String::new(),
            reason: "at least one transfer is required".to_string(),
        });
    }
    let batch = compile_transfers(descriptors)?;
    let resolved = resolve_transfer_batch(resolver, &batch).await?;
    tracing::debug!(%nft, entries = resolved.len(), "submitting transfer batch");

    let hash = handle
        .call(nft, TRANSFER_ENTRYPOINT, &transfer_param(&resolved))
        .await?;
    handle.confirm(&hash).await
}

/// Add and remove operators of `owner`'s tokens in one `update_operators` call.
///
/// Additions are submitted before removals.
pub async fn update_operators<S: AsRef<str> + Sync>(
    handle: &dyn ExecutionHandle,
    resolver: &AliasResolver<'_>,
    nft: &Address,
    owner: &Address,
    add: &[S],
    remove: &[S],
) -> Result<OperationReceipt> {
    if add.is_empty() && remove.is_empty() {
        return Err(TznftError::OperatorFormat {
            descriptor: String::new(),
            reason: "nothing to add or remove".to_string(),
        });
    }
    let (added, removed) = try_join!(
        compile_operator_list(resolver, add, owner),
        compile_operator_list(resolver, remove, owner),
    )?;
    let updates: Vec<OperatorUpdate> = added
        .into_iter()
        .map(OperatorUpdate::Add)
        .chain(removed.into_iter().map(OperatorUpdate::Remove))
        .collect();
    tracing::debug!(%nft, %owner, updates = updates.len(), "submitting operator updates");

    let hash = handle
        .call(nft, UPDATE_OPERATORS_ENTRYPOINT, &update_operators_param(&updates))
        .await?;
    handle.confirm(&hash).await
}
