//! Balance and metadata queries.
//!
//! Balances go through the inspector contract: its `query` entrypoint calls
//! the collection's FA2 `balance_of` and stores the responses, which are then
//! read back from the inspector's storage. Metadata is read directly from the
//! collection's storage in a single fetch and answered per token id from it.
//! This requires the collection to keep `token_metadata` as a plain `map`
//! (see [`NftStorage`]); a `big_map` id in its place is a
//! [`TznftError::SchemaMismatch`].

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use tznft_resolver::ConfigRead;
use tznft_transport::ExecutionHandle;
use tznft_types::{Address, Micheline, OrBranch, Result, TokenMetadata, TznftError};

use crate::storage::NftStorage;

pub const INSPECTOR_QUERY_ENTRYPOINT: &str = "query";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub owner: Address,
    #[serde(with = "tznft_types::biguint_string")]
    pub token_id: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub owner: Address,
    #[serde(with = "tznft_types::biguint_string")]
    pub token_id: BigUint,
    #[serde(with = "tznft_types::biguint_string")]
    pub balance: BigUint,
}

/// Metadata lookup result for one token id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(with = "tznft_types::biguint_string")]
    pub token_id: BigUint,
    pub metadata: Option<TokenMetadata>,
}

/// Inspector contract recorded for the active network by `bootstrap`.
pub fn inspector_address(config: &dyn ConfigRead) -> Result<Address> {
    let network = config.active_network()?;
    let raw = config
        .inspector(&network)
        .ok_or(TznftError::InspectorNotDeployed { network })?;
    Address::parse(&raw)
}

/// `pair (address %fa2) (list %requests (pair (address %owner) (nat %token_id)))`
fn query_param(nft: &Address, requests: &[BalanceRequest]) -> Micheline {
    let requests = requests
        .iter()
        .map(|r| Micheline::pair(Micheline::address(&r.owner), Micheline::int(&r.token_id)))
        .collect();
    Micheline::pair(Micheline::address(nft), Micheline::seq(requests))
}

/// Decode the inspector storage after a query.
///
/// `Left Unit` is the empty state left by origination; `Right` holds the
/// `balance_of` responses in the order the collection returned them.
pub fn decode_balance_responses(storage: &Micheline) -> Result<Vec<BalanceResponse>> {
    let responses = match storage.as_or()? {
        OrBranch::Right(responses) => responses,
        OrBranch::Left(_) => {
            return Err(TznftError::schema(
                "inspector state with balance responses",
                "empty inspector state",
            ))
        }
    };
    responses
        .as_seq()?
        .iter()
        .map(|item| {
            let (request, balance) = item.unpair()?;
            let (owner, token_id) = request.unpair()?;
            Ok(BalanceResponse {
                owner: owner.as_address()?,
                token_id: token_id.as_nat()?,
                balance: balance.as_nat()?,
            })
        })
        .collect()
}

/// Query balances of `nft` tokens through the inspector at `inspector`.
pub async fn query_balances(
    handle: &dyn ExecutionHandle,
    inspector: &Address,
    nft: &Address,
    requests: &[BalanceRequest],
) -> Result<Vec<BalanceResponse>> {
    tracing::debug!(%inspector, %nft, requests = requests.len(), "querying balances");
    let hash = handle
        .call(inspector, INSPECTOR_QUERY_ENTRYPOINT, &query_param(nft, requests))
        .await?;
    handle.confirm(&hash).await?;
    let storage = handle.storage(inspector).await?;
    decode_balance_responses(&storage)
}

/// Look up metadata for each id. Unknown ids are reported as `None`.
pub async fn query_metadata(
    handle: &dyn ExecutionHandle,
    nft: &Address,
    token_ids: &[BigUint],
) -> Result<Vec<MetadataEntry>> {
    let storage = NftStorage::from_micheline(&handle.storage(nft).await?)?;
    Ok(token_ids
        .iter()
        .map(|id| MetadataEntry {
            token_id: id.clone(),
            metadata: storage.token_metadata.get(id).cloned(),
        })
        .collect())
}
