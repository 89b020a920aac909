//! Transfer batches and operator updates.
//!
//! Batch entries are generic over the identity type: the compiler produces
//! `TransferBatchEntry<String>` straight from user descriptors, and resolution
//! turns that into `TransferBatchEntry<Address>` ready for the FA2 `transfer`
//! entrypoint.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::micheline::Micheline;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDestination<A = String> {
    pub to: A,
    #[serde(with = "crate::biguint_string")]
    pub token_id: BigUint,
    #[serde(with = "crate::biguint_string")]
    pub amount: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatchEntry<A = String> {
    pub from: A,
    pub txs: Vec<TransferDestination<A>>,
}

impl TransferBatchEntry<Address> {
    /// `pair (address %from_) (list %txs (pair (address %to_) (pair (nat %token_id) (nat %amount))))`
    pub fn to_micheline(&self) -> Micheline {
        let txs = self
            .txs
            .iter()
            .map(|tx| {
                Micheline::pair(
                    Micheline::address(&tx.to),
                    Micheline::pair(Micheline::int(&tx.token_id), Micheline::int(&tx.amount)),
                )
            })
            .collect();
        Micheline::pair(Micheline::address(&self.from), Micheline::seq(txs))
    }
}

/// Parameter of the FA2 `transfer` entrypoint.
pub fn transfer_param(batch: &[TransferBatchEntry<Address>]) -> Micheline {
    Micheline::seq(batch.iter().map(TransferBatchEntry::to_micheline).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperatorParam {
    pub owner: Address,
    pub operator: Address,
    #[serde(with = "crate::biguint_string")]
    pub token_id: BigUint,
}

impl OperatorParam {
    /// `pair (address %owner) (pair (address %operator) (nat %token_id))`
    pub fn to_micheline(&self) -> Micheline {
        Micheline::pair(
            Micheline::address(&self.owner),
            Micheline::pair(Micheline::address(&self.operator), Micheline::int(&self.token_id)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "param", rename_all = "snake_case")]
pub enum OperatorUpdate {
    Add(OperatorParam),
    Remove(OperatorParam),
}

impl OperatorUpdate {
    pub fn to_micheline(&self) -> Micheline {
        match self {
            Self::Add(param) => Micheline::left(param.to_micheline()),
            Self::Remove(param) => Micheline::right(param.to_micheline()),
        }
    }
}

/// Parameter of the FA2 `update_operators` entrypoint.
pub fn update_operators_param(updates: &[OperatorUpdate]) -> Micheline {
    Micheline::seq(updates.iter().map(OperatorUpdate::to_micheline).collect())
}
