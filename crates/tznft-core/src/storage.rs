//! Initial storage of a fixed NFT collection.
//!
//! Storage type of the collection contract:
//!
//! ```text
//! pair (pair (map %ledger nat address)
//!            (map %operators (pair address (pair address nat)) unit))
//!      (map %token_metadata nat
//!           (pair nat (pair string (pair string (pair nat (map string string))))))
//! ```
//!
//! All three are plain `map`s, so the whole collection state comes back from
//! one storage read. Decoding a `big_map` id in any of these positions fails
//! with a schema mismatch.

use num_bigint::BigUint;
use std::collections::{BTreeMap, BTreeSet};

use tznft_types::{Address, Micheline, OperatorParam, Result, TokenMetadata, TznftError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftStorage {
    /// token id -> owner
    pub ledger: BTreeMap<BigUint, Address>,
    pub operators: BTreeSet<OperatorParam>,
    pub token_metadata: BTreeMap<BigUint, TokenMetadata>,
}

/// Storage for a collection where `owner` holds every token in `tokens`.
///
/// Duplicate token ids are not rejected: the last occurrence wins in both the
/// ledger and the metadata map.
pub fn encode_nft_storage(tokens: &[TokenMetadata], owner: &Address) -> NftStorage {
    let mut storage = NftStorage::default();
    for token in tokens {
        storage.ledger.insert(token.token_id.clone(), owner.clone());
        storage
            .token_metadata
            .insert(token.token_id.clone(), token.clone());
    }
    storage
}

fn metadata_to_micheline(meta: &TokenMetadata) -> Micheline {
    let extras = meta
        .extras
        .iter()
        .map(|(k, v)| Micheline::elt(Micheline::string(k.as_str()), Micheline::string(v.as_str())))
        .collect();
    Micheline::pair(
        Micheline::int(&meta.token_id),
        Micheline::pair(
            Micheline::string(meta.symbol.as_str()),
            Micheline::pair(
                Micheline::string(meta.name.as_str()),
                Micheline::pair(Micheline::int(&meta.decimals), Micheline::seq(extras)),
            ),
        ),
    )
}

fn metadata_from_micheline(value: &Micheline) -> Result<TokenMetadata> {
    let (token_id, rest) = value.unpair()?;
    let (symbol, rest) = rest.unpair()?;
    let (name, rest) = rest.unpair()?;
    let (decimals, extras) = rest.unpair()?;
    let extras = extras
        .as_map()?
        .into_iter()
        .map(|(k, v)| Ok((k.as_str()?.to_string(), v.as_str()?.to_string())))
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(TokenMetadata {
        token_id: token_id.as_nat()?,
        symbol: symbol.as_str()?.to_string(),
        name: name.as_str()?.to_string(),
        decimals: decimals.as_nat()?,
        extras,
    })
}

impl NftStorage {
    /// Michelson value for the collection's `--init`.
    ///
    /// Map literals are emitted in ascending key order.
    pub fn to_micheline(&self) -> Micheline {
        let ledger = self
            .ledger
            .iter()
            .map(|(id, owner)| Micheline::elt(Micheline::int(id), Micheline::address(owner)))
            .collect();
        let operators = self
            .operators
            .iter()
            .map(|op| Micheline::elt(op.to_micheline(), Micheline::unit()))
            .collect();
        let metadata = self
            .token_metadata
            .iter()
            .map(|(id, meta)| Micheline::elt(Micheline::int(id), metadata_to_micheline(meta)))
            .collect();

        Micheline::pair(
            Micheline::pair(Micheline::seq(ledger), Micheline::seq(operators)),
            Micheline::seq(metadata),
        )
    }

    /// Decode storage read back from the node.
    pub fn from_micheline(value: &Micheline) -> Result<Self> {
        let (assets, metadata) = value.unpair()?;
        let (ledger, operators) = assets.unpair()?;

        let ledger = ledger
            .as_map()?
            .into_iter()
            .map(|(id, owner)| Ok((id.as_nat()?, owner.as_address()?)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        let operators = operators
            .as_map()?
            .into_iter()
            .map(|(key, _)| {
                let (owner, rest) = key.unpair()?;
                let (operator, token_id) = rest.unpair()?;
                Ok(OperatorParam {
                    owner: owner.as_address()?,
                    operator: operator.as_address()?,
                    token_id: token_id.as_nat()?,
                })
            })
            .collect::<Result<BTreeSet<_>>>()?;

        let token_metadata = metadata
            .as_map()?
            .into_iter()
            .map(|(id, meta)| {
                let id = id.as_nat()?;
                let meta = metadata_from_micheline(meta)?;
                if meta.token_id != id {
                    return Err(TznftError::schema(
                        format!("metadata for token {}", id),
                        format!("metadata for token {}", meta.token_id),
                    ));
                }
                Ok((id, meta))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self {
            ledger,
            operators,
            token_metadata,
        })
    }
}
