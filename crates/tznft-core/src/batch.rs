//! Batch compiler for transfer and operator descriptors.
//!
//! Transfer descriptors have the form `"from, to, token_id"`. Compiling a
//! descriptor merges it into the previous batch entry only when that entry has
//! the same raw `from` token; non-adjacent entries from the same sender stay
//! separate, so the submitted order is exactly the input order.
//!
//! Operator descriptors have the form `"operator, token_id"` and are bound to a
//! single owner.

use futures::future::try_join_all;
use num_bigint::BigUint;

use tznft_resolver::AliasResolver;
use tznft_types::{
    parse_token_id, Address, OperatorParam, Result, TransferBatchEntry, TransferDestination,
    TznftError,
};

/// Amount moved per destination. NFTs are indivisible.
const NFT_AMOUNT: u32 = 1;

fn parse_transfer(descriptor: &str) -> Result<TransferBatchEntry> {
    let fail = |reason: &str| TznftError::TransferFormat {
        descriptor: descriptor.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = descriptor.split(',').map(str::trim).collect();
    let [from, to, token_id] = fields.as_slice() else {
        return Err(fail("expected 'from, to, token_id'"));
    };
    if from.is_empty() || to.is_empty() {
        return Err(fail("sender and recipient must not be empty"));
    }
    let token_id = parse_token_id(token_id).ok_or_else(|| fail("token id is not a natural number"))?;

    Ok(TransferBatchEntry {
        from: from.to_string(),
        txs: vec![TransferDestination {
            to: to.to_string(),
            token_id,
            amount: BigUint::from(NFT_AMOUNT),
        }],
    })
}

/// Append one transfer descriptor to `batch`.
///
/// The destination joins the last entry when its sender token is identical,
/// otherwise a new entry is appended.
pub fn compile_transfer(descriptor: &str, mut batch: Vec<TransferBatchEntry>) -> Result<Vec<TransferBatchEntry>> {
    let entry = parse_transfer(descriptor)?;
    match batch.last_mut() {
        Some(last) if last.from == entry.from => last.txs.extend(entry.txs),
        _ => batch.push(entry),
    }
    Ok(batch)
}

/// Compile descriptors in order, starting from an empty batch.
pub fn compile_transfers<S: AsRef<str>>(descriptors: &[S]) -> Result<Vec<TransferBatchEntry>> {
    descriptors
        .iter()
        .try_fold(Vec::new(), |batch, d| compile_transfer(d.as_ref(), batch))
}

/// Resolve every sender and recipient of a compiled batch.
///
/// All lookups run concurrently; the first failure fails the whole batch.
pub async fn resolve_transfer_batch(
    resolver: &AliasResolver<'_>,
    batch: &[TransferBatchEntry],
) -> Result<Vec<TransferBatchEntry<Address>>> {
    try_join_all(batch.iter().map(|entry| async move {
        let (from, txs) = futures::try_join!(
            async { resolver.resolve_address(&entry.from) },
            try_join_all(entry.txs.iter().map(|tx| async move {
                Ok::<_, TznftError>(TransferDestination {
                    to: resolver.resolve_address(&tx.to)?,
                    token_id: tx.token_id.clone(),
                    amount: tx.amount.clone(),
                })
            })),
        )?;
        Ok::<_, TznftError>(TransferBatchEntry { from, txs })
    }))
    .await
}

fn parse_operator(resolver: &AliasResolver<'_>, descriptor: &str, owner: &Address) -> Result<OperatorParam> {
    let fail = |reason: String| TznftError::OperatorFormat {
        descriptor: descriptor.to_string(),
        reason,
    };

    let fields: Vec<&str> = descriptor.split(',').map(str::trim).collect();
    let [operator, token_id] = fields.as_slice() else {
        return Err(fail("expected 'operator, token_id'".to_string()));
    };
    let token_id = parse_token_id(token_id).ok_or_else(|| fail("token id is not a natural number".to_string()))?;
    let operator = resolver
        .resolve_address(operator)
        .map_err(|e| fail(e.to_string()))?;

    Ok(OperatorParam {
        owner: owner.clone(),
        operator,
        token_id,
    })
}

/// Parse and resolve operator descriptors for `owner`.
///
/// Entries are processed concurrently; any malformed or unresolvable entry
/// fails the call with [`TznftError::OperatorFormat`] and no partial list.
pub async fn compile_operator_list<S: AsRef<str> + Sync>(
    resolver: &AliasResolver<'_>,
    descriptors: &[S],
    owner: &Address,
) -> Result<Vec<OperatorParam>> {
    try_join_all(
        descriptors
            .iter()
            .map(|d| async move { parse_operator(resolver, d.as_ref(), owner) }),
    )
    .await
}
