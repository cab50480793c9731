// Copyright (c) 2018 Fabian Schuiki

use presage::token_set::TokenSet;

/// The numeric identities of a token set, sorted for order-insensitive
/// comparison.
pub fn sorted(set: &TokenSet) -> Vec<i32> {
    let mut ids: Vec<_> = set.iter().map(|t| t.as_i32()).collect();
    ids.sort();
    ids
}
