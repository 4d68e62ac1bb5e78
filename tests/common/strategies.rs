use proptest::prelude::*;

/// Path-like document keys drawn from a small alphabet so sets overlap often
pub fn document_key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}/[a-e]{1,3}\\.txt"
}

/// A raw listing that may contain duplicates and null keys
pub fn raw_listing_strategy() -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(prop::option::weighted(0.9, document_key_strategy()), 0..60)
}

pub fn batch_size_strategy() -> impl Strategy<Value = usize> {
    1usize..=25
}
