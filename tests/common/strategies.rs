use proptest::prelude::*;

/// Strategy for generating artifact ids
pub fn artifact_id_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Capability assignment for one generated listener: (chunk, item write, step).
pub fn listener_shape_strategy() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

/// Distinct listener ids paired with the capabilities each implements.
pub fn declared_listeners_strategy() -> impl Strategy<Value = Vec<(String, (bool, bool, bool))>> {
    prop::collection::hash_set(artifact_id_strategy(), 0..12).prop_flat_map(|ids| {
        let ids: Vec<String> = ids.into_iter().collect();
        let len = ids.len();
        (
            Just(ids).prop_shuffle(),
            prop::collection::vec(listener_shape_strategy(), len),
        )
            .prop_map(|(ids, shapes)| ids.into_iter().zip(shapes).collect())
    })
}
