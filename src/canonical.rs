use std::collections::BTreeMap;
use crate::records::{ColumnRecord, ModelRecord, TestEntry};

/// Sort key for a test entry: the bare name, or the sole key of a
/// parameterized entry. Bare and parameterized kinds interleave in one
/// alphabetical sequence.
pub fn sort_key(entry: &TestEntry) -> &str {
    entry.kind()
}

/// Stable sort, so identical kinds keep insertion order.
pub fn sort_tests(tests: &mut [TestEntry]) {
    tests.sort_by(|a, b| sort_key(a).cmp(sort_key(b)));
}

/// Flatten a builder's column map into the output column list.
///
/// `BTreeMap` iterates in ascending key order, which is the same byte-wise
/// ordering `str` uses, so the columns come out sorted by name.
pub fn sorted_column_list(columns: BTreeMap<String, ColumnRecord>) -> Vec<ColumnRecord> {
    columns
        .into_values()
        .map(|mut column| {
            sort_tests(&mut column.tests);
            column
        })
        .collect()
}

/// Check a model is in canonical order: columns strictly ascending by
/// name, and tests ascending by sort key within every column.
pub fn is_canonical(model: &ModelRecord) -> bool {
    let columns_ordered = model
        .columns
        .windows(2)
        .all(|pair| pair[0].name < pair[1].name);

    columns_ordered
        && model.columns.iter().all(|column| {
            column
                .tests
                .windows(2)
                .all(|pair| sort_key(&pair[0]) <= sort_key(&pair[1]))
        })
}
