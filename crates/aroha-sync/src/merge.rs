use std::collections::BTreeMap;

use aroha_core::models::assessment::AssessmentRecord;

/// Union local and remote records keyed on `created_at`, newest first.
///
/// Remote records are folded in after local ones, so on a key collision the
/// remote copy is what the merged view shows. Neither input store is touched.
pub fn merge_records(
    local: Vec<AssessmentRecord>,
    remote: Vec<AssessmentRecord>,
) -> Vec<AssessmentRecord> {
    let mut by_key = BTreeMap::new();
    for record in local.into_iter().chain(remote) {
        by_key.insert(record.natural_key(), record);
    }
    by_key.into_values().rev().collect()
}
