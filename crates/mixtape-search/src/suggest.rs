use crate::types::collection::CollectionRecord;

/// Maximum number of suggestions shown under the search bar.
pub const MAX_SUGGESTIONS: usize = 6;

/// Case-insensitive substring match on collection names.
///
/// Records without a name are skipped. Matches keep directory order and
/// are cut off at [`MAX_SUGGESTIONS`].
pub fn filter_suggestions<'a>(
    records: &'a [CollectionRecord],
    query: &str,
) -> Vec<&'a CollectionRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record
                .display_name()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}
