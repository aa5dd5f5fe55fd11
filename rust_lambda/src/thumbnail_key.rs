const THUMB_SUFFIX: &str = "_thumb";
const THUMB_MARKER: &str = "_thumb.";

/// Inserts `_thumb` before the last extension, or appends it when the key
/// has no `.` at all.
pub(crate) fn derive_thumbnail_key(original_key: &str) -> String {
    match original_key.rsplit_once('.') {
        Some((base, extension)) => format!("{base}{THUMB_SUFFIX}.{extension}"),
        None => format!("{original_key}{THUMB_SUFFIX}"),
    }
}

/// Keys already carrying the thumbnail marker must never be processed again,
/// otherwise every written thumbnail would re-trigger the function.
pub(crate) fn is_thumbnail_key(key: &str) -> bool {
    key.contains(THUMB_MARKER)
}
