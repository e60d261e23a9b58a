/// Serde helper for `#[serde(skip_serializing_if = "crate::serde_defaults::is_false")]`.
///
/// Boolean flags in the execution model are omitted from JSON when unset so that payloads match
/// what backends expect (`computeRatio`, `showAllValues`, ...).
pub(crate) fn is_false(v: &bool) -> bool {
    !*v
}
