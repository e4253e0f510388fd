use kubeskew_types::LabelSet;

/// Render an exact-match selector in the `k1=v1,k2=v2` form the API expects.
///
/// An empty set yields an empty string, which the API server treats as
/// "select everything".
pub fn label_selector(labels: &LabelSet) -> String {
    labels
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}
