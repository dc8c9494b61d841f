/// Final path component; the whole reference when it has no separator
#[must_use]
pub fn basename(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// `base` is used verbatim, it has to end with the separator the asset host expects
#[must_use]
pub fn resolve_image_url(base: &str, reference: &str) -> String {
    format!("{base}{}", basename(reference))
}

#[must_use]
pub fn resolve_image_urls<'a>(
    base: &str,
    references: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    references
        .into_iter()
        .map(|reference| resolve_image_url(base, reference))
        .collect()
}
