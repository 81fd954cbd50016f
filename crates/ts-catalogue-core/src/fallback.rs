use unic_langid::LanguageIdentifier;

/// The languages to try, in order, when `requested` is selected.
///
/// The requested language comes first, then its bare primary subtag when it
/// carries a script, region or variant, then `fallback`. Duplicates are dropped.
pub fn fallback_chain(
    requested: &LanguageIdentifier,
    fallback: Option<&LanguageIdentifier>,
) -> Vec<LanguageIdentifier> {
    let mut chain = vec![requested.clone()];

    let has_subtags = requested.script.is_some()
        || requested.region.is_some()
        || requested.variants().next().is_some();

    if has_subtags
        && let Ok(primary) = requested.language.as_str().parse::<LanguageIdentifier>()
        && !chain.contains(&primary)
    {
        chain.push(primary);
    }

    if let Some(fallback) = fallback
        && !chain.contains(fallback)
    {
        chain.push(fallback.clone());
    }

    chain
}

/// Picks the first entry of the chain that is in `available`.
pub fn resolve_fallback_language(
    requested: &LanguageIdentifier,
    fallback: Option<&LanguageIdentifier>,
    available: &[LanguageIdentifier],
) -> Option<LanguageIdentifier> {
    fallback_chain(requested, fallback)
        .into_iter()
        .find(|candidate| available.contains(candidate))
}
