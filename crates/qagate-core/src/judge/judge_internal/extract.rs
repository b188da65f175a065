use crate::model::QualityVerdict;

const FENCE: &str = "```";

/// Recovers a verdict from free-form model output.
///
/// Surrounding code fences (with or without a language tag) and leading
/// prose are tolerated. Decoding starts at the first `{` and stops after
/// the first complete JSON value, so trailing chatter is ignored. Returns
/// `None` when no object is present, when it does not decode into a
/// [`QualityVerdict`], or when a score lies outside `1..=10`.
pub fn extract(raw: &str) -> Option<QualityVerdict> {
    let mut cleaned = raw.trim();
    if let Some(rest) = cleaned.strip_prefix(FENCE) {
        cleaned = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = cleaned.strip_suffix(FENCE) {
        cleaned = rest;
    }
    let cleaned = cleaned.trim();

    let start = cleaned.find('{')?;
    let verdict = serde_json::Deserializer::from_str(&cleaned[start..])
        .into_iter::<QualityVerdict>()
        .next()?
        .ok()?;

    verdict.is_well_formed().then_some(verdict)
}
