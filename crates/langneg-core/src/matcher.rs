//! Accept-Language matching
//!
//! [`LanguageMatcher`] is the seam between the middleware and the weighted
//! matching algorithm. [`AcceptLanguageMatcher`] is the stock implementation:
//! quality-value matching over `language[-script][-region]` tags, with the
//! server priority order breaking ties.

use std::cmp::Ordering;

use crate::error::{MatchError, MatchResult};

/// A winning priority language.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    tag: String,
    quality: f32,
}

impl BestMatch {
    pub fn new(tag: impl Into<String>, quality: f32) -> Self {
        Self {
            tag: tag.into(),
            quality,
        }
    }

    /// The negotiated language tag, e.g. `"fu"`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Combined client and server quality of the match.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn into_tag(self) -> String {
        self.tag
    }
}

/// Picks the best priority language for a raw header value.
///
/// `Ok(None)` means the header and the priorities have nothing in common.
/// That is an expected outcome, not an error.
#[cfg_attr(test, mockall::automock)]
pub trait LanguageMatcher: Send + Sync {
    fn best(&self, header: &str, priorities: &[String]) -> MatchResult<Option<BestMatch>>;
}

/// Quality-value matcher for `Accept-Language` headers.
///
/// Lenient by default: header entries that cannot be parsed are skipped.
/// A strict matcher fails the whole header instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptLanguageMatcher {
    strict: bool,
}

impl AcceptLanguageMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher that rejects headers containing malformed entries.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn parse_header(&self, header: &str) -> MatchResult<Vec<LanguageRange>> {
        let mut ranges = Vec::new();
        for part in split_header(header) {
            match LanguageRange::parse(part) {
                Ok(range) => ranges.push(range),
                Err(e) if self.strict => return Err(e),
                Err(e) => {
                    tracing::trace!(part, error = %e, "Skipping malformed Accept-Language entry");
                }
            }
        }
        Ok(ranges)
    }
}

impl LanguageMatcher for AcceptLanguageMatcher {
    fn best(&self, header: &str, priorities: &[String]) -> MatchResult<Option<BestMatch>> {
        if priorities.is_empty() {
            return Err(MatchError::NoPriorities);
        }
        if header.trim().is_empty() {
            return Err(MatchError::EmptyHeader);
        }

        let accepted = self.parse_header(header)?;
        let offered = priorities
            .iter()
            .map(|p| LanguageRange::parse(p))
            .collect::<MatchResult<Vec<_>>>()?;

        // Most specific client range per priority
        let mut per_priority: Vec<Option<Candidate>> = vec![None; offered.len()];
        for range in &accepted {
            for (index, priority) in offered.iter().enumerate() {
                let Some(candidate) = range.matches(priority, index) else {
                    continue;
                };
                let slot = &mut per_priority[index];
                if slot.map_or(true, |current| current.score < candidate.score) {
                    *slot = Some(candidate);
                }
            }
        }

        let best = per_priority
            .into_iter()
            .flatten()
            .filter(|c| c.quality > 0.0)
            .min_by(Candidate::compare);

        Ok(best.map(|c| BestMatch::new(priorities[c.index].clone(), c.quality)))
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    quality: f32,
    score: u8,
    index: usize,
}

impl Candidate {
    /// Orders better candidates first: higher quality, then earlier priority.
    fn compare(a: &Self, b: &Self) -> Ordering {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    }
}

/// One parsed `tag;q=value` entry.
#[derive(Debug, Clone, PartialEq)]
struct LanguageRange {
    language: String,
    script: Option<String>,
    region: Option<String>,
    quality: f32,
}

impl LanguageRange {
    fn parse(input: &str) -> MatchResult<Self> {
        let mut parts = input.split(';');
        let tag = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        if tag.is_empty() {
            return Err(MatchError::InvalidTag(input.to_string()));
        }

        let mut quality = 1.0;
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if !key.trim().eq_ignore_ascii_case("q") {
                continue;
            }
            let value = value.trim_matches(|c| c == ' ' || c == '"');
            quality = value
                .parse::<f32>()
                .ok()
                .filter(|q| (0.0..=1.0).contains(q))
                .ok_or_else(|| MatchError::InvalidQuality(value.to_string()))?;
        }

        let subtags: Vec<&str> = tag.split('-').collect();
        let (language, script, region) = match subtags.as_slice() {
            [language] => (*language, None, None),
            [language, region] => (*language, None, Some(*region)),
            [language, script, region] => (*language, Some(*script), Some(*region)),
            _ => return Err(MatchError::InvalidTag(tag.clone())),
        };
        if language.is_empty() || region.is_some_and(str::is_empty) {
            return Err(MatchError::InvalidTag(tag.clone()));
        }

        Ok(Self {
            language: language.to_string(),
            script: script.map(str::to_string),
            region: region.map(str::to_string),
            quality,
        })
    }

    /// Match this client range against a server priority.
    fn matches(&self, priority: &Self, index: usize) -> Option<Candidate> {
        let base_equal = self.language.eq_ignore_ascii_case(&priority.language);
        let region_equal = match (&self.region, &priority.region) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };

        let base_ok = self.language == "*" || base_equal;
        let region_ok = self.region.is_none() || priority.region.is_none() || region_equal;
        if !(base_ok && region_ok) {
            return None;
        }

        Some(Candidate {
            quality: self.quality * priority.quality,
            score: 10 * u8::from(base_equal) + u8::from(region_equal),
            index,
        })
    }
}

/// Split on commas that are not inside double quotes; drop empty entries.
fn split_header(header: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in header.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                parts.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&header[start..]);
    parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priorities(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    fn best(header: &str, tags: &[&str]) -> Option<String> {
        AcceptLanguageMatcher::new()
            .best(header, &priorities(tags))
            .unwrap()
            .map(BestMatch::into_tag)
    }

    #[test]
    fn test_highest_quality_wins() {
        let result = best("en; q=0.1, fr; q=0.4, fu; q=0.9, de; q=0.2", &["de", "fu", "en"]);
        assert_eq!(result.as_deref(), Some("fu"));
    }

    #[test]
    fn test_no_overlap_is_none() {
        assert_eq!(best("xx; q=1.0", &["de", "fu", "en"]), None);
    }

    #[test]
    fn test_equal_quality_prefers_priority_order() {
        assert_eq!(best("en, de", &["de", "en"]).as_deref(), Some("de"));
        assert_eq!(best("en, de", &["en", "de"]).as_deref(), Some("en"));
    }

    #[test]
    fn test_region_matching() {
        assert_eq!(best("en-US", &["de", "en"]).as_deref(), Some("en"));
        assert_eq!(best("en", &["de", "en-GB"]).as_deref(), Some("en-GB"));
        assert_eq!(best("en-US", &["en-GB"]), None);
        assert_eq!(best("EN-us;q=0.5", &["de", "en-US"]).as_deref(), Some("en-US"));
    }

    #[test]
    fn test_more_specific_range_wins_for_same_priority() {
        // "en-GB" matches "en-GB" with a higher score than the bare "en" range
        let matcher = AcceptLanguageMatcher::new();
        let result = matcher
            .best("en;q=0.9, en-GB;q=0.3", &priorities(&["en-GB"]))
            .unwrap()
            .unwrap();
        assert_eq!(result.tag(), "en-GB");
        assert!((result.quality() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(best("*", &["de", "en"]).as_deref(), Some("de"));
        assert_eq!(best("fr, *;q=0.1", &["de", "fr"]).as_deref(), Some("fr"));
    }

    #[test]
    fn test_zero_quality_is_not_acceptable() {
        assert_eq!(best("de;q=0", &["de"]), None);
        assert_eq!(best("de;q=0, en;q=0.1", &["de", "en"]).as_deref(), Some("en"));
    }

    #[test]
    fn test_three_part_tags() {
        assert_eq!(best("zh-Hant-TW", &["en", "zh-TW"]).as_deref(), Some("zh-TW"));
    }

    #[test]
    fn test_quoted_commas_do_not_split() {
        let parts = split_header(r#"de;x="a,b", en"#);
        assert_eq!(parts, vec![r#"de;x="a,b""#, "en"]);
    }

    #[test]
    fn test_lenient_skips_malformed_entries() {
        assert_eq!(best("a-b-c-d, en;q=0.5", &["en"]).as_deref(), Some("en"));
        assert_eq!(best("de;q=abc, en;q=0.5", &["de", "en"]).as_deref(), Some("en"));
        assert_eq!(best("de;q=2", &["de"]), None);
    }

    #[test]
    fn test_strict_rejects_malformed_entries() {
        let matcher = AcceptLanguageMatcher::strict();
        assert!(matcher.is_strict());
        assert_eq!(
            matcher.best("a-b-c-d, en", &priorities(&["en"])),
            Err(MatchError::InvalidTag("a-b-c-d".to_string()))
        );
        assert_eq!(
            matcher.best("en;q=high", &priorities(&["en"])),
            Err(MatchError::InvalidQuality("high".to_string()))
        );
    }

    #[test]
    fn test_invalid_input() {
        let matcher = AcceptLanguageMatcher::new();
        assert_eq!(matcher.best("", &priorities(&["en"])), Err(MatchError::EmptyHeader));
        assert_eq!(matcher.best("en", &[]), Err(MatchError::NoPriorities));
        assert!(matches!(
            matcher.best("en", &priorities(&["en-x-y-z"])),
            Err(MatchError::InvalidTag(_))
        ));
    }

    #[test]
    fn test_parse_range() {
        let range = LanguageRange::parse(" zh-Hant-TW ; q=0.7 ").unwrap();
        assert_eq!(range.language, "zh");
        assert_eq!(range.script.as_deref(), Some("hant"));
        assert_eq!(range.region.as_deref(), Some("tw"));
        assert!((range.quality - 0.7).abs() < f32::EPSILON);

        let range = LanguageRange::parse("fr;level=1;Q=\"0.4\"").unwrap();
        assert!((range.quality - 0.4).abs() < f32::EPSILON);
    }
}
