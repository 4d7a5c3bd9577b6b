use riddler_types::MatchPolicy;

use crate::catalog::CatalogStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
}

/// A catalog entry selected for some detected text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiddleMatch<'a> {
    pub riddle: &'a str,
    pub answer: &'a str,
    pub kind: MatchKind,
}

/// Look up already-normalized text in the catalog.
///
/// An exact key hit always wins. Otherwise, under
/// [`MatchPolicy::ExactThenSubstring`], entries are scanned in catalog order
/// and the first riddle that contains the text, or is contained by it, is
/// returned. There is no ranking, so short riddles can match unrelated text;
/// use [`MatchPolicy::ExactOnly`] when that matters.
pub fn find_match<'a>(
    text: &str,
    store: &'a CatalogStore,
    policy: MatchPolicy,
) -> Option<RiddleMatch<'a>> {
    if text.is_empty() {
        return None;
    }

    if let Some(entry) = store.get(text) {
        return Some(RiddleMatch {
            riddle: &entry.riddle,
            answer: &entry.answer,
            kind: MatchKind::Exact,
        });
    }

    if policy == MatchPolicy::ExactOnly {
        return None;
    }

    store
        .iter()
        .find(|entry| text.contains(entry.riddle.as_str()) || entry.riddle.contains(text))
        .map(|entry| RiddleMatch {
            riddle: &entry.riddle,
            answer: &entry.answer,
            kind: MatchKind::Substring,
        })
}
