//! On-demand derivations over a herd snapshot.

use crate::model::cow::Cow;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Returns true iff no cow in `cows` carries `ear_tag`.
pub fn is_tag_unique(cows: &[Rc<Cow>], ear_tag: &str) -> bool {
    !cows.iter().any(|cow| cow.ear_tag == ear_tag)
}

/// Point lookup by exact ear tag.
pub fn find_by_tag(cows: &[Rc<Cow>], ear_tag: &str) -> Option<Rc<Cow>> {
    cows.iter().find(|cow| cow.ear_tag == ear_tag).cloned()
}

/// Distinct pen names in ascending lexicographic order.
pub fn distinct_pens(cows: &[Rc<Cow>]) -> Vec<String> {
    cows.iter()
        .map(|cow| cow.pen.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{distinct_pens, find_by_tag, is_tag_unique};
    use crate::model::cow::{Cow, Sex};
    use chrono::Utc;
    use std::rc::Rc;

    fn herd() -> Vec<Rc<Cow>> {
        [("TAG-1", "Pen B"), ("TAG-2", "Pen A"), ("TAG-3", "Pen B"), ("TAG-4", "Barn")]
            .into_iter()
            .map(|(tag, pen)| Rc::new(Cow::new(tag, Sex::Female, pen, Utc::now())))
            .collect()
    }

    #[test]
    fn distinct_pens_are_sorted_and_deduplicated() {
        assert_eq!(distinct_pens(&herd()), vec!["Barn", "Pen A", "Pen B"]);
        assert!(distinct_pens(&[]).is_empty());
    }

    #[test]
    fn lookup_is_exact_and_shares_the_handle() {
        let cows = herd();
        let found = find_by_tag(&cows, "TAG-3").unwrap();
        assert!(Rc::ptr_eq(&found, &cows[2]));
        assert!(find_by_tag(&cows, "tag-3").is_none());
        assert!(!is_tag_unique(&cows, "TAG-1"));
        assert!(is_tag_unique(&cows, "TAG-9"));
    }
}
