//! Filter criteria registers and the herd filter predicate.
//!
//! # Responsibility
//! - Hold the three independent filter registers (search, status, pen).
//! - Define the pure per-cow predicate used by the filtered view.
//!
//! # Invariants
//! - An empty register never excludes a cow.
//! - Registers are independent: setting one never notifies another's
//!   observers.
//! - Filtering is stable and returns shared handles, never copies.

use crate::model::cow::Cow;
use crate::reactive::observable::{Observable, Subscription};
use std::rc::Rc;

/// Three independently settable filter registers.
///
/// Cloning yields handles to the same registers.
#[derive(Clone, Default)]
pub struct FilterCriteria {
    search_text: Observable<String>,
    status_filter: Observable<String>,
    pen_filter: Observable<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ear-tag search text (case-insensitive substring).
    pub fn set_search_text(&self, value: impl Into<String>) {
        self.search_text.set(value.into());
    }

    /// Sets the exact status label filter; empty disables it.
    pub fn set_status_filter(&self, value: impl Into<String>) {
        self.status_filter.set(value.into());
    }

    /// Sets the exact pen filter; empty disables it.
    pub fn set_pen_filter(&self, value: impl Into<String>) {
        self.pen_filter.set(value.into());
    }

    /// Resets all three registers to empty.
    pub fn clear(&self) {
        self.search_text.set(String::new());
        self.status_filter.set(String::new());
        self.pen_filter.set(String::new());
    }

    pub fn subscribe_search_text(&self, observer: impl Fn(&Rc<String>) + 'static) -> Subscription {
        self.search_text.subscribe(observer)
    }

    pub fn subscribe_status_filter(
        &self,
        observer: impl Fn(&Rc<String>) + 'static,
    ) -> Subscription {
        self.status_filter.subscribe(observer)
    }

    pub fn subscribe_pen_filter(&self, observer: impl Fn(&Rc<String>) + 'static) -> Subscription {
        self.pen_filter.subscribe(observer)
    }

    pub fn search_text(&self) -> Rc<String> {
        self.search_text.current()
    }

    pub fn status_filter(&self) -> Rc<String> {
        self.status_filter.current()
    }

    pub fn pen_filter(&self) -> Rc<String> {
        self.pen_filter.current()
    }

    /// Captures the current value of every register.
    pub fn snapshot(&self) -> CowFilter {
        CowFilter::new(
            self.search_text().as_str(),
            self.status_filter().as_str(),
            self.pen_filter().as_str(),
        )
    }

    pub(crate) fn search_register(&self) -> &Observable<String> {
        &self.search_text
    }

    pub(crate) fn status_register(&self) -> &Observable<String> {
        &self.status_filter
    }

    pub(crate) fn pen_register(&self) -> &Observable<String> {
        &self.pen_filter
    }
}

/// Value snapshot of the three registers plus the predicate over them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CowFilter {
    /// Lowercased once; compared against lowercased ear tags.
    search_lower: String,
    status: String,
    pen: String,
}

impl CowFilter {
    pub fn new(search_text: &str, status: &str, pen: &str) -> Self {
        Self {
            search_lower: search_text.to_lowercase(),
            status: status.to_string(),
            pen: pen.to_string(),
        }
    }

    /// Returns whether no register restricts the result.
    pub fn is_identity(&self) -> bool {
        self.search_lower.is_empty() && self.status.is_empty() && self.pen.is_empty()
    }

    pub fn matches_search(&self, cow: &Cow) -> bool {
        self.search_lower.is_empty() || cow.ear_tag.to_lowercase().contains(&self.search_lower)
    }

    pub fn matches_status(&self, cow: &Cow) -> bool {
        self.status.is_empty() || cow.status.as_str() == self.status
    }

    pub fn matches_pen(&self, cow: &Cow) -> bool {
        self.pen.is_empty() || cow.pen == self.pen
    }

    pub fn matches(&self, cow: &Cow) -> bool {
        self.matches_search(cow) && self.matches_status(cow) && self.matches_pen(cow)
    }

    /// Stable filter over shared cow handles.
    pub fn apply(&self, cows: &[Rc<Cow>]) -> Vec<Rc<Cow>> {
        if self.is_identity() {
            return cows.to_vec();
        }
        cows.iter()
            .filter(|cow| self.matches(cow))
            .cloned()
            .collect()
    }
}
