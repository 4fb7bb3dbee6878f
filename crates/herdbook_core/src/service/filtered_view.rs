//! Derived filtered view over the herd and the filter registers.
//!
//! # Responsibility
//! - Combine the latest herd and the three registers into one always-current
//!   filtered sequence.
//!
//! # Invariants
//! - Output is a stable subset of the current herd, sharing `Rc<Cow>`
//!   handles with it.
//! - Recomputation is full (not incremental), synchronous and infallible.
//! - Construction emits exactly one initial value.

use crate::model::cow::Cow;
use crate::reactive::observable::{Observable, Subscription};
use crate::service::filter::{CowFilter, FilterCriteria};
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Filtered herd sequence.
pub type CowList = Vec<Rc<Cow>>;

/// Latest value seen from each of the four sources.
struct Latest {
    cows: Rc<CowList>,
    search_text: Rc<String>,
    status_filter: Rc<String>,
    pen_filter: Rc<String>,
}

impl Latest {
    fn compute(&self) -> CowList {
        CowFilter::new(&self.search_text, &self.status_filter, &self.pen_filter).apply(&self.cows)
    }
}

/// Always-current filtered projection of a herd.
///
/// Dropping the view detaches it from all four sources.
pub struct FilteredView {
    output: Observable<CowList>,
    _sources: [Subscription; 4],
}

impl FilteredView {
    /// Builds the view and computes its initial value.
    pub fn new(cows: &Observable<CowList>, criteria: &FilterCriteria) -> Self {
        let latest = Rc::new(RefCell::new(Latest {
            cows: cows.current(),
            search_text: criteria.search_text(),
            status_filter: criteria.status_filter(),
            pen_filter: criteria.pen_filter(),
        }));
        let output = Observable::new(latest.borrow().compute());
        // Subscribing replays each source once; those replays are already
        // reflected in the initial value above.
        let ready = Rc::new(Cell::new(false));

        let sources = [
            track(cows, &latest, &output, &ready, |latest, value| {
                latest.cows = Rc::clone(value)
            }),
            track(
                criteria.search_register(),
                &latest,
                &output,
                &ready,
                |latest, value| latest.search_text = Rc::clone(value),
            ),
            track(
                criteria.status_register(),
                &latest,
                &output,
                &ready,
                |latest, value| latest.status_filter = Rc::clone(value),
            ),
            track(
                criteria.pen_register(),
                &latest,
                &output,
                &ready,
                |latest, value| latest.pen_filter = Rc::clone(value),
            ),
        ];
        ready.set(true);

        Self {
            output,
            _sources: sources,
        }
    }

    /// Returns the current filtered sequence.
    pub fn current(&self) -> Rc<CowList> {
        self.output.current()
    }

    /// Observes the filtered sequence with `Observable::subscribe` semantics.
    pub fn subscribe(&self, observer: impl Fn(&Rc<CowList>) + 'static) -> Subscription {
        self.output.subscribe(observer)
    }
}

fn track<T: 'static>(
    source: &Observable<T>,
    latest: &Rc<RefCell<Latest>>,
    output: &Observable<CowList>,
    ready: &Rc<Cell<bool>>,
    assign: fn(&mut Latest, &Rc<T>),
) -> Subscription {
    let latest = Rc::clone(latest);
    let output = output.clone();
    let ready = Rc::clone(ready);
    source.subscribe(move |value| {
        assign(&mut latest.borrow_mut(), value);
        if !ready.get() {
            return;
        }
        let filtered = latest.borrow().compute();
        debug!(
            "event=filter_recompute module=service visible={}",
            filtered.len()
        );
        output.set(filtered);
    })
}

#[cfg(test)]
mod tests {
    use super::{CowList, FilteredView};
    use crate::model::cow::{Cow, Sex};
    use crate::reactive::observable::Observable;
    use crate::service::filter::FilterCriteria;
    use chrono::Utc;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn herd(tags: &[(&str, &str)]) -> CowList {
        tags.iter()
            .map(|(tag, pen)| Rc::new(Cow::new(*tag, Sex::Male, *pen, Utc::now())))
            .collect()
    }

    #[test]
    fn construction_emits_once() {
        let cows = Observable::new(herd(&[("TAG-1", "Pen A")]));
        let criteria = FilterCriteria::new();
        let view = FilteredView::new(&cows, &criteria);

        let emissions = Rc::new(Cell::new(0));
        let counter = Rc::clone(&emissions);
        let _sub = view.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(emissions.get(), 1);
        assert_eq!(view.current().len(), 1);
    }

    #[test]
    fn each_source_change_recomputes() {
        let cows = Observable::new(herd(&[("TAG-1", "Pen A"), ("TAG-2", "Pen B")]));
        let criteria = FilterCriteria::new();
        let view = FilteredView::new(&cows, &criteria);

        criteria.set_pen_filter("Pen B");
        assert_eq!(view.current().len(), 1);
        assert_eq!(view.current()[0].ear_tag, "TAG-2");

        cows.set(herd(&[("TAG-1", "Pen A"), ("TAG-2", "Pen B"), ("TAG-3", "Pen B")]));
        assert_eq!(view.current().len(), 2);

        criteria.set_search_text("tag-3");
        assert_eq!(view.current().len(), 1);
        assert_eq!(view.current()[0].ear_tag, "TAG-3");

        criteria.set_status_filter("Deceased");
        assert!(view.current().is_empty());
    }

    #[test]
    fn dropped_view_stops_listening() {
        let cows = Observable::new(herd(&[("TAG-1", "Pen A")]));
        let criteria = FilterCriteria::new();
        let view = FilteredView::new(&cows, &criteria);
        assert_eq!(cows.observer_count(), 1);

        drop(view);
        assert_eq!(cows.observer_count(), 0);
    }

    #[test]
    fn observer_setting_a_register_sees_only_newer_output() {
        let cows = Observable::new(herd(&[("TAG-1", "Pen A"), ("TAG-2", "Pen B")]));
        let criteria = FilterCriteria::new();
        let view = FilteredView::new(&cows, &criteria);

        let writer = criteria.clone();
        let _narrow = view.subscribe(move |visible| {
            if visible.len() == 1 && writer.search_text().is_empty() {
                writer.set_search_text("TAG-9");
            }
        });
        let lengths = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&lengths);
        let _record = view.subscribe(move |visible| sink.borrow_mut().push(visible.len()));

        criteria.set_pen_filter("Pen B");
        assert!(view.current().is_empty());
        assert_eq!(*lengths.borrow(), vec![2, 0]);
    }
}
