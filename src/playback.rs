// playback.rs - How many videos may decode at once
//
// Each gallery lets only the videos nearest the screen centre play. The
// cap depends on the device class, and a `PlaybackBudget` shared between
// galleries can additionally bound the total for the whole page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::track::is_mobile;

/// Per-gallery caps by device class
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackPolicy {
    pub mobile_cap: usize,
    pub desktop_cap: usize,
}

impl Default for PlaybackPolicy {
    fn default() -> Self {
        Self { mobile_cap: 3, desktop_cap: 6 }
    }
}

impl PlaybackPolicy {
    pub fn cap_for(&self, window_width: f32) -> usize {
        if is_mobile(window_width) { self.mobile_cap } else { self.desktop_cap }
    }
}

/// Mark the `cap` smallest distances. Ties keep list order.
pub fn select_nearest(distances: &[f32], cap: usize) -> Vec<bool> {
    let mut order: Vec<usize> = (0..distances.len()).collect();
    order.sort_by(|&a, &b| distances[a].total_cmp(&distances[b]));

    let mut selected = vec![false; distances.len()];
    for &i in order.iter().take(cap) {
        selected[i] = true;
    }
    selected
}

#[derive(Debug, Default)]
struct Ledger {
    page_cap: Option<usize>,
    next_id: u64,
    active: HashMap<u64, usize>,
}

/// Decode slots shared by every gallery holding a clone of it.
#[derive(Clone, Debug, Default)]
pub struct PlaybackBudget {
    ledger: Rc<RefCell<Ledger>>,
}

impl PlaybackBudget {
    /// No page-wide limit; each gallery is bound by its own policy only.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_page_cap(cap: usize) -> Self {
        let ledger = Ledger { page_cap: Some(cap), ..Default::default() };
        Self { ledger: Rc::new(RefCell::new(ledger)) }
    }

    pub fn page_cap(&self) -> Option<usize> {
        self.ledger.borrow().page_cap
    }

    /// Videos currently granted across all galleries
    pub fn in_use(&self) -> usize {
        self.ledger.borrow().active.values().sum()
    }

    pub fn register(&self) -> BudgetLease {
        let mut ledger = self.ledger.borrow_mut();
        let id = ledger.next_id;
        ledger.next_id += 1;
        ledger.active.insert(id, 0);
        BudgetLease { id, ledger: self.ledger.clone() }
    }
}

/// One gallery's share of a `PlaybackBudget`. Dropping it frees the share.
#[derive(Debug)]
pub struct BudgetLease {
    id: u64,
    ledger: Rc<RefCell<Ledger>>,
}

impl BudgetLease {
    /// Ask for `wanted` slots; returns how many this gallery may use now.
    pub fn grant(&self, wanted: usize) -> usize {
        let mut ledger = self.ledger.borrow_mut();
        let others: usize = ledger.active.iter().filter(|(id, _)| **id != self.id).map(|(_, n)| n).sum();
        let allowed = match ledger.page_cap {
            Some(cap) => wanted.min(cap.saturating_sub(others)),
            None => wanted,
        };
        ledger.active.insert(self.id, allowed);
        allowed
    }

    pub fn release(&self) {
        self.ledger.borrow_mut().active.insert(self.id, 0);
    }
}

impl Drop for BudgetLease {
    fn drop(&mut self) {
        self.ledger.borrow_mut().active.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_follows_device_class() {
        let p = PlaybackPolicy::default();
        assert_eq!(p.cap_for(390.0), 3);
        assert_eq!(p.cap_for(1440.0), 6);
        let p = PlaybackPolicy { mobile_cap: 2, desktop_cap: 4 };
        assert_eq!(p.cap_for(700.0), 2);
    }

    #[test]
    fn selects_the_nearest() {
        let sel = select_nearest(&[5.0, 0.5, 3.0, 0.1, 9.0], 2);
        assert_eq!(sel, vec![false, true, false, true, false]);
    }

    #[test]
    fn never_more_than_cap() {
        for n in 0..20 {
            let distances: Vec<f32> = (0..n).map(|i| ((i * 7919) % 13) as f32 - 6.0).map(f32::abs).collect();
            for cap in 0..8 {
                let chosen = select_nearest(&distances, cap).iter().filter(|s| **s).count();
                assert_eq!(chosen, cap.min(n), "n={n} cap={cap}");
            }
        }
    }

    #[test]
    fn ties_keep_list_order() {
        assert_eq!(select_nearest(&[0.0, 0.0, 0.0], 2), vec![true, true, false]);
    }

    #[test]
    fn page_cap_is_shared() {
        let budget = PlaybackBudget::with_page_cap(8);
        let a = budget.register();
        let b = budget.register();
        assert_eq!(a.grant(6), 6);
        assert_eq!(b.grant(6), 2);
        assert_eq!(budget.in_use(), 8);

        // a shrinks, b can grow next time it asks
        assert_eq!(a.grant(3), 3);
        assert_eq!(b.grant(6), 5);
        assert!(budget.in_use() <= 8);

        drop(a);
        assert_eq!(b.grant(6), 6);
        b.release();
        assert_eq!(budget.in_use(), 0);
    }

    #[test]
    fn unbounded_grants_everything() {
        let budget = PlaybackBudget::unbounded();
        let a = budget.register();
        let b = budget.register();
        assert_eq!(a.grant(6), 6);
        assert_eq!(b.grant(6), 6);
        assert_eq!(budget.page_cap(), None);
    }
}
