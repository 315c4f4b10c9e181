//! Comparators deciding whether a selected value changed.
//!
//! A consumer re-renders when its comparator returns `false` for the old
//! and new value.

use std::sync::Arc;

/// Value equality. The default for [`use_selector`](super::use_selector).
pub fn structural<T: PartialEq>(old: &T, new: &T) -> bool {
    old == new
}

/// Identity of shared values.
///
/// Selectors that build a fresh `Arc` on every call change on every
/// dispatch under this comparator.
pub fn pointer<T: ?Sized>(old: &Arc<T>, new: &Arc<T>) -> bool {
    Arc::ptr_eq(old, new)
}

/// Never equal: re-render on every notification.
pub fn never<T>(_old: &T, _new: &T) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparators() {
        assert!(structural(&vec![1, 2], &vec![1, 2]));
        assert!(!structural(&1, &2));

        let a = Arc::new(5);
        assert!(pointer(&a, &a.clone()));
        assert!(!pointer(&a, &Arc::new(5)));

        assert!(!never(&1, &1));
    }
}
