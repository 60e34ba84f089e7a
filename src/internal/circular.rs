//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{ResolveError, ResolveResult};
use crate::key::TypeKey;

/// Keys whose factory is currently running, in the order they were entered.
///
/// Only ever touched while the registry lock is held, so it always describes
/// the single resolution chain that owns the lock.
#[derive(Default)]
pub(crate) struct InFlightSet {
    stack: Vec<TypeKey>,
}

impl InFlightSet {
    fn push(&mut self, key: TypeKey) -> ResolveResult<()> {
        // Circular detection BEFORE pushing the key
        if let Some(first) = self.stack.iter().position(|k| *k == key) {
            let mut path: Vec<&'static str> =
                self.stack[first..].iter().map(TypeKey::display_name).collect();
            path.push(key.display_name());
            return Err(ResolveError::CircularDependency(path));
        }
        self.stack.push(key);
        Ok(())
    }

    fn remove(&mut self, key: &TypeKey) {
        if let Some(pos) = self.stack.iter().rposition(|k| k == key) {
            debug_assert_eq!(pos, self.stack.len() - 1, "in-flight keys must unwind LIFO");
            self.stack.remove(pos);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Marks a key in flight for as long as the guard lives.
///
/// Dropping the guard removes the key again, which covers normal return,
/// early error return and unwinding out of a panicking factory.
pub(crate) struct InFlightGuard<'a> {
    set: &'a RefCell<InFlightSet>,
    key: TypeKey,
}

impl<'a> InFlightGuard<'a> {
    pub(crate) fn enter(set: &'a RefCell<InFlightSet>, key: TypeKey) -> ResolveResult<Self> {
        set.borrow_mut().push(key)?;
        Ok(Self { set, key })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn reentry_is_rejected_with_cycle_path() {
        let set = RefCell::new(InFlightSet::default());
        let _a = InFlightGuard::enter(&set, TypeKey::of::<A>()).unwrap();
        let _b = InFlightGuard::enter(&set, TypeKey::of::<B>()).unwrap();

        match InFlightGuard::enter(&set, TypeKey::of::<A>()) {
            Err(ResolveError::CircularDependency(path)) => {
                assert_eq!(path.len(), 3);
                assert!(path[0].ends_with("::A"));
                assert!(path[1].ends_with("::B"));
                assert!(path[2].ends_with("::A"));
            }
            _ => panic!("Expected CircularDependency"),
        };
    }

    #[test]
    fn rejected_entry_does_not_touch_the_set() {
        let set = RefCell::new(InFlightSet::default());
        let outer = InFlightGuard::enter(&set, TypeKey::of::<A>()).unwrap();
        assert!(InFlightGuard::enter(&set, TypeKey::of::<A>()).is_err());

        drop(outer);
        assert!(set.borrow().is_empty());
    }

    #[test]
    fn path_starts_at_first_occurrence() {
        let set = RefCell::new(InFlightSet::default());
        let _root = InFlightGuard::enter(&set, TypeKey::of::<u8>()).unwrap();
        let _a = InFlightGuard::enter(&set, TypeKey::of::<A>()).unwrap();

        let err = InFlightGuard::enter(&set, TypeKey::of::<A>()).err().unwrap();
        assert_eq!(err, ResolveError::CircularDependency(vec![
            std::any::type_name::<A>(),
            std::any::type_name::<A>(),
        ]));
    }

    #[test]
    fn guard_drop_unwinds_on_panic() {
        let set = RefCell::new(InFlightSet::default());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _a = InFlightGuard::enter(&set, TypeKey::of::<A>()).unwrap();
            panic!("factory blew up");
        }));

        assert!(result.is_err());
        assert!(set.borrow().is_empty());
    }
}
