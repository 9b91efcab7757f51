//! One-shot attachment hook.
//!
//! The render layer calls the hook on every reconcile of a draggable element.
//! Only the first successful call binds the element; later calls do nothing.

/// State of an [`AttachmentHook`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookState {
    #[default]
    Uninitialized,
    Initialized,
}

/// Two-state guard with a single irreversible transition.
#[derive(Debug, Clone, Default)]
pub struct AttachmentHook {
    state: HookState,
}

impl AttachmentHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HookState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == HookState::Initialized
    }

    /// Run `bind` unless the hook already fired.
    ///
    /// Returns `Ok(true)` when `bind` ran and succeeded. A failed `bind`
    /// leaves the hook uninitialized so the next reconcile retries.
    pub fn run<E>(&mut self, bind: impl FnOnce() -> Result<(), E>) -> Result<bool, E> {
        if self.is_initialized() {
            return Ok(false);
        }
        bind()?;
        self.state = HookState::Initialized;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_once() {
        let mut hook = AttachmentHook::new();
        let mut calls = 0;

        let mut bind = || -> Result<(), ()> {
            calls += 1;
            Ok(())
        };

        assert_eq!(hook.run(&mut bind), Ok(true));
        assert_eq!(hook.run(&mut bind), Ok(false));
        assert_eq!(hook.run(&mut bind), Ok(false));

        assert_eq!(calls, 1);
        assert_eq!(hook.state(), HookState::Initialized);
    }

    #[test]
    fn test_failed_bind_stays_uninitialized() {
        let mut hook = AttachmentHook::new();

        assert_eq!(hook.run(|| Err("not laid out")), Err("not laid out"));
        assert_eq!(hook.state(), HookState::Uninitialized);

        assert_eq!(hook.run::<&str>(|| Ok(())), Ok(true));
        assert!(hook.is_initialized());
    }
}
