//! Access gate for wizard-style setup steps.

use std::sync::Arc;

/// Route navigated to when the gate denies access.
pub const PART_ONE_ROUTE: &str = "/part-1";

/// Reports whether an upstream setup step has been completed.
pub trait StepValidator: Send + Sync {
    /// Returns true once the step is complete.
    fn part_complete(&self) -> bool;
}

/// Triggers navigation to a route.
pub trait Navigator: Send + Sync {
    /// Navigates to the given route.
    fn navigate(&self, route: &str);
}

/// Gate permitting access only when both upstream setup steps are complete.
///
/// The gate owns no state of its own; both flags belong to external
/// validators. On denial, the navigator is sent to [`PART_ONE_ROUTE`] unless
/// the redirect was disabled.
pub struct SetupGate {
    first: Arc<dyn StepValidator>,
    second: Arc<dyn StepValidator>,
    navigator: Arc<dyn Navigator>,
    redirect: bool,
}

impl SetupGate {
    /// Creates a gate over the two step validators. Redirect on denial is
    /// enabled by default.
    pub fn new(
        first: Arc<dyn StepValidator>,
        second: Arc<dyn StepValidator>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            first,
            second,
            navigator,
            redirect: true,
        }
    }

    /// Enables or disables the redirect side effect on denial.
    pub fn with_redirect(mut self, redirect: bool) -> Self {
        self.redirect = redirect;
        self
    }

    /// Returns true iff both steps are complete. On denial, navigates to
    /// [`PART_ONE_ROUTE`] when redirect is enabled.
    pub fn can_activate(&self) -> bool {
        if self.first.part_complete() && self.second.part_complete() {
            return true;
        }
        if self.redirect {
            self.navigator.navigate(PART_ONE_ROUTE);
        }
        false
    }
}

impl std::fmt::Debug for SetupGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupGate")
            .field("redirect", &self.redirect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Flag(bool);

    impl StepValidator for Flag {
        fn part_complete(&self) -> bool {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: &str) {
            self.routes.lock().unwrap().push(route.to_string());
        }
    }

    fn gate(first: bool, second: bool, nav: Arc<RecordingNavigator>) -> SetupGate {
        SetupGate::new(Arc::new(Flag(first)), Arc::new(Flag(second)), nav)
    }

    #[test]
    fn test_permits_when_both_steps_complete() {
        let nav = Arc::new(RecordingNavigator::default());
        assert!(gate(true, true, nav.clone()).can_activate());
        assert!(nav.routes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_denies_unless_both_steps_complete() {
        for (first, second) in [(false, false), (true, false), (false, true)] {
            let nav = Arc::new(RecordingNavigator::default());
            assert!(!gate(first, second, nav).can_activate());
        }
    }

    #[test]
    fn test_denial_redirects_to_part_one() {
        let nav = Arc::new(RecordingNavigator::default());
        assert!(!gate(true, false, nav.clone()).can_activate());
        assert_eq!(nav.routes.lock().unwrap().as_slice(), [PART_ONE_ROUTE]);
    }

    #[test]
    fn test_denial_without_redirect_does_not_navigate() {
        let nav = Arc::new(RecordingNavigator::default());
        let denied = gate(false, false, nav.clone())
            .with_redirect(false)
            .can_activate();
        assert!(!denied);
        assert!(nav.routes.lock().unwrap().is_empty());
    }
}
