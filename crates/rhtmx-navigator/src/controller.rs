//! Navigation state owner
//!
//! # Lifecycle
//!
//! ```text
//! create()     Uninitialized  subscribed; feed updates go to the pending slot
//! activate()   Mounted        pending location applied; updates apply directly
//! teardown()   TornDown       unsubscribed; updates ignored
//! ```
//!
//! Subscription starts in `create` because descendants are set up before the
//! controller is activated and may navigate while that happens. Only the
//! latest such navigation is kept.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::NavigatorConfig;
use crate::context::ResolutionContext;
use crate::diagnostics::{Diagnostics, Warning};
use crate::feed::{NavigationHandle, Unsubscribe};
use crate::location::Location;
use crate::matcher::{MatchResult, PathMatcher};

/// Controller lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Mounted,
    TornDown,
}

/// State owned by one controller
#[derive(Debug)]
pub struct NavigationState {
    location: Location,
    lifecycle: Lifecycle,
    pending: Option<Location>,
}

impl NavigationState {
    fn new(location: Location) -> Self {
        Self {
            location,
            lifecycle: Lifecycle::Uninitialized,
            pending: None,
        }
    }

    fn receive(&mut self, location: Location) {
        match self.lifecycle {
            Lifecycle::Mounted => {
                tracing::trace!(pathname = %location.pathname, "location applied");
                self.location = location;
            }
            Lifecycle::Uninitialized => {
                tracing::trace!(pathname = %location.pathname, "location buffered until activation");
                self.pending = Some(location);
            }
            Lifecycle::TornDown => {}
        }
    }

    fn activate(&mut self) {
        if self.lifecycle != Lifecycle::Uninitialized {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        if let Some(pending) = self.pending.take() {
            self.location = pending;
        }
    }

    fn teardown(&mut self) {
        self.lifecycle = Lifecycle::TornDown;
        self.pending = None;
    }
}

/// Root of a route tree
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{LocationChannel, NavigationController};
/// use std::rc::Rc;
///
/// let channel = Rc::new(LocationChannel::new("/"));
/// let controller = NavigationController::create(channel.clone());
///
/// channel.emit("/early");
/// assert_eq!(controller.location().pathname, "/");
///
/// controller.activate();
/// assert_eq!(controller.location().pathname, "/early");
///
/// channel.emit("/later");
/// assert_eq!(controller.context().location().pathname, "/later");
/// ```
pub struct NavigationController {
    state: Rc<RefCell<NavigationState>>,
    navigation: NavigationHandle,
    subscription: RefCell<Unsubscribe>,
    matcher: PathMatcher,
    diagnostics: Diagnostics,
}

impl NavigationController {
    /// Creates a controller using the process-wide pattern cache
    pub fn create(navigation: NavigationHandle) -> Self {
        Self::with_parts(navigation, PathMatcher::new(), Diagnostics::default())
    }

    /// Creates a controller with a dedicated cache and diagnostics from `config`
    pub fn with_config(navigation: NavigationHandle, config: &NavigatorConfig) -> Self {
        Self::with_parts(
            navigation,
            PathMatcher::from_config(config),
            Diagnostics::from_config(config),
        )
    }

    pub fn with_parts(
        navigation: NavigationHandle,
        matcher: PathMatcher,
        diagnostics: Diagnostics,
    ) -> Self {
        let state = Rc::new(RefCell::new(NavigationState::new(navigation.location())));

        let weak = Rc::downgrade(&state);
        let subscription = navigation.subscribe(Rc::new(move |location: &Location| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().receive(location.clone());
            }
        }));

        Self {
            state,
            navigation,
            subscription: RefCell::new(subscription),
            matcher,
            diagnostics,
        }
    }

    /// Completes initialization, applying any buffered location
    pub fn activate(&self) {
        self.state.borrow_mut().activate();
    }

    /// Stops listening; safe to call repeatedly
    pub fn teardown(&self) {
        self.subscription.borrow_mut().unsubscribe();
        self.state.borrow_mut().teardown();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }

    pub fn location(&self) -> Location {
        self.state.borrow().location.clone()
    }

    /// Location received before activation, if any
    pub fn pending_location(&self) -> Option<Location> {
        self.state.borrow().pending.clone()
    }

    pub fn root_match(&self) -> MatchResult {
        MatchResult::root(&self.state.borrow().location.pathname)
    }

    pub fn navigation(&self) -> &NavigationHandle {
        &self.navigation
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    /// Context for the top level of the tree
    pub fn context(&self) -> ResolutionContext {
        let location = self.location();
        let root = MatchResult::root(&location.pathname);
        ResolutionContext::new(
            location,
            Some(root),
            Rc::clone(&self.navigation),
            self.matcher.clone(),
            self.diagnostics,
        )
    }

    /// Re-declares the backend
    ///
    /// The backend is fixed for the controller's lifetime: a different
    /// handle produces a warning and is otherwise ignored.
    pub fn set_navigation(&self, navigation: &NavigationHandle) -> Vec<Warning> {
        let mut warnings = Vec::new();
        let same = std::ptr::eq(
            Rc::as_ptr(&self.navigation) as *const (),
            Rc::as_ptr(navigation) as *const (),
        );
        if !same {
            self.diagnostics.report(&mut warnings, Warning::HistoryChanged);
        }
        warnings
    }
}

impl Drop for NavigationController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{LocationChannel, LocationFeed};

    fn setup() -> (Rc<LocationChannel>, NavigationController) {
        let channel = Rc::new(LocationChannel::new("/"));
        let controller = NavigationController::with_parts(
            channel.clone(),
            PathMatcher::new(),
            Diagnostics::enabled(),
        );
        (channel, controller)
    }

    #[test]
    fn test_subscribes_on_create() {
        let (channel, controller) = setup();
        assert_eq!(channel.listener_count(), 1);
        assert_eq!(controller.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_only_latest_pending_location_survives() {
        let (channel, controller) = setup();
        channel.emit("/one");
        channel.emit("/two");
        channel.emit("/three");

        assert_eq!(controller.location().pathname, "/");
        assert_eq!(controller.pending_location(), Some(Location::new("/three")));

        controller.activate();
        assert_eq!(controller.location().pathname, "/three");
        assert_eq!(controller.pending_location(), None);
    }

    #[test]
    fn test_activate_without_pending_keeps_initial() {
        let (_channel, controller) = setup();
        controller.activate();
        assert_eq!(controller.location().pathname, "/");
        assert_eq!(controller.lifecycle(), Lifecycle::Mounted);
    }

    #[test]
    fn test_teardown_is_idempotent_and_stops_updates() {
        let (channel, controller) = setup();
        controller.activate();
        controller.teardown();
        controller.teardown();

        assert_eq!(channel.listener_count(), 0);
        channel.emit("/ignored");
        assert_eq!(controller.location().pathname, "/");
        assert_eq!(controller.lifecycle(), Lifecycle::TornDown);

        controller.activate();
        assert_eq!(controller.lifecycle(), Lifecycle::TornDown);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let (channel, controller) = setup();
        drop(controller);
        assert_eq!(channel.listener_count(), 0);
    }

    #[test]
    fn test_root_match_tracks_location() {
        let (channel, controller) = setup();
        controller.activate();
        assert!(controller.root_match().is_exact);

        channel.emit("/users");
        let root = controller.root_match();
        assert_eq!(root.url, "/");
        assert!(!root.is_exact);
    }

    #[test]
    fn test_backend_change_warns_and_keeps_original() {
        let (channel, controller) = setup();
        let same: NavigationHandle = channel.clone();
        assert!(controller.set_navigation(&same).is_empty());

        let other: NavigationHandle = Rc::new(LocationChannel::new("/other"));
        assert_eq!(controller.set_navigation(&other), vec![Warning::HistoryChanged]);
        assert_eq!(controller.navigation().location().pathname, "/");
    }
}
