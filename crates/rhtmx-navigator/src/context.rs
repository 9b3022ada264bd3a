//! The value handed from each node of the route tree to its descendants

use std::fmt;
use std::rc::Rc;

use crate::diagnostics::Diagnostics;
use crate::feed::NavigationHandle;
use crate::location::Location;
use crate::matcher::{MatchResult, PathMatcher};

/// Inherited resolution state
///
/// Created by a [`NavigationController`](crate::NavigationController) and
/// narrowed by every route that resolves beneath it. Consumers can read it
/// but not change it; each resolver derives a fresh context for its children.
#[derive(Clone)]
pub struct ResolutionContext {
    location: Location,
    route_match: Option<MatchResult>,
    navigation: NavigationHandle,
    matcher: PathMatcher,
    diagnostics: Diagnostics,
}

impl ResolutionContext {
    pub(crate) fn new(
        location: Location,
        route_match: Option<MatchResult>,
        navigation: NavigationHandle,
        matcher: PathMatcher,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            location,
            route_match,
            navigation,
            matcher,
            diagnostics,
        }
    }

    /// Context for descendants of a node that resolved `route_match` at `location`
    pub(crate) fn derive(&self, location: Location, route_match: Option<MatchResult>) -> Self {
        Self {
            location,
            route_match,
            navigation: Rc::clone(&self.navigation),
            matcher: self.matcher.clone(),
            diagnostics: self.diagnostics,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The nearest match above (or at) this point of the tree
    pub fn route_match(&self) -> Option<&MatchResult> {
        self.route_match.as_ref()
    }

    /// Shortcut for a parameter of the current match
    pub fn param(&self, name: &str) -> Option<&str> {
        self.route_match.as_ref().and_then(|m| m.param(name))
    }

    pub fn navigation(&self) -> &NavigationHandle {
        &self.navigation
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.matcher
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field("location", &self.location)
            .field("route_match", &self.route_match)
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
