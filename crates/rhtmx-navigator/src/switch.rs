/// Exclusive selection among sibling declarations
///
/// A [`Switch`] scans its children in declaration order and resolves only
/// the first one whose pattern matches. Later siblings are never evaluated,
/// so declaration order is the only priority rule.
use std::cell::Cell;
use std::fmt;

use crate::context::ResolutionContext;
use crate::diagnostics::{Element, Warning};
use crate::error::{NavigatorError, Result};
use crate::location::Location;
use crate::matcher::{MatchOptions, MatchResult, PathPattern};
use crate::redirect::{Redirect, RedirectOutcome};
use crate::route::{Route, RouteOutcome};

/// A sibling inside a switch
pub enum SwitchChild<O> {
    Route(Route<O>),
    Redirect(Redirect),
    /// Anything else; skipped during selection
    Other(O),
}

impl<O> SwitchChild<O> {
    fn candidate(&self) -> Option<Candidate<'_, O>> {
        match self {
            SwitchChild::Route(route) => Some(Candidate::Route(route)),
            SwitchChild::Redirect(redirect) => Some(Candidate::Redirect(redirect)),
            SwitchChild::Other(_) => None,
        }
    }
}

/// A child that takes part in selection
enum Candidate<'a, O> {
    Route(&'a Route<O>),
    Redirect(&'a Redirect),
}

impl<O> Candidate<'_, O> {
    /// `path` for routes, `from` for redirects
    fn pattern(&self) -> (Option<&PathPattern>, MatchOptions) {
        match self {
            Candidate::Route(route) => (route.path(), route.options()),
            Candidate::Redirect(redirect) => (redirect.from_pattern(), redirect.options()),
        }
    }
}

impl<O> From<Route<O>> for SwitchChild<O> {
    fn from(route: Route<O>) -> Self {
        SwitchChild::Route(route)
    }
}

impl<O> From<Redirect> for SwitchChild<O> {
    fn from(redirect: Redirect) -> Self {
        SwitchChild::Redirect(redirect)
    }
}

/// What the selected child resolved to
pub enum Selection<O> {
    Route(RouteOutcome<O>),
    Redirect(RedirectOutcome),
}

impl<O> Selection<O> {
    pub fn as_route(&self) -> Option<&RouteOutcome<O>> {
        match self {
            Selection::Route(outcome) => Some(outcome),
            Selection::Redirect(_) => None,
        }
    }

    pub fn as_redirect(&self) -> Option<&RedirectOutcome> {
        match self {
            Selection::Redirect(outcome) => Some(outcome),
            Selection::Route(_) => None,
        }
    }
}

impl<O: fmt::Debug> fmt::Debug for Selection<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Route(outcome) => f.debug_tuple("Route").field(outcome).finish(),
            Selection::Redirect(outcome) => f.debug_tuple("Redirect").field(outcome).finish(),
        }
    }
}

/// Result of a switch resolution
pub struct SwitchOutcome<O> {
    /// Index of the winning child and its outcome
    pub selected: Option<(usize, Selection<O>)>,
    pub warnings: Vec<Warning>,
}

impl<O> SwitchOutcome<O> {
    pub fn index(&self) -> Option<usize> {
        self.selected.as_ref().map(|(index, _)| *index)
    }

    pub fn selection(&self) -> Option<&Selection<O>> {
        self.selected.as_ref().map(|(_, selection)| selection)
    }

    pub fn route(&self) -> Option<&RouteOutcome<O>> {
        self.selection().and_then(Selection::as_route)
    }

    pub fn redirect(&self) -> Option<&RedirectOutcome> {
        self.selection().and_then(Selection::as_redirect)
    }
}

impl<O: fmt::Debug> fmt::Debug for SwitchOutcome<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchOutcome")
            .field("selected", &self.selected)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// An ordered group of routes and redirects of which at most one resolves
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{LocationChannel, NavigationController, Redirect, Route, Switch};
/// use std::rc::Rc;
///
/// let controller = NavigationController::create(Rc::new(LocationChannel::new("/about")));
/// controller.activate();
///
/// let switch = Switch::new()
///     .with_route(Route::at("/").exact().with_children("home"))
///     .with_route(Route::at("/about").with_children("about"))
///     .with_redirect(Redirect::new("/"));
///
/// let outcome = switch.resolve(Some(&controller.context())).unwrap();
/// assert_eq!(outcome.index(), Some(1));
/// assert_eq!(outcome.route().and_then(|r| r.output), Some("about"));
/// ```
pub struct Switch<O> {
    children: Vec<SwitchChild<O>>,
    location: Option<Location>,
    controlled: Cell<Option<bool>>,
}

impl<O> Switch<O> {
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
            location: None,
            controlled: Cell::new(None),
        }
    }

    pub fn with_child(mut self, child: impl Into<SwitchChild<O>>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_route(self, route: Route<O>) -> Self {
        self.with_child(route)
    }

    pub fn with_redirect(self, redirect: Redirect) -> Self {
        self.with_child(redirect)
    }

    /// Adds a non-route child, which selection skips
    pub fn with_other(mut self, other: O) -> Self {
        self.children.push(SwitchChild::Other(other));
        self
    }

    /// Matches against `location` instead of the inherited one
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    pub fn children(&self) -> &[SwitchChild<O>] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&SwitchChild<O>> {
        self.children.get(index)
    }

    /// Selects and resolves the first matching child
    pub fn resolve(&self, parent: Option<&ResolutionContext>) -> Result<SwitchOutcome<O>>
    where
        O: Clone,
    {
        let parent = parent.ok_or(NavigatorError::OutsideController)?;

        let diagnostics = parent.diagnostics();
        let mut warnings = Vec::new();
        if diagnostics.is_enabled() {
            if let Some(warning) = self.track_location_control() {
                diagnostics.report(&mut warnings, warning);
            }
        }

        let location = self.location.as_ref().unwrap_or(parent.location());

        let Some((index, candidate, found)) = self.select(parent, location)? else {
            tracing::debug!(pathname = %location.pathname, "no switch child matched");
            return Ok(SwitchOutcome {
                selected: None,
                warnings,
            });
        };

        tracing::debug!(pathname = %location.pathname, index, pattern = %found.pattern, "switch child selected");
        let selection = match candidate {
            Candidate::Route(route) => {
                let mut outcome = route.resolve_with(parent, Some(found), Some(location))?;
                warnings.append(&mut outcome.warnings);
                Selection::Route(outcome)
            }
            Candidate::Redirect(redirect) => {
                Selection::Redirect(redirect.resolve_with(parent, Some(&found))?)
            }
        };

        Ok(SwitchOutcome {
            selected: Some((index, selection)),
            warnings,
        })
    }

    fn select(
        &self,
        parent: &ResolutionContext,
        location: &Location,
    ) -> Result<Option<(usize, Candidate<'_, O>, MatchResult)>> {
        for (index, child) in self.children.iter().enumerate() {
            let Some(candidate) = child.candidate() else {
                continue;
            };
            let (path, options) = candidate.pattern();

            let found = match path.filter(|path| !path.is_blank()) {
                Some(path) => parent
                    .matcher()
                    .match_pattern(&location.pathname, path, options)?,
                None => parent.route_match().cloned(),
            };

            if let Some(found) = found {
                return Ok(Some((index, candidate, found)));
            }
        }
        Ok(None)
    }

    fn track_location_control(&self) -> Option<Warning> {
        let controlled = self.location.is_some();
        match self.controlled.replace(Some(controlled)) {
            Some(previous) if previous != controlled => Some(Warning::LocationControlToggled {
                element: Element::Switch,
                now_controlled: controlled,
            }),
            _ => None,
        }
    }
}

impl<O> Default for Switch<O> {
    fn default() -> Self {
        Self::new()
    }
}
