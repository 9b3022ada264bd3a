/// Route declarations and their resolution
///
/// A [`Route`] combines what the tree hands down (location, ancestor match)
/// with its own declaration to decide two things: the effective match for
/// its subtree, and which render strategy, if any, runs.
///
/// # Effective match
///
/// 1. A precomputed match (from an enclosing [`Switch`](crate::Switch)) is used as is
/// 2. Otherwise a declared pattern is matched against the location
/// 3. Otherwise (no pattern, or an empty one) the ancestor's match is inherited unchanged
///
/// # Render strategy priority
///
/// With a match: children function → fixed children → component → render
/// function. Without a match only a children function runs.
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::context::ResolutionContext;
use crate::diagnostics::{Element, Warning};
use crate::error::{NavigatorError, Result};
use crate::location::Location;
use crate::matcher::{MatchOptions, MatchResult, PathPattern};

/// Children invoked whether or not the route matched
pub type ChildrenFn<O> = Rc<dyn Fn(&ResolutionContext) -> Option<O>>;

/// Output producer invoked only on a match
pub type RenderFn<O> = Rc<dyn Fn(&ResolutionContext) -> O>;

/// The `children` slot of a declaration
pub enum Children<O> {
    Fixed(O),
    Function(ChildrenFn<O>),
}

/// A named output producer
pub struct Component<O> {
    name: String,
    render: RenderFn<O>,
}

impl<O> Component<O> {
    pub fn new(name: impl Into<String>, render: impl Fn(&ResolutionContext) -> O + 'static) -> Self {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, context: &ResolutionContext) -> O {
        (self.render)(context)
    }
}

/// The strategy picked for one resolution
pub enum RenderStrategy<'a, O> {
    ChildrenFunction(&'a ChildrenFn<O>),
    FixedChildren(&'a O),
    NamedComponent(&'a Component<O>),
    RenderFunction(&'a RenderFn<O>),
}

impl<O> RenderStrategy<'_, O> {
    pub fn kind(&self) -> StrategyKind {
        match self {
            RenderStrategy::ChildrenFunction(_) => StrategyKind::ChildrenFunction,
            RenderStrategy::FixedChildren(_) => StrategyKind::FixedChildren,
            RenderStrategy::NamedComponent(_) => StrategyKind::NamedComponent,
            RenderStrategy::RenderFunction(_) => StrategyKind::RenderFunction,
        }
    }
}

/// Render strategy tags, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StrategyKind {
    ChildrenFunction,
    FixedChildren,
    NamedComponent,
    RenderFunction,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyKind::ChildrenFunction => "children function",
            StrategyKind::FixedChildren => "children",
            StrategyKind::NamedComponent => "component",
            StrategyKind::RenderFunction => "render function",
        };
        f.write_str(label)
    }
}

/// What a route resolved to
pub struct RouteOutcome<O> {
    /// Context for this route's descendants
    pub context: ResolutionContext,
    /// Strategy that ran, if any
    pub strategy: Option<StrategyKind>,
    pub output: Option<O>,
    /// Advisory warnings raised during this resolution
    pub warnings: Vec<Warning>,
}

impl<O> RouteOutcome<O> {
    pub fn route_match(&self) -> Option<&MatchResult> {
        self.context.route_match()
    }

    pub fn is_match(&self) -> bool {
        self.context.route_match().is_some()
    }
}

impl<O: fmt::Debug> fmt::Debug for RouteOutcome<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteOutcome")
            .field("context", &self.context)
            .field("strategy", &self.strategy)
            .field("output", &self.output)
            .field("warnings", &self.warnings)
            .finish()
    }
}

/// A declared route and the state it keeps between resolutions
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{LocationChannel, NavigationController, Route};
/// use std::rc::Rc;
///
/// let controller = NavigationController::create(Rc::new(LocationChannel::new("/users/7")));
/// controller.activate();
///
/// let route = Route::at("/users/:id")
///     .with_render(|ctx| format!("user {}", ctx.param("id").unwrap_or("?")));
///
/// let outcome = route.resolve(Some(&controller.context())).unwrap();
/// assert_eq!(outcome.output.as_deref(), Some("user 7"));
/// ```
pub struct Route<O> {
    path: Option<PathPattern>,
    options: MatchOptions,
    location: Option<Location>,
    computed_match: Option<MatchResult>,
    children: Option<Children<O>>,
    component: Option<Component<O>>,
    render: Option<RenderFn<O>>,
    controlled: Cell<Option<bool>>,
    resolutions: Cell<usize>,
}

impl<O> Route<O> {
    /// A route without a pattern; it inherits its ancestor's match
    pub fn new() -> Self {
        Self {
            path: None,
            options: MatchOptions::default(),
            location: None,
            computed_match: None,
            children: None,
            component: None,
            render: None,
            controlled: Cell::new(None),
            resolutions: Cell::new(0),
        }
    }

    /// A route matching `path`
    pub fn at(path: impl Into<PathPattern>) -> Self {
        Self::new().with_path(path)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    pub fn with_path(mut self, path: impl Into<PathPattern>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn exact(mut self) -> Self {
        self.options.exact = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.options.strict = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.options.sensitive = true;
        self
    }

    /// Matches against `location` instead of the inherited one
    pub fn with_location(mut self, location: impl Into<Location>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Skips matching and uses `route_match` directly
    pub fn with_computed_match(mut self, route_match: MatchResult) -> Self {
        self.computed_match = Some(route_match);
        self
    }

    pub fn with_children(mut self, children: O) -> Self {
        self.children = Some(Children::Fixed(children));
        self
    }

    pub fn with_children_fn(
        mut self,
        children: impl Fn(&ResolutionContext) -> Option<O> + 'static,
    ) -> Self {
        self.children = Some(Children::Function(Rc::new(children)));
        self
    }

    pub fn with_component(mut self, component: Component<O>) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_render(mut self, render: impl Fn(&ResolutionContext) -> O + 'static) -> Self {
        self.render = Some(Rc::new(render));
        self
    }

    /// Re-declares the location override between resolutions
    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn path(&self) -> Option<&PathPattern> {
        self.path.as_ref()
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// How many times this route's own resolution logic has run
    pub fn resolutions(&self) -> usize {
        self.resolutions.get()
    }

    /// Picks the strategy to run (pure function of the declaration)
    pub fn select_strategy(&self, matched: bool) -> Option<RenderStrategy<'_, O>> {
        match (&self.children, matched) {
            (Some(Children::Function(children)), _) => {
                Some(RenderStrategy::ChildrenFunction(children))
            }
            (_, false) => None,
            (Some(Children::Fixed(children)), true) => Some(RenderStrategy::FixedChildren(children)),
            (None, true) => self
                .component
                .as_ref()
                .map(RenderStrategy::NamedComponent)
                .or_else(|| self.render.as_ref().map(RenderStrategy::RenderFunction)),
        }
    }

    /// Strategies declared alongside one that takes precedence
    pub fn render_conflicts(&self) -> Vec<Warning> {
        let children = self.children.as_ref().map(|children| match children {
            Children::Fixed(_) => StrategyKind::FixedChildren,
            Children::Function(_) => StrategyKind::ChildrenFunction,
        });
        let component = self.component.as_ref().map(|_| StrategyKind::NamedComponent);
        let render = self.render.as_ref().map(|_| StrategyKind::RenderFunction);

        [(component, render), (children, component), (children, render)]
            .into_iter()
            .filter_map(|pair| match pair {
                (Some(kept), Some(ignored)) => Some(Warning::RenderIgnored { kept, ignored }),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolves this route beneath `parent`
    ///
    /// `parent` is `None` when there is no enclosing controller, which is a
    /// configuration error.
    pub fn resolve(&self, parent: Option<&ResolutionContext>) -> Result<RouteOutcome<O>>
    where
        O: Clone,
    {
        let parent = parent.ok_or(NavigatorError::OutsideController)?;
        self.resolve_with(parent, None, None)
    }

    /// Resolution entry used by [`Switch`](crate::Switch), which has already
    /// matched this route and fixed the location it matched against
    pub(crate) fn resolve_with(
        &self,
        parent: &ResolutionContext,
        computed_match: Option<MatchResult>,
        location: Option<&Location>,
    ) -> Result<RouteOutcome<O>>
    where
        O: Clone,
    {
        self.resolutions.set(self.resolutions.get() + 1);

        let diagnostics = parent.diagnostics();
        let mut warnings = Vec::new();
        if diagnostics.is_enabled() {
            if let Some(warning) = self.track_location_control() {
                diagnostics.report(&mut warnings, warning);
            }
            for warning in self.render_conflicts() {
                diagnostics.report(&mut warnings, warning);
            }
        }

        let location = location
            .or(self.location.as_ref())
            .unwrap_or(parent.location())
            .clone();
        let route_match = self.compute_match(parent, &location, computed_match)?;
        let context = parent.derive(location, route_match);

        let strategy = self.select_strategy(context.route_match().is_some());
        let kind = strategy.as_ref().map(RenderStrategy::kind);
        let output = match strategy {
            Some(RenderStrategy::ChildrenFunction(children)) => children(&context),
            Some(RenderStrategy::FixedChildren(children)) => Some(children.clone()),
            Some(RenderStrategy::NamedComponent(component)) => Some(component.render(&context)),
            Some(RenderStrategy::RenderFunction(render)) => Some(render(&context)),
            None => None,
        };

        Ok(RouteOutcome {
            context,
            strategy: kind,
            output,
            warnings,
        })
    }

    fn compute_match(
        &self,
        parent: &ResolutionContext,
        location: &Location,
        computed_match: Option<MatchResult>,
    ) -> Result<Option<MatchResult>> {
        if let Some(found) = computed_match.or_else(|| self.computed_match.clone()) {
            return Ok(Some(found));
        }

        match self.path.as_ref().filter(|path| !path.is_blank()) {
            Some(path) => parent
                .matcher()
                .match_pattern(&location.pathname, path, self.options),
            None => Ok(parent.route_match().cloned()),
        }
    }

    fn track_location_control(&self) -> Option<Warning> {
        let controlled = self.location.is_some();
        match self.controlled.replace(Some(controlled)) {
            Some(previous) if previous != controlled => Some(Warning::LocationControlToggled {
                element: Element::Route,
                now_controlled: controlled,
            }),
            _ => None,
        }
    }
}

impl<O> Default for Route<O> {
    fn default() -> Self {
        Self::new()
    }
}
