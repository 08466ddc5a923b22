//! Client-side router.
//!
//! # Architecture
//!
//! - [`routes`] - static path table with the home fallback
//! - [`transition`] - exit/settle/enter state machine
//! - [`breadcrumb`] - breadcrumb trail and active-nav rules
//!
//! The router owns sequencing only. Rendering is delegated to a
//! [`RouteRenderer`] and every page effect goes through the
//! [`BrowserHost`]. Navigations take `&mut self`, so a second navigation
//! cannot begin until the first has entered.

pub mod breadcrumb;
pub mod routes;
pub mod transition;

use tracing::instrument;
use url::Url;

use crate::error::add_navigation_breadcrumb;
use crate::host::{BrowserHost, TransitionClass};
use crate::views::Fragment;

pub use routes::{Route, RouteMatch, RouteTable};
pub use transition::{Transition, TransitionError, TransitionPhase};

/// What triggered a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// Link click or programmatic navigation; pushes history.
    Push,
    /// Browser back/forward; history already moved.
    Pop,
    /// First render on load; the path is already current.
    Initial,
}

/// Produces the fragment for a resolved route.
pub(crate) trait RouteRenderer<H: BrowserHost> {
    async fn render(&mut self, route: Route, host: &mut H) -> Fragment;
}

/// Path-to-view sequencing with animated transitions.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    transition: Transition,
    origin: Url,
    current: Option<(String, Route)>,
}

impl Router {
    /// Create a router for the site at `origin`.
    #[must_use]
    pub fn new(origin: Url, transition: Transition) -> Self {
        Self {
            table: RouteTable::storefront(),
            transition,
            origin,
            current: None,
        }
    }

    /// The path and route most recently rendered.
    #[must_use]
    pub fn current(&self) -> Option<(&str, Route)> {
        self.current
            .as_ref()
            .map(|(path, route)| (path.as_str(), *route))
    }

    #[must_use]
    pub const fn phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    #[must_use]
    pub const fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Path to navigate to for a clicked link, if the router handles it.
    ///
    /// Relative hrefs resolve against the site origin. Links to another
    /// origin, or that do not parse, are left to the browser.
    #[must_use]
    pub fn intercept(&self, href: &str) -> Option<String> {
        let target = self.origin.join(href).ok()?;
        (target.origin() == self.origin.origin()).then(|| target.path().to_owned())
    }

    /// Resolve `path`, render it, and drive the page through the
    /// transition appropriate to `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] if the transition state machine is not
    /// at rest; the page is left untouched in that case.
    #[instrument(skip(self, host, renderer))]
    pub(crate) async fn navigate<H, R>(
        &mut self,
        host: &mut H,
        renderer: &mut R,
        path: &str,
        kind: NavigationKind,
    ) -> Result<RouteMatch, TransitionError>
    where
        H: BrowserHost,
        R: RouteRenderer<H>,
    {
        let found = self.table.lookup(path);
        if !found.matched {
            tracing::debug!(path, "unknown path, rendering home");
        }
        add_navigation_breadcrumb(path);

        let instant = routes::is_instant(path);
        match kind {
            NavigationKind::Initial => {
                if instant {
                    self.transition.reset()?;
                } else {
                    self.transition.enter_initial()?;
                }
                self.render_into(host, renderer, path, found.route).await;
                host.set_transition(self.transition.phase().class());
            }
            NavigationKind::Push | NavigationKind::Pop if instant => {
                self.transition.reset()?;
                if kind == NavigationKind::Push {
                    host.push_state(path);
                }
                self.render_into(host, renderer, path, found.route).await;
                host.set_transition(None);
                host.scroll_to_top();
            }
            NavigationKind::Push | NavigationKind::Pop => {
                self.transition.start()?;
                host.set_transition(Some(TransitionClass::Exiting));
                self.transition.settle().await?;
                if kind == NavigationKind::Push {
                    host.push_state(path);
                }
                self.render_into(host, renderer, path, found.route).await;
                // Entry class goes on at the next tick, after the mount.
                tokio::task::yield_now().await;
                self.transition.enter()?;
                host.set_transition(Some(TransitionClass::Entering));
                if routes::scrolls_into_view(path) {
                    host.scroll_into_view();
                }
            }
        }

        tracing::info!(path, route = ?found.route, ?kind, "navigated");
        Ok(found)
    }

    /// Re-render the current route in place, without history or animation.
    pub(crate) async fn refresh<H, R>(&mut self, host: &mut H, renderer: &mut R)
    where
        H: BrowserHost,
        R: RouteRenderer<H>,
    {
        let Some((path, route)) = self.current.clone() else {
            return;
        };
        self.render_into(host, renderer, &path, route).await;
    }

    async fn render_into<H, R>(&mut self, host: &mut H, renderer: &mut R, path: &str, route: Route)
    where
        H: BrowserHost,
        R: RouteRenderer<H>,
    {
        let fragment = renderer.render(route, host).await;
        host.mount(&fragment);
        host.set_active_nav(&breadcrumb::active_nav(path));
        host.set_breadcrumb(&breadcrumb::trail(path, route));
        self.current = Some((path.to_owned(), route));
    }
}
