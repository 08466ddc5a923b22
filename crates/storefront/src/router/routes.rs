//! The static route table.

use std::collections::HashMap;

use faucet_store_core::Category;

/// A view reachable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    /// Product grid, optionally filtered to one category.
    Products(Option<Category>),
    Cart,
    Profile,
    Orders,
    Admin,
}

/// Paths rendered without exit/entry animation.
pub const INSTANT_PATHS: [&str; 3] = ["/products", "/cart", "/profile"];

/// Paths after which the view is not scrolled into view.
const NO_SCROLL_PATHS: [&str; 2] = ["/", "/products"];

/// Whether `path` renders without animation.
#[must_use]
pub fn is_instant(path: &str) -> bool {
    INSTANT_PATHS.contains(&path)
}

/// Whether an animated navigation to `path` scrolls the content into view.
#[must_use]
pub fn scrolls_into_view(path: &str) -> bool {
    !NO_SCROLL_PATHS.contains(&path)
}

/// Result of a route lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
    /// False when the path was unknown and the home view stands in.
    pub matched: bool,
}

/// Mapping from exact path to [`Route`].
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<&'static str, Route>,
}

impl RouteTable {
    /// The storefront's routes.
    #[must_use]
    pub fn storefront() -> Self {
        let mut routes = HashMap::from([
            ("/", Route::Home),
            ("/products", Route::Products(None)),
            // Legacy sink link from the category menu.
            ("/products/lavabo", Route::Products(Some(Category::Bathroom))),
            ("/cart", Route::Cart),
            ("/profile", Route::Profile),
            ("/orders", Route::Orders),
            ("/admin", Route::Admin),
        ]);
        for category in Category::ALL {
            routes.insert(category_path(category), Route::Products(Some(category)));
        }
        Self { routes }
    }

    /// Resolve `path`, falling back to the home view.
    #[must_use]
    pub fn lookup(&self, path: &str) -> RouteMatch {
        self.routes.get(path).map_or(
            RouteMatch {
                route: Route::Home,
                matched: false,
            },
            |route| RouteMatch {
                route: *route,
                matched: true,
            },
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// The grid path for a category.
#[must_use]
pub const fn category_path(category: Category) -> &'static str {
    match category {
        Category::Kitchen => "/products/kitchen",
        Category::Bathroom => "/products/bathroom",
        Category::Shower => "/products/shower",
        Category::Accessories => "/products/accessories",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths() {
        let table = RouteTable::storefront();
        assert_eq!(table.len(), 11);
        assert_eq!(table.lookup("/cart").route, Route::Cart);
        assert_eq!(
            table.lookup("/products/shower").route,
            Route::Products(Some(Category::Shower))
        );
        assert_eq!(
            table.lookup("/products/lavabo").route,
            Route::Products(Some(Category::Bathroom))
        );
        assert!(table.lookup("/admin").matched);
    }

    #[test]
    fn test_unknown_path_falls_back_to_home() {
        let table = RouteTable::storefront();
        for path in ["/nope", "/products/garden", "/cart/", ""] {
            let found = table.lookup(path);
            assert_eq!(found.route, Route::Home, "{path}");
            assert!(!found.matched);
        }
    }

    #[test]
    fn test_instant_and_scroll_sets() {
        assert!(is_instant("/cart"));
        assert!(!is_instant("/products/kitchen"));
        assert!(!is_instant("/"));
        assert!(!scrolls_into_view("/"));
        assert!(scrolls_into_view("/orders"));
    }
}
