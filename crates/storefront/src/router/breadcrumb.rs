//! Breadcrumb trail and active-nav rules.

use crate::host::Crumb;
use crate::router::routes::Route;

/// Every href in the site navigation.
pub const NAV_HREFS: [&str; 10] = [
    "/",
    "/products",
    "/products/kitchen",
    "/products/bathroom",
    "/products/shower",
    "/products/accessories",
    "/cart",
    "/profile",
    "/orders",
    "/admin",
];

/// Nav hrefs highlighted for `path`.
///
/// A link is active when its href equals the path. The home page also
/// highlights the products link, since the home view leads with the
/// catalog preview.
#[must_use]
pub fn active_nav(path: &str) -> Vec<&'static str> {
    NAV_HREFS
        .into_iter()
        .filter(|href| *href == path || (path == "/" && *href == "/products"))
        .collect()
}

/// The breadcrumb trail for a path and its resolved route.
#[must_use]
pub fn trail(path: &str, route: Route) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb::new("Home", "/")];
    if path.starts_with("/products") {
        crumbs.push(Crumb::new("Products", "/products"));
        if let (3, Route::Products(Some(category))) = (path.split('/').count(), route) {
            crumbs.push(Crumb::new(category.label(), path));
        }
        return crumbs;
    }
    let label = match path {
        "/cart" => "Cart",
        "/profile" => "Profile",
        "/orders" => "Orders",
        "/admin" => "Admin",
        _ => return crumbs,
    };
    crumbs.push(Crumb::new(label, path));
    crumbs
}
