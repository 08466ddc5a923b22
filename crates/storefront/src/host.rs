//! The boundary between the storefront core and the page it drives.
//!
//! Everything that touches the document (history, the main content
//! element, scroll position, nav highlighting, the breadcrumb, toasts) goes
//! through [`BrowserHost`]. [`HeadlessHost`] records every call so the
//! router and controller can run without a browser.

use crate::notify::Toast;
use crate::views::Fragment;

/// Animation class applied to the main content element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionClass {
    /// The outgoing view is fading.
    Exiting,
    /// The incoming view is sliding in.
    Entering,
}

impl TransitionClass {
    /// CSS class name.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Exiting => "fade-out",
            Self::Entering => "slide-in",
        }
    }
}

/// One breadcrumb link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub href: String,
}

impl Crumb {
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Page operations the storefront needs.
pub trait BrowserHost {
    /// Path currently shown in the address bar.
    fn current_path(&self) -> String;

    /// Push a history entry for `path`.
    fn push_state(&mut self, path: &str);

    /// Replace the main content with a rendered fragment and bind its
    /// listeners.
    fn mount(&mut self, fragment: &Fragment);

    /// Set the transition class on the main content; `None` clears both.
    fn set_transition(&mut self, class: Option<TransitionClass>);

    fn scroll_to_top(&mut self);

    /// Smooth-scroll the main content into view.
    fn scroll_into_view(&mut self);

    /// Mark exactly these nav hrefs as active.
    fn set_active_nav(&mut self, active: &[&str]);

    fn set_breadcrumb(&mut self, trail: &[Crumb]);

    fn set_cart_count(&mut self, count: u32);

    fn show_toast(&mut self, toast: &Toast);
}

/// A [`BrowserHost`] that records what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    /// Address bar path.
    pub location: String,
    /// Every pushed path, in order.
    pub history: Vec<String>,
    /// The fragment most recently mounted.
    pub mounted: Option<Fragment>,
    /// Number of mounts so far.
    pub mounts: usize,
    /// Every transition class change, in order.
    pub transitions: Vec<Option<TransitionClass>>,
    pub scrolled_to_top: usize,
    pub scrolled_into_view: usize,
    pub active_nav: Vec<String>,
    pub breadcrumb: Vec<Crumb>,
    pub cart_count: u32,
    pub toasts: Vec<Toast>,
}

impl HeadlessHost {
    /// A host whose address bar starts at `path`.
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self {
            location: path.to_owned(),
            ..Self::default()
        }
    }

    /// Simulate the back/forward buttons moving the address bar.
    pub fn set_location(&mut self, path: &str) {
        path.clone_into(&mut self.location);
    }

    /// Markup of the mounted fragment, empty if nothing is mounted.
    #[must_use]
    pub fn html(&self) -> &str {
        self.mounted.as_ref().map_or("", |f| f.html.as_str())
    }

    /// The current transition class.
    #[must_use]
    pub fn transition(&self) -> Option<TransitionClass> {
        self.transitions.last().copied().flatten()
    }

    /// Whether any animated class was ever applied.
    #[must_use]
    pub fn animated(&self) -> bool {
        self.transitions.iter().any(Option::is_some)
    }

    /// Messages of every toast shown, oldest first.
    #[must_use]
    pub fn toast_messages(&self) -> Vec<&str> {
        self.toasts.iter().map(|t| t.message.as_str()).collect()
    }
}

impl BrowserHost for HeadlessHost {
    fn current_path(&self) -> String {
        self.location.clone()
    }

    fn push_state(&mut self, path: &str) {
        path.clone_into(&mut self.location);
        self.history.push(path.to_owned());
    }

    fn mount(&mut self, fragment: &Fragment) {
        self.mounted = Some(fragment.clone());
        self.mounts += 1;
    }

    fn set_transition(&mut self, class: Option<TransitionClass>) {
        self.transitions.push(class);
    }

    fn scroll_to_top(&mut self) {
        self.scrolled_to_top += 1;
    }

    fn scroll_into_view(&mut self) {
        self.scrolled_into_view += 1;
    }

    fn set_active_nav(&mut self, active: &[&str]) {
        self.active_nav = active.iter().map(|href| (*href).to_owned()).collect();
    }

    fn set_breadcrumb(&mut self, trail: &[Crumb]) {
        self.breadcrumb = trail.to_vec();
    }

    fn set_cart_count(&mut self, count: u32) {
        self.cart_count = count;
    }

    fn show_toast(&mut self, toast: &Toast) {
        self.toasts.push(toast.clone());
    }
}
