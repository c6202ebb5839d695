//! Navigation table for the console.
//!
//! `/` and `/login` are public. Everything under `/console` is protected; the
//! bare `/console` index forwards to the records listing and unknown paths
//! fall back to the public page.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleView {
    Dashboard,
    Profile,
    Settings,
}

impl ConsoleView {
    pub const ALL: [ConsoleView; 3] = [ConsoleView::Dashboard, ConsoleView::Profile, ConsoleView::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            ConsoleView::Dashboard => "History",
            ConsoleView::Profile => "Profile",
            ConsoleView::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Public,
    Login,
    Console(ConsoleView),
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Public => "/",
            Route::Login => "/login",
            Route::Console(ConsoleView::Dashboard) => "/console/dashboard",
            Route::Console(ConsoleView::Profile) => "/console/profile",
            Route::Console(ConsoleView::Settings) => "/console/settings",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Console(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of matching a path against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

pub fn resolve(path: &str) -> Resolution {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    match trimmed {
        "" => Resolution::Render(Route::Public),
        "/login" => Resolution::Render(Route::Login),
        "/console" => Resolution::Redirect(Route::Console(ConsoleView::Dashboard)),
        "/console/dashboard" => Resolution::Render(Route::Console(ConsoleView::Dashboard)),
        "/console/profile" => Resolution::Render(Route::Console(ConsoleView::Profile)),
        "/console/settings" => Resolution::Render(Route::Console(ConsoleView::Settings)),
        _ => Resolution::Redirect(Route::Public),
    }
}
