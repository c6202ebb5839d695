//! Headless console shell.
//!
//! Ties the route table, the guard and the views together. Each navigation
//! yields a [`Screen`] describing what the presentation layer should draw;
//! nothing protected is produced unless the guard allowed it.

pub mod login;
pub mod dashboard;
pub mod profile;

use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::guard::{ConsoleContext, GuardDecision, RouteGuard};
use crate::identity::SessionStore;
use crate::records::RecordFetcher;
use crate::routes::{resolve, ConsoleView, Resolution, Route};

pub use dashboard::DashboardState;
pub use login::{LoginOutcome, LoginScreen};
pub use profile::{ProfileScreen, ResetNotice};

/// Redirect hops followed per navigation before giving up.
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleBody {
    Dashboard(DashboardState),
    Profile(ProfileScreen),
    Settings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Public,
    Login(LoginScreen),
    Console { context: ConsoleContext, view: ConsoleView, body: ConsoleBody },
    /// Guard still resolving; renders no protected content.
    Blank,
}

impl Screen {
    pub fn route(&self) -> Option<Route> {
        match self {
            Screen::Public => Some(Route::Public),
            Screen::Login(_) => Some(Route::Login),
            Screen::Console { view, .. } => Some(Route::Console(*view)),
            Screen::Blank => None,
        }
    }
}

pub struct ConsoleShell {
    store: Arc<SessionStore>,
    guard: RouteGuard,
    fetcher: RecordFetcher,
    reset_redirect: String,
    current: Screen,
}

impl ConsoleShell {
    pub fn new(store: Arc<SessionStore>, fetcher: RecordFetcher, cfg: &ConsoleConfig) -> Self {
        Self {
            guard: RouteGuard::new(store.clone()),
            store,
            fetcher,
            reset_redirect: cfg.reset_redirect(),
            current: Screen::Blank,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn current(&self) -> &Screen {
        &self.current
    }

    /// Navigate to `path`, following redirects, and return the screen to draw.
    pub async fn navigate(&mut self, path: &str) -> Screen {
        let screen = self.render_path(path).await;
        self.current = screen.clone();
        screen
    }

    async fn render_path(&mut self, path: &str) -> Screen {
        let mut target = path.to_string();
        for _ in 0..=MAX_REDIRECTS {
            let route = match resolve(&target) {
                Resolution::Render(route) => route,
                Resolution::Redirect(route) => {
                    tracing::debug!(target: "notebuddy::guard", "redirect {} -> {}", target, route);
                    target = route.path().to_string();
                    continue;
                }
            };
            match route {
                Route::Public => {
                    self.guard.unmount();
                    return Screen::Public;
                }
                Route::Login => {
                    self.guard.unmount();
                    return Screen::Login(LoginScreen::default());
                }
                Route::Console(view) => {
                    if let Some(GuardDecision::Redirect(to)) = self.guard.observe() {
                        target = to.path().to_string();
                        continue;
                    }
                    match self.guard.mount().await {
                        Some(GuardDecision::Allow(identity)) => {
                            let context = ConsoleContext { identity };
                            let body = self.render_view(view, &context).await;
                            return Screen::Console { context, view, body };
                        }
                        Some(GuardDecision::Redirect(to)) => {
                            target = to.path().to_string();
                            continue;
                        }
                        None => return Screen::Blank,
                    }
                }
            }
        }
        tracing::warn!(target: "notebuddy::guard", "too many redirects starting at {}", path);
        self.guard.unmount();
        Screen::Public
    }

    async fn render_view(&self, view: ConsoleView, context: &ConsoleContext) -> ConsoleBody {
        match view {
            ConsoleView::Dashboard => ConsoleBody::Dashboard(dashboard::load(&self.store, &self.fetcher).await),
            ConsoleView::Profile => ConsoleBody::Profile(ProfileScreen::new(context.identity.clone())),
            ConsoleView::Settings => ConsoleBody::Settings,
        }
    }

    /// Submit the login form. Success lands on the records listing.
    pub async fn login(&mut self, email: &str, password: &str) -> Screen {
        match login::submit(&self.store, email, password).await {
            LoginOutcome::Navigate(route) => {
                // The new session re-enters the console through a fresh mount.
                self.guard.unmount();
                self.navigate(route.path()).await
            }
            LoginOutcome::Rejected(form) => {
                self.guard.unmount();
                self.current = Screen::Login(form);
                self.current.clone()
            }
        }
    }

    /// Sign out and return to the public page.
    pub async fn sign_out(&mut self) -> Screen {
        let decision = self.guard.sign_out().await;
        let to = match decision {
            GuardDecision::Redirect(route) => route,
            GuardDecision::Allow(_) => Route::Public,
        };
        self.navigate(to.path()).await
    }

    /// Request a password reset from the profile screen. Returns `None` when
    /// the profile view is not the one on screen.
    pub async fn request_password_reset(&mut self) -> Option<ResetNotice> {
        let Screen::Console { context, view: ConsoleView::Profile, .. } = &self.current else { return None; };
        let identity = context.identity.clone();
        let notice = profile::request_reset(&self.store, &identity, &self.reset_redirect).await;
        if let Screen::Console { body: ConsoleBody::Profile(p), .. } = &mut self.current {
            p.notice = Some(notice.clone());
        }
        Some(notice)
    }
}
