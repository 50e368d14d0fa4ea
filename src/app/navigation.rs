//! Views and access guards

use std::sync::{Arc, PoisonError, RwLock};

use log::debug;
use pgstay_auth::SessionStore;

/// A page of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Home,
    Services,
    Login,
    Register,
    Dashboard,
    Admin,
    ForgotPassword,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Home => "/",
            View::Services => "/services",
            View::Login => "/login",
            View::Register => "/register",
            View::Dashboard => "/dashboard",
            View::Admin => "/admin",
            View::ForgotPassword => "/forgot-password",
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        [
            View::Home,
            View::Services,
            View::Login,
            View::Register,
            View::Dashboard,
            View::Admin,
            View::ForgotPassword,
        ]
        .into_iter()
        .find(|view| view.path() == path)
    }
}

/// What should be on screen for the requested view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The session is still being restored; guarded views wait
    Loading,
    Show(View),
}

/// Current view, shared between pages
#[derive(Clone)]
pub struct Navigator {
    current: Arc<RwLock<View>>,
    session: SessionStore,
}

impl Navigator {
    pub fn new(session: SessionStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(View::Home)),
            session,
        }
    }

    /// Go to `view`. Guarded views the session may not see redirect instead.
    pub fn navigate(&self, view: View) -> Route {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = view;
        self.route()
    }

    /// The view on screen, after guards.
    pub fn route(&self) -> Route {
        let requested = self.requested();
        match self.guard(requested) {
            Route::Show(view) if view != requested => {
                debug!("Redirecting {} to {}", requested.path(), view.path());
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = view;
                Route::Show(view)
            }
            route => route,
        }
    }

    /// The view last asked for, before guards.
    pub fn requested(&self) -> View {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn guard(&self, view: View) -> Route {
        match view {
            View::Dashboard | View::Admin if self.session.is_loading() => Route::Loading,
            View::Dashboard if self.session.current_identity().is_none() => Route::Show(View::Login),
            View::Admin if !self.session.is_admin() => Route::Show(View::Home),
            view => Route::Show(view),
        }
    }

    /// Navigation entries for the current session
    pub fn menu(&self) -> Vec<View> {
        let mut entries = vec![View::Home, View::Services];
        if self.session.is_authenticated() {
            entries.push(View::Dashboard);
            if self.session.is_admin() {
                entries.push(View::Admin);
            }
        } else {
            entries.push(View::Login);
            entries.push(View::Register);
        }
        entries
    }
}
