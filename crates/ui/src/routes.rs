use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator, use_route};
use stream_core::guard::RouteDecision;

use crate::context::AppContext;
use crate::views::{DashboardView, LandingView, LoginView, NotFoundView};

#[derive(Clone, Debug, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Guarded)]
        #[route("/", LandingView)] Landing {},
        #[route("/login", LoginView)] Login {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/:..segments", NotFoundView)] NotFound { segments: Vec<String> },
}

/// Route a redirect decision lands on.
#[must_use]
pub fn redirect_route(decision: RouteDecision) -> Option<Route> {
    match decision {
        RouteDecision::Allow => None,
        RouteDecision::RedirectLogin => Some(Route::Login {}),
        RouteDecision::RedirectDashboard => Some(Route::Dashboard {}),
    }
}

/// Runs the session guard for every route change before rendering the page.
#[component]
fn Guarded() -> Element {
    let ctx = use_context::<AppContext>();
    let nav = use_navigator();
    let path = use_route::<Route>().to_string();
    let guard = ctx.navigation();

    let decision = use_resource(use_reactive!(|(path,)| {
        let guard = guard.clone();
        async move { guard.evaluate(&path).await }
    }));

    use_effect(move || {
        let current = *decision.read();
        if let Some(route) = current.and_then(redirect_route) {
            nav.replace(route);
        }
    });

    let settled = matches!(decision.state().cloned(), UseResourceState::Ready);
    let current = *decision.read();
    match current {
        Some(RouteDecision::Allow) if settled => rsx! { Outlet::<Route> {} },
        _ => rsx! {
            div { class: "route-pending",
                div { class: "spinner" }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stream_core::guard::{DASHBOARD_PATH, LANDING_PATH, LOGIN_PATH};

    #[test]
    fn routes_match_guard_paths() {
        assert_eq!(Route::Landing {}.to_string(), LANDING_PATH);
        assert_eq!(Route::Login {}.to_string(), LOGIN_PATH);
        assert_eq!(Route::Dashboard {}.to_string(), DASHBOARD_PATH);
    }

    #[test]
    fn redirects_map_to_routes() {
        assert_eq!(redirect_route(RouteDecision::Allow), None);
        assert_eq!(
            redirect_route(RouteDecision::RedirectLogin),
            Some(Route::Login {})
        );
        assert_eq!(
            redirect_route(RouteDecision::RedirectDashboard),
            Some(Route::Dashboard {})
        );
    }

    #[test]
    fn unknown_paths_parse_to_not_found() {
        let route = "/profile/settings".parse::<Route>().ok();
        assert_eq!(
            route,
            Some(Route::NotFound {
                segments: vec!["profile".to_owned(), "settings".to_owned()]
            })
        );
    }
}
