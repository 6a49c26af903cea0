use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::history::{History, MemoryHistory};
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AppServices, AuthService, Clock, DashboardService, FavoriteService, NavigationGuard};
use storage::repository::Storage;
use stream_core::time::fixed_now;

use crate::context::{UiApp, build_app_context};
use crate::routes::Route;
use crate::views::{DashboardView, LandingView, LoginView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    login_hint: Option<String>,
}

impl UiApp for TestApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn navigation(&self) -> Arc<NavigationGuard> {
        self.services.navigation()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }

    fn favorites(&self) -> Arc<FavoriteService> {
        self.services.favorites()
    }

    fn login_hint(&self) -> Option<String> {
        self.login_hint.clone()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Landing,
    Login,
    Dashboard,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Landing => rsx! { LandingView {} },
        ViewKind::Login => rsx! { LoginView {} },
        ViewKind::Dashboard => rsx! { DashboardView {} },
    }
}

#[derive(Props, Clone)]
struct AppHarnessProps {
    app: Arc<TestApp>,
    initial_path: String,
}

impl PartialEq for AppHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for AppHarnessProps {}

/// The real router, guarded layout included, opened at `initial_path`.
#[component]
fn AppRouterHarness(props: AppHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| {
        Rc::new(MemoryHistory::with_initial_path(props.initial_path.clone())) as Rc<dyn History>
    });
    rsx! { Router::<Route> {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    /// Rebuild, then give the guard enough turns to redirect and the new page to load.
    pub async fn follow_redirects(&mut self) {
        self.rebuild();
        for _ in 0..12 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn test_app(storage: &Storage, login_hint: Option<String>) -> Arc<TestApp> {
    let services = AppServices::from_storage(storage, Clock::fixed(fixed_now()));
    Arc::new(TestApp {
        services,
        login_hint,
    })
}

pub fn setup_app_harness(initial_path: &str, storage: &Storage) -> ViewHarness {
    let props = AppHarnessProps {
        app: test_app(storage, None),
        initial_path: initial_path.to_owned(),
    };
    ViewHarness {
        dom: VirtualDom::new_with_props(AppRouterHarness, props),
    }
}

pub fn setup_view_harness(view: ViewKind, storage: &Storage) -> ViewHarness {
    setup_view_harness_with_hint(view, storage, None)
}

pub fn setup_view_harness_with_hint(
    view: ViewKind,
    storage: &Storage,
    login_hint: Option<String>,
) -> ViewHarness {
    let app = test_app(storage, login_hint);
    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });
    ViewHarness { dom }
}
