use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};
use stream_core::model::{ContentId, UserId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{SiteFooter, ViewError, ViewState, view_state_from_resource};
use crate::vm::{ContentCardVm, ContentRowVm, DashboardVm, HeroVm, map_dashboard};

#[derive(Clone, Debug, PartialEq)]
struct DashboardScreen {
    user: UserId,
    vm: DashboardVm,
    /// Bumped on every load so flips made against older data drop out.
    load: u64,
}

/// Favorite flips confirmed by the backend, valid for one dashboard load.
#[derive(Clone, Debug, Default, PartialEq)]
struct FavoriteOverrides {
    load: u64,
    flips: HashMap<ContentId, bool>,
}

impl FavoriteOverrides {
    fn record(&mut self, load: u64, id: ContentId, is_favorite: bool) {
        if self.load != load {
            self.load = load;
            self.flips.clear();
        }
        self.flips.insert(id, is_favorite);
    }

    fn resolve(&self, load: u64, id: ContentId, loaded: bool) -> bool {
        if self.load != load {
            return loaded;
        }
        self.flips.get(&id).copied().unwrap_or(loaded)
    }
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let nav = use_navigator();
    let dashboard = ctx.dashboard();
    let favorites = ctx.favorites();
    let auth = ctx.auth();
    let favorite_overrides = use_signal(FavoriteOverrides::default);
    let loads = use_hook(|| Rc::new(Cell::new(0_u64)));

    let resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let load = loads.get() + 1;
        loads.set(load);
        async move {
            let data = dashboard.load().await.map_err(|err| {
                log::warn!("dashboard load failed: {err}");
                ViewError::from_dashboard(&err)
            })?;
            Ok::<_, ViewError>(DashboardScreen {
                user: data.session.user_id,
                vm: map_dashboard(&data),
                load,
            })
        }
    });
    let state = view_state_from_resource(&resource);

    use_effect(move || {
        let signed_out = matches!(&*resource.read(), Some(Err(ViewError::SignedOut)));
        if signed_out {
            nav.replace(Route::Login {});
        }
    });

    let on_toggle_favorite = use_callback(move |(load, user, content): (u64, UserId, ContentId)| {
        let favorites = favorites.clone();
        let mut favorite_overrides = favorite_overrides;
        spawn(async move {
            match favorites.toggle(user, content).await {
                Ok(now_favorite) => {
                    favorite_overrides.write().record(load, content, now_favorite);
                }
                Err(err) => log::warn!("favorite toggle for {content} failed: {err}"),
            }
        });
    });

    let on_sign_out = use_callback(move |()| {
        let auth = auth.clone();
        spawn(async move {
            if let Err(err) = auth.sign_out().await {
                log::warn!("sign out failed: {err}");
            }
            nav.replace(Route::Login {});
        });
    });

    let overrides = favorite_overrides();

    rsx! {
        div { class: "dashboard",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    div { class: "dashboard-loading",
                        div { class: "spinner" }
                        p { "Loading..." }
                    }
                },
                ViewState::Error(ViewError::SignedOut) => rsx! {
                    p { class: "dashboard-message", "{ViewError::SignedOut.message()}" }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "dashboard-message",
                        p { "{err.message()}" }
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
                ViewState::Ready(screen) => {
                    let user = screen.user;
                    let load = screen.load;
                    let is_favorite =
                        |id: ContentId, loaded: bool| overrides.resolve(load, id, loaded);
                    rsx! {
                        DashboardHeader {
                            user_name: screen.vm.user_name.clone(),
                            on_sign_out: move |_| on_sign_out.call(()),
                        }
                        if screen.vm.is_empty() {
                            div { class: "dashboard-message dashboard-empty",
                                h2 { "No titles yet" }
                                p { "New movies and series will show up here as soon as they are added." }
                            }
                        } else {
                            if let Some(hero) = screen.vm.hero.clone() {
                                Hero {
                                    is_favorite: is_favorite(hero.id, hero.is_favorite),
                                    on_toggle_favorite: move |id| on_toggle_favorite.call((load, user, id)),
                                    hero,
                                }
                            }
                            div { class: "rows",
                                for row in screen.vm.rows.iter().cloned() {
                                    ContentRow {
                                        key: "{row.key}",
                                        favorites: row
                                            .cards
                                            .iter()
                                            .map(|card| is_favorite(card.id, card.is_favorite))
                                            .collect::<Vec<_>>(),
                                        on_toggle_favorite: move |id| on_toggle_favorite.call((load, user, id)),
                                        row,
                                    }
                                }
                            }
                        }
                        SiteFooter {}
                    }
                }
            }
        }
    }
}

#[component]
fn DashboardHeader(user_name: String, on_sign_out: EventHandler<()>) -> Element {
    rsx! {
        header { class: "site-header dashboard-header",
            div { class: "header-left",
                Link { class: "brand", to: Route::Dashboard {}, "CineStream" }
                nav { class: "header-nav",
                    span { class: "active", "Home" }
                    span { "Series" }
                    span { "Movies" }
                    span { "My List" }
                }
            }
            div { class: "header-right",
                span { class: "user-name", "{user_name}" }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_sign_out.call(()),
                    "Sign Out"
                }
            }
        }
    }
}

#[component]
fn Hero(hero: HeroVm, is_favorite: bool, on_toggle_favorite: EventHandler<ContentId>) -> Element {
    let id = hero.id;
    rsx! {
        section {
            class: "hero",
            style: "background-image: url('{hero.image_url}')",
            div { class: "hero-shade" }
            div { class: "hero-content",
                h2 { class: "hero-title", "{hero.title}" }
                div { class: "hero-meta",
                    if let Some(rating) = hero.rating_label.as_deref() {
                        span { class: "rating", "★ {rating}" }
                    }
                    span { class: "badge", "{hero.kind_label}" }
                    if !hero.meta.is_empty() {
                        span { "{hero.meta}" }
                    }
                }
                if !hero.description.is_empty() {
                    p { class: "hero-description", "{hero.description}" }
                }
                div { class: "hero-actions",
                    button { class: "btn btn-light", r#type: "button", "▶ Play" }
                    FavoriteButton {
                        is_favorite,
                        label: true,
                        on_toggle: move |_| on_toggle_favorite.call(id),
                    }
                }
            }
        }
    }
}

#[component]
fn ContentRow(
    row: ContentRowVm,
    favorites: Vec<bool>,
    on_toggle_favorite: EventHandler<ContentId>,
) -> Element {
    rsx! {
        section { class: "content-row",
            h3 { "{row.title}" }
            div { class: "row-track",
                for (card, is_favorite) in row.cards.iter().cloned().zip(favorites.iter().copied()) {
                    ContentCard {
                        key: "{card.id}",
                        is_favorite,
                        on_toggle_favorite,
                        card,
                    }
                }
            }
        }
    }
}

#[component]
fn ContentCard(
    card: ContentCardVm,
    is_favorite: bool,
    on_toggle_favorite: EventHandler<ContentId>,
) -> Element {
    let id = card.id;
    rsx! {
        article { class: "content-card",
            div { class: "card-media",
                img { src: "{card.image_url}", alt: "{card.title}" }
                span { class: "{card.kind_class}", "{card.kind_label}" }
                if let Some(percent) = card.progress_percent {
                    div { class: "progress", title: "{percent}% watched",
                        div { class: "progress-fill", style: "width: {percent}%" }
                    }
                }
            }
            div { class: "card-body",
                h4 { class: "card-title", "{card.title}" }
                div { class: "card-meta",
                    if let Some(rating) = card.rating_label.as_deref() {
                        span { class: "rating", "★ {rating}" }
                    }
                    if !card.meta.is_empty() {
                        span { "{card.meta}" }
                    }
                }
                FavoriteButton {
                    is_favorite,
                    label: false,
                    on_toggle: move |_| on_toggle_favorite.call(id),
                }
            }
        }
    }
}

#[component]
fn FavoriteButton(is_favorite: bool, label: bool, on_toggle: EventHandler<()>) -> Element {
    let icon = if is_favorite { "♥" } else { "♡" };
    let text = if is_favorite { "In My List" } else { "My List" };
    rsx! {
        button {
            class: if is_favorite { "btn btn-favorite active" } else { "btn btn-favorite" },
            r#type: "button",
            aria_pressed: "{is_favorite}",
            title: "{text}",
            onclick: move |_| on_toggle.call(()),
            "{icon}"
            if label {
                " {text}"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_to_the_load_they_were_made_on() {
        let id = ContentId::new(4);
        let mut overrides = FavoriteOverrides::default();
        overrides.record(1, id, true);

        assert!(overrides.resolve(1, id, false));
        assert!(!overrides.resolve(1, ContentId::new(5), false));
    }

    #[test]
    fn reload_drops_stale_overrides() {
        let id = ContentId::new(4);
        let mut overrides = FavoriteOverrides::default();
        overrides.record(1, id, true);

        assert!(!overrides.resolve(2, id, false));

        overrides.record(2, ContentId::new(5), true);
        assert!(!overrides.resolve(2, id, false));
        assert!(overrides.resolve(2, ContentId::new(5), false));
    }
}
