use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;
use crate::views::SiteFooter;

struct Feature {
    icon: &'static str,
    title: &'static str,
    description: &'static str,
}

struct Plan {
    name: &'static str,
    price: &'static str,
    features: [&'static str; 3],
    popular: bool,
}

const FEATURES: [Feature; 4] = [
    Feature {
        icon: "🎬",
        title: "Unlimited Movies",
        description: "Watch thousands of movies in high quality whenever you want",
    },
    Feature {
        icon: "📺",
        title: "Exclusive Series",
        description: "Binge your favorite series without interruptions",
    },
    Feature {
        icon: "✨",
        title: "Always Fresh",
        description: "New titles added every week",
    },
    Feature {
        icon: "🔊",
        title: "Premium Quality",
        description: "4K streaming with surround sound",
    },
];

const PLANS: [Plan; 3] = [
    Plan {
        name: "Basic",
        price: "R$ 19,90",
        features: ["HD available", "1 screen at a time", "No ads"],
        popular: false,
    },
    Plan {
        name: "Standard",
        price: "R$ 29,90",
        features: ["Full HD available", "2 screens at a time", "Unlimited downloads"],
        popular: true,
    },
    Plan {
        name: "Premium",
        price: "R$ 39,90",
        features: ["4K + HDR", "4 screens at a time", "Spatial audio"],
        popular: false,
    },
];

#[component]
pub fn LandingView() -> Element {
    let scroll_to_plans = move |_| {
        let _ = document::eval(
            "document.getElementById('plans')?.scrollIntoView({ behavior: 'smooth' })",
        );
    };

    rsx! {
        div { class: "landing",
            section { class: "landing-hero",
                header { class: "site-header",
                    h1 { class: "brand", "CineStream" }
                    Link { class: "btn btn-primary", to: Route::Login {}, "Sign In" }
                }
                div { class: "landing-hero-content",
                    h2 { "Movies, series and more." br {} "No limits." }
                    p { "Watch anywhere. Cancel anytime." }
                    div { class: "landing-actions",
                        Link { class: "btn btn-primary btn-large", to: Route::Login {}, "Get Started" }
                        button {
                            class: "btn btn-ghost btn-large",
                            r#type: "button",
                            onclick: scroll_to_plans,
                            "See Plans"
                        }
                    }
                }
            }

            section { class: "features",
                h2 { "Why choose CineStream?" }
                div { class: "feature-grid",
                    for feature in FEATURES.iter() {
                        div { key: "{feature.title}", class: "feature",
                            span { class: "feature-icon", "{feature.icon}" }
                            h3 { "{feature.title}" }
                            p { "{feature.description}" }
                        }
                    }
                }
            }

            section { id: "plans", class: "plans",
                h2 { "Choose your plan" }
                p { class: "plans-note", "Every plan includes 30 days free" }
                div { class: "plan-grid",
                    for plan in PLANS.iter() {
                        div {
                            key: "{plan.name}",
                            class: if plan.popular { "plan plan-popular" } else { "plan" },
                            if plan.popular {
                                span { class: "plan-tag", "Most popular" }
                            }
                            h3 { "{plan.name}" }
                            p { class: "plan-price",
                                span { "{plan.price}" }
                                span { class: "plan-period", "/month" }
                            }
                            ul {
                                for feature in plan.features.iter() {
                                    li { key: "{feature}", "{feature}" }
                                }
                            }
                            Link { class: "btn btn-primary", to: Route::Login {}, "Subscribe" }
                        }
                    }
                }
            }

            SiteFooter {}
        }
    }
}
