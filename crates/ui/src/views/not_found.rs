use dioxus::prelude::*;
use dioxus_router::Link;

use crate::routes::Route;

#[component]
pub fn NotFoundView(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    rsx! {
        div { class: "not-found",
            h2 { "Page not found" }
            p { "Nothing lives at {path}." }
            Link { class: "btn btn-primary", to: Route::Dashboard {}, "Back to CineStream" }
        }
    }
}
