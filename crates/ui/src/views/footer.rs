use dioxus::prelude::*;

const COLUMNS: [(&str, [&str; 2]); 4] = [
    ("Company", ["About us", "Careers"]),
    ("Help", ["Help Center", "Contact us"]),
    ("Legal", ["Privacy", "Terms of use"]),
    ("Social", ["Instagram", "Twitter"]),
];

#[component]
pub fn SiteFooter() -> Element {
    rsx! {
        footer { class: "site-footer",
            div { class: "footer-columns",
                for (heading, links) in COLUMNS.iter() {
                    div { key: "{heading}", class: "footer-column",
                        h4 { "{heading}" }
                        ul {
                            for link in links.iter() {
                                li { key: "{link}", "{link}" }
                            }
                        }
                    }
                }
            }
            p { class: "footer-copy", "© 2024 CineStream. All rights reserved." }
        }
    }
}
