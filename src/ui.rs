use crate::views::ChatView;
use dioxus::prelude::*;

const MAIN_CSS: Asset = asset!("/assets/main.css");

#[component]
pub fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        div { class: "app-shell",
            div { class: "app-frame",
                AppHeader {}
                ChatView {}
            }
        }
    }
}

#[component]
fn AppHeader() -> Element {
    rsx! {
        div { class: "header",
            div { class: "header-content",
                h1 { class: "wordmark", "Finch" }
            }
        }
    }
}
