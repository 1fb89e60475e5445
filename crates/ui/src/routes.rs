use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{HubView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", HubView)] Hub {},
        #[route("/quiz/:topic", QuizView)] Quiz { topic: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            nav { class: "topbar",
                h1 { "Test Bank" }
                Link { to: Route::Hub {}, "All topics" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
