use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{TopicCardVm, map_topic_card};

#[component]
pub fn HubView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let banks = ctx.banks();
    let progress = ctx.progress();

    use_effect(move || {
        if let Some(topic) = ctx.take_open_topic_on_launch() {
            navigator.replace(Route::Quiz {
                topic: topic.to_string(),
            });
        }
    });

    let resource = use_resource(move || {
        let banks = banks.clone();
        let progress = progress.clone();

        async move {
            let rows = banks.overview(&progress).await.map_err(|err| {
                log::warn!("cannot list test banks: {err}");
                ViewError::Unknown
            })?;
            Ok::<_, ViewError>(rows.iter().map(map_topic_card).collect::<Vec<_>>())
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page hub-page",
            header { class: "view-header",
                h2 { class: "view-title", "Topics" }
                p { class: "view-subtitle", "Pick a test bank. Your last score is kept per topic." }
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
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
                },
                ViewState::Ready(cards) if cards.is_empty() => rsx! {
                    p { class: "hub-empty", "No test banks found." }
                },
                ViewState::Ready(cards) => rsx! {
                    ul { class: "topic-list",
                        for card in cards {
                            TopicCard { key: "{card.topic}", card: card.clone() }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn TopicCard(card: TopicCardVm) -> Element {
    let status_class = if card.complete {
        "topic-status topic-status--complete"
    } else {
        "topic-status"
    };

    rsx! {
        li { class: "topic-card",
            Link {
                to: Route::Quiz { topic: card.topic.clone() },
                class: "topic-link",
                "{card.title}"
            }
            span { class: "topic-count", "{card.questions_label}" }
            span { class: "{status_class}", "{card.score_label}" }
        }
    }
}
