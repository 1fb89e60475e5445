use dioxus::document::eval;
use dioxus::prelude::*;
use futures_util::StreamExt;

use services::{BankServiceError, PersistRequest, QuizController};
use testbank_core::TestBank;
use testbank_core::model::{BlockId, OptionToken, TopicSlug};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{QuestionBlockVm, map_quiz_page};

const SCROLL_TO_TOP_JS: &str = "window.scrollTo({ top: 0, behavior: 'smooth' });";

fn view_error(err: &BankServiceError) -> ViewError {
    match err {
        BankServiceError::NotFound(_) | BankServiceError::InvalidTopic(_) => ViewError::NotFound,
        BankServiceError::Bank { .. } => ViewError::InvalidBank,
        _ => ViewError::Unknown,
    }
}

#[component]
pub fn QuizView(topic: String) -> Element {
    let ctx = use_context::<AppContext>();
    let banks = ctx.banks();

    let resource = use_resource(use_reactive!(|(topic,)| {
        let banks = banks.clone();
        async move {
            let topic = TopicSlug::new(topic).map_err(|_| ViewError::NotFound)?;
            banks.load(&topic).map_err(|err| {
                log::warn!("cannot open {topic}: {err}");
                view_error(&err)
            })
        }
    }));

    let state = view_state_from_resource(&resource);

    rsx! {
        match state {
            ViewState::Idle => rsx! {
                div { class: "page", p { "Idle" } }
            },
            ViewState::Loading => rsx! {
                div { class: "page", p { "Loading..." } }
            },
            ViewState::Error(err) => rsx! {
                div { class: "page quiz-page",
                    p { class: "quiz-error", "{err.message()}" }
                }
            },
            ViewState::Ready(bank) => rsx! {
                QuizPage { key: "{topic}", bank }
            },
        }
    }
}

#[component]
fn QuizPage(bank: TestBank) -> Element {
    let ctx = use_context::<AppContext>();
    let progress = ctx.progress();
    let controller = use_signal(move || QuizController::initialize(bank.clone(), progress));

    // Writes are applied in order, one at a time.
    let persist = use_coroutine(|mut requests: UnboundedReceiver<PersistRequest>| async move {
        while let Some(request) = requests.next().await {
            request.run().await;
        }
    });

    let select = use_callback(move |(block, token): (u64, String)| {
        let mut controller = controller;
        let (_result, request) = controller
            .write()
            .apply_selection(BlockId::new(block), &OptionToken::new(token));
        if let Some(request) = request {
            persist.send(request);
        }
    });

    let reveal = use_callback(move |block: u64| {
        let mut controller = controller;
        controller.write().reveal_answer(BlockId::new(block));
    });

    let reset = use_callback(move |()| {
        let mut controller = controller;
        let (_display, request) = controller.write().apply_reset();
        persist.send(request);
        let _ = eval(SCROLL_TO_TOP_JS);
    });

    let page = {
        let quiz = controller.read();
        map_quiz_page(quiz.session(), quiz.score_display())
    };

    let summary = page.final_score.clone().map(|final_score| {
        rsx! {
            section { class: "score-summary", id: "scoreSummary",
                h3 { "All questions answered" }
                p { "Final score: "
                    span { id: "finalScore", "{final_score}" }
                }
            }
        }
    });

    rsx! {
        div { class: "page quiz-page", id: "quiz-top",
            header { class: "view-header quiz-header",
                h2 { class: "view-title", "{page.title}" }
                span { class: "score-pill", id: "scorePill", "{page.pill}" }
            }
            for block in page.blocks {
                QuestionCard {
                    key: "{block.id}",
                    block: block.clone(),
                    on_select: select,
                    on_reveal: reveal,
                }
            }
            {summary}
            div { class: "quiz-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| reset.call(()),
                    "Reset all"
                }
            }
        }
    }
}

#[component]
fn QuestionCard(
    block: QuestionBlockVm,
    on_select: EventHandler<(u64, String)>,
    on_reveal: EventHandler<u64>,
) -> Element {
    let block_id = block.id;
    let answer_class = if block.explanation_visible {
        "q-answer visible"
    } else {
        "q-answer"
    };

    let options = block.options.iter().map(|option| {
        let token = option.token.clone();
        rsx! {
            li {
                key: "{option.token}",
                class: "{option.class}",
                "aria-disabled": "{option.disabled}",
                onclick: move |_| on_select.call((block_id, token.clone())),
                span { class: "q-token", "{option.token}" }
                span { class: "q-text", "{option.text}" }
            }
        }
    });

    let reveal_button = block.reveal_visible.then(|| {
        rsx! {
            button {
                class: "btn btn-link q-reveal-btn",
                r#type: "button",
                onclick: move |_| on_reveal.call(block_id),
                "Show answer"
            }
        }
    });

    rsx! {
        article { class: "{block.class}", id: "q-{block.number}",
            h3 { class: "q-prompt", "{block.number}. {block.prompt}" }
            ul { class: "q-options", {options} }
            {reveal_button}
            div { class: "{answer_class}", dangerous_inner_html: "{block.explanation_html}" }
        }
    }
}
