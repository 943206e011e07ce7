use std::str::FromStr;

use leptos::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use geoscope_shared::catalog::{CatalogEntry, GAMES};
use geoscope_shared::geojson::FeatureCollection;
use geoscope_shared::quiz::{Answer, CountryGuesser, QuizMode, QuizStatus};

use crate::app::{CurrentPage, FONT, Page};
use crate::charts::CatalogCard;
use crate::datasets;
use crate::globe::CountryGlobe;

const GLOBE_CREDIT_URL: &str = "https://github.com/vasturiano/react-globe.gl";
const BUTTON_STYLE: &str = "padding: 6px 14px; border-radius: 4px; border: 1px solid #2a2e40; background: #232738; color: #e2e0d8; cursor: pointer; font-size: 0.85rem;";

#[component]
pub fn GamesOverview() -> impl IntoView {
    let CurrentPage(page) = expect_context();

    view! {
        <section style=format!("padding: 24px; font-family: {FONT};")>
            <h1 style="margin: 0 0 16px; font-size: 1.4rem; color: #e2e0d8;">"Games"</h1>
            <div style="display: flex; flex-wrap: wrap; gap: 12px;">
                {GAMES.iter().map(|&CatalogEntry { kind, title, description }| view! {
                    <CatalogCard
                        title=title
                        description=description
                        on_open=Callback::new(move |()| page.set(Page::Game(kind)))
                    />
                }).collect_view()}
            </div>
        </section>
    }
}

fn start_quiz(quiz: RwSignal<CountryGuesser>, error: RwSignal<Option<String>>) {
    let mut rng = StdRng::from_entropy();
    quiz.update(|quiz| {
        if let Err(e) = quiz.start(&mut rng) {
            tracing::warn!(error = %e, "quiz could not start");
            error.set(Some(e.to_string()));
        }
    });
}

fn answer_feedback(answer: &Answer) -> AnyView {
    match answer {
        Answer::Correct { .. } => view! {
            <p style="margin: 0; font-weight: 600; color: #6fcf7a;">"Correct"</p>
        }
        .into_any(),
        Answer::Wrong { clicked } => view! {
            <p style="margin: 0; font-weight: 600; color: #e06c6c;">"Wrong"</p>
            <p style="margin: 0; font-size: 0.85rem; color: #b8b5aa;">
                "You clicked on " {clicked.clone()}
            </p>
        }
        .into_any(),
    }
}

fn not_started_panel(
    quiz: RwSignal<CountryGuesser>,
    error: RwSignal<Option<String>>,
    mode: QuizMode,
) -> AnyView {
    let on_mode_change = move |e: leptos::ev::Event| {
        let Some(target) = e.target() else {
            return;
        };
        let Ok(select) = target.dyn_into::<web_sys::HtmlSelectElement>() else {
            return;
        };
        match QuizMode::from_str(&select.value()) {
            Ok(mode) => quiz.update(|quiz| quiz.set_mode(mode)),
            Err(e) => tracing::debug!(error = %e, "ignoring quiz mode"),
        }
    };

    view! {
        <h2 style="margin: 0; font-size: 1.2rem;">"Country Guesser"</h2>
        <p style="margin: 0; font-size: 0.85rem; color: #b8b5aa;">
            "Do you know shapes of countries? Challenge yourself by clicking on correct country"
        </p>
        <label style="display: flex; flex-direction: column; gap: 4px; font-size: 0.8rem; color: #9a9590;">
            "Select mode"
            <select
                on:change=on_mode_change
                style="background: #1a1d2a; border: 1px solid #282c3e; border-radius: 4px; color: #e2e0d8; font-size: 0.85rem; padding: 4px 6px; outline: none;"
            >
                {QuizMode::ALL.iter().map(|&option| view! {
                    <option value=option.value() selected={option == mode}>{option.label()}</option>
                }).collect_view()}
            </select>
        </label>
        <button style=BUTTON_STYLE on:click=move |_| start_quiz(quiz, error)>"Start"</button>
    }
    .into_any()
}

fn completed_panel(
    quiz: RwSignal<CountryGuesser>,
    error: RwSignal<Option<String>>,
    correct: usize,
    total: usize,
) -> AnyView {
    view! {
        <h2 style="margin: 0; font-size: 1.2rem;">"Finished!"</h2>
        <p style="margin: 0; font-size: 0.95rem;">{format!("{correct} / {total} correct")}</p>
        <button style=BUTTON_STYLE on:click=move |_| start_quiz(quiz, error)>"Restart"</button>
    }
    .into_any()
}

fn started_panel(quiz: RwSignal<CountryGuesser>, state: &CountryGuesser) -> AnyView {
    let progress = format!("{} / {}", state.question_number(), state.total());
    let score = format!("Correct: {}", state.correct());
    let target = state
        .current_question()
        .map(|question| question.answer.clone())
        .unwrap_or_default();
    let next_label = if state.is_last_question() { "Finish" } else { "Next" };
    let next = move |_| quiz.update(CountryGuesser::next_question);

    let prompt = match state.pending() {
        None => view! {
            <p style="margin: 0; font-size: 0.95rem;">"Click on " <b>{target}</b></p>
            <button style=BUTTON_STYLE on:click=next>"Skip"</button>
        }
        .into_any(),
        Some(answer) => view! {
            {answer_feedback(answer)}
            <button style=BUTTON_STYLE on:click=next>{next_label}</button>
        }
        .into_any(),
    };

    view! {
        <div style="display: flex; justify-content: space-between; font-size: 0.8rem; color: #9a9590;">
            <span>{progress}</span>
            <span>{score}</span>
        </div>
        {prompt}
        <button style=BUTTON_STYLE on:click=move |_| quiz.update(CountryGuesser::quit)>"Quit"</button>
    }
    .into_any()
}

/// Globe plus quiz controls. Country clicks are graded against the current question.
#[component]
pub fn CountryGuesserGame() -> impl IntoView {
    let countries: RwSignal<Option<FeatureCollection>> = RwSignal::new(None);
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);
    let quiz = RwSignal::new(CountryGuesser::default());

    spawn_local(async move {
        match datasets::load_world_countries().await {
            Ok(world) => {
                let pool = world.country_names();
                tracing::info!(candidates = pool.len(), "country guesser ready");
                quiz.update(|quiz| quiz.set_pool(pool));
                countries.set(Some(world.renderable_countries()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "world countries failed to load");
                error.set(Some(e));
            }
        }
        loading.set(false);
    });

    let on_country_click = Callback::new(move |name: String| {
        quiz.update(|quiz| {
            if quiz.answer(&name).is_none() {
                tracing::debug!(name = %name, "click ignored");
            }
        });
    });

    let panel = move || {
        quiz.with(|state| match state.status() {
            QuizStatus::NotStarted => not_started_panel(quiz, error, state.mode()),
            QuizStatus::Started => started_panel(quiz, state),
            QuizStatus::Completed => completed_panel(quiz, error, state.correct(), state.total()),
        })
    };

    view! {
        {move || countries.get().map(|world| view! {
            <CountryGlobe countries=world on_country_click=on_country_click />
        })}
        <div style=format!("position: absolute; top: 16px; left: 16px; width: 280px; display: flex; flex-direction: column; gap: 10px; padding: 16px; border-radius: 6px; background: rgba(19, 22, 31, 0.92); border: 1px solid #2a2e40; color: #e2e0d8; font-family: {FONT};")>
            {move || loading.get().then(|| view! {
                <p style="margin: 0; font-size: 0.85rem; color: #9a9590;">"Loading countries..."</p>
            })}
            {move || error.get().map(|message| view! {
                <p style="margin: 0; padding: 8px; border-radius: 4px; background: #ffe6e6; color: #d00; font-size: 0.85rem;">
                    {message}
                </p>
            })}
            {panel}
        </div>
        <p style=format!("position: absolute; bottom: 8px; left: 16px; margin: 0; font-size: 0.72rem; color: #9a9590; font-family: {FONT};")>
            "Globe component, countries dataset and assets provided by "
            <a
                href=GLOBE_CREDIT_URL
                target="_blank"
                rel="noopener noreferrer"
                style="color: #a88cc8; text-decoration: underline;"
            >
                "React globe-gl"
            </a>
        </p>
    }
}
