use leptos::prelude::*;

use geoscope_shared::catalog::{ChartKind, GameKind};

use crate::charts::{ChartOverview, ChartPage};
use crate::games::{CountryGuesserGame, GamesOverview};

pub(crate) const FONT: &str = "'Inter', system-ui, sans-serif";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Page {
    Charts,
    Chart(ChartKind),
    Games,
    Game(GameKind),
}

impl Page {
    fn in_games(self) -> bool {
        matches!(self, Page::Games | Page::Game(_))
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CurrentPage(pub RwSignal<Page>);

fn nav_style(active: bool) -> String {
    format!(
        "padding: 6px 14px; border-radius: 4px; border: 1px solid {}; background: {}; color: #e2e0d8; font-family: {FONT}; font-size: 0.85rem; cursor: pointer;",
        if active { "#f5c542" } else { "#2a2e40" },
        if active { "#232738" } else { "transparent" },
    )
}

#[component]
pub fn App() -> impl IntoView {
    let page = RwSignal::new(Page::Charts);
    provide_context(CurrentPage(page));

    Effect::new(move || {
        tracing::debug!(page = ?page.get(), "page changed");
    });

    view! {
        <div style="position: fixed; inset: 0; display: flex; flex-direction: column; background: #0f1119;">
            <nav style="display: flex; align-items: center; gap: 8px; height: 48px; padding: 0 16px; flex-shrink: 0; background: #13161f; border-bottom: 1px solid #2a2e40;">
                <span style=format!("margin-right: 12px; font-weight: 700; color: #f5c542; font-family: {FONT};")>
                    "geoscope"
                </span>
                <button
                    style=move || nav_style(!page.get().in_games())
                    on:click=move |_| page.set(Page::Charts)
                >
                    "Charts"
                </button>
                <button
                    style=move || nav_style(page.get().in_games())
                    on:click=move |_| page.set(Page::Games)
                >
                    "Games"
                </button>
            </nav>
            <main style="position: relative; flex: 1; overflow: hidden;">
                {move || match page.get() {
                    Page::Charts => view! { <ChartOverview /> }.into_any(),
                    Page::Chart(kind) => view! { <ChartPage kind=kind /> }.into_any(),
                    Page::Games => view! { <GamesOverview /> }.into_any(),
                    Page::Game(GameKind::CountryGuesser) => view! { <CountryGuesserGame /> }.into_any(),
                }}
            </main>
        </div>
    }
}
