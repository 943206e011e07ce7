use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use geoscope_shared::catalog::{CHARTS, CatalogEntry, ChartKind};
use geoscope_shared::chart::ChartConfig;

use crate::app::{CurrentPage, FONT, Page};
use crate::datasets;
use crate::explorer_view::MapExplorerView;

/// Clickable card on an overview page.
#[component]
pub(crate) fn CatalogCard(
    title: &'static str,
    description: &'static str,
    on_open: Callback<()>,
) -> impl IntoView {
    view! {
        <button
            style=format!("display: flex; flex-direction: column; gap: 6px; width: 280px; padding: 16px; text-align: left; border-radius: 6px; border: 1px solid #2a2e40; background: #1b1f2c; color: #e2e0d8; font-family: {FONT}; cursor: pointer;")
            on:click=move |_| on_open.run(())
        >
            <span style="font-size: 1rem; font-weight: 600;">{title}</span>
            <span style="font-size: 0.85rem; color: #b8b5aa;">{description}</span>
        </button>
    }
}

#[component]
pub fn ChartOverview() -> impl IntoView {
    let CurrentPage(page) = expect_context();

    view! {
        <section style=format!("padding: 24px; font-family: {FONT};")>
            <h1 style="margin: 0 0 16px; font-size: 1.4rem; color: #e2e0d8;">"Charts"</h1>
            <div style="display: flex; flex-wrap: wrap; gap: 12px;">
                {CHARTS.iter().map(|&CatalogEntry { kind, title, description }| view! {
                    <CatalogCard
                        title=title
                        description=description
                        on_open=Callback::new(move |()| page.set(Page::Chart(kind)))
                    />
                }).collect_view()}
            </div>
        </section>
    }
}

fn loading_message(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::FastFoodChains => "Loading fast food chains...",
        ChartKind::CountyPopulation => "Loading population data...",
    }
}

/// Loads one chart's datasets and shows it in the map explorer once ready.
#[component]
pub fn ChartPage(kind: ChartKind) -> impl IntoView {
    let CurrentPage(page) = expect_context();
    let chart: RwSignal<Option<ChartConfig>> = RwSignal::new(None);
    let loading = RwSignal::new(true);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    spawn_local(async move {
        let result = match kind {
            ChartKind::FastFoodChains => datasets::load_fast_food_chart().await,
            ChartKind::CountyPopulation => datasets::load_county_chart().await,
        };
        match result {
            Ok(loaded) => {
                error.set(None);
                chart.set(Some(loaded));
            }
            Err(e) => {
                tracing::warn!(?kind, error = %e, "chart failed to load");
                error.set(Some(e));
            }
        }
        loading.set(false);
    });

    let on_back = Callback::new(move |()| page.set(Page::Charts));

    view! {
        {move || loading.get().then(|| view! {
            <div style=format!("padding: 20px; background: #f0f0f0; color: #333; font-family: {FONT};")>
                {loading_message(kind)}
            </div>
        })}
        {move || error.get().map(|message| view! {
            <div style=format!("margin: 20px; padding: 16px; border-radius: 6px; background: #ffe6e6; color: #d00; font-family: {FONT};")>
                <strong>"Error"</strong>
                <p style="margin: 6px 0 12px;">{message}</p>
                <button
                    style="padding: 5px 12px; border-radius: 4px; border: 1px solid #d00; background: transparent; color: #d00; cursor: pointer;"
                    on:click=move |_| on_back.run(())
                >
                    "Back"
                </button>
            </div>
        })}
        {move || chart.get().map(|chart| view! { <MapExplorerView chart=chart on_back=on_back /> })}
    }
}
