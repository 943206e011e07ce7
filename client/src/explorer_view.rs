use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use geoscope_shared::chart::{ChartConfig, ChartIdea, ChartSource};
use geoscope_shared::config::MAP_CONTAINER_ID;
use geoscope_shared::data_point::{DataPoint, DataPointId};
use geoscope_shared::explorer::{BackOutcome, MapExplorer, ViewMode};
use geoscope_shared::surface::{EventSink, MapAdapter, MapEvent};

use crate::app::FONT;
use crate::leaflet::LeafletBackend;

const PANEL_WIDTH: f64 = 340.0;

/// Live Leaflet map plus the coordinator driving it. One per mounted explorer page.
struct ExplorerHost {
    adapter: MapAdapter<LeafletBackend>,
    explorer: MapExplorer,
}

thread_local! {
    static EXPLORER_HOST: RefCell<Option<ExplorerHost>> = const { RefCell::new(None) };
}

fn with_host<R>(f: impl FnOnce(&mut ExplorerHost) -> R) -> Option<R> {
    EXPLORER_HOST.with(|slot| slot.borrow_mut().as_mut().map(f))
}

fn release_host() {
    let host = EXPLORER_HOST.with(|slot| slot.borrow_mut().take());
    if let Some(mut host) = host {
        host.explorer.teardown(&mut host.adapter);
        host.adapter.destroy();
    }
}

fn mount_host(chart: ChartConfig, events: EventSink, selected: RwSignal<Option<DataPointId>>) {
    release_host();
    let options = chart.map_options.clone();
    let mut explorer = MapExplorer::new(chart).with_selection_callback(move |point: &DataPoint| {
        tracing::debug!(id = point.id, name = %point.name, "selection changed");
        selected.set(Some(point.id));
    });
    let mut adapter = MapAdapter::new(LeafletBackend);
    // Without a map the panel still works; every surface call is a no-op.
    if adapter.create(MAP_CONTAINER_ID, &options, events).is_some() {
        explorer.render(&mut adapter);
    }
    EXPLORER_HOST.with(|slot| *slot.borrow_mut() = Some(ExplorerHost { adapter, explorer }));
}

fn row_style(active: bool) -> String {
    format!(
        "display: flex; align-items: center; justify-content: space-between; gap: 10px; padding: 9px 10px; border-radius: 4px; cursor: pointer; transition: background 0.15s; background: {}; border-left: 3px solid {};",
        if active { "#232738" } else { "transparent" },
        if active { "#f5c542" } else { "transparent" },
    )
}

#[component]
fn DataPointRow(
    point: DataPoint,
    selected: RwSignal<Option<DataPointId>>,
    on_select: Callback<DataPointId>,
) -> impl IntoView {
    let id = point.id;
    let is_active = move || selected.get() == Some(id);
    let value = point.value.map(|value| value.to_string());

    view! {
        <li style=move || row_style(is_active()) on:click=move |_| on_select.run(id)>
            <div style="display: flex; flex-direction: column; gap: 2px;">
                <span style="font-size: 0.9rem; color: #e2e0d8;">{point.name}</span>
                {point.caption.map(|caption| view! {
                    <span style="font-size: 0.75rem; color: #787470;">{caption}</span>
                })}
            </div>
            {value.map(|value| view! {
                <span style="font-size: 0.78rem; font-weight: 600; padding: 2px 8px; border-radius: 10px; background: #2a2e40; color: #f5c542; white-space: nowrap;">
                    {value}
                </span>
            })}
        </li>
    }
}

fn section_heading(label: &'static str) -> impl IntoView {
    view! {
        <h3 style="margin: 18px 0 8px; font-size: 0.72rem; letter-spacing: 0.08em; text-transform: uppercase; color: #787470;">
            {label}
        </h3>
    }
}

fn ideas_list(ideas: Vec<ChartIdea>) -> impl IntoView {
    (!ideas.is_empty()).then(|| {
        view! {
            {section_heading("Ideas")}
            <ul style="margin: 0; padding-left: 18px; color: #e2e0d8; font-size: 0.85rem;">
                {ideas.into_iter().map(|idea| match idea.url {
                    Some(url) => view! {
                        <li><a href=url target="_blank" rel="noopener noreferrer" style="color: #a88cc8;">{idea.name}</a></li>
                    }.into_any(),
                    None => view! { <li>{idea.name}</li> }.into_any(),
                }).collect_view()}
            </ul>
        }
    })
}

fn sources_list(sources: Vec<ChartSource>) -> impl IntoView {
    (!sources.is_empty()).then(|| {
        view! {
            {section_heading("Sources")}
            <ul style="margin: 0; padding-left: 18px; font-size: 0.85rem;">
                {sources.into_iter().map(|source| view! {
                    <li>
                        <a href=source.url target="_blank" rel="noopener noreferrer" style="color: #a88cc8;">
                            {source.name}
                        </a>
                    </li>
                }).collect_view()}
            </ul>
        }
    })
}

#[derive(Clone)]
struct PanelContent {
    title: String,
    description: String,
    ideas: Vec<ChartIdea>,
    sources: Vec<ChartSource>,
    data_points: Vec<DataPoint>,
}

impl PanelContent {
    fn from_chart(chart: &ChartConfig) -> Self {
        Self {
            title: chart.title.clone(),
            description: chart.description.clone(),
            ideas: chart.ideas.clone(),
            sources: chart.sources.clone(),
            data_points: chart.data_points.clone(),
        }
    }
}

fn detail_panel(
    content: PanelContent,
    selected: RwSignal<Option<DataPointId>>,
    on_select: Callback<DataPointId>,
) -> impl IntoView {
    let points = if content.data_points.is_empty() {
        view! {
            <p style="font-size: 0.85rem; color: #787470;">"No data points available"</p>
        }
        .into_any()
    } else {
        view! {
            <ul style="list-style: none; margin: 0; padding: 0; display: flex; flex-direction: column; gap: 2px;">
                {content.data_points.into_iter().map(|point| view! {
                    <DataPointRow point=point selected=selected on_select=on_select />
                }).collect_view()}
            </ul>
        }
        .into_any()
    };

    view! {
        <div>
            <h2 style="margin: 0 0 6px; font-size: 1.15rem; color: #e2e0d8;">{content.title}</h2>
            <p style="margin: 0; font-size: 0.85rem; color: #b8b5aa;">{content.description}</p>
            {ideas_list(content.ideas)}
            {sources_list(content.sources)}
            {section_heading("Data Points")}
            {points}
        </div>
    }
}

fn overview_panel() -> impl IntoView {
    view! {
        <div>
            <h2 style="margin: 0 0 12px; font-size: 1.15rem; color: #e2e0d8;">"Chart Overview"</h2>
            <div style="padding: 12px; border-radius: 6px; background: #1b1f2c; border: 1px solid #2a2e40;">
                <h3 style="margin: 0 0 6px; font-size: 0.95rem; color: #e2e0d8;">"Available Charts"</h3>
                <p style="margin: 0; font-size: 0.85rem; color: #b8b5aa;">
                    "This is where you can add different chart views and visualizations."
                </p>
            </div>
        </div>
    }
}

/// Side panel plus Leaflet map for one chart. `on_back` fires when back leaves the chart.
#[component]
pub fn MapExplorerView(chart: ChartConfig, on_back: Callback<()>) -> impl IntoView {
    let selected: RwSignal<Option<DataPointId>> = RwSignal::new(None);
    let view_mode = RwSignal::new(ViewMode::Detail);
    let pending_events: RwSignal<Vec<MapEvent>> = RwSignal::new(Vec::new());
    let content = PanelContent::from_chart(&chart);

    // The map container only exists after the first render, so mount from an effect.
    let mut unmounted = Some(chart);
    Effect::new(move || {
        let Some(chart) = unmounted.take() else {
            return;
        };
        let events: EventSink = Rc::new(move |event: MapEvent| {
            pending_events.update(|queue| queue.push(event));
        });
        mount_host(chart, events, selected);
    });

    // Clicks are queued by the map and dispatched here, never while the host is borrowed.
    Effect::new(move || {
        let events = pending_events.get();
        if events.is_empty() {
            return;
        }
        pending_events.set(Vec::new());
        with_host(|host| {
            for event in events {
                host.explorer.handle_map_event(&mut host.adapter, event);
            }
        });
    });

    on_cleanup(release_host);

    let on_select = Callback::new(move |id: DataPointId| {
        with_host(|host| host.explorer.select_from_panel(&mut host.adapter, id));
    });

    let on_back_click = move |_| {
        let outcome = with_host(|host| host.explorer.handle_back(&mut host.adapter));
        selected.set(None);
        match outcome {
            Some(BackOutcome::ShowDetail) => view_mode.set(ViewMode::Detail),
            Some(BackOutcome::Exit) | None => on_back.run(()),
        }
    };

    let on_overview_click = move |_| {
        with_host(|host| host.explorer.show_overview());
        view_mode.set(ViewMode::Overview);
    };

    view! {
        <div style="position: absolute; inset: 0; display: flex;">
            <aside style=format!(
                "width: {PANEL_WIDTH}px; flex-shrink: 0; overflow-y: auto; padding: 16px; box-sizing: border-box; background: #13161f; border-right: 1px solid #2a2e40; font-family: {FONT};"
            )>
                <div style="display: flex; justify-content: space-between; margin-bottom: 14px;">
                    <button
                        style="padding: 5px 12px; border-radius: 4px; border: 1px solid #2a2e40; background: #1b1f2c; color: #e2e0d8; cursor: pointer;"
                        on:click=on_back_click
                    >
                        "Back"
                    </button>
                    <Show when=move || view_mode.get() == ViewMode::Detail>
                        <button
                            style="padding: 5px 12px; border-radius: 4px; border: 1px solid #2a2e40; background: #1b1f2c; color: #e2e0d8; cursor: pointer;"
                            on:click=on_overview_click
                        >
                            "Overview"
                        </button>
                    </Show>
                </div>
                {move || match view_mode.get() {
                    ViewMode::Detail => detail_panel(content.clone(), selected, on_select).into_any(),
                    ViewMode::Overview => overview_panel().into_any(),
                }}
            </aside>
            <div id=MAP_CONTAINER_ID style="flex: 1; height: 100%;" />
        </div>
    }
}
