//! Yew front end for the generative-model timeline explorer.

#[cfg(target_arch = "wasm32")]
mod styles;

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use std::rc::Rc;

    use crate::styles;
    use genmodel_core::present::{
        detail_rows, hover_text, node_label, sidebar_rows, DetailValue, DETAIL_LABELS,
        MODEL_TYPE_LEGEND,
    };
    use genmodel_core::{
        Button, ChartConfig, Effect, Explorer, InputEvent as ExplorerEvent, Key, ModelRecord,
        TickKind,
    };
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{console, Document, Element, HtmlElement, HtmlInputElement, Window};
    use yew::prelude::*;
    use yew::TargetCast;

    /// Explorer plus the effects of the last transition, which the view
    /// applies after rendering.
    #[derive(Clone, PartialEq)]
    struct ExplorerState {
        explorer: Explorer,
        effects: Vec<Effect>,
        generation: u64,
    }

    impl Reducible for ExplorerState {
        type Action = ExplorerEvent;

        fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
            let mut explorer = self.explorer.clone();
            let outcome = explorer.handle(action);
            if !outcome.changed && outcome.effects.is_empty() {
                return self;
            }
            Rc::new(Self {
                explorer,
                effects: outcome.effects,
                generation: self.generation + 1,
            })
        }
    }

    type Dispatch = UseReducerDispatcher<ExplorerState>;

    #[derive(Properties, PartialEq)]
    pub struct ExplorerViewProps {
        pub explorer: Explorer,
    }

    #[function_component(ExplorerView)]
    fn explorer_view(props: &ExplorerViewProps) -> Html {
        let state = {
            let explorer = props.explorer.clone();
            use_reducer_eq(move || ExplorerState {
                explorer,
                effects: Vec::new(),
                generation: 0,
            })
        };
        let dispatch = state.dispatcher();
        let board_ref = use_node_ref();
        let search_ref = use_node_ref();

        {
            let board_ref = board_ref.clone();
            let dispatch = dispatch.clone();
            use_effect_with((), move |_| {
                if let Some(document) = web_sys::window().and_then(|window| window.document()) {
                    if let Err(err) = styles::ensure_styles(&document) {
                        console::error_1(&err);
                    }
                }
                let report_width = move || {
                    if let Some(board) = board_ref.cast::<Element>() {
                        dispatch.dispatch(ExplorerEvent::Resize {
                            width: f64::from(board.client_width()),
                        });
                    }
                };
                report_width();

                let window = web_sys::window();
                let listener = Closure::<dyn Fn()>::new(report_width);
                if let Some(window) = window.as_ref() {
                    if let Err(err) = window
                        .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
                    {
                        console::error_1(&err);
                    }
                }
                move || {
                    if let Some(window) = window {
                        let _ = window.remove_event_listener_with_callback(
                            "resize",
                            listener.as_ref().unchecked_ref(),
                        );
                    }
                }
            });
        }

        {
            let board_ref = board_ref.clone();
            let search_ref = search_ref.clone();
            let effects = state.effects.clone();
            use_effect_with(state.generation, move |_| {
                for effect in effects {
                    match effect {
                        Effect::ScrollTo { offset } => {
                            if let Some(board) = board_ref.cast::<Element>() {
                                board.set_scroll_left(offset.round() as i32);
                            }
                        }
                        Effect::FocusSearch => {
                            if let Some(input) = search_ref.cast::<HtmlElement>() {
                                let _ = input.focus();
                            }
                        }
                    }
                }
                || ()
            });
        }

        let explorer = &state.explorer;
        let selection = &explorer.view().selection;

        let on_keydown = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: KeyboardEvent| {
                let text_input_focused = event
                    .target_dyn_into::<Element>()
                    .map(|target| matches!(target.tag_name().as_str(), "INPUT" | "TEXTAREA"))
                    .unwrap_or(false);
                let key = Key::from(event.key().as_str());
                if !text_input_focused && key == Key::Char('/') {
                    event.prevent_default();
                }
                dispatch.dispatch(ExplorerEvent::Key {
                    key,
                    text_input_focused,
                });
            })
        };

        let on_backdrop = {
            let dispatch = dispatch.clone();
            Callback::from(move |_: MouseEvent| dispatch.dispatch(ExplorerEvent::Backdrop))
        };

        html! {
            <div class="genmodel-root" tabindex="0" onkeydown={on_keydown}>
                { render_controls(explorer, &dispatch) }
                <div class="genmodel-body">
                    { render_sidebar(explorer, &dispatch, search_ref.clone()) }
                    { render_board(explorer, &dispatch, board_ref.clone()) }
                </div>
                { render_legend() }
                {
                    if let Some(record) = explorer.open_record() {
                        render_detail(record, &dispatch, on_backdrop.clone())
                    } else {
                        html! {}
                    }
                }
                {
                    if selection.comparison_visible {
                        render_comparison(&explorer.comparison_rows(), &dispatch, on_backdrop.clone())
                    } else {
                        html! {}
                    }
                }
                {
                    if explorer.view().help_visible {
                        render_help(&dispatch, on_backdrop.clone())
                    } else {
                        html! {}
                    }
                }
                {
                    match explorer.view().enlarged_image.as_deref() {
                        Some(url) => render_enlarged_image(url, &dispatch),
                        None => html! {},
                    }
                }
            </div>
        }
    }

    fn button_callback(dispatch: &Dispatch, button: Button) -> Callback<MouseEvent> {
        let dispatch = dispatch.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            dispatch.dispatch(ExplorerEvent::Button { button });
        })
    }

    fn render_controls(explorer: &Explorer, dispatch: &Dispatch) -> Html {
        let selection = &explorer.view().selection;
        let compare_class = classes!(
            "control-button",
            selection.compare_mode.then_some("is-active")
        );
        let compare_ready =
            selection.compare_mode && selection.can_compare() && !selection.comparison_visible;

        html! {
            <header class="genmodel-controls">
                <button
                    type="button"
                    class={compare_class}
                    aria-pressed={selection.compare_mode.to_string()}
                    onclick={button_callback(dispatch, Button::ToggleCompare)}
                >
                    {"Comparison Mode"}
                </button>
                {
                    if compare_ready {
                        html! {
                            <button
                                type="button"
                                class="control-button is-primary"
                                onclick={button_callback(dispatch, Button::Compare)}
                            >
                                { format!("Compare ({})", selection.selected_ids.len()) }
                            </button>
                        }
                    } else {
                        html! {}
                    }
                }
                <button
                    type="button"
                    class="control-button"
                    onclick={button_callback(dispatch, Button::Reset)}
                >
                    {"Reset"}
                </button>
                <button
                    type="button"
                    class="control-button"
                    onclick={button_callback(dispatch, Button::Help)}
                >
                    {"Why / How to Use?"}
                </button>
            </header>
        }
    }

    fn render_sidebar(explorer: &Explorer, dispatch: &Dispatch, search_ref: NodeRef) -> Html {
        let view = explorer.view();
        let toggle = html! {
            <button
                type="button"
                class="sidebar-toggle"
                aria-label="Toggle model list"
                onclick={button_callback(dispatch, Button::ToggleSidebar)}
            >
                { if view.sidebar_minimized { "»" } else { "«" } }
            </button>
        };
        if view.sidebar_minimized {
            return html! { <aside class="genmodel-sidebar is-minimized">{ toggle }</aside> };
        }

        let search = explorer.search();
        let on_input = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: InputEvent| {
                let input: HtmlInputElement = event.target_unchecked_into();
                dispatch.dispatch(ExplorerEvent::SearchInput {
                    query: input.value(),
                });
            })
        };
        let on_search_key = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: KeyboardEvent| {
                let key = Key::from(event.key().as_str());
                if matches!(key, Key::ArrowUp | Key::ArrowDown | Key::Enter) {
                    event.prevent_default();
                }
                event.stop_propagation();
                if key == Key::Escape {
                    // Overlays close from the search box too.
                    dispatch.dispatch(ExplorerEvent::Key {
                        key,
                        text_input_focused: false,
                    });
                    return;
                }
                dispatch.dispatch(ExplorerEvent::SearchKey { key });
            })
        };

        let results = search.results().iter().enumerate().map(|(index, id)| {
            let name = explorer
                .catalog()
                .get(id)
                .map(|record| record.model.clone())
                .unwrap_or_default();
            let on_hover = {
                let dispatch = dispatch.clone();
                Callback::from(move |_: MouseEvent| {
                    dispatch.dispatch(ExplorerEvent::SearchHover { index })
                })
            };
            let on_pick = {
                let dispatch = dispatch.clone();
                Callback::from(move |_: MouseEvent| {
                    dispatch.dispatch(ExplorerEvent::SearchPick { index })
                })
            };
            let class = classes!(
                "search-result",
                (search.highlighted() == Some(index)).then_some("is-highlighted")
            );
            html! {
                <li {class} onmouseenter={on_hover} onclick={on_pick}>
                    <strong>{ id.clone() }</strong>
                    <span class="search-result-name">{ name }</span>
                </li>
            }
        });

        let compare_mode = explorer.view().selection.compare_mode;
        let rows = sidebar_rows(explorer.catalog(), search.query(), &explorer.view().selection);
        let rows = rows.into_iter().map(|row| {
            let on_row = {
                let dispatch = dispatch.clone();
                let id = row.id.clone();
                Callback::from(move |_: MouseEvent| {
                    dispatch.dispatch(ExplorerEvent::RowClick { id: id.clone() })
                })
            };
            let on_pick = {
                let dispatch = dispatch.clone();
                let id = row.id.clone();
                Callback::from(move |event: MouseEvent| {
                    event.stop_propagation();
                    let id = id.clone();
                    let action = if compare_mode {
                        ExplorerEvent::NodeClick { id }
                    } else {
                        ExplorerEvent::RowSelect { id }
                    };
                    dispatch.dispatch(action);
                })
            };
            let input_type = if compare_mode { "checkbox" } else { "radio" };
            html! {
                <tr class={classes!("sidebar-row", row.selected.then_some("is-selected"))} onclick={on_row}>
                    <td>
                        <input
                            type={input_type}
                            name="genmodel-pick"
                            checked={row.selected}
                            onclick={on_pick}
                        />
                    </td>
                    <td title={row.id.clone()}>{ row.short_id }</td>
                    <td>{ row.name }</td>
                    <td class="sidebar-published">{ row.published }</td>
                </tr>
            }
        });

        html! {
            <aside class="genmodel-sidebar">
                { toggle }
                <div class="sidebar-search">
                    <input
                        ref={search_ref}
                        type="search"
                        placeholder="Search models (press /)"
                        aria-label="Search models"
                        value={search.query().to_string()}
                        oninput={on_input}
                        onkeydown={on_search_key}
                    />
                    {
                        if search.results().is_empty() {
                            html! {}
                        } else {
                            html! { <ul class="search-results">{ for results }</ul> }
                        }
                    }
                </div>
                <table class="sidebar-table">
                    <thead>
                        <tr><th></th><th>{"ID"}</th><th>{"Model"}</th><th>{"Published"}</th></tr>
                    </thead>
                    <tbody>{ for rows }</tbody>
                </table>
            </aside>
        }
    }

    fn render_board(explorer: &Explorer, dispatch: &Dispatch, board_ref: NodeRef) -> Html {
        let layout = explorer.layout();
        let config = layout.config();
        let catalog = explorer.catalog();
        let selection = &explorer.view().selection;

        let on_wheel = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: WheelEvent| {
                if !event.shift_key() && event.delta_y() != 0.0 {
                    event.prevent_default();
                }
                dispatch.dispatch(ExplorerEvent::Wheel {
                    delta_y: event.delta_y(),
                    shift: event.shift_key(),
                });
            })
        };
        let on_pointer_down = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: MouseEvent| {
                dispatch.dispatch(ExplorerEvent::PointerDown {
                    x: f64::from(event.page_x()),
                })
            })
        };
        let dragging = explorer.viewport().is_dragging();
        let on_pointer_move = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: MouseEvent| {
                if dragging {
                    event.prevent_default();
                    dispatch.dispatch(ExplorerEvent::PointerMove {
                        x: f64::from(event.page_x()),
                    });
                }
            })
        };
        let on_pointer_up = {
            let dispatch = dispatch.clone();
            Callback::from(move |_: MouseEvent| dispatch.dispatch(ExplorerEvent::PointerUp))
        };
        let on_pointer_leave = {
            let dispatch = dispatch.clone();
            Callback::from(move |_: MouseEvent| dispatch.dispatch(ExplorerEvent::PointerLeave))
        };
        let on_scroll = {
            let dispatch = dispatch.clone();
            Callback::from(move |event: Event| {
                if let Some(board) = event.target_dyn_into::<Element>() {
                    dispatch.dispatch(ExplorerEvent::Scrolled {
                        offset: f64::from(board.scroll_left()),
                    });
                }
            })
        };

        let strip_area = config.strip_area_height();
        let strips = layout.strips().iter().map(|band| {
            let style = format!("top: {:.2}px; height: {:.2}px;", band.top, band.height);
            let label_style = format!("width: {:.0}px;", config.label_column_width);
            html! {
                <div class={classes!("strip", format!("strip-{}", band.index % 2))} {style}>
                    <span class="strip-label" style={label_style}>
                        <span class="strip-emoji">{ band.category.emoji() }</span>
                        { band.category.label() }
                    </span>
                </div>
            }
        });

        let nodes = catalog.records().iter().map(|record| {
            let position = layout.position(catalog, record);
            let (left, top) = position.top_left(config.node_size);
            let color = record.color.as_deref().unwrap_or("#64748b");
            let style = format!(
                "left: {left:.2}px; top: {top:.2}px; width: {size}px; height: {size}px; background: {color};",
                size = config.node_size
            );
            let highlighted = selection.is_selected(&record.id)
                || selection.open_record_id.as_deref() == Some(record.id.as_str());
            let on_click = {
                let dispatch = dispatch.clone();
                let id = record.id.clone();
                Callback::from(move |event: MouseEvent| {
                    event.stop_propagation();
                    dispatch.dispatch(ExplorerEvent::NodeClick { id: id.clone() });
                })
            };
            html! {
                <div
                    class={classes!("model-node", highlighted.then_some("is-selected"))}
                    {style}
                    title={hover_text(record)}
                    onclick={on_click}
                    onmousedown={Callback::from(|event: MouseEvent| event.stop_propagation())}
                >
                    <span class="model-node-label">{ node_label(record) }</span>
                </div>
            }
        });

        let ticks = layout.axis_ticks(1.0).into_iter().map(|tick| {
            let class = match tick.kind {
                TickKind::Year => "axis-tick is-year",
                TickKind::Quarter => "axis-tick is-quarter",
            };
            let style = format!("left: {:.2}px;", tick.x);
            html! { <div {class} {style}><span>{ tick.label }</span></div> }
        });

        let canvas_style = format!(
            "width: {:.0}px; height: {:.0}px;",
            layout.content_width(),
            config.board_height
        );
        let strip_area_style = format!("height: {strip_area:.2}px;");
        let axis_style = format!("top: {strip_area:.2}px; height: {:.0}px;", config.axis_height);

        html! {
            <section
                class={classes!("genmodel-board", dragging.then_some("is-dragging"))}
                ref={board_ref}
                onwheel={on_wheel}
                onmousedown={on_pointer_down}
                onmousemove={on_pointer_move}
                onmouseup={on_pointer_up}
                onmouseleave={on_pointer_leave}
                onscroll={on_scroll}
            >
                <div class="board-canvas" style={canvas_style}>
                    <div class="strip-area" style={strip_area_style}>
                        { for strips }
                        { for nodes }
                    </div>
                    <div class="axis" style={axis_style}>{ for ticks }</div>
                </div>
            </section>
        }
    }

    fn render_legend() -> Html {
        html! {
            <footer class="genmodel-legend">
                {
                    for MODEL_TYPE_LEGEND.iter().map(|(abbr, color)| html! {
                        <span class="legend-item">
                            <span class="legend-swatch" style={format!("background: {color};")}></span>
                            { *abbr }
                        </span>
                    })
                }
            </footer>
        }
    }

    fn render_value(value: &DetailValue, dispatch: &Dispatch) -> Html {
        match value {
            DetailValue::Text { text } => html! { <span>{ text.clone() }</span> },
            DetailValue::Link { label, href } => html! {
                <a href={href.clone()} target="_blank" rel="noopener noreferrer">{ label.clone() }</a>
            },
            DetailValue::Image { src } => {
                let on_click = {
                    let dispatch = dispatch.clone();
                    let url = src.clone();
                    Callback::from(move |event: MouseEvent| {
                        event.stop_propagation();
                        dispatch.dispatch(ExplorerEvent::OpenImage { url: url.clone() });
                    })
                };
                html! { <img class="detail-image" src={src.clone()} alt="Flowchart" onclick={on_click} /> }
            }
            DetailValue::List { items } => html! {
                <ul class="detail-list">{ for items.iter().map(|item| html! { <li>{ item.clone() }</li> }) }</ul>
            },
            DetailValue::Empty => html! { <span class="detail-empty">{"—"}</span> },
        }
    }

    fn stop_click() -> Callback<MouseEvent> {
        Callback::from(|event: MouseEvent| event.stop_propagation())
    }

    fn render_detail(record: &ModelRecord, dispatch: &Dispatch, on_backdrop: Callback<MouseEvent>) -> Html {
        let rows = detail_rows(record).into_iter().map(|row| {
            html! {
                <tr>
                    <th>{ row.label }</th>
                    <td>{ render_value(&row.value, dispatch) }</td>
                </tr>
            }
        });
        html! {
            <div class="overlay" onclick={on_backdrop}>
                <div class="popup detail-popup" role="dialog" onclick={stop_click()}>
                    <button
                        type="button"
                        class="popup-close"
                        aria-label="Close"
                        onclick={button_callback(dispatch, Button::CloseDetail)}
                    >
                        {"×"}
                    </button>
                    <h2>{ format!("{} ({})", record.model, record.id) }</h2>
                    <table class="detail-table"><tbody>{ for rows }</tbody></table>
                </div>
            </div>
        }
    }

    fn render_comparison(
        records: &[&ModelRecord],
        dispatch: &Dispatch,
        on_backdrop: Callback<MouseEvent>,
    ) -> Html {
        let columns: Vec<_> = records.iter().map(|record| detail_rows(record)).collect();
        let body = DETAIL_LABELS.iter().enumerate().map(|(row, label)| {
            html! {
                <tr>
                    <th>{ *label }</th>
                    {
                        for columns.iter().map(|rows| match rows.get(row) {
                            Some(detail) => html! { <td>{ render_value(&detail.value, dispatch) }</td> },
                            None => html! { <td></td> },
                        })
                    }
                </tr>
            }
        });
        html! {
            <div class="overlay" onclick={on_backdrop}>
                <div class="popup comparison-popup" role="dialog" onclick={stop_click()}>
                    <button
                        type="button"
                        class="popup-close"
                        aria-label="Close"
                        onclick={button_callback(dispatch, Button::CloseComparison)}
                    >
                        {"×"}
                    </button>
                    <h2>{"Model Comparison"}</h2>
                    <div class="comparison-scroll">
                        <table class="comparison-table">
                            <thead>
                                <tr>
                                    <th></th>
                                    { for records.iter().map(|record| html! { <th>{ record.id.clone() }</th> }) }
                                </tr>
                            </thead>
                            <tbody>{ for body }</tbody>
                        </table>
                    </div>
                </div>
            </div>
        }
    }

    fn render_help(dispatch: &Dispatch, on_backdrop: Callback<MouseEvent>) -> Html {
        html! {
            <div class="overlay" onclick={on_backdrop}>
                <div class="popup help-popup" role="dialog" onclick={stop_click()}>
                    <button
                        type="button"
                        class="popup-close"
                        aria-label="Close"
                        onclick={button_callback(dispatch, Button::CloseHelp)}
                    >
                        {"×"}
                    </button>
                    <h2>{"Why / How to Use?"}</h2>
                    <p>
                        {"Each row is a primary use case. Models sit at their publication date; \
                          within a row, more cited models sit higher."}
                    </p>
                    <ul>
                        <li>{"Click a node or a list row to open its details."}</li>
                        <li>{"Comparison Mode (C) lets you tick several models and compare them side by side."}</li>
                        <li>{"Scroll with the mouse wheel, drag the board or use the arrow keys."}</li>
                        <li>{"Press / to search, R to reset, Escape to close popups."}</li>
                    </ul>
                </div>
            </div>
        }
    }

    fn render_enlarged_image(url: &str, dispatch: &Dispatch) -> Html {
        let on_close = {
            let dispatch = dispatch.clone();
            Callback::from(move |_: MouseEvent| dispatch.dispatch(ExplorerEvent::CloseImage))
        };
        html! {
            <div class="overlay image-overlay" onclick={on_close}>
                <img class="enlarged-image" src={url.to_string()} alt="Flowchart" onclick={stop_click()} />
            </div>
        }
    }

    #[wasm_bindgen]
    pub fn mount_explorer(selector: &str, dataset: JsValue) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window: Window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Document is not accessible"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Invalid selector: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("No element matches the selector"))?;

        let dataset: serde_json::Value = from_value(dataset)?;
        let catalog = genmodel_dataset::load_catalog_value(&dataset)
            .map_err(|err| JsValue::from_str(&format!("Dataset error: {err}")))?;
        let explorer = Explorer::new(catalog, ChartConfig::default())
            .map_err(|err| JsValue::from_str(&format!("Chart error: {err}")))?;

        yew::Renderer::<ExplorerView>::with_root_and_props(target, ExplorerViewProps { explorer })
            .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_explorer;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_explorer(_: &str, _: wasm_bindgen::JsValue) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "genmodel-ui only supports the wasm32 target",
    ))
}
