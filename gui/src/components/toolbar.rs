// Symbol selector, date filter, load button and loading indicator.
#![allow(non_snake_case)]
use dioxus::prelude::*;

use crate::config::theme::ThemePalette;
use crate::controller::UiEvent;
use crate::dom_ids;
use crate::state::{ControllerHandle, SignalView};

#[component]
pub fn Toolbar(controller: ControllerHandle, view: SignalView, palette: ThemePalette) -> Element {
    let mut selector = view.selector;
    let mut start_date = view.start_date;
    let mut end_date = view.end_date;

    let state = selector.read().clone();
    let placeholder = state.placeholder_label();
    let disabled = state.is_disabled();
    let selected = state.selected.clone().unwrap_or_default();
    let loading_display = if *view.loading.read() { "inline-block" } else { "none" };

    let on_symbol = controller.clone();
    let on_start = controller.clone();
    let on_end = controller.clone();
    let on_load = controller;

    rsx! {
        div {
            class: "toolbar",
            style: "display: flex; align-items: center; gap: 8px; padding: 8px 12px; background: {palette.panel}; border-bottom: 1px solid {palette.border};",
            select {
                id: dom_ids::SYMBOL_SELECT,
                disabled: disabled,
                value: "{selected}",
                onchange: move |evt: Event<FormData>| {
                    selector.write().select(&evt.value());
                    on_symbol.dispatch(UiEvent::SymbolChanged);
                },
                option { value: "", "{placeholder}" }
                for symbol in state.options.iter() {
                    option {
                        key: "{symbol}",
                        value: "{symbol}",
                        selected: state.selected.as_deref() == Some(symbol.as_str()),
                        "{symbol}"
                    }
                }
            }
            label { r#for: dom_ids::START_DATE, "From" }
            input {
                id: dom_ids::START_DATE,
                r#type: "date",
                value: "{start_date}",
                onchange: move |evt: Event<FormData>| {
                    start_date.set(evt.value());
                    on_start.dispatch(UiEvent::DateChanged);
                },
            }
            label { r#for: dom_ids::END_DATE, "To" }
            input {
                id: dom_ids::END_DATE,
                r#type: "date",
                value: "{end_date}",
                onchange: move |evt: Event<FormData>| {
                    end_date.set(evt.value());
                    on_end.dispatch(UiEvent::DateChanged);
                },
            }
            button {
                id: dom_ids::LOAD_BUTTON,
                onclick: move |_| on_load.dispatch(UiEvent::LoadClicked),
                "Load"
            }
            span {
                id: dom_ids::LOADING_INDICATOR,
                style: "display: {loading_display}; color: {palette.muted};",
                "Loading..."
            }
        }
    }
}
