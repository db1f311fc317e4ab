use serde::{Deserialize, Serialize};
use yew::prelude::*;

use super::{controls_panel::ControlsPanel, settings_modal::SettingsModal, zoom_view::ZoomView};
use crate::util::format_zoom;

const SETTINGS_KEY: &str = "iz_settings";

/// View options persisted across sessions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub smoothing: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self { smoothing: true }
    }
}

fn load_settings() -> ViewSettings {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(store)) = win.local_storage() {
            if let Ok(Some(raw)) = store.get_item(SETTINGS_KEY) {
                if let Ok(s) = serde_json::from_str(&raw) {
                    return s;
                }
            }
        }
    }
    ViewSettings::default()
}

/// Logical canvas size; small screens get the smaller square. Sampled once
/// at mount, the engine re-derives its base size on the next image load.
fn canvas_size() -> f64 {
    if let Some(win) = web_sys::window() {
        if let Ok(Some(mq)) = win.match_media("(max-width: 700px)") {
            if mq.matches() {
                return 300.0;
            }
        }
    }
    500.0
}

#[function_component(App)]
pub fn app() -> Html {
    let settings = use_state(load_settings);
    let open_settings = use_state(|| false);
    let zoom = use_state_eq(|| 1.0_f64);
    let reset_count = use_state(|| 0_u32);
    let size = use_state(canvas_size);

    // Persist settings on change
    {
        let current = *settings;
        use_effect_with(current, move |s| {
            if let Some(win) = web_sys::window() {
                if let Ok(Some(store)) = win.local_storage() {
                    if let Ok(raw) = serde_json::to_string(s) {
                        let _ = store.set_item(SETTINGS_KEY, &raw);
                    }
                }
            }
            || ()
        });
    }

    let on_zoom_change = {
        let zoom = zoom.clone();
        Callback::from(move |s: f64| zoom.set(s))
    };
    let on_reset = {
        let reset_count = reset_count.clone();
        Callback::from(move |_| reset_count.set(*reset_count + 1))
    };
    let on_open_settings = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(true))
    };
    let on_close_settings = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(false))
    };
    let on_toggle_smoothing = {
        let settings = settings.clone();
        Callback::from(move |_| {
            settings.set(ViewSettings {
                smoothing: !settings.smoothing,
            })
        })
    };
    let on_clear_saved = {
        let settings = settings.clone();
        Callback::from(move |_| {
            if let Some(win) = web_sys::window() {
                if let Ok(Some(store)) = win.local_storage() {
                    let _ = store.remove_item(SETTINGS_KEY);
                }
            }
            settings.set(ViewSettings::default());
        })
    };

    html! {<div style="max-width:560px; margin:32px auto; text-align:center; color:#e6edf3; font-family:sans-serif;">
        <h2 style="margin-bottom:16px;">{"Image Zoom"}</h2>
        <div style="margin-bottom:8px; font-size:13px; opacity:0.7;">
            {"Mouse wheel zooms at the cursor, drag pans, two fingers pinch."}
        </div>
        <ZoomView
            size={*size}
            smoothing={settings.smoothing}
            reset_count={*reset_count}
            on_zoom_change={on_zoom_change}
        />
        <ControlsPanel
            zoom_label={format_zoom(*zoom)}
            on_reset={on_reset}
            on_open_settings={on_open_settings}
        />
        <SettingsModal
            show={*open_settings}
            smoothing={settings.smoothing}
            on_toggle_smoothing={on_toggle_smoothing}
            on_clear_saved={on_clear_saved}
            on_close={on_close_settings}
        />
    </div>}
}
