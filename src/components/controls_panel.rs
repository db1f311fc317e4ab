use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub zoom_label: String,
    pub on_reset: Callback<()>,
    pub on_open_settings: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let reset_cb = {
        let cb = props.on_reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let settings_cb = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="margin-top:12px; display:flex; gap:8px; justify-content:center; align-items:center;">
        <button onclick={reset_cb}>{"Reset View"}</button>
        <button onclick={settings_cb}>{"Settings"}</button>
        <span style="font-size:12px; opacity:0.7; min-width:72px; text-align:left;">{ format!("Zoom: {}", props.zoom_label) }</span>
    </div>}
}
