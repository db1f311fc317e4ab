use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Event, FileReader, HtmlCanvasElement, HtmlImageElement,
    HtmlInputElement, PointerEvent, WheelEvent,
};
use yew::prelude::*;

use crate::engine::ZoomPanEngine;
use crate::state::Vec2;
use crate::util::clog;

#[derive(Properties, PartialEq, Clone)]
pub struct ZoomViewProps {
    /// Logical canvas size in CSS pixels (the canvas is square).
    pub size: f64,
    pub smoothing: bool,
    /// Bumped by the host to reset the view.
    pub reset_count: u32,
    pub on_zoom_change: Callback<f64>,
}

#[function_component(ZoomView)]
pub fn zoom_view(props: &ZoomViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let engine = {
        let size = props.size;
        use_mut_ref(move || ZoomPanEngine::new(size, size))
    };
    let image = use_mut_ref(|| None::<HtmlImageElement>);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    let smoothing_flag = use_mut_ref(|| true);
    // Decode-generation counter: a second file picked before the first decode
    // completes wins, the stale decode is dropped on arrival.
    let load_gen = use_mut_ref(|| 0_u64);
    let filename = use_state(String::new);

    // Effect: smoothing toggle redraws through the flag so the draw closure
    // never has to be rebuilt.
    {
        let draw_ref = draw_ref.clone();
        let flag = props.smoothing;
        let smoothing_flag_ref = smoothing_flag.clone();
        use_effect_with(flag, move |_| {
            *smoothing_flag_ref.borrow_mut() = flag;
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }

    // Effect: reset the view whenever the host bumps the counter.
    {
        let engine = engine.clone();
        let draw_ref = draw_ref.clone();
        let on_zoom_change = props.on_zoom_change.clone();
        use_effect_with(props.reset_count, move |_| {
            let mut eng = engine.borrow_mut();
            eng.reset();
            let scale = eng.scale();
            drop(eng);
            on_zoom_change.emit(scale);
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            || ()
        });
    }

    // Main mount effect: draw closure + canvas event listeners.
    {
        let canvas_ref = canvas_ref.clone();
        let engine = engine.clone();
        let image = image.clone();
        let draw_ref_setup = draw_ref.clone();
        let smoothing_flag = smoothing_flag.clone();
        let on_zoom_change = props.on_zoom_change.clone();
        let size = props.size;
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("window");
            let canvas: HtmlCanvasElement = canvas_ref.cast::<HtmlCanvasElement>().expect("canvas");

            // Client -> canvas-local coordinates; degrades to raw client
            // coordinates when the canvas is not measurable.
            let to_canvas = {
                let canvas = canvas.clone();
                move |client_x: f64, client_y: f64| -> Vec2 {
                    if !canvas.is_connected() {
                        return Vec2::new(client_x, client_y);
                    }
                    let rect = canvas.get_bounding_client_rect();
                    Vec2::new(client_x - rect.left(), client_y - rect.top())
                }
            };

            // Draw closure
            let draw_closure: Rc<dyn Fn()> = {
                let canvas = canvas.clone();
                let window = window.clone();
                let engine = engine.clone();
                let image = image.clone();
                let smoothing_flag = smoothing_flag.clone();
                Rc::new(move || {
                    if !canvas.is_connected() {
                        return;
                    }
                    let ctx = match canvas.get_context("2d").ok().flatten() {
                        Some(c) => match c.dyn_into::<CanvasRenderingContext2d>() {
                            Ok(c) => c,
                            Err(_) => return,
                        },
                        None => return,
                    };
                    let dpr = window.device_pixel_ratio();
                    let dpr = if dpr > 0.0 { dpr } else { 1.0 };
                    // Physical backing buffer at device resolution; CSS size
                    // pinned to the logical size so callers think in logical
                    // pixels only.
                    canvas.set_width((size * dpr) as u32);
                    canvas.set_height((size * dpr) as u32);
                    let style = canvas.style();
                    let _ = style.set_property("width", &format!("{size}px"));
                    let _ = style.set_property("height", &format!("{size}px"));
                    ctx.set_image_smoothing_enabled(*smoothing_flag.borrow());
                    //ctx.set_image_smoothing_quality(ImageSmoothingQuality::High);
                    ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
                    ctx.scale(dpr, dpr).ok();
                    ctx.clear_rect(0.0, 0.0, size, size);
                    let img = image.borrow();
                    let (Some(img), Some(p)) = (img.as_ref(), engine.borrow().placement()) else {
                        return;
                    };
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, p.x, p.y, p.w, p.h)
                        .ok();
                })
            };
            *draw_ref_setup.borrow_mut() = Some(draw_closure.clone());
            (draw_closure)();

            // Wheel zoom, anchored at the cursor
            let wheel_cb = {
                let engine = engine.clone();
                let draw_ref = draw_ref_setup.clone();
                let on_zoom_change = on_zoom_change.clone();
                let to_canvas = to_canvas.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    let mut eng = engine.borrow_mut();
                    if !eng.has_image() {
                        return;
                    }
                    e.prevent_default();
                    let cursor = to_canvas(e.client_x() as f64, e.client_y() as f64);
                    if eng.wheel_zoom(cursor, e.delta_y()) {
                        let scale = eng.scale();
                        drop(eng);
                        on_zoom_change.emit(scale);
                        if let Some(f) = &*draw_ref.borrow() {
                            f();
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("wheel", wheel_cb.as_ref().unchecked_ref())
                .unwrap();

            // Pointer events: one pointer pans, two pinch
            let pointerdown_cb = {
                let engine = engine.clone();
                let canvas_pd = canvas.clone();
                let to_canvas = to_canvas.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    let mut eng = engine.borrow_mut();
                    if !eng.has_image() {
                        return;
                    }
                    let pos = to_canvas(e.client_x() as f64, e.client_y() as f64);
                    eng.pointer_down(e.pointer_id(), pos);
                    drop(eng);
                    // Keep move/up events flowing even when the pointer
                    // leaves the canvas bounds.
                    let _ = canvas_pd.set_pointer_capture(e.pointer_id());
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointerdown",
                    pointerdown_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let pointermove_cb = {
                let engine = engine.clone();
                let draw_ref = draw_ref_setup.clone();
                let on_zoom_change = on_zoom_change.clone();
                let to_canvas = to_canvas.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    let pos = to_canvas(e.client_x() as f64, e.client_y() as f64);
                    let mut eng = engine.borrow_mut();
                    if eng.pointer_move(e.pointer_id(), pos) {
                        let scale = eng.scale();
                        drop(eng);
                        e.prevent_default();
                        on_zoom_change.emit(scale);
                        if let Some(f) = &*draw_ref.borrow() {
                            f();
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointermove",
                    pointermove_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let pointerup_cb = {
                let engine = engine.clone();
                Closure::wrap(Box::new(move |e: PointerEvent| {
                    engine.borrow_mut().pointer_up(e.pointer_id());
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointerup",
                    pointerup_cb.as_ref().unchecked_ref(),
                )
                .unwrap();
            let pointerleave_cb = {
                let engine = engine.clone();
                Closure::wrap(Box::new(move |_e: PointerEvent| {
                    engine.borrow_mut().pointer_leave();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback(
                    "pointerleave",
                    pointerleave_cb.as_ref().unchecked_ref(),
                )
                .unwrap();

            // Cleanup
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointerdown",
                    pointerdown_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointermove",
                    pointermove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointerup",
                    pointerup_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "pointerleave",
                    pointerleave_cb.as_ref().unchecked_ref(),
                );
                let _keep_alive = (
                    &wheel_cb,
                    &pointerdown_cb,
                    &pointermove_cb,
                    &pointerup_cb,
                    &pointerleave_cb,
                );
            }
        });
    }

    // File selection: decode via FileReader + HtmlImageElement, then hand the
    // natural size to the engine. Decode failures keep the previous image.
    let on_file_change = {
        let engine = engine.clone();
        let image = image.clone();
        let draw_ref = draw_ref.clone();
        let load_gen = load_gen.clone();
        let filename = filename.clone();
        let on_zoom_change = props.on_zoom_change.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|list| list.get(0)) else {
                return;
            };
            // Clear the input so picking the same file again re-fires change.
            input.set_value("");
            filename.set(file.name());
            let r#gen = {
                let mut g = load_gen.borrow_mut();
                *g += 1;
                *g
            };
            let started = js_sys::Date::now();
            let Ok(reader) = FileReader::new() else {
                return;
            };
            let onload = {
                let reader = reader.clone();
                let engine = engine.clone();
                let image = image.clone();
                let draw_ref = draw_ref.clone();
                let load_gen = load_gen.clone();
                let on_zoom_change = on_zoom_change.clone();
                let name = file.name();
                Closure::wrap(Box::new(move |_e: Event| {
                    let Some(url) = reader.result().ok().and_then(|v| v.as_string()) else {
                        clog("file read produced no data url");
                        return;
                    };
                    let Ok(img) = HtmlImageElement::new() else {
                        return;
                    };
                    let img_onload = {
                        let img = img.clone();
                        let engine = engine.clone();
                        let image = image.clone();
                        let draw_ref = draw_ref.clone();
                        let load_gen = load_gen.clone();
                        let on_zoom_change = on_zoom_change.clone();
                        let name = name.clone();
                        Closure::wrap(Box::new(move |_e: Event| {
                            if *load_gen.borrow() != r#gen {
                                // A newer file pick is in flight.
                                return;
                            }
                            let w = img.natural_width() as f64;
                            let h = img.natural_height() as f64;
                            let mut eng = engine.borrow_mut();
                            eng.image_loaded(w, h);
                            let scale = eng.scale();
                            drop(eng);
                            *image.borrow_mut() = Some(img.clone());
                            clog(&format!(
                                "loaded {} ({}x{}) in {:.0}ms",
                                name,
                                w,
                                h,
                                js_sys::Date::now() - started
                            ));
                            on_zoom_change.emit(scale);
                            if let Some(f) = &*draw_ref.borrow() {
                                f();
                            }
                        }) as Box<dyn FnMut(_)>)
                    };
                    let img_onerror = {
                        let name = name.clone();
                        Closure::wrap(Box::new(move |_e: Event| {
                            clog(&format!("decode failed for {}, keeping previous image", name));
                        }) as Box<dyn FnMut(_)>)
                    };
                    img.set_onload(Some(img_onload.as_ref().unchecked_ref()));
                    img.set_onerror(Some(img_onerror.as_ref().unchecked_ref()));
                    img.set_src(&url);
                    img_onload.forget();
                    img_onerror.forget();
                }) as Box<dyn FnMut(_)>)
            };
            let onerror = Closure::wrap(Box::new(move |_e: Event| {
                clog("file read failed");
            }) as Box<dyn FnMut(_)>);
            reader.set_onload(Some(onload.as_ref().unchecked_ref()));
            reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            if reader.read_as_data_url(&file).is_err() {
                clog("file read failed");
            }
            onload.forget();
            onerror.forget();
        })
    };

    let size_attr = (props.size as u32).to_string();
    let chosen = if filename.is_empty() {
        "No file selected".to_string()
    } else {
        (*filename).clone()
    };
    html! {<div style="display:inline-block;">
        <div style="margin-bottom:12px;">
            <label for="file-input" style="cursor:pointer; padding:4px 10px; border-radius:6px; background:#30363d; color:#e6edf3; font-size:13px;">{"Choose Image"}</label>
            <input id="file-input" type="file" accept="image/*" onchange={on_file_change} style="display:none;" />
            <span style="font-size:13px; opacity:0.8; margin-left:8px;">{ chosen }</span>
        </div>
        <canvas
            ref={canvas_ref}
            width={size_attr.clone()}
            height={size_attr}
            style="border:1px solid #30363d; background:#232323; cursor:grab; touch-action:none;"
        />
    </div>}
}
