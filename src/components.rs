//! Yew views for the setup and display surfaces.
//!
//! The overlay itself is a pure render function of the resolved settings and countdown, so
//! the setup preview and the display surface show exactly the same thing.

use crate::hooks::{use_timer, use_validated_input, AppStore, TimerContext};
use std::rc::Rc;
use stream_countdown::utils::{parse_minutes_input, validate_font_size};
use stream_countdown::{Route, SettingsPatch, TimerPhase, TimerPreset, TimerSettings};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Everything the overlay needs, copied out of the store for one render.
#[derive(Clone, PartialEq)]
pub struct OverlayView {
    pub settings: TimerSettings,
    pub formatted_time: String,
    pub progress: f64,
    pub phase: TimerPhase,
}

impl OverlayView {
    pub fn from_store(store: &AppStore) -> Self {
        Self {
            settings: store.settings().clone(),
            formatted_time: store.formatted_time(),
            progress: store.progress_percentage(),
            phase: store.phase(),
        }
    }
}

/// Renders the countdown overlay.
pub fn render_overlay(view: &OverlayView, class: &str) -> Html {
    let s = &view.settings;
    let background = if s.transparent_background {
        "transparent"
    } else {
        s.background_color.as_str()
    };
    let style = format!(
        "background: {}; color: {}; font-family: {};",
        background, s.text_color, s.font_family
    );
    // Zero durations give a non-finite share; show an empty bar.
    let progress = if view.progress.is_finite() {
        view.progress.clamp(0.0, 100.0)
    } else {
        0.0
    };

    html! {
        <div class={classes!("overlay", class.to_string(), view.phase.as_str())} {style}>
            if !s.text.is_empty() {
                <div class="overlay-text" style={format!("font-size: {}px;", s.font_size / 2)}>
                    { &s.text }
                </div>
            }
            <div class="overlay-time" style={format!("font-size: {}px;", s.font_size)}>
                { &view.formatted_time }
            </div>
            if s.show_progress_bar {
                <div class="progress-track">
                    <div class="progress-fill" style={format!("width: {:.2}%; background: {};", progress, s.text_color)} />
                </div>
            }
        </div>
    }
}

fn input_value(e: &Event) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

fn input_checked(e: &Event) -> bool {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.checked()
}

fn current_href() -> String {
    gloo_utils::window().location().href().unwrap_or_default()
}

/// Full-screen overlay for capture by broadcasting software.
#[function_component(DisplayView)]
pub fn display_view() -> Html {
    let timer = use_timer();

    {
        let timer = timer.clone();
        use_effect_with((), move |_| {
            let href = current_href();
            timer.act(|store| {
                store.apply_url_or_storage_on_load(&href);
            });
            move || timer.act(|store| store.teardown())
        });
    }

    let view = timer.read(OverlayView::from_store);
    render_overlay(&view, "fullscreen")
}

/// Renders one preset button, with a delete control for custom presets.
fn render_preset(preset: &TimerPreset, on_load: Callback<String>, on_delete: Callback<String>) -> Html {
    let load = {
        let id = preset.id.clone();
        Callback::from(move |_: MouseEvent| on_load.emit(id.clone()))
    };
    let delete = {
        let id = preset.id.clone();
        Callback::from(move |_: MouseEvent| on_delete.emit(id.clone()))
    };

    html! {
        <li class="preset" key={preset.id.clone()}>
            <button class="btn-secondary" onclick={load}>{ &preset.name }</button>
            if !preset.is_builtin() {
                <button class="btn-danger small" title="Delete preset" onclick={delete}>{ "✕" }</button>
            }
        </li>
    }
}

/// Builds a callback that applies the patch produced from an input's `change` event.
fn patch_on_change(
    timer: &TimerContext,
    to_patch: impl Fn(&Event) -> SettingsPatch + 'static,
) -> Callback<Event> {
    timer.callback(move |store: &mut AppStore, e: Event| store.update_settings(to_patch(&e)))
}

/// Settings editor, presets, transport controls and browser-source URL.
#[function_component(SetupView)]
pub fn setup_view() -> Html {
    let timer = use_timer();
    let preset_name = use_state(String::new);

    {
        let timer = timer.clone();
        use_effect_with((), move |_| {
            timer.act(|store| store.initialize());
            || ()
        });
    }

    let (settings, presets, view) = timer.read(|store| {
        (
            store.settings().clone(),
            store.presets().to_vec(),
            OverlayView::from_store(store),
        )
    });
    let share_url = timer
        .read(|store| store.shareable_url(&current_href()))
        .unwrap_or_default();

    let duration_input = use_validated_input(
        settings.duration,
        Rc::new(|s: &str| parse_minutes_input(s).map_err(|e| e.to_string())),
        timer.callback(|store: &mut AppStore, minutes: i32| {
            store.update_settings(SettingsPatch::duration(minutes))
        }),
    );
    let font_size_input = use_validated_input(
        settings.font_size,
        Rc::new(|s: &str| validate_font_size(s).map_err(|e| e.to_string())),
        timer.callback(|store: &mut AppStore, px: i32| {
            store.update_settings(SettingsPatch {
                font_size: Some(px),
                ..SettingsPatch::default()
            })
        }),
    );

    let on_load_preset = timer.callback(|store: &mut AppStore, id: String| {
        store.load_preset(&id);
    });
    let on_delete_preset = timer.callback(|store: &mut AppStore, id: String| {
        store.delete_preset(&id);
    });

    let on_text = patch_on_change(&timer, |e| SettingsPatch {
        text: Some(input_value(e)),
        ..SettingsPatch::default()
    });
    let on_background = patch_on_change(&timer, |e| SettingsPatch {
        background_color: Some(input_value(e)),
        ..SettingsPatch::default()
    });
    let on_text_color = patch_on_change(&timer, |e| SettingsPatch {
        text_color: Some(input_value(e)),
        ..SettingsPatch::default()
    });
    let on_font_family = patch_on_change(&timer, |e| SettingsPatch {
        font_family: Some(input_value(e)),
        ..SettingsPatch::default()
    });
    let on_progress_bar = patch_on_change(&timer, |e| SettingsPatch {
        show_progress_bar: Some(input_checked(e)),
        ..SettingsPatch::default()
    });
    let on_auto_start = patch_on_change(&timer, |e| SettingsPatch {
        auto_start: Some(input_checked(e)),
        ..SettingsPatch::default()
    });
    let on_loop = patch_on_change(&timer, |e| SettingsPatch {
        loop_timer: Some(input_checked(e)),
        ..SettingsPatch::default()
    });
    let on_sound = patch_on_change(&timer, |e| SettingsPatch {
        play_sound: Some(input_checked(e)),
        ..SettingsPatch::default()
    });
    let on_transparent = patch_on_change(&timer, |e| SettingsPatch {
        transparent_background: Some(input_checked(e)),
        ..SettingsPatch::default()
    });

    let on_duration_key = {
        let commit = duration_input.on_commit.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                commit.emit(());
            }
        })
    };

    let on_preset_name_input = {
        let preset_name = preset_name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            preset_name.set(input.value());
        })
    };
    let on_save_preset = {
        let timer = timer.clone();
        let preset_name = preset_name.clone();
        Callback::from(move |_: MouseEvent| {
            let name = preset_name.trim().to_string();
            if name.is_empty() {
                return;
            }
            timer.act(|store| {
                let settings = store.settings().clone();
                store.add_custom_preset(&name, settings);
            });
            preset_name.set(String::new());
        })
    };

    let on_start = timer.callback(|store: &mut AppStore, _: MouseEvent| store.start());
    let on_pause = timer.callback(|store: &mut AppStore, _: MouseEvent| store.pause());
    let on_stop = timer.callback(|store: &mut AppStore, _: MouseEvent| store.stop());
    let on_reset = timer.callback(|store: &mut AppStore, _: MouseEvent| store.reset());

    html! {
        <div class="setup">
            <h1>{ "Stream Countdown Timer" }</h1>

            <section class="presets">
                <h2>{ "Presets" }</h2>
                <ul class="preset-list">
                    { presets.iter().map(|p| render_preset(p, on_load_preset.clone(), on_delete_preset.clone())).collect::<Html>() }
                </ul>
                <div class="save-preset">
                    <input type="text" placeholder="Preset name"
                        value={(*preset_name).clone()}
                        oninput={on_preset_name_input} />
                    <button class="btn-secondary" onclick={on_save_preset}>{ "Save current as preset" }</button>
                </div>
            </section>

            <section class="settings">
                <h2>{ "Settings" }</h2>

                <label>{ "Duration (minutes)" }
                    <input type="text" value={duration_input.text.clone()}
                        oninput={duration_input.on_text_input.clone()}
                        onchange={{ let commit = duration_input.on_commit.clone(); Callback::from(move |_: Event| commit.emit(())) }}
                        onkeydown={on_duration_key} />
                </label>
                if let Some(err) = &duration_input.error {
                    <div class="input-error">{ err }</div>
                }

                <label>{ "Text" }
                    <input type="text" value={settings.text.clone()} onchange={on_text} />
                </label>
                <label>{ "Background" }
                    <input type="text" value={settings.background_color.clone()} onchange={on_background} />
                </label>
                <label>{ "Text color" }
                    <input type="text" value={settings.text_color.clone()} onchange={on_text_color} />
                </label>
                <label>{ "Font family" }
                    <input type="text" value={settings.font_family.clone()} onchange={on_font_family} />
                </label>

                <label>{ "Font size (px)" }
                    <input type="text" value={font_size_input.text.clone()}
                        oninput={font_size_input.on_text_input.clone()}
                        onchange={{ let commit = font_size_input.on_commit.clone(); Callback::from(move |_: Event| commit.emit(())) }} />
                </label>
                if let Some(err) = &font_size_input.error {
                    <div class="input-error">{ err }</div>
                }

                <label class="toggle">
                    <input type="checkbox" checked={settings.show_progress_bar} onchange={on_progress_bar} />
                    { "Show progress bar" }
                </label>
                <label class="toggle">
                    <input type="checkbox" checked={settings.auto_start} onchange={on_auto_start} />
                    { "Auto-start on display" }
                </label>
                <label class="toggle">
                    <input type="checkbox" checked={settings.loop_timer} onchange={on_loop} />
                    { "Loop timer" }
                </label>
                <label class="toggle">
                    <input type="checkbox" checked={settings.play_sound} onchange={on_sound} />
                    { "Play sound when finished" }
                </label>
                <label class="toggle">
                    <input type="checkbox" checked={settings.transparent_background} onchange={on_transparent} />
                    { "Transparent background" }
                </label>
            </section>

            <section class="controls">
                <button class="btn-primary" onclick={on_start}>{ "Start" }</button>
                <button class="btn-secondary" onclick={on_pause}>{ "Pause" }</button>
                <button class="btn-secondary" onclick={on_stop}>{ "Stop" }</button>
                <button class="btn-secondary" onclick={on_reset}>{ "Reset" }</button>
                <a class="btn-secondary" href={Route::Display.hash()}>{ "Open display" }</a>
            </section>

            <section class="browser-source">
                <h2>{ "Browser source URL" }</h2>
                <input type="text" readonly={true} class="share-url" value={share_url} />
            </section>

            <section class="preview">
                <h2>{ "Preview" }</h2>
                { render_overlay(&view, "preview") }
            </section>
        </div>
    }
}
