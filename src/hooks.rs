use crate::audio::ToneNotifier;
use std::cell::RefCell;
use std::rc::Rc;
use stream_countdown::{BrowserScheduler, BrowserStorage, TimerStore};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub type AppStore = TimerStore<BrowserStorage, ToneNotifier, BrowserScheduler>;

/// Shared handle to the page's single timer store.
///
/// Components read through `read` and mutate through `act`; every `act` and every fired
/// timer bumps `version`, which is what makes consumers re-render.
#[derive(Clone)]
pub struct TimerContext {
    store: Rc<RefCell<AppStore>>,
    refresh: Callback<()>,
    version: usize,
}

impl PartialEq for TimerContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store) && self.version == other.version
    }
}

impl TimerContext {
    pub fn new(store: Rc<RefCell<AppStore>>, refresh: Callback<()>, version: usize) -> Self {
        Self {
            store,
            refresh,
            version,
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppStore) -> R) -> R {
        f(&self.store.borrow())
    }

    /// Run an action against the store, then schedule a re-render.
    pub fn act(&self, f: impl FnOnce(&mut AppStore)) {
        f(&mut self.store.borrow_mut());
        self.refresh.emit(());
    }

    /// Callback that runs `f` as an action for every emitted event.
    pub fn callback<E: 'static>(&self, f: impl Fn(&mut AppStore, E) + 'static) -> Callback<E> {
        let ctx = self.clone();
        Callback::from(move |event: E| ctx.act(|store| f(store, event)))
    }
}

#[hook]
pub fn use_timer() -> TimerContext {
    use_context::<TimerContext>().expect("TimerContext must be provided by App")
}

/// Holds the text and error state for a validated input field whose committed value lives
/// in the timer store.
#[derive(Clone)]
pub struct ValidatedInput {
    /// The current text content of the input field.
    pub text: String,
    /// An optional error message if validation failed.
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event. Updates the internal text state.
    pub on_text_input: Callback<InputEvent>,
    /// Parses the current text and, when valid, hands the value to `on_valid`.
    /// Typically used with `onchange` or after an Enter key press on the text input.
    pub on_commit: Callback<()>,
}

/// Custom hook to manage an input field editing `current_value`.
///
/// The text follows `current_value` whenever the store changes it (for example when a
/// preset is loaded), so the field never shows a stale number.
#[hook]
pub fn use_validated_input<T: Clone + PartialEq + std::fmt::Display + 'static>(
    current_value: T,
    parse_and_validate: Rc<dyn Fn(&str) -> Result<T, String>>,
    on_valid: Callback<T>,
) -> ValidatedInput {
    let text_state_handle: UseStateHandle<String> = use_state(|| current_value.to_string());
    let error_state_handle: UseStateHandle<Option<String>> = use_state(|| None::<String>);

    let on_text_input = {
        let text_setter = text_state_handle.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text_setter.set(input.value());
        })
    };

    let on_commit = {
        let current_text_handle = text_state_handle.clone();
        let error_setter = error_state_handle.clone();
        let parse_fn = parse_and_validate.clone();

        Callback::from(move |_| match parse_fn(&(*current_text_handle)) {
            Ok(parsed_val) => {
                current_text_handle.set(parsed_val.to_string()); // Canonical form
                error_setter.set(None);
                on_valid.emit(parsed_val);
            }
            Err(err_msg) => {
                error_setter.set(Some(err_msg));
            }
        })
    };

    // Follow programmatic changes of the committed value
    {
        let text_setter_for_effect = text_state_handle.clone();
        let error_setter_for_effect = error_state_handle.clone();

        use_effect_with(current_value, move |value| {
            text_setter_for_effect.set(value.to_string());
            error_setter_for_effect.set(None);
            || ()
        });
    }

    ValidatedInput {
        text: (*text_state_handle).clone(),
        error: (*error_state_handle).clone(),
        on_text_input,
        on_commit,
    }
}
