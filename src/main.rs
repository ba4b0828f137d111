//! Stream countdown overlay front-end using Yew.
//! Builds the single timer store, provides it to both surfaces and switches between them on
//! hash changes.

use log::{info, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use stream_countdown::config::LOG_LEVEL;
use stream_countdown::{logging, BrowserScheduler, BrowserStorage, Route, TimerStore};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

mod audio;
mod components;
mod hooks;

use audio::ToneNotifier;
use components::{DisplayView, SetupView};
use hooks::{AppStore, TimerContext};

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Counter bumped whenever the store changes, to re-render context consumers.
#[derive(Default, PartialEq)]
struct StoreVersion(usize);

impl Reducible for StoreVersion {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: ()) -> Rc<Self> {
        Rc::new(StoreVersion(self.0.wrapping_add(1)))
    }
}

/// Create the page's store. Fired timers reach it through a weak reference, so dropping
/// the last strong handle tears everything down.
fn build_store(refresh: Callback<()>) -> Rc<RefCell<AppStore>> {
    Rc::new_cyclic(|weak: &Weak<RefCell<AppStore>>| {
        let weak = weak.clone();
        let scheduler = BrowserScheduler::new(move |event| {
            if let Some(store) = weak.upgrade() {
                store.borrow_mut().handle_event(event);
                refresh.emit(());
            }
        });
        RefCell::new(TimerStore::new(
            BrowserStorage::open(),
            ToneNotifier,
            scheduler,
        ))
    })
}

fn current_route() -> Route {
    let hash = gloo_utils::window().location().hash().unwrap_or_default();
    Route::from_hash(&hash)
}

// ──────────────────────────────────────────────────────────────────────────────

/// Root component: owns the store and routes between the two surfaces.
#[function_component]
pub fn App() -> Html {
    let version = use_reducer(StoreVersion::default);
    let refresh = {
        let dispatcher = version.dispatcher();
        Callback::from(move |_| dispatcher.dispatch(()))
    };
    let store = {
        let refresh = refresh.clone();
        use_state(move || build_store(refresh))
    };
    let route = use_state(current_route);

    // Follow hash navigation
    {
        let route = route.clone();
        use_effect_with((), move |_| {
            let window = gloo_utils::window();
            let listener = Closure::<dyn Fn()>::new(move || route.set(current_route()));
            if let Err(e) = window
                .add_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
            {
                warn!("Could not listen for hash changes: {:?}", e);
            }
            move || {
                let _ = window.remove_event_listener_with_callback(
                    "hashchange",
                    listener.as_ref().unchecked_ref(),
                );
            }
        });
    }

    // Keep the document title in sync with the surface
    use_effect_with(*route, |route| {
        gloo_utils::document().set_title(route.title());
        || ()
    });

    let context = TimerContext::new((*store).clone(), refresh, version.0);

    html! {
        <ContextProvider<TimerContext> {context}>
            {
                match *route {
                    Route::Setup => html! { <SetupView /> },
                    Route::Display => html! { <DisplayView /> },
                }
            }
        </ContextProvider<TimerContext>>
    }
}

/// Entry point: installs panic and log hooks, then renders the App.
fn main() {
    console_error_panic_hook::set_once();
    if logging::init(LOG_LEVEL).is_ok() {
        info!("Stream countdown starting");
    }
    yew::Renderer::<App>::new().render();
}
