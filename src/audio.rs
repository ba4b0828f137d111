//! Web Audio notification tone.

use gloo_timers::callback::Timeout;
use log::warn;
use stream_countdown::Notifier;
use wasm_bindgen::JsValue;
use web_sys::AudioContext;

const TONE_SECS: f64 = 0.3;
const CLOSE_AFTER_MS: u32 = 500;

/// Plays a short 800/600/800 Hz beep.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToneNotifier;

impl Notifier for ToneNotifier {
    fn emit_notification(&self) {
        if let Err(e) = play_tone() {
            warn!("Could not play notification tone: {:?}", e);
        }
    }
}

fn play_tone() -> Result<(), JsValue> {
    let ctx = AudioContext::new()?;
    let oscillator = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;

    oscillator.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let now = ctx.current_time();
    let frequency = oscillator.frequency();
    frequency.set_value_at_time(800.0, now)?;
    frequency.set_value_at_time(600.0, now + 0.1)?;
    frequency.set_value_at_time(800.0, now + 0.2)?;

    let volume = gain.gain();
    volume.set_value_at_time(0.3, now)?;
    volume.exponential_ramp_to_value_at_time(0.01, now + TONE_SECS)?;

    oscillator.start_with_when(now)?;
    oscillator.stop_with_when(now + TONE_SECS)?;

    // Browsers cap the number of open contexts.
    Timeout::new(CLOSE_AFTER_MS, move || {
        let _ = ctx.close();
    })
    .forget();
    Ok(())
}
