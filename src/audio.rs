//! Sound playback over rodio
//!
//! Assets are registered by name as encoded bytes (WAV, OGG, ...) and
//! decoded on every play. Without an output device, or for a name nobody
//! registered, every playback call is a silent no-op.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::consts::SIM_DT;
use crate::settings::Settings;

/// Encoded audio shared between the registry and in-flight decoders
pub type AudioData = Arc<[u8]>;

struct Output {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

/// A playing sink and the per-play volume it was started with
struct Voice {
    sink: Sink,
    volume: f32,
}

struct FadeOut {
    voices: Vec<Voice>,
    elapsed_ms: f32,
    duration_ms: f32,
}

impl FadeOut {
    /// Remaining gain in `[0, 1]`
    fn gain(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            0.0
        } else {
            (1.0 - self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }
}

/// Audio manager for the game
pub struct SoundBank {
    output: Option<Output>,
    effects: HashMap<String, AudioData>,
    music: HashMap<String, AudioData>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    voices: Vec<Voice>,
    fade: Option<FadeOut>,
    music_voice: Option<Voice>,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundBank {
    /// Empty bank with no output device attached
    pub fn new() -> Self {
        Self {
            output: None,
            effects: HashMap::new(),
            music: HashMap::new(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            muted: false,
            voices: Vec::new(),
            fade: None,
            music_voice: None,
        }
    }

    /// Open the default output device. Safe to call repeatedly.
    ///
    /// Returns false when no device is available; the bank stays usable and
    /// simply plays nothing.
    pub fn init(&mut self) -> bool {
        if self.output.is_some() {
            return true;
        }
        match OutputStream::try_default() {
            Ok((stream, handle)) => {
                log::info!("Audio output opened");
                self.output = Some(Output {
                    _stream: stream,
                    handle,
                });
                true
            }
            Err(e) => {
                log::warn!("Audio unavailable, continuing without sound: {e}");
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.output.is_some()
    }

    /// Take volume levels from user settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
        self.refresh_volumes();
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
        self.refresh_volumes();
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        self.refresh_volumes();
    }

    /// Mute/unmute all audio, including sounds already playing
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            log::debug!("Audio {}", if muted { "muted" } else { "unmuted" });
        }
        self.muted = muted;
        self.refresh_volumes();
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn register_effect(&mut self, name: &str, data: AudioData) {
        self.effects.insert(name.to_owned(), data);
    }

    pub fn register_music(&mut self, name: &str, data: AudioData) {
        self.music.insert(name.to_owned(), data);
    }

    /// Returns true if the name was registered
    pub fn unregister_effect(&mut self, name: &str) -> bool {
        self.effects.remove(name).is_some()
    }

    /// Returns true if the name was registered
    pub fn unregister_music(&mut self, name: &str) -> bool {
        self.music.remove(name).is_some()
    }

    pub fn has_sound_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    pub fn has_music(&self, name: &str) -> bool {
        self.music.contains_key(name)
    }

    /// Play a registered effect `times` times back to back.
    ///
    /// `volume` scales this play only and defaults to 1.0.
    pub fn play_effect(&mut self, name: &str, volume: Option<f32>, times: u32) {
        let Some(data) = self.effects.get(name).cloned() else {
            log::debug!("No sound effect named {name:?}");
            return;
        };
        let volume = volume.unwrap_or(1.0).clamp(0.0, 1.0);
        let Some(sink) = self.new_sink(self.effect_gain(volume)) else {
            return;
        };
        for _ in 0..times.max(1) {
            match decode(&data) {
                Some(source) => sink.append(source),
                None => {
                    log::debug!("Sound effect {name:?} could not be decoded");
                    return;
                }
            }
        }
        self.voices.push(Voice { sink, volume });
    }

    /// Play a registered track `times` times, replacing the current one
    pub fn play_music(&mut self, name: &str, times: u32) {
        self.start_music(name, |sink, data| {
            for _ in 0..times.max(1) {
                sink.append(decode(data)?);
            }
            Some(())
        });
    }

    /// Play a registered track on repeat until `stop_music`
    pub fn loop_music(&mut self, name: &str) {
        self.start_music(name, |sink, data| {
            sink.append(decode(data)?.repeat_infinite());
            Some(())
        });
    }

    pub fn stop_music(&mut self) {
        if let Some(voice) = self.music_voice.take() {
            voice.sink.stop();
        }
    }

    /// Fade every effect currently playing to silence over `duration_ms`.
    ///
    /// Effects started afterwards are not affected.
    pub fn fade_out_effects(&mut self, duration_ms: u32) {
        let fade = self.fade.get_or_insert_with(|| FadeOut {
            voices: Vec::new(),
            elapsed_ms: 0.0,
            duration_ms: 0.0,
        });
        fade.voices.append(&mut self.voices);
        fade.elapsed_ms = 0.0;
        fade.duration_ms = duration_ms as f32;
        self.advance_fade(0.0);
    }

    /// Once per simulated frame: drops finished sinks and advances fades
    pub fn update(&mut self) {
        self.voices.retain(|voice| !voice.sink.empty());
        if self
            .music_voice
            .as_ref()
            .is_some_and(|voice| voice.sink.empty())
        {
            self.music_voice = None;
        }
        self.advance_fade((SIM_DT * 1000.0) as f32);
    }

    /// True while a fade started by `fade_out_effects` is still running
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn advance_fade(&mut self, dt_ms: f32) {
        let Some(fade) = &mut self.fade else { return };
        fade.elapsed_ms += dt_ms;
        let gain = fade.gain();
        if gain <= 0.0 {
            for voice in &fade.voices {
                voice.sink.stop();
            }
            self.fade = None;
            return;
        }
        let base = effective(self.muted, self.master_volume * self.sfx_volume);
        for voice in &fade.voices {
            voice.sink.set_volume(base * voice.volume * gain);
        }
    }

    fn start_music(&mut self, name: &str, fill: impl FnOnce(&Sink, &AudioData) -> Option<()>) {
        self.stop_music();
        let Some(data) = self.music.get(name).cloned() else {
            log::debug!("No music track named {name:?}");
            return;
        };
        let Some(sink) = self.new_sink(self.music_gain()) else {
            return;
        };
        if fill(&sink, &data).is_none() {
            log::debug!("Music track {name:?} could not be decoded");
            return;
        }
        self.music_voice = Some(Voice { sink, volume: 1.0 });
    }

    fn new_sink(&self, volume: f32) -> Option<Sink> {
        let output = self.output.as_ref()?;
        match Sink::try_new(&output.handle) {
            Ok(sink) => {
                sink.set_volume(volume);
                Some(sink)
            }
            Err(e) => {
                log::warn!("Failed to create audio sink: {e}");
                None
            }
        }
    }

    fn effect_gain(&self, volume: f32) -> f32 {
        effective(self.muted, self.master_volume * self.sfx_volume * volume)
    }

    fn music_gain(&self) -> f32 {
        effective(self.muted, self.master_volume * self.music_volume)
    }

    fn refresh_volumes(&mut self) {
        for voice in &self.voices {
            voice.sink.set_volume(self.effect_gain(voice.volume));
        }
        if let Some(voice) = &self.music_voice {
            voice.sink.set_volume(self.music_gain());
        }
        self.advance_fade(0.0);
    }
}

#[inline]
fn effective(muted: bool, volume: f32) -> f32 {
    if muted { 0.0 } else { volume }
}

fn decode(data: &AudioData) -> Option<Decoder<Cursor<AudioData>>> {
    Decoder::new(Cursor::new(Arc::clone(data))).ok()
}
