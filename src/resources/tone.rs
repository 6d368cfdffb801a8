//! Procedural sound cues
//!
//! Short square/sine tones rendered to an in-memory 16-bit mono WAV, so the
//! game has pickup and game-over cues without shipping audio files.

use std::f32::consts::PI;

pub const SAMPLE_RATE: u32 = 44_100;
/// Longest tone a manifest may request
pub const MAX_TONE_MS: u32 = 10_000;
const ATTACK_MS: f32 = 4.0;
const RELEASE_MS: f32 = 30.0;
const VOLUME: f32 = 0.35;

/// Render a tone of `freq_hz` lasting `duration_ms` (at most
/// [`MAX_TONE_MS`]) as a complete WAV file
pub fn tone_wav(freq_hz: f32, duration_ms: u32) -> Vec<u8> {
    let samples = tone_samples(freq_hz, duration_ms.min(MAX_TONE_MS));
    wav_bytes(&samples, SAMPLE_RATE)
}

fn tone_samples(freq_hz: f32, duration_ms: u32) -> Vec<i16> {
    let sr = SAMPLE_RATE as f32;
    let total = (duration_ms as f32 / 1000.0 * sr) as usize;
    let attack = ((ATTACK_MS / 1000.0 * sr) as usize).min(total / 2).max(1);
    let release = ((RELEASE_MS / 1000.0 * sr) as usize).min(total / 2).max(1);

    (0..total)
        .map(|i| {
            let t = i as f32 / sr;
            let sine = (2.0 * PI * freq_hz * t).sin();
            let square = if sine >= 0.0 { 1.0 } else { -1.0 };
            let envelope = if i < attack {
                i as f32 / attack as f32
            } else if i >= total - release {
                (total - i) as f32 / release as f32
            } else {
                1.0
            };
            let s = ((0.6 * sine + 0.4 * square) * VOLUME * envelope).clamp(-1.0, 1.0);
            (s * i16::MAX as f32) as i16
        })
        .collect()
}

/// Wrap mono 16-bit PCM in a RIFF/WAVE container
fn wav_bytes(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    let num_channels = 1u16;
    let bits_per_sample = 16u16;
    let byte_rate = sample_rate * u32::from(num_channels) * u32::from(bits_per_sample) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_len = (samples.len() * 2) as u32;

    let mut out = Vec::with_capacity(44 + samples.len() * 2);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([
            bytes[offset],
            bytes[offset + 1],
            bytes[offset + 2],
            bytes[offset + 3],
        ])
    }

    #[test]
    fn test_wav_header() {
        let wav = tone_wav(440.0, 100);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u32_at(&wav, 24), SAMPLE_RATE);
        assert_eq!(&wav[36..40], b"data");

        // 100 ms at 44.1 kHz, two bytes per sample
        assert_eq!(u32_at(&wav, 40), 4410 * 2);
        assert_eq!(wav.len(), 44 + 4410 * 2);
        assert_eq!(u32_at(&wav, 4) as usize, wav.len() - 8);
    }

    #[test]
    fn test_envelope_starts_and_ends_silent() {
        let samples = tone_samples(440.0, 50);
        assert_eq!(samples[0], 0);
        assert!(samples.last().is_some_and(|s| s.unsigned_abs() < 200));
        assert!(samples.iter().any(|s| s.unsigned_abs() > 5000));
    }

    #[test]
    fn test_length_is_capped() {
        let wav = tone_wav(440.0, u32::MAX);
        let samples = (MAX_TONE_MS as usize / 1000) * SAMPLE_RATE as usize;
        assert_eq!(wav.len(), 44 + samples * 2);
        assert_eq!(u32_at(&wav, 4) as usize, wav.len() - 8);
    }

    #[test]
    fn test_zero_length_tone() {
        let wav = tone_wav(440.0, 0);
        assert_eq!(wav.len(), 44);
    }
}
