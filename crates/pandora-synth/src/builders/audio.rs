//! PCM WAV: a few seconds of wandering tones over low-level noise.

use rand::Rng;

use crate::faker::Faker;

const SAMPLE_RATE: u32 = 8_000;
const BITS: u16 = 16;
const CHANNELS: u16 = 1;

pub(super) fn wav(fake: &mut Faker) -> Vec<u8> {
    let seconds = fake.range(1, 4) as u32;
    let samples = SAMPLE_RATE * seconds;
    let segment = SAMPLE_RATE as usize / 4;

    let mut pcm = Vec::with_capacity(samples as usize * 2);
    let mut freq = 220.0_f64;
    for i in 0..samples as usize {
        if i % segment == 0 {
            freq = fake.range(180, 900) as f64;
        }
        let t = i as f64 / SAMPLE_RATE as f64;
        let tone = (2.0 * std::f64::consts::PI * freq * t).sin() * 9_000.0;
        let noise: f64 = fake.rng().gen_range(-600.0..600.0);
        let sample = (tone + noise).clamp(i16::MIN as f64, i16::MAX as f64) as i16;
        pcm.extend_from_slice(&sample.to_le_bytes());
    }

    let block_align = CHANNELS * BITS / 8;
    let byte_rate = SAMPLE_RATE * block_align as u32;
    let data_len = pcm.len() as u32;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&pcm);
    out
}
