//! Game-over sound: a falling sawtooth synthesized with fundsp and played
//! through rodio.

use anyhow::{Context, Result};
use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

pub const SAMPLE_RATE: u32 = 44_100;

/// Open audio output. Keep the value alive for as long as sound should play.
pub struct Audio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Audio {
    pub fn open() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("no audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    pub fn play_game_over(&self) -> Result<()> {
        let sink = Sink::try_new(&self.handle).context("could not create audio sink")?;
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, game_over_samples()));
        sink.detach(); // Play in background
        Ok(())
    }
}

/// 0.5 s of sawtooth sweeping 400 Hz -> 80 Hz over 0.4 s while the gain
/// fades 0.15 -> 0.
pub fn game_over_samples() -> Vec<f32> {
    let freq = shared(400.0);
    let mut osc = var(&freq) >> saw();
    osc.set_sample_rate(SAMPLE_RATE as f64);

    let len = SAMPLE_RATE as usize / 2;
    (0..len)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            let sweep = (t / 0.4).min(1.0);
            freq.set_value(400.0 + (80.0 - 400.0) * sweep);
            let gain = 0.15 * (1.0 - (t / 0.5).min(1.0));
            osc.get_mono() * gain
        })
        .collect()
}
