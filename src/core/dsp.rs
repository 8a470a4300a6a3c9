use log::debug;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::{
    error::{HarnessError, Result},
    types::AudioData,
};

/// Interleaved stereo. Mono is duplicated, extra channels beyond the first two are dropped.
pub fn to_stereo(interleaved: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.iter().flat_map(|&x| [x, x]).collect(),
        2 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n as usize)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    }
}

pub fn ensure_stereo(audio: AudioData) -> AudioData {
    if audio.channels == 2 {
        return audio;
    }
    AudioData {
        samples: to_stereo(&audio.samples, audio.channels),
        sample_rate: audio.sample_rate,
        channels: 2,
    }
}

/// [L, R, L, R, ...] -> [[L, L, ...], [R, R, ...]]
pub fn deinterleave(samples: &[f32], channels: u16) -> Vec<Vec<f32>> {
    let n = channels.max(1) as usize;
    let frames = samples.len() / n;
    let mut planar = vec![Vec::with_capacity(frames); n];
    for frame in samples.chunks_exact(n) {
        for (ch, &s) in frame.iter().enumerate() {
            planar[ch].push(s);
        }
    }
    planar
}

pub fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planar.len());
    for i in 0..frames {
        for ch in planar {
            out.push(ch[i]);
        }
    }
    out
}

const SINC_LEN: usize = 256;

/// Sinc resampling of the whole buffer in one pass.
///
/// The output holds exactly `round(frames * ratio)` frames; the filter delay is
/// trimmed so frame 0 of the output lines up with frame 0 of the input.
pub fn resample(audio: &AudioData, target_rate: u32) -> Result<AudioData> {
    if audio.sample_rate == target_rate || audio.frames() == 0 {
        return Ok(AudioData {
            samples: audio.samples.clone(),
            sample_rate: target_rate,
            channels: audio.channels,
        });
    }

    let frames = audio.frames();
    let ratio = target_rate as f64 / audio.sample_rate as f64;
    let expected = (frames as f64 * ratio).round() as usize;

    debug!(
        "Resampling {}Hz -> {}Hz ({} channels, {} frames)",
        audio.sample_rate, target_rate, audio.channels, frames
    );

    // Zero tail so the filter flushes the last real frames.
    let chunk = frames + 2 * SINC_LEN;
    let mut planar_in = deinterleave(&audio.samples, audio.channels);
    for ch in &mut planar_in {
        ch.resize(chunk, 0.0);
    }

    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 1.0, params, chunk, audio.channels as usize)
            .map_err(|e| HarnessError::Resample(e.to_string()))?;
    let delay = resampler.output_delay();

    let planar_out: Vec<Vec<f32>> = resampler
        .process(&planar_in, None)
        .map_err(|e| HarnessError::Resample(e.to_string()))?
        .into_iter()
        .map(|ch| {
            ch.into_iter()
                .skip(delay)
                .chain(std::iter::repeat(0.0))
                .take(expected)
                .collect()
        })
        .collect();

    Ok(AudioData {
        samples: interleave(&planar_out),
        sample_rate: target_rate,
        channels: audio.channels,
    })
}
