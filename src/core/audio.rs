use std::{fs::File, io::ErrorKind, path::Path};

use hound::WavWriter;
use log::{debug, warn};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::DecoderOptions,
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::{
    error::{HarnessError, Result},
    types::AudioData,
};

/// Decodes any container/codec symphonia knows about into interleaved f32.
pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path: &Path = path.as_ref();
    let decode_err = |source: SymphoniaError| HarnessError::Decode {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        return Err(HarnessError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file: File = File::open(path)?;
    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(decode_err)?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| decode_err(SymphoniaError::Unsupported("no default track")))?;
    let track_id = track.id;

    let mut sample_rate: u32 = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels: u16 = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    let mut decoder = get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(decode_err)?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(e) if is_end_of_stream(&e) => break,
            Err(e) => return Err(decode_err(e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!("Skipping corrupt packet in {}: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(decode_err(e)),
        };
        sample_rate = decoded.spec().rate;
        channels = decoded.spec().channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        samples.extend_from_slice(buffer.samples());
    }

    if sample_rate == 0 || channels == 0 {
        return Err(decode_err(SymphoniaError::Unsupported(
            "unknown sample rate or channel layout",
        )));
    }

    debug!(
        "🎧 Read audio {}: sample_rate={}, channels={}, samples={}",
        path.display(),
        sample_rate,
        channels,
        samples.len()
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}

/// Symphonia signals a clean end of stream as an `UnexpectedEof` I/O error.
fn is_end_of_stream(err: &SymphoniaError) -> bool {
    matches!(err, SymphoniaError::IoError(e) if e.kind() == ErrorKind::UnexpectedEof)
}

/// Writes 16-bit PCM, replacing any existing file at `path`.
pub fn write_audio<P: AsRef<Path>>(path: P, audio: &AudioData) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;
    for sample in &audio.samples {
        let s = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        writer.write_sample(s)?;
    }

    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unexpected_eof_ends_the_stream() {
        let eof = SymphoniaError::IoError(std::io::Error::new(
            ErrorKind::UnexpectedEof,
            "end of stream",
        ));
        assert!(is_end_of_stream(&eof));

        let broken_pipe =
            SymphoniaError::IoError(std::io::Error::new(ErrorKind::BrokenPipe, "gone"));
        assert!(!is_end_of_stream(&broken_pipe));
        assert!(!is_end_of_stream(&SymphoniaError::ResetRequired));
        assert!(!is_end_of_stream(&SymphoniaError::DecodeError("bad frame")));
    }
}
