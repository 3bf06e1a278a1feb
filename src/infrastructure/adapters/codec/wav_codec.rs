//! WAV Codec
//!
//! - 解码: symphonia，把推理服务返回的 WAV 字节转成 [`Waveform`]
//! - 编码: hound，把波形写成 32-bit float WAV 文件

use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

use crate::domain::Waveform;

/// WAV 编解码错误
#[derive(Debug, Error)]
pub enum WavCodecError {
    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// 解码 WAV 字节为交错 f32 波形，采样率和声道数取自文件头
pub fn decode_wav(data: &[u8]) -> Result<Waveform, WavCodecError> {
    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("wav");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| WavCodecError::DecodingError(format!("Probe failed: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| WavCodecError::DecodingError("No audio track found".to_string()))?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| WavCodecError::DecodingError("Unknown sample rate".to_string()))?;

    let channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .ok_or_else(|| WavCodecError::DecodingError("Unknown channel count".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| WavCodecError::DecodingError(format!("Decoder creation failed: {}", e)))?;

    let track_id = track.id;
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(WavCodecError::DecodingError(format!(
                    "Packet read error: {}",
                    e
                )));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Decode error (skipping packet): {}", e);
                continue;
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let actual_samples = num_frames * spec.channels.count();
        samples.extend(&sample_buf.samples()[..actual_samples]);
    }

    Waveform::new(samples, channels, sample_rate)
        .map_err(|e| WavCodecError::DecodingError(e.to_string()))
}

/// 写入 32-bit float WAV，已存在的文件会被覆盖
pub fn write_wav(path: &Path, waveform: &Waveform) -> Result<(), WavCodecError> {
    let spec = hound::WavSpec {
        channels: waveform.channels(),
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| WavCodecError::EncodingError(e.to_string()))?;
    for &sample in waveform.samples() {
        writer
            .write_sample(sample)
            .map_err(|e| WavCodecError::EncodingError(e.to_string()))?;
    }
    writer
        .finalize()
        .map_err(|e| WavCodecError::EncodingError(e.to_string()))
}

/// 16-bit PCM WAV 字节，测试里充当推理服务的输出
#[cfg(test)]
pub(crate) fn encode_pcm16(waveform: &Waveform) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: waveform.channels(),
        sample_rate: waveform.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &sample in waveform.samples() {
            writer
                .write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}
