//! Audio Codec - WAV 编解码

mod wav_codec;

pub use wav_codec::{decode_wav, write_wav, WavCodecError};

#[cfg(test)]
pub(crate) use wav_codec::encode_pcm16;
