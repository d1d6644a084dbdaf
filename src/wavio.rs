/**************************************************************************
 *                                                                        *
 * stegowav - hiding encrypted messages in wav audio with DWT + QIM.      *
 *                                                                        *
 * This program is free software; you can redistribute it and/or modify   *
 * it under the terms of the GNU General Public License as published by   *
 * the Free Software Foundation, either version 3 of the License, or      *
 * (at your option) any later version.                                    *
 *                                                                        *
 * This program is distributed in the hope that it will be useful,        *
 * but WITHOUT ANY WARRANTY; without even the implied warranty of         *
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the           *
 * GNU General Public License for more details.                           *
 *                                                                        *
 * You should have received a copy of the GNU General Public License      *
 * along with this program. If not, see <http://www.gnu.org/licenses/>.   *
 *                                                                        *
 **************************************************************************/

// std
use std::path;

// externs
use crate::hound;

// this crate
use crate::error::StegError;

///
/// A wav carrier loaded into memory: per-channel f64 samples in [-1, 1]
/// plus the spec they were read with.  Channel 0 is the host channel.
///
#[derive(Debug)]
pub struct Carrier {
  pub channels: Vec<Vec<f64>>,
  pub spec: hound::WavSpec,
}

impl Carrier {
  /// The host channel, the only one that carries hidden bits.
  pub fn host(&self) -> &[f64] {
    &self.channels[0]
  }
}

///
/// Read a wav file and deinterleave it into f64 channels.
///
/// Integer formats (16/24/32 bit) are scaled to [-1, 1]; float formats are
/// widened as-is.  The returned spec is used verbatim when writing the
/// stego output, so sample rate, channel count and bit depth round-trip.
///
pub fn read_carrier<P: AsRef<path::Path>>(path: P) -> Result<Carrier, StegError> {
  let mut reader = hound::WavReader::open(path).map_err(read_err)?;
  let spec = reader.spec();
  let num_channels = spec.channels as usize;
  if num_channels == 0 {
    return Err(StegError::Wav(hound::Error::FormatError("wav has no channels")));
  }

  let mut channels: Vec<Vec<f64>> = vec![Vec::new(); num_channels];
  match spec.sample_format {
    hound::SampleFormat::Float => {
      for (i, sample) in reader.samples::<f32>().enumerate() {
        channels[i % num_channels].push(sample.map_err(read_err)? as f64);
      }
    }
    hound::SampleFormat::Int => {
      let scale = (1u64 << (spec.bits_per_sample - 1)) as f64;
      for (i, sample) in reader.samples::<i32>().enumerate() {
        channels[i % num_channels].push(sample.map_err(read_err)? as f64 / scale);
      }
    }
  }

  Ok(Carrier { channels, spec })
}

///
/// Interleave `channels` and write them out under `spec`.
///
/// Channels are truncated to the shortest channel length.  Integer samples
/// are rounded and clamped to the representable range.
///
pub fn write_carrier<P: AsRef<path::Path>>(
  path: P,
  channels: &[Vec<f64>],
  spec: hound::WavSpec,
) -> Result<(), StegError> {
  let mut writer = hound::WavWriter::create(path, spec).map_err(write_err)?;
  let len = channels.iter().map(Vec::len).min().unwrap_or(0);

  match spec.sample_format {
    hound::SampleFormat::Float => {
      for i in 0..len {
        for channel in channels {
          writer.write_sample(channel[i] as f32).map_err(write_err)?;
        }
      }
    }
    hound::SampleFormat::Int => {
      let scale = (1u64 << (spec.bits_per_sample - 1)) as f64;
      for i in 0..len {
        for channel in channels {
          let value = (channel[i] * scale).round().clamp(-scale, scale - 1.0);
          writer.write_sample(value as i32).map_err(write_err)?;
        }
      }
    }
  }

  writer.finalize().map_err(write_err)
}

///
/// Write a mono 16-bit sine carrier, the stand-in used when no input wav
/// is available.
///
pub fn synthesize_sine<P: AsRef<path::Path>>(
  path: P,
  duration_secs: u32,
  sample_rate: u32,
  frequency_hz: f64,
  amplitude: f64,
) -> Result<(), StegError> {
  let spec = hound::WavSpec {
    channels: 1,
    sample_rate,
    bits_per_sample: 16,
    sample_format: hound::SampleFormat::Int,
  };

  let num_samples = (duration_secs as u64 * sample_rate as u64) as usize;
  let samples: Vec<f64> = (0..num_samples)
    .map(|i| {
      let t = i as f64 / sample_rate as f64;
      amplitude * (2.0 * std::f64::consts::PI * frequency_hz * t).sin()
    })
    .collect();

  write_carrier(path, &[samples], spec)
}

fn read_err(err: hound::Error) -> StegError {
  match err {
    hound::Error::IoError(io) => StegError::IoRead(io),
    other => StegError::Wav(other),
  }
}

fn write_err(err: hound::Error) -> StegError {
  match err {
    hound::Error::IoError(io) => StegError::IoWrite(io),
    other => StegError::Wav(other),
  }
}

#[cfg(test)]
mod tests {
  use crate::hound;
  use crate::wavio::{read_carrier, synthesize_sine, write_carrier};

  fn temp_wav(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("stegowav_wavio_{}_{}.wav", name, std::process::id()))
  }

  #[test]
  fn test_int16_round_trip_exact() {
    let path = temp_wav("i16");
    let spec = hound::WavSpec {
      channels: 2,
      sample_rate: 48_000,
      bits_per_sample: 16,
      sample_format: hound::SampleFormat::Int,
    };
    let left: Vec<f64> = (-100i32..100).map(|v| v as f64 / 32768.0).collect();
    let right: Vec<f64> = (-100i32..100).rev().map(|v| v as f64 / 32768.0).collect();
    write_carrier(&path, &[left.clone(), right.clone()], spec).unwrap();

    let carrier = read_carrier(&path).unwrap();
    assert_eq!(carrier.spec, spec);
    assert_eq!(carrier.channels.len(), 2);
    assert_eq!(carrier.channels[0], left);
    assert_eq!(carrier.channels[1], right);
    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn test_out_of_range_samples_clamp() {
    let path = temp_wav("clamp");
    let spec = hound::WavSpec {
      channels: 1,
      sample_rate: 8_000,
      bits_per_sample: 16,
      sample_format: hound::SampleFormat::Int,
    };
    write_carrier(&path, &[vec![1.5, -1.5, 0.0]], spec).unwrap();
    let carrier = read_carrier(&path).unwrap();
    assert_eq!(carrier.channels[0][0], 32767.0 / 32768.0);
    assert_eq!(carrier.channels[0][1], -1.0);
    assert_eq!(carrier.channels[0][2], 0.0);
    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn test_synthesized_carrier_shape() {
    let path = temp_wav("sine");
    synthesize_sine(&path, 1, 8_000, 440.0, 0.5).unwrap();
    let carrier = read_carrier(&path).unwrap();
    assert_eq!(carrier.spec.channels, 1);
    assert_eq!(carrier.spec.sample_rate, 8_000);
    assert_eq!(carrier.host().len(), 8_000);
    let peak = carrier.host().iter().fold(0.0f64, |m, v| m.max(v.abs()));
    assert!(peak > 0.45 && peak < 0.51);
    std::fs::remove_file(&path).ok();
  }

  #[test]
  fn test_missing_file_is_read_error() {
    let err = read_carrier("/nonexistent/stegowav.wav").unwrap_err();
    assert!(matches!(err, crate::error::StegError::IoRead(_)));
  }
}
