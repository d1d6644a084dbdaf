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
use std::io;
use std::path::{Path, PathBuf};

// externs
use log::warn;

// this crate
use crate::container;
use crate::envelope;
use crate::error::StegError;
use crate::qim;
use crate::sidecar;
use crate::steg::{FallbackCarrier, Parameters};
use crate::wavelet;
use crate::wavio;

///
/// Hide `message` inside a wav carrier and write the stego wav plus its
/// sidecar files.
///
/// The message is double-encrypted, framed into a self-describing bit
/// stream, and embedded into the detail coefficients of the carrier's first
/// channel.  Remaining channels are copied through untouched.  A missing
/// carrier is replaced by a synthesized sine when
/// `params.synthesize_missing` is set.
///
/// A failure to write the sidecar does not fail the call: the stego wav is
/// already on disk at that point, so the problem is logged and the call
/// succeeds.  Without the sidecar the message cannot be decrypted, which is
/// why the warning should not be ignored.
///
/// ### Arguments
///
/// * `input` - the carrier wav to read.
/// * `output` - the stego wav to write.  It will be overwritten.
/// * `message` - the cleartext to hide.
/// * `params` - embedding strength and fallback behaviour.
///
pub fn embed_file<P: AsRef<Path>>(
  input: P,
  output: P,
  message: &str,
  params: &Parameters,
) -> Result<PathBuf, StegError> {
  if !input.as_ref().exists() {
    if params.synthesize_missing {
      wavio::synthesize_sine(
        &input,
        FallbackCarrier::DURATION_SECS,
        FallbackCarrier::SAMPLE_RATE,
        FallbackCarrier::FREQUENCY_HZ,
        FallbackCarrier::AMPLITUDE,
      )?;
    } else {
      return Err(StegError::IoRead(io::Error::new(
        io::ErrorKind::NotFound,
        "carrier wav not found",
      )));
    }
  }

  // Encrypt first: the container length decides whether the carrier fits.
  let sealed = envelope::seal_message(message)?;
  let stream = container::assemble(&sealed.header, &sealed.payload)?;

  let carrier = wavio::read_carrier(&input)?;
  let mut dec = wavelet::forward(carrier.host());
  if stream.len() > dec.capacity() {
    return Err(StegError::CapacityExceeded {
      needed: stream.len(),
      available: dec.capacity(),
    });
  }

  qim::embed_bits(&mut dec.detail, &stream, params.alpha)?;
  let host = wavelet::inverse(&dec);

  // The host channel is replaced, every other channel passes through.
  let mut channels = Vec::with_capacity(carrier.channels.len());
  channels.push(host);
  for extra in &carrier.channels[1..] {
    channels.push(extra.clone());
  }
  wavio::write_carrier(&output, &channels, carrier.spec)?;

  let side = sidecar::Sidecar {
    bits_length: stream.len(),
    ecc_public_key: sealed.ecc.public_pem.clone(),
    ecc_private_key: (*sealed.ecc.private_pem).clone(),
    rsa_public_key: sealed.rsa.public_pem.clone(),
    rsa_private_key: (*sealed.rsa.private_pem).clone(),
    message_length: sealed.header.message_length,
    alpha: params.alpha,
  };
  if let Err(err) = sidecar::write(&output, &side) {
    warn!("stego wav written but sidecar failed: {}", err);
  }
  if let Err(err) = sidecar::write_key_file(
    &output,
    &sealed.ecc.public_pem,
    &sealed.ecc.private_pem,
    &sealed.rsa.public_pem,
    &sealed.rsa.private_pem,
  ) {
    warn!("stego wav written but key file failed: {}", err);
  }

  Ok(output.as_ref().to_path_buf())
}
