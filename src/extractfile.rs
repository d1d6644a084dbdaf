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
use std::path::Path;

// this crate
use crate::container;
use crate::container::ContainerReport;
use crate::envelope;
use crate::error::StegError;
use crate::keys;
use crate::qim;
use crate::sidecar;
use crate::steg::{ExtractOptions, Parameters};
use crate::wavelet;
use crate::wavio;

// Extraction is a straight pipeline; every stage failure is terminal:
//
//   read wav -> forward DWT -> extract bits -> parse length -> parse header
//     -> parse payload -> open outer envelope -> open inner envelope

///
/// Recover the cleartext hidden in `stego`.
///
/// A `.info` sidecar next to the file supplies the container bit count, the
/// embedding strength and the private keys.  Without one, `options` must
/// carry the bit count (alpha falls back to the default) and the RSA
/// private key, otherwise the call fails with `MissingBitsLength` or
/// `MissingKeyMaterial`.
///
pub fn extract_file<P: AsRef<Path>>(stego: P, options: &ExtractOptions) -> Result<String, StegError> {
  let side = sidecar::load(&stego)?;

  let (num_bits, alpha, rsa_pem) = match &side {
    Some(sc) => (sc.bits_length, sc.alpha, Some(sc.rsa_private_key.clone())),
    None => (
      options.bits_length.ok_or(StegError::MissingBitsLength)?,
      options.alpha.unwrap_or(Parameters::DEFAULT_ALPHA),
      options.rsa_private_pem.clone(),
    ),
  };

  let stream = extract_stream(&stego, num_bits, alpha)?;
  let parsed = container::parse(&stream)?;

  let rsa_pem = rsa_pem.ok_or(StegError::MissingKeyMaterial)?;
  let rsa_private = keys::rsa_private_from_pem(&rsa_pem)?;

  envelope::open_message(&parsed.header, &parsed.payload, &rsa_private)
}

///
/// Look at the raw container inside `stego` without decrypting anything.
///
/// Useful when a sidecar is suspect: the report shows whether the embedded
/// frame lengths and header survive extraction at the given parameters.
///
pub fn inspect_file<P: AsRef<Path>>(
  stego: P,
  options: &ExtractOptions,
) -> Result<ContainerReport, StegError> {
  let side = sidecar::load(&stego)?;

  let (num_bits, alpha) = match &side {
    Some(sc) => (sc.bits_length, sc.alpha),
    None => (
      options.bits_length.ok_or(StegError::MissingBitsLength)?,
      options.alpha.unwrap_or(Parameters::DEFAULT_ALPHA),
    ),
  };

  let stream = extract_stream(&stego, num_bits, alpha)?;
  container::inspect(&stream)
}

fn extract_stream<P: AsRef<Path>>(stego: P, num_bits: usize, alpha: f64) -> Result<Vec<u8>, StegError> {
  let carrier = wavio::read_carrier(stego)?;
  let dec = wavelet::forward(carrier.host());
  Ok(qim::extract_bits(&dec.detail, num_bits, alpha))
}

#[cfg(test)]
mod tests {
  use crate::error::StegError;
  use crate::extractfile::extract_file;
  use crate::steg::ExtractOptions;

  fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("stegowav_extract_{}_{}.wav", name, std::process::id()))
  }

  #[test]
  fn test_no_sidecar_and_no_bit_count() {
    let stego = temp_path("nobits");
    crate::wavio::synthesize_sine(&stego, 1, 8_000, 440.0, 0.5).unwrap();
    assert!(matches!(
      extract_file(&stego, &ExtractOptions::default()),
      Err(StegError::MissingBitsLength)
    ));
    std::fs::remove_file(&stego).ok();
  }

  #[test]
  fn test_plain_carrier_does_not_parse() {
    // A carrier with nothing embedded must fail loudly, never produce text
    let stego = temp_path("plain");
    crate::wavio::synthesize_sine(&stego, 1, 8_000, 440.0, 0.5).unwrap();
    let options = ExtractOptions {
      bits_length: Some(4000),
      ..Default::default()
    };
    let err = extract_file(&stego, &options).unwrap_err();
    assert!(matches!(
      err,
      StegError::LengthUnderflow { .. } | StegError::HeaderParse | StegError::Base64Decode
    ));
    std::fs::remove_file(&stego).ok();
  }
}
