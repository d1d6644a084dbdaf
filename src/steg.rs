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

use crate::error::StegError;

///
/// Embedding parameters.
///
pub struct Parameters {
  /// QIM embedding strength.  Larger values survive noisier carriers but
  /// are easier to hear.
  pub alpha: f64,

  /// Synthesize a fallback sine carrier when the input wav is missing.
  pub synthesize_missing: bool,
}

impl Parameters {
  pub const DEFAULT_ALPHA: f64 = 0.1;

  pub fn new(alpha: f64) -> Result<Self, StegError> {
    if !(alpha > 0.0) {
      return Err(StegError::InvalidAlpha);
    }

    Ok(Parameters {
      alpha,
      ..Default::default()
    })
  }
}

impl Default for Parameters {
  fn default() -> Self {
    Parameters {
      alpha: Self::DEFAULT_ALPHA,
      synthesize_missing: true,
    }
  }
}

///
/// Extraction inputs for when the sidecar is missing or incomplete.
///
/// A sidecar found next to the stego file always wins; these fields are the
/// out-of-band fallback.
///
#[derive(Default)]
pub struct ExtractOptions {
  /// Total container bit length, the sidecar's `bits_length`.
  pub bits_length: Option<usize>,

  /// Embedding strength used at embed time.
  pub alpha: Option<f64>,

  /// PEM of the RSA private key for the outer envelope.
  pub rsa_private_pem: Option<String>,

  /// PEM of the EC private key.  Carried for completeness; the inner layer
  /// transports its session key in the clear and never needs it.
  pub ecc_private_pem: Option<String>,
}

/// The fixed 32-bit length field that opens every container.
pub struct Container {}

impl Container {
  /// Width of the header-length prefix, in bits.
  pub const LEN_FIELD_BITS: usize = 32;
}

/// Fallback carrier synthesis, used when the input wav does not exist.
pub struct FallbackCarrier {}

impl FallbackCarrier {
  pub const DURATION_SECS: u32 = 10;
  pub const SAMPLE_RATE: u32 = 44_100;
  pub const FREQUENCY_HZ: f64 = 440.0;
  pub const AMPLITUDE: f64 = 0.5;
}

#[cfg(test)]
mod tests {
  use crate::error::StegError;
  use crate::steg::Parameters;

  #[test]
  fn test_default_parameters() {
    let params = Parameters::default();
    assert_eq!(params.alpha, 0.1);
    assert!(params.synthesize_missing);
  }

  #[test]
  fn test_alpha_validation() {
    assert!(Parameters::new(0.05).is_ok());
    assert!(matches!(Parameters::new(0.0), Err(StegError::InvalidAlpha)));
    assert!(matches!(Parameters::new(-1.0), Err(StegError::InvalidAlpha)));
  }
}
