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

// this crate
use crate::error::StegError;

// Quantisation index modulation over detail coefficients.  A bit is stored
// in the residue of the coefficient magnitude modulo 2*alpha: bit '1' is
// parked at residue alpha, bit '0' at residue 0.  Both functions are pure;
// the decision window below is the only tuning besides alpha itself.

/// Lower edge of the '1' decision window, as a multiple of alpha.
pub const WINDOW_LOW: f64 = 0.4;

/// Upper edge of the '1' decision window, as a multiple of alpha.
pub const WINDOW_HIGH: f64 = 1.6;

///
/// Embed `bits` into the leading coefficients of `detail`.
///
/// Each coefficient magnitude is nudged so that its residue modulo
/// `2 * alpha` lands exactly on the target cell; the sign is kept.
/// Coefficients beyond `bits.len()` are not touched.
///
/// ### Arguments
///
/// * `detail` - the detail coefficient band, modified in place.
/// * `bits` - the bit stream to embed, elements 0 or 1.
/// * `alpha` - embedding strength, must be > 0.
///
pub fn embed_bits(detail: &mut [f64], bits: &[u8], alpha: f64) -> Result<(), StegError> {
  if !(alpha > 0.0) {
    return Err(StegError::InvalidAlpha);
  }
  if bits.len() > detail.len() {
    return Err(StegError::CapacityExceeded {
      needed: bits.len(),
      available: detail.len(),
    });
  }

  let step = 2.0 * alpha;
  for (coeff, &bit) in detail.iter_mut().zip(bits) {
    let magnitude = coeff.abs();
    let remainder = magnitude % step;
    let target = if bit == 1 { alpha } else { 0.0 };
    *coeff = coeff.signum() * (magnitude + (target - remainder));
  }

  Ok(())
}

///
/// Extract `min(num_bits, detail.len())` bits from the leading coefficients.
///
/// A residue inside `[0.4 alpha, 1.6 alpha]` (bounds inclusive) decodes as
/// '1', everything else as '0'.  The asymmetric window tolerates residue
/// drift of up to 0.6 alpha around either target cell.
///
pub fn extract_bits(detail: &[f64], num_bits: usize, alpha: f64) -> Vec<u8> {
  let step = 2.0 * alpha;
  let low = WINDOW_LOW * alpha;
  let high = WINDOW_HIGH * alpha;

  detail
    .iter()
    .take(num_bits)
    .map(|coeff| {
      let remainder = coeff.abs() % step;
      u8::from(remainder >= low && remainder <= high)
    })
    .collect()
}
