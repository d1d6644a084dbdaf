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

// One-level Daubechies-2 (4-tap) discrete wavelet transform with periodic
// boundary extension.  The decimated analysis matrix is orthogonal, so the
// inverse is its transpose and both round trips are exact up to f64
// rounding:
//
//   inverse(forward(x)) == x
//   forward(inverse(cA, cD)) == (cA, cD)
//
// The second identity is what makes coefficient-domain embedding survive the
// trip through the reconstructed sample stream.

/// Orthonormal db2 scaling (low-pass) filter.
///
/// h0 = (1+sqrt 3)/(4 sqrt 2), h1 = (3+sqrt 3)/(4 sqrt 2),
/// h2 = (3-sqrt 3)/(4 sqrt 2), h3 = (1-sqrt 3)/(4 sqrt 2)
const SCALING: [f64; 4] = [
  0.482_962_913_144_690_25,
  0.836_516_303_737_469,
  0.224_143_868_041_857_35,
  -0.129_409_522_550_921_45,
];

/// Matching wavelet (high-pass) filter, g[k] = (-1)^k h[3-k].
const WAVELET: [f64; 4] = [
  -0.129_409_522_550_921_45,
  -0.224_143_868_041_857_35,
  0.836_516_303_737_469,
  -0.482_962_913_144_690_25,
];

/// Number of filter taps.
pub const FILTER_LEN: usize = 4;

///
/// The two coefficient bands of a one-level decomposition.
///
/// `detail` is the band that carries hidden bits; `approx` is left alone.
///
pub struct Decomposition {
  pub approx: Vec<f64>, // cA, low-pass band
  pub detail: Vec<f64>, // cD, high-pass band
  signal_len: usize,    // pre-padding sample count, restored by inverse()
}

impl Decomposition {
  /// Embedding capacity of the decomposed signal, in bits.
  pub fn capacity(&self) -> usize {
    self.detail.len()
  }
}

///
/// Forward one-level db2 transform of `signal`.
///
/// An odd-length signal is extended by replicating its final sample, so the
/// band length is always `ceil(len / 2)`.
///
pub fn forward(signal: &[f64]) -> Decomposition {
  let signal_len = signal.len();

  let padded;
  let x: &[f64] = if signal_len % 2 == 1 {
    let mut p = Vec::with_capacity(signal_len + 1);
    p.extend_from_slice(signal);
    p.push(signal[signal_len - 1]);
    padded = p;
    &padded
  } else {
    signal
  };

  let len = x.len();
  let half = len / 2;
  let mut approx = Vec::with_capacity(half);
  let mut detail = Vec::with_capacity(half);

  for i in 0..half {
    let mut a = 0.0;
    let mut d = 0.0;
    for k in 0..FILTER_LEN {
      let s = x[(2 * i + k) % len];
      a += SCALING[k] * s;
      d += WAVELET[k] * s;
    }
    approx.push(a);
    detail.push(d);
  }

  Decomposition {
    approx,
    detail,
    signal_len,
  }
}

///
/// Inverse one-level db2 transform.
///
/// Returns the reconstructed signal truncated back to the original sample
/// count, so a caller sees `inverse(forward(x)).len() == x.len()`.
///
pub fn inverse(dec: &Decomposition) -> Vec<f64> {
  debug_assert_eq!(dec.approx.len(), dec.detail.len());

  let len = dec.approx.len() * 2;
  let mut signal = vec![0.0; len];

  for i in 0..dec.approx.len() {
    for k in 0..FILTER_LEN {
      signal[(2 * i + k) % len] += dec.approx[i] * SCALING[k] + dec.detail[i] * WAVELET[k];
    }
  }

  signal.truncate(dec.signal_len);
  signal
}

#[cfg(test)]
mod tests {
  use crate::wavelet::{forward, inverse};

  const EPS: f64 = 1e-10;

  fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
  }

  fn sine(len: usize, freq: f64, rate: f64) -> Vec<f64> {
    (0..len)
      .map(|i| 0.5 * (2.0 * std::f64::consts::PI * freq * i as f64 / rate).sin())
      .collect()
  }

  #[test]
  fn test_round_trip_sine() {
    let x = sine(4410, 440.0, 44100.0);
    let recon = inverse(&forward(&x));
    assert_eq!(recon.len(), x.len());
    assert!(max_abs_diff(&x, &recon) < EPS);
  }

  #[test]
  fn test_round_trip_odd_length() {
    let x = sine(1001, 440.0, 44100.0);
    let recon = inverse(&forward(&x));
    assert_eq!(recon.len(), 1001);
    assert!(max_abs_diff(&x, &recon) < EPS);
  }

  #[test]
  fn test_round_trip_short_signals() {
    for len in [2usize, 3, 4, 5, 8] {
      let x: Vec<f64> = (0..len).map(|i| (i as f64 * 0.37).sin()).collect();
      let recon = inverse(&forward(&x));
      assert_eq!(recon.len(), len);
      assert!(max_abs_diff(&x, &recon) < EPS, "len = {}", len);
    }
  }

  #[test]
  fn test_coefficient_round_trip() {
    // The embedding path: perturb the detail band, reconstruct, decompose
    // again, and the perturbed coefficients must come back unchanged.
    let x = sine(8820, 523.25, 44100.0);
    let mut dec = forward(&x);
    for (i, d) in dec.detail.iter_mut().enumerate() {
      if i % 3 == 0 {
        *d += 0.1;
      }
    }
    let again = forward(&inverse(&dec));
    assert!(max_abs_diff(&dec.detail, &again.detail) < EPS);
    assert!(max_abs_diff(&dec.approx, &again.approx) < EPS);
  }

  #[test]
  fn test_band_lengths() {
    assert_eq!(forward(&[0.0; 1000]).capacity(), 500);
    assert_eq!(forward(&[0.0; 1001]).capacity(), 501);
    assert_eq!(forward(&[]).capacity(), 0);
  }

  #[test]
  fn test_energy_preserved() {
    // Orthogonal transform: coefficient energy equals sample energy.
    let x = sine(4096, 997.0, 44100.0);
    let dec = forward(&x);
    let e_x: f64 = x.iter().map(|v| v * v).sum();
    let e_c: f64 = dec.approx.iter().chain(&dec.detail).map(|v| v * v).sum();
    assert!((e_x - e_c).abs() < 1e-8);
  }
}
