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

// externs
use crate::byteorder::{BigEndian, ByteOrder};

// A bit stream is a `Vec<u8>` / `&[u8]` whose elements are 0 or 1, big-endian
// within each byte.  This keeps the embed/extract plumbing trivially
// sliceable at arbitrary bit offsets.

pub const BITS_PER_BYTE: usize = 8;

///
/// Convert text to a bit stream, eight bits per codepoint.
///
/// Each `char` contributes the big-endian bits of its *low-order byte*.
/// Codepoints >= 256 lose their high bits silently; container content is
/// ASCII by construction, so the mapping is lossless there.
///
pub fn text_to_bits(text: &str) -> Vec<u8> {
  let mut bits = Vec::with_capacity(text.chars().count() * BITS_PER_BYTE);
  for ch in text.chars() {
    push_byte(&mut bits, (ch as u32 & 0xff) as u8);
  }
  bits
}

///
/// Convert a bit stream back to text, one codepoint per eight bits.
///
/// The inverse of `text_to_bits` on byte-range text.  A trailing group of
/// fewer than eight bits is discarded.
///
pub fn bits_to_text(bits: &[u8]) -> String {
  let mut text = String::with_capacity(bits.len() / BITS_PER_BYTE);
  for chunk in bits.chunks_exact(BITS_PER_BYTE) {
    text.push(char::from(fold_byte(chunk)));
  }
  text
}

/// Unpack bytes into a bit stream, big-endian within each byte.
pub fn bytes_to_bits(data: &[u8]) -> Vec<u8> {
  let mut bits = Vec::with_capacity(data.len() * BITS_PER_BYTE);
  for &byte in data {
    push_byte(&mut bits, byte);
  }
  bits
}

/// Pack a bit stream into bytes.  A trailing partial byte is discarded.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
  bits.chunks_exact(BITS_PER_BYTE).map(fold_byte).collect()
}

///
/// The 32-bit big-endian length field that prefixes the container.
///
pub fn u32_to_bits(value: u32) -> Vec<u8> {
  let mut buf = [0u8; 4];
  BigEndian::write_u32(&mut buf, value);
  bytes_to_bits(&buf)
}

///
/// Read back a 32-bit big-endian length field.  Exactly the first 32 bits
/// of `bits` are consumed; the caller has already checked there are enough.
///
pub fn bits_to_u32(bits: &[u8]) -> u32 {
  let bytes = bits_to_bytes(&bits[..4 * BITS_PER_BYTE]);
  BigEndian::read_u32(&bytes)
}

fn push_byte(bits: &mut Vec<u8>, byte: u8) {
  for shift in (0..BITS_PER_BYTE).rev() {
    bits.push((byte >> shift) & 1);
  }
}

fn fold_byte(chunk: &[u8]) -> u8 {
  chunk.iter().fold(0u8, |acc, &b| (acc << 1) | (b & 1))
}

#[cfg(test)]
mod tests {
  use crate::bits::{bits_to_bytes, bits_to_text, bits_to_u32, bytes_to_bits, text_to_bits, u32_to_bits};

  #[test]
  fn test_text_round_trip() {
    let text = "{\"rsa_key\": \"QUJDRA==\"}";
    let bits = text_to_bits(text);
    assert_eq!(bits.len(), text.len() * 8);
    assert_eq!(bits_to_text(&bits), text);
  }

  #[test]
  fn test_text_round_trip_latin1() {
    // Every codepoint below 256 survives, not just ASCII
    let text: String = (1u8..=255).map(char::from).collect();
    assert_eq!(bits_to_text(&text_to_bits(&text)), text);
  }

  #[test]
  fn test_high_codepoints_keep_low_byte() {
    // U+0141 (Ł) has low byte 0x41 = 'A'
    assert_eq!(text_to_bits("\u{141}"), text_to_bits("A"));
  }

  #[test]
  fn test_trailing_bits_discarded() {
    let mut bits = text_to_bits("ok");
    bits.extend_from_slice(&[1, 0, 1]);
    assert_eq!(bits_to_text(&bits), "ok");
  }

  #[test]
  fn test_byte_round_trip() {
    let data = [0x00u8, 0x01, 0x7f, 0x80, 0xff, 0x55, 0xaa];
    let bits = bytes_to_bits(&data);
    assert_eq!(bits[..8], [0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(bits[8..16], [0, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(bits_to_bytes(&bits), data);
  }

  #[test]
  fn test_length_field() {
    for value in [0u32, 1, 8, 1000, 0xdead_beef, u32::MAX] {
      let bits = u32_to_bits(value);
      assert_eq!(bits.len(), 32);
      assert_eq!(bits_to_u32(&bits), value);
    }
  }
}
