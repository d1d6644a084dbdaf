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
use serde::{Deserialize, Serialize};

// this crate
use crate::bits;
use crate::error::StegError;
use crate::steg::Container;

// Container wire format inside the bit stream:
//
//   offset (bits)   field        contents
//   0 .. 32         len_header   unsigned 32-bit big-endian, |header| in bits
//   32 .. 32+H      header       header JSON, 8 bits per byte
//   32+H .. L       payload      payload JSON ("<base64>"), 8 bits per byte
//
// All JSON content is ASCII by construction (base64, PEM, integers), which
// keeps the 8-bits-per-codepoint text codec lossless.

///
/// The self-describing container header.
///
/// Unknown fields in a decoded header are ignored; all four listed fields
/// are required.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
  pub ecc_public_key: String,
  pub rsa_public_key: String,
  pub message_length: usize,
  pub rsa_key: String,
}

/// A container parsed back out of a bit stream.
pub struct Parsed {
  pub header: Header,
  pub payload: String, // outer-envelope base64, already JSON-decoded
}

///
/// Serialise header and payload into the framed bit stream.
///
pub fn assemble(header: &Header, payload_b64: &str) -> Result<Vec<u8>, StegError> {
  let header_json = serde_json::to_string(header).map_err(|_| StegError::HeaderParse)?;
  let payload_json = serde_json::to_string(payload_b64).map_err(|_| StegError::PayloadParse)?;

  let header_bits = bits::text_to_bits(&header_json);
  let payload_bits = bits::text_to_bits(&payload_json);

  let mut stream = bits::u32_to_bits(header_bits.len() as u32);
  stream.reserve(header_bits.len() + payload_bits.len());
  stream.extend_from_slice(&header_bits);
  stream.extend_from_slice(&payload_bits);
  Ok(stream)
}

///
/// Parse a framed bit stream back into header and payload.
///
/// The length prefix is authoritative: there is no terminator sentinel, so
/// the caller must pass exactly the `bits_length` bits that were embedded.
///
pub fn parse(stream: &[u8]) -> Result<Parsed, StegError> {
  if stream.len() < Container::LEN_FIELD_BITS {
    return Err(StegError::LengthUnderflow {
      needed: Container::LEN_FIELD_BITS,
      available: stream.len(),
    });
  }

  let header_len = bits::bits_to_u32(stream) as usize;
  let needed = Container::LEN_FIELD_BITS.saturating_add(header_len);
  if stream.len() < needed {
    return Err(StegError::LengthUnderflow {
      needed,
      available: stream.len(),
    });
  }

  let header_json = bits::bits_to_text(&stream[Container::LEN_FIELD_BITS..needed]);
  let header: Header = serde_json::from_str(&header_json).map_err(|_| StegError::HeaderParse)?;

  let payload_json = bits::bits_to_text(&stream[needed..]);
  let payload: String = serde_json::from_str(&payload_json).map_err(|_| StegError::PayloadParse)?;

  Ok(Parsed { header, payload })
}

///
/// What a raw container looks like before any decryption is attempted.
///
#[derive(Debug, Serialize)]
pub struct ContainerReport {
  pub bits_length: usize,
  pub header_bits: usize,
  pub header_valid: bool,
  pub has_ecc_public_key: bool,
  pub has_rsa_public_key: bool,
  pub has_rsa_key: bool,
  pub message_length: Option<u64>,
  pub payload_valid: bool,
}

///
/// Non-destructive look at a bit stream: frame lengths, which header fields
/// are present, and whether the payload parses.  Key material is not
/// touched.
///
pub fn inspect(stream: &[u8]) -> Result<ContainerReport, StegError> {
  if stream.len() < Container::LEN_FIELD_BITS {
    return Err(StegError::LengthUnderflow {
      needed: Container::LEN_FIELD_BITS,
      available: stream.len(),
    });
  }

  let header_len = bits::bits_to_u32(stream) as usize;
  let needed = Container::LEN_FIELD_BITS.saturating_add(header_len);
  if stream.len() < needed {
    return Err(StegError::LengthUnderflow {
      needed,
      available: stream.len(),
    });
  }

  let header_json = bits::bits_to_text(&stream[Container::LEN_FIELD_BITS..needed]);
  let header_value: Option<serde_json::Value> = serde_json::from_str(&header_json).ok();
  let header_object = header_value.as_ref().and_then(|v| v.as_object());

  let payload_json = bits::bits_to_text(&stream[needed..]);
  let payload_valid = serde_json::from_str::<String>(&payload_json).is_ok();

  Ok(ContainerReport {
    bits_length: stream.len(),
    header_bits: header_len,
    header_valid: header_object.is_some(),
    has_ecc_public_key: header_object.is_some_and(|o| o.contains_key("ecc_public_key")),
    has_rsa_public_key: header_object.is_some_and(|o| o.contains_key("rsa_public_key")),
    has_rsa_key: header_object.is_some_and(|o| o.contains_key("rsa_key")),
    message_length: header_object
      .and_then(|o| o.get("message_length"))
      .and_then(|v| v.as_u64()),
    payload_valid,
  })
}

#[cfg(test)]
mod tests {
  use crate::bits;
  use crate::container::{assemble, inspect, parse, Header};
  use crate::error::StegError;

  fn sample_header() -> Header {
    Header {
      ecc_public_key: "-----BEGIN PUBLIC KEY-----\nMFkw\n-----END PUBLIC KEY-----\n".to_string(),
      rsa_public_key: "-----BEGIN PUBLIC KEY-----\nMIIB\n-----END PUBLIC KEY-----\n".to_string(),
      message_length: 10,
      rsa_key: "c2Vzc2lvbi1rZXk=".to_string(),
    }
  }

  #[test]
  fn test_assemble_parse_round_trip() {
    let header = sample_header();
    let stream = assemble(&header, "aXYtYW5kLWNpcGhlcnRleHQ=").unwrap();

    let parsed = parse(&stream).unwrap();
    assert_eq!(parsed.header.ecc_public_key, header.ecc_public_key);
    assert_eq!(parsed.header.rsa_public_key, header.rsa_public_key);
    assert_eq!(parsed.header.message_length, 10);
    assert_eq!(parsed.header.rsa_key, header.rsa_key);
    assert_eq!(parsed.payload, "aXYtYW5kLWNpcGhlcnRleHQ=");
  }

  #[test]
  fn test_length_prefix_matches_header() {
    let stream = assemble(&sample_header(), "cGF5bG9hZA==").unwrap();
    let header_len = bits::bits_to_u32(&stream) as usize;
    assert_eq!(header_len % 8, 0);
    assert!(32 + header_len <= stream.len());
  }

  #[test]
  fn test_stream_too_short_for_prefix() {
    assert!(matches!(
      parse(&[0, 1, 0, 1]),
      Err(StegError::LengthUnderflow { needed: 32, .. })
    ));
  }

  #[test]
  fn test_stream_too_short_for_header() {
    let mut stream = bits::u32_to_bits(8000);
    stream.extend_from_slice(&[0; 100]);
    assert!(matches!(
      parse(&stream),
      Err(StegError::LengthUnderflow { needed: 8032, .. })
    ));
  }

  #[test]
  fn test_garbled_header_is_parse_error() {
    // A header region full of zero bytes is not JSON
    let mut stream = bits::u32_to_bits(64);
    stream.extend_from_slice(&[0; 64]);
    assert!(matches!(parse(&stream), Err(StegError::HeaderParse)));
  }

  #[test]
  fn test_garbled_payload_is_parse_error() {
    let header_json = "{\"ecc_public_key\":\"a\",\"rsa_public_key\":\"b\",\"message_length\":1,\"rsa_key\":\"c\"}";
    let header_bits = bits::text_to_bits(header_json);
    let mut stream = bits::u32_to_bits(header_bits.len() as u32);
    stream.extend_from_slice(&header_bits);
    stream.extend_from_slice(&bits::text_to_bits("no quotes here"));
    assert!(matches!(parse(&stream), Err(StegError::PayloadParse)));
  }

  #[test]
  fn test_inspect_reports_fields() {
    let stream = assemble(&sample_header(), "cGF5bG9hZA==").unwrap();
    let report = inspect(&stream).unwrap();
    assert_eq!(report.bits_length, stream.len());
    assert!(report.header_valid);
    assert!(report.has_ecc_public_key);
    assert!(report.has_rsa_public_key);
    assert!(report.has_rsa_key);
    assert_eq!(report.message_length, Some(10));
    assert!(report.payload_valid);
  }

  #[test]
  fn test_inspect_garbled_header() {
    let mut stream = bits::u32_to_bits(64);
    stream.extend_from_slice(&[1; 64]);
    let report = inspect(&stream).unwrap();
    assert!(!report.header_valid);
    assert!(!report.has_rsa_key);
    assert_eq!(report.message_length, None);
    assert!(!report.payload_valid);
  }
}
