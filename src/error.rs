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

use std::fmt;

// Every failure is fatal to the current embed/extract call.  There is no
// retry machinery; callers get the variant and render it.
#[derive(Debug)]
pub enum StegError {
  IoRead(std::io::Error),  // Carrier or sidecar could not be read
  IoWrite(std::io::Error), // Stego wav or sidecar could not be written
  Wav(hound::Error),       // The wav container itself is malformed

  // Parameter errors
  InvalidAlpha, // Embedding strength must be > 0

  // Container errors
  CapacityExceeded { needed: usize, available: usize }, // More bits than detail coefficients
  LengthUnderflow { needed: usize, available: usize },  // Bit stream shorter than the framing requires
  HeaderParse,  // Header JSON invalid or a required field is missing
  PayloadParse, // Payload JSON invalid
  Base64Decode, // A base64 segment is ill-formed
  SidecarParse, // Sidecar .info JSON invalid

  // Key material errors
  KeyGen,             // RSA or EC keypair generation failed
  KeyParse,           // PEM key material could not be parsed
  MissingKeyMaterial, // No sidecar and no caller-supplied private key
  MissingBitsLength,  // No sidecar and no caller-supplied bit count

  // Cipher errors
  RsaEncrypt, // RSA-OAEP wrap of the session key failed
  RsaDecrypt, // RSA-OAEP unwrap failed, wrong key or corrupted data
  AesKey,     // Session key or IV has the wrong length
  AesPadding, // PKCS7 unpadding failed, wrong key or corrupted ciphertext
  Utf8Decode, // Recovered cleartext bytes are not valid UTF-8
}

impl fmt::Display for StegError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StegError::IoRead(e) => write!(f, "read failed: {}", e),
      StegError::IoWrite(e) => write!(f, "write failed: {}", e),
      StegError::Wav(e) => write!(f, "wav error: {}", e),
      StegError::InvalidAlpha => write!(f, "embedding strength alpha must be greater than zero"),
      StegError::CapacityExceeded { needed, available } => write!(
        f,
        "insufficient capacity: message needs {} bits, carrier holds {}",
        needed, available
      ),
      StegError::LengthUnderflow { needed, available } => write!(
        f,
        "bit stream too short: need {} bits, have {}",
        needed, available
      ),
      StegError::HeaderParse => write!(f, "container header is not valid JSON or misses a field"),
      StegError::PayloadParse => write!(f, "container payload is not valid JSON"),
      StegError::Base64Decode => write!(f, "base64 segment is ill-formed"),
      StegError::SidecarParse => write!(f, "sidecar .info file is not valid JSON"),
      StegError::KeyGen => write!(f, "keypair generation failed"),
      StegError::KeyParse => write!(f, "PEM key material could not be parsed"),
      StegError::MissingKeyMaterial => write!(f, "no private key available for decryption"),
      StegError::MissingBitsLength => write!(f, "no sidecar found and no bit count supplied"),
      StegError::RsaEncrypt => write!(f, "RSA-OAEP encryption of the session key failed"),
      StegError::RsaDecrypt => write!(f, "RSA-OAEP decryption failed, wrong key or corrupted data"),
      StegError::AesKey => write!(f, "AES key or IV has the wrong length"),
      StegError::AesPadding => write!(f, "PKCS7 unpadding failed, wrong key or corrupted ciphertext"),
      StegError::Utf8Decode => write!(f, "decrypted bytes are not valid UTF-8"),
    }
  }
}

impl std::error::Error for StegError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      StegError::IoRead(e) | StegError::IoWrite(e) => Some(e),
      StegError::Wav(e) => Some(e),
      _ => None,
    }
  }
}

impl From<base64::DecodeError> for StegError {
  fn from(_: base64::DecodeError) -> StegError {
    StegError::Base64Decode
  }
}

impl From<std::string::FromUtf8Error> for StegError {
  fn from(_: std::string::FromUtf8Error) -> StegError {
    StegError::Utf8Decode
  }
}
