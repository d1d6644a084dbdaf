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
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes128;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroizing;

// this crate
use crate::container::Header;
use crate::error::StegError;
use crate::keys::{EccKeypair, RsaKeypair};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

pub const SESSION_KEY_LEN: usize = 16;
pub const IV_LEN: usize = 16;

// Both envelope layers are the same construction: a fresh AES-128-CBC/PKCS7
// session key encrypts the data, and a KeyTransport decides how that session
// key travels.  The "ECC" layer ships it as bare base64 (the P-256 keypair
// is metadata only); the RSA layer wraps it with RSA-OAEP.

///
/// How a layer's session key is carried alongside its ciphertext.
///
pub trait KeyTransport {
  /// Wrap a session key for the wire; the result is base64 text.
  fn wrap(&self, session_key: &[u8]) -> Result<String, StegError>;

  /// Recover the session key from its wire form.
  fn unwrap(&self, wrapped: &str) -> Result<Zeroizing<Vec<u8>>, StegError>;
}

/// Transport that carries the session key as plain base64.
pub struct PlainTransport;

impl KeyTransport for PlainTransport {
  fn wrap(&self, session_key: &[u8]) -> Result<String, StegError> {
    Ok(BASE64.encode(session_key))
  }

  fn unwrap(&self, wrapped: &str) -> Result<Zeroizing<Vec<u8>>, StegError> {
    Ok(Zeroizing::new(BASE64.decode(wrapped)?))
  }
}

///
/// Transport that wraps the session key with RSA-OAEP (SHA-256).
///
/// Sealing only needs the public half, opening only the private half, so
/// both sides are optional and the absent one reports `MissingKeyMaterial`.
///
pub struct RsaOaepTransport<'a> {
  pub public: Option<&'a RsaPublicKey>,
  pub private: Option<&'a RsaPrivateKey>,
}

impl KeyTransport for RsaOaepTransport<'_> {
  fn wrap(&self, session_key: &[u8]) -> Result<String, StegError> {
    let public = self.public.ok_or(StegError::MissingKeyMaterial)?;
    let wrapped = public
      .encrypt(&mut OsRng, Oaep::new::<Sha256>(), session_key)
      .map_err(|_| StegError::RsaEncrypt)?;
    Ok(BASE64.encode(wrapped))
  }

  fn unwrap(&self, wrapped: &str) -> Result<Zeroizing<Vec<u8>>, StegError> {
    let private = self.private.ok_or(StegError::MissingKeyMaterial)?;
    let ciphertext = BASE64.decode(wrapped)?;
    let key = private
      .decrypt(Oaep::new::<Sha256>(), &ciphertext)
      .map_err(|_| StegError::RsaDecrypt)?;
    Ok(Zeroizing::new(key))
  }
}

///
/// One sealed layer: `data` is `base64(IV || ciphertext)`, `key` is the
/// transported session key.
///
pub struct SealedLayer {
  pub data: String,
  pub key: String,
}

///
/// Seal `plaintext` under a fresh session key and IV.
///
pub fn seal(plaintext: &[u8], transport: &dyn KeyTransport) -> Result<SealedLayer, StegError> {
  let mut session_key = Zeroizing::new([0u8; SESSION_KEY_LEN]);
  OsRng.fill_bytes(session_key.as_mut());
  let mut iv = [0u8; IV_LEN];
  OsRng.fill_bytes(&mut iv);

  let cipher = Aes128CbcEnc::new_from_slices(session_key.as_ref(), &iv).map_err(|_| StegError::AesKey)?;
  let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

  let mut combined = Vec::with_capacity(IV_LEN + ciphertext.len());
  combined.extend_from_slice(&iv);
  combined.extend_from_slice(&ciphertext);

  Ok(SealedLayer {
    data: BASE64.encode(&combined),
    key: transport.wrap(session_key.as_ref())?,
  })
}

///
/// Open one sealed layer: recover the session key via the transport, split
/// off the IV, decrypt and unpad.
///
pub fn open(
  data_b64: &str,
  wrapped_key: &str,
  transport: &dyn KeyTransport,
) -> Result<Zeroizing<Vec<u8>>, StegError> {
  let session_key = transport.unwrap(wrapped_key)?;
  let combined = BASE64.decode(data_b64)?;
  if combined.len() < IV_LEN {
    return Err(StegError::AesKey);
  }
  let (iv, ciphertext) = combined.split_at(IV_LEN);

  let cipher = Aes128CbcDec::new_from_slices(&session_key, iv).map_err(|_| StegError::AesKey)?;
  let plaintext = cipher
    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
    .map_err(|_| StegError::AesPadding)?;

  Ok(Zeroizing::new(plaintext))
}

/// The inner-layer wire object carried inside the outer ciphertext.
#[derive(Serialize, Deserialize)]
struct InnerLayer {
  ecc_data: String,
  ecc_key: String,
}

///
/// The fully sealed message: container header fields, the outer ciphertext,
/// and the key material that must reach the sidecar.
///
pub struct SealedMessage {
  pub header: Header,
  pub payload: String, // outer-layer base64(IV || ciphertext)
  pub ecc: EccKeypair,
  pub rsa: RsaKeypair,
}

///
/// Run the full two-layer encryption of a cleartext message.
///
/// Inner layer seals the message itself with a plainly transported session
/// key; the outer layer seals the inner layer's JSON and wraps its session
/// key with RSA-OAEP under a freshly generated RSA-2048 key.
///
pub fn seal_message(message: &str) -> Result<SealedMessage, StegError> {
  let ecc = EccKeypair::generate()?;
  let inner = seal(message.as_bytes(), &PlainTransport)?;

  let combined = serde_json::to_string(&InnerLayer {
    ecc_data: inner.data,
    ecc_key: inner.key,
  })
  .map_err(|_| StegError::PayloadParse)?;

  let rsa = RsaKeypair::generate()?;
  let transport = RsaOaepTransport {
    public: Some(rsa.public()),
    private: None,
  };
  let outer = seal(combined.as_bytes(), &transport)?;

  let header = Header {
    ecc_public_key: ecc.public_pem.clone(),
    rsa_public_key: rsa.public_pem.clone(),
    message_length: message.chars().count(),
    rsa_key: outer.key,
  };

  Ok(SealedMessage {
    header,
    payload: outer.data,
    ecc,
    rsa,
  })
}

///
/// Reverse of `seal_message`: unwrap the outer layer with the RSA private
/// key, parse the inner layer out of it, then open the inner layer.
///
pub fn open_message(
  header: &Header,
  payload_b64: &str,
  rsa_private: &RsaPrivateKey,
) -> Result<String, StegError> {
  let transport = RsaOaepTransport {
    public: None,
    private: Some(rsa_private),
  };
  let combined = open(payload_b64, &header.rsa_key, &transport)?;
  let combined_text = String::from_utf8(combined.to_vec())?;

  let inner: InnerLayer =
    serde_json::from_str(&combined_text).map_err(|_| StegError::PayloadParse)?;

  let cleartext = open(&inner.ecc_data, &inner.ecc_key, &PlainTransport)?;
  Ok(String::from_utf8(cleartext.to_vec())?)
}

#[cfg(test)]
mod tests {
  use base64::engine::general_purpose::STANDARD as BASE64;
  use base64::Engine as _;

  use crate::envelope::{open, open_message, seal, seal_message, PlainTransport, RsaOaepTransport};
  use crate::error::StegError;
  use crate::keys::RsaKeypair;

  #[test]
  fn test_plain_layer_round_trip() {
    let sealed = seal(b"detail coefficients carry this", &PlainTransport).unwrap();
    let opened = open(&sealed.data, &sealed.key, &PlainTransport).unwrap();
    assert_eq!(opened.as_slice(), b"detail coefficients carry this");
  }

  #[test]
  fn test_rsa_layer_round_trip() {
    let keypair = RsaKeypair::generate().unwrap();
    let sealing = RsaOaepTransport {
      public: Some(keypair.public()),
      private: None,
    };
    let opening = RsaOaepTransport {
      public: None,
      private: Some(keypair.private()),
    };
    let sealed = seal(b"outer layer", &sealing).unwrap();
    let opened = open(&sealed.data, &sealed.key, &opening).unwrap();
    assert_eq!(opened.as_slice(), b"outer layer");
  }

  #[test]
  fn test_wrong_rsa_key_fails() {
    let keypair = RsaKeypair::generate().unwrap();
    let other = RsaKeypair::generate().unwrap();
    let sealing = RsaOaepTransport {
      public: Some(keypair.public()),
      private: None,
    };
    let sealed = seal(b"secret", &sealing).unwrap();
    let opening = RsaOaepTransport {
      public: None,
      private: Some(other.private()),
    };
    assert!(matches!(
      open(&sealed.data, &sealed.key, &opening),
      Err(StegError::RsaDecrypt)
    ));
  }

  #[test]
  fn test_missing_private_key() {
    let sealed = seal(b"secret", &PlainTransport).unwrap();
    let opening = RsaOaepTransport {
      public: None,
      private: None,
    };
    assert!(matches!(
      open(&sealed.data, &sealed.key, &opening),
      Err(StegError::MissingKeyMaterial)
    ));
  }

  #[test]
  fn test_bad_base64_detected() {
    let sealed = seal(b"secret", &PlainTransport).unwrap();
    assert!(matches!(
      open("!!!not base64!!!", &sealed.key, &PlainTransport),
      Err(StegError::Base64Decode)
    ));
  }

  #[test]
  fn test_truncated_ciphertext_fails_unpadding() {
    let sealed = seal(b"some longer plaintext for two blocks", &PlainTransport).unwrap();
    let mut combined = BASE64.decode(&sealed.data).unwrap();
    combined.truncate(combined.len() - 1); // no longer a block multiple
    let truncated = BASE64.encode(&combined);
    assert!(matches!(
      open(&truncated, &sealed.key, &PlainTransport),
      Err(StegError::AesPadding)
    ));
  }

  #[test]
  fn test_full_message_round_trip() {
    let sealed = seal_message("HALO DUNIA").unwrap();
    assert_eq!(sealed.header.message_length, 10);
    assert!(sealed.header.ecc_public_key.contains("BEGIN PUBLIC KEY"));
    assert!(sealed.header.rsa_public_key.contains("BEGIN PUBLIC KEY"));

    let recovered = open_message(&sealed.header, &sealed.payload, sealed.rsa.private()).unwrap();
    assert_eq!(recovered, "HALO DUNIA");
  }

  #[test]
  fn test_full_message_wrong_key() {
    let sealed = seal_message("rahasia").unwrap();
    let other = RsaKeypair::generate().unwrap();
    assert!(matches!(
      open_message(&sealed.header, &sealed.payload, other.private()),
      Err(StegError::RsaDecrypt)
    ));
  }
}
