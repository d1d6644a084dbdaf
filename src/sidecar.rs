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
use std::fs;
use std::path::{Path, PathBuf};

// externs
use serde::{Deserialize, Serialize};

// this crate
use crate::error::StegError;
use crate::steg::Parameters;

// The sidecar records everything extraction needs: the container bit count,
// both keypairs and the embedding strength.  It sits next to the stego wav
// as `<name>.wav.info`; a human-readable `<name>.wav.key` rides along.
// Without the sidecar, extraction needs the bit count and alpha out of band
// and cannot decrypt at all without the RSA private key.

///
/// The `.info` sidecar document.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sidecar {
  pub bits_length: usize,
  pub ecc_public_key: String,
  pub ecc_private_key: String,
  pub rsa_public_key: String,
  pub rsa_private_key: String,
  pub message_length: usize,
  #[serde(default = "default_alpha")]
  pub alpha: f64,
}

fn default_alpha() -> f64 {
  Parameters::DEFAULT_ALPHA
}

/// Path of the `.info` sidecar for a stego file.
pub fn info_path<P: AsRef<Path>>(stego: P) -> PathBuf {
  let mut name = stego.as_ref().as_os_str().to_owned();
  name.push(".info");
  PathBuf::from(name)
}

/// Path of the `.key` companion for a stego file.
pub fn key_path<P: AsRef<Path>>(stego: P) -> PathBuf {
  let mut name = stego.as_ref().as_os_str().to_owned();
  name.push(".key");
  PathBuf::from(name)
}

///
/// Write the `.info` sidecar next to `stego`.
///
pub fn write<P: AsRef<Path>>(stego: P, sidecar: &Sidecar) -> Result<(), StegError> {
  let json = serde_json::to_string(sidecar).map_err(|_| StegError::SidecarParse)?;
  fs::write(info_path(stego), json).map_err(StegError::IoWrite)
}

///
/// Load the `.info` sidecar for `stego` if one exists.
///
/// A missing file is `Ok(None)`; an unreadable or unparsable file is an
/// error so a damaged sidecar is never silently ignored.
///
pub fn load<P: AsRef<Path>>(stego: P) -> Result<Option<Sidecar>, StegError> {
  let path = info_path(stego);
  if !path.exists() {
    return Ok(None);
  }
  let text = fs::read_to_string(&path).map_err(StegError::IoRead)?;
  let sidecar = serde_json::from_str(&text).map_err(|_| StegError::SidecarParse)?;
  Ok(Some(sidecar))
}

///
/// Write the human-readable `.key` companion file.
///
pub fn write_key_file<P: AsRef<Path>>(
  stego: P,
  ecc_public: &str,
  ecc_private: &str,
  rsa_public: &str,
  rsa_private: &str,
) -> Result<(), StegError> {
  let text = format!(
    "===== KUNCI ECC =====\n\n\
     PUBLIC KEY ECC:\n{}\n\n\
     PRIVATE KEY ECC:\n{}\n\n\
     ===== KUNCI RSA =====\n\n\
     PUBLIC KEY RSA:\n{}\n\n\
     PRIVATE KEY RSA:\n{}\n",
    ecc_public, ecc_private, rsa_public, rsa_private
  );
  fs::write(key_path(stego), text).map_err(StegError::IoWrite)
}
