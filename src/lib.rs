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

extern crate byteorder;
extern crate hound;

pub mod bits;
pub mod container;
pub mod embedfile;
pub mod envelope;
pub mod error;
pub mod extractfile;
pub mod keys;
pub mod qim;
pub mod sidecar;
pub mod steg;
pub mod wavelet;
pub mod wavio;
