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

extern crate clap;
extern crate stegowav;

use clap::{App, Arg, ArgMatches, SubCommand};

use stegowav::embedfile::embed_file;
use stegowav::error::StegError;
use stegowav::extractfile::{extract_file, inspect_file};
use stegowav::steg::{ExtractOptions, Parameters};

fn main() {
  env_logger::init();

  let matches = App::new("stegowav")
    .version("0.1.0")
    .about("stegowav - hide encrypted text messages inside wav audio files.")
    .subcommand(
      SubCommand::with_name("embed")
        .about("Encrypt a message and hide it in a wav carrier")
        .arg(
          Arg::with_name("input")
            .short("i")
            .long("input")
            .value_name("FILE")
            .help("The carrier wav file; a sine carrier is synthesized if it does not exist")
            .required(true)
            .takes_value(true),
        )
        .arg(
          Arg::with_name("output")
            .short("o")
            .long("output")
            .value_name("FILE")
            .help("The stego wav file to write")
            .required(true)
            .takes_value(true),
        )
        .arg(
          Arg::with_name("message")
            .short("m")
            .long("message")
            .value_name("TEXT")
            .help("The cleartext message to hide")
            .required(true)
            .takes_value(true),
        )
        .arg(
          Arg::with_name("alpha")
            .short("a")
            .long("alpha")
            .value_name("FLOAT")
            .help("Embedding strength (default 0.1)")
            .takes_value(true),
        ),
    )
    .subcommand(
      SubCommand::with_name("extract")
        .about("Recover the hidden message from a stego wav")
        .arg(
          Arg::with_name("input")
            .short("i")
            .long("input")
            .value_name("FILE")
            .help("The stego wav file to read")
            .required(true)
            .takes_value(true),
        )
        .arg(
          Arg::with_name("bits")
            .short("b")
            .long("bits")
            .value_name("COUNT")
            .help("Container bit count, required when no .info sidecar exists")
            .takes_value(true),
        )
        .arg(
          Arg::with_name("alpha")
            .short("a")
            .long("alpha")
            .value_name("FLOAT")
            .help("Embedding strength used at embed time (default 0.1)")
            .takes_value(true),
        )
        .arg(
          Arg::with_name("rsa-key")
            .long("rsa-key")
            .value_name("FILE")
            .help("PEM file with the RSA private key, required when no sidecar exists")
            .takes_value(true),
        ),
    )
    .subcommand(
      SubCommand::with_name("inspect")
        .about("Show the raw container framing without decrypting anything")
        .arg(
          Arg::with_name("input")
            .short("i")
            .long("input")
            .value_name("FILE")
            .help("The stego wav file to read")
            .required(true)
            .takes_value(true),
        )
        .arg(
          Arg::with_name("bits")
            .short("b")
            .long("bits")
            .value_name("COUNT")
            .help("Container bit count, required when no .info sidecar exists")
            .takes_value(true),
        )
        .arg(
          Arg::with_name("alpha")
            .short("a")
            .long("alpha")
            .value_name("FLOAT")
            .help("Embedding strength used at embed time (default 0.1)")
            .takes_value(true),
        ),
    )
    .get_matches();

  let result = match matches.subcommand() {
    ("embed", Some(sub)) => run_embed(sub),
    ("extract", Some(sub)) => run_extract(sub),
    ("inspect", Some(sub)) => run_inspect(sub),
    _ => {
      eprintln!("No subcommand given, try `stegowav --help`.");
      std::process::exit(2);
    }
  };

  if let Err(err) = result {
    eprintln!("Error: {}", err);
    std::process::exit(1);
  }
}

fn parse_alpha(matches: &ArgMatches) -> Result<Option<f64>, StegError> {
  match matches.value_of("alpha") {
    Some(text) => text.parse().map(Some).map_err(|_| StegError::InvalidAlpha),
    None => Ok(None),
  }
}

fn run_embed(matches: &ArgMatches) -> Result<(), StegError> {
  let params = match parse_alpha(matches)? {
    Some(alpha) => Parameters::new(alpha)?,
    None => Parameters::default(),
  };

  let output = embed_file(
    matches.value_of("input").unwrap(),
    matches.value_of("output").unwrap(),
    matches.value_of("message").unwrap(),
    &params,
  )?;
  println!("Stego wav written to {}", output.display());
  println!("Keep the .info sidecar: it holds the keys needed for extraction.");
  Ok(())
}

fn build_options(matches: &ArgMatches) -> Result<ExtractOptions, StegError> {
  let bits_length = match matches.value_of("bits") {
    Some(text) => Some(text.parse().map_err(|_| StegError::MissingBitsLength)?),
    None => None,
  };

  let rsa_private_pem = match matches.value_of("rsa-key") {
    Some(path) => Some(std::fs::read_to_string(path).map_err(StegError::IoRead)?),
    None => None,
  };

  Ok(ExtractOptions {
    bits_length,
    alpha: parse_alpha(matches)?,
    rsa_private_pem,
    ecc_private_pem: None,
  })
}

fn run_extract(matches: &ArgMatches) -> Result<(), StegError> {
  let options = build_options(matches)?;
  let message = extract_file(matches.value_of("input").unwrap(), &options)?;
  println!("{}", message);
  Ok(())
}

fn run_inspect(matches: &ArgMatches) -> Result<(), StegError> {
  let options = build_options(matches)?;
  let report = inspect_file(matches.value_of("input").unwrap(), &options)?;
  match serde_json::to_string_pretty(&report) {
    Ok(json) => println!("{}", json),
    Err(_) => println!("{:#?}", report),
  }
  Ok(())
}
