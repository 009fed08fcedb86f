// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use pgx_deb::{cli, error::PgxDebError};

/// Exit code when required environment variables are missing.
const EXIT_MISSING_ENVIRONMENT: i32 = 2;

fn main() {
    let exit_code = match cli::run_cli() {
        Ok(()) => 0,
        Err(PgxDebError::MissingEnvironment(names)) => {
            for name in names {
                println!("{} not set", name);
            }
            EXIT_MISSING_ENVIRONMENT
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            1
        }
    };

    std::process::exit(exit_code)
}
