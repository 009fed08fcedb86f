// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Invocation of external programs.

Everything this tool asks of the host system (`lsb_release`, `pg_config`,
`dpkg-buildpackage`) goes through [ExternalTools] so callers can substitute
a fake in tests.
*/

use {
    crate::error::{PgxDebError, Result},
    duct::cmd,
    log::{debug, info},
    std::{
        io::{BufRead, BufReader},
        path::Path,
    },
};

/// Interface to programs installed on the host.
pub trait ExternalTools {
    /// Run a program and capture its standard output as text.
    ///
    /// Trailing newlines are removed. A non-zero exit is an error.
    fn capture(&self, program: &str, args: &[&str]) -> Result<String>;

    /// Run a program to completion with `dir` as its working directory.
    ///
    /// Output is forwarded to the logger as it is produced. A non-zero exit is an error.
    fn run(&self, program: &str, args: &[&str], dir: &Path) -> Result<()>;
}

/// [ExternalTools] backed by real processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTools;

impl ExternalTools for SystemTools {
    fn capture(&self, program: &str, args: &[&str]) -> Result<String> {
        debug!("capturing output of {} {:?}", program, args);

        cmd(program, args)
            .read()
            .map_err(|e| PgxDebError::ToolInvocation(program.to_string(), e))
    }

    fn run(&self, program: &str, args: &[&str], dir: &Path) -> Result<()> {
        info!("invoking {} with args: {:?}", program, args);

        let command = cmd(program, args)
            .dir(dir)
            .stderr_to_stdout()
            .unchecked()
            .reader()
            .map_err(|e| PgxDebError::ToolInvocation(program.to_string(), e))?;
        {
            let reader = BufReader::new(&command);
            for line in reader.lines() {
                let line = line.map_err(|e| PgxDebError::ToolInvocation(program.to_string(), e))?;
                info!("{}", line);
            }
        }

        let output = command
            .try_wait()
            .map_err(|e| PgxDebError::ToolInvocation(program.to_string(), e))?
            .ok_or_else(|| {
                PgxDebError::ToolInvocation(
                    program.to_string(),
                    std::io::Error::new(std::io::ErrorKind::Other, "unable to wait on command"),
                )
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PgxDebError::ToolExitStatus(
                program.to_string(),
                output.status.to_string(),
            ))
        }
    }
}
