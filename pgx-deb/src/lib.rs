// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Build Debian binary packages for pgx PostgreSQL extensions.

Extensions built with [pgx](https://github.com/tcdi/pgx) are staged into a
directory tree by `cargo pgx package`. This crate turns such a tree into a
`.deb` by writing a minimal `debian/` directory and delegating the actual
package assembly to `dpkg-buildpackage` and debhelper.

[config::PackageConfig] holds package metadata resolved from environment
variables. [debian_dir] renders `debian/control`, `debian/changelog` and
`debian/install` from it, using the control file primitives in [control]
and the changelog primitives in [changelog]. [builder::PackageBuilder]
drives the whole process. External programs are reached through the
[tools::ExternalTools] trait.
*/

pub mod builder;
pub mod changelog;
pub mod cli;
pub mod config;
pub mod control;
pub mod debian_dir;
pub mod error;
pub mod pg_version;
pub mod tools;

#[cfg(test)]
mod testutil;
