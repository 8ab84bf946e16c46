use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Cli;

use super::prepare;

pub fn cmd_build(cli: &Cli, out_dirs: &[PathBuf], rollup: bool) -> Result<()> {
    let mut prepared = prepare(cli, out_dirs, rollup)?;
    let result = prepared
        .session
        .start()
        .and_then(|_| prepared.session.transform_sources())
        .and_then(|_| prepared.session.write_bundle());

    match result {
        Ok(_) => Ok(()),
        Err(e) => {
            prepared.reporter.error(&e.to_string());
            Err(e.into())
        }
    }
}
