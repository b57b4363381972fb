use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::info;

use super::LayoutArgs;

#[derive(Args)]
pub struct RewriteArgs {
    /// A file containing a legacy type tree
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,

    /// The file to write the encoded type tree to
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl RewriteArgs {
    pub fn handle(&self) -> Result<()> {
        let tree = self.layout.read(&self.file)?;

        // encode into memory first, unsupported trees must not leave a file behind
        let mut buffer = std::io::Cursor::new(Vec::new());
        tree.write(&mut buffer)?;

        info!(
            "writing {} classes to {}",
            tree.len(),
            self.output.display()
        );
        let out = if !self.overwrite {
            File::create_new(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        } else {
            File::create(&self.output)
                .into_diagnostic()
                .context(format!("creating {}", &self.output.display()))?
        };

        let mut out = BufWriter::new(out);
        out.write_all(buffer.get_ref()).into_diagnostic()?;
        out.flush().into_diagnostic()?;

        Ok(())
    }
}
