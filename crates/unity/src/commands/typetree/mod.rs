use std::{
    fs::File,
    io::{BufReader, Seek, SeekFrom},
    path::Path,
};

use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;
use unity_typetree::{Endian, TypeTree, VersionInfo};

pub mod diff;
pub mod dump;
pub mod rewrite;

#[derive(clap::Subcommand)]
pub enum TypetreeCommands {
    /// Print the classes and field trees of a type tree
    Dump(dump::DumpArgs),
    /// Compare two type trees
    Diff(diff::DiffArgs),
    /// Decode a legacy type tree and encode it again
    Rewrite(rewrite::RewriteArgs),
}

impl TypetreeCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            TypetreeCommands::Dump(dump) => dump.handle(),
            TypetreeCommands::Diff(diff) => diff.handle(),
            TypetreeCommands::Rewrite(rewrite) => rewrite.handle(),
        }
    }
}

/// Layout of the asset a type tree is read from
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Asset format version from the asset header
    #[arg(short, long, value_name = "VERSION")]
    asset_version: i32,

    /// The asset metadata is big endian
    #[arg(long, default_value_t = false)]
    big_endian: bool,

    /// Byte offset of the type tree inside the file
    #[arg(long, value_name = "BYTES", default_value_t = 0)]
    offset: u64,
}

impl LayoutArgs {
    pub fn version_info(&self) -> VersionInfo {
        let endian = if self.big_endian {
            Endian::Big
        } else {
            Endian::Little
        };
        VersionInfo::new(self.asset_version).with_endian(endian)
    }

    /// Decode the type tree stored in `path`
    pub fn read(&self, path: &Path) -> Result<TypeTree> {
        let mut f = File::open(path)
            .into_diagnostic()
            .context(format!("path: {}", path.display()))?;
        f.seek(SeekFrom::Start(self.offset)).into_diagnostic()?;

        info!("reading {} at offset {}", path.display(), self.offset);
        let tree = TypeTree::read(&mut BufReader::new(f), &self.version_info())
            .context(format!("path: {}", path.display()))?;
        Ok(tree)
    }
}
