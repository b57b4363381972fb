use std::{fmt::Write, path::PathBuf};

use clap::Args;
use miette::{IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream::Stdout};
use unity_typetree::TypeTree;

use super::LayoutArgs;

#[derive(Args)]
pub struct DumpArgs {
    /// A file containing a type tree
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Print the type tree as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Human readable listing of a type tree, styled only when stdout takes colors
pub fn render(tree: &TypeTree) -> Result<String> {
    let mut out = String::new();

    writeln!(
        out,
        "version {} revision {} attributes {:#x}{}",
        tree.asset_version(),
        tree.revision().map(|r| r.as_str()).unwrap_or("-"),
        tree.attributes(),
        if tree.is_embedded() { "" } else { " (not embedded)" }
    )
    .into_diagnostic()?;

    for class in tree.classes() {
        writeln!(
            out,
            "{} {}",
            "class".if_supports_color(Stdout, |t| t.bold()),
            class.class_id().if_supports_color(Stdout, |t| t.bold())
        )
        .into_diagnostic()?;
        if let Some(guid) = class.script_guid() {
            writeln!(out, "  script {}", guid.if_supports_color(Stdout, |t| t.dimmed()))
                .into_diagnostic()?;
        }
        if let Some(guid) = class.class_guid() {
            writeln!(out, "  guid {}", guid.if_supports_color(Stdout, |t| t.dimmed()))
                .into_diagnostic()?;
        }
        if let Some(fields) = class.type_tree() {
            for line in fields.to_string().lines() {
                writeln!(out, "  {}", line).into_diagnostic()?;
            }
        }
    }

    Ok(out)
}

impl DumpArgs {
    pub fn handle(&self) -> Result<()> {
        let tree = self.layout.read(&self.file)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&tree).into_diagnostic()?);
        } else {
            print!("{}", render(&tree)?);
        }

        Ok(())
    }
}
