use clap::{Args, ValueEnum};
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};
use std::{fmt::Display, path::PathBuf};
use unity_typetree::{TypeClass, TypeTree};

use super::LayoutArgs;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum Mode {
    /// Classes and the fields that differ
    #[default]
    Semantic,
    /// Header values, GUIDs and full field trees with inline changes
    Full,
}

#[derive(Debug, Eq, PartialEq)]
enum Change {
    Added(String, String),
    Removed(String, String),
    Comparison(String, String, String),
    Context(Vec<String>),
    Modified(String, String, Vec<Change>),
}

impl Change {
    fn section(&self) -> Option<String> {
        match self {
            Change::Added(key, _) => Some(format!("* {} added:", key)),
            Change::Removed(key, _) => Some(format!("* {} removed:", key)),
            Change::Modified(key, _, _) => Some(format!("* {} modified:", key)),
            _ => None,
        }
    }
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(_, v) => {
                writeln!(f, "✅ {}", v.green())
            }
            Change::Removed(_, v) => {
                writeln!(f, "❌ {}", v.red())
            }
            Change::Comparison(key, old, new) => {
                writeln!(f, "* {}: {} vs {}", key, old.red(), new.green())
            }
            Change::Context(values) => {
                writeln!(f, "{}", values.iter().map(|l| format!(" {}", l)).join("\n"))
            }
            Change::Modified(_, v, children) => {
                let mut txt_final = String::new();
                let mut current_key = None;
                for c in children {
                    let key = c.section();
                    if key.is_some() && key != current_key {
                        txt_final.push_str(key.as_deref().unwrap_or_default());
                        txt_final.push('\n');
                        current_key = key;
                    }

                    let indent = if current_key.is_some() { "  " } else { "" };
                    txt_final.push_str(
                        &format!("{}", c)
                            .split('\n')
                            .map(|l| indent.to_string() + l)
                            .join("\n"),
                    );
                }

                writeln!(f, "🔃 {}", v.blue())?;
                writeln!(
                    f,
                    "{}",
                    txt_final
                        .split('\n')
                        .filter(|l| l.trim().len() > 1)
                        .map(|l| "  ".to_string() + l)
                        .join("\n")
                )
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// A file containing a type tree
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// A file containing a type tree
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    #[command(flatten)]
    layout: LayoutArgs,

    /// Comparison mode
    #[arg(short, long, value_enum, default_value_t=Mode::Semantic)]
    mode: Mode,
}

/// Name a class by its id and, for script classes, the script GUID
fn class_key(class: &TypeClass) -> String {
    match class.script_guid() {
        Some(guid) => format!("{} ({})", class.class_id(), guid),
        None => class.class_id().to_string(),
    }
}

fn fields_text(class: &TypeClass) -> String {
    class
        .type_tree()
        .map(|t| t.to_string())
        .unwrap_or_default()
}

impl DiffArgs {
    fn handle_fields(&self, old: &str, new: &str) -> Vec<String> {
        let diff = TextDiff::from_lines(old, new);
        let mut comparison = Vec::new();

        for op in diff.ops().iter() {
            for change in diff.iter_inline_changes(op) {
                if self.mode == Mode::Semantic && change.tag() == ChangeTag::Equal {
                    continue;
                }

                let mut context = match change.tag() {
                    ChangeTag::Insert => format!("{}", "+".green()),
                    ChangeTag::Delete => format!("{}", "-".red()),
                    ChangeTag::Equal => " ".to_string(),
                };
                for (emphasized, value) in change.iter_strings_lossy() {
                    let value = value.trim_end_matches('\n');
                    if emphasized && self.mode == Mode::Full {
                        if change.tag() == ChangeTag::Insert {
                            context.push_str(&format!("{}", value.green().underline()));
                        } else {
                            context.push_str(&format!("{}", value.red().underline()));
                        }
                    } else if change.tag() == ChangeTag::Insert {
                        context.push_str(&format!("{}", value.green()));
                    } else if change.tag() == ChangeTag::Delete {
                        context.push_str(&format!("{}", value.red()));
                    } else {
                        context.push_str(&format!("{}", value.dimmed()));
                    }
                }
                comparison.push(context);
            }
        }

        comparison
    }

    fn handle_class(&self, left: &TypeClass, right: &TypeClass) -> Option<Change> {
        let mut changes = Vec::new();

        if self.mode == Mode::Full && left.class_guid() != right.class_guid() {
            changes.push(Change::Comparison(
                "guid".into(),
                left.class_guid().map(|g| g.to_string()).unwrap_or_default(),
                right.class_guid().map(|g| g.to_string()).unwrap_or_default(),
            ));
        }

        let old = fields_text(left);
        let new = fields_text(right);
        if TextDiff::from_lines(&old, &new).ratio() < 1.0 {
            changes.push(Change::Comparison(
                "fields".into(),
                left.type_tree().map_or(0, |t| t.len()).to_string(),
                right.type_tree().map_or(0, |t| t.len()).to_string(),
            ));
            changes.push(Change::Context(self.handle_fields(&old, &new)));
        }

        if changes.is_empty() {
            None
        } else {
            Some(Change::Modified("classes".into(), class_key(left), changes))
        }
    }

    fn handle_tree(&self, name: &str, left: &TypeTree, right: &TypeTree) -> Option<Change> {
        let mut changes = Vec::new();

        if self.mode == Mode::Full {
            let revision = |t: &TypeTree| {
                t.revision()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".into())
            };
            if left.revision() != right.revision() {
                changes.push(Change::Comparison(
                    "revision".into(),
                    revision(left),
                    revision(right),
                ));
            }
            if left.attributes() != right.attributes() {
                changes.push(Change::Comparison(
                    "attributes".into(),
                    format!("{:#x}", left.attributes()),
                    format!("{:#x}", right.attributes()),
                ));
            }
            if left.is_embedded() != right.is_embedded() {
                changes.push(Change::Comparison(
                    "embedded".into(),
                    left.is_embedded().to_string(),
                    right.is_embedded().to_string(),
                ));
            }
        }

        let find = |tree: &TypeTree, key: &str| -> Option<TypeClass> {
            tree.classes().iter().find(|c| class_key(c) == key).cloned()
        };

        let left_keys = left.classes().iter().map(class_key).unique().collect::<Vec<_>>();
        let right_keys = right.classes().iter().map(class_key).unique().collect::<Vec<_>>();

        right_keys
            .iter()
            .filter(|k| !left_keys.contains(*k))
            .map(|k| Change::Added("classes".into(), k.clone()))
            .for_each(|c| changes.push(c));

        left_keys
            .iter()
            .filter(|k| !right_keys.contains(*k))
            .map(|k| Change::Removed("classes".into(), k.clone()))
            .for_each(|c| changes.push(c));

        left_keys
            .iter()
            .filter(|k| right_keys.contains(*k))
            .filter_map(|k| {
                let l = find(left, k)?;
                let r = find(right, k)?;
                self.handle_class(&l, &r)
            })
            .for_each(|c| changes.push(c));

        if changes.is_empty() {
            None
        } else {
            Some(Change::Modified("type tree".into(), name.into(), changes))
        }
    }

    pub fn handle(&self) -> Result<()> {
        let left = self.layout.read(&self.left)?;
        let right = self.layout.read(&self.right)?;

        let difference = self.handle_tree(&self.left.to_string_lossy(), &left, &right);

        if let Some(d) = difference {
            println!("{}", d);
        }

        Ok(())
    }
}
