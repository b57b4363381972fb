//! Encoding type trees
//!

use std::io::{Seek, Write};

use binrw::{BinWriterExt, Endian};
use byteorder::WriteBytesExt;
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    node::FieldTree,
    tree::{TreeFormat, TypeTree, REVISION_LIMIT, REVISION_VERSION},
    types::LegacyFieldRecord,
};

impl TypeTree {
    /// Encode this type tree in the layout of its asset format version.
    ///
    /// Only the legacy layout (asset format versions before 14) can be written. Modern trees
    /// fail with [`Error::UnsupportedFormat`], a legacy class without a field tree fails
    /// with [`Error::MissingFieldTree`], and names or a revision that cannot be stored as null
    /// terminated strings fail with [`Error::NulInString`] or [`Error::StringTooLong`]. All of
    /// these are detected before anything is written.
    ///
    /// ```
    /// # fn doit() -> unity_typetree::error::Result<()>
    /// # {
    /// use std::io::Cursor;
    /// use unity_typetree::{node::FieldTree, types::Type, TypeClass, TypeTree, VersionInfo};
    ///
    /// let mut tree = TypeTree::new(&VersionInfo::new(9).with_revision("3.4.0f5"));
    /// let mut class = TypeClass::new(1);
    /// class.set_type_tree(Some(FieldTree::new(
    ///     Type::builder().type_name("GameObject").field_name("Base").build(),
    /// )));
    /// tree.push_class(class);
    /// tree.set_embedded(true);
    ///
    /// let mut out = Cursor::new(Vec::new());
    /// tree.write(&mut out)?;
    ///
    /// out.set_position(0);
    /// assert_eq!(TypeTree::read(&mut out, &tree.version_info())?, tree);
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    #[instrument(skip_all, fields(version = self.asset_version), err)]
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Result<()> {
        if self.format() == TreeFormat::Modern {
            return Err(Error::UnsupportedFormat {
                version: self.asset_version,
            });
        }

        self.validate_legacy()?;

        let endian = self.endian;

        if self.asset_version >= REVISION_VERSION {
            let revision = self.revision.as_ref().map(|r| r.as_str()).unwrap_or_default();
            writer.write_all(revision.as_bytes())?;
            writer.write_u8(0u8)?;
            writer.write_type(&self.attributes, endian)?;
        }

        writer.write_type(&(self.classes.len() as i32), endian)?;

        for class in &self.classes {
            debug!("writing legacy class {}", class.class_id());
            writer.write_type(&class.class_id(), endian)?;

            if let Some(tree) = class.type_tree() {
                write_node_legacy(writer, endian, tree)?;
            }
        }

        // padding
        if self.asset_version >= REVISION_VERSION {
            writer.write_type(&0i32, endian)?;
        }

        Ok(())
    }

    /// Check that everything `write` emits can be read back unchanged
    fn validate_legacy(&self) -> Result<()> {
        if self.asset_version >= REVISION_VERSION {
            if let Some(revision) = &self.revision {
                check_null_free("revision", revision.as_str())?;
                if revision.as_str().len() > REVISION_LIMIT {
                    return Err(Error::StringTooLong {
                        limit: REVISION_LIMIT,
                    });
                }
            }
        }

        for class in &self.classes {
            let tree = class.type_tree().ok_or(Error::MissingFieldTree {
                class_id: class.class_id(),
            })?;

            for node in tree.iter() {
                check_null_free("type name", &node.type_().type_name)?;
                check_null_free("field name", &node.type_().field_name)?;
            }
        }

        Ok(())
    }
}

fn check_null_free(what: &'static str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(Error::NulInString {
            what,
            value: value.to_owned(),
        });
    }
    Ok(())
}

/// Write every node in pre-order, each record followed by its child count
fn write_node_legacy<W: Write + Seek>(
    writer: &mut W,
    endian: Endian,
    tree: &FieldTree,
) -> Result<()> {
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        writer.write_type(&LegacyFieldRecord::from(node.type_()), endian)?;

        let children = node.children().map(|c| c.id()).collect::<Vec<_>>();
        writer.write_type(&(children.len() as i32), endian)?;
        stack.extend(children.into_iter().rev());
    }

    Ok(())
}
