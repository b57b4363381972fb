//! Decoding type trees
//!

use std::io::{Read, Seek};

use binrw::{BinReaderExt, Endian};
use byteorder::ReadBytesExt;
use tracing::{debug, instrument, trace, warn};

use crate::{
    error::{Error, Result},
    node::{FieldTree, NodeId},
    revision::UnityRevision,
    strings::StringTable,
    tree::{TreeFormat, TypeClass, TypeTree, VersionInfo, REVISION_LIMIT, REVISION_VERSION},
    types::{LegacyFieldRecord, ModernFieldRecord, Type, UnityGuid},
};

impl TypeTree {
    /// Decode a type tree for the asset described by `info`.
    ///
    /// `info` is not modified; a revision stored in the data is available from
    /// [`TypeTree::revision`] and [`TypeTree::version_info`].
    ///
    /// ```no_run
    /// use std::io::prelude::*;
    /// use unity_typetree::{TypeTree, VersionInfo};
    ///
    /// fn list_classes(mut reader: impl Read + Seek) -> unity_typetree::error::Result<()> {
    ///     let tree = TypeTree::read(&mut reader, &VersionInfo::new(15))?;
    ///
    ///     for class in tree.classes() {
    ///         println!("{}", class.class_id());
    ///     }
    ///
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(reader), err)]
    pub fn read<R: Read + Seek>(reader: &mut R, info: &VersionInfo) -> Result<TypeTree> {
        let mut tree = TypeTree::new(info);

        if info.asset_version >= REVISION_VERSION {
            let revision = read_string_null(reader, REVISION_LIMIT)?;
            debug!("revision {}", revision);
            tree.revision = Some(UnityRevision::new(revision));
            tree.attributes = reader.read_type(info.endian)?;
        }

        match TreeFormat::for_version(info.asset_version) {
            TreeFormat::Modern => read_modern(reader, &mut tree)?,
            TreeFormat::Legacy => read_legacy(reader, &mut tree)?,
        }

        Ok(tree)
    }
}

fn read_count<R: Read + Seek>(reader: &mut R, endian: Endian, what: &'static str) -> Result<usize> {
    let count: i32 = reader.read_type(endian)?;
    usize::try_from(count).map_err(|_| Error::InvalidCount { what, count })
}

fn read_string_null<R: Read>(reader: &mut R, limit: usize) -> Result<String> {
    let mut raw = Vec::new();
    loop {
        let char = reader.read_u8()?;
        if char == b'\0' {
            break;
        }
        if raw.len() == limit {
            return Err(Error::StringTooLong { limit });
        }
        raw.push(char);
    }
    Ok(String::from_utf8(raw)?)
}

fn read_legacy<R: Read + Seek>(reader: &mut R, tree: &mut TypeTree) -> Result<()> {
    let endian = tree.endian;
    let count = read_count(reader, endian, "base class")?;

    for _ in 0..count {
        let class_id: i32 = reader.read_type(endian)?;
        debug!("reading legacy class {}", class_id);

        let mut class = TypeClass::new(class_id);
        class.set_type_tree(Some(read_node_legacy(reader, endian)?));
        tree.classes.push(class);
    }

    tree.embedded = count > 0;

    // padding
    if tree.asset_version >= REVISION_VERSION {
        let _padding: i32 = reader.read_type(endian)?;
    }

    Ok(())
}

/// Read a nested field tree, one record followed by its child count and children
fn read_node_legacy<R: Read + Seek>(reader: &mut R, endian: Endian) -> Result<FieldTree> {
    let root: LegacyFieldRecord = reader.read_type(endian)?;
    let mut tree = FieldTree::new(root.into_type(0)?);

    // (node, remaining children, level)
    let mut stack = vec![(NodeId::ROOT, read_count(reader, endian, "child")?, 0)];
    while let Some((node, remaining, level)) = stack.last_mut() {
        if *remaining == 0 {
            stack.pop();
            continue;
        }
        *remaining -= 1;

        let (parent, child_level) = (*node, *level + 1);
        let record: LegacyFieldRecord = reader.read_type(endian)?;
        let child = tree.add_child(parent, record.into_type(child_level)?);
        trace!("{}", tree.node(child).type_());

        let children = read_count(reader, endian, "child")?;
        stack.push((child, children, child_level));
    }

    Ok(tree)
}

fn read_modern<R: Read + Seek>(reader: &mut R, tree: &mut TypeTree) -> Result<()> {
    let endian = tree.endian;
    let common = StringTable::common();

    tree.embedded = reader.read_type::<u8>(endian)? != 0;
    let count = read_count(reader, endian, "base class")?;

    for _ in 0..count {
        let class_id: i32 = reader.read_type(endian)?;
        debug!("reading class {}", class_id);

        let mut class = TypeClass::new(class_id);
        if class_id < 0 {
            class.set_script_guid(Some(reader.read_type::<UnityGuid>(endian)?));
        }
        class.set_class_guid(Some(reader.read_type::<UnityGuid>(endian)?));

        if tree.embedded {
            class.set_type_tree(read_node_modern(reader, endian, &common)?);
        }

        tree.classes.push(class);
    }

    Ok(())
}

/// Read a flat field list with its local string table and rebuild the tree
fn read_node_modern<R: Read + Seek>(
    reader: &mut R,
    endian: Endian,
    common: &StringTable,
) -> Result<Option<FieldTree>> {
    let num_fields = read_count(reader, endian, "field")?;
    let table_len = read_count(reader, endian, "string table byte")?;

    let mut fields = Vec::new();
    for _ in 0..num_fields {
        let record: ModernFieldRecord = reader.read_type(endian)?;
        fields.push(Type::from(record));
    }

    let mut buffer = Vec::new();
    reader.by_ref().take(table_len as u64).read_to_end(&mut buffer)?;
    if buffer.len() != table_len {
        return Err(Error::Truncated);
    }
    let local = StringTable::load(&buffer);

    for field in fields.iter_mut() {
        field.field_name = resolve(field.name_offset, &local, common)?;
        field.type_name = resolve(field.type_offset, &local, common)?;
    }

    Ok(build_tree(fields))
}

fn resolve(offset: u32, local: &StringTable, common: &StringTable) -> Result<String> {
    local
        .get(offset)
        .or_else(|| common.get(offset))
        .map(str::to_owned)
        .ok_or(Error::UnresolvedString { offset })
}

/// Rebuild the hierarchy of a flat, depth first list of fields from their tree levels
///
/// Each field becomes a child of the closest preceding field with a lower level. A level that
/// skips ahead is attached to the previous field, a level at or above the root's is attached
/// to the root.
pub(crate) fn build_tree(fields: Vec<Type>) -> Option<FieldTree> {
    let mut fields = fields.into_iter();
    let mut tree = FieldTree::new(fields.next()?);
    let root_level = tree.node(NodeId::ROOT).type_().tree_level;
    let mut cursor = NodeId::ROOT;

    for field in fields {
        let level = field.tree_level;
        let cursor_level = tree.node(cursor).type_().tree_level;

        if level > cursor_level + 1 {
            warn!(
                "field {} jumps from level {} to {}",
                field.field_name, cursor_level, level
            );
        }

        if level <= root_level {
            warn!(
                "field {} at level {} is not below the root, attaching to root",
                field.field_name, level
            );
            cursor = NodeId::ROOT;
        } else {
            while tree.node(cursor).type_().tree_level >= level {
                match tree.node(cursor).parent() {
                    Some(parent) => cursor = parent.id(),
                    None => break,
                }
            }
        }

        trace!("{}{}", "  ".repeat(tree.depth(cursor) + 1), field);
        cursor = tree.add_child(cursor, field);
    }

    Some(tree)
}
