use std::io::Cursor;

use binrw::Endian;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;
use unity_typetree::{
    error::{Error, Result},
    strings::COMMON_STRING_BASE,
    TreeFormat, TypeTree, UnityGuid, VersionInfo,
};

const INT: u32 = COMMON_STRING_BASE | 222;
const BASE: u32 = COMMON_STRING_BASE | 55;
const GAME_OBJECT: u32 = COMMON_STRING_BASE | 172;
const MONO_BEHAVIOUR: u32 = COMMON_STRING_BASE | 263;

/// Modern field record, little endian
#[allow(clippy::too_many_arguments)]
fn record(
    version: i16,
    level: u8,
    is_array: u8,
    type_offset: u32,
    name_offset: u32,
    byte_size: i32,
    index: i32,
    flags: i32,
) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend(version.to_le_bytes());
    out.push(level);
    out.push(is_array);
    out.extend(type_offset.to_le_bytes());
    out.extend(name_offset.to_le_bytes());
    out.extend(byte_size.to_le_bytes());
    out.extend(index.to_le_bytes());
    out.extend(flags.to_le_bytes());
    out
}

/// Field count, string table size, records and the string table
fn field_list(records: &[Vec<u8>], table: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::new();
    out.extend((records.len() as i32).to_le_bytes());
    out.extend((table.len() as i32).to_le_bytes());
    for r in records {
        out.extend(r);
    }
    out.extend(table);
    out
}

#[traced_test]
#[test]
fn read_legacy_tree() -> Result<()> {
    #[rustfmt::skip]
    let mut input = Cursor::new(vec![
        // Revision
        b'3', b'.', b'4', b'.', b'0', b'f', b'5', 0x00,
        // Attributes
        0x05, 0x00, 0x00, 0x00,
        // Classes
        0x01, 0x00, 0x00, 0x00,
        // Class id
        0x01, 0x00, 0x00, 0x00,
        // Root
        b'G', b'a', b'm', b'e', b'O', b'b', b'j', b'e', b'c', b't', 0x00,
        b'B', b'a', b's', b'e', 0x00,
        0xFF, 0xFF, 0xFF, 0xFF,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x00, 0x80, 0x00, 0x00,
        0x02, 0x00, 0x00, 0x00,
        // m_Layer
        b'i', b'n', b't', 0x00,
        b'm', b'_', b'L', b'a', b'y', b'e', b'r', 0x00,
        0x04, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        // m_Name
        b's', b't', b'r', b'i', b'n', b'g', 0x00,
        b'm', b'_', b'N', b'a', b'm', b'e', 0x00,
        0xFF, 0xFF, 0xFF, 0xFF,
        0x02, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x01, 0x00, 0x00, 0x00,
        0x00, 0x80, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        // Padding
        0x00, 0x00, 0x00, 0x00,
    ]);

    let info = VersionInfo::new(9);
    let tree = TypeTree::read(&mut input, &info)?;

    assert_eq!(input.position(), input.get_ref().len() as u64);
    assert_eq!(tree.format(), TreeFormat::Legacy);
    assert_eq!(tree.revision().map(|r| r.as_str()), Some("3.4.0f5"));
    assert_eq!(tree.attributes(), 5);
    assert!(tree.is_embedded());
    assert_eq!(tree.len(), 1);

    // the caller's version info stays untouched
    assert!(info.revision.is_none());
    assert_eq!(tree.version_info().revision, tree.revision().cloned());

    let class = tree.class_by_id(1).unwrap();
    assert!(class.class_guid().is_none());
    assert!(class.script_guid().is_none());

    let fields = class.type_tree().unwrap();
    let root = fields.node(fields.root());
    assert_eq!(root.type_().type_name, "GameObject");
    assert_eq!(root.type_().type_flags, 0x8000);
    assert!(root.type_().is_variable_size());
    assert_eq!(
        root.children()
            .map(|c| c.type_().field_name.as_str())
            .collect::<Vec<_>>(),
        vec!["m_Layer", "m_Name"]
    );

    let name = root.child("m_Name").unwrap();
    assert_eq!(name.type_().type_name, "string");
    assert_eq!(name.type_().index, 2);
    assert_eq!(name.type_().tree_level, 1);

    Ok(())
}

#[test]
fn read_legacy_tree_big_endian_without_revision() -> Result<()> {
    #[rustfmt::skip]
    let mut input = Cursor::new(vec![
        // Classes
        0x00, 0x00, 0x00, 0x01,
        // Class id
        0x00, 0x00, 0x00, 0x15,
        // Root
        b'M', 0x00,
        b'B', 0x00,
        0xFF, 0xFF, 0xFF, 0xFF,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00,
    ]);

    let tree = TypeTree::read(&mut input, &VersionInfo::new(6).with_endian(Endian::Big))?;

    assert!(tree.revision().is_none());
    assert_eq!(tree.attributes(), 0);
    assert_eq!(input.position(), input.get_ref().len() as u64);

    let fields = tree.classes()[0].type_tree().unwrap();
    assert_eq!(tree.classes()[0].class_id(), 21);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields.node(fields.root()).type_().version, 2);

    Ok(())
}

#[traced_test]
#[test]
fn read_modern_tree() -> Result<()> {
    let mut input: Vec<u8> = Vec::new();
    input.extend(b"2017.4.1f1\0");
    input.extend(0i32.to_le_bytes());
    // embedded
    input.push(1);
    input.extend(2i32.to_le_bytes());

    // script class
    input.extend((-1i32).to_le_bytes());
    input.extend([0x11u8; 16]);
    input.extend([0x22u8; 16]);
    input.extend(field_list(
        &[
            record(1, 0, 0, MONO_BEHAVIOUR, BASE, -1, 0, 0x8000),
            record(1, 1, 0, INT, 0, 4, 1, 0),
            record(2, 1, 0, 8, 15, 12, 2, 0),
        ],
        b"m_Speed\0Custom\0m_Custom\0",
    ));

    // engine class
    input.extend(3i32.to_le_bytes());
    input.extend([0x33u8; 16]);
    input.extend(field_list(
        &[record(1, 0, 0, GAME_OBJECT, BASE, -1, 0, 0)],
        b"",
    ));

    let len = input.len() as u64;
    let mut input = Cursor::new(input);
    let tree = TypeTree::read(&mut input, &VersionInfo::new(15))?;

    assert_eq!(input.position(), len);
    assert_eq!(tree.format(), TreeFormat::Modern);
    assert_eq!(tree.revision().unwrap().major(), Some(2017));
    assert!(tree.is_embedded());
    assert_eq!(tree.len(), 2);

    let script = &tree.classes()[0];
    assert_eq!(script.class_id(), -1);
    assert_eq!(script.script_guid(), Some(&UnityGuid([0x11u8; 16])));
    assert_eq!(script.class_guid(), Some(&UnityGuid([0x22u8; 16])));

    let fields = script.type_tree().unwrap();
    let root = fields.node(fields.root());
    assert_eq!(root.type_().type_name, "MonoBehaviour");
    assert_eq!(root.type_().field_name, "Base");

    let speed = root.child("m_Speed").unwrap();
    assert_eq!(speed.type_().type_name, "int");
    assert_eq!(speed.type_().byte_size, 4);

    let custom = root.child("m_Custom").unwrap();
    assert_eq!(custom.type_().type_name, "Custom");
    assert_eq!(custom.type_().version, 2);
    assert_eq!(custom.type_().name_offset, 15);

    let engine = tree.class_by_id(3).unwrap();
    assert!(engine.script_guid().is_none());
    assert_eq!(engine.class_guid(), Some(&UnityGuid([0x33u8; 16])));
    let fields = engine.type_tree().unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields.node(fields.root()).type_().type_name, "GameObject");

    Ok(())
}

#[test]
fn read_modern_tree_without_fields() -> Result<()> {
    let mut input: Vec<u8> = Vec::new();
    input.extend(b"5.0.0f4\0");
    input.extend(7i32.to_le_bytes());
    // not embedded
    input.push(0);
    input.extend(2i32.to_le_bytes());
    input.extend(114i32.to_le_bytes());
    input.extend([0x01u8; 16]);
    input.extend((-2i32).to_le_bytes());
    input.extend([0x02u8; 16]);
    input.extend([0x03u8; 16]);

    let tree = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(14))?;

    assert!(!tree.is_embedded());
    assert_eq!(tree.attributes(), 7);
    assert!(tree.classes().iter().all(|c| c.type_tree().is_none()));
    assert!(tree.classes()[0].script_guid().is_none());
    assert_eq!(tree.classes()[1].script_guid(), Some(&UnityGuid([0x02u8; 16])));
    assert_eq!(tree.classes()[1].class_guid(), Some(&UnityGuid([0x03u8; 16])));

    Ok(())
}

#[traced_test]
#[test]
fn read_modern_tree_rebuilds_levels() -> Result<()> {
    let table = b"f0\0f1\0f2\0f3\0f4\0f5\0f6\0";
    let records = [0u8, 1, 2, 1, 1, 0, 1]
        .iter()
        .enumerate()
        .map(|(i, level)| record(1, *level, 0, INT, 3 * i as u32, 4, i as i32, 0))
        .collect::<Vec<_>>();

    let mut input: Vec<u8> = Vec::new();
    input.extend(b"5.6.3p1\0");
    input.extend(0i32.to_le_bytes());
    input.push(1);
    input.extend(1i32.to_le_bytes());
    input.extend(4i32.to_le_bytes());
    input.extend([0x00u8; 16]);
    input.extend(field_list(&records, table));

    let tree = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(17))?;
    let fields = tree.classes()[0].type_tree().unwrap();
    let root = fields.node(fields.root());

    assert_eq!(fields.len(), 7);
    assert_eq!(
        root.children()
            .map(|c| c.type_().field_name.as_str())
            .collect::<Vec<_>>(),
        vec!["f1", "f3", "f4", "f5"]
    );
    assert_eq!(root.child("f1").unwrap().child("f2").unwrap().depth(), 2);
    assert_eq!(
        root.child("f5").unwrap().child("f6").unwrap().type_().index,
        6
    );
    assert!(logs_contain("not below the root"));

    Ok(())
}

#[test]
fn read_modern_tree_with_empty_field_list() -> Result<()> {
    let mut input: Vec<u8> = Vec::new();
    input.extend(b"5.0.0f4\0");
    input.extend(0i32.to_le_bytes());
    input.push(1);
    input.extend(1i32.to_le_bytes());
    input.extend(1i32.to_le_bytes());
    input.extend([0x00u8; 16]);
    input.extend(field_list(&[], b""));

    let tree = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(14))?;

    assert!(tree.classes()[0].type_tree().is_none());

    Ok(())
}

#[test]
fn read_unresolved_string() {
    let mut input: Vec<u8> = Vec::new();
    input.extend(b"5.0.0f4\0");
    input.extend(0i32.to_le_bytes());
    input.push(1);
    input.extend(1i32.to_le_bytes());
    input.extend(1i32.to_le_bytes());
    input.extend([0x00u8; 16]);
    input.extend(field_list(&[record(1, 0, 0, INT, 99, 4, 0, 0)], b"m_X\0"));

    let result = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(14));

    assert!(matches!(result, Err(Error::UnresolvedString { offset: 99 })));
}

#[test]
fn read_truncated() {
    #[rustfmt::skip]
    let mut input = Cursor::new(vec![
        // Classes
        0x01, 0x00, 0x00, 0x00,
        // Class id
        0x01, 0x00, 0x00, 0x00,
        // Root, cut short
        b'G', b'a', b'm', b'e', 0x00,
        b'B', b'a', b's', b'e', 0x00,
        0xFF, 0xFF,
    ]);

    let result = TypeTree::read(&mut input, &VersionInfo::new(6));

    assert!(matches!(result, Err(Error::Truncated)));
}

#[test]
fn read_truncated_string_table() {
    let mut input: Vec<u8> = Vec::new();
    input.extend(b"5.0.0f4\0");
    input.extend(0i32.to_le_bytes());
    input.push(1);
    input.extend(1i32.to_le_bytes());
    input.extend(1i32.to_le_bytes());
    input.extend([0x00u8; 16]);
    input.extend(1i32.to_le_bytes());
    input.extend(64i32.to_le_bytes());
    input.extend(record(1, 0, 0, INT, 0, 4, 0, 0));
    input.extend(b"m_X\0");

    let result = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(14));

    assert!(matches!(result, Err(Error::Truncated)));
}

#[test]
fn read_negative_class_count() {
    let mut input: Vec<u8> = Vec::new();
    input.extend((-3i32).to_le_bytes());

    let result = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(5));

    assert!(matches!(
        result,
        Err(Error::InvalidCount { count: -3, .. })
    ));
}

#[test]
fn read_revision_too_long() {
    let mut input = vec![b'1'; 300];
    input.push(0);

    let result = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(9));

    assert!(matches!(result, Err(Error::StringTooLong { limit: 255 })));
}

#[test]
fn read_duplicate_class_ids() -> Result<()> {
    let mut input: Vec<u8> = Vec::new();
    input.extend(2i32.to_le_bytes());
    for name in [b"A\0", b"B\0"] {
        input.extend(4i32.to_le_bytes());
        input.extend(name);
        input.extend(b"Base\0");
        input.extend((-1i32).to_le_bytes());
        input.extend(0i32.to_le_bytes());
        input.extend(0i32.to_le_bytes());
        input.extend(1i32.to_le_bytes());
        input.extend(0i32.to_le_bytes());
        input.extend(0i32.to_le_bytes());
    }

    let tree = TypeTree::read(&mut Cursor::new(input), &VersionInfo::new(6))?;

    assert_eq!(tree.len(), 2);
    let first = tree.class_by_id(4).unwrap().type_tree().unwrap();
    assert_eq!(first.node(first.root()).type_().type_name, "A");

    Ok(())
}
