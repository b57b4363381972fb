use std::io::Cursor;

use binrw::Endian;
use miette::Result;
use pretty_assertions::assert_eq;
use tracing::{info, instrument};
use tracing_test::traced_test;
use unity_typetree::{error::Error, FieldTree, Type, TypeClass, TypeTree, VersionInfo};

fn field(type_name: &str, field_name: &str, byte_size: i32, index: i32, level: i32) -> Type {
    Type::builder()
        .type_name(type_name)
        .field_name(field_name)
        .byte_size(byte_size)
        .index(index)
        .version(1)
        .tree_level(level)
        .build()
}

fn game_object() -> FieldTree {
    let mut tree = FieldTree::new(field("GameObject", "Base", -1, 0, 0));
    let components = tree.add_child(
        tree.root(),
        field("vector", "m_Component", -1, 1, 1),
    );
    let array = tree.add_child(
        components,
        Type::builder()
            .type_name("Array")
            .field_name("Array")
            .byte_size(-1)
            .index(2)
            .is_array(1)
            .version(1)
            .tree_level(2)
            .build(),
    );
    tree.add_child(array, field("int", "size", 4, 3, 3));
    tree.add_child(array, field("pair", "data", 12, 4, 3));
    tree.add_child(tree.root(), field("unsigned int", "m_Layer", 4, 5, 1));
    tree.add_child(
        tree.root(),
        Type::builder()
            .type_name("string")
            .field_name("m_Name")
            .byte_size(-1)
            .index(6)
            .version(1)
            .type_flags(0x8000)
            .tree_level(1)
            .build(),
    );
    tree
}

fn sample(info: &VersionInfo) -> TypeTree {
    let mut tree = TypeTree::new(info);
    tree.set_attributes(5);
    tree.set_embedded(true);

    let mut class = TypeClass::new(1);
    class.set_type_tree(Some(game_object()));
    tree.push_class(class);

    let mut class = TypeClass::new(4);
    class.set_type_tree(Some(FieldTree::new(field("Transform", "Base", -1, 0, 0))));
    tree.push_class(class);

    tree
}

#[instrument(skip(info), fields(version = info.asset_version))]
fn validate_round_trip(info: &VersionInfo) -> Result<()> {
    let expected = sample(info);

    let mut buffer = Cursor::new(Vec::new());
    expected.write(&mut buffer)?;
    info!("wrote {} bytes", buffer.get_ref().len());

    buffer.set_position(0);
    let actual = TypeTree::read(&mut buffer, &expected.version_info())?;

    assert_eq!(buffer.position(), buffer.get_ref().len() as u64);
    assert_eq!(actual, expected);

    let fields = actual.classes()[0].type_tree().unwrap();
    assert_eq!(fields.to_string(), game_object().to_string());

    Ok(())
}

#[traced_test]
#[test]
fn legacy_round_trip() -> Result<()> {
    validate_round_trip(&VersionInfo::new(9).with_revision("3.4.0f5"))?;
    validate_round_trip(&VersionInfo::new(7).with_revision("3.0.0f5"))?;
    validate_round_trip(&VersionInfo::new(6).with_endian(Endian::Big))?;
    validate_round_trip(&VersionInfo::new(13).with_revision("4.7.2f1").with_endian(Endian::Big))?;

    Ok(())
}

#[test]
fn old_versions_drop_revision_and_attributes() -> Result<()> {
    let tree = sample(&VersionInfo::new(6).with_revision("2.6.1f3"));

    let mut buffer = Cursor::new(Vec::new());
    tree.write(&mut buffer)?;
    buffer.set_position(0);

    let actual = TypeTree::read(&mut buffer, &VersionInfo::new(6))?;

    assert!(actual.revision().is_none());
    assert_eq!(actual.attributes(), 0);
    assert_eq!(actual.classes(), tree.classes());

    Ok(())
}

#[test]
fn modern_trees_are_not_written() {
    let tree = sample(&VersionInfo::new(15).with_revision("5.4.0f3"));

    let mut buffer = Cursor::new(Vec::new());
    let result = tree.write(&mut buffer);

    assert!(matches!(
        result,
        Err(Error::UnsupportedFormat { version: 15 })
    ));
    assert!(buffer.get_ref().is_empty());
}

#[test]
fn deep_chain_round_trip() -> Result<()> {
    let mut fields = FieldTree::new(field("Base", "Base", -1, 0, 0));
    let mut last = fields.root();
    for level in 1..5000 {
        last = fields.add_child(last, field("Node", "next", -1, level, level));
    }

    let mut class = TypeClass::new(114);
    class.set_type_tree(Some(fields));

    let mut expected = TypeTree::new(&VersionInfo::new(9).with_revision("3.4.0f5"));
    expected.set_embedded(true);
    expected.push_class(class);

    let mut buffer = Cursor::new(Vec::new());
    expected.write(&mut buffer)?;

    buffer.set_position(0);
    let actual = TypeTree::read(&mut buffer, &expected.version_info())?;

    let fields = actual.classes()[0].type_tree().unwrap();
    assert_eq!(fields.len(), 5000);
    assert_eq!(fields.node(last).depth(), 4999);
    assert_eq!(actual, expected);

    Ok(())
}
