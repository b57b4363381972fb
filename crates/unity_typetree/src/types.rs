//! Field records and other small types stored in a type tree.

use std::fmt;

use binrw::{BinRead, BinWrite, NullString};
use bon::Builder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Metadata of a single serialized field
///
/// Legacy trees store the names inline, modern trees store offsets into a string table which
/// are resolved while decoding. Flag words are kept as raw integers.
#[derive(Builder, Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Type {
    /// Name of the field type, e.g. `int` or `PPtr<GameObject>`
    #[builder(into, default)]
    pub type_name: String,

    /// Name of the field, e.g. `m_Name`
    #[builder(into, default)]
    pub field_name: String,

    /// Size in bytes, `-1` for variably sized fields
    #[builder(default)]
    pub byte_size: i32,

    /// Index of the field in the flattened tree
    #[builder(default)]
    pub index: i32,

    /// Array flag word, non-zero for arrays
    #[builder(default)]
    pub is_array: i32,

    /// Version of the field type
    #[builder(default)]
    pub version: i32,

    /// Version dependent behaviour flags
    #[builder(default)]
    pub type_flags: i32,

    /// Nesting depth, `0` for the root of a class
    #[builder(default)]
    pub tree_level: i32,

    /// Offset of the field name in a string table (modern format)
    #[builder(default)]
    pub name_offset: u32,

    /// Offset of the type name in a string table (modern format)
    #[builder(default)]
    pub type_offset: u32,
}

impl Type {
    /// Whether the field is variably sized
    pub fn is_variable_size(&self) -> bool {
        self.byte_size < 0
    }

    /// Whether the field is an array
    pub fn is_array(&self) -> bool {
        self.is_array != 0
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} size={} index={} flags={:#x}",
            self.type_name, self.field_name, self.byte_size, self.index, self.type_flags
        )?;
        if self.is_array() {
            write!(f, " array")?;
        }
        Ok(())
    }
}

/// Field record as stored by asset format versions before 14
#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
pub(crate) struct LegacyFieldRecord {
    pub type_name: NullString,
    pub field_name: NullString,
    pub byte_size: i32,
    pub index: i32,
    pub is_array: i32,
    pub version: i32,
    pub type_flags: i32,
}

impl LegacyFieldRecord {
    /// Convert into a [`Type`] placed at `level`
    pub fn into_type(self, level: i32) -> Result<Type> {
        Ok(Type {
            type_name: String::from_utf8(self.type_name.0)?,
            field_name: String::from_utf8(self.field_name.0)?,
            byte_size: self.byte_size,
            index: self.index,
            is_array: self.is_array,
            version: self.version,
            type_flags: self.type_flags,
            tree_level: level,
            ..Default::default()
        })
    }
}

impl From<&Type> for LegacyFieldRecord {
    fn from(value: &Type) -> Self {
        Self {
            type_name: NullString::from(value.type_name.as_str()),
            field_name: NullString::from(value.field_name.as_str()),
            byte_size: value.byte_size,
            index: value.index,
            is_array: value.is_array,
            version: value.version,
            type_flags: value.type_flags,
        }
    }
}

/// Field record as stored by asset format version 14 and later
///
/// Names are not stored inline, see [`crate::strings::StringTable`].
#[derive(BinRead, Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModernFieldRecord {
    pub version: i16,
    pub tree_level: u8,
    pub is_array: u8,
    pub type_offset: u32,
    pub name_offset: u32,
    pub byte_size: i32,
    pub index: i32,
    pub type_flags: i32,
}

impl From<ModernFieldRecord> for Type {
    fn from(value: ModernFieldRecord) -> Self {
        Type {
            byte_size: value.byte_size,
            index: value.index,
            is_array: value.is_array as i32,
            version: value.version as i32,
            type_flags: value.type_flags,
            tree_level: value.tree_level as i32,
            name_offset: value.name_offset,
            type_offset: value.type_offset,
            ..Default::default()
        }
    }
}

/// Opaque 16 byte GUID identifying scripts and classes
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnityGuid(pub [u8; 16]);

impl UnityGuid {
    /// Raw bytes in file order
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for UnityGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
