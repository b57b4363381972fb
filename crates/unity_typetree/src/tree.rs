//! The type tree of an asset file and the classes it describes.

use binrw::Endian;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::FieldTree;
use crate::revision::UnityRevision;
use crate::types::UnityGuid;

/// First asset format version that stores the engine revision and attribute flags
pub const REVISION_VERSION: i32 = 7;

/// Maximum length of the revision string, excluding its terminator
pub const REVISION_LIMIT: usize = 255;

/// First asset format version that stores flattened field trees
pub const MODERN_VERSION: i32 = 14;

/// Version information of the asset file a type tree belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Asset format version from the asset header
    pub asset_version: i32,

    /// Engine revision, if already known
    pub revision: Option<UnityRevision>,

    /// Byte order of the asset metadata
    pub endian: Endian,
}

impl VersionInfo {
    pub fn new(asset_version: i32) -> Self {
        Self {
            asset_version,
            revision: None,
            endian: Endian::Little,
        }
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    pub fn with_revision(mut self, revision: impl Into<UnityRevision>) -> Self {
        self.revision = Some(revision.into());
        self
    }
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self::new(REVISION_VERSION)
    }
}

/// On-disk layout of a type tree, chosen from the asset format version
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TreeFormat {
    /// Nested field records with inline names
    Legacy,

    /// Flat field records tagged with their depth, names in string tables
    Modern,
}

impl TreeFormat {
    pub fn for_version(asset_version: i32) -> Self {
        if asset_version >= MODERN_VERSION {
            TreeFormat::Modern
        } else {
            TreeFormat::Legacy
        }
    }
}

/// A class described by a type tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeClass {
    class_id: i32,
    script_guid: Option<UnityGuid>,
    class_guid: Option<UnityGuid>,
    type_tree: Option<FieldTree>,
}

impl TypeClass {
    pub fn new(class_id: i32) -> Self {
        Self {
            class_id,
            ..Default::default()
        }
    }

    /// Class identifier, negative for script classes
    pub fn class_id(&self) -> i32 {
        self.class_id
    }

    pub fn set_class_id(&mut self, class_id: i32) {
        self.class_id = class_id;
    }

    /// GUID of the script backing this class, present for negative class ids
    pub fn script_guid(&self) -> Option<&UnityGuid> {
        self.script_guid.as_ref()
    }

    pub fn set_script_guid(&mut self, guid: Option<UnityGuid>) {
        self.script_guid = guid;
    }

    pub fn class_guid(&self) -> Option<&UnityGuid> {
        self.class_guid.as_ref()
    }

    pub fn set_class_guid(&mut self, guid: Option<UnityGuid>) {
        self.class_guid = guid;
    }

    /// Field layout, absent when the type tree is not embedded
    pub fn type_tree(&self) -> Option<&FieldTree> {
        self.type_tree.as_ref()
    }

    pub fn set_type_tree(&mut self, tree: Option<FieldTree>) {
        self.type_tree = tree;
    }
}

/// Field layouts of every class stored in an asset file
///
/// Classes keep their file order. A class id may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeTree {
    pub(crate) asset_version: i32,
    #[cfg_attr(feature = "serde", serde(skip, default = "default_endian"))]
    pub(crate) endian: Endian,
    pub(crate) revision: Option<UnityRevision>,
    pub(crate) attributes: i32,
    pub(crate) embedded: bool,
    pub(crate) classes: Vec<TypeClass>,
}

#[cfg(feature = "serde")]
fn default_endian() -> Endian {
    Endian::Little
}

impl TypeTree {
    /// An empty type tree for the asset described by `info`
    pub fn new(info: &VersionInfo) -> Self {
        Self {
            asset_version: info.asset_version,
            endian: info.endian,
            revision: info.revision.clone(),
            attributes: 0,
            embedded: false,
            classes: Vec::new(),
        }
    }

    pub fn asset_version(&self) -> i32 {
        self.asset_version
    }

    pub fn format(&self) -> TreeFormat {
        TreeFormat::for_version(self.asset_version)
    }

    /// Engine revision, as read from the file or taken from the version info
    pub fn revision(&self) -> Option<&UnityRevision> {
        self.revision.as_ref()
    }

    pub fn set_revision(&mut self, revision: Option<UnityRevision>) {
        self.revision = revision;
    }

    /// Version info updated with the revision found while reading
    pub fn version_info(&self) -> VersionInfo {
        VersionInfo {
            asset_version: self.asset_version,
            revision: self.revision.clone(),
            endian: self.endian,
        }
    }

    /// Raw attribute flags
    pub fn attributes(&self) -> i32 {
        self.attributes
    }

    pub fn set_attributes(&mut self, attributes: i32) {
        self.attributes = attributes;
    }

    /// Whether the classes carry their field trees
    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn set_embedded(&mut self, embedded: bool) {
        self.embedded = embedded;
    }

    pub fn classes(&self) -> &[TypeClass] {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut Vec<TypeClass> {
        &mut self.classes
    }

    pub fn push_class(&mut self, class: TypeClass) {
        self.classes.push(class);
    }

    /// First class with the given id
    pub fn class_by_id(&self, class_id: i32) -> Option<&TypeClass> {
        self.classes.iter().find(|c| c.class_id == class_id)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
