//! This library handles decoding and encoding the **TypeTree** stored in *Unity* asset files.
//!
//! # TypeTree Format Documentation
//!
//! Every serialized asset file carries a type tree describing the memory layout of each class
//! whose objects are stored in the file. Objects can only be interpreted once the type tree of
//! their class has been decoded. The layout of the type tree depends on the asset format
//! version found in the asset header; all integers use the byte order of the asset metadata.
//!
//! ## Header
//!
//! Asset format version 7 and later start the type tree with the engine revision.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Revision               | Null terminated string, at most 255 bytes (e.g. `5.0.0f4`) |
//! | variable       | Attributes             | 4 bytes: Flag word, stored as is                           |
//!
//! ## Legacy Layout (versions before 14)
//!
//! | Field                  | Description                                                     |
//! |------------------------|-----------------------------------------------------------------|
//! | Class Count            | 4 bytes: Number of classes                                      |
//! | Classes                | Class id (4 bytes) followed by its root field node              |
//! | Padding                | 4 bytes: Zero, only for version 7 and later                     |
//!
//! A field node is a field record followed by a 4 byte child count and that many child nodes.
//! A legacy field record has the following structure:
//!
//! | Field                  | Description                                             |
//! |------------------------|---------------------------------------------------------|
//! | Type Name              | Null terminated string                                  |
//! | Field Name             | Null terminated string                                  |
//! | Byte Size              | 4 bytes: Size of the field, `-1` if variable            |
//! | Index                  | 4 bytes: Index of the field                             |
//! | Is Array               | 4 bytes: `1` for arrays, else `0`                       |
//! | Version                | 4 bytes: Version of the field type                      |
//! | Flags                  | 4 bytes: Behaviour flags                                |
//!
//! ## Modern Layout (version 14 and later)
//!
//! | Field                  | Description                                                     |
//! |------------------------|-----------------------------------------------------------------|
//! | Embedded               | 1 byte: Whether field trees follow the classes                  |
//! | Class Count            | 4 bytes: Number of classes                                      |
//! | Classes                | See below                                                       |
//!
//! Each class consists of a 4 byte class id, a 16 byte script GUID only when the class id is
//! negative, a 16 byte class GUID and, when the tree is embedded, a flattened field tree:
//!
//! | Field                  | Description                                             |
//! |------------------------|---------------------------------------------------------|
//! | Field Count            | 4 bytes: Number of field records                        |
//! | String Table Size      | 4 bytes: Size of the local string table                 |
//! | Fields                 | Field Count records of 24 bytes, depth first            |
//! | String Table           | Null terminated names referenced by the fields          |
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Version                | 2 bytes: Version of the field type                      |
//! | 0x0002         | Tree Level             | 1 byte: Depth of the field, `0` for the class root      |
//! | 0x0003         | Is Array               | 1 byte: `1` for arrays, else `0`                        |
//! | 0x0004         | Type Offset            | 4 bytes: Offset of the type name                        |
//! | 0x0008         | Name Offset            | 4 bytes: Offset of the field name                       |
//! | 0x000C         | Byte Size              | 4 bytes: Size of the field, `-1` if variable            |
//! | 0x0010         | Index                  | 4 bytes: Index of the field                             |
//! | 0x0014         | Flags                  | 4 bytes: Behaviour flags                                |
//!
//! Name offsets with the high bit set refer to the engine's common string pool
//! ([`strings::COMMON_STRINGS`]) instead of the local string table.
//!
//! ## Additional Information
//!
//! - Only the legacy layout can be written, see [`TypeTree::write`].
//! - Flag words are not interpreted.
//!

pub mod error;
pub mod node;
pub mod read;
pub mod revision;
pub mod strings;
pub mod tree;
pub mod types;
pub mod write;

pub use binrw::Endian;
pub use node::{FieldTree, NodeId, NodeRef};
pub use revision::UnityRevision;
pub use tree::{TreeFormat, TypeClass, TypeTree, VersionInfo};
pub use types::{Type, UnityGuid};
