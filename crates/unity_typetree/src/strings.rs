//! Offset addressed string pools used by modern type trees.
//!
//! Every modern field tree carries a local string table after its field records. Names that
//! are shared by most classes are not stored there; their offsets have the high bit set and
//! point into the engine's common string pool instead, see [`StringTable::common`].

use derive_more::derive::Deref;
use indexmap::IndexMap;

/// Base offset of the common string pool
pub const COMMON_STRING_BASE: u32 = 0x8000_0000;

/// The engine's built in string pool
#[rustfmt::skip]
pub const COMMON_STRINGS: &[u8] = b"AABB\0AnimationClip\0AnimationCurve\0AnimationState\0\
Array\0Base\0BitField\0bitset\0bool\0char\0ColorRGBA\0Component\0data\0deque\0double\0\
dynamic_array\0FastPropertyName\0first\0float\0Font\0GameObject\0Generic Mono\0\
GradientNEW\0GUID\0GUIStyle\0int\0list\0long long\0map\0Matrix4x4f\0MdFour\0\
MonoBehaviour\0MonoScript\0m_ByteSize\0m_Curve\0m_EditorClassIdentifier\0\
m_EditorHideFlags\0m_Enabled\0m_ExtensionPtr\0m_GameObject\0m_Index\0m_IsArray\0\
m_IsStatic\0m_MetaFlag\0m_Name\0m_ObjectHideFlags\0m_PrefabInternal\0\
m_PrefabParentObject\0m_Script\0m_StaticEditorFlags\0m_Type\0m_Version\0Object\0pair\0\
PPtr<Component>\0PPtr<GameObject>\0PPtr<Material>\0PPtr<MonoBehaviour>\0\
PPtr<MonoScript>\0PPtr<Object>\0PPtr<Prefab>\0PPtr<Sprite>\0PPtr<TextAsset>\0\
PPtr<Texture>\0PPtr<Texture2D>\0PPtr<Transform>\0Prefab\0Quaternionf\0Rectf\0RectInt\0\
RectOffset\0second\0set\0short\0size\0SInt16\0SInt32\0SInt64\0SInt8\0staticvector\0\
string\0TextAsset\0TextMesh\0Texture\0Texture2D\0Transform\0TypelessData\0UInt16\0\
UInt32\0UInt64\0UInt8\0unsigned int\0unsigned long long\0unsigned short\0vector\0\
Vector2f\0Vector3f\0Vector4f\0m_ScriptingClassIdentifier\0Gradient\0Type*\0";

/// A pool of null terminated strings addressed by byte offset
///
/// Only offsets at the start of a string resolve. Looking up an offset in the middle of a
/// string, or past the end of the buffer, returns `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct StringTable(IndexMap<u32, String>);

impl StringTable {
    /// Index every string in `data`, starting at offset 0
    pub fn load(data: &[u8]) -> Self {
        Self::load_at(data, 0)
    }

    /// Index every string in `data`, adding `base` to each offset
    ///
    /// A trailing run of bytes without a terminator is ignored.
    pub fn load_at(data: &[u8], base: u32) -> Self {
        let mut strings = IndexMap::new();
        let mut start = 0usize;
        for (pos, b) in data.iter().enumerate() {
            if *b != 0 {
                continue;
            }
            let offset = base.wrapping_add(start as u32);
            strings.insert(
                offset,
                String::from_utf8_lossy(&data[start..pos]).into_owned(),
            );
            start = pos + 1;
        }
        StringTable(strings)
    }

    /// The engine's common string pool, keyed with the high bit set
    pub fn common() -> Self {
        Self::load_at(COMMON_STRINGS, COMMON_STRING_BASE)
    }

    /// Try to resolve a string by its offset
    pub fn get(&self, offset: u32) -> Option<&str> {
        self.0.get(&offset).map(|s| s.as_str())
    }

    /// Whether a string starts at `offset`
    pub fn contains(&self, offset: u32) -> bool {
        self.0.contains_key(&offset)
    }
}
