//! Field trees of a single class.
//!
//! Nodes live in an arena owned by [`FieldTree`] and refer to each other by [`NodeId`]. The
//! parent link is only an index, children are owned by the tree.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::{Error, Result};
use crate::types::Type;

/// Index of a node inside its [`FieldTree`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// One field of a class, stored in a [`FieldTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeNode {
    ty: Type,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TypeNode {
    pub fn type_(&self) -> &Type {
        &self.ty
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The field layout of one class
///
/// ```
/// use unity_typetree::{node::FieldTree, types::Type};
///
/// let mut tree = FieldTree::new(Type::builder().type_name("GameObject").field_name("Base").build());
/// let name = tree.add_child(tree.root(), Type::builder().type_name("string").field_name("m_Name").build());
///
/// assert_eq!(tree.node(name).parent().map(|p| p.id()), Some(tree.root()));
/// assert_eq!(tree.node(tree.root()).children().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawFieldTree"))]
pub struct FieldTree {
    nodes: Vec<TypeNode>,
}

/// Node list as deserialized, before its links are checked
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawFieldTree {
    nodes: Vec<TypeNode>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawFieldTree> for FieldTree {
    type Error = Error;

    /// Accept only node lists that [`FieldTree::add_child`] could have built: the root comes
    /// first, every other node has exactly one earlier parent, and parent and child links agree.
    fn try_from(value: RawFieldTree) -> Result<Self> {
        let nodes = value.nodes;
        let invalid = |node: usize| Error::InvalidFieldTree { node };

        let root = nodes.first().ok_or(invalid(0))?;
        if root.parent.is_some() {
            return Err(invalid(0));
        }

        let mut linked = 0;
        for (index, node) in nodes.iter().enumerate() {
            if index > 0 {
                let parent = node.parent.ok_or(invalid(index))?;
                if parent.0 >= index || !nodes[parent.0].children.contains(&NodeId(index)) {
                    return Err(invalid(index));
                }
            }

            for child in &node.children {
                let linked_back = nodes
                    .get(child.0)
                    .is_some_and(|c| c.parent == Some(NodeId(index)));
                if !linked_back {
                    return Err(invalid(index));
                }
            }
            linked += node.children.len();
        }

        // every non-root node is listed once, so no id can repeat
        if linked != nodes.len() - 1 {
            return Err(invalid(0));
        }

        Ok(FieldTree { nodes })
    }
}

impl FieldTree {
    /// Create a tree holding only `root`
    pub fn new(root: Type) -> Self {
        FieldTree {
            nodes: vec![TypeNode {
                ty: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes in the tree, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least its root
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Append `ty` as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, ty: Type) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent node is not part of this tree");

        let id = NodeId(self.nodes.len());
        self.nodes.push(TypeNode {
            ty,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&TypeNode> {
        self.nodes.get(id.0)
    }

    /// Field metadata of a node, the links between nodes stay fixed
    pub fn type_mut(&mut self, id: NodeId) -> Option<&mut Type> {
        self.nodes.get_mut(id.0).map(|n| &mut n.ty)
    }

    /// Borrow a node for navigation
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node is not part of this tree");
        NodeRef { tree: self, id }
    }

    /// Number of ancestors of `id`
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Iterate over all nodes in pre-order, which is also the order they are stored in a file
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let mut stack = vec![NodeId::ROOT];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
            Some(NodeRef { tree: self, id })
        })
    }
}

impl fmt::Display for FieldTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(NodeId::ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            writeln!(f, "{}{}", "  ".repeat(depth), node.ty)?;
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
        Ok(())
    }
}

/// Borrowed view of a node that can walk to its relatives
#[derive(Debug, Copy, Clone)]
pub struct NodeRef<'a> {
    tree: &'a FieldTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn type_(&self) -> &'a Type {
        &self.tree.nodes[self.id.0].ty
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.nodes[self.id.0].parent.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.nodes[self.id.0]
            .children
            .iter()
            .map(move |id| NodeRef { tree, id: *id })
    }

    /// Find a direct child by field name
    pub fn child(&self, field_name: &str) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.type_().field_name == field_name)
    }

    pub fn depth(&self) -> usize {
        self.tree.depth(self.id)
    }
}
