use std::collections::BTreeMap;

use thiserror::Error;

use crate::NodeId;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("source node {0} is already mapped")]
    SourceAlreadyMapped(NodeId),
    #[error("destination node {0} is already mapped")]
    DestinationAlreadyMapped(NodeId),
}

/// Partial bijection between the nodes of a source tree and a destination tree.
///
/// Iteration is ordered by source node id, which keeps everything derived from
/// a correspondence deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCorrespondence {
    src_to_dst: BTreeMap<NodeId, NodeId>,
    dst_to_src: BTreeMap<NodeId, NodeId>,
}

impl NodeCorrespondence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `src` corresponds to `dst`. Each node may take part in at most
    /// one pair.
    pub fn insert(&mut self, src: NodeId, dst: NodeId) -> Result<(), MappingError> {
        if self.src_to_dst.contains_key(&src) {
            return Err(MappingError::SourceAlreadyMapped(src));
        }
        if self.dst_to_src.contains_key(&dst) {
            return Err(MappingError::DestinationAlreadyMapped(dst));
        }
        self.src_to_dst.insert(src, dst);
        self.dst_to_src.insert(dst, src);
        Ok(())
    }

    /// The destination counterpart of a source node.
    #[inline]
    pub fn dst(&self, src: NodeId) -> Option<NodeId> {
        self.src_to_dst.get(&src).copied()
    }

    /// The source counterpart of a destination node.
    #[inline]
    pub fn src(&self, dst: NodeId) -> Option<NodeId> {
        self.dst_to_src.get(&dst).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.src_to_dst.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.src_to_dst.is_empty()
    }

    /// `(source, destination)` pairs ordered by source id.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.src_to_dst.iter().map(|(&src, &dst)| (src, dst))
    }
}

impl TryFrom<Vec<(NodeId, NodeId)>> for NodeCorrespondence {
    type Error = MappingError;

    fn try_from(pairs: Vec<(NodeId, NodeId)>) -> Result<Self, Self::Error> {
        let mut mappings = NodeCorrespondence::new();
        for (src, dst) in pairs {
            mappings.insert(src, dst)?;
        }
        Ok(mappings)
    }
}
