use crate::graph::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Directed link between two nodes. Capacity and flow live in
/// [`EdgeState`](crate::state::edge_state::EdgeState).
#[derive(Clone, Debug)]
pub struct Edge {
    id: EdgeId,
    name: String,
    from: NodeId,
    to: NodeId,
}

impl Edge {
    pub fn new(id: EdgeId, name: impl Into<String>, from: NodeId, to: NodeId) -> Self {
        Self {
            id,
            name: name.into(),
            from,
            to,
        }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn from(&self) -> NodeId {
        self.from
    }

    pub fn to(&self) -> NodeId {
        self.to
    }
}
