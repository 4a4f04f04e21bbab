use crate::graph::edge::EdgeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathId(pub usize);

impl PathId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Pre-declared source-to-sink route. The edge sequence is validated as
/// contiguous when the graph is built.
#[derive(Clone, Debug)]
pub struct Path {
    id: PathId,
    name: String,
    edges: Vec<EdgeId>,
}

impl Path {
    pub fn new(id: PathId, name: impl Into<String>, edges: Vec<EdgeId>) -> Self {
        Self {
            id,
            name: name.into(),
            edges,
        }
    }

    pub fn id(&self) -> PathId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    /// 1-based position of `edge` along the path.
    pub fn position(&self, edge: EdgeId) -> Option<usize> {
        self.edges.iter().position(|e| *e == edge).map(|i| i + 1)
    }
}
