/// Opaque node identifier, unique within a graph.
pub type NodeId = usize;

/// Edge weights and path costs, in kilometers.
pub type Weight = f64;
