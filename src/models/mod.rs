mod topology;

pub use topology::TopologyQuery;
