//! Entity Bridge Adapters - Infrastructure implementations of the outbound ports

pub mod infrastructure;
