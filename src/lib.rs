//! Agora Core - analytical core for agent-based social simulation
//!
//! Two coupled subsystems: density clustering of co-located agents on a
//! wrap-around grid, and the emergence of shared institutional rules from
//! repeated normative proposals within those clusters.

pub mod coordination;
pub mod core;
pub mod rules;
pub mod spatial;
