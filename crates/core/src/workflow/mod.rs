//! The status-transition engine: fixed legality tables for each entity kind
//! and the pure aggregation that derives approval/document targets from a
//! step set. Everything here is side-effect free; applying the results is
//! the service layer's job.

pub mod aggregate;
pub mod transitions;
