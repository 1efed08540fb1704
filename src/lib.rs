pub mod frame;
pub mod metric;
pub mod rpc;
pub mod runtime;
