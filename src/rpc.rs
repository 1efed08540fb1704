//! gRPC glue for the `physiology.Physiology` service.
//!
//! The client and server modules are generated by `build.rs`; the message
//! types they refer to live in [`crate::metric`] and [`crate::frame`].
include!(concat!(env!("OUT_DIR"), "/physiology.Physiology.rs"));

/// `google.protobuf.Empty`
pub type Empty = ();

pub use physiology_client::PhysiologyClient;
pub use physiology_server::{Physiology, PhysiologyServer};

/// Bluetooth pairing command. The stub only acknowledges it.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BlueTooth {
	#[prost(bool, tag = "1")]
	pub enable: bool,
}
