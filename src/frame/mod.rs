//! # Preprocessed sensor frames
//!
//! Clients upload the output of their on-device preprocessing in batches. A
//! batch holds any number of heart-rate frames (face landmarks and per-region
//! colour averages) and respiratory frames (tracked points with labels).
//!
//! The stub server never feeds these into the metrics generator; they are
//! only decoded into flat arrays for inspection (see [`decode`]).
mod decode;

pub use decode::{DecodeError, HeartRateFrame, RespiratoryFrame};

#[derive(Clone, PartialEq, prost::Message)]
pub struct Point2dInt32 {
	#[prost(int32, tag = "1")]
	pub x: i32,
	#[prost(int32, tag = "2")]
	pub y: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Point2dFloat {
	#[prost(float, tag = "1")]
	pub x: f32,
	#[prost(float, tag = "2")]
	pub y: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Point3dFloat {
	#[prost(float, tag = "1")]
	pub x: f32,
	#[prost(float, tag = "2")]
	pub y: f32,
	#[prost(float, tag = "3")]
	pub z: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HrPreprocessedFrameData {
	/// Pixel coordinates of the detected face landmarks
	#[prost(message, repeated, tag = "1")]
	pub face_landmark: Vec<Point2dInt32>,
	/// Mean blue/green/red per region; the first entry covers the whole face
	#[prost(message, repeated, tag = "2")]
	pub roi_bgr_average: Vec<Point3dFloat>,
	#[prost(double, tag = "3")]
	pub time_now: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RrPreprocessedFrameData {
	#[prost(message, repeated, tag = "1")]
	pub tracked_point: Vec<Point2dFloat>,
	#[prost(int32, repeated, tag = "2")]
	pub tracked_point_label: Vec<i32>,
	/// Set when the client restarted point tracking
	#[prost(bool, tag = "3")]
	pub reset: bool,
	#[prost(double, tag = "4")]
	pub time_now: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PreprocessedDataBuffer {
	#[prost(message, repeated, tag = "1")]
	pub hr_data: Vec<HrPreprocessedFrameData>,
	#[prost(message, repeated, tag = "2")]
	pub rr_data: Vec<RrPreprocessedFrameData>,
}

impl PreprocessedDataBuffer {
	pub fn is_empty(&self) -> bool {
		self.hr_data.is_empty() && self.rr_data.is_empty()
	}
}
