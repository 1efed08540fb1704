use std::convert::TryFrom;
use std::error::Error;
use std::fmt;

use super::{HrPreprocessedFrameData, RrPreprocessedFrameData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
	/// The frame carried no region averages, so not even the whole-face
	/// average is present.
	MissingFaceAverage,
}

impl fmt::Display for DecodeError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::MissingFaceAverage => f.write_str("heart rate frame has no face colour average"),
		}
	}
}

impl Error for DecodeError {
}

/// A heart-rate frame flattened into row arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartRateFrame {
	/// One `[x, y]` row per landmark
	pub face_landmarks: Vec<[i32; 2]>,
	/// One `[b, g, r]` row per region, without the whole-face entry
	pub roi_bgr_averages: Vec<[f32; 3]>,
	pub face_bgr_average: [f32; 3],
	pub time_now: f64,
}

impl TryFrom<&HrPreprocessedFrameData> for HeartRateFrame {
	type Error = DecodeError;

	fn try_from(other: &HrPreprocessedFrameData) -> Result<Self, Self::Error> {
		let (face, regions) = match other.roi_bgr_average.split_first() {
			Some(v) => v,
			None => return Err(DecodeError::MissingFaceAverage),
		};

		Ok(Self{
			face_landmarks: other.face_landmark.iter().map(|p| [p.x, p.y]).collect(),
			roi_bgr_averages: regions.iter().map(|p| [p.x, p.y, p.z]).collect(),
			face_bgr_average: [face.x, face.y, face.z],
			time_now: other.time_now,
		})
	}
}

/// A respiratory frame flattened into row arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct RespiratoryFrame {
	pub tracked_points: Vec<[f32; 2]>,
	pub tracked_point_labels: Vec<i32>,
	pub reset: bool,
	pub time_now: f64,
}

impl From<&RrPreprocessedFrameData> for RespiratoryFrame {
	fn from(other: &RrPreprocessedFrameData) -> Self {
		Self{
			tracked_points: other.tracked_point.iter().map(|p| [p.x, p.y]).collect(),
			tracked_point_labels: other.tracked_point_label.clone(),
			reset: other.reset,
			time_now: other.time_now,
		}
	}
}

fn write_rows<T: fmt::Debug>(f: &mut fmt::Formatter, name: &str, rows: &[T]) -> fmt::Result {
	writeln!(f, "{} ({} rows):", name, rows.len())?;
	for row in rows.iter() {
		writeln!(f, "  {:?}", row)?;
	}
	Ok(())
}

impl fmt::Display for HeartRateFrame {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write_rows(f, "face landmarks", &self.face_landmarks)?;
		write_rows(f, "roi bgr averages", &self.roi_bgr_averages)?;
		writeln!(f, "face bgr average: {:?}", self.face_bgr_average)?;
		write!(f, "time now: {}", self.time_now)
	}
}

impl fmt::Display for RespiratoryFrame {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write_rows(f, "tracked points", &self.tracked_points)?;
		writeln!(f, "tracked point labels: {:?}", self.tracked_point_labels)?;
		writeln!(f, "reset: {}", self.reset)?;
		write!(f, "time now: {}", self.time_now)
	}
}
