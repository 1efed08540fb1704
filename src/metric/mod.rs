//! # Metrics buffer messages
//!
//! A metrics buffer is a set of six parallel time series, grouped by the
//! physiological signal they describe. Every series is an append-only list of
//! measurements which carry a time in whole seconds relative to the start of
//! the buffer (not wall-clock time).
//!
//! The structs in here are the wire messages themselves; their tags match
//! `proto/physiology.proto`.
use std::fmt;

mod generator;

pub use generator::{extend, Channel, GenerateError, Mode, Series, CHANNELS, MAX_TIME};
pub use generator::{
	PULSE_RATE,
	PULSE_TRACE,
	BREATH_RATE,
	BREATH_UPPER_TRACE,
	BREATH_LOWER_TRACE,
	PRESSURE_PHASIC,
};

#[derive(Clone, PartialEq, prost::Message)]
pub struct Measurement {
	/// Seconds since the start of the buffer
	#[prost(float, tag = "1")]
	pub time: f32,
	#[prost(float, tag = "2")]
	pub value: f32,
	#[prost(bool, tag = "3")]
	pub stable: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MeasurementWithConfidence {
	/// Seconds since the start of the buffer
	#[prost(float, tag = "1")]
	pub time: f32,
	#[prost(float, tag = "2")]
	pub value: f32,
	#[prost(bool, tag = "3")]
	pub stable: bool,
	/// Estimated reliability of the value, in [0, 1]
	#[prost(float, tag = "4")]
	pub confidence: f32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Pulse {
	#[prost(message, repeated, tag = "1")]
	pub rate: Vec<MeasurementWithConfidence>,
	#[prost(message, repeated, tag = "2")]
	pub trace: Vec<Measurement>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Breathing {
	#[prost(message, repeated, tag = "1")]
	pub rate: Vec<MeasurementWithConfidence>,
	#[prost(message, repeated, tag = "2")]
	pub upper_trace: Vec<Measurement>,
	#[prost(message, repeated, tag = "3")]
	pub lower_trace: Vec<Measurement>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BloodPressure {
	#[prost(message, repeated, tag = "1")]
	pub phasic: Vec<MeasurementWithConfidence>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MetricsBuffer {
	#[prost(message, optional, tag = "1")]
	pub pulse: Option<Pulse>,
	#[prost(message, optional, tag = "2")]
	pub breath: Option<Breathing>,
	#[prost(message, optional, tag = "3")]
	pub pressure: Option<BloodPressure>,
}

impl MetricsBuffer {
	pub fn pulse_mut(&mut self) -> &mut Pulse {
		self.pulse.get_or_insert_with(Pulse::default)
	}

	pub fn breath_mut(&mut self) -> &mut Breathing {
		self.breath.get_or_insert_with(Breathing::default)
	}

	pub fn pressure_mut(&mut self) -> &mut BloodPressure {
		self.pressure.get_or_insert_with(BloodPressure::default)
	}

	/// Time of the most recent pulse rate sample.
	///
	/// The pulse rate series is the reference for the whole buffer, since all
	/// series are extended in lock-step.
	pub fn last_time(&self) -> Option<f32> {
		self.pulse.as_ref().and_then(|p| p.rate.last()).map(|m| m.time)
	}

	/// Number of samples in one series.
	pub fn len(&self, channel: &Channel) -> usize {
		let len = match channel.series {
			Series::PulseRate => self.pulse.as_ref().map(|p| p.rate.len()),
			Series::PulseTrace => self.pulse.as_ref().map(|p| p.trace.len()),
			Series::BreathRate => self.breath.as_ref().map(|b| b.rate.len()),
			Series::BreathUpperTrace => self.breath.as_ref().map(|b| b.upper_trace.len()),
			Series::BreathLowerTrace => self.breath.as_ref().map(|b| b.lower_trace.len()),
			Series::PressurePhasic => self.pressure.as_ref().map(|p| p.phasic.len()),
		};
		len.unwrap_or(0)
	}

	/// Number of samples in each series, in [`CHANNELS`] order.
	pub fn series_lengths(&self) -> [usize; CHANNELS.len()] {
		CHANNELS.map(|channel| self.len(&channel))
	}

	/// Values of one series.
	pub fn values(&self, channel: &Channel) -> Vec<f32> {
		fn plain(v: &[Measurement]) -> Vec<f32> {
			v.iter().map(|m| m.value).collect()
		}
		fn confident(v: &[MeasurementWithConfidence]) -> Vec<f32> {
			v.iter().map(|m| m.value).collect()
		}

		let values = match channel.series {
			Series::PulseRate => self.pulse.as_ref().map(|p| confident(&p.rate)),
			Series::PulseTrace => self.pulse.as_ref().map(|p| plain(&p.trace)),
			Series::BreathRate => self.breath.as_ref().map(|b| confident(&b.rate)),
			Series::BreathUpperTrace => self.breath.as_ref().map(|b| plain(&b.upper_trace)),
			Series::BreathLowerTrace => self.breath.as_ref().map(|b| plain(&b.lower_trace)),
			Series::PressurePhasic => self.pressure.as_ref().map(|p| confident(&p.phasic)),
		};
		values.unwrap_or_default()
	}
}

impl fmt::Display for MetricsBuffer {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		for channel in CHANNELS.iter() {
			let values = self.values(channel);
			write!(f, "{:>18}: {} samples", channel.name, values.len())?;
			if let (Some(lo), Some(hi)) = (
				values.iter().cloned().reduce(f32::min),
				values.iter().cloned().reduce(f32::max),
			) {
				write!(f, ", {:.3} ..= {:.3} {}", lo, hi, channel.unit)?;
			}
			writeln!(f)?;
		}
		Ok(())
	}
}
