use std::fmt;
use std::error::Error;

use log::trace;

use rand::Rng;

use serde_derive::Deserialize;

use super::{Measurement, MeasurementWithConfidence, MetricsBuffer};

/// How placeholder values are produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
	/// Uniformly distributed within the channel range
	Random,
	/// The canonical value of the channel, with full confidence
	Constant,
}

impl Default for Mode {
	fn default() -> Self {
		Self::Random
	}
}

/// Exclusive upper bound on sample timestamps; `time` is an `f32` on the wire
/// and whole seconds beyond this are no longer distinct.
pub const MAX_TIME: i64 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
	InvalidArgument{length_seconds: i64},
	/// The samples would run past [`MAX_TIME`]
	TimeOutOfRange{start: i64, length_seconds: i64},
}

impl fmt::Display for GenerateError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidArgument{length_seconds} => {
				write!(f, "cannot generate a negative duration of {} seconds", length_seconds)
			},
			Self::TimeOutOfRange{start, length_seconds} => {
				write!(f, "cannot generate {} seconds from t={}: timestamps beyond {} are not representable", length_seconds, start, MAX_TIME)
			},
		}
	}
}

impl Error for GenerateError {
}

/// The series of a metrics buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
	PulseRate,
	PulseTrace,
	BreathRate,
	BreathUpperTrace,
	BreathLowerTrace,
	PressurePhasic,
}

/// Description of one named series within a metrics buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
	pub series: Series,
	pub name: &'static str,
	pub unit: &'static str,
	pub min: f64,
	pub max: f64,
	/// Value emitted in [`Mode::Constant`]
	pub constant: f32,
	pub with_confidence: bool,
}

pub const PULSE_RATE: Channel = Channel{
	series: Series::PulseRate,
	name: "pulse.rate",
	unit: "bpm",
	min: 38.0,
	max: 105.0,
	constant: 38.0,
	with_confidence: true,
};

pub const PULSE_TRACE: Channel = Channel{
	series: Series::PulseTrace,
	name: "pulse.trace",
	unit: "",
	min: 0.0,
	max: 1.0,
	constant: 0.5,
	with_confidence: false,
};

pub const BREATH_RATE: Channel = Channel{
	series: Series::BreathRate,
	name: "breath.rate",
	unit: "bpm",
	min: 6.0,
	max: 12.0,
	constant: 12.0,
	with_confidence: true,
};

pub const BREATH_UPPER_TRACE: Channel = Channel{
	series: Series::BreathUpperTrace,
	name: "breath.upper_trace",
	unit: "",
	min: 0.0,
	max: 1.0,
	constant: 0.5,
	with_confidence: false,
};

pub const BREATH_LOWER_TRACE: Channel = Channel{
	series: Series::BreathLowerTrace,
	name: "breath.lower_trace",
	unit: "",
	min: 0.0,
	max: 1.0,
	constant: 0.5,
	with_confidence: false,
};

pub const PRESSURE_PHASIC: Channel = Channel{
	series: Series::PressurePhasic,
	name: "pressure.phasic",
	unit: "mmHg",
	min: 70.0,
	max: 105.0,
	constant: 70.0,
	with_confidence: true,
};

/// All channels of a metrics buffer, in the order in which they are sampled.
pub const CHANNELS: [Channel; 6] = [
	PULSE_RATE,
	PULSE_TRACE,
	BREATH_RATE,
	BREATH_UPPER_TRACE,
	BREATH_LOWER_TRACE,
	PRESSURE_PHASIC,
];

struct Reading {
	value: f32,
	confidence: Option<f32>,
}

impl Reading {
	fn at(self, time: f32) -> Measurement {
		Measurement{
			time,
			value: self.value,
			stable: true,
		}
	}

	fn with_confidence_at(self, time: f32) -> MeasurementWithConfidence {
		MeasurementWithConfidence{
			time,
			value: self.value,
			stable: true,
			confidence: self.confidence.unwrap_or(1.0),
		}
	}
}

impl Channel {
	fn draw<R: Rng + ?Sized>(&self, mode: Mode, rng: &mut R) -> Reading {
		match mode {
			Mode::Random => {
				let value = (rng.gen::<f64>() * (self.max - self.min) + self.min) as f32;
				// drawn after the value, so that the entropy consumption order
				// is value, confidence for each channel
				let confidence = match self.with_confidence {
					true => Some(rng.gen::<f32>()),
					false => None,
				};
				Reading{value, confidence}
			},
			Mode::Constant => Reading{
				value: self.constant,
				confidence: match self.with_confidence {
					true => Some(1.0),
					false => None,
				},
			},
		}
	}

	fn measurement<R: Rng + ?Sized>(&self, time: f32, mode: Mode, rng: &mut R) -> Measurement {
		debug_assert!(!self.with_confidence);
		self.draw(mode, rng).at(time)
	}

	fn measurement_with_confidence<R: Rng + ?Sized>(&self, time: f32, mode: Mode, rng: &mut R) -> MeasurementWithConfidence {
		debug_assert!(self.with_confidence);
		self.draw(mode, rng).with_confidence_at(time)
	}
}

/// Append `length_seconds` samples to every series of `buffer`.
///
/// The timestamps continue from the last pulse rate sample (or start at zero
/// for an empty buffer) and advance by exactly one second per sample. All six
/// series are extended in lock-step.
///
/// Negative durations, and durations which would run past [`MAX_TIME`], are
/// rejected before the buffer is touched; a zero duration leaves it unchanged. [`Mode::Constant`] does not consume any
/// entropy from `rng`.
pub fn extend<R: Rng + ?Sized>(
		buffer: &mut MetricsBuffer,
		length_seconds: i64,
		mode: Mode,
		rng: &mut R) -> Result<(), GenerateError>
{
	if length_seconds < 0 {
		return Err(GenerateError::InvalidArgument{length_seconds});
	}

	let start = match buffer.last_time() {
		Some(t) => (t as i64).saturating_add(1),
		None => 0,
	};
	let end = match start.checked_add(length_seconds) {
		Some(end) if end <= MAX_TIME => end,
		_ => return Err(GenerateError::TimeOutOfRange{start, length_seconds}),
	};

	for t in start..end {
		let time = t as f32;

		let pulse = buffer.pulse_mut();
		pulse.rate.push(PULSE_RATE.measurement_with_confidence(time, mode, rng));
		pulse.trace.push(PULSE_TRACE.measurement(time, mode, rng));

		let breath = buffer.breath_mut();
		breath.rate.push(BREATH_RATE.measurement_with_confidence(time, mode, rng));
		breath.upper_trace.push(BREATH_UPPER_TRACE.measurement(time, mode, rng));
		breath.lower_trace.push(BREATH_LOWER_TRACE.measurement(time, mode, rng));

		let pressure = buffer.pressure_mut();
		pressure.phasic.push(PRESSURE_PHASIC.measurement_with_confidence(time, mode, rng));
	}

	trace!("extended metrics buffer by {}s from t={} ({:?})", length_seconds, start, mode);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::SeedableRng;

	fn times(v: &[MeasurementWithConfidence]) -> Vec<f32> {
		v.iter().map(|m| m.time).collect()
	}

	fn all_times(buffer: &MetricsBuffer) -> Vec<Vec<f32>> {
		let pulse = buffer.pulse.as_ref().unwrap();
		let breath = buffer.breath.as_ref().unwrap();
		let pressure = buffer.pressure.as_ref().unwrap();
		let plain = |v: &[Measurement]| v.iter().map(|m| m.time).collect::<Vec<_>>();
		vec![
			times(&pulse.rate),
			plain(&pulse.trace[..]),
			times(&breath.rate),
			plain(&breath.upper_trace[..]),
			plain(&breath.lower_trace[..]),
			times(&pressure.phasic),
		]
	}

	#[test]
	fn test_constant_from_empty_buffer() {
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 4, Mode::Constant, &mut rand::thread_rng()).unwrap();

		let pulse = buffer.pulse.as_ref().unwrap();
		let expected_rate: Vec<_> = (0..4).map(|t| MeasurementWithConfidence{
			time: t as f32,
			value: 38.0,
			stable: true,
			confidence: 1.0,
		}).collect();
		let expected_trace: Vec<_> = (0..4).map(|t| Measurement{
			time: t as f32,
			value: 0.5,
			stable: true,
		}).collect();
		assert_eq!(pulse.rate, expected_rate);
		assert_eq!(pulse.trace, expected_trace);
	}

	#[test]
	fn test_constant_values_per_channel() {
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 3, Mode::Constant, &mut rand::thread_rng()).unwrap();

		for channel in CHANNELS.iter() {
			let values = buffer.values(channel);
			assert_eq!(values, vec![channel.constant; 3], "channel {}", channel.name);
		}
		let breath = buffer.breath.as_ref().unwrap();
		assert!(breath.rate.iter().all(|m| m.confidence == 1.0 && m.stable));
		let pressure = buffer.pressure.as_ref().unwrap();
		assert!(pressure.phasic.iter().all(|m| m.confidence == 1.0 && m.value == 70.0));
	}

	#[test]
	fn test_chunked_constant_equals_single_call() {
		let mut chunked = MetricsBuffer::default();
		extend(&mut chunked, 2, Mode::Constant, &mut rand::thread_rng()).unwrap();
		extend(&mut chunked, 2, Mode::Constant, &mut rand::thread_rng()).unwrap();

		let mut single = MetricsBuffer::default();
		extend(&mut single, 4, Mode::Constant, &mut rand::thread_rng()).unwrap();

		assert_eq!(chunked, single);
	}

	#[test]
	fn test_cadence_is_contiguous_across_calls() {
		let mut rng = StdRng::seed_from_u64(7);
		let mut buffer = MetricsBuffer::default();
		for chunk in [1i64, 3, 0, 2, 5].iter() {
			extend(&mut buffer, *chunk, Mode::Random, &mut rng).unwrap();
		}

		let expected: Vec<f32> = (0..11).map(|t| t as f32).collect();
		for series in all_times(&buffer) {
			assert_eq!(series, expected);
		}
	}

	#[test]
	fn test_series_stay_in_lock_step() {
		let mut rng = StdRng::seed_from_u64(1);
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 6, Mode::Random, &mut rng).unwrap();
		extend(&mut buffer, 1, Mode::Constant, &mut rng).unwrap();
		assert_eq!(buffer.series_lengths(), [7; 6]);
	}

	#[test]
	fn test_random_values_within_channel_bounds() {
		let mut rng = StdRng::seed_from_u64(0xdeadbeef);
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 500, Mode::Random, &mut rng).unwrap();

		for channel in CHANNELS.iter() {
			for v in buffer.values(channel) {
				assert!(v as f64 >= channel.min && v as f64 <= channel.max,
					"{} = {} outside [{}, {}]", channel.name, v, channel.min, channel.max);
			}
		}

		let pulse = buffer.pulse.as_ref().unwrap();
		let breath = buffer.breath.as_ref().unwrap();
		let pressure = buffer.pressure.as_ref().unwrap();
		for m in pulse.rate.iter().chain(breath.rate.iter()).chain(pressure.phasic.iter()) {
			assert!(m.confidence >= 0.0 && m.confidence <= 1.0);
			assert!(m.stable);
		}
		assert!(pulse.trace.iter().all(|m| m.stable));
	}

	#[test]
	fn test_random_is_reproducible_with_seed() {
		let mut a = MetricsBuffer::default();
		let mut b = MetricsBuffer::default();
		extend(&mut a, 4, Mode::Random, &mut StdRng::seed_from_u64(1234)).unwrap();
		extend(&mut b, 4, Mode::Random, &mut StdRng::seed_from_u64(1234)).unwrap();
		assert_eq!(a, b);

		let mut c = MetricsBuffer::default();
		extend(&mut c, 4, Mode::Random, &mut StdRng::seed_from_u64(1235)).unwrap();
		assert_ne!(a, c);
	}

	#[test]
	fn test_constant_consumes_no_entropy() {
		let mut rng = StdRng::seed_from_u64(99);
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 10, Mode::Constant, &mut rng).unwrap();

		let mut fresh = StdRng::seed_from_u64(99);
		assert_eq!(rng.gen::<u64>(), fresh.gen::<u64>());
	}

	#[test]
	fn test_zero_length_is_noop() {
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 0, Mode::Random, &mut rand::thread_rng()).unwrap();
		assert_eq!(buffer, MetricsBuffer::default());
	}

	#[test]
	fn test_negative_length_is_rejected_without_mutation() {
		let mut buffer = MetricsBuffer::default();
		extend(&mut buffer, 2, Mode::Constant, &mut rand::thread_rng()).unwrap();
		let before = buffer.clone();

		let err = extend(&mut buffer, -1, Mode::Constant, &mut rand::thread_rng()).unwrap_err();
		assert_eq!(err, GenerateError::InvalidArgument{length_seconds: -1});
		assert_eq!(buffer, before);
	}

	fn buffer_ending_at(time: f32) -> MetricsBuffer {
		let mut buffer = MetricsBuffer::default();
		buffer.pulse_mut().rate.push(MeasurementWithConfidence{
			time,
			value: 60.0,
			stable: true,
			confidence: 1.0,
		});
		buffer
	}

	#[test]
	fn test_last_representable_second_is_accepted() {
		let mut buffer = buffer_ending_at(16_777_214.0);
		extend(&mut buffer, 1, Mode::Constant, &mut rand::thread_rng()).unwrap();
		assert_eq!(buffer.last_time(), Some(16_777_215.0));
	}

	#[test]
	fn test_unrepresentable_timestamps_are_rejected() {
		let mut buffer = buffer_ending_at(16_777_215.0);
		let before = buffer.clone();

		let err = extend(&mut buffer, 3, Mode::Constant, &mut rand::thread_rng()).unwrap_err();
		assert_eq!(err, GenerateError::TimeOutOfRange{start: 16_777_216, length_seconds: 3});
		let err = extend(&mut buffer, 1, Mode::Random, &mut rand::thread_rng()).unwrap_err();
		assert_eq!(err, GenerateError::TimeOutOfRange{start: 16_777_216, length_seconds: 1});
		assert_eq!(buffer, before);
	}

	#[test]
	fn test_huge_length_is_rejected_without_overflow() {
		let mut buffer = buffer_ending_at(0.0);
		let before = buffer.clone();

		let err = extend(&mut buffer, i64::MAX, Mode::Constant, &mut rand::thread_rng()).unwrap_err();
		assert_eq!(err, GenerateError::TimeOutOfRange{start: 1, length_seconds: i64::MAX});
		assert_eq!(buffer, before);

		let mut empty = MetricsBuffer::default();
		assert!(extend(&mut empty, MAX_TIME + 1, Mode::Constant, &mut rand::thread_rng()).is_err());
		assert_eq!(empty, MetricsBuffer::default());
	}
}
