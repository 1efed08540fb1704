use std::convert::TryFrom;
use std::sync::{Mutex, MutexGuard};

use log::{debug, info, trace, warn, log_enabled, Level};

use rand::rngs::StdRng;
use rand::SeedableRng;

use tonic::{Request, Response, Status};

use crate::frame::{self, HeartRateFrame, RespiratoryFrame};
use crate::metric::{self, MetricsBuffer, Mode};
use crate::rpc::{BlueTooth, Physiology};

/// Where GetMetrics draws its random values from.
pub enum RandomSource {
	/// The calling thread's entropy-seeded generator
	Entropy,
	Seeded{
		seed: u64,
		reseed_per_call: bool,
		rng: Mutex<StdRng>,
	},
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<T> {
	// nothing in here can leave the value half-updated
	match m.lock() {
		Ok(g) => g,
		Err(poisoned) => poisoned.into_inner(),
	}
}

impl RandomSource {
	fn extend(&self, buffer: &mut MetricsBuffer, length_seconds: i64, mode: Mode) -> Result<(), metric::GenerateError> {
		match self {
			Self::Entropy => metric::extend(buffer, length_seconds, mode, &mut rand::thread_rng()),
			Self::Seeded{seed, reseed_per_call, rng} => {
				let mut rng = lock(rng);
				if *reseed_per_call {
					*rng = StdRng::seed_from_u64(*seed);
				}
				metric::extend(buffer, length_seconds, mode, &mut *rng)
			},
		}
	}
}

/// Placeholder implementation of the physiology service.
///
/// Metrics are generated into a fresh buffer on every call; nothing sent by
/// clients influences them.
pub struct PhysiologyService {
	mode: Mode,
	metrics_length: i64,
	random: RandomSource,
	buffer_duration: Mutex<Option<f64>>,
}

impl PhysiologyService {
	pub fn new(mode: Mode, metrics_length: i64, random: RandomSource) -> Self {
		Self{
			mode,
			metrics_length,
			random,
			buffer_duration: Mutex::new(None),
		}
	}

	/// Last value received through SetBufferDuration, if any.
	pub fn buffer_duration(&self) -> Option<f64> {
		*lock(&self.buffer_duration)
	}

	pub fn generate(&self) -> Result<MetricsBuffer, metric::GenerateError> {
		let mut buffer = MetricsBuffer::default();
		self.random.extend(&mut buffer, self.metrics_length, self.mode)?;
		Ok(buffer)
	}

	fn log_frames(batch: &frame::PreprocessedDataBuffer) {
		for raw in batch.hr_data.iter() {
			match HeartRateFrame::try_from(raw) {
				Ok(frame) => debug!("got preprocessed hr data:\n{}", frame),
				Err(e) => warn!("undecodable preprocessed hr data: {}", e),
			}
		}
		for raw in batch.rr_data.iter() {
			debug!("got preprocessed rr data:\n{}", RespiratoryFrame::from(raw));
		}
	}
}

#[tonic::async_trait]
impl Physiology for PhysiologyService {
	async fn add_preprocessed_data(
			&self,
			request: Request<frame::PreprocessedDataBuffer>,
	) -> Result<Response<()>, Status> {
		let batch = request.into_inner();
		trace!("received {} hr and {} rr frames", batch.hr_data.len(), batch.rr_data.len());
		if batch.is_empty() {
			warn!("received an empty preprocessed data buffer");
		} else if log_enabled!(Level::Debug) {
			Self::log_frames(&batch);
		}
		Ok(Response::new(()))
	}

	async fn get_metrics(
			&self,
			_request: Request<()>,
	) -> Result<Response<MetricsBuffer>, Status> {
		let buffer = self.generate().map_err(|e| Status::invalid_argument(e.to_string()))?;
		debug!("handing out {}s of {:?} metrics", self.metrics_length, self.mode);
		Ok(Response::new(buffer))
	}

	async fn issue_blue_tooth(
			&self,
			request: Request<BlueTooth>,
	) -> Result<Response<()>, Status> {
		debug!("bluetooth command (enable={}) acknowledged", request.get_ref().enable);
		Ok(Response::new(()))
	}

	async fn set_buffer_duration(
			&self,
			request: Request<f64>,
	) -> Result<Response<()>, Status> {
		let duration = request.into_inner();
		if !(duration > 0.0) {
			warn!("buffer duration {} is not a positive number of seconds", duration);
		}
		info!("set buffer duration to {}s", duration);
		*lock(&self.buffer_duration) = Some(duration);
		Ok(Response::new(()))
	}

	async fn reset_processing(
			&self,
			_request: Request<()>,
	) -> Result<Response<()>, Status> {
		info!("reset requested; metrics buffers are per call, so there is nothing to clear");
		Ok(Response::new(()))
	}
}
