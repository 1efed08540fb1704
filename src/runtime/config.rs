use std::error::Error;
use std::fmt;
use std::net;
use std::path::Path;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;

use serde_derive::Deserialize;

use crate::metric::{Mode, MAX_TIME};

use super::service::{PhysiologyService, RandomSource};

#[derive(Debug)]
pub enum BuildError {
	MetricsLengthOutOfRange{length: i64},
	ReseedWithoutSeed,
	Other(Box<dyn Error>),
}

impl fmt::Display for BuildError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::MetricsLengthOutOfRange{length} => {
				write!(f, "metrics_length must be within 0..={}, got {}", MAX_TIME, length)
			},
			Self::ReseedWithoutSeed => {
				f.write_str("reseed_per_call requires a seed")
			},
			Self::Other(e) => write!(f, "{}", e),
		}
	}
}

impl Error for BuildError {
}

fn default_listen_address() -> net::SocketAddr {
	net::SocketAddr::new(net::Ipv6Addr::UNSPECIFIED.into(), 50051)
}

fn default_metrics_length() -> i64 {
	4
}

fn bool_false() -> bool {
	false
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default = "default_listen_address")]
	pub listen_address: net::SocketAddr,
	#[serde(default)]
	pub mode: Mode,
	/// Seconds of samples generated for each GetMetrics call
	#[serde(default = "default_metrics_length")]
	pub metrics_length: i64,
	#[serde(default)]
	pub seed: Option<u64>,
	/// Restart the seeded random source on every GetMetrics call, so that
	/// every call returns the same values.
	#[serde(default = "bool_false")]
	pub reseed_per_call: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self{
			listen_address: default_listen_address(),
			mode: Mode::default(),
			metrics_length: default_metrics_length(),
			seed: None,
			reseed_per_call: false,
		}
	}
}

impl Config {
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BuildError> {
		let config_s = match std::fs::read_to_string(path) {
			Ok(s) => s,
			Err(e) => return Err(BuildError::Other(Box::new(e))),
		};
		toml::from_str(&config_s).map_err(|e| BuildError::Other(Box::new(e)))
	}

	pub fn check(&self) -> Option<BuildError> {
		if self.metrics_length < 0 || self.metrics_length > MAX_TIME {
			return Some(BuildError::MetricsLengthOutOfRange{
				length: self.metrics_length,
			})
		}
		if self.reseed_per_call && self.seed.is_none() {
			return Some(BuildError::ReseedWithoutSeed)
		}
		None
	}

	pub fn build(&self) -> Result<PhysiologyService, BuildError> {
		match self.check() {
			Some(e) => return Err(e),
			None => (),
		}

		let random = match self.seed {
			Some(seed) => RandomSource::Seeded{
				seed,
				reseed_per_call: self.reseed_per_call,
				rng: Mutex::new(StdRng::seed_from_u64(seed)),
			},
			None => RandomSource::Entropy,
		};

		Ok(PhysiologyService::new(self.mode, self.metrics_length, random))
	}
}
