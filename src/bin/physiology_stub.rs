use std::path::PathBuf;

use env_logger;

use log::{info, error};

use structopt::StructOpt;

use physiology_stub::metric::Mode;
use physiology_stub::runtime;

#[derive(StructOpt, Debug)]
#[structopt(
	name = "physiology_stub",
	about = "Physiology core gRPC server producing placeholder metrics",
)]
struct Opt {
	/// TOML configuration file
	#[structopt(short, long, parse(from_os_str))]
	config: Option<PathBuf>,
	/// Port to serve on, overriding the configured listen address
	#[structopt(short, long)]
	port: Option<u16>,
	/// Seed for the random metrics; -1 disables seeding
	#[structopt(short, long, allow_hyphen_values = true)]
	seed: Option<i64>,
	/// Emit constant instead of random metrics
	#[structopt(long)]
	uniform: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let opt = Opt::from_args();

	let mut config = match opt.config.as_ref() {
		Some(path) => runtime::Config::from_file(path)?,
		None => runtime::Config::default(),
	};
	if let Some(port) = opt.port {
		config.listen_address.set_port(port);
	}
	match opt.seed {
		Some(seed) if seed >= 0 => config.seed = Some(seed as u64),
		Some(_) => {
			config.seed = None;
			config.reseed_per_call = false;
		},
		None => (),
	}
	if opt.uniform {
		config.mode = Mode::Constant;
	}

	match config.seed {
		Some(seed) => info!("random seed set to {}", seed),
		None => info!("random seed not set"),
	}
	let service = config.build()?;
	let listener = tokio::net::TcpListener::bind(config.listen_address).await?;

	runtime::serve(service, listener, async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			error!("failed to wait for ctrl-c: {}", e);
			// never resolve, so that the server keeps running
			std::future::pending::<()>().await;
		}
	}).await?;
	Ok(())
}
