use core::time::Duration;

use env_logger;

use log::debug;

use structopt::StructOpt;

use physiology_stub::frame;
use physiology_stub::rpc::{BlueTooth, PhysiologyClient};

#[derive(StructOpt, Debug)]
#[structopt(name = "physiology_probe", about = "Exercise every RPC of a physiology core server")]
struct Opt {
	#[structopt(short, long, default_value = "http://127.0.0.1:50051")]
	address: String,
	/// Number of upload/fetch rounds
	#[structopt(short, long, default_value = "1")]
	rounds: u32,
	#[structopt(long, default_value = "0.5")]
	buffer_duration: f64,
}

fn synthetic_batch(time_now: f64) -> frame::PreprocessedDataBuffer {
	frame::PreprocessedDataBuffer{
		hr_data: vec![frame::HrPreprocessedFrameData{
			face_landmark: (0..4).map(|i| frame::Point2dInt32{x: 100 + i * 10, y: 120 + i * 5}).collect(),
			roi_bgr_average: (0..3).map(|i| frame::Point3dFloat{
				x: 90.0 + i as f32,
				y: 110.0 + i as f32,
				z: 150.0 + i as f32,
			}).collect(),
			time_now,
		}],
		rr_data: vec![frame::RrPreprocessedFrameData{
			tracked_point: (0..3).map(|i| frame::Point2dFloat{x: 0.25 * i as f32, y: 0.5}).collect(),
			tracked_point_label: vec![0, 1, 2],
			reset: time_now == 0.0,
			time_now,
		}],
	}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();
	let opt = Opt::from_args();

	let mut client = PhysiologyClient::connect(opt.address.clone()).await?;
	debug!("connected to {}", opt.address);

	client.set_buffer_duration(opt.buffer_duration).await?;
	client.reset_processing(()).await?;
	client.issue_blue_tooth(BlueTooth{enable: true}).await?;

	for round in 0..opt.rounds {
		client.add_preprocessed_data(synthetic_batch(round as f64)).await?;
		let buffer = client.get_metrics(()).await?.into_inner();
		println!("round {}:", round);
		print!("{}", buffer);
		if round + 1 < opt.rounds {
			tokio::time::sleep(Duration::from_secs(1)).await;
		}
	}
	Ok(())
}
