use tonic_build::manual::{Builder, Method, Service};

fn unary(name: &str, route_name: &str, input_type: &str, output_type: &str) -> Method {
	Method::builder()
		.name(name)
		.route_name(route_name)
		.input_type(input_type)
		.output_type(output_type)
		.codec_path("tonic::codec::ProstCodec")
		.build()
}

fn main() {
	// message types are derived by hand in src/, so only the service glue is
	// generated here and protoc is not needed.
	let service = Service::builder()
		.name("Physiology")
		.package("physiology")
		.method(unary(
			"add_preprocessed_data",
			"AddPreprocessedData",
			"crate::frame::PreprocessedDataBuffer",
			"crate::rpc::Empty",
		))
		.method(unary(
			"get_metrics",
			"GetMetrics",
			"crate::rpc::Empty",
			"crate::metric::MetricsBuffer",
		))
		.method(unary(
			"issue_blue_tooth",
			"IssueBlueTooth",
			"crate::rpc::BlueTooth",
			"crate::rpc::Empty",
		))
		.method(unary(
			"set_buffer_duration",
			"SetBufferDuration",
			"f64",
			"crate::rpc::Empty",
		))
		.method(unary(
			"reset_processing",
			"ResetProcessing",
			"crate::rpc::Empty",
			"crate::rpc::Empty",
		))
		.build();

	Builder::new()
		.build_server(true)
		.build_client(true)
		.build_transport(true)
		.compile(&[service]);

	println!("cargo:rerun-if-changed=build.rs");
}
