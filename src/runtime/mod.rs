use std::error::Error;
use std::fmt;
use std::future::Future;

use log::info;

use tokio::net::TcpListener;

use tonic::transport::Server;
use tonic::transport::server::TcpIncoming;

mod config;
mod service;

pub use config::{Config, BuildError};
pub use service::{PhysiologyService, RandomSource};

use crate::rpc::PhysiologyServer;

#[derive(Debug)]
pub enum ServeError {
	Listen(Box<dyn Error + Send + Sync>),
	Transport(tonic::transport::Error),
}

impl fmt::Display for ServeError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Listen(e) => write!(f, "cannot accept connections: {}", e),
			Self::Transport(e) => write!(f, "transport error: {}", e),
		}
	}
}

impl Error for ServeError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Listen(e) => Some(e.as_ref()),
			Self::Transport(e) => Some(e),
		}
	}
}

impl From<tonic::transport::Error> for ServeError {
	fn from(other: tonic::transport::Error) -> Self {
		Self::Transport(other)
	}
}

/// Serve `service` on an already bound `listener` until `shutdown` resolves.
pub async fn serve<F: Future<Output = ()>>(
		service: PhysiologyService,
		listener: TcpListener,
		shutdown: F) -> Result<(), ServeError>
{
	match listener.local_addr() {
		Ok(addr) => info!("physiology stub listening on {}", addr),
		Err(e) => return Err(ServeError::Listen(Box::new(e))),
	}
	let incoming = TcpIncoming::from_listener(listener, true, None).map_err(ServeError::Listen)?;
	Server::builder()
		.add_service(PhysiologyServer::new(service))
		.serve_with_incoming_shutdown(incoming, shutdown)
		.await?;
	info!("physiology stub stopped");
	Ok(())
}
