use crate::error::Result;
use crate::server::{self, backend, mock};

pub fn api(port: u16, upstream: Option<String>) -> Result<()> {
    let upstream_url = crate::settings::upstream_url(upstream.as_deref());
    tracing::info!(%upstream_url, port, "starting balance sheet API");
    let upstream = backend::Upstream::new(upstream_url)?;
    server::run(backend::router(upstream), port, "balance sheet API")
}

pub fn mock_upstream(port: u16) -> Result<()> {
    tracing::info!(port, "starting mock accounting API");
    server::run(mock::router(), port, "mock accounting API")
}
