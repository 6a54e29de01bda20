//! Backend entry-point: wires authentication middleware, REST endpoints, and
//! OpenAPI docs.

mod server;

use std::sync::Arc;

use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use patronage::domain::ports::FixtureParticipantDirectory;
use patronage::domain::{Participant, ParticipantId};
use patronage::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use server::ServerConfig;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = session_settings_from_env(&DefaultEnv::default(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %key_fingerprint(&settings.key),
        "session signing key loaded"
    );

    // In-memory directory until a persistence adapter lands; mirrors the
    // fixture accounts used in tests.
    let directory = Arc::new(FixtureParticipantDirectory::new([
        Participant::new(ParticipantId::new(1), "alice").with_api_key("dev-only-key"),
        Participant::new(ParticipantId::new(2), "bob"),
    ]));

    let config = ServerConfig::new(settings, ([0, 0, 0, 0], 8080).into(), directory);
    info!(addr = %config.bind_addr(), "starting server");
    server::create_server(config)?.await
}
