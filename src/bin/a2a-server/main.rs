//! Demo A2A server hosting the bundled agents

mod agents;

use std::net::IpAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use a2a_runtime::{
    agent::AgentRegistry,
    config::{parse_base_url, ServerConfig},
    server::A2AServer,
};

#[derive(Parser, Debug)]
#[command(name = "a2a-server", version)]
#[command(about = "Serve A2A agents over JSON-RPC")]
struct Cli {
    /// Port to listen on (overrides PORT / A2A_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind (overrides A2A_BIND)
    #[arg(long)]
    bind: Option<IpAddr>,

    /// Public base URL used in agent cards (overrides A2A_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Reject calls that do not address an agent explicitly
    #[arg(long)]
    no_fallback: bool,

    /// Emit logs as JSON
    #[arg(long, env = "A2A_LOG_JSON")]
    log_json: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = ServerConfig::from_env().context("invalid environment configuration")?;

        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(bind) = self.bind {
            config = config.with_bind_address(bind);
        }
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(parse_base_url(base_url)?);
        }
        if self.no_fallback {
            config = config.with_fallback_to_first_agent(false);
        }

        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = cli.config()?;

    let echo = agents::echo();
    let hosted = vec![echo.id.clone(), "agent://about".to_string()];

    let mut registry = AgentRegistry::new();
    registry.register(echo)?;
    registry.register(agents::about(hosted))?;

    let server = A2AServer::new(config, registry)?;
    info!(address = %server.config().socket_addr(), "Starting a2a-server");

    server.serve().await?;
    Ok(())
}
