//! Example gateway - serves two functions over CCIP-Read.
//!
//! This example demonstrates:
//! - Registering handlers from human-readable signatures
//! - Returning decoded values encoded by the router
//! - Hosting the router with configuration from the environment
//!
//! # Running
//!
//! ```sh
//! CCIP_PORT=3001 RUST_LOG=debug cargo run --example serve
//!
//! # foo() -> 42
//! curl http://localhost:3001/0x0000000000000000000000000000000000000000/0xc2985578.json
//!
//! # bar(40) -> 80
//! curl -X POST http://localhost:3001/ \
//!     -H 'content-type: application/json' \
//!     -d '{"sender":"0x0000000000000000000000000000000000000000","data":"0x0423a1320000000000000000000000000000000000000000000000000000000000000028"}'
//! ```

use ccip_read_router::abi::Value;
use ccip_read_router::gateway::GatewayConfig;
use ccip_read_router::{CcipRouter, ResponseProfile};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let profile = match std::env::var("CCIP_PROFILE") {
        Ok(value) => value.parse::<ResponseProfile>()?,
        Err(_) => ResponseProfile::default(),
    };

    let mut router = CcipRouter::with_profile(profile);
    router
        .add("function foo() pure returns (uint256)", |_args, _ctx| async {
            Ok(Value::uint(42u64).into())
        })?
        .add("function bar(uint256) pure returns (uint256)", |args, ctx| async move {
            let x = args[0].as_u128().ok_or("expected uint256")?;
            tracing::debug!("bar({}) called for {}", x, ctx.to);
            let doubled = x.checked_mul(2).ok_or("overflow")?;
            Ok(Value::uint(doubled).into())
        })?;

    router.serve(GatewayConfig::from_env()?).await?;
    Ok(())
}
