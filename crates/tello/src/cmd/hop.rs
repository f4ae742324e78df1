use serde::Serialize;
use tello::client::{CommandChannel, Drone};
use tracing::info;

use crate::cmd::{Context, HopArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_report;

#[derive(Serialize)]
struct HopOutput {
    schema_id: &'static str,
    drone: String,
    state: &'static str,
    landed: bool,
}

/// Take off and land. Ctrl-C during either wait sends `emergency`.
pub fn run(_args: HopArgs, ctx: &Context) -> CliResult<i32> {
    let channel =
        CommandChannel::new(ctx.client.clone()).with_cancellation(ctx.interrupt.clone());
    let mut drone = Drone::from_channel(channel);

    drone.start().map_err(|err| client_error("handshake failed", err))?;
    drone.takeoff().map_err(|err| client_error("takeoff failed", err))?;
    info!("airborne, landing");
    drone.land().map_err(|err| client_error("land failed", err))?;

    let out = HopOutput {
        schema_id: "https://schemas.3leaps.dev/tello/cli/v1/hop.schema.json",
        drone: ctx.client.transport.drone_addr.to_string(),
        state: drone.state().as_str(),
        landed: true,
    };
    print_report(
        &out,
        &[
            ("drone", out.drone.clone()),
            ("state", out.state.to_string()),
        ],
        out.state,
        ctx.format,
    );
    Ok(SUCCESS)
}
