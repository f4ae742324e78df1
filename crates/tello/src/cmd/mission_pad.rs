use serde::Serialize;
use tello::client::{CommandChannel, Drone};

use crate::cmd::{Context, MissionPadArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_report;

#[derive(Serialize)]
struct MissionPadOutput {
    schema_id: &'static str,
    drone: String,
    mission_pad_id: u32,
}

pub fn run(_args: MissionPadArgs, ctx: &Context) -> CliResult<i32> {
    let channel =
        CommandChannel::new(ctx.client.clone()).with_cancellation(ctx.interrupt.clone());
    let mut drone = Drone::from_channel(channel);

    drone.start().map_err(|err| client_error("handshake failed", err))?;
    let id = drone
        .mission_pad_id()
        .map_err(|err| client_error("mission pad query failed", err))?;

    let out = MissionPadOutput {
        schema_id: "https://schemas.3leaps.dev/tello/cli/v1/mission-pad.schema.json",
        drone: ctx.client.transport.drone_addr.to_string(),
        mission_pad_id: id,
    };
    print_report(
        &out,
        &[("drone", out.drone.clone()), ("mission pad", id.to_string())],
        &id.to_string(),
        ctx.format,
    );
    Ok(SUCCESS)
}
