use serde::Serialize;
use tello::client::{CommandChannel, Drone};

use crate::cmd::{Context, StatusArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_report;

#[derive(Serialize)]
struct StatusOutput {
    schema_id: &'static str,
    drone: String,
    state: &'static str,
    battery_percent: u8,
    tof_mm: u32,
}

pub fn run(_args: StatusArgs, ctx: &Context) -> CliResult<i32> {
    let channel =
        CommandChannel::new(ctx.client.clone()).with_cancellation(ctx.interrupt.clone());
    let mut drone = Drone::from_channel(channel);

    drone.start().map_err(|err| client_error("handshake failed", err))?;
    let battery_percent = drone
        .battery()
        .map_err(|err| client_error("battery query failed", err))?;
    let tof_mm = drone
        .tof()
        .map_err(|err| client_error("distance query failed", err))?;

    let out = StatusOutput {
        schema_id: "https://schemas.3leaps.dev/tello/cli/v1/status.schema.json",
        drone: ctx.client.transport.drone_addr.to_string(),
        state: drone.state().as_str(),
        battery_percent,
        tof_mm,
    };
    print_report(
        &out,
        &[
            ("drone", out.drone.clone()),
            ("state", out.state.to_string()),
            ("battery", format!("{battery_percent}%")),
            ("tof", format!("{tof_mm}mm")),
        ],
        &format!("{battery_percent} {tof_mm}"),
        ctx.format,
    );
    Ok(SUCCESS)
}
