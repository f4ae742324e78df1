use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("tello {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: tello");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("git_hash: {}", env!("TELLO_GIT_HASH"));
    println!("target: {}", env!("TELLO_BUILD_TARGET"));
    println!("profile: {}", env!("TELLO_BUILD_PROFILE"));
    println!(
        "sdk ports: command {}, video {}",
        tello::transport::DEFAULT_DRONE_ADDR,
        tello::video::DEFAULT_VIDEO_ADDR
    );
    println!("log filter env: {}", crate::logging::LOG_ENV);

    Ok(SUCCESS)
}
