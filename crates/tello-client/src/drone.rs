use tello_protocol::{Command, Direction, FlipDirection, Query, Rotation};
use tracing::{info, warn};

use crate::channel::CommandChannel;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::state::{ConnectionState, MissionPadMode};

/// Typed flight operations over a [`CommandChannel`].
///
/// Arguments and connection state are checked before any datagram is sent;
/// an invalid call never reaches the drone.
#[derive(Debug)]
pub struct Drone {
    channel: CommandChannel,
    mission_pad: MissionPadMode,
}

impl Drone {
    /// Create a drone handle. Call [`start`](Self::start) before flying.
    pub fn new(config: ClientConfig) -> Self {
        Self::from_channel(CommandChannel::new(config))
    }

    pub fn from_channel(channel: CommandChannel) -> Self {
        Self {
            channel,
            mission_pad: MissionPadMode::Off,
        }
    }

    /// Enter SDK mode.
    pub fn start(&mut self) -> Result<()> {
        self.channel.start()
    }

    pub fn state(&self) -> ConnectionState {
        self.channel.state()
    }

    pub fn mission_pad_mode(&self) -> MissionPadMode {
        self.mission_pad
    }

    pub fn channel(&self) -> &CommandChannel {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut CommandChannel {
        &mut self.channel
    }

    pub fn into_channel(self) -> CommandChannel {
        self.channel
    }

    pub fn takeoff(&mut self) -> Result<()> {
        let command = Command::takeoff();
        self.channel.require(&command, ConnectionState::Ready)?;
        self.channel.request_ok(&command)?;
        self.channel.set_state(ConnectionState::Flying);
        Ok(())
    }

    /// Land. Tolerant of a missing or non-`ok` reply, which some firmware
    /// only sends once the motors stop; both are logged.
    pub fn land(&mut self) -> Result<()> {
        let command = Command::land();
        self.channel.require(&command, ConnectionState::Ready)?;

        match self.channel.send_and_wait(&command) {
            Ok(response) if response.is_ok() => {}
            Ok(response) => warn!(reply = %response.raw(), "land not acknowledged with ok"),
            Err(err) if err.is_timeout() => warn!(error = %err, "no reply to land"),
            Err(err) => return Err(err),
        }

        if self.channel.state() == ConnectionState::Flying {
            self.channel.set_state(ConnectionState::Ready);
        }
        Ok(())
    }

    /// Move `centimeters` (20-500) in `direction`.
    pub fn move_by(&mut self, direction: Direction, centimeters: i32) -> Result<()> {
        let command = Command::movement(direction, centimeters)?;
        self.channel.require(&command, ConnectionState::Flying)?;
        self.channel.request_ok(&command)
    }

    pub fn forward(&mut self, centimeters: i32) -> Result<()> {
        self.move_by(Direction::Forward, centimeters)
    }

    pub fn backward(&mut self, centimeters: i32) -> Result<()> {
        self.move_by(Direction::Back, centimeters)
    }

    pub fn left(&mut self, centimeters: i32) -> Result<()> {
        self.move_by(Direction::Left, centimeters)
    }

    pub fn right(&mut self, centimeters: i32) -> Result<()> {
        self.move_by(Direction::Right, centimeters)
    }

    pub fn up(&mut self, centimeters: i32) -> Result<()> {
        self.move_by(Direction::Up, centimeters)
    }

    pub fn down(&mut self, centimeters: i32) -> Result<()> {
        self.move_by(Direction::Down, centimeters)
    }

    /// Rotate `degrees` (1-360).
    pub fn rotate(&mut self, rotation: Rotation, degrees: i32) -> Result<()> {
        let command = Command::rotation(rotation, degrees)?;
        self.channel.require(&command, ConnectionState::Flying)?;
        self.channel.request_ok(&command)
    }

    pub fn clockwise(&mut self, degrees: i32) -> Result<()> {
        self.rotate(Rotation::Clockwise, degrees)
    }

    pub fn anticlockwise(&mut self, degrees: i32) -> Result<()> {
        self.rotate(Rotation::Anticlockwise, degrees)
    }

    /// Flip. Only transport success is checked.
    ///
    /// The drone refuses flips below roughly 50% battery; that is not checked here.
    pub fn flip(&mut self, direction: FlipDirection) -> Result<()> {
        let command = Command::flip(direction);
        self.channel.require(&command, ConnectionState::Flying)?;
        let response = self.channel.send_and_wait(&command)?;
        if !response.is_ok() {
            warn!(reply = %response.raw(), command = %command, "flip not acknowledged with ok");
        }
        Ok(())
    }

    pub fn flip_forward(&mut self) -> Result<()> {
        self.flip(FlipDirection::Forward)
    }

    /// Time-of-flight distance in millimeters.
    pub fn tof(&mut self) -> Result<u32> {
        let command = Command::query(Query::Tof);
        self.channel.require(&command, ConnectionState::Ready)?;
        let response = self.channel.send_and_wait(&command)?;
        Ok(response.millimeters(&command)?)
    }

    /// Battery charge in percent.
    pub fn battery(&mut self) -> Result<u8> {
        let command = Command::query(Query::Battery);
        self.channel.require(&command, ConnectionState::Ready)?;
        let response = self.channel.send_and_wait(&command)?;
        Ok(response.percentage(&command)?)
    }

    /// Id of the detected mission pad.
    ///
    /// Enables mission pad detection (`mon`) on first use; it stays on for the
    /// life of this handle.
    pub fn mission_pad_id(&mut self) -> Result<u32> {
        let command = Command::query(Query::MissionPadId);
        self.channel.require(&command, ConnectionState::Ready)?;

        if self.mission_pad == MissionPadMode::Off {
            self.channel.request_ok(&Command::mission_pad_on())?;
            self.mission_pad = MissionPadMode::On;
            info!("mission pad detection enabled");
        }

        let response = self.channel.send_and_wait(&command)?;
        Ok(response.integer(&command)?)
    }

    /// Ask the drone to start streaming video to UDP 11111.
    pub fn stream_on(&mut self) -> Result<()> {
        self.channel.stream_on()
    }

    pub fn stream_off(&mut self) -> Result<()> {
        self.channel.stream_off()
    }

    /// Cut the motors immediately.
    pub fn emergency(&mut self) -> Result<()> {
        self.channel.emergency()
    }
}
