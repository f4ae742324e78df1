//! Loopback drone that answers from a script.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tello_transport::TransportConfig;

use crate::config::ClientConfig;

/// How long the drone waits for a scripted command before giving up.
const STEP_WAIT: Duration = Duration::from_secs(5);
/// Quiet period after the script ends, to catch commands that should not have been sent.
const TRAILING_WAIT: Duration = Duration::from_millis(200);

/// What the drone does with the next datagram it receives.
pub(crate) enum Step {
    Reply(&'static str),
    Delayed(&'static str, Duration),
    Echo,
    Silent,
}

pub(crate) struct ScriptedDrone {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl ScriptedDrone {
    pub(crate) fn spawn(steps: Vec<Step>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("drone socket should bind");
        let addr = socket.local_addr().expect("drone socket should have an address");

        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            let mut steps = steps.into_iter();
            loop {
                let step = steps.next();
                let wait = if step.is_some() { STEP_WAIT } else { TRAILING_WAIT };
                socket.set_read_timeout(Some(wait)).expect("timeout should apply");

                let mut buf = [0u8; 256];
                let (len, client) = match socket.recv_from(&mut buf) {
                    Ok(received) => received,
                    Err(err)
                        if err.kind() == ErrorKind::WouldBlock
                            || err.kind() == ErrorKind::TimedOut =>
                    {
                        return seen;
                    }
                    Err(err) => panic!("drone receive failed: {err}"),
                };
                let text = String::from_utf8_lossy(&buf[..len]).to_string();

                match step {
                    Some(Step::Reply(reply)) => {
                        socket.send_to(reply.as_bytes(), client).expect("reply should send");
                    }
                    Some(Step::Delayed(reply, delay)) => {
                        thread::sleep(delay);
                        socket.send_to(reply.as_bytes(), client).expect("reply should send");
                    }
                    Some(Step::Echo) => {
                        socket.send_to(text.as_bytes(), client).expect("echo should send");
                    }
                    Some(Step::Silent) | None => {}
                }
                seen.push(text);
            }
        });

        Self { addr, handle }
    }

    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait for the script to finish and return every command received.
    pub(crate) fn finish(self) -> Vec<String> {
        self.handle.join().expect("drone thread should not panic")
    }
}

pub(crate) fn config_for(drone: SocketAddr) -> ClientConfig {
    ClientConfig {
        transport: TransportConfig {
            local_addr: "127.0.0.1:0".parse().expect("loopback address should parse"),
            drone_addr: drone,
            recv_timeout: Duration::from_secs(2),
            ..TransportConfig::default()
        },
        poll_interval: Duration::from_millis(10),
        ..ClientConfig::default()
    }
}
