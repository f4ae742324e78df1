#![allow(dead_code)]

use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tello::client::ClientConfig;
use tello::transport::TransportConfig;

/// A drone stand-in on loopback: answers each command with the next scripted
/// reply and records everything it receives.
pub struct FakeDrone {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl FakeDrone {
    pub fn spawn(replies: Vec<&'static str>) -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("fake drone should bind");
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .expect("read timeout should be settable");
        let addr = socket.local_addr().expect("fake drone should have an address");

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            let mut buf = [0u8; 256];
            for reply in replies {
                let Ok((len, from)) = socket.recv_from(&mut buf) else {
                    break;
                };
                received.push(String::from_utf8_lossy(&buf[..len]).into_owned());
                socket
                    .send_to(reply.as_bytes(), from)
                    .expect("fake drone should reply");
            }
            received
        });

        Self { addr, handle }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Commands received, in order.
    pub fn finish(self) -> Vec<String> {
        self.handle.join().expect("fake drone thread should not panic")
    }
}

pub fn client_config(drone: SocketAddr) -> ClientConfig {
    ClientConfig {
        transport: TransportConfig {
            local_addr: "127.0.0.1:0".parse().unwrap(),
            drone_addr: drone,
            recv_timeout: Duration::from_secs(2),
            ..TransportConfig::default()
        },
        poll_interval: Duration::from_millis(10),
        ..ClientConfig::default()
    }
}
