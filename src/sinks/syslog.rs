//! Syslog destination
//!
//! Sends each line as one UDP datagram in the classic BSD form
//! `<PRI>line\0`, with facility `user`.

use crate::core::{Destination, Level, ObserveError, Record, Result};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Default syslog host
pub const DEFAULT_SYSLOG_HOST: &str = "localhost";

/// Default syslog port
pub const DEFAULT_SYSLOG_PORT: u16 = 514;

/// `user` facility code
const FACILITY_USER: u8 = 1;

/// Syslog severity for a level; unmapped levels report as `warning`
fn severity(level: Level) -> u8 {
    match level {
        Level::DEBUG => 7,
        Level::INFO => 6,
        Level::WARN => 4,
        Level::ERROR => 3,
        Level::CRITICAL => 2,
        _ => 4,
    }
}

pub struct SyslogDestination {
    host: String,
    port: u16,
    facility: u8,
    socket: Option<(UdpSocket, SocketAddr)>,
}

impl SyslogDestination {
    /// The endpoint is resolved on the first write.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            facility: FACILITY_USER,
            socket: None,
        }
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn priority(&self, level: Level) -> u8 {
        (self.facility << 3) | severity(level)
    }

    fn connect(&self) -> Result<(UdpSocket, SocketAddr)> {
        let target = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| ObserveError::syslog_address(self.address(), e.to_string()))?
            .next()
            .ok_or_else(|| ObserveError::syslog_address(self.address(), "no addresses found"))?;
        let local = if target.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local).map_err(|e| {
            ObserveError::io_operation("binding syslog socket", format!("cannot bind {}", local), e)
        })?;
        Ok((socket, target))
    }
}

impl Destination for SyslogDestination {
    fn write(&mut self, record: &Record, line: &str) -> Result<()> {
        if self.socket.is_none() {
            self.socket = Some(self.connect()?);
        }
        let datagram = format!("<{}>{}\0", self.priority(record.level), line);
        if let Some((ref socket, target)) = self.socket {
            socket.send_to(datagram.as_bytes(), target).map_err(|e| {
                ObserveError::io_operation(
                    "sending syslog datagram",
                    format!("cannot reach {}", self.address()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "syslog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_priority_encoding() {
        let syslog = SyslogDestination::new(DEFAULT_SYSLOG_HOST, DEFAULT_SYSLOG_PORT);
        assert_eq!(syslog.priority(Level::DEBUG), 15);
        assert_eq!(syslog.priority(Level::ERROR), 11);
        assert_eq!(syslog.priority(Level::TRACE), 12);
        assert_eq!(syslog.address(), "localhost:514");
    }

    #[test]
    fn test_datagram_format() {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        server
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = server.local_addr().unwrap().port();

        let mut syslog = SyslogDestination::new("127.0.0.1", port);
        let record = Record::new(Level::INFO, "global", "hello");
        syslog.write(&record, "INFO hello").unwrap();

        let mut buf = [0u8; 256];
        let (len, _) = server.recv_from(&mut buf).unwrap();
        assert_eq!(&buf[..len], b"<14>INFO hello\0");
    }

    #[test]
    fn test_unresolvable_host_fails_on_write() {
        let mut syslog = SyslogDestination::new("host.invalid", 514);
        let record = Record::new(Level::INFO, "global", "x");
        assert!(syslog.write(&record, "x").is_err());
    }
}
