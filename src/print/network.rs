//! Raw network printing
//!
//! Sends a label body straight to a printer's raw port. Most label printers
//! listen on TCP 9100 and accept the command stream as-is.

use std::io::Write;
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::error::{LabelError, LabelResult};

/// Default raw printing port
const RAW_PORT: u16 = 9100;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Send raw bytes to a printer address
///
/// The address may carry an explicit `host:port`; otherwise port 9100 is
/// assumed.
pub fn send_raw(address: &str, body: &[u8]) -> LabelResult<()> {
    if address.is_empty() {
        return Err(LabelError::Print(
            "No printer address configured".to_string(),
        ));
    }

    let target = if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, RAW_PORT)
    };

    let mut stream = connect(&target)?;
    stream
        .write_all(body)
        .map_err(|e| LabelError::Print(format!("Failed to send to {}: {}", target, e)))?;
    stream
        .flush()
        .map_err(|e| LabelError::Print(format!("Failed to flush to {}: {}", target, e)))?;
    let _ = stream.shutdown(Shutdown::Both);

    Ok(())
}

fn connect(target: &str) -> LabelResult<TcpStream> {
    use std::net::ToSocketAddrs;

    let addrs = target
        .to_socket_addrs()
        .map_err(|e| LabelError::Print(format!("Cannot resolve {}: {}", target, e)))?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(LabelError::Print(match last_err {
        Some(e) => format!("Cannot connect to {}: {}", target, e),
        None => format!("Cannot resolve {}: no addresses", target),
    }))
}
