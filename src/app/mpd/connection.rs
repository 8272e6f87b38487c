use mpd_client::Client;
use mpd_client::client::ConnectionEvents;
use tokio::net::TcpStream;

#[cfg(unix)]
use tokio::net::UnixStream;

use super::DaemonError;

/// Connect to MPD via Unix socket or TCP based on address format
pub async fn connect_to_mpd(address: &str) -> Result<(Client, ConnectionEvents), DaemonError> {
    let failed = |reason: String| DaemonError::Connection {
        address: address.to_string(),
        reason,
    };

    if address.contains('/') {
        #[cfg(unix)]
        {
            let connection = UnixStream::connect(address)
                .await
                .map_err(|e| failed(e.to_string()))?;
            Client::connect(connection)
                .await
                .map_err(|e| failed(e.to_string()))
        }
        #[cfg(not(unix))]
        {
            Err(failed(
                "Unix sockets are not supported on this platform".to_string(),
            ))
        }
    } else {
        let connection = TcpStream::connect(address)
            .await
            .map_err(|e| failed(e.to_string()))?;
        Client::connect(connection)
            .await
            .map_err(|e| failed(e.to_string()))
    }
}
