use std::{
    sync::{mpsc, Arc},
    time::Duration,
};

use futures_util::{SinkExt, StreamExt};
use tokio::{
    runtime::Runtime,
    sync::{mpsc as async_mpsc, watch},
};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        client::IntoClientRequest,
        http::{header::SEC_WEBSOCKET_PROTOCOL, HeaderValue},
        Message as WsMessage,
    },
};
use url::Url;

use crate::infra::secrets::redact_url;

use super::{
    cable::{CableCommand, CABLE_SUBPROTOCOL},
    session::{CableConnector, CableLink, LinkEvent},
    RealtimeError,
};

const SOCKET_TASK_STARTED: &str = "REALTIME_SOCKET_TASK_STARTED";
const SOCKET_TASK_STOPPED: &str = "REALTIME_SOCKET_TASK_STOPPED";
const SOCKET_READ_FAILED: &str = "REALTIME_SOCKET_READ_FAILED";
const SOCKET_WRITE_FAILED: &str = "REALTIME_SOCKET_WRITE_FAILED";
const SOCKET_STOP_SIGNAL_SENT: &str = "REALTIME_SOCKET_STOP_SIGNAL_SENT";

/// Opens WebSocket links on a shared tokio runtime.
#[derive(Debug, Clone)]
pub struct WsConnector {
    runtime: Arc<Runtime>,
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new(runtime: Arc<Runtime>, connect_timeout: Duration) -> Self {
        Self {
            runtime,
            connect_timeout,
        }
    }
}

impl CableConnector for WsConnector {
    fn open(&self, url: &Url) -> Result<Box<dyn CableLink>, RealtimeError> {
        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|error| RealtimeError::Connection(error.to_string()))?;
        request.headers_mut().insert(
            SEC_WEBSOCKET_PROTOCOL,
            HeaderValue::from_static(CABLE_SUBPROTOCOL),
        );

        let (stream, _response) = self
            .runtime
            .block_on(async {
                tokio::time::timeout(self.connect_timeout, connect_async(request)).await
            })
            .map_err(|_| {
                RealtimeError::Connection(format!(
                    "timed out after {}ms",
                    self.connect_timeout.as_millis()
                ))
            })?
            .map_err(|error| RealtimeError::Connection(error.to_string()))?;

        let (event_tx, event_rx) = mpsc::channel();
        let (outbound_tx, outbound_rx) = async_mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);

        self.runtime
            .spawn(run_socket(stream, event_tx, outbound_rx, stop_rx));

        tracing::info!(
            code = SOCKET_TASK_STARTED,
            url = %redact_url(url),
            "realtime socket task started"
        );

        Ok(Box::new(WsLink {
            outbound_tx,
            event_rx,
            stop_tx: Some(stop_tx),
            closed: false,
        }))
    }
}

/// Handle to a running socket task. Dropping it stops the task.
#[derive(Debug)]
pub struct WsLink {
    outbound_tx: async_mpsc::UnboundedSender<String>,
    event_rx: mpsc::Receiver<LinkEvent>,
    stop_tx: Option<watch::Sender<bool>>,
    closed: bool,
}

impl CableLink for WsLink {
    fn send(&mut self, command: &CableCommand) -> Result<(), RealtimeError> {
        if self.closed {
            return Err(RealtimeError::Connection("socket closed".to_owned()));
        }

        let text = command.to_json()?;
        self.outbound_tx
            .send(text)
            .map_err(|_| RealtimeError::Connection("socket task stopped".to_owned()))
    }

    fn try_next(&mut self) -> Option<LinkEvent> {
        if self.closed {
            return None;
        }

        match self.event_rx.try_recv() {
            Ok(event) => {
                if matches!(event, LinkEvent::Closed { .. }) {
                    self.closed = true;
                }
                Some(event)
            }
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.closed = true;
                Some(LinkEvent::Closed {
                    reason: "socket task ended".to_owned(),
                })
            }
        }
    }

    fn close(&mut self) {
        self.closed = true;
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
            tracing::debug!(code = SOCKET_STOP_SIGNAL_SENT, "realtime socket stop signal sent");
        }
    }
}

impl Drop for WsLink {
    fn drop(&mut self) {
        self.close();
    }
}

async fn run_socket<S>(
    stream: S,
    event_tx: mpsc::Sender<LinkEvent>,
    mut outbound_rx: async_mpsc::UnboundedReceiver<String>,
    mut stop_rx: watch::Receiver<bool>,
) where
    S: futures_util::Stream<Item = Result<WsMessage, tokio_tungstenite::tungstenite::Error>>
        + futures_util::Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error>
        + Unpin,
{
    let (mut writer, mut reader) = stream.split();

    let reason = loop {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    let _ = writer.send(WsMessage::Close(None)).await;
                    break None;
                }
            }
            outbound = outbound_rx.recv() => {
                let Some(text) = outbound else {
                    break None;
                };
                if let Err(error) = writer.send(WsMessage::Text(text.into())).await {
                    tracing::warn!(
                        code = SOCKET_WRITE_FAILED,
                        error = %error,
                        "realtime socket write failed"
                    );
                    break Some(error.to_string());
                }
            }
            inbound = reader.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        if event_tx.send(LinkEvent::Text(text.as_str().to_owned())).is_err() {
                            break None;
                        }
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        break Some(
                            frame
                                .map(|frame| frame.reason.as_str().to_owned())
                                .filter(|reason| !reason.is_empty())
                                .unwrap_or_else(|| "closed by server".to_owned()),
                        );
                    }
                    Some(Ok(_)) => {}
                    Some(Err(error)) => {
                        tracing::warn!(
                            code = SOCKET_READ_FAILED,
                            error = %error,
                            "realtime socket read failed"
                        );
                        break Some(error.to_string());
                    }
                    None => break Some("stream ended".to_owned()),
                }
            }
        }
    };

    if let Some(reason) = reason {
        let _ = event_tx.send(LinkEvent::Closed { reason });
    }

    tracing::info!(code = SOCKET_TASK_STOPPED, "realtime socket task stopped");
}
