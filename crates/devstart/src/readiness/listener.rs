//! Listener thread for the readiness responder.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::responder::{StatusBody, respond};
use super::{READINESS_TARGET, ReadinessError};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// A bound, not yet serving, readiness listener.
#[derive(Debug)]
pub struct ReadinessServer {
    listener: TcpListener,
    addr: SocketAddr,
}

impl ReadinessServer {
    /// Binds on all interfaces at `port`. Port zero picks an ephemeral port.
    pub fn bind(port: u16) -> Result<Self, ReadinessError> {
        let requested = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        let listener = TcpListener::bind(requested).map_err(|source| ReadinessError::Bind {
            addr: requested,
            source,
        })?;
        let addr = listener.local_addr().unwrap_or(requested);
        Ok(Self { listener, addr })
    }

    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts answering requests on a background thread.
    ///
    /// The thread never keeps the process alive: returning from `main`
    /// ends it along with everything else.
    pub fn start(self, dev_server_port: u16) -> Result<ReadinessHandle, ReadinessError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ReadinessError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let body = Arc::new(StatusBody::starting(dev_server_port).render());
        let addr = self.addr;
        let handle = thread::Builder::new()
            .name("devstart-readiness".to_owned())
            .spawn(move || run_accept_loop(&self.listener, &shutdown_flag, &body))
            .map_err(|source| ReadinessError::Thread { source })?;
        info!(
            target: READINESS_TARGET,
            addr = %addr,
            dev_server_port,
            "readiness responder listening"
        );
        Ok(ReadinessHandle {
            addr,
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background readiness thread.
#[derive(Debug)]
pub struct ReadinessHandle {
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ReadinessHandle {
    /// Address the responder is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns true until [`close`](Self::close) has run.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Stops the responder and releases its socket. Repeated calls are no-ops
    /// and failures are logged, never returned.
    pub fn close(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.join().is_err() {
            warn!(
                target: READINESS_TARGET,
                addr = %self.addr,
                "readiness thread panicked before close"
            );
        } else {
            debug!(target: READINESS_TARGET, addr = %self.addr, "readiness responder closed");
        }
    }
}

impl Drop for ReadinessHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(listener: &TcpListener, shutdown: &AtomicBool, body: &Arc<String>) {
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match accept_connection(listener) {
            Ok(Some(stream)) => {
                last_error = None;
                let body = Arc::clone(body);
                if let Err(error) = thread::Builder::new()
                    .name("devstart-readiness-conn".to_owned())
                    .spawn(move || respond(stream, &body))
                {
                    warn!(
                        target: READINESS_TARGET,
                        error = %error,
                        "failed to spawn readiness connection thread"
                    );
                }
            }
            Ok(None) => thread::sleep(ACCEPT_BACKOFF),
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: READINESS_TARGET,
                        error = %error,
                        "readiness accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
}

fn accept_connection(listener: &TcpListener) -> Result<Option<TcpStream>, io::Error> {
    match listener.accept() {
        Ok((stream, _)) => {
            stream.set_nonblocking(false)?;
            Ok(Some(stream))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}
