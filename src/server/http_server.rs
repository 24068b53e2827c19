use may::coroutine::JoinHandle;
use may_minihttp::HttpService;
use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const READY_POLL: Duration = Duration::from_millis(5);
const READY_TIMEOUT: Duration = Duration::from_secs(1);

/// Binds a service to a socket on a `may` accept coroutine.
pub struct HttpServer<T>(pub T);

/// A listening server. Dropping it leaves the accept loop running;
/// call [`ServerHandle::stop`] or [`ServerHandle::join`].
pub struct ServerHandle {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl<T: HttpService + Clone + Send + Sync + 'static> HttpServer<T> {
    /// Resolve `addr` to its first socket address and start accepting.
    ///
    /// # Errors
    ///
    /// An address that resolves to nothing, or a failed bind.
    pub fn start<A: ToSocketAddrs>(self, addr: A) -> io::Result<ServerHandle> {
        let addr = addr.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "address resolves to nothing")
        })?;
        let handle = may_minihttp::HttpServer(self.0).start(addr)?;
        info!(addr = %addr, "oasgate listening");
        Ok(ServerHandle { addr, handle })
    }
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Block until the socket accepts a connection, for up to a second.
    pub fn wait_ready(&self) -> io::Result<()> {
        self.wait_ready_for(READY_TIMEOUT)
    }

    pub fn wait_ready_for(&self, timeout: Duration) -> io::Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if TcpStream::connect_timeout(&self.addr, READY_POLL).is_ok() {
                debug!(addr = %self.addr, "Server accepting connections");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("{} not accepting after {timeout:?}", self.addr),
                ));
            }
            thread::sleep(READY_POLL);
        }
    }

    /// Cancel the accept coroutine and wait for it.
    pub fn stop(self) {
        // SAFETY: the accept loop holds no state shared with this thread.
        #[allow(unsafe_code)]
        unsafe {
            self.handle.coroutine().cancel();
        }
        if self.handle.join().is_err() {
            debug!(addr = %self.addr, "Accept coroutine ended by cancellation");
        }
        info!(addr = %self.addr, "oasgate stopped");
    }

    /// Block until the accept coroutine ends.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}
