use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use anyhow::{Context, Result};

use crate::{config::Config, request::Request, response::Response, routes};

/// Binds the configured address and serves until the process exits.
pub fn run(config: Config) -> Result<()> {
    let listener = TcpListener::bind(config.bind)
        .with_context(|| format!("failed to bind to {}", config.bind))?;

    tracing::info!(
        address = %listener.local_addr()?,
        directory = ?config.directory(),
        "listening"
    );

    serve(listener, Arc::new(config));

    Ok(())
}

/// Accept loop. Every connection gets its own detached thread, so a stalled
/// client only ever blocks itself. Accept failures are logged and skipped.
pub fn serve(listener: TcpListener, config: Arc<Config>) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let config = Arc::clone(&config);
                let spawned = thread::Builder::new()
                    .name("connection".into())
                    .spawn(move || {
                        if let Err(e) = handle_stream(stream, &config) {
                            tracing::warn!(error = ?e, "connection failed");
                        }
                    });

                if let Err(e) = spawned {
                    tracing::error!(error = %e, "failed to spawn connection thread");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to accept connection");
            }
        }
    }
}

/// Serves exactly one request on `stream` and closes it.
pub fn handle_stream(mut stream: TcpStream, config: &Config) -> Result<()> {
    let peer = stream.peer_addr().context("connection has no peer address")?;
    tracing::debug!(%peer, "accepted new connection");

    let mut buf = vec![0; config.read_buffer_size];
    let read = stream
        .read(&mut buf)
        .with_context(|| format!("could not read request from {peer}"))?;

    if read == 0 {
        tracing::debug!(%peer, "connection closed before sending a request");
        return Ok(());
    }

    let wire = respond(&buf[..read], config);

    stream
        .write_all(&wire)
        .and_then(|()| stream.flush())
        .with_context(|| format!("could not write response to {peer}"))?;

    Ok(())
}

/// Turns the raw request bytes into raw response bytes.
pub fn respond(raw: &[u8], config: &Config) -> Vec<u8> {
    let request = match Request::parse(raw) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "unprocessable request");
            return Response::text(422, e.to_string()).render(false);
        }
    };

    let response = routes::route(&request, config);

    tracing::info!(
        method = %request.method,
        target = %request.target,
        status = response.status,
        "handled request"
    );

    response.render(request.accepts_gzip())
}
