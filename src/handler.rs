//! Per-connection request handling.
//!
//! A connection carries exactly one request:
//!
//! ```text
//! AwaitingProblemId -> AwaitingFields(n) -> Dispatched -> ResponseSent -> Closed
//! ```
//!
//! `Closed` is reached when [`handle_connection`] returns; the stream is
//! shut down on every path. A read failure in any state before
//! `Dispatched` drops straight to `Closed`. By default nothing is written
//! back in that case; with `report_errors` the handler first sends
//! `Error: <reason>`.
//!
//! Solvers run on the blocking pool so a slow one never holds up the
//! async workers or the accept loop.

use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinError;
use tracing::{debug, error, info};

use crate::problems::{self, Descriptor, INVALID_PROBLEM};
use crate::protocol::{FieldReader, ProtocolError};

/// Where a connection is in its single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Waiting for the identifier line.
    AwaitingProblemId,
    /// Identifier known, `remaining` field lines still to read.
    AwaitingFields { remaining: usize },
    /// Request handed to the solver.
    Dispatched,
    /// Result written.
    ResponseSent,
}

/// Identity of a connection, used for logging.
#[derive(Debug, Clone, Copy)]
pub struct ConnContext {
    /// Sequence number assigned by the accept loop
    pub id: u64,
    pub peer: Option<SocketAddr>,
}

/// How a connection ended.
#[derive(Debug)]
pub enum Outcome {
    /// A result (possibly a validation message) was sent.
    Responded { problem: String, result: String },
    /// The request was abandoned in `state`.
    Aborted { state: ConnState, error: HandlerError },
}

/// Failures that abort a request.
#[derive(Debug)]
pub enum HandlerError {
    /// Reading the request failed
    Read(ProtocolError),
    /// The solver task did not complete
    Solver(JoinError),
    /// Writing the response failed
    Write(std::io::Error),
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerError::Read(e) => write!(f, "read failed: {}", e),
            HandlerError::Solver(e) => write!(f, "solver failed: {}", e),
            HandlerError::Write(e) => write!(f, "write failed: {}", e),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandlerError::Read(e) => Some(e),
            HandlerError::Solver(e) => Some(e),
            HandlerError::Write(e) => Some(e),
        }
    }
}

/// Logging capability handed to the handler.
///
/// The server passes [`TracingLog`]; tests pass a recorder so handler
/// behaviour can be checked without a global subscriber.
pub trait ConnectionLog: Send + Sync {
    fn opened(&self, ctx: &ConnContext);
    fn problem_requested(&self, ctx: &ConnContext, problem: &str);
    fn unknown_problem(&self, ctx: &ConnContext, problem: &str);
    fn fields_read(&self, ctx: &ConnContext, problem: &Descriptor, fields: &[String]);
    fn responded(&self, ctx: &ConnContext, problem: &str, result: &str, elapsed: Duration);
    fn aborted(&self, ctx: &ConnContext, state: ConnState, error: &HandlerError);
    /// A best-effort step while closing (`step` names it) failed.
    fn teardown_failed(&self, ctx: &ConnContext, step: &'static str, error: &std::io::Error);
    /// `last` is the state the connection had reached when it closed.
    fn closed(&self, ctx: &ConnContext, last: ConnState, elapsed: Duration);
}

/// [`ConnectionLog`] backed by `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl ConnectionLog for TracingLog {
    fn opened(&self, ctx: &ConnContext) {
        debug!(conn = ctx.id, peer = ?ctx.peer, "New connection");
    }

    fn problem_requested(&self, ctx: &ConnContext, problem: &str) {
        info!(conn = ctx.id, peer = ?ctx.peer, problem, "Client requested problem");
    }

    fn unknown_problem(&self, ctx: &ConnContext, problem: &str) {
        error!(conn = ctx.id, problem, "Invalid problem number");
    }

    fn fields_read(&self, ctx: &ConnContext, problem: &Descriptor, fields: &[String]) {
        let inputs = problem
            .fields
            .iter()
            .zip(fields)
            .map(|(field, value)| format!("{}={}", field.label, value.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        debug!(conn = ctx.id, problem = problem.id, %inputs, "Problem inputs");
    }

    fn responded(&self, ctx: &ConnContext, problem: &str, result: &str, elapsed: Duration) {
        debug!(conn = ctx.id, result, "Sending result");
        info!(
            conn = ctx.id,
            problem,
            duration_us = elapsed.as_micros() as u64,
            "Request completed"
        );
    }

    fn aborted(&self, ctx: &ConnContext, state: ConnState, error: &HandlerError) {
        error!(conn = ctx.id, peer = ?ctx.peer, ?state, error = %error, "Request aborted");
    }

    fn teardown_failed(&self, ctx: &ConnContext, step: &'static str, error: &std::io::Error) {
        debug!(conn = ctx.id, peer = ?ctx.peer, step, error = %error, "Teardown step failed");
    }

    fn closed(&self, ctx: &ConnContext, last: ConnState, elapsed: Duration) {
        debug!(
            conn = ctx.id,
            ?last,
            duration_us = elapsed.as_micros() as u64,
            "Connection closed"
        );
    }
}

/// Handler options.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandlerOptions {
    /// Send `Error: <reason>` before closing when a read fails
    pub report_errors: bool,
}

/// Serve the single request carried by `stream`, then shut it down.
pub async fn handle_connection<S>(
    stream: S,
    ctx: ConnContext,
    options: HandlerOptions,
    log: &dyn ConnectionLog,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let started = Instant::now();
    log.opened(&ctx);

    let mut reader = FieldReader::new(stream);
    let outcome = serve_request(&mut reader, &ctx, started, log).await;

    let last = match &outcome {
        Outcome::Responded { .. } => ConnState::ResponseSent,
        Outcome::Aborted { state, .. } => *state,
    };
    if let Outcome::Aborted { state, error } = &outcome {
        log.aborted(&ctx, *state, error);
        if options.report_errors && matches!(error, HandlerError::Read(_)) {
            let line = format!("Error: {}", error);
            // The peer may already be gone.
            if let Err(e) = reader.get_mut().write_all(line.as_bytes()).await {
                log.teardown_failed(&ctx, "error_line", &e);
            }
        }
    }

    if let Err(e) = reader.get_mut().shutdown().await {
        log.teardown_failed(&ctx, "shutdown", &e);
    }
    log.closed(&ctx, last, started.elapsed());
    outcome
}

async fn serve_request<S>(
    reader: &mut FieldReader<S>,
    ctx: &ConnContext,
    started: Instant,
    log: &dyn ConnectionLog,
) -> Outcome
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut state = ConnState::AwaitingProblemId;

    let problem = match reader.next_field().await {
        Ok(line) => line.trim().to_string(),
        Err(e) => return abort(state, HandlerError::Read(e)),
    };
    log.problem_requested(ctx, &problem);

    let result = match problems::lookup(&problem) {
        Some(descriptor) => {
            let mut fields = Vec::with_capacity(descriptor.field_count());
            while fields.len() < descriptor.field_count() {
                state = ConnState::AwaitingFields {
                    remaining: descriptor.field_count() - fields.len(),
                };
                match reader.next_field().await {
                    Ok(field) => fields.push(field),
                    Err(e) => return abort(state, HandlerError::Read(e)),
                }
            }
            log.fields_read(ctx, descriptor, &fields);

            state = ConnState::Dispatched;
            match tokio::task::spawn_blocking(move || descriptor.solve(fields.as_slice())).await {
                Ok(result) => result,
                Err(e) => return abort(state, HandlerError::Solver(e)),
            }
        }
        None => {
            log.unknown_problem(ctx, &problem);
            INVALID_PROBLEM.to_string()
        }
    };
    state = ConnState::Dispatched;

    let stream = reader.get_mut();
    if let Err(e) = write_response(stream, &result).await {
        return abort(state, HandlerError::Write(e));
    }

    log.responded(ctx, &problem, &result, started.elapsed());
    Outcome::Responded { problem, result }
}

async fn write_response<W>(stream: &mut W, result: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(result.as_bytes()).await?;
    stream.flush().await
}

fn abort(state: ConnState, error: HandlerError) -> Outcome {
    Outcome::Aborted { state, error }
}
