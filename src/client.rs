//! Client side of the problem protocol.
//!
//! [`request`] performs one round trip; [`validate`] checks a field
//! against the shape the server expects so obviously bad input can be
//! rejected before connecting.

use crate::problems::FieldKind;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

/// Client errors
#[derive(Debug)]
pub enum ClientError {
    /// Could not reach the server
    Connect(std::io::Error),
    /// Sending the request or reading the response failed
    Io(std::io::Error),
    /// A field contains a newline and would break framing
    EmbeddedNewline { index: usize },
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Connect(e) => write!(f, "Could not connect to server: {}", e),
            ClientError::Io(e) => write!(f, "I/O error: {}", e),
            ClientError::EmbeddedNewline { index } => {
                write!(f, "Field {} contains a newline", index + 1)
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Send one request and return the server's response.
///
/// The write side is shut down after the last field, and the response is
/// read until the server closes the connection.
pub async fn request<A, S>(addr: A, problem: &str, fields: &[S]) -> Result<String, ClientError>
where
    A: ToSocketAddrs,
    S: AsRef<str>,
{
    let payload = encode_request(problem, fields)?;

    let mut stream = TcpStream::connect(addr).await.map_err(ClientError::Connect)?;
    stream.write_all(&payload).await.map_err(ClientError::Io)?;
    stream.shutdown().await.map_err(ClientError::Io)?;

    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .map_err(ClientError::Io)?;
    Ok(String::from_utf8_lossy(&response).into_owned())
}

/// Frame a request: the identifier and each field on its own line.
pub fn encode_request<S: AsRef<str>>(problem: &str, fields: &[S]) -> Result<Vec<u8>, ClientError> {
    let mut payload = Vec::with_capacity(16);
    payload.extend_from_slice(problem.trim().as_bytes());
    payload.push(b'\n');

    for (index, field) in fields.iter().enumerate() {
        let field = field.as_ref().trim_end_matches(['\r', '\n']);
        if field.contains('\n') {
            return Err(ClientError::EmbeddedNewline { index });
        }
        payload.extend_from_slice(field.as_bytes());
        payload.push(b'\n');
    }
    Ok(payload)
}

/// Check `input` against the shape of a field.
pub fn validate(kind: FieldKind, input: &str) -> Result<(), String> {
    let input = input.trim();

    match kind {
        FieldKind::Numbers => {
            if input.is_empty() {
                return Err("Input cannot be empty".to_string());
            }
            match input.split_whitespace().find(|t| !is_integer(t)) {
                Some(bad) => Err(format!("Invalid number: {}", bad)),
                None => Ok(()),
            }
        }
        FieldKind::SortedTokens => {
            if input.is_empty() {
                return Err("Input cannot be empty".to_string());
            }
            let tokens: Vec<&str> = input.split_whitespace().collect();
            if tokens.windows(2).any(|pair| pair[1] < pair[0]) {
                return Err("Sequence is not sorted".to_string());
            }
            Ok(())
        }
        FieldKind::Text => {
            if input.is_empty() {
                return Err("Input cannot be empty".to_string());
            }
            Ok(())
        }
        FieldKind::Number => {
            if input.is_empty() {
                return Err("Input cannot be empty".to_string());
            }
            if !is_digits(input) {
                return Err("Input must be a positive number".to_string());
            }
            Ok(())
        }
        FieldKind::Char => {
            if input.chars().count() != 1 {
                return Err("Input must be a single character".to_string());
            }
            Ok(())
        }
        FieldKind::Index => {
            if !is_digits(input) {
                return Err("Position and length must be positive numbers".to_string());
            }
            Ok(())
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer(s: &str) -> bool {
    is_digits(s.trim_start_matches('-'))
}

/// Prompt shown when asking for a field
pub fn prompt(kind: FieldKind, label: &str) -> String {
    match kind {
        FieldKind::Numbers => format!("Enter {} (integers separated by spaces):", label),
        FieldKind::SortedTokens => {
            format!("Enter {} sorted sequence (elements separated by spaces):", label)
        }
        FieldKind::Text => format!("Enter {}:", label),
        FieldKind::Number => "Enter a positive number:".to_string(),
        FieldKind::Char => "Enter a character to search for:".to_string(),
        FieldKind::Index => format!("Enter {}:", label),
    }
}
