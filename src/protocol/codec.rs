//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! - GET:    word_len (4 bytes) + word
//! - ADD:    word_len (4 bytes) + word + definition
//! - REMOVE: word_len (4 bytes) + word
//! - LIST:   empty
//! - PING:   empty
//!
//! All strings are UTF-8; invalid UTF-8 is a protocol error.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use crate::error::{LexiError, Result};

use super::{Command, Response, Status};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let cmd_type = command.command_type() as u8;

    // Build payload based on command type
    let payload = match command {
        Command::Get { word } | Command::Remove { word } => {
            let word = word.as_bytes();
            let mut payload = Vec::with_capacity(4 + word.len());
            payload.extend_from_slice(&(word.len() as u32).to_be_bytes());
            payload.extend_from_slice(word);
            payload
        }
        Command::Add { word, definition } => {
            let word = word.as_bytes();
            let definition = definition.as_bytes();
            let mut payload = Vec::with_capacity(4 + word.len() + definition.len());
            payload.extend_from_slice(&(word.len() as u32).to_be_bytes());
            payload.extend_from_slice(word);
            payload.extend_from_slice(definition);
            payload
        }
        Command::List | Command::Ping => Vec::new(),
    };

    // Build full message: header + payload
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(cmd_type);
    message.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    message.extend_from_slice(&payload);

    message
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    if bytes.len() < HEADER_SIZE {
        return Err(LexiError::Protocol(format!(
            "Incomplete header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    // Parse header
    let cmd_type = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    // Validate payload length
    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(LexiError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(LexiError::Protocol(format!(
            "Incomplete payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    let payload = &bytes[HEADER_SIZE..total_len];

    // Parse command based on type
    match cmd_type {
        0x01 => {
            let (word, _) = decode_word(payload, "GET")?;
            Ok(Command::Get { word })
        }
        0x02 => decode_add_command(payload),
        0x03 => {
            let (word, _) = decode_word(payload, "REMOVE")?;
            Ok(Command::Remove { word })
        }
        0x04 => decode_empty_payload(payload, "LIST").map(|_| Command::List),
        0x05 => decode_empty_payload(payload, "PING").map(|_| Command::Ping),
        _ => Err(LexiError::Protocol(format!(
            "Unknown command type: 0x{:02x}",
            cmd_type
        ))),
    }
}

/// Decode a length-prefixed word from the front of a payload
///
/// Returns the word and the remaining bytes after it.
fn decode_word<'a>(payload: &'a [u8], ctx: &str) -> Result<(String, &'a [u8])> {
    if payload.len() < 4 {
        return Err(LexiError::Protocol(format!(
            "{} command: missing word length",
            ctx
        )));
    }

    let word_len = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;

    if payload.len() < 4 + word_len {
        return Err(LexiError::Protocol(format!(
            "{} command: incomplete word (expected {}, got {})",
            ctx,
            word_len,
            payload.len() - 4
        )));
    }

    let word = decode_utf8(&payload[4..4 + word_len], ctx)?;
    Ok((word, &payload[4 + word_len..]))
}

/// Decode ADD command payload
fn decode_add_command(payload: &[u8]) -> Result<Command> {
    let (word, rest) = decode_word(payload, "ADD")?;
    let definition = decode_utf8(rest, "ADD")?;

    Ok(Command::Add { word, definition })
}

/// Reject a payload on a payload-less command
fn decode_empty_payload(payload: &[u8], ctx: &str) -> Result<()> {
    if !payload.is_empty() {
        return Err(LexiError::Protocol(format!(
            "{} command: unexpected payload of {} bytes",
            ctx,
            payload.len()
        )));
    }
    Ok(())
}

/// Validate UTF-8
fn decode_utf8(bytes: &[u8], ctx: &str) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| LexiError::Protocol(format!("{} command: invalid UTF-8", ctx)))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    let payload_len = payload.len() as u32;

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(response.status as u8);
    message.extend_from_slice(&payload_len.to_be_bytes());
    message.extend_from_slice(payload);

    message
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    if bytes.len() < HEADER_SIZE {
        return Err(LexiError::Protocol(format!(
            "Incomplete response header: expected {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    // Parse header
    let status_byte = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    // Validate payload length
    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(LexiError::Protocol(format!(
            "Response payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(LexiError::Protocol(format!(
            "Incomplete response payload: expected {} bytes, got {}",
            total_len,
            bytes.len()
        )));
    }

    // Parse status
    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        0x03 => Status::BadRequest,
        _ => {
            return Err(LexiError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    // Extract payload
    let payload = if payload_len > 0 {
        Some(bytes[HEADER_SIZE..total_len].to_vec())
    } else {
        None
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader)?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader)?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one complete header + payload frame from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(LexiError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}
