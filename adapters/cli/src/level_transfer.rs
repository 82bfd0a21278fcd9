use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use snake_puzzle_core::ValidationError;
use snake_puzzle_world::{Level, LevelRecord};

const TRANSFER_DOMAIN: &str = "snake";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "snake:v1";
/// Delimiter used to separate the prefix, map dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes a level into a single-line string suitable for clipboard transfer.
pub(crate) fn encode(level: &Level) -> Result<String, LevelTransferError> {
    let json = serde_json::to_vec(&level.to_record()).map_err(LevelTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    let side = level.side_length();
    Ok(format!("{TRANSFER_HEADER}:{side}x{side}:{encoded}"))
}

/// Decodes a level from its transfer string.
///
/// The declared dimensions must agree with the map carried in the payload,
/// and the payload must describe a valid level.
pub(crate) fn decode(value: &str) -> Result<Level, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != TRANSFER_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != TRANSFER_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let side = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(LevelTransferError::InvalidEncoding)?;
    let record: LevelRecord =
        serde_json::from_slice(&bytes).map_err(LevelTransferError::InvalidPayload)?;
    let level = Level::from_record(record).map_err(LevelTransferError::InvalidLevel)?;

    if level.side_length() != side {
        return Err(LevelTransferError::DimensionMismatch {
            declared: side,
            actual: level.side_length(),
        });
    }
    Ok(level)
}

/// Errors that can occur while decoding level transfer strings.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The map dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The map dimensions could not be parsed or were not square.
    InvalidDimensions(String),
    /// The declared dimensions disagree with the encoded map.
    DimensionMismatch {
        /// Side length declared in the header.
        declared: u32,
        /// Side length of the decoded map.
        actual: u32,
    },
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be (de)serialised.
    InvalidPayload(serde_json::Error),
    /// The payload described an invalid level.
    InvalidLevel(ValidationError),
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "level string was empty"),
            Self::MissingPrefix => write!(f, "level string is missing the prefix"),
            Self::MissingVersion => write!(f, "level string is missing the version"),
            Self::MissingDimensions => write!(f, "level string is missing the map dimensions"),
            Self::MissingPayload => write!(f, "level string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "level prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "level version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse map dimensions '{dimensions}'")
            }
            Self::DimensionMismatch { declared, actual } => write!(
                f,
                "level string declares a {declared}x{declared} map but carries {actual}x{actual}"
            ),
            Self::InvalidEncoding(error) => write!(f, "could not decode level payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not parse level payload: {error}"),
            Self::InvalidLevel(error) => write!(f, "level payload is invalid: {error}"),
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::InvalidLevel(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<u32, LevelTransferError> {
    let invalid = || LevelTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || columns != rows {
        return Err(invalid());
    }
    Ok(columns)
}
