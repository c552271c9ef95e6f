use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_chase_core::{Layout, LayoutError};
use serde::{Deserialize, Serialize};

const TRANSFER_DOMAIN: &str = "maze";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded layout payload.
const TRANSFER_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, board dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Board captured in the authored row format, ready for clipboard transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LayoutTransfer {
    columns: u32,
    rows: u32,
    tiles: Vec<String>,
}

impl LayoutTransfer {
    /// Captures the rows of an existing layout.
    pub(crate) fn from_layout(layout: &Layout) -> Self {
        let (columns, rows) = layout.size();
        Self {
            columns: columns.unsigned_abs(),
            rows: rows.unsigned_abs(),
            tiles: layout.to_rows(),
        }
    }

    /// Encodes the board into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = Payload {
            tiles: self.tiles.clone(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{TRANSFER_HEADER}{FIELD_DELIMITER}{}x{}{FIELD_DELIMITER}{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a board from its single-line string form.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != TRANSFER_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != TRANSFER_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: Payload =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let fits = decoded.tiles.len() == rows as usize
            && decoded
                .tiles
                .iter()
                .all(|row| row.chars().count() == columns as usize);
        if !fits {
            return Err(LayoutTransferError::DimensionMismatch(dimensions.to_owned()));
        }

        Ok(Self {
            columns,
            rows,
            tiles: decoded.tiles,
        })
    }

    /// Parses the captured rows into a playable layout.
    pub(crate) fn into_layout(self) -> Result<Layout, LayoutTransferError> {
        Layout::parse(&self.tiles).map_err(LayoutTransferError::InvalidLayout)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Payload {
    tiles: Vec<String>,
}

/// Errors that can occur while decoding layout transfer strings.
#[derive(Debug)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The board dimensions were missing.
    MissingDimensions,
    /// The payload segment was missing.
    MissingPayload,
    /// The string used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The string used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The board dimensions could not be parsed.
    InvalidDimensions(String),
    /// The rows in the payload disagree with the declared dimensions.
    DimensionMismatch(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload could not be (de)serialised.
    InvalidPayload(serde_json::Error),
    /// The rows do not describe a playable layout.
    InvalidLayout(LayoutError),
}

impl fmt::Display for LayoutTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "layout string was empty"),
            Self::MissingPrefix => write!(f, "layout string is missing the prefix"),
            Self::MissingVersion => write!(f, "layout string is missing the version"),
            Self::MissingDimensions => write!(f, "layout string is missing the board dimensions"),
            Self::MissingPayload => write!(f, "layout string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "layout prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "layout version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse board dimensions '{dimensions}'")
            }
            Self::DimensionMismatch(dimensions) => {
                write!(f, "layout rows do not match the declared size '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode layout payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not process layout payload: {error}")
            }
            Self::InvalidLayout(error) => write!(f, "layout is not playable: {error}"),
        }
    }
}

impl Error for LayoutTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            Self::InvalidLayout(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: [&str; 5] = [
        "#######",
        "#P.o  #",
        "###-###",
        "#_1234#",
        "#######",
    ];

    #[test]
    fn classic_board_survives_transfer() {
        let layout = Layout::classic();
        let encoded = LayoutTransfer::from_layout(&layout)
            .encode()
            .expect("layout encodes");
        assert!(encoded.starts_with("maze:v1:28x31:"));

        let decoded = LayoutTransfer::decode(&encoded)
            .expect("layout decodes")
            .into_layout()
            .expect("layout parses");
        assert_eq!(decoded, layout);
    }

    #[test]
    fn declared_size_must_match_the_rows() {
        let layout = Layout::parse(&BOARD).expect("layout parses");
        let encoded = LayoutTransfer::from_layout(&layout)
            .encode()
            .expect("layout encodes");
        let forged = encoded.replacen("7x5", "7x6", 1);

        assert!(matches!(
            LayoutTransfer::decode(&forged),
            Err(LayoutTransferError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(
            LayoutTransfer::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            LayoutTransfer::decode("tower:v1:7x5:abc"),
            Err(LayoutTransferError::InvalidPrefix(_))
        ));
        assert!(matches!(
            LayoutTransfer::decode("maze:v2:7x5:abc"),
            Err(LayoutTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            LayoutTransfer::decode("maze:v1:0x5:abc"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            LayoutTransfer::decode("maze:v1:7x5"),
            Err(LayoutTransferError::MissingPayload)
        ));
    }

    #[test]
    fn unplayable_rows_are_reported() {
        let transfer = LayoutTransfer {
            columns: 3,
            rows: 1,
            tiles: vec!["#.#".to_owned()],
        };

        assert!(matches!(
            transfer.into_layout(),
            Err(LayoutTransferError::InvalidLayout(
                LayoutError::MissingPlayerSpawn
            ))
        ));
    }
}
