//! Single-line text encoding of a grid, suitable for pasting between sessions.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use outbreak_core::{Cell, Grid, GridError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "outbreak";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "outbreak:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of every cell of a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridLayoutSnapshot {
    grid: Grid,
}

impl GridLayoutSnapshot {
    /// Captures `grid`.
    pub(crate) fn new(grid: Grid) -> Self {
        Self { grid }
    }

    /// Releases the captured grid.
    pub(crate) fn into_grid(self) -> Grid {
        self.grid
    }

    /// Encodes the snapshot into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = SerializableLayout {
            rows: self.grid.to_label_rows(),
        };
        let json = serde_json::to_vec(&payload).map_err(LayoutTransferError::Serialization)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        let size = self.grid.size();
        Ok(format!("{SNAPSHOT_HEADER}:{size}x{size}:{encoded}"))
    }

    /// Decodes a snapshot from the provided string representation.
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

        if domain != SNAPSHOT_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let size = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LayoutTransferError::InvalidEncoding)?;
        let decoded: SerializableLayout =
            serde_json::from_slice(&bytes).map_err(LayoutTransferError::InvalidPayload)?;

        let rows = decoded
            .rows
            .iter()
            .enumerate()
            .map(|(row, labels)| parse_row(row, labels))
            .collect::<Result<Vec<_>, _>>()?;
        let grid = Grid::from_rows(rows).map_err(LayoutTransferError::InvalidGrid)?;
        if grid.size() != size {
            return Err(LayoutTransferError::DimensionMismatch {
                declared: size,
                actual: grid.size(),
            });
        }

        Ok(Self { grid })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableLayout {
    rows: Vec<String>,
}

/// Errors that can occur while encoding or decoding layout transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("layout string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("layout string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("layout string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("layout string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("layout string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("layout prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("layout version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed or were not square.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode layout payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse layout payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// A row contained a character that is not a cell label.
    #[error("unknown cell label '{symbol}' at row {row}, column {column}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// Zero-based row index.
        row: usize,
        /// Zero-based column index.
        column: usize,
    },
    /// The decoded rows did not form a valid grid.
    #[error("layout rows do not form a grid: {0}")]
    InvalidGrid(#[source] GridError),
    /// The header dimensions disagree with the payload.
    #[error("layout declares {declared}x{declared} but holds {actual}x{actual} cells")]
    DimensionMismatch {
        /// Size named in the header.
        declared: u32,
        /// Size of the decoded rows.
        actual: u32,
    },
    /// The payload could not be serialised.
    #[error("could not serialise layout: {0}")]
    Serialization(#[source] serde_json::Error),
}

fn parse_row(row: usize, labels: &str) -> Result<Vec<Cell>, LayoutTransferError> {
    labels
        .chars()
        .enumerate()
        .map(|(column, symbol)| {
            Cell::from_label(symbol).ok_or(LayoutTransferError::UnknownSymbol {
                symbol,
                row,
                column,
            })
        })
        .collect()
}

fn parse_dimensions(dimensions: &str) -> Result<u32, LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 || columns != rows {
        return Err(invalid());
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outbreak_core::CellCoord;

    #[test]
    fn round_trip_empty_layout() {
        let snapshot = GridLayoutSnapshot::new(Grid::new(12));

        let encoded = snapshot.encode().expect("layout encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:12x12:")));

        let decoded = GridLayoutSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn round_trip_populated_layout() {
        let mut grid = Grid::new(8);
        grid.set(CellCoord::new(0, 0), Cell::Human);
        grid.set(CellCoord::new(7, 7), Cell::Zombie);
        grid.set(CellCoord::new(3, 4), Cell::Safe);
        grid.set(CellCoord::new(5, 1), Cell::Barricade);
        let snapshot = GridLayoutSnapshot::new(grid.clone());

        let encoded = snapshot.encode().expect("layout encodes");
        let decoded = GridLayoutSnapshot::decode(&format!("  {encoded}\n")).expect("snapshot decodes");

        assert_eq!(decoded.into_grid(), grid);
    }

    #[test]
    fn rejects_foreign_prefix_and_version() {
        assert!(matches!(
            GridLayoutSnapshot::decode("plague:v1:4x4:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "plague"
        ));
        assert!(matches!(
            GridLayoutSnapshot::decode("outbreak:v2:4x4:e30"),
            Err(LayoutTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            GridLayoutSnapshot::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            GridLayoutSnapshot::decode("outbreak:v1:4x4"),
            Err(LayoutTransferError::MissingPayload)
        ));
    }

    #[test]
    fn rejects_non_square_or_zero_dimensions() {
        for dimensions in ["4x5", "0x0", "four", "4x"] {
            let value = format!("outbreak:v1:{dimensions}:e30");
            assert!(
                matches!(
                    GridLayoutSnapshot::decode(&value),
                    Err(LayoutTransferError::InvalidDimensions(_))
                ),
                "{dimensions} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_payload_that_disagrees_with_header() {
        let encoded = GridLayoutSnapshot::new(Grid::new(3))
            .encode()
            .expect("layout encodes");
        let tampered = encoded.replacen(":3x3:", ":4x4:", 1);

        assert!(matches!(
            GridLayoutSnapshot::decode(&tampered),
            Err(LayoutTransferError::DimensionMismatch {
                declared: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn rejects_unknown_labels() {
        let json = r#"{"rows":["H.","?Z"]}"#;
        let value = format!("outbreak:v1:2x2:{}", STANDARD_NO_PAD.encode(json));

        assert!(matches!(
            GridLayoutSnapshot::decode(&value),
            Err(LayoutTransferError::UnknownSymbol {
                symbol: '?',
                row: 1,
                column: 0
            })
        ));
    }

    #[test]
    fn rejects_garbage_payload() {
        assert!(matches!(
            GridLayoutSnapshot::decode("outbreak:v1:2x2:!!!"),
            Err(LayoutTransferError::InvalidEncoding(_))
        ));
        let not_json = STANDARD_NO_PAD.encode("rows");
        assert!(matches!(
            GridLayoutSnapshot::decode(&format!("outbreak:v1:2x2:{not_json}")),
            Err(LayoutTransferError::InvalidPayload(_))
        ));
    }
}
