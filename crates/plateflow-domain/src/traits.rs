//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the runtime
//! that owns physical inventory. Implementations live in other crates.

use crate::error::PlateError;
use crate::Plate;

/// Source of fresh, empty plates
///
/// Implemented by whatever owns inventory; the transfer layer asks it for a
/// new container each time the current one is full.
pub trait PlateFactory {
    /// Rows and columns of the plates this factory creates
    fn dimensions(&self) -> (usize, usize);

    /// Create a new empty plate
    fn create_plate(&mut self) -> Result<Plate, PlateError>;

    /// Slots per plate, or 0 when the dimensions overflow
    fn capacity(&self) -> usize {
        let (rows, columns) = self.dimensions();
        rows.checked_mul(columns).unwrap_or(0)
    }
}

/// A plate format such as the standard 8x12 96-well plate
///
/// The simplest factory: every call returns a new empty plate of this size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlateFormat {
    /// Rows per plate
    pub rows: usize,
    /// Columns per plate
    pub columns: usize,
}

impl PlateFormat {
    /// Standard 96-well plate (8 rows, 12 columns)
    pub const WELLS_96: PlateFormat = PlateFormat { rows: 8, columns: 12 };

    /// Create a format
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }
}

impl PlateFactory for PlateFormat {
    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    fn create_plate(&mut self) -> Result<Plate, PlateError> {
        Plate::new(self.rows, self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_creates_empty_plates() {
        let mut format = PlateFormat::WELLS_96;
        let a = format.create_plate().unwrap();
        let b = format.create_plate().unwrap();
        assert_eq!(format.capacity(), 96);
        assert_eq!(a.dimensions(), (8, 12));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_overflowing_format_has_no_capacity() {
        let mut format = PlateFormat::new(usize::MAX, 2);
        assert_eq!(format.capacity(), 0);
        assert!(matches!(
            format.create_plate(),
            Err(PlateError::InvalidDimensions { .. })
        ));
    }
}
