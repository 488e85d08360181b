//! Plates: fixed-size grids of sample slots

use crate::error::{AddressError, PlateError};
use crate::{PartId, PlateId, SampleId, WellAddress};
use serde::{Deserialize, Serialize};

/// One physical instance of a sample occupying a single slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Part {
    /// Unique part identifier
    pub id: PartId,
    /// The sample this part is a copy of
    pub sample: SampleId,
}

impl Part {
    /// Create a new part of `sample` with a fresh id
    pub fn new(sample: SampleId) -> Self {
        Self {
            id: PartId::new(),
            sample,
        }
    }

    /// Create a part with a known id
    pub fn with_id(id: PartId, sample: SampleId) -> Self {
        Self { id, sample }
    }
}

/// Contents of one grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "part", rename_all = "lowercase")]
pub enum Slot {
    /// Nothing in the well
    #[default]
    Empty,
    /// The well holds a part
    Occupied(Part),
}

impl Slot {
    /// The part held in this slot, if any
    pub fn part(&self) -> Option<&Part> {
        match self {
            Slot::Empty => None,
            Slot::Occupied(part) => Some(part),
        }
    }

    /// Whether the slot is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

/// What to search a plate for
///
/// A sample may match several slots (copies); a part matches at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Any part of this sample
    Sample(SampleId),
    /// This exact part
    Part(PartId),
}

impl Locator {
    fn matches(&self, part: &Part) -> bool {
        match self {
            Locator::Sample(sample) => part.sample == *sample,
            Locator::Part(id) => part.id == *id,
        }
    }
}

impl From<SampleId> for Locator {
    fn from(sample: SampleId) -> Self {
        Locator::Sample(sample)
    }
}

impl From<PartId> for Locator {
    fn from(part: PartId) -> Self {
        Locator::Part(part)
    }
}

impl From<&Part> for Locator {
    fn from(part: &Part) -> Self {
        Locator::Part(part.id)
    }
}

/// Scan order used when filling empty slots
///
/// The two orders place samples differently on the bench: row-major walks
/// A1, A2, A3..., column-major walks A1, B1, C1...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillOrder {
    /// Column varies fastest
    RowMajor,
    /// Row varies fastest
    ColumnMajor,
}

/// A rectangular container of sample slots
///
/// Dimensions are fixed at creation; every in-bounds address always has a
/// slot and no slot exists outside the bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    id: PlateId,
    rows: usize,
    columns: usize,
    slots: Vec<Slot>,
}

impl Plate {
    /// Create an empty plate with a fresh id
    ///
    /// # Examples
    ///
    /// ```
    /// use plateflow_domain::Plate;
    ///
    /// let plate = Plate::new(8, 12).unwrap();
    /// assert_eq!(plate.capacity(), 96);
    /// assert_eq!(plate.empty_slots().len(), 96);
    /// ```
    pub fn new(rows: usize, columns: usize) -> Result<Self, PlateError> {
        Self::with_id(PlateId::new(), rows, columns)
    }

    /// Create an empty plate with a known id
    pub fn with_id(id: PlateId, rows: usize, columns: usize) -> Result<Self, PlateError> {
        let max_slots = isize::MAX as usize / std::mem::size_of::<Slot>();
        let capacity = match rows.checked_mul(columns) {
            Some(capacity) if capacity > 0 && capacity <= max_slots => capacity,
            _ => return Err(PlateError::InvalidDimensions { rows, columns }),
        };
        Ok(Self {
            id,
            rows,
            columns,
            slots: vec![Slot::Empty; capacity],
        })
    }

    /// Plate identifier
    pub fn id(&self) -> PlateId {
        self.id
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// (rows, columns)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Whether the address lies inside the plate
    pub fn contains(&self, address: WellAddress) -> bool {
        address.row < self.rows && address.column < self.columns
    }

    fn index(&self, address: WellAddress) -> Result<usize, PlateError> {
        if !self.contains(address) {
            return Err(PlateError::OutOfBounds {
                address,
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(address.row * self.columns + address.column)
    }

    fn address_of(&self, index: usize) -> WellAddress {
        WellAddress::new(index / self.columns, index % self.columns)
    }

    /// The slot at an address
    pub fn slot(&self, address: WellAddress) -> Result<&Slot, PlateError> {
        let idx = self.index(address)?;
        Ok(&self.slots[idx])
    }

    /// The part at an address, `None` when the slot is empty
    pub fn part_at(&self, address: WellAddress) -> Result<Option<&Part>, PlateError> {
        Ok(self.slot(address)?.part())
    }

    /// The part at an alphanumeric location such as `"B3"`
    pub fn part_at_label(&self, label: &str) -> Result<Option<&Part>, PlateError> {
        self.part_at(WellAddress::parse(label)?)
    }

    /// All addresses holding a match, in row-major order
    ///
    /// Callers rely on first-match semantics, so the order is part of the
    /// contract: row ascending, then column ascending.
    pub fn find<L: Into<Locator>>(&self, target: L) -> Vec<WellAddress> {
        let locator = target.into();
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.part().is_some_and(|part| locator.matches(part)))
            .map(|(idx, _)| self.address_of(idx))
            .collect()
    }

    /// Alphanumeric labels of every slot holding a match, row-major
    pub fn labels_of<L: Into<Locator>>(&self, target: L) -> Result<Vec<String>, AddressError> {
        self.find(target).iter().map(WellAddress::label).collect()
    }

    /// Put a part into an empty slot
    pub fn place(&mut self, address: WellAddress, part: Part) -> Result<(), PlateError> {
        let idx = self.index(address)?;
        if !self.slots[idx].is_empty() {
            return Err(PlateError::SlotOccupied(address));
        }
        self.slots[idx] = Slot::Occupied(part);
        Ok(())
    }

    /// Empty a slot, returning what it held
    pub fn remove(&mut self, address: WellAddress) -> Result<Option<Part>, PlateError> {
        let idx = self.index(address)?;
        Ok(match std::mem::take(&mut self.slots[idx]) {
            Slot::Empty => None,
            Slot::Occupied(part) => Some(part),
        })
    }

    /// Empty slots in row-major order
    pub fn empty_slots(&self) -> Vec<WellAddress> {
        self.scan(FillOrder::RowMajor)
            .filter(|address| self.slots[address.row * self.columns + address.column].is_empty())
            .collect()
    }

    /// Occupied slots in row-major order
    pub fn filled_slots(&self) -> Vec<WellAddress> {
        self.scan(FillOrder::RowMajor)
            .filter(|address| !self.slots[address.row * self.columns + address.column].is_empty())
            .collect()
    }

    /// Every address in the given scan order
    pub fn scan(&self, order: FillOrder) -> impl Iterator<Item = WellAddress> + '_ {
        let (rows, columns) = (self.rows, self.columns);
        (0..self.capacity()).map(move |i| match order {
            FillOrder::RowMajor => WellAddress::new(i / columns, i % columns),
            FillOrder::ColumnMajor => WellAddress::new(i % rows, i / rows),
        })
    }

    /// Occupied slots with their parts, row-major
    pub fn parts(&self) -> impl Iterator<Item = (WellAddress, &Part)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.part().map(|part| (self.address_of(idx), part)))
    }

    /// Distinct samples on the plate in row-major first-seen order
    pub fn samples(&self) -> Vec<SampleId> {
        let mut seen = Vec::new();
        for (_, part) in self.parts() {
            if !seen.contains(&part.sample) {
                seen.push(part.sample);
            }
        }
        seen
    }

    /// Place parts into empty slots following `order`
    ///
    /// Capacity is checked before anything is placed, so a failing call
    /// leaves the plate untouched. Returns the addresses used, in placement order.
    pub fn fill_sequential(
        &mut self,
        parts: Vec<Part>,
        order: FillOrder,
    ) -> Result<Vec<WellAddress>, PlateError> {
        let available = self.empty_slots().len();
        if parts.len() > available {
            return Err(PlateError::CapacityExceeded {
                requested: parts.len(),
                available,
            });
        }

        let targets: Vec<WellAddress> = self
            .scan(order)
            .filter(|address| self.slots[address.row * self.columns + address.column].is_empty())
            .take(parts.len())
            .collect();

        for (address, part) in targets.iter().zip(parts) {
            self.place(*address, part)?;
        }
        Ok(targets)
    }

    /// Create one new part per sample and place them following `order`
    pub fn fill_samples(
        &mut self,
        samples: &[SampleId],
        order: FillOrder,
    ) -> Result<Vec<WellAddress>, PlateError> {
        let parts = samples.iter().map(|sample| Part::new(*sample)).collect();
        self.fill_sequential(parts, order)
    }
}
