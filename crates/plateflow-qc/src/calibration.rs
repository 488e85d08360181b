//! Two-point standard curve for plate reader fluorescence

use crate::QcError;
use plateflow_domain::{MeasurementKey, MeasurementStore, Plate, WellAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Dilution factor assumed when a plate was read undiluted
pub const DEFAULT_DILUTION_FACTOR: f64 = 100.0;

/// A standard of known concentration and its measured fluorescence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardPoint {
    /// Concentration of the standard (ng/ul)
    pub concentration: f64,
    /// Fluorescence read for it
    pub fluorescence: f64,
}

impl StandardPoint {
    /// Create a point
    pub fn new(concentration: f64, fluorescence: f64) -> Self {
        Self {
            concentration,
            fluorescence,
        }
    }
}

/// Line through two standards mapping fluorescence to concentration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardCurve {
    /// Concentration per unit of fluorescence
    pub slope: f64,
    /// Concentration at zero fluorescence
    pub intercept: f64,
}

impl StandardCurve {
    /// Fit the line through two standards
    ///
    /// The standard with the lower concentration is taken as the first point
    /// whatever order they are given in.
    pub fn from_standards(a: StandardPoint, b: StandardPoint) -> Result<Self, QcError> {
        let finite = [a.concentration, a.fluorescence, b.concentration, b.fluorescence]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(QcError::Calibration(
                "standards must be finite numbers".to_string(),
            ));
        }

        let (low, high) = if a.concentration > b.concentration {
            (b, a)
        } else {
            (a, b)
        };
        if low.fluorescence == high.fluorescence {
            return Err(QcError::Calibration(format!(
                "standards share fluorescence {}; slope is undefined",
                low.fluorescence
            )));
        }

        let slope =
            (high.concentration - low.concentration) / (high.fluorescence - low.fluorescence);
        let intercept = low.concentration - slope * low.fluorescence;
        Ok(Self { slope, intercept })
    }

    /// Concentration for a reading, scaled by dilution, to one decimal
    pub fn concentration(&self, fluorescence: f64, dilution: f64) -> f64 {
        round1((fluorescence * self.slope + self.intercept) * dilution / 1000.0)
    }

    /// Write a concentration for every part that has a fluorescence reading
    ///
    /// Parts without a dilution factor use `DEFAULT_DILUTION_FACTOR`.
    /// Returns the number of concentrations written.
    pub fn apply(&self, plate: &Plate, store: &mut MeasurementStore) -> usize {
        let mut written = 0;
        for (_, part) in plate.parts() {
            let Some(fluorescence) = store.get(part.id, MeasurementKey::Fluorescence) else {
                continue;
            };
            let dilution = store
                .get(part.id, MeasurementKey::DilutionFactor)
                .unwrap_or(DEFAULT_DILUTION_FACTOR);
            store.record(
                part.id,
                MeasurementKey::Concentration,
                self.concentration(fluorescence, dilution),
            );
            written += 1;
        }
        debug!(plate = %plate.id(), written, "concentrations calculated");
        written
    }
}

/// Dilution map giving every occupied well the same factor, row-major
pub fn uniform_dilution_map(plate: &Plate, factor: f64) -> Vec<(WellAddress, f64)> {
    plate
        .filled_slots()
        .into_iter()
        .map(|address| (address, factor))
        .collect()
}

/// Concentration for every well of the dilution map
///
/// Each well in `dilution` must have a fluorescence reading.
pub fn concentrations(
    curve: &StandardCurve,
    fluorescence: &[(WellAddress, f64)],
    dilution: &[(WellAddress, f64)],
) -> Result<Vec<(WellAddress, f64)>, QcError> {
    let readings: HashMap<WellAddress, f64> = fluorescence.iter().copied().collect();
    dilution
        .iter()
        .map(|&(address, factor)| {
            readings
                .get(&address)
                .map(|&reading| (address, curve.concentration(reading, factor)))
                .ok_or_else(|| {
                    QcError::Calibration(format!("no fluorescence reading for well {}", address))
                })
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
