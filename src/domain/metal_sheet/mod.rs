//! Metal sheets: the tile-height/marker settings belonging to a tool.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{MetalSheetId, ToolId, ValidationError};
use crate::domain::history::{Audited, Draft};

/// Press machine a sheet's settings are calibrated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MachineType {
    Sacmi,
    Siti,
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineType::Sacmi => write!(f, "SACMI"),
            MachineType::Siti => write!(f, "SITI"),
        }
    }
}

/// Mutable state of a metal sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetalSheetData {
    tool_id: ToolId,
    machine: MachineType,
    tile_height: f64,
    value: f64,
    marker_height: i32,
    stf: f64,
    stf_max: f64,
}

impl MetalSheetData {
    /// Creates sheet data, checking the measurements.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tool_id: ToolId,
        machine: MachineType,
        tile_height: f64,
        value: f64,
        marker_height: i32,
        stf: f64,
        stf_max: f64,
    ) -> Result<Self, ValidationError> {
        check_measure("tile_height", tile_height)?;
        check_measure("value", value)?;
        check_measure("stf", stf)?;
        check_measure("stf_max", stf_max)?;
        if marker_height < 0 {
            return Err(ValidationError::negative("marker_height", i64::from(marker_height)));
        }
        if stf > stf_max {
            return Err(ValidationError::invalid_format("stf", "exceeds stf_max"));
        }
        Ok(Self {
            tool_id,
            machine,
            tile_height,
            value,
            marker_height,
            stf,
            stf_max,
        })
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool_id
    }

    pub fn machine(&self) -> MachineType {
        self.machine
    }

    pub fn tile_height(&self) -> f64 {
        self.tile_height
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn marker_height(&self) -> i32 {
        self.marker_height
    }

    pub fn stf(&self) -> f64 {
        self.stf
    }

    pub fn stf_max(&self) -> f64 {
        self.stf_max
    }
}

fn check_measure(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::invalid_format(field, "not a finite number"));
    }
    if value < 0.0 {
        return Err(ValidationError::invalid_format(field, "must not be negative"));
    }
    Ok(())
}

/// A metal sheet with its modification history.
pub type MetalSheet = Audited<MetalSheetId, MetalSheetData>;

/// A metal sheet that has not been stored yet.
pub type NewMetalSheet = Draft<MetalSheetData>;
