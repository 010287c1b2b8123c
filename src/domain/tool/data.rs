//! Tool data and the tool entity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{
    Actor, DomainError, ErrorCode, PressNumber, ToolId, ValidationError,
};
use crate::domain::history::{Audited, Draft};

/// Maximum length for a tool code.
pub const MAX_CODE_LENGTH: usize = 64;

/// Largest width or height, in millimetres; sides are stored as `INTEGER`.
pub const MAX_FORMAT_SIDE: u32 = i32::MAX as u32;

/// Width × height of the tiles a tool presses, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolFormat {
    width: u32,
    height: u32,
}

impl ToolFormat {
    pub fn new(width: u32, height: u32) -> Result<Self, ValidationError> {
        check_side("width", width)?;
        check_side("height", height)?;
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

fn check_side(field: &str, value: u32) -> Result<(), ValidationError> {
    if value == 0 || value > MAX_FORMAT_SIDE {
        return Err(ValidationError::out_of_range(
            field,
            1,
            i64::from(MAX_FORMAT_SIDE),
            i64::from(value),
        ));
    }
    Ok(())
}

impl fmt::Display for ToolFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Mutable state of a tool; one snapshot of it per history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolData {
    format: ToolFormat,
    code: String,
    press: Option<PressNumber>,
    regenerating: bool,
}

impl ToolData {
    /// Creates unmounted, in-service tool data.
    ///
    /// The code is trimmed and upper-cased.
    pub fn new(format: ToolFormat, code: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self {
            format,
            code: normalize_code(code.into())?,
            press: None,
            regenerating: false,
        })
    }

    pub fn on_press(mut self, press: PressNumber) -> Self {
        self.press = Some(press);
        self
    }

    pub fn format(&self) -> ToolFormat {
        self.format
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn press(&self) -> Option<PressNumber> {
        self.press
    }

    pub fn is_regenerating(&self) -> bool {
        self.regenerating
    }

    /// True when both describe the same physical tool.
    pub fn same_identity(&self, other: &ToolData) -> bool {
        self.format == other.format && self.code == other.code
    }

    pub fn set_format(&mut self, format: ToolFormat) {
        self.format = format;
    }

    pub fn set_code(&mut self, code: impl Into<String>) -> Result<(), ValidationError> {
        self.code = normalize_code(code.into())?;
        Ok(())
    }

    pub fn set_press(&mut self, press: Option<PressNumber>) {
        self.press = press;
    }
}

fn normalize_code(code: String) -> Result<String, ValidationError> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return Err(ValidationError::empty_field("code"));
    }
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(ValidationError::invalid_format(
            "code",
            format!("longer than {} characters", MAX_CODE_LENGTH),
        ));
    }
    Ok(code)
}

/// A tool with its modification history.
pub type Tool = Audited<ToolId, ToolData>;

/// A tool that has not been stored yet.
pub type NewTool = Draft<ToolData>;

impl Audited<ToolId, ToolData> {
    /// Flips the regenerating flag, recording the change.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the flag already has that value
    pub fn set_regenerating(&mut self, regenerating: bool, actor: Option<&Actor>) -> Result<(), DomainError> {
        let id = self.id();
        self.modify(actor, |data| {
            if data.regenerating == regenerating {
                let state = if regenerating { "already" } else { "not" };
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    format!("Tool {} is {} regenerating", id, state),
                ));
            }
            data.regenerating = regenerating;
            Ok(())
        })
    }

    /// Mounts the tool on a press, or unmounts it with `None`.
    pub fn mount(&mut self, press: Option<PressNumber>, actor: Option<&Actor>) {
        let mut data = self.data().clone();
        data.set_press(press);
        self.replace(data, actor);
    }
}
