use thiserror::Error;

/// Everything that can make a render call fail.
///
/// Missing or unknown inputs are not errors: they resolve to documented
/// defaults before a render starts. What remains is input that cannot be
/// interpreted at all, plus backend failures while encoding output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid date for `{field}`: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid canvas: {0}")]
    InvalidCanvas(String),
    #[error("invalid `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("rasterization failed: {0}")]
    Raster(String),
}

impl RenderError {
    pub fn invalid_date(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidDate {
            field,
            value: value.into(),
        }
    }

    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
