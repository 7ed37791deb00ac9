use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Misuse of the layout API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("grid unit must be finite and positive, got {axis}={value}")]
    InvalidGridUnit { axis: char, value: f64 },

    #[error("percent grid needs at least one cell")]
    EmptyPercentGrid,

    #[error("no layout handler registered as {name:?}")]
    UnknownHandler { name: String },
}

#[cfg(test)]
mod tests {
    use super::LayoutError;

    #[test]
    fn messages_name_the_offending_value() {
        let error = LayoutError::InvalidGridUnit {
            axis: 'x',
            value: -2.0,
        };
        assert_eq!(
            error.to_string(),
            "grid unit must be finite and positive, got x=-2"
        );
        let error = LayoutError::UnknownHandler {
            name: "masonry".into(),
        };
        assert_eq!(error.to_string(), "no layout handler registered as \"masonry\"");
    }
}
