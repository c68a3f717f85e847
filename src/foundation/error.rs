pub type ScanlineResult<T> = Result<T, ScanlineError>;

#[derive(thiserror::Error, Debug)]
pub enum ScanlineError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error("render error: {0}")]
    Render(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScanlineError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            ScanlineError::parse("x")
                .to_string()
                .contains("parse error:")
        );
        assert!(
            ScanlineError::animation("x")
                .to_string()
                .contains("animation error:")
        );
        assert!(
            ScanlineError::render("x")
                .to_string()
                .contains("render error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = ScanlineError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
