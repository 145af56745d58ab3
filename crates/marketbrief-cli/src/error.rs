use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] marketbrief_core::ConfigError),

    #[error(transparent)]
    Pipeline(#[from] marketbrief_core::PipelineError),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Pipeline(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use marketbrief_core::ConfigError;

    use super::*;

    #[test]
    fn config_errors_map_to_exit_code_2() {
        let error = CliError::from(ConfigError::MissingField {
            path: String::from("assets[0].symbol"),
        });
        assert_eq!(error.exit_code(), 2);
    }
}
