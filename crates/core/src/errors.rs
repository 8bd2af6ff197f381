use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::platform::Platform;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(
        "unknown platform `{0}` (expected all|talabat|careem|noon|deliveroo|dine-in)"
    )]
    UnknownPlatform(String),
    #[error("unknown customer type `{0}` (expected new|repeat|premium)")]
    UnknownCustomerType(String),
    #[error("unknown payment method `{0}` (expected cash|online)")]
    UnknownPaymentMethod(String),
    #[error("menu is not listed on platform {0}")]
    PlatformNotListed(Platform),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl ApplicationError {
    /// Stable class name used in structured command output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "invalid_input",
            Self::Configuration(_) => "config_validation",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::PlatformNotListed(_)) => {
                "The menu is only listed on delivery platforms. Pick one of them or `all`."
            }
            Self::Domain(_) => "The request could not be processed. Check inputs and try again.",
            Self::Configuration(_) => {
                "Configuration is invalid. Run `menulytics config` to inspect effective values."
            }
        }
    }
}
