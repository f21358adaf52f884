pub(crate) mod config;
pub use config::{AppConfig, AppConfigError, AuthConfig, Config, GalleryConfig};

pub(crate) mod name;
pub use name::{
    Email, EmailError, MAX_EMAIL_LENGTH, MAX_TITLE_LENGTH, MAX_USERNAME_LENGTH, Title, TitleError,
    Username, UsernameError,
};

pub(crate) mod payload;
pub use payload::Payload;
pub use payload::error::PayloadError;

pub(crate) mod record;
pub(crate) use record::PasswordDigest;
pub use record::{Image, ImageId, Session, User};
