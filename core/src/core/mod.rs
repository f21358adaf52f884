//! Gallery store: user registry, image collection and session pointer.
//!
//! State is read once from a [`Persistence`] backend when the store is opened.
//! Every mutation rewrites the affected slot before returning; if that write
//! fails the in-memory change is undone, so callers never observe state that
//! was not persisted.

use crate::core::credential::CredentialHasher;
use crate::core::persistence::db::RedbPersistence;
use crate::core::persistence::{Persistence, Slot};
use crate::types::{
    AppConfig, Config, Email, Image, ImageId, Payload, Session, Title, User, Username,
};
use error::{CorruptState, StoreError, ValidationError};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::SystemTime;
use tracing::{debug, info, warn};

pub(crate) mod credential;
pub mod persistence;

pub mod error {
    use crate::core::credential::error::CredentialError;
    use crate::core::persistence::Slot;
    use crate::core::persistence::error::PersistenceError;
    use crate::types::{
        AppConfigError, Email, EmailError, ImageId, PayloadError, TitleError, Username,
        UsernameError,
    };
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum StoreError {
        #[error("Username already exists: {0}")]
        DuplicateUsername(Username),

        #[error("Email already registered: {0}")]
        DuplicateEmail(Email),

        #[error("Invalid credentials")]
        InvalidCredentials,

        #[error("Image not found: {0}")]
        ImageNotFound(ImageId),

        #[error("Image {id} belongs to another user")]
        Forbidden { id: ImageId },

        #[error("Validation error: {0}")]
        Validation(#[from] ValidationError),

        #[error("Persistence error: {0}")]
        Persistence(#[from] PersistenceError),

        #[error(transparent)]
        CorruptState(#[from] CorruptState),

        #[error("Credential error: {0}")]
        Credential(#[from] CredentialError),

        #[error("Config error: {0}")]
        Config(#[from] AppConfigError),

        #[error("Serialization error: {0}")]
        Serialize(#[from] serde_json::Error),
    }

    #[derive(Debug, Error)]
    pub enum ValidationError {
        #[error("invalid username: {0}")]
        InvalidUsername(#[from] UsernameError),

        #[error("invalid email: {0}")]
        InvalidEmail(#[from] EmailError),

        #[error("invalid title: {0}")]
        InvalidTitle(#[from] TitleError),

        #[error("password must be at least {min} characters")]
        PasswordTooShort { min: usize },

        #[error("invalid payload: {0}")]
        Payload(#[from] PayloadError),

        #[error("payload too large: {size} bytes exceeds {max} bytes")]
        PayloadTooLarge { size: u64, max: u64 },
    }

    /// A persisted slot that could not be read back. The store treats the
    /// slot as empty and keeps going.
    ///
    /// `raw` holds the document as it was loaded, since the next mutation of
    /// the slot overwrites it in the backend.
    #[derive(Debug, Clone, Error)]
    #[error("Corrupt {slot} state: {reason}")]
    pub struct CorruptState {
        pub slot: Slot,
        pub reason: String,
        pub raw: String,
    }
}

pub struct Store<P> {
    persistence: P,
    hasher: CredentialHasher,
    settings: AppConfig,
    users: BTreeMap<Username, User>,
    images: Vec<Image>,
    current_user: Option<Username>,
    corrupt: Vec<CorruptState>,
}

impl Store<RedbPersistence> {
    /// Opens the gallery kept in `config.base_path`, applying `config.toml`
    /// when present.
    pub fn open_dir(config: &Config) -> Result<Self, StoreError> {
        let settings = AppConfig::load(&config.settings_path())?;
        for problem in settings.validate() {
            warn!(%problem, "invalid setting, falling back to default");
        }

        let persistence = RedbPersistence::open(config)?;
        Self::open(persistence, settings.with_defaults_for_invalid())
    }
}

impl<P: Persistence> Store<P> {
    /// Loads all three slots. Malformed slots are logged, recorded in
    /// [`Store::corrupt_state`] and treated as empty.
    pub fn open(persistence: P, settings: AppConfig) -> Result<Self, StoreError> {
        let hasher = CredentialHasher::new(&settings.auth)?;
        let mut corrupt = Vec::new();

        let users: BTreeMap<Username, User> =
            load_slot(&persistence, Slot::Users, &mut corrupt)?.unwrap_or_default();
        let images: Vec<Image> =
            load_slot(&persistence, Slot::Images, &mut corrupt)?.unwrap_or_default();
        let mut current_user =
            load_slot::<Option<Username>, _>(&persistence, Slot::CurrentUser, &mut corrupt)?
                .flatten();

        if let Some(username) = &current_user
            && !users.contains_key(username)
        {
            let state = CorruptState {
                slot: Slot::CurrentUser,
                reason: format!("session references unknown user {username}"),
                raw: serde_json::to_string(username)?,
            };
            warn!(%state, "resetting session to anonymous");
            corrupt.push(state);
            current_user = None;
        }

        info!(
            users = users.len(),
            images = images.len(),
            signed_in = current_user.is_some(),
            "gallery store opened"
        );

        Ok(Self {
            persistence,
            hasher,
            settings,
            users,
            images,
            current_user,
            corrupt,
        })
    }

    /// Like [`Store::open`], but fails on the first corrupt slot.
    pub fn open_strict(persistence: P, settings: AppConfig) -> Result<Self, StoreError> {
        let store = Self::open(persistence, settings)?;
        if let Some(state) = store.corrupt.first() {
            return Err(state.clone().into());
        }
        Ok(store)
    }

    /// Slots that were malformed when the store was opened.
    pub fn corrupt_state(&self) -> &[CorruptState] {
        &self.corrupt
    }

    pub fn settings(&self) -> &AppConfig {
        &self.settings
    }

    /// Releases the backend, e.g. to reopen a store over the same values.
    pub fn into_persistence(self) -> P {
        self.persistence
    }
}

/// Account operations.
impl<P: Persistence> Store<P> {
    /// Creates a user. Does not sign the user in.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        now: SystemTime,
    ) -> Result<Username, StoreError> {
        let username = Username::try_new(username).map_err(ValidationError::from)?;
        let email = Email::try_new(email).map_err(ValidationError::from)?;

        let min = self.settings.auth.min_password_length;
        if password.chars().count() < min {
            return Err(ValidationError::PasswordTooShort { min }.into());
        }

        if self.users.contains_key(&username) {
            return Err(StoreError::DuplicateUsername(username));
        }
        if self.users.values().any(|user| user.email == email) {
            return Err(StoreError::DuplicateEmail(email));
        }

        let user = User {
            username: username.clone(),
            email,
            password_digest: self.hasher.hash(password)?,
            created_at: now,
        };
        self.users.insert(username.clone(), user);

        if let Err(err) = self.persist_users() {
            self.users.remove(&username);
            return Err(err);
        }

        debug!(%username, "registered user");
        Ok(username)
    }

    /// Registers and immediately signs the new user in.
    pub fn sign_up(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        now: SystemTime,
    ) -> Result<Username, StoreError> {
        let username = self.register(username, email, password, now)?;
        self.authenticate(username.as_str(), password)
    }

    /// Signs a user in. Unknown users and wrong passwords are indistinguishable
    /// to the caller, and the session is left untouched on failure.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<Username, StoreError> {
        let user = Username::try_new(username)
            .ok()
            .and_then(|username| self.users.get(&username))
            .ok_or(StoreError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_digest) {
            debug!(username = %user.username, "rejected credentials");
            return Err(StoreError::InvalidCredentials);
        }

        let username = user.username.clone();
        let previous = self.current_user.replace(username.clone());

        if let Err(err) = self.persist_session() {
            self.current_user = previous;
            return Err(err);
        }

        info!(%username, "signed in");
        Ok(username)
    }

    /// Clears the session. Signing out while anonymous is a no-op write.
    pub fn end_session(&mut self) -> Result<(), StoreError> {
        let previous = self.current_user.take();

        if let Err(err) = self.persist_session() {
            self.current_user = previous;
            return Err(err);
        }

        if let Some(username) = previous {
            info!(%username, "signed out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&Username> {
        self.current_user.as_ref()
    }

    pub fn session(&self) -> Session {
        Session::from(self.current_user.clone())
    }

    pub fn user(&self, username: &Username) -> Option<&User> {
        self.users.get(username)
    }
}

/// Image operations.
impl<P: Persistence> Store<P> {
    /// Stores a new image. The owner is not checked against the user registry.
    pub fn upload_image(
        &mut self,
        owner: &Username,
        payload: Payload,
        title: &str,
        description: &str,
        now: SystemTime,
    ) -> Result<Image, StoreError> {
        let title = Title::try_new(title).map_err(ValidationError::from)?;

        let size = payload.len() as u64;
        let max = self.settings.gallery.max_payload_bytes;
        if size > max {
            return Err(ValidationError::PayloadTooLarge { size, max }.into());
        }

        let description = (!description.trim().is_empty()).then(|| description.to_string());

        let image = Image {
            id: self.fresh_image_id(),
            owner: owner.clone(),
            payload,
            title,
            description,
            uploaded_at: now,
        };
        self.images.push(image.clone());

        if let Err(err) = self.persist_images() {
            self.images.pop();
            return Err(err);
        }

        debug!(id = %image.id, %owner, size, "uploaded image");
        Ok(image)
    }

    /// Same as [`Store::upload_image`] for content already encoded as a
    /// base64 `data:` URL.
    pub fn upload_data_url(
        &mut self,
        owner: &Username,
        data_url: &str,
        title: &str,
        description: &str,
        now: SystemTime,
    ) -> Result<Image, StoreError> {
        let payload = Payload::from_data_url(data_url).map_err(ValidationError::from)?;
        self.upload_image(owner, payload, title, description, now)
    }

    /// Removes the owner's image.
    ///
    /// Returns `Err(ImageNotFound)` if no image has this id.
    /// Returns `Err(Forbidden)` if the image belongs to someone else.
    pub fn remove_image(&mut self, id: &ImageId, owner: &Username) -> Result<Image, StoreError> {
        let index = self
            .images
            .iter()
            .position(|image| image.id == *id)
            .ok_or(StoreError::ImageNotFound(*id))?;

        if self.images[index].owner != *owner {
            debug!(%id, %owner, "refused to delete another user's image");
            return Err(StoreError::Forbidden { id: *id });
        }

        let image = self.images.remove(index);

        if let Err(err) = self.persist_images() {
            self.images.insert(index, image);
            return Err(err);
        }

        debug!(%id, %owner, "deleted image");
        Ok(image)
    }

    /// Returns whether the owner's image was removed. Unknown ids and other
    /// users' images yield `false`; only persistence failures are errors.
    pub fn delete_image(&mut self, id: &ImageId, owner: &Username) -> Result<bool, StoreError> {
        match self.remove_image(id, owner) {
            Ok(_) => Ok(true),
            Err(StoreError::ImageNotFound(_) | StoreError::Forbidden { .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn fresh_image_id(&self) -> ImageId {
        loop {
            let id = ImageId::generate();
            if !self.images.iter().any(|image| image.id == id) {
                return id;
            }
        }
    }
}

/// Read operations.
impl<P: Persistence> Store<P> {
    /// All images in storage order.
    pub fn all_images(&self) -> &[Image] {
        &self.images
    }

    pub fn image(&self, id: &ImageId) -> Option<&Image> {
        self.images.iter().find(|image| image.id == *id)
    }

    /// The owner's images in storage order.
    pub fn images_by_owner(&self, owner: &Username) -> Vec<&Image> {
        self.images
            .iter()
            .filter(|image| image.owner == *owner)
            .collect()
    }

    /// The owner's images, newest upload first.
    pub fn gallery(&self, owner: &Username) -> Vec<&Image> {
        let mut images = self.images_by_owner(owner);
        images.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        images
    }

    /// Up to `gallery.showcase_size` images picked at random, in random order.
    pub fn showcase<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&Image> {
        let mut picked: Vec<&Image> = self
            .images
            .choose_multiple(rng, self.settings.gallery.showcase_size)
            .collect();
        picked.shuffle(rng);
        picked
    }
}

/// Persistence helpers.
impl<P: Persistence> Store<P> {
    fn persist_users(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.users)?;
        self.persistence.save(Slot::Users, &json)?;
        Ok(())
    }

    fn persist_images(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.images)?;
        self.persistence.save(Slot::Images, &json)?;
        Ok(())
    }

    fn persist_session(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.current_user)?;
        self.persistence.save(Slot::CurrentUser, &json)?;
        Ok(())
    }
}

fn load_slot<T: DeserializeOwned, P: Persistence + ?Sized>(
    persistence: &P,
    slot: Slot,
    corrupt: &mut Vec<CorruptState>,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = persistence.load(slot)? else {
        return Ok(None);
    };

    let parsed: Result<T, _> = serde_json::from_str(&raw);
    match parsed {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            let state = CorruptState {
                slot,
                reason: err.to_string(),
                raw,
            };
            warn!(%state, "treating slot as empty");
            corrupt.push(state);
            Ok(None)
        }
    }
}
