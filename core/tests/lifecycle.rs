use gallery_core::types::{Session, Username};
use gallery_core::{Slot, Store, StoreError};
use tempfile::tempdir;

mod common;

use common::{at, data_config, fast_settings, png_payload, write_fast_settings};

#[test]
fn test_full_session_round_trip_on_disk() {
    let tmp = tempdir().unwrap();
    let config = data_config(tmp.path());
    write_fast_settings(&config);

    let alice = Username::try_from("alice").unwrap();
    let (images_before, sunset_id) = {
        let mut store = Store::open_dir(&config).unwrap();
        store
            .register("alice", "a@x.com", "secret1", at(1))
            .unwrap();
        store.register("bob", "b@x.com", "secret2", at(2)).unwrap();
        store.authenticate("alice", "secret1").unwrap();

        let sunset = store
            .upload_image(&alice, png_payload(), "Sunset", "", at(3))
            .unwrap();
        store
            .upload_image(&alice, png_payload(), "Harbor", "fog", at(4))
            .unwrap();

        (store.all_images().to_vec(), sunset.id)
    };

    let mut store = Store::open_dir(&config).unwrap();
    assert!(store.corrupt_state().is_empty());
    assert_eq!(store.all_images(), images_before.as_slice());
    assert_eq!(store.session(), Session::Authenticated(alice.clone()));

    let bob = Username::try_from("bob").unwrap();
    assert!(!store.delete_image(&sunset_id, &bob).unwrap());
    assert!(store.delete_image(&sunset_id, &alice).unwrap());
    store.end_session().unwrap();
    drop(store);

    let store = Store::open_dir(&config).unwrap();
    assert!(store.current_user().is_none());
    let titles: Vec<_> = store
        .images_by_owner(&alice)
        .iter()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(titles, ["Harbor"]);
}

#[test]
fn test_duplicate_detection_after_restart() {
    let tmp = tempdir().unwrap();
    let config = data_config(tmp.path());
    write_fast_settings(&config);

    {
        let mut store = Store::open_dir(&config).unwrap();
        store
            .sign_up("alice", "a@x.com", "secret1", at(1))
            .unwrap();
    }

    let mut store = Store::open_dir(&config).unwrap();
    assert!(matches!(
        store.register("alice", "z@x.com", "secret1", at(2)),
        Err(StoreError::DuplicateUsername(_))
    ));
    assert!(matches!(
        store.register("zed", "A@X.COM", "secret1", at(2)),
        Err(StoreError::DuplicateEmail(_))
    ));
    assert!(matches!(
        store.authenticate("alice", "wrong"),
        Err(StoreError::InvalidCredentials)
    ));
    assert_eq!(store.current_user().map(|u| u.as_str()), Some("alice"));
}

#[test]
fn test_persisted_layout_is_json() {
    use gallery_core::{MemoryPersistence, Persistence};

    let mut store = Store::open(MemoryPersistence::new(), fast_settings()).unwrap();
    let alice = store
        .sign_up("alice", "a@x.com", "secret1", at(1))
        .unwrap();
    store
        .upload_image(&alice, png_payload(), "Sunset", "", at(2))
        .unwrap();

    let persistence = store.into_persistence();

    let users: serde_json::Value =
        serde_json::from_str(&persistence.load(Slot::Users).unwrap().unwrap()).unwrap();
    let record = &users["alice"];
    assert_eq!(record["username"], "alice");
    assert_eq!(record["email"], "a@x.com");
    assert!(
        record["passwordDigest"]
            .as_str()
            .unwrap()
            .starts_with("$argon2id$")
    );
    assert!(record.get("createdAt").is_some());

    let images: serde_json::Value =
        serde_json::from_str(&persistence.load(Slot::Images).unwrap().unwrap()).unwrap();
    let image = &images[0];
    assert_eq!(image["owner"], "alice");
    assert_eq!(image["title"], "Sunset");
    assert!(image["description"].is_null());
    assert!(
        image["payload"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );
    assert!(image.get("uploadedAt").is_some());

    assert_eq!(
        persistence.load(Slot::CurrentUser).unwrap().as_deref(),
        Some("\"alice\"")
    );
}
