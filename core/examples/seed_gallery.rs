//! Populates a gallery data directory with demo users and images.
//!
//! Run with: `cargo run -q --example seed_gallery -p gallery_core [data-dir]`
//! Set `RUST_LOG=gallery_core=debug` to see store activity.

use gallery_core::Store;
use gallery_core::types::{Config, Payload, Username};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing_subscriber::EnvFilter;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let base_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("gallery-demo"));
    println!("Using data path: {}", base_path.display());

    let config = Config { base_path };
    let mut store = Store::open_dir(&config).expect("Failed to open gallery");
    let now = SystemTime::now();

    println!("\n[Users]");
    seed_users(&mut store, now);

    println!("\n[Images]");
    seed_images(&mut store, now);

    println!("\n[Session]");
    match store.authenticate("ada", "lovelace1") {
        Ok(username) => println!("  Signed in: {}", username),
        Err(e) => println!("  Sign-in failed ({})", e),
    }

    println!(
        "\nGallery now has {} images; current user: {}",
        store.all_images().len(),
        store
            .current_user()
            .map(|u| u.as_str())
            .unwrap_or("<anonymous>")
    );
}

fn seed_users(store: &mut Store<gallery_core::RedbPersistence>, now: SystemTime) {
    let users = [
        ("ada", "ada@example.com", "lovelace1"),
        ("grace", "grace@example.com", "hopper42"),
        ("alan", "alan@example.com", "turing1912"),
    ];

    for (username, email, password) in users {
        match store.register(username, email, password, now) {
            Ok(_) => println!("  Registered: {}", username),
            Err(e) => println!("  Skipped {} ({})", username, e),
        }
    }
}

fn seed_images(store: &mut Store<gallery_core::RedbPersistence>, now: SystemTime) {
    let images = [
        ("ada", PNG_MAGIC, "Analytical Engine", "Sketch of the mill"),
        ("ada", JPEG_MAGIC, "Notes G", ""),
        ("grace", PNG_MAGIC, "First Bug", "Relay #70, panel F"),
        ("alan", JPEG_MAGIC, "Bombe", "Bletchley Park, 1940"),
    ];

    for (offset, (owner, magic, title, description)) in images.into_iter().enumerate() {
        let owner = Username::try_from(owner).expect("Invalid username");
        let mut bytes = magic.to_vec();
        bytes.resize(256, 0);
        let payload = Payload::from_bytes(bytes).expect("Invalid payload");

        let uploaded_at = now + Duration::from_secs(offset as u64);
        match store.upload_image(&owner, payload, title, description, uploaded_at) {
            Ok(image) => println!("  Uploaded: {} by @{} ({})", image.title, owner, image.id),
            Err(e) => println!("  Skipped {} ({})", title, e),
        }
    }
}
