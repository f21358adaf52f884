use super::*;

#[test]
fn slot_keys_match_persisted_layout() {
    let keys: Vec<_> = Slot::ALL.iter().map(|s| s.key()).collect();
    assert_eq!(keys, ["users", "images", "currentUser"]);
    assert_eq!(Slot::CurrentUser.to_string(), "currentUser");
}

#[test]
fn unwritten_slot_loads_as_none() {
    let memory = MemoryPersistence::new();
    for slot in Slot::ALL {
        assert!(memory.load(slot).unwrap().is_none());
    }
}

#[test]
fn save_replaces_whole_value() {
    let mut memory = MemoryPersistence::new();
    memory.save(Slot::Images, "[1,2,3]").unwrap();
    memory.save(Slot::Images, "[]").unwrap();

    assert_eq!(memory.load(Slot::Images).unwrap().as_deref(), Some("[]"));
    assert!(memory.load(Slot::Users).unwrap().is_none());
}

#[test]
fn quota_counts_all_slots() {
    let mut memory = MemoryPersistence::with_quota(10);
    memory.save(Slot::Users, "123456").unwrap();

    let err = memory.save(Slot::Images, "12345").unwrap_err();
    assert!(matches!(
        err,
        PersistenceError::QuotaExceeded {
            slot: Slot::Images,
            size: 11,
            quota: 10
        }
    ));

    // Failed write leaves previous contents untouched.
    assert!(memory.load(Slot::Images).unwrap().is_none());
    assert_eq!(memory.used(), 6);

    // Rewriting a slot only counts its new length.
    memory.save(Slot::Users, "1234567890").unwrap();
    assert_eq!(memory.used(), 10);
}

#[test]
fn boxed_backend_delegates() {
    let mut boxed: Box<dyn Persistence> = Box::new(MemoryPersistence::new());
    boxed.save(Slot::CurrentUser, "\"alice\"").unwrap();
    assert_eq!(
        boxed.load(Slot::CurrentUser).unwrap().as_deref(),
        Some("\"alice\"")
    );
}
