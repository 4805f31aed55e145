//! A host's view: keep a recency list, arrange a window, move tabs between
//! windows, all through the facade.

use tabweave::prelude::*;
use tabweave::{ArrangeError, Error};

fn id(raw: u64) -> ItemId {
    ItemId::new(raw)
}

fn window(ids: &[u64], highlighted: u64) -> Snapshot {
    Snapshot::from_sequence(
        ids.iter().map(|&raw| {
            let item = Item::new(id(raw));
            if raw == highlighted {
                item.highlighted()
            } else {
                item
            }
        }),
        [],
        Some(id(highlighted)),
    )
}

#[test]
fn activation_history_drives_cycling() -> Result<()> {
    let arranger = Arranger::default();
    let mut recent = RecencyTracker::new();
    let mut snapshot = window(&[1, 2, 3], 1);
    recent.touch(id(1));

    for _ in 0..3 {
        let selection = arranger.cycle_active(&snapshot, Direction::Forward)?;
        snapshot = selection.to_plan(&snapshot).apply(&snapshot)?;
        recent.touch(selection.active);
    }
    assert_eq!(snapshot.active, Some(id(1)));
    assert_eq!(recent.to_ordered_list(), vec![id(1), id(3), id(2)]);

    // The host closes tab 3 and restarts from its persisted history.
    recent.remove(&id(3));
    let json = serde_json::to_string(&recent.snapshot()).expect("serialize");
    let restored: RecencyTracker<ItemId> = RecencyTracker::restore(serde_json::from_str(&json).expect("deserialize"));
    assert_eq!(restored.to_ordered_list(), vec![id(1), id(2)]);
    Ok(())
}

#[test]
fn moving_tabs_between_windows() -> Result<()> {
    let source = window(&[1, 2, 3], 2);
    let target = window(&[10, 11], 10);
    let transfer = Arranger::default().move_to_sequence(&source, &target)?;
    let (left, arrived) = transfer.apply(&source, &target)?;
    assert_eq!(left.active, Some(id(3)));
    assert_eq!(arrived.position(id(2)), Some(2));
    assert_eq!(arrived.active, Some(id(2)));
    Ok(())
}

#[test]
fn errors_convert_into_facade_error() {
    let broken = Snapshot::from_sequence([Item::new(id(1))], [], None);
    let err: Error = Arranger::default()
        .move_one_step(&broken, Direction::Forward)
        .map_err(Error::from)
        .expect_err("no selection");
    assert!(matches!(
        err,
        Error::Arrange(ArrangeError::EmptySelection { active: None })
    ));
    assert!(std::error::Error::source(&err).is_some());
}

#[cfg(feature = "config-file")]
#[test]
fn config_loads_by_extension() -> Result<()> {
    let dir = tempfile::tempdir().expect("tempdir");
    let toml_path = dir.path().join("tabweave.toml");
    std::fs::write(&toml_path, "wrap_activation = false\n").expect("write");
    assert!(!tabweave::load_config(&toml_path)?.wrap_activation);

    let json_path = dir.path().join("tabweave.json");
    std::fs::write(&json_path, r#"{"conserve_pins": false}"#).expect("write");
    assert!(!tabweave::load_config(&json_path)?.conserve_pins);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"max_items": 0}"#).expect("write");
    assert!(matches!(tabweave::load_config(&bad), Err(Error::Config(_))));
    Ok(())
}
