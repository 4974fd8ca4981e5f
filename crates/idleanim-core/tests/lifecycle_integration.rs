//! End-to-end lifecycle tests against a manifest on disk.
//!
//! Each test lays out an asset directory in a tempdir, loads it through
//! `Config`/`ManifestCatalog` and drives the manager with a `ManualTimer`.

use std::path::Path;
use std::sync::Arc;

use idleanim_core::catalog::{
    ASSET_META_FILE, BAD_BATTERY_ANIMATION_NAME, FALLBACK_ANIMATION_NAME, NO_SD_ANIMATION_NAME,
};
use idleanim_core::{
    AnimationManager, CatalogConfig, Config, Event, HeadlessDisplay, IdleTimer, ManagerConfig,
    ManagerInput, ManagerState, ManifestCatalog, ManualTimer, ProgressionStats, SignalHub, Signals,
    StorageStatus,
};

type Manager = AnimationManager<ManifestCatalog, HeadlessDisplay, ManualTimer>;

// ============================================================================
// Test Helpers
// ============================================================================

fn write_manifest(dir: &Path, body: &str) {
    std::fs::write(dir.join("manifest.toml"), body).unwrap();
}

fn write_asset(dir: &Path, name: &str, duration_secs: u32) {
    let asset_dir = dir.join(name);
    std::fs::create_dir_all(&asset_dir).unwrap();
    std::fs::write(
        asset_dir.join(ASSET_META_FILE),
        format!(
            "duration_secs = {duration_secs}\nframe_rate = 4\nframes = [\"frame_0\", \"frame_1\"]\n"
        ),
    )
    .unwrap();
}

fn catalog_config(dir: &Path) -> CatalogConfig {
    CatalogConfig {
        asset_dir: Some(dir.display().to_string()),
        ..CatalogConfig::default()
    }
}

fn manager(catalog: ManifestCatalog, hub: &Arc<SignalHub>, seed: u64) -> Manager {
    AnimationManager::new(
        catalog,
        HeadlessDisplay::new(),
        ManualTimer::new(),
        Signals::from_hub(Arc::clone(hub)),
        &ManagerConfig {
            rng_seed: Some(seed),
            ..ManagerConfig::default()
        },
    )
}

/// Run the live idle timer to expiry and apply it; returns the new name.
fn expire(manager: &mut Manager) -> String {
    let armed = manager.timer().last_armed_ms().unwrap();
    let token = manager.timer_mut().advance(armed).unwrap();
    match manager.handle(ManagerInput::TimerExpired(token)) {
        Some(Event::IdleStarted { name, .. }) => name,
        other => panic!("expected IdleStarted, got {other:?}"),
    }
}

fn rotation(manager: &mut Manager, rounds: usize) -> Vec<String> {
    (0..rounds).map(|_| expire(manager)).collect()
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn level_bounds_gate_manifest_animations() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "[[animation]]\nname = \"L3_Lab_128x64\"\nweight = 1000\nmin_level = 3\n",
    );
    write_asset(dir.path(), "L3_Lab_128x64", 20);

    let hub = Arc::new(SignalHub::new());
    let mut manager = manager(ManifestCatalog::from_config(&catalog_config(dir.path())), &hub, 5);
    assert_eq!(manager.catalog().manifest_len(), 1);

    let names = rotation(&mut manager, 20);
    assert!(names.iter().all(|n| n == FALLBACK_ANIMATION_NAME));

    hub.set_progression(ProgressionStats {
        level: 3,
        mood: 0,
        level_up_pending: false,
    });
    let names = rotation(&mut manager, 20);
    assert!(names.iter().any(|n| n == "L3_Lab_128x64"));
    assert_eq!(manager.timer().last_armed_ms().map(|ms| ms > 0), Some(true));
}

#[test]
fn undecodable_asset_falls_back_to_tv() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(
        dir.path(),
        "[[animation]]\nname = \"L1_Broken_128x64\"\nweight = 1000\n",
    );

    let hub = Arc::new(SignalHub::new());
    let mut manager = manager(ManifestCatalog::from_config(&catalog_config(dir.path())), &hub, 9);

    assert_eq!(manager.current_name(), Some(FALLBACK_ANIMATION_NAME));
    let names = rotation(&mut manager, 10);
    assert!(names.iter().all(|n| n == FALLBACK_ANIMATION_NAME));
}

#[test]
fn missing_manifest_degrades_to_builtins() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = ManifestCatalog::from_config(&catalog_config(dir.path()));
    assert_eq!(catalog.manifest_len(), 0);

    let hub = Arc::new(SignalHub::new());
    let manager = manager(catalog, &hub, 1);
    assert_eq!(manager.current_name(), Some(FALLBACK_ANIMATION_NAME));
}

#[test]
fn low_battery_animation_only_when_battery_unhealthy() {
    let hub = Arc::new(SignalHub::new());
    let mut manager = manager(ManifestCatalog::builtin_only(), &hub, 21);
    let names = rotation(&mut manager, 30);
    assert!(names.iter().all(|n| n != BAD_BATTERY_ANIMATION_NAME));

    hub.set_battery_healthy(false);
    let names = rotation(&mut manager, 30);
    assert!(names.iter().any(|n| n == BAD_BATTERY_ANIMATION_NAME));
}

#[test]
fn no_card_animation_only_when_card_missing() {
    let hub = Arc::new(SignalHub::new());
    hub.set_storage_status(StorageStatus::NotReady);
    let mut manager = manager(ManifestCatalog::builtin_only(), &hub, 4);

    let names = rotation(&mut manager, 30);
    assert!(names.iter().any(|n| n == NO_SD_ANIMATION_NAME));
    assert!(names.iter().all(|n| n != BAD_BATTERY_ANIMATION_NAME));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn configured_service_survives_card_swap_and_freeze() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), "[[animation]]\nname = \"L1_Waves_128x50\"\nweight = 3\n");
    write_asset(dir.path(), "L1_Waves_128x50", 8);

    let config_path = dir.path().join("config.toml");
    let mut config = Config::load_from(&config_path).unwrap();
    config
        .set("catalog.asset_dir", &dir.path().display().to_string())
        .unwrap();
    config.set("manager.rng_seed", "77").unwrap();
    config.save_to(&config_path).unwrap();
    let config = Config::load_from(&config_path).unwrap();

    let hub = Arc::new(SignalHub::new());
    let mut manager = AnimationManager::new(
        ManifestCatalog::from_config(&config.catalog),
        HeadlessDisplay::new(),
        ManualTimer::new(),
        Signals::from_hub(Arc::clone(&hub)),
        &config.manager,
    );
    assert_eq!(manager.state(), ManagerState::Idle);

    // Pull the card, then put it back.
    hub.set_storage_status(StorageStatus::NotReady);
    assert_eq!(manager.handle(ManagerInput::SignalChanged), None);
    hub.set_storage_status(StorageStatus::Ok);
    assert!(matches!(
        manager.handle(ManagerInput::SignalChanged),
        Some(Event::BlockingShown { .. })
    ));

    // Another UI layer takes over while the notification is up.
    manager.suspend();
    assert_eq!(manager.state(), ManagerState::FrozenBlocked);
    assert!(manager.display().is_frozen());
    manager.resume();
    assert_eq!(manager.state(), ManagerState::Blocked);

    manager.handle(ManagerInput::Interaction);
    assert_eq!(manager.state(), ManagerState::Idle);
    assert!(manager.timer().is_armed());
    assert!(manager.is_consistent());
}
