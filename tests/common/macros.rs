/// Asserts that an entity with the given ID is still registered.
#[macro_export]
macro_rules! assert_entity_alive {
    ($world:expr, $id:expr) => {
        assert!(
            $world.get($id).is_some(),
            "Entity {} should be alive but was not found",
            $id
        );
    };
}

/// Asserts that an entity with the given ID is no longer registered.
#[macro_export]
macro_rules! assert_entity_removed {
    ($world:expr, $id:expr) => {
        assert!(
            $world.get($id).is_none(),
            "Entity {} should be removed but was found",
            $id
        );
    };
}

/// Asserts the hostile and survivor head counts shown in the HUD.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, hostiles = $hostiles:expr, survivors = $survivors:expr) => {
        let hud = $world.hud();
        assert_eq!(hud.hostiles, $hostiles, "Hostile count mismatch");
        assert_eq!(hud.survivors, $survivors, "Survivor count mismatch");
    };
}

/// Asserts that an entity is in the given brain mode.
#[macro_export]
macro_rules! assert_mode {
    ($world:expr, $id:expr, $mode:expr) => {
        let actual = $world.get($id).and_then(|e| e.mode());
        assert_eq!(actual, Some($mode), "Entity {} is in the wrong mode", $id);
    };
}
