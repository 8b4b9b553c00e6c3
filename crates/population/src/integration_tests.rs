use bevy::prelude::*;

use crate::capacity::{BuildingCapacity, BuildingLevel};
use crate::config::HOST_NATIVE;
use crate::config_actions::{ConfigAction, ConfigQueue, PopConfigChanged};
use crate::prefab::test_prefabs::{prefab, residential, school};
use crate::prefab::{BuildingPrefab, SchoolLevel, Service, SubService};
use crate::{PopData, PopulationPlugin, SaveableRegistry};

fn app() -> App {
    let mut app = App::new();
    app.add_plugins(PopulationPlugin);
    app
}

fn push(app: &mut App, action: ConfigAction) {
    app.world_mut().resource_mut::<ConfigQueue>().push(action);
}

fn capacity(app: &App, entity: Entity) -> BuildingCapacity {
    *app.world()
        .get::<BuildingCapacity>(entity)
        .expect("capacity component")
}

#[test]
fn test_plugin_registers_everything() {
    let app = app();
    assert!(app.world().contains_resource::<PopData>());
    assert!(app.world().contains_resource::<ConfigQueue>());
    assert!(app.world().contains_resource::<Events<PopConfigChanged>>());
    assert!(app
        .world()
        .resource::<SaveableRegistry>()
        .contains("population_config"));
}

#[test]
fn test_config_applies_before_capacity_in_the_same_frame() {
    let mut app = app();
    let home = app
        .world_mut()
        .spawn((residential(1, 500.0, 3.0), BuildingLevel(0)))
        .id();
    push(
        &mut app,
        ConfigAction::SelectPack {
            service: Service::Residential,
            sub_service: SubService::ResidentialHigh,
            pack: "vanilla".into(),
        },
    );
    app.update();
    assert_eq!(capacity(&app, home).households, HOST_NATIVE);
}

#[test]
fn test_multiplier_action_rescales_buildings() {
    let mut app = app();
    let shop = app
        .world_mut()
        .spawn((
            BuildingPrefab {
                floor_area: 400.0,
                ..prefab(2, Service::Commercial, SubService::CommercialLow)
            },
            BuildingLevel(0),
        ))
        .id();
    app.update();
    let before = capacity(&app, shop).workplaces.total();

    push(
        &mut app,
        ConfigAction::SetMultiplier {
            service: Service::Commercial,
            sub_service: SubService::CommercialLow,
            value: 2.0,
        },
    );
    app.update();
    assert_eq!(capacity(&app, shop).workplaces.total(), before * 2);
}

#[test]
fn test_custom_schools_toggle() {
    let mut app = app();
    let elementary = app
        .world_mut()
        .spawn((school(3, SchoolLevel::Elementary, 300), BuildingLevel(0)))
        .id();
    app.update();
    assert_eq!(capacity(&app, elementary).students, 300);

    push(&mut app, ConfigAction::SetCustomSchools { enabled: true });
    app.update();
    assert_eq!(capacity(&app, elementary).students, 70);
}

#[test]
fn test_registry_save_load_and_reset() {
    let mut app = app();
    push(
        &mut app,
        ConfigAction::SetOverride {
            building: "prefab_1".into(),
            value: 33,
        },
    );
    app.update();

    let registry = app
        .world_mut()
        .remove_resource::<SaveableRegistry>()
        .expect("registry");
    let blobs = registry.save_all(app.world());
    assert!(blobs.contains_key("population_config"));

    registry.reset_all(app.world_mut());
    assert_eq!(app.world().resource::<PopData>().get_override("prefab_1"), 0);
    assert!(registry.save_all(app.world()).is_empty());

    registry.load_all(app.world_mut(), &blobs);
    assert_eq!(app.world().resource::<PopData>().get_override("prefab_1"), 33);
    app.world_mut().insert_resource(registry);
}
