use nlfem::error::SettingsError;
use nlfem::interaction::InteractionKernel;
use nlfem::proptest::nonlocal_settings;
use nlfem::settings::{NonlocalSettings, MAX_REFINEMENT_LEVEL};
use proptest::prelude::*;

#[test]
fn defaults() {
    let settings = NonlocalSettings::new(InteractionKernel::Box, 2.0, 0.4);
    assert_eq!(settings.level_min, 0);
    assert_eq!(settings.level_max, 1);
    assert_eq!(settings.smoothing_width, 0.1);
    assert_eq!(settings.forcing, 0.0);
    assert!(!settings.print_debug_mesh);
    assert_eq!(settings.validate(), Ok(()));
}

#[test]
fn builders() {
    let settings = NonlocalSettings::new(InteractionKernel::Ball, 1.0, 0.5)
        .with_levels(1, 4)
        .with_smoothing_width(0.2)
        .with_forcing(-3.0)
        .with_debug_mesh(true);
    assert_eq!((settings.level_min, settings.level_max), (1, 4));
    assert_eq!(settings.smoothing_width, 0.2);
    assert_eq!(settings.forcing, -3.0);
    assert!(settings.print_debug_mesh);
}

#[test]
fn validate_reports_violated_bound() {
    let base = NonlocalSettings::new(InteractionKernel::Ball, 1.0, 0.5);

    let mut settings = base.clone();
    settings.delta = 0.0;
    assert_eq!(settings.validate(), Err(SettingsError::InvalidInteractionRange));

    settings.delta = f64::INFINITY;
    assert_eq!(settings.validate(), Err(SettingsError::InvalidInteractionRange));

    let settings = base.clone().with_smoothing_width(-1.0);
    assert_eq!(settings.validate(), Err(SettingsError::InvalidSmoothingWidth));

    let mut settings = base.clone();
    settings.kappa = f64::NAN;
    assert_eq!(settings.validate(), Err(SettingsError::NonFiniteParameter { name: "kappa" }));

    let settings = base.clone().with_forcing(f64::NEG_INFINITY);
    assert_eq!(settings.validate(), Err(SettingsError::NonFiniteParameter { name: "forcing" }));

    let settings = base.clone().with_levels(3, 3);
    assert_eq!(
        settings.validate(),
        Err(SettingsError::InvalidLevelBounds {
            level_min: 3,
            level_max: 3
        })
    );

    let settings = base.with_levels(0, MAX_REFINEMENT_LEVEL + 1);
    let error = settings.validate().unwrap_err();
    assert_eq!(
        error,
        SettingsError::LevelTooDeep {
            level_max: MAX_REFINEMENT_LEVEL + 1,
            limit: MAX_REFINEMENT_LEVEL
        }
    );
    assert!(error.to_string().contains("level_max (17)"));
}

#[test]
fn deserialize_with_defaults() {
    let json = r#"{ "kappa": 1.0, "delta": 0.3, "level_max": 5, "smoothing_width": 0.05, "forcing": 1.0 }"#;
    let settings: NonlocalSettings<f64> = serde_json::from_str(json).unwrap();
    assert_eq!(settings.kernel, InteractionKernel::Ball);
    assert_eq!(settings.level_min, 0);
    assert_eq!(settings.level_max, 5);
    assert!(!settings.print_debug_mesh);
    assert_eq!(settings.validate(), Ok(()));
}

#[test]
fn deserialize_kernel_by_name() {
    let json = r#"{ "kernel": "BallOrderTwo", "kappa": 1.0, "delta": 0.3, "level_max": 2,
                    "smoothing_width": 0.05, "forcing": 0.0, "print_debug_mesh": true }"#;
    let settings: NonlocalSettings<f64> = serde_json::from_str(json).unwrap();
    assert_eq!(settings.kernel, InteractionKernel::BallOrderTwo);
    assert!(settings.print_debug_mesh);
}

proptest! {
    #[test]
    fn generated_settings_are_valid_and_survive_json(settings in nonlocal_settings()) {
        prop_assert_eq!(settings.validate(), Ok(()));
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: NonlocalSettings<f64> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(deserialized, settings);
    }
}
