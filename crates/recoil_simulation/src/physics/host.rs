//! HeadlessHostPlugin - host роль без рендера
//!
//! Подставляет то, что обычно делает движок:
//! - `Physics` resource (RapierPhysics из конфига), если host не вставил свой
//! - scripted input (seeded RNG) для headless прогона

use bevy::prelude::*;

use super::{Physics, RapierPhysics};
use crate::config::PlatformerConfig;
use crate::input::{drive_scripted_input, ScriptedInput};
use crate::{DeterministicRng, StepSet};

pub struct HeadlessHostPlugin {
    /// true = PlayerInput заполняется из DeterministicRng каждый шаг
    pub scripted_input: bool,
}

impl Plugin for HeadlessHostPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Physics>() {
            let tuning = app
                .world()
                .get_resource::<PlatformerConfig>()
                .map(|config| config.physics.clone())
                .unwrap_or_default();

            app.insert_resource(Physics::new(RapierPhysics::from_tuning(&tuning)));
        }

        if self.scripted_input {
            if !app.world().contains_resource::<DeterministicRng>() {
                app.insert_resource(DeterministicRng::new(0));
            }

            app.init_resource::<ScriptedInput>()
                .add_systems(Update, drive_scripted_input.in_set(StepSet::Input));
        }
    }
}
