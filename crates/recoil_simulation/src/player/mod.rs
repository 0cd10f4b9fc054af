//! Player domain - controller, recoil оружие, смерть
//!
//! Содержит:
//! - Компоненты (Player, PlayerController, RecoilWeapon, GroundProbe, AimPivot, Dead)
//! - Controller step (движение, прыжок, прицел, отдача, recharge)
//! - Смерть от hazard контакта
//! - Events (PlayerDied, RecoilFired)

use bevy::prelude::*;

pub mod components;
pub mod controller;
pub mod death;
pub mod events;


pub use components::{AimPivot, Dead, GroundProbe, Player, PlayerController, RecoilWeapon};
pub use controller::{drive_player_controller, step_controller, ControlStep, StepOutcome};
pub use death::kill_player_on_hazard_contact;
pub use events::{PlayerDied, RecoilFired};

use crate::input::PlayerInput;
use crate::StepSet;

/// Player Plugin
///
/// - StepSet::Control: drive_player_controller
/// - StepSet::Resolve: kill_player_on_hazard_contact
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .register_type::<PlayerController>()
            .register_type::<RecoilWeapon>()
            .register_type::<GroundProbe>()
            .register_type::<AimPivot>()
            .add_event::<PlayerDied>()
            .add_event::<RecoilFired>();

        app.add_systems(Update, drive_player_controller.in_set(StepSet::Control));
        app.add_systems(
            Update,
            kill_player_on_hazard_contact.in_set(StepSet::Resolve),
        );
    }
}
