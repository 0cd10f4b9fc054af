//! Pickup domain - монеты (+1 очко)

use bevy::prelude::*;

use crate::physics::{ContactTag, Physics, TriggerContact};
use crate::session::SessionControl;
use crate::StepSet;

/// Marker: монета (TriggerVolume с тегом Coin)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Coin;

/// Система: контакт игрока с монетой → +1 очко, монета исчезает
/// (entity и sensor в physics host)
///
/// После game over монеты не собираются (и не исчезают).
pub fn collect_coins(
    mut commands: Commands,
    mut contacts: EventReader<TriggerContact>,
    mut session: SessionControl,
    mut physics: ResMut<Physics>,
    coins: Query<(), With<Coin>>,
) {
    let mut collected: Vec<Entity> = Vec::new();

    for contact in contacts.read() {
        if contact.tag != ContactTag::Coin {
            continue;
        }

        if session.is_game_over() {
            continue;
        }

        if collected.contains(&contact.other) || coins.get(contact.other).is_err() {
            continue;
        }

        collected.push(contact.other);

        if session.add_point() {
            physics.remove_trigger(contact.other);
            commands.entity(contact.other).despawn();
        }
    }
}

/// Pickup Plugin
///
/// Монеты обрабатываются после смерти игрока в том же шаге: контакт с
/// hazard'ом и монетой одновременно не даёт очков.
pub struct PickupPlugin;

impl Plugin for PickupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            collect_coins
                .after(crate::player::kill_player_on_hazard_contact)
                .in_set(StepSet::Resolve),
        );
    }
}
