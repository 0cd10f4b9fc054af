//! Смерть игрока от hazard контакта

use bevy::prelude::*;

use super::components::{Dead, Player};
use super::events::PlayerDied;
use crate::physics::{Physics, TriggerContact};
use crate::session::SessionControl;

/// Система: TriggerContact с hazard → Dead + game over
///
/// Тело удаляется из physics host сразу (dead игрок не двигается и
/// больше не пересекает triggers). Повторные контакты в том же шаге
/// (враг + шипы одновременно) дают одну смерть.
pub fn kill_player_on_hazard_contact(
    mut commands: Commands,
    mut contacts: EventReader<TriggerContact>,
    mut session: SessionControl,
    mut physics: ResMut<Physics>,
    players: Query<(), (With<Player>, Without<Dead>)>,
    mut died: EventWriter<PlayerDied>,
) {
    let mut killed: Vec<Entity> = Vec::new();

    for contact in contacts.read() {
        if !contact.tag.is_hazard() {
            continue;
        }

        if killed.contains(&contact.entity) || players.get(contact.entity).is_err() {
            continue;
        }

        killed.push(contact.entity);

        commands.entity(contact.entity).insert(Dead);
        physics.remove_body(contact.entity);

        crate::log_info(&format!(
            "Player {:?} killed by {:?}",
            contact.entity, contact.tag
        ));

        died.write(PlayerDied {
            entity: contact.entity,
            cause: contact.tag,
        });

        session.trigger_game_over();
    }
}
