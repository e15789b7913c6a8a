//! Turn order state machine
//!
//! Operates on a [`TurnState`] together with the initiative-sorted list
//! produced by [`turn_order`]. Down combatants keep their slot but are
//! skipped when the turn pointer moves.

use crate::domain::entities::Combatant;
use crate::domain::value_objects::{CombatantId, TurnState};

/// Combatants that take turns, highest initiative first.
///
/// Ties go to the higher Dexterity modifier, then to roster order.
pub fn turn_order(combatants: &[Combatant]) -> Vec<Combatant> {
    let mut order: Vec<Combatant> = combatants
        .iter()
        .filter(|c| c.is_in_turn_order())
        .cloned()
        .collect();
    order.sort_by(|a, b| {
        b.initiative
            .cmp(&a.initiative)
            .then_with(|| b.dexterity_modifier.cmp(&a.dexterity_modifier))
    });
    order
}

/// The combatant whose turn it is, if the pointer lands inside the order
pub fn current<'a>(state: &TurnState, order: &'a [Combatant]) -> Option<&'a Combatant> {
    order.get(state.current_turn_index)
}

/// Move to the next combatant able to act.
///
/// Wrapping past the end starts a new round. If everyone is down the pointer
/// moves a single step.
pub fn advance(state: &mut TurnState, order: &[Combatant]) {
    state.manual_selection = None;
    if order.is_empty() {
        return;
    }

    let len = order.len();
    let everyone_down = order.iter().all(Combatant::is_incapacitated);
    let mut index = state.current_turn_index;
    let mut first_step = true;

    loop {
        index += 1;
        if index >= len {
            index = 0;
            state.current_round = state.current_round.saturating_add(1);
            state.visible_turn_number = 1;
        } else if first_step {
            state.visible_turn_number = state.visible_turn_number.saturating_add(1);
        }
        first_step = false;

        if everyone_down || !order[index].is_incapacitated() {
            break;
        }
    }

    state.current_turn_index = index;
}

/// Move back to the previous combatant able to act.
///
/// Wrapping past the start returns to the previous round, never below round 1,
/// and sets the visible turn to the number of combatants still standing.
pub fn retreat(state: &mut TurnState, order: &[Combatant]) {
    state.manual_selection = None;
    if order.is_empty() {
        return;
    }

    let len = order.len();
    let standing = order.iter().filter(|c| !c.is_incapacitated()).count();
    let everyone_down = standing == 0;
    let mut index = state.current_turn_index.min(len);
    let mut first_step = true;

    loop {
        if index == 0 {
            index = len - 1;
            if state.current_round > 1 {
                state.current_round -= 1;
                state.visible_turn_number = u32::try_from(standing.max(1)).unwrap_or(u32::MAX);
            }
        } else {
            index -= 1;
            if first_step {
                state.visible_turn_number = state.visible_turn_number.saturating_sub(1).max(1);
            }
        }
        first_step = false;

        if everyone_down || !order[index].is_incapacitated() {
            break;
        }
    }

    state.current_turn_index = index;
}

/// Toggle the inspection pointer.
///
/// Selecting the combatant whose turn it is clears the pointer. The turn
/// pointer, round and visible turn are never touched.
pub fn select_manually(state: &mut TurnState, order: &[Combatant], id: &CombatantId) {
    let is_current = current(state, order).is_some_and(|c| &c.id == id);
    state.manual_selection = if is_current { None } else { Some(id.clone()) };
}

/// Back to the first turn of round 1
pub fn reset(state: &mut TurnState) {
    *state = TurnState::default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CombatantKind;
    use crate::domain::value_objects::CharacterId;

    fn combatant(id: &str, initiative: Option<i32>, hp: i32) -> Combatant {
        Combatant {
            id: CombatantId::new(id),
            name: id.to_uppercase(),
            kind: CombatantKind::Character {
                character_id: CharacterId::new(id),
                level: 1,
            },
            initiative,
            current_hp: Some(hp),
            max_hp: Some(10),
            temp_hp: Some(0),
            armor_class: None,
            dexterity_modifier: 0,
        }
    }

    fn with_dex(mut c: Combatant, modifier: i32) -> Combatant {
        c.dexterity_modifier = modifier;
        c
    }

    fn ids(order: &[Combatant]) -> Vec<&str> {
        order.iter().map(|c| c.id.as_str()).collect()
    }

    fn abc() -> Vec<Combatant> {
        turn_order(&[
            combatant("a", Some(20), 10),
            combatant("b", Some(15), 0),
            combatant("c", Some(10), 5),
        ])
    }

    #[test]
    fn test_order_excludes_unset_and_non_positive() {
        let order = turn_order(&[
            combatant("a", Some(5), 10),
            combatant("b", None, 10),
            combatant("c", Some(0), 10),
            combatant("d", Some(18), 10),
        ]);
        assert_eq!(ids(&order), vec!["d", "a"]);
    }

    #[test]
    fn test_down_combatants_stay_listed() {
        assert_eq!(ids(&abc()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tie_break_dexterity_then_roster_order() {
        let order = turn_order(&[
            with_dex(combatant("a", Some(12), 10), 1),
            with_dex(combatant("b", Some(12), 10), 3),
            with_dex(combatant("c", Some(12), 10), 1),
            combatant("d", Some(13), 10),
        ]);
        assert_eq!(ids(&order), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_advance_skips_down_combatant() {
        let order = abc();
        let mut state = TurnState::default();

        advance(&mut state, &order);

        assert_eq!(state.current_turn_index, 2);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.visible_turn_number, 2);
    }

    #[test]
    fn test_advance_wraps_into_next_round() {
        let order = turn_order(&[
            combatant("a", Some(20), 10),
            combatant("b", Some(15), 10),
            combatant("c", Some(10), 5),
        ]);
        let mut state = TurnState {
            current_turn_index: 2,
            current_round: 1,
            visible_turn_number: 3,
            manual_selection: None,
        };

        advance(&mut state, &order);

        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.current_round, 2);
        assert_eq!(state.visible_turn_number, 1);
    }

    #[test]
    fn test_advance_skip_across_wrap() {
        let order = turn_order(&[
            combatant("a", Some(20), 0),
            combatant("b", Some(15), 10),
            combatant("c", Some(10), 5),
        ]);
        let mut state = TurnState {
            current_turn_index: 2,
            ..TurnState::default()
        };

        advance(&mut state, &order);

        assert_eq!(state.current_turn_index, 1);
        assert_eq!(state.current_round, 2);
        assert_eq!(state.visible_turn_number, 1);
    }

    #[test]
    fn test_advance_when_everyone_is_down_moves_once() {
        let order = turn_order(&[
            combatant("a", Some(20), 0),
            combatant("b", Some(15), -2),
        ]);
        let mut state = TurnState::default();

        advance(&mut state, &order);
        assert_eq!(state.current_turn_index, 1);

        advance(&mut state, &order);
        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.current_round, 2);
    }

    #[test]
    fn test_advance_on_empty_order_only_clears_selection() {
        let mut state = TurnState {
            manual_selection: Some(CombatantId::new("a")),
            ..TurnState::default()
        };
        advance(&mut state, &[]);
        assert_eq!(state.current_turn_index, 0);
        assert!(state.manual_selection.is_none());
    }

    #[test]
    fn test_retreat_skips_down_combatant() {
        let order = abc();
        let mut state = TurnState {
            current_turn_index: 2,
            current_round: 1,
            visible_turn_number: 2,
            manual_selection: None,
        };

        retreat(&mut state, &order);

        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.visible_turn_number, 1);
    }

    #[test]
    fn test_retreat_wraps_into_previous_round() {
        let order = abc();
        let mut state = TurnState {
            current_turn_index: 0,
            current_round: 3,
            visible_turn_number: 1,
            manual_selection: None,
        };

        retreat(&mut state, &order);

        assert_eq!(state.current_turn_index, 2);
        assert_eq!(state.current_round, 2);
        assert_eq!(state.visible_turn_number, 2);
    }

    #[test]
    fn test_retreat_never_drops_below_round_one() {
        let order = abc();
        let mut state = TurnState::default();

        retreat(&mut state, &order);

        assert_eq!(state.current_turn_index, 2);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.visible_turn_number, 1);
    }

    #[test]
    fn test_retreat_undoes_advance() {
        let order = turn_order(&[
            combatant("a", Some(20), 10),
            combatant("b", Some(15), 10),
            combatant("c", Some(10), 10),
        ]);
        let mut state = TurnState::default();

        advance(&mut state, &order);
        advance(&mut state, &order);
        retreat(&mut state, &order);

        assert_eq!(state.current_turn_index, 1);
        assert_eq!(state.visible_turn_number, 2);
    }

    #[test]
    fn test_manual_selection_is_independent() {
        let order = abc();
        let mut state = TurnState::default();

        select_manually(&mut state, &order, &CombatantId::new("c"));
        assert_eq!(state.manual_selection, Some(CombatantId::new("c")));
        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.visible_turn_number, 1);

        advance(&mut state, &order);
        assert!(state.manual_selection.is_none());
    }

    #[test]
    fn test_selecting_current_combatant_clears_selection() {
        let order = abc();
        let mut state = TurnState {
            manual_selection: Some(CombatantId::new("c")),
            ..TurnState::default()
        };

        select_manually(&mut state, &order, &CombatantId::new("a"));
        assert!(state.manual_selection.is_none());
    }

    #[test]
    fn test_reset() {
        let mut state = TurnState {
            current_turn_index: 4,
            current_round: 7,
            visible_turn_number: 3,
            manual_selection: Some(CombatantId::new("x")),
        };
        reset(&mut state);
        assert_eq!(state, TurnState::default());
    }

    #[test]
    fn test_stale_index_is_tolerated() {
        let order = abc();
        let state = TurnState {
            current_turn_index: 9,
            ..TurnState::default()
        };
        assert!(current(&state, &order).is_none());

        let mut moved = state.clone();
        advance(&mut moved, &order);
        assert_eq!(moved.current_turn_index, 0);

        let mut back = state;
        retreat(&mut back, &order);
        assert_eq!(back.current_turn_index, 2);
    }
}
