use std::collections::{HashMap, HashSet};

use winit::keyboard::KeyCode;

use crate::game::player::MoveIntent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
	MoveForward, MoveBackward, TurnLeft, TurnRight, FineTurn, ToggleView, ToggleGrid, Quit
}

pub struct InputState {
	action_binding: HashMap<Action, HashSet<KeyCode>>,
	key_state: HashMap<KeyCode, u32>
}

impl InputState {
	const JUST: u32		= 0b01;
	const PRESSED: u32	= 0b10;
}

impl Default for InputState {
	fn default() -> Self {
		let mut input_state = Self { action_binding: HashMap::new(), key_state: HashMap::new() };

		input_state.bind_action(Action::MoveForward, KeyCode::KeyW);
		input_state.bind_action(Action::MoveBackward, KeyCode::KeyS);
		input_state.bind_action(Action::TurnLeft, KeyCode::KeyA);
		input_state.bind_action(Action::TurnRight, KeyCode::KeyD);
		input_state.bind_action(Action::FineTurn, KeyCode::ShiftLeft);
		input_state.bind_action(Action::FineTurn, KeyCode::ShiftRight);
		input_state.bind_action(Action::ToggleView, KeyCode::Space);
		input_state.bind_action(Action::ToggleGrid, KeyCode::KeyG);
		input_state.bind_action(Action::Quit, KeyCode::Escape);

		input_state
	}
}

impl InputState {

	// key binding

	pub fn bind_action(&mut self, action: Action, key: KeyCode) {
		self.action_binding.entry(action).or_default().insert(key);
	}

	pub fn unbind_action(&mut self, action: Action, key: KeyCode) {
		if let Some(keys) = self.action_binding.get_mut(&action) {
			keys.remove(&key);
		}
	}


	// key action press and release

	pub fn set_key_state(&mut self, key: KeyCode, pressed: bool) {
		let pressed_flag = if pressed { Self::PRESSED } else { 0b0 };
		self.key_state.insert(key, Self::JUST | pressed_flag);
	}

	pub fn is_action_pressed(&self, action: Action) -> bool {
		self.action_binding.get(&action).is_some_and(|keys| keys.iter().any(|key|
			self.key_state.get(key).is_some_and(|state| state & Self::PRESSED != 0)
		))
	}

	/// True once per press; consumes the "just" flag of the bound keys.
	pub fn is_action_just_pressed(&mut self, action: Action) -> bool {
		let Some(keys) = self.action_binding.get(&action) else {
			return false;
		};
		let mut just_pressed = false;
		for key in keys {
			if let Some(state) = self.key_state.get_mut(key) {
				if *state == Self::JUST | Self::PRESSED {
					just_pressed = true;
				}
				*state &= Self::PRESSED;
			}
		}
		just_pressed
	}

	pub fn move_intent(&self) -> MoveIntent {
		MoveIntent {
			forward: self.is_action_pressed(Action::MoveForward),
			backward: self.is_action_pressed(Action::MoveBackward),
			turn_left: self.is_action_pressed(Action::TurnLeft),
			turn_right: self.is_action_pressed(Action::TurnRight),
			fine: self.is_action_pressed(Action::FineTurn)
		}
	}
}

#[test]
fn held_keys_build_intent() {
	let mut input = InputState::default();
	input.set_key_state(KeyCode::KeyW, true);
	input.set_key_state(KeyCode::KeyD, true);
	input.set_key_state(KeyCode::ShiftRight, true);
	assert_eq!(input.move_intent(), MoveIntent { forward: true, turn_right: true, fine: true, ..Default::default() });

	input.set_key_state(KeyCode::KeyW, false);
	assert!(!input.move_intent().forward);
}

#[test]
fn toggle_fires_once_per_press() {
	let mut input = InputState::default();
	input.set_key_state(KeyCode::Space, true);
	assert!(input.is_action_just_pressed(Action::ToggleView));
	assert!(!input.is_action_just_pressed(Action::ToggleView));
	assert!(input.is_action_pressed(Action::ToggleView));

	input.set_key_state(KeyCode::Space, false);
	assert!(!input.is_action_just_pressed(Action::ToggleView));
}

#[test]
fn rebinding_moves_action() {
	let mut input = InputState::default();
	input.unbind_action(Action::MoveForward, KeyCode::KeyW);
	input.bind_action(Action::MoveForward, KeyCode::ArrowUp);
	input.set_key_state(KeyCode::KeyW, true);
	assert!(!input.move_intent().forward);
	input.set_key_state(KeyCode::ArrowUp, true);
	assert!(input.move_intent().forward);
}
