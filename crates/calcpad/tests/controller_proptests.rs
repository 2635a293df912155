//! Property-based tests for the display controller and key router

use calcpad::prelude::*;
use proptest::prelude::*;

// ===== Strategy definitions =====

/// Any character the keypad can append
fn keypad_char_strategy() -> impl Strategy<Value = char> {
    prop_oneof![
        (0u32..=9).prop_map(|d| char::from_digit(d, 10).unwrap_or('0')),
        Just('.'),
        Just('+'),
        Just('-'),
        Just('*'),
        Just('/'),
    ]
}

/// Text that could have been typed on the keypad
fn keypad_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(keypad_char_strategy(), 0..24).prop_map(|v| v.into_iter().collect())
}

/// Long keypad input, far past what fits on the display
fn long_keypad_text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec(keypad_char_strategy(), 200..2000)
            .prop_map(|v| v.into_iter().collect::<String>()),
        (200usize..5000, keypad_char_strategy()).prop_map(|(n, ch)| ch.to_string().repeat(n)),
    ]
}

/// Any routed command
fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => keypad_char_strategy().prop_map(Command::Append),
        1 => Just(Command::Clear),
        1 => Just(Command::DeleteLast),
        1 => Just(Command::Evaluate),
    ]
}

fn manual_controller() -> (DisplayController<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let ctrl = DisplayController::with_clock(clock.clone(), CalcpadConfig::default());
    (ctrl, clock)
}

// ===== Buffer operation properties =====

proptest! {
    /// Appending chunks concatenates them verbatim
    #[test]
    fn prop_append_concatenates(chunks in prop::collection::vec(keypad_text_strategy(), 0..8)) {
        let (mut ctrl, _) = manual_controller();
        for chunk in &chunks {
            ctrl.append(chunk);
        }
        prop_assert_eq!(ctrl.display(), chunks.concat());
        prop_assert_eq!(ctrl.state(), DisplayState::Normal);
    }

    /// Clear always leaves an empty buffer in the normal state
    #[test]
    fn prop_clear_resets(commands in prop::collection::vec(command_strategy(), 0..32)) {
        let (mut ctrl, _) = manual_controller();
        for command in commands {
            ctrl.execute(command);
        }
        ctrl.clear();
        prop_assert_eq!(ctrl.display(), "");
        prop_assert_eq!(ctrl.state(), DisplayState::Normal);
        prop_assert!(!ctrl.has_pending_auto_clear());
    }

    /// Delete-last drops exactly the final character
    #[test]
    fn prop_delete_last_drops_one_char(text in keypad_text_strategy()) {
        let (mut ctrl, _) = manual_controller();
        ctrl.append(&text);
        ctrl.delete_last();

        let mut expected = text.clone();
        expected.pop();
        prop_assert_eq!(ctrl.display(), expected);
    }

    /// Evaluation shows either the error text or a number that parses back
    #[test]
    fn prop_evaluate_shows_number_or_error(text in keypad_text_strategy()) {
        let (mut ctrl, _) = manual_controller();
        ctrl.append(&text);
        match ctrl.evaluate() {
            Ok(value) => {
                prop_assert!(value.is_finite());
                let shown: f64 = ctrl.display().parse().unwrap_or(f64::NAN);
                prop_assert!(shown.is_finite(), "display {:?}", ctrl.display());
                prop_assert_eq!(ctrl.state(), DisplayState::Normal);
            }
            Err(_) => {
                prop_assert_eq!(ctrl.display(), "Error");
                prop_assert_eq!(ctrl.state(), DisplayState::ErrorDisplay);
                prop_assert!(ctrl.has_pending_auto_clear());
            }
        }
    }

    /// Long or deeply signed input still ends in a number or the error text
    #[test]
    fn prop_long_input_never_aborts(text in long_keypad_text_strategy()) {
        let (mut ctrl, _) = manual_controller();
        ctrl.append(&text);
        let shown_error = ctrl.evaluate().is_err();
        prop_assert_eq!(shown_error, ctrl.display() == "Error");
    }

    /// Integer sums are shown without a decimal point
    #[test]
    fn prop_integer_addition(a in 0u32..100_000, b in 0u32..100_000) {
        let (mut ctrl, _) = manual_controller();
        ctrl.append(&format!("{a}+{b}"));
        prop_assert!(ctrl.evaluate().is_ok());
        prop_assert_eq!(ctrl.display(), (u64::from(a) + u64::from(b)).to_string());
    }

    /// With cancel-on-input, no auto-clear ever erases input typed after the error
    #[test]
    fn prop_auto_clear_never_erases_later_input(
        typed in "[0-9]{1,6}",
        delay in 0u64..1500,
    ) {
        let (mut ctrl, clock) = manual_controller();
        ctrl.append("1/0");
        prop_assert!(ctrl.evaluate().is_err());

        clock.advance_ms(delay);
        ctrl.tick();
        ctrl.clear();
        ctrl.append(&typed);

        clock.advance_ms(10_000);
        ctrl.tick();
        prop_assert_eq!(ctrl.display(), typed);
    }
}

// ===== Key router properties =====

proptest! {
    /// Every string routes without panicking; only evaluate and delete consume the key
    #[test]
    fn prop_router_is_total(key in ".{0,12}") {
        let route = route_key(&key);
        if route.prevent_default {
            prop_assert!(matches!(
                route.command,
                Some(Command::Evaluate | Command::DeleteLast)
            ));
        }
        if !route.is_handled() {
            prop_assert!(!route.prevent_default);
        }
    }

    /// Multi-character key names never append
    #[test]
    fn prop_named_keys_never_append(key in "[A-Za-z]{2,10}") {
        prop_assert!(!matches!(route_key(&key).command, Some(Command::Append(_))));
    }

    /// Appendable single characters route to an append of themselves
    #[test]
    fn prop_keypad_chars_append_themselves(ch in keypad_char_strategy()) {
        let route = route_key(&ch.to_string());
        prop_assert_eq!(route.command, Some(Command::Append(ch)));
        prop_assert!(!route.prevent_default);
    }
}
