use std::time::{Duration, Instant};

use super::*;
use crate::color::Rgba;
use crate::speaker::SpeakerId;

fn line(speaker: SpeakerId, text: &str) -> DialogueLine {
    DialogueLine::new(speaker, text)
}

fn player_with(lines: Vec<DialogueLine>) -> DialoguePlayer {
    let mut player = DialoguePlayer::default();
    player.begin_script(Script::new(lines));
    player
}

/// Ticks far enough apart that every tick reveals one codepoint.
fn reveal(player: &mut DialoguePlayer, start: Instant, ticks: u64) {
    for step in 0..ticks {
        player.tick(start + Duration::from_millis(step * 25));
    }
}

fn revealed(player: &DialoguePlayer) -> usize {
    player.playback().map_or(0, PlaybackState::revealed_units)
}

fn line_index(player: &DialoguePlayer) -> usize {
    player.playback().map_or(0, PlaybackState::line_index)
}

#[test]
fn idle_before_any_script() {
    let mut player = DialoguePlayer::default();
    assert_eq!(player.phase(), DialoguePhase::Idle);
    assert_eq!(player.confirm(), AdvanceAction::Ignore);
    assert!(!player.tick(Instant::now()));
    assert_eq!(player.visible_text(), "");
}

#[test]
fn empty_script_is_complete_immediately() {
    let player = player_with(Vec::new());
    assert_eq!(player.phase(), DialoguePhase::ScriptComplete);
    assert!(player.signals().script_complete);
}

#[test]
fn confirm_mid_reveal_skips_to_end() {
    let mut player = player_with(vec![
        line(SpeakerId::Narrator, "Hello"),
        line(SpeakerId::Tory, "Hi"),
    ]);
    reveal(&mut player, Instant::now(), 3);
    assert_eq!(player.visible_text(), "Hel");
    assert!(player.signals().is_revealing);

    assert_eq!(player.confirm(), AdvanceAction::SkipToEnd);
    assert_eq!(revealed(&player), 5);
    assert_eq!(line_index(&player), 0);
    assert_eq!(player.phase(), DialoguePhase::LineComplete);
    assert!(!player.signals().is_revealing);
}

#[test]
fn line_completes_by_ticking_alone() {
    let mut player = player_with(vec![line(SpeakerId::Narrator, "Hey")]);
    reveal(&mut player, Instant::now(), 10);
    assert_eq!(revealed(&player), 3);
    assert_eq!(player.phase(), DialoguePhase::LineComplete);
}

#[test]
fn next_line_resets_reveal_and_records_history() {
    let mut player = player_with(vec![
        line(SpeakerId::Elder, "One"),
        line(SpeakerId::Tory, "Two"),
    ]);
    player.confirm();
    assert_eq!(player.confirm(), AdvanceAction::NextLine);
    assert_eq!(line_index(&player), 1);
    assert_eq!(revealed(&player), 0);
    assert_eq!(player.phase(), DialoguePhase::Typing);
    let history: Vec<_> = player.history().entries().cloned().collect();
    assert_eq!(
        history,
        vec![HistoryEntry {
            speaker: SpeakerId::Elder,
            text: "One".to_string()
        }]
    );
}

#[test]
fn last_line_confirm_completes_script() {
    let mut player = player_with(vec![line(SpeakerId::Narrator, "End.")]);
    player.confirm();
    assert_eq!(player.confirm(), AdvanceAction::CompleteScript);
    assert_eq!(player.phase(), DialoguePhase::ScriptComplete);
    assert!(player.signals().script_complete);
    assert_eq!(player.confirm(), AdvanceAction::Ignore);
    assert_eq!(player.history().len(), 1);
}

#[test]
fn name_capture_flow() {
    let mut player = player_with(vec![
        line(SpeakerId::Storyteller, "Who are you?").with_name_capture(),
        line(SpeakerId::Tory, "Welcome, {player}."),
    ]);
    player.confirm();
    assert_eq!(player.phase(), DialoguePhase::LineComplete);

    assert_eq!(player.confirm(), AdvanceAction::OpenNamePrompt);
    assert_eq!(player.phase(), DialoguePhase::CapturingName);
    assert!(player.signals().is_capturing_name);
    assert_eq!(line_index(&player), 0);

    assert_eq!(player.confirm(), AdvanceAction::Ignore);
    assert!(player.type_char('A'));
    assert!(player.type_char('B'));
    assert_eq!(player.confirm(), AdvanceAction::ConfirmName);

    assert_eq!(player.player_name(), "AB");
    assert_eq!(line_index(&player), 1);
    assert_eq!(revealed(&player), 0);
    assert_eq!(player.phase(), DialoguePhase::Typing);
    assert_eq!(player.current_text(), "Welcome, AB.");
    assert_eq!(player.playback().map(|p| p.script().len()), Some(2));
}

#[test]
fn prompt_only_opens_once_per_line() {
    let mut player = player_with(vec![line(SpeakerId::Storyteller, "Name?").with_name_capture()]);
    player.confirm();
    player.confirm();
    player.type_char('Z');
    assert_eq!(player.confirm(), AdvanceAction::ConfirmName);
    assert_eq!(player.phase(), DialoguePhase::LineComplete);
    assert_eq!(line_index(&player), 0);
    assert_eq!(player.confirm(), AdvanceAction::CompleteScript);
}

#[test]
fn reopened_prompt_clears_buffer() {
    let mut player = player_with(vec![line(SpeakerId::Storyteller, "Name?").with_name_capture()]);
    player.confirm();
    player.confirm();
    player.type_char('Q');
    let buffer = player.playback().map(|p| p.name_buffer().to_string());
    assert_eq!(buffer.as_deref(), Some("Q"));

    player.begin_script(Script::new(vec![
        line(SpeakerId::Storyteller, "Again?").with_name_capture()
    ]));
    player.confirm();
    player.confirm();
    assert_eq!(player.playback().map(|p| p.name_buffer()), Some(""));
}

#[test]
fn text_input_ignored_outside_capture() {
    let mut player = player_with(vec![line(SpeakerId::Narrator, "Hi")]);
    assert!(!player.type_char('x'));
    assert!(!player.backspace());
}

#[test]
fn name_buffer_filters_and_limits() {
    let mut config = ResolvedConfig::default();
    config.limits.max_name_length = 3;
    let mut player = DialoguePlayer::new(config);
    player.begin_script(Script::new(vec![
        line(SpeakerId::Storyteller, "Name?").with_name_capture()
    ]));
    player.confirm();
    player.confirm();

    assert!(!player.type_char('\n'));
    assert!(!player.type_char('\u{1b}'));
    assert!(player.type_char('R'));
    assert!(player.type_char('í'));
    assert!(player.type_char('n'));
    assert!(!player.type_char('x'));
    assert!(player.backspace());
    assert_eq!(player.playback().map(|p| p.name_buffer()), Some("Rí"));
    assert!(player.backspace());
    assert!(player.backspace());
    assert!(!player.backspace());
}

#[test]
fn placeholder_stays_literal_without_name() {
    let player = player_with(vec![line(SpeakerId::Tory, "Hi {player}")]);
    assert_eq!(player.current_text(), "Hi {player}");
    assert_eq!(player.playback().map(|p| p.reveal.total()), Some(11));
}

#[test]
fn expanded_name_sets_reveal_length() {
    let mut player = DialoguePlayer::default();
    player.set_player_name("Alexandria");
    player.begin_script(Script::new(vec![line(SpeakerId::Tory, "Hi {player}!")]));
    assert_eq!(player.playback().map(|p| p.reveal.total()), Some(14));
    reveal(&mut player, Instant::now(), 14);
    assert_eq!(player.visible_text(), "Hi Alexandria!");
    assert_eq!(player.phase(), DialoguePhase::LineComplete);
}

#[test]
fn player_name_highlight_is_live() {
    let mut player = player_with(vec![
        line(SpeakerId::Storyteller, "Name?").with_name_capture(),
        line(SpeakerId::Tory, "So, {player} it is."),
    ]);
    player.confirm();
    player.confirm();
    for c in "Kai".chars() {
        player.type_char(c);
    }
    player.confirm();
    player.confirm();

    let visible = player.visible_text();
    let segments = player.colorize_visible(&visible);
    let player_color = player.registry().color(SpeakerId::Player);
    assert!(segments
        .iter()
        .any(|segment| segment.text == "Kai" && segment.color == player_color));
}

#[test]
fn guard_highlights_name_while_typing() {
    let mut player = player_with(vec![line(SpeakerId::Narrator, "I saw Tory.")]);
    let start = Instant::now();
    reveal(&mut player, start, 9);
    let visible = player.visible_text();
    assert_eq!(visible, "I saw Tor");
    let segments = player.colorize_visible(&visible);
    assert_eq!(
        segments,
        vec![
            ColoredSegment::plain("I saw "),
            ColoredSegment::colored("Tor", Rgba::GOLD),
        ]
    );

    player.tick(start + Duration::from_secs(1));
    let visible = player.visible_text();
    let segments = player.colorize_visible(&visible);
    assert_eq!(segments[1], ColoredSegment::colored("Tory", Rgba::GOLD));
}

#[test]
fn apply_input_routes_actions() {
    let mut player = player_with(vec![
        line(SpeakerId::Narrator, "Hi"),
        line(SpeakerId::Narrator, "Yo"),
    ]);
    assert!(player.apply_input(InputAction::Confirm));
    assert!(player.apply_input(InputAction::Type('a')));
    assert!(player.apply_input(InputAction::Confirm));
    assert_eq!(line_index(&player), 1);
    assert!(!player.apply_input(InputAction::Quit));
}

#[test]
fn switching_scripts_keeps_name_and_resets_cursor() {
    let mut player = player_with(vec![
        line(SpeakerId::Narrator, "Intro"),
        line(SpeakerId::Narrator, "More"),
    ]);
    player.set_player_name("Rin");
    player.confirm();
    player.confirm();
    assert_eq!(line_index(&player), 1);

    player.begin_script(
        Script::new(vec![line(SpeakerId::Ember, "{player}!")]).with_id("gameplay"),
    );
    assert_eq!(line_index(&player), 0);
    assert_eq!(revealed(&player), 0);
    assert_eq!(player.current_text(), "Rin!");
    assert_eq!(
        player.playback().and_then(|p| p.script().id()),
        Some("gameplay")
    );
}

#[test]
fn renaming_on_last_prompt_line_refreshes_reveal_length() {
    let mut player = DialoguePlayer::default();
    player.set_player_name("Al");
    player.begin_script(Script::new(vec![
        line(SpeakerId::Storyteller, "Still {player}? Rename:").with_name_capture()
    ]));
    player.confirm();
    assert_eq!(player.confirm(), AdvanceAction::OpenNamePrompt);
    for c in "Alexandria".chars() {
        player.type_char(c);
    }
    assert_eq!(player.confirm(), AdvanceAction::ConfirmName);

    assert_eq!(player.phase(), DialoguePhase::LineComplete);
    assert_eq!(player.current_text(), "Still Alexandria? Rename:");
    assert_eq!(player.visible_text(), player.current_text());
    assert_eq!(revealed(&player), 25);
}

#[test]
fn prompt_line_is_recorded_once_with_the_name_shown() {
    let mut player = DialoguePlayer::default();
    player.set_player_name("Al");
    player.begin_script(Script::new(vec![
        line(SpeakerId::Storyteller, "Still {player}? Rename:").with_name_capture()
    ]));
    player.confirm();
    player.confirm();
    player.type_char('B');
    player.confirm();
    assert_eq!(player.confirm(), AdvanceAction::CompleteScript);

    let texts: Vec<_> = player
        .history()
        .entries()
        .map(|entry| entry.text.clone())
        .collect();
    assert_eq!(texts, vec!["Still Al? Rename:".to_string()]);
}

#[test]
fn prompt_line_before_next_line_is_recorded_once() {
    let mut player = player_with(vec![
        line(SpeakerId::Storyteller, "Hello {player}?").with_name_capture(),
        line(SpeakerId::Tory, "Hi {player}"),
    ]);
    player.confirm();
    player.confirm();
    player.type_char('Z');
    player.confirm();

    assert_eq!(line_index(&player), 1);
    let texts: Vec<_> = player
        .history()
        .entries()
        .map(|entry| entry.text.clone())
        .collect();
    assert_eq!(texts, vec!["Hello {player}?".to_string()]);
}

#[test]
fn shorter_name_mid_reveal_restarts_the_line() {
    let mut player = DialoguePlayer::default();
    player.set_player_name("Alexandria");
    player.begin_script(Script::new(vec![line(SpeakerId::Tory, "{player} waits.")]));
    reveal(&mut player, Instant::now(), 12);
    assert_eq!(revealed(&player), 12);

    player.set_player_name("Al");
    assert_eq!(revealed(&player), 0);
    assert_eq!(player.phase(), DialoguePhase::Typing);
    assert_eq!(player.current_text(), "Al waits.");
}
