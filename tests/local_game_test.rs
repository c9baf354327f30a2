//! Complete games driven by the in-process coordinator.

use connect4::{
    ConsolePrompt, ConsoleView, FrameBuffer, Frontend, GameOutcome, HeuristicBot, JoystickPrompt,
    LocalBackend, LocalCoordinator, MatrixView, RED, ScriptedStick, Seat, StickDirection,
};
use connect4_engine::{COLS, Icon, ROWS, rules};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Console output captured for assertions.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn scripted_human(
    name: &str,
    backend: &LocalBackend,
    input: &'static [u8],
    out: &SharedBuf,
) -> Seat<LocalBackend, ConsolePrompt<&'static [u8]>, ConsoleView<SharedBuf>> {
    Seat::new(
        name,
        backend.clone(),
        ConsolePrompt::new(input, Box::new(std::io::sink())),
        ConsoleView::new(out.clone(), false),
    )
}

fn quiet_bot(name: &str, backend: &LocalBackend) -> Seat<LocalBackend, HeuristicBot, ConsoleView<std::io::Sink>> {
    Seat::new(
        name,
        backend.clone(),
        HeuristicBot::new(Duration::ZERO),
        ConsoleView::new(std::io::sink(), false),
    )
}

#[tokio::test]
async fn test_bots_play_to_completion() {
    let backend = LocalBackend::fresh();
    let engine = backend.engine().clone();
    let first = quiet_bot("Bot_A", &backend);
    let second = quiet_bot("Bot_B", &backend);

    let report = LocalCoordinator::new(engine.clone(), Box::new(first), Box::new(second))
        .run()
        .await
        .unwrap();

    let engine = engine.read().await;
    let status = engine.get_status();
    assert!(status.is_over());
    assert_eq!(*report.turn_number(), status.turn_number);
    // Every accepted move but the last advanced the counter.
    assert_eq!(engine.history().len() as u32, status.turn_number + 1);
    assert!(rules::is_settled(engine.board()));

    match report.outcome() {
        GameOutcome::Won(winner) => {
            assert_eq!(Some(winner), status.winner.as_ref());
            assert!(rules::has_four(engine.board(), winner.icon()));
        }
        GameOutcome::Draw => {
            assert!(status.draw);
            assert_eq!(engine.history().len(), ROWS * COLS);
        }
    }
}

#[tokio::test]
async fn test_console_players_reprompt_and_finish() {
    let backend = LocalBackend::fresh();
    let engine = backend.engine().clone();
    let x_out = SharedBuf::default();
    let o_out = SharedBuf::default();

    // X tries an out-of-range column and some garbage before settling on 0.
    let x = scripted_human("Xena", &backend, b"9\nabc\n0\n0\n0\n0\n", &x_out);
    let o = scripted_human("Otto", &backend, b"1\n1\n1\n", &o_out);
    let x_id = x.player_id().to_string();

    let report = LocalCoordinator::new(engine.clone(), Box::new(x), Box::new(o))
        .run()
        .await
        .unwrap();

    match report.outcome() {
        GameOutcome::Won(winner) => {
            assert_eq!(winner.icon(), Icon::X);
            assert_eq!(winner.id().as_str(), x_id);
        }
        other => panic!("expected X to win, got {other}"),
    }
    assert_eq!(*report.turn_number(), 6);

    let x_text = x_out.text();
    assert!(x_text.contains("Invalid move (column 9 is out of range)"));
    assert!(x_text.contains("It's your turn!"));
    assert!(x_text.contains("Congrats! Player X, you have won the Game!"));
    assert!(x_text.contains("X | O | 0 | 0 | 0 | 0 | 0 | 0"));
    assert!(o_out.text().contains("You have lost the Game!"));
    assert!(!o_out.text().contains("Invalid move"));
}

#[tokio::test]
async fn test_matrix_player_wins_with_joystick() {
    use StickDirection::*;

    let backend = LocalBackend::fresh();
    let engine = backend.engine().clone();
    let matrix = FrameBuffer::default();

    // Four presses of the middle button drop into column 0 each time.
    let x = Seat::new(
        "Joy",
        backend.clone(),
        JoystickPrompt::new(ScriptedStick::new([Middle, Middle, Middle, Middle]), matrix.clone()),
        MatrixView::new(ConsoleView::new(std::io::sink(), false), matrix.clone())
            .with_timing(Duration::ZERO, Duration::ZERO),
    );
    let o_out = SharedBuf::default();
    let o = scripted_human("Otto", &backend, b"1\n1\n1\n", &o_out);

    let report = LocalCoordinator::new(engine, Box::new(x), Box::new(o))
        .run()
        .await
        .unwrap();

    assert!(matches!(report.outcome(), GameOutcome::Won(w) if w.icon() == Icon::X));
    assert_eq!(
        matrix.messages(),
        vec![("Player red won!".to_string(), RED)]
    );
    assert_eq!(matrix.current(), [[RED; 8]; 8]);
}
