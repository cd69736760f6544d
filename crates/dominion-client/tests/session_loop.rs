// crates/dominion-client/tests/session_loop.rs
use std::time::Duration;

use dominion_client::decision::FixedMove;
use dominion_client::session::{Session, SessionError, TurnRecord};
use dominion_core::{Block, BlockKind, DuplicateBlockPolicy, GameStateSnapshot, MoveToken};
use dominion_protocol::{ParseOptions, ProtocolError};
use tokio::io::{AsyncWriteExt, BufReader};

const TWO_TURNS: &[u8] = b"\
@PRELIMINARY@\n\
*phase: action*\n\
@PLAYER-HAND@\n\
*copper, 3*\n\
*estate, 2*\n\
response?\n\
@PRELIMINARY@\n\
*phase: buy*\n\
*number of coins: 3*\n\
@KINGDOM@\n\
*village, 10*\n\
@TRASH@\n\
response?\n";

#[tokio::test]
async fn single_turn_prints_then_answers() {
    let mut session = Session::new(TWO_TURNS, Vec::new(), FixedMove::new("copper"));

    let mut seen = Vec::new();
    let played = session
        .run(1, |record: &TurnRecord| seen.push(record.clone()))
        .await
        .unwrap();

    assert_eq!(played, 1);
    assert_eq!(session.writer().as_slice(), b"copper\n");

    let record = &seen[0];
    assert_eq!(record.turn, 1);
    assert_eq!(record.mv, MoveToken::from("copper"));
    assert_eq!(record.snapshot.phase(), Some("action"));
    assert_eq!(
        record.snapshot.block(BlockKind::PlayerHand).and_then(|h| h.count("copper")),
        Some(3)
    );
    assert!(record.report.is_clean());
}

#[tokio::test]
async fn plays_until_engine_closes_when_unbounded() {
    let mut turn_phases = Vec::new();
    let policy = |snapshot: &GameStateSnapshot| match snapshot.phase() {
        Some("buy") => MoveToken::from("village"),
        _ => MoveToken::from("0"),
    };
    let mut session = Session::new(TWO_TURNS, Vec::new(), policy);

    let played = session
        .run(0, |record| {
            turn_phases.push(record.snapshot.phase().map(str::to_string))
        })
        .await
        .unwrap();

    assert_eq!(played, 2);
    assert_eq!(session.turns_played(), 2);
    assert_eq!(
        turn_phases,
        [Some("action".to_string()), Some("buy".to_string())]
    );

    let (_, written) = session.into_parts();
    assert_eq!(written, b"0\nvillage\n");
}

#[tokio::test]
async fn bounded_run_fails_when_engine_stops_early() {
    let mut session = Session::new(TWO_TURNS, Vec::new(), FixedMove::new("copper"));

    let err = session.run(3, |_| {}).await.unwrap_err();
    assert_eq!(err.turn(), 3);
    assert!(matches!(
        err,
        SessionError::Protocol {
            source: ProtocolError::UnexpectedEndOfStream { lines_read: 0 },
            ..
        }
    ));
    // Both complete turns were still answered.
    assert_eq!(session.writer().as_slice(), b"copper\ncopper\n");
}

#[tokio::test]
async fn turn_cut_off_mid_way_is_an_error_even_when_unbounded() {
    let input: &[u8] = b"@TRASH@\n*gold, 1*\n";
    let mut session = Session::new(input, Vec::new(), FixedMove::new("copper"));

    let err = session.run(0, |_| {}).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Protocol {
            turn: 1,
            source: ProtocolError::UnexpectedEndOfStream { lines_read: 2 },
        }
    ));
    assert!(session.writer().is_empty());
}

#[tokio::test]
async fn merge_policy_reaches_the_parser() {
    let input: &[u8] =
        b"@PLAYER-HAND@\n*copper, 3*\n@PLAYER-HAND@\n*silver, 1*\nresponse?\n";
    let mut session = Session::new(input, Vec::new(), FixedMove::new("copper"))
        .with_parse_options(ParseOptions {
            duplicate_blocks: DuplicateBlockPolicy::Merge,
        });

    let record = session.play_turn(|_| {}).await.unwrap();
    let hand = record.snapshot.block(BlockKind::PlayerHand).unwrap();
    assert_eq!(hand.len(), 2);
    assert_eq!(record.report.duplicate_blocks, 1);
}

#[tokio::test]
async fn silent_engine_times_out() {
    // Keep the engine end open so the read really blocks.
    let (_engine_end, adapter_end) = tokio::io::duplex(64);
    let reader = BufReader::new(adapter_end);
    let mut session = Session::new(reader, Vec::new(), FixedMove::new("copper"))
        .with_read_timeout(Some(Duration::from_millis(20)));

    let err = session.play_turn(|_| {}).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Timeout {
            turn: 1,
            after_ms: 20
        }
    ));
}

#[tokio::test]
async fn turn_resumes_after_a_timeout() {
    let (mut engine_end, adapter_end) = tokio::io::duplex(64);
    let reader = BufReader::new(adapter_end);
    let mut session = Session::new(reader, Vec::new(), FixedMove::new("copper"))
        .with_read_timeout(Some(Duration::from_millis(20)));

    engine_end
        .write_all(b"@PLAYER-HAND@\n*copper, 3*\n")
        .await
        .unwrap();
    let err = session.play_turn(|_| {}).await.unwrap_err();
    assert!(matches!(err, SessionError::Timeout { turn: 1, .. }));
    assert!(session.writer().is_empty());

    engine_end
        .write_all(b"*estate, 2*\nresponse?\n")
        .await
        .unwrap();
    let record = session.play_turn(|_| {}).await.unwrap();
    assert_eq!(record.turn, 1);
    assert_eq!(
        record.snapshot,
        GameStateSnapshot::from([(
            BlockKind::PlayerHand,
            [("copper", "3"), ("estate", "2")].into_iter().collect::<Block>(),
        )])
    );
    assert_eq!(session.writer().as_slice(), b"copper\n");
}
