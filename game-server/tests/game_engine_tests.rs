
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;

use game_core::{ScoringEngine, WordBank, is_anagram};
use game_persistence::{GameStateRepository, connection::connect_and_migrate};
use game_server::{EngineError, GameEngine};
use game_types::{GuessOutcome, GuessVerdict, Language, ScoreRecord, UserTotals};
use test_helpers::*;

#[tokio::test]
async fn test_full_round_end_to_end() {
    let setup = TestSetup::with_english("chair");

    let round = setup
        .engine
        .start_game("C1", Some(Language::En), Some(5))
        .await
        .unwrap();

    assert_eq!(round.channel, "C1");
    assert_eq!(round.language, Language::En);
    assert_eq!(round.word_length, 5);
    assert_eq!(round.points, 7);
    assert!(is_anagram(&round.hint, "chair"));
    assert!(!round.history_reset);
    assert_eq!(setup.answer("C1").await, "chair");

    let outcome = setup.engine.guess_word("C1", "U1", "chair").await.unwrap();
    let GuessOutcome::Solved(solved) = outcome else {
        panic!("expected a solved round, got {outcome:?}");
    };

    assert_eq!(solved.user, "U1");
    assert_eq!(solved.word, "chair");
    assert_eq!(solved.points_earned, 7);
    assert_eq!(solved.total_points, 7);
    assert_eq!(solved.guess_count, 1);
    assert_eq!(solved.rank, "1st");
    assert!(solved.to_string().starts_with("<@U1> guessed their 1st knot"));

    let state = setup.state("C1").await;
    assert_eq!(
        state.scores["U1"],
        ScoreRecord::Detailed(UserTotals {
            points: 7,
            words: vec!["chair".to_string()],
        })
    );
    assert!(!state.updated_at.is_empty());
}

#[tokio::test]
async fn test_solving_the_only_word_resets_history() {
    let setup = TestSetup::with_english("chair");
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();

    let outcome = setup.engine.guess_word("C1", "U1", "chair").await.unwrap();
    let GuessOutcome::Solved(solved) = outcome else {
        panic!("expected a solved round");
    };

    // the next length falls back to five letters, where "chair" is used up
    assert!(solved.next_round.history_reset);
    assert_eq!(solved.next_round.word_length, 5);

    let state = setup.state("C1").await;
    assert_eq!(state.answer, "chair");
    assert!(state.used_words.is_empty());
    assert_eq!(state.totals("U1").unwrap().points, 7);
}

#[tokio::test]
async fn test_wrong_guesses_do_not_touch_state() {
    let setup = TestSetup::with_english("chair");
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();

    let saves = setup.store.save_count();
    let before = setup.state("C1").await;

    for (guess, expected) in [
        ("cat", GuessVerdict::WrongLength),
        ("chairs", GuessVerdict::WrongLength),
        ("chaid", GuessVerdict::WrongLetters),
        ("rhaic", GuessVerdict::Anagram),
    ] {
        let outcome = setup.engine.guess_word("C1", "U1", guess).await.unwrap();
        assert_eq!(outcome, GuessOutcome::Incorrect { verdict: expected });
    }

    assert_eq!(setup.store.save_count(), saves);
    assert_eq!(setup.state("C1").await, before);
}

#[tokio::test]
async fn test_anagram_of_answer_is_not_accepted() {
    let setup = TestSetup::with_english("listen");
    setup.engine.start_game("C1", None, Some(6)).await.unwrap();

    let outcome = setup.engine.guess_word("C1", "U1", "silent").await.unwrap();
    assert_eq!(
        outcome,
        GuessOutcome::Incorrect {
            verdict: GuessVerdict::Anagram
        }
    );

    let outcome = setup.engine.guess_word("C1", "U1", "LISTEN").await.unwrap();
    assert!(outcome.is_solved());
}

#[tokio::test]
async fn test_answers_do_not_repeat_until_exhausted() {
    let setup = TestSetup::with_english("apple\nchair\nhouse\nmouse\ntrain");
    let mut answers = HashSet::new();

    for _ in 0..5 {
        let round = setup.engine.start_game("C1", None, Some(5)).await.unwrap();
        assert!(!round.history_reset);
        answers.insert(setup.answer("C1").await);
    }
    assert_eq!(answers.len(), 5);

    let state = setup.state("C1").await;
    assert_eq!(state.used_words.len(), 4);

    let retired = setup.answer("C1").await;
    let saves = setup.store.save_count();
    let round = setup.engine.start_game("C1", None, None).await.unwrap();
    assert!(round.history_reset);

    // the cleared history is persisted before the retried draw is saved
    assert_eq!(setup.store.save_count(), saves + 2);
    let state = setup.state("C1").await;
    assert_eq!(state.used_words, vec![retired.clone()]);
    assert_ne!(state.answer, retired);
    assert!(answers.contains(&state.answer));
}

#[tokio::test]
async fn test_reset_never_repeats_the_retired_answer() {
    for channel in 0..20 {
        let channel = format!("C{channel}");
        let setup = TestSetup::with_english("chair\ntable");

        setup.engine.start_game(&channel, None, Some(5)).await.unwrap();
        let first = setup.answer(&channel).await;
        setup.engine.start_game(&channel, None, None).await.unwrap();
        let second = setup.answer(&channel).await;
        assert_ne!(first, second);

        let round = setup.engine.start_game(&channel, None, None).await.unwrap();
        assert!(round.history_reset);

        let state = setup.state(&channel).await;
        assert_eq!(state.answer, first);
        assert_eq!(state.used_words, vec![second]);
    }
}

#[tokio::test]
async fn test_reset_after_correct_guess_keeps_solved_word_in_history() {
    let setup = TestSetup::with_english("chair\ntable");
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();

    let first = setup.answer("C1").await;
    let outcome = setup.engine.guess_word("C1", "U1", &first).await.unwrap();
    let GuessOutcome::Solved(solved) = outcome else {
        panic!("expected a solved round");
    };
    assert!(!solved.next_round.history_reset);

    let second = setup.answer("C1").await;
    let outcome = setup.engine.guess_word("C1", "U1", &second).await.unwrap();
    let GuessOutcome::Solved(solved) = outcome else {
        panic!("expected a solved round");
    };
    assert!(solved.next_round.history_reset);

    let state = setup.state("C1").await;
    assert_eq!(state.answer, first);
    assert_eq!(state.used_words, vec![second]);
    assert_eq!(state.totals("U1").unwrap().guess_count(), 2);
}

#[tokio::test]
async fn test_correct_guesses_never_repeat_answers() {
    let setup = TestSetup::new();
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();

    let mut answers = vec![setup.answer("C1").await];
    for _ in 0..10 {
        let answer = answers.last().unwrap().clone();
        let outcome = setup.engine.guess_word("C1", "U1", &answer).await.unwrap();
        assert!(outcome.is_solved());

        let state = setup.state("C1").await;
        assert!(!state.used_words.contains(&state.answer));
        assert_eq!(state.used_words.len(), answers.len());
        answers.push(state.answer);
    }

    let distinct: HashSet<_> = answers.iter().collect();
    assert_eq!(distinct.len(), answers.len());
}

#[tokio::test]
async fn test_no_matching_words() {
    let setup = TestSetup::new();

    let error = setup
        .engine
        .start_game("C1", Some(Language::En), Some(9))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        EngineError::NoMatchingWords {
            language: Language::En,
            length: 9
        }
    ));
    assert_eq!(error.to_string(), "There are no 9-letter words in en.");

    let setup = TestSetup::with_english("chair");
    let error = setup
        .engine
        .start_game("C1", Some(Language::Fi), Some(5))
        .await
        .unwrap_err();
    assert!(matches!(error, EngineError::NoMatchingWords { .. }));
    assert_eq!(setup.store.save_count(), 0);
}

#[tokio::test]
async fn test_no_active_game() {
    let setup = TestSetup::new();

    let error = setup
        .engine
        .guess_word("C9", "U1", "chair")
        .await
        .unwrap_err();
    assert!(matches!(error, EngineError::NoActiveGame { ref channel } if channel == "C9"));

    let error = setup.engine.show_stats("C9", "U1").await.unwrap_err();
    assert!(matches!(error, EngineError::NoActiveGame { .. }));
}

#[tokio::test]
async fn test_scores_accumulate() {
    let setup = TestSetup::new();
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();

    let mut expected_total = 0;
    for (i, rank) in ["1st", "2nd", "3rd", "4th"].iter().enumerate() {
        let answer = setup.answer("C1").await;
        expected_total += ScoringEngine::word_points(&answer);

        let outcome = setup.engine.guess_word("C1", "U1", &answer).await.unwrap();
        let GuessOutcome::Solved(solved) = outcome else {
            panic!("expected {answer} to solve the round");
        };
        assert_eq!(solved.rank, *rank);
        assert_eq!(solved.guess_count, i + 1);
        assert_eq!(solved.total_points, expected_total);
    }

    let totals = setup.state("C1").await.totals("U1").unwrap();
    assert_eq!(totals.points, expected_total);
    assert_eq!(totals.guess_count(), 4);
}

#[tokio::test]
async fn test_legacy_score_is_upgraded() {
    let setup = TestSetup::new();
    setup
        .insert_state_json(
            "C1",
            r#"{"channel":"C1","language":"en","answer":"chair","hint":"rihac","points":7,"scores":{"U1":12}}"#,
        )
        .await;

    let outcome = setup.engine.guess_word("C1", "U1", "chair").await.unwrap();
    let GuessOutcome::Solved(solved) = outcome else {
        panic!("expected a solved round");
    };
    assert_eq!(solved.total_points, 19);
    assert_eq!(solved.rank, "1st");

    let raw = setup.store.raw("knot-C1").await.unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["scores"]["U1"]["points"], 19);
    assert_eq!(json["scores"]["U1"]["words"], serde_json::json!(["chair"]));
    assert_eq!(json["usedWords"], serde_json::json!(["chair"]));
}

#[tokio::test]
async fn test_failed_next_round_keeps_score_unsaved() {
    // no English words at all, so the next round can never be drawn
    let setup = TestSetup::with_words(WordBank::new().with_word_list(Language::Fi, "kissa"));
    setup
        .insert_state_json(
            "C1",
            r#"{"channel":"C1","language":"en","answer":"chair","hint":"rihac","points":7}"#,
        )
        .await;

    let error = setup
        .engine
        .guess_word("C1", "U1", "chair")
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        EngineError::NoMatchingWords {
            language: Language::En,
            length: 5
        }
    ));

    assert_eq!(setup.store.save_count(), 0);
    let state = setup.state("C1").await;
    assert_eq!(state.answer, "chair");
    assert!(state.scores.is_empty());
}

#[tokio::test]
async fn test_show_stats() {
    let setup = TestSetup::with_english("chair");
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();

    let text = setup.engine.show_stats("C1", "U1").await.unwrap();
    assert_eq!(text, "<@U1> has not guessed any knots yet.");

    setup.engine.guess_word("C1", "U1", "chair").await.unwrap();
    let text = setup.engine.show_stats("C1", "U1").await.unwrap();
    assert!(text.starts_with("<@U1> has guessed 1 knots for 7 points."));
    assert!(text.contains("Shortest: chair (7 points)"));
}

#[tokio::test]
async fn test_storage_failure_is_reported() {
    let engine = GameEngine::new(
        Arc::new(FailingStore),
        Arc::new(create_test_bank()),
        english_settings(),
    );

    let error = engine.start_game("C1", None, None).await.unwrap_err();
    assert!(matches!(error, EngineError::Storage(_)));
    assert!(error.to_string().contains("database is locked"));
}

#[tokio::test]
async fn test_channels_are_independent() {
    let setup = TestSetup::new();
    setup
        .engine
        .start_game("C1", Some(Language::En), Some(5))
        .await
        .unwrap();
    setup
        .engine
        .start_game("C2", Some(Language::Fi), Some(5))
        .await
        .unwrap();

    let c1 = setup.state("C1").await;
    let c2 = setup.state("C2").await;
    assert_eq!(c1.language, Language::En);
    assert_eq!(c2.language, Language::Fi);

    let outcome = setup
        .engine
        .guess_word("C2", "U1", &c1.answer)
        .await
        .unwrap();
    assert!(!outcome.is_solved());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_starts_are_serialized() {
    let setup = TestSetup::new();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let engine = setup.engine.clone();
            tokio::spawn(async move { engine.start_game("C1", None, Some(5)).await })
        })
        .collect();

    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    // every start but the first retires one answer; no update is lost
    let state = setup.state("C1").await;
    assert_eq!(state.used_words.len(), 9);
    let distinct: HashSet<_> = state.used_words.iter().collect();
    assert_eq!(distinct.len(), 9);
    assert!(!state.used_words.contains(&state.answer));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_correct_guesses_score_once() {
    let setup = TestSetup::new();
    setup.engine.start_game("C1", None, Some(5)).await.unwrap();
    let answer = setup.answer("C1").await;

    let handles: Vec<_> = ["U1", "U2", "U3"]
        .into_iter()
        .map(|user| {
            let engine = setup.engine.clone();
            let answer = answer.clone();
            tokio::spawn(async move { engine.guess_word("C1", user, &answer).await })
        })
        .collect();

    let outcomes: Vec<GuessOutcome> = join_all(handles)
        .await
        .into_iter()
        .map(|result| result.unwrap().unwrap())
        .collect();

    assert_eq!(outcomes.iter().filter(|o| o.is_solved()).count(), 1);

    let state = setup.state("C1").await;
    assert_eq!(state.scores.len(), 1);
    assert_eq!(state.used_words, vec![answer]);
}

#[tokio::test]
async fn test_engine_over_sql_store() {
    let db = connect_and_migrate("sqlite::memory:").await.unwrap();
    let store = Arc::new(GameStateRepository::new(db));
    let engine = GameEngine::new(
        store.clone(),
        Arc::new(WordBank::new().with_word_list(Language::En, "chair")),
        english_settings(),
    );

    engine.start_game("C1", None, Some(5)).await.unwrap();
    let outcome = engine.guess_word("C1", "U1", "chair").await.unwrap();
    assert!(outcome.is_solved());

    let state = store.find_by_key("knot-C1").await.unwrap().unwrap();
    assert_eq!(state.totals("U1").unwrap().points, 7);
    assert_eq!(store.count().await.unwrap(), 1);
}
