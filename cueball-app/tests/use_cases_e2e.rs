//! E2E test: use cases through the executor, the repository and the
//! in-memory document store.
//!
//! Flow:
//! 1. Add a nine-ball match and record turns
//! 2. Undo a turn, edit notes and location
//! 3. Read it back, list with filters, delete it
//! 4. Failures arrive on the observer with a user-facing message
//! 5. Disposing an interactor suppresses everything it started

use std::sync::Arc;
use std::time::Duration;

use cueball_app::{
    user_message, AddMatch, AddTurn, Config, DeleteMatch, FieldUpdate, GetMatch, GetMatchesList,
    Interactor, TurnParams, UndoTurn, UpdateMatchLocation, UpdateMatchNotes, UseCase,
};
use cueball_domain::{
    AdvStats, BallStatus, GameType, Match, Participant, ShotType, TableStatus, Turn, TurnEnd,
};
use cueball_exec::{
    completion_loop, CompletionLoop, FailureKind, JobExecutor, LoopContext, QueuedPool, Recorded,
    RecordingObserver,
};
use cueball_store::{MatchDataRepository, MatchFilter, MemoryStore};

type Repository = MatchDataRepository<MemoryStore>;

struct Harness {
    store: Arc<MemoryStore>,
    repository: Arc<Repository>,
    pool: Arc<QueuedPool>,
    context: Arc<LoopContext>,
    main_loop: CompletionLoop,
}

impl Harness {
    fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let repository = Arc::new(MatchDataRepository::new(Arc::clone(&store)));
        let (context, main_loop) = completion_loop();
        Self {
            store,
            repository,
            pool: Arc::new(QueuedPool::new()),
            context: Arc::new(context),
            main_loop,
        }
    }

    fn interactor<U: UseCase>(&self, use_case: U) -> Interactor<U, QueuedPool, LoopContext> {
        Interactor::new(use_case, Arc::clone(&self.pool), Arc::clone(&self.context))
    }

    /// Run queued work, then deliver its results.
    fn settle(&self) {
        self.pool.run_queued().unwrap();
        self.main_loop.run_pending();
    }

    /// Execute one use case invocation to completion and return what the
    /// observer saw.
    fn run<U>(&self, use_case: U, params: U::Params) -> Vec<Recorded<U::Output>>
    where
        U: UseCase,
        U::Output: Clone,
    {
        let interactor = self.interactor(use_case);
        let observer = RecordingObserver::new();
        interactor.execute(params, observer.clone());
        self.settle();
        observer.events()
    }
}

fn new_match(game_type: GameType, player: &str, opponent: &str) -> Match {
    Match::new(
        Participant::new(player, "Player").unwrap(),
        Participant::new(opponent, "Opponent").unwrap(),
        game_type,
    )
    .unwrap()
}

fn nine_ball_turn(player: &str, made: usize) -> Turn {
    let mut table = TableStatus::new(GameType::BcaNineBall).unwrap();
    table.set_ball(BallStatus::Made, made).unwrap();
    Turn::new(
        TurnEnd::Miss,
        table,
        false,
        false,
        AdvStats::new(player).with_shot_type(ShotType::Cut),
    )
}

fn only_value<T>(events: Vec<Recorded<T>>) -> T {
    let mut events = events.into_iter();
    match (events.next(), events.next(), events.next()) {
        (Some(Recorded::Next(value)), Some(Recorded::Complete), None) => value,
        _ => panic!("expected exactly one value followed by completion"),
    }
}

fn only_error<T>(events: Vec<Recorded<T>>) -> (FailureKind, String) {
    let mut events = events.into_iter();
    match (events.next(), events.next()) {
        (Some(Recorded::Error(kind, message)), None) => (kind, message),
        _ => panic!("expected exactly one error"),
    }
}

// =============================================================================
// Test: Match lifecycle
// =============================================================================

#[test]
fn test_match_lifecycle() {
    let h = Harness::new();
    let repo = || Arc::clone(&h.repository);

    // Add
    let stored = only_value(h.run(AddMatch::new(repo()), new_match(GameType::BcaNineBall, "p1", "p2")));
    let id = stored.id.clone();

    // Three turns, then undo the last
    for (i, player) in ["p1", "p2", "p1"].iter().enumerate() {
        let events = h.run(AddTurn::new(repo()), TurnParams::new(&id, nine_ball_turn(player, i + 1)));
        assert_eq!(events, vec![Recorded::Complete]);
    }
    assert_eq!(h.run(UndoTurn::new(repo()), id.clone()), vec![Recorded::Complete]);

    // Edit details
    h.run(UpdateMatchNotes::new(repo()), FieldUpdate::new(&id, "solid break"));
    h.run(UpdateMatchLocation::new(repo()), FieldUpdate::new(&id, "Hall 3"));

    // Read back
    let loaded = only_value(h.run(GetMatch::new(repo()), id.clone()));
    assert_eq!(loaded.turn_count(), 2);
    assert_eq!(loaded.turns()[0].player_id(), "p1");
    assert_eq!(loaded.turns()[1].player_id(), "p2");
    assert_eq!(loaded.turns()[1].table.ball(2).unwrap(), BallStatus::Made);
    assert_eq!(loaded.notes, "solid break");
    assert_eq!(loaded.location, "Hall 3");

    // Stored turn keys follow play order
    let document = h.store.document(&id).unwrap();
    let keys: Vec<_> = document["turns"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["key_0", "key_1"]);

    // Delete
    assert_eq!(h.run(DeleteMatch::new(repo()), id.clone()), vec![Recorded::Complete]);
    let (kind, _) = only_error(h.run(GetMatch::new(repo()), id));
    assert_eq!(kind, FailureKind::NotFound);
}

#[test]
fn test_matches_list_filters() {
    let h = Harness::new();
    let repo = || Arc::clone(&h.repository);
    h.run(AddMatch::new(repo()), new_match(GameType::BcaNineBall, "p1", "p2"));
    h.run(AddMatch::new(repo()), new_match(GameType::BcaEightBall, "p3", "p1"));
    h.run(AddMatch::new(repo()), new_match(GameType::BcaNineBall, "p3", "p4"));

    let all = only_value(h.run(GetMatchesList::new(repo()), MatchFilter::default()));
    let p1 = only_value(h.run(GetMatchesList::new(repo()), MatchFilter::for_player("p1")));
    let p1_nine = only_value(h.run(
        GetMatchesList::new(repo()),
        MatchFilter::for_player("p1").with_game_type(GameType::BcaNineBall),
    ));

    assert_eq!(all.len(), 3);
    assert_eq!(p1.len(), 2);
    assert_eq!(p1_nine.len(), 1);
    assert_eq!(p1_nine[0].opponent.id, "p2");
}

// =============================================================================
// Test: Failures
// =============================================================================

#[test]
fn test_connection_failure_reaches_observer() {
    let h = Harness::new();
    h.store.set_fail_next(true);

    let (kind, message) = only_error(h.run(GetMatchesList::new(Arc::clone(&h.repository)), MatchFilter::default()));

    assert_eq!(kind, FailureKind::Connection);
    assert!(message.contains("simulated connection failure"));
}

#[test]
fn test_turn_for_wrong_game_is_an_error() {
    let h = Harness::new();
    let repo = || Arc::clone(&h.repository);
    let stored = only_value(h.run(AddMatch::new(repo()), new_match(GameType::BcaEightBall, "p1", "p2")));

    let (kind, _) = only_error(h.run(AddTurn::new(repo()), TurnParams::new(&stored.id, nine_ball_turn("p1", 1))));

    assert_eq!(kind, FailureKind::Other);
    let document = h.store.document(&stored.id).unwrap();
    assert!(document["turns"].as_object().unwrap().is_empty());
}

#[test]
fn test_user_message_for_missing_match() {
    let h = Harness::new();
    let interactor = h.interactor(GetMatch::new(Arc::clone(&h.repository)));
    let messages = Arc::new(std::sync::Mutex::new(Vec::new()));

    struct Messages(Arc<std::sync::Mutex<Vec<String>>>);
    impl cueball_exec::Observer<Match> for Messages {
        fn on_error(&mut self, err: cueball_exec::ExecError) {
            self.0.lock().unwrap().push(user_message(&err));
        }
    }

    interactor.execute("missing".to_string(), Messages(Arc::clone(&messages)));
    h.settle();

    assert_eq!(*messages.lock().unwrap(), vec!["That match no longer exists.".to_string()]);
}

// =============================================================================
// Test: Dispose
// =============================================================================

#[test]
fn test_dispose_suppresses_pending_results() {
    let h = Harness::new();
    let add = h.interactor(AddMatch::new(Arc::clone(&h.repository)));
    let first = RecordingObserver::new();
    let second = RecordingObserver::new();

    add.execute(new_match(GameType::BcaNineBall, "p1", "p2"), first.clone());
    add.execute(new_match(GameType::BcaNineBall, "p1", "p3"), second.clone());
    add.dispose();
    add.dispose();
    h.settle();

    assert!(first.events().is_empty());
    assert!(second.events().is_empty());
    assert_eq!(add.active_count(), 0);
    assert_eq!(h.store.match_count(), 0);
}

#[test]
fn test_dispose_only_affects_own_interactor() {
    let h = Harness::new();
    let add = h.interactor(AddMatch::new(Arc::clone(&h.repository)));
    let list = h.interactor(GetMatchesList::new(Arc::clone(&h.repository)));
    let added = RecordingObserver::new();
    let listed = RecordingObserver::new();

    add.execute(new_match(GameType::BcaNineBall, "p1", "p2"), added.clone());
    list.execute(MatchFilter::default(), listed.clone());
    list.dispose();
    h.settle();

    assert_eq!(added.completions(), 1);
    assert!(listed.events().is_empty());
}

// =============================================================================
// Test: Real worker pool
// =============================================================================

#[test]
fn test_use_cases_on_job_executor() {
    let config = Config::test();
    let pool = Arc::new(JobExecutor::new(config.pool).unwrap());
    let (context, main_loop) = completion_loop();
    let context = Arc::new(context);
    let repository = Arc::new(MatchDataRepository::new(Arc::new(MemoryStore::new())));

    let add = Interactor::new(AddMatch::new(Arc::clone(&repository)), Arc::clone(&pool), Arc::clone(&context));
    let added = RecordingObserver::new();
    for opponent in ["p2", "p3", "p4"] {
        add.execute(new_match(GameType::BcaTenBall, "p1", opponent), added.clone());
    }
    assert!(main_loop.run_until(Duration::from_secs(5), || added.completions() == 3));

    let list = Interactor::new(GetMatchesList::new(repository), pool, context);
    let listed = RecordingObserver::new();
    let handle = list.execute(MatchFilter::for_player("p1"), listed.clone());
    assert!(main_loop.run_until(Duration::from_secs(5), || handle.is_finished()));

    assert_eq!(added.values().len(), 3);
    assert_eq!(listed.values()[0].len(), 3);
}
