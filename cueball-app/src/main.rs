//! Cueball match importer
//!
//! Imports match-record JSON files into an in-memory store through the
//! use-case layer, then lists what was stored.
//!
//! # Usage
//!
//! ```bash
//! # Import two matches
//! cargo run -p cueball-app -- league-night.json practice.json
//!
//! # Smaller pool, JSON logs
//! CUEBALL_ENV=production CUEBALL_POOL_CORE_SIZE=1 cargo run -p cueball-app -- match.json
//! ```
//!
//! # Environment Variables
//!
//! - `CUEBALL_ENV`: Environment (test, development, production)
//! - `CUEBALL_POOL_CORE_SIZE`: Runtime threads (default: 3)
//! - `CUEBALL_POOL_MAX_SIZE`: Jobs running at once (default: 5)
//! - `CUEBALL_POOL_KEEP_ALIVE_SECS`: Idle job thread lifetime (default: 10)
//! - `CUEBALL_THREAD_NAME_PREFIX`: Worker thread name prefix (default: cueball-worker-)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cueball_app::{
    load_match_file, match_summary, user_message, AddMatch, Config, Environment, GetMatchesList,
    Interactor,
};
use cueball_domain::Match;
use cueball_exec::{completion_loop, ExecError, JobExecutor, Observer};
use cueball_store::{MatchDataRepository, MatchFilter, MemoryStore};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How long to wait for the pool to drain before giving up
const WAIT_TIMEOUT: Duration = Duration::from_secs(30);

struct ImportObserver {
    path: String,
    imported: Arc<AtomicUsize>,
}

impl Observer<Match> for ImportObserver {
    fn on_next(&mut self, m: Match) {
        self.imported.fetch_add(1, Ordering::Relaxed);
        info!(path = %self.path, match_id = %m.id, turns = m.turn_count(), "Match imported");
    }

    fn on_error(&mut self, err: ExecError) {
        error!(path = %self.path, kind = %err.kind(), error = %user_message(&err), "Import failed");
    }
}

struct PrintObserver;

impl Observer<Vec<Match>> for PrintObserver {
    fn on_next(&mut self, matches: Vec<Match>) {
        for m in &matches {
            println!("{}  {}", m.id, match_summary(m));
        }
    }

    fn on_error(&mut self, err: ExecError) {
        eprintln!("{}", user_message(&err));
    }
}

fn init_tracing(environment: Environment) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("cueball=info".parse()?);

    if environment == Environment::Production {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(config.environment)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        core_size = config.pool.core_size,
        max_size = config.pool.max_size,
        "Cueball match importer"
    );

    // The main thread is the completion context
    let pool = Arc::new(JobExecutor::new(config.pool.clone())?);
    let (context, main_loop) = completion_loop();
    let context = Arc::new(context);
    let repository = Arc::new(MatchDataRepository::new(Arc::new(MemoryStore::new())));

    let add_match = Interactor::new(
        AddMatch::new(Arc::clone(&repository)),
        Arc::clone(&pool),
        Arc::clone(&context),
    );
    let imported = Arc::new(AtomicUsize::new(0));

    for path in std::env::args().skip(1) {
        match load_match_file(&path) {
            Ok(m) => {
                add_match.execute(
                    m,
                    ImportObserver {
                        path,
                        imported: Arc::clone(&imported),
                    },
                );
            },
            Err(e) => warn!(path = %path, error = %e, "Skipping file"),
        }
    }

    if !main_loop.run_until(WAIT_TIMEOUT, || add_match.active_count() == 0) {
        add_match.dispose();
        anyhow::bail!("import did not finish within {:?}", WAIT_TIMEOUT);
    }

    let list = Interactor::new(GetMatchesList::new(repository), Arc::clone(&pool), context);
    let handle = list.execute(MatchFilter::default(), PrintObserver);
    if !main_loop.run_until(WAIT_TIMEOUT, || handle.is_finished()) {
        list.dispose();
        anyhow::bail!("listing did not finish within {:?}", WAIT_TIMEOUT);
    }

    pool.close();
    info!(imported = imported.load(Ordering::Relaxed), "Import finished");
    Ok(())
}
