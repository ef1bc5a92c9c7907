//! Usage counters and their flush discipline.

use larder_error::StoreResult;
use larder_keystore::{KeyStore, RedisPool};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, info};

/// Key of the shared statistics hash.
const STATS_KEY: &str = "stats";

/// Pending increments per counter before a flush is triggered.
const FLUSH_THRESHOLD: u64 = 5;

/// The usage counters kept in the `stats` hash.
///
/// Each variant maps to one stored field; [`Stat::field`] gives the
/// exact name on the wire.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
)]
pub enum Stat {
    /// Messages seen across all guilds
    #[strum(serialize = "msgcount")]
    Messages,
    /// Commands invoked with bad arguments
    #[strum(serialize = "wrongargcount")]
    WrongArguments,
    /// Guilds that removed the bot
    #[strum(serialize = "serversleft")]
    GuildsLeft,
    /// Times a guild put the bot to sleep
    #[strum(serialize = "timesslept")]
    TimesSlept,
    /// Commands refused for missing permissions
    #[strum(serialize = "wrongpermscount")]
    PermissionDenials,
    /// Help requests answered
    #[strum(serialize = "peoplehelped")]
    PeopleHelped,
    /// Images sent
    #[strum(serialize = "imagessent")]
    ImagesSent,
    /// Votes received on the bot list
    #[strum(serialize = "votesgot")]
    VotesReceived,
    /// Times the bot was pinged
    #[strum(serialize = "timespinged")]
    TimesPinged,
    /// Messages removed by moderation filters
    #[strum(serialize = "messagessuppressed")]
    MessagesSuppressed,
    /// Bytes of images downloaded on behalf of users
    #[strum(serialize = "imagesize")]
    ImageBytes,
    /// Prayers said
    #[strum(serialize = "prayerssaid")]
    PrayersSaid,
}

impl Stat {
    /// Stored hash field for this counter.
    pub fn field(self) -> &'static str {
        self.into()
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Usage counters batched in memory and flushed to the shared hash.
///
/// Cloning shares the pending state; all clones feed the same batches.
/// Flushes use HINCRBY, so concurrent processes never lose each other's
/// increments to a read-modify-write race. Up to `threshold - 1`
/// increments per counter are lost if the process exits before a flush.
#[derive(Debug, Clone)]
pub struct StatsCounter {
    store: KeyStore,
    threshold: u64,
    inner: Arc<StatsCounterInner>,
}

#[derive(Debug)]
struct StatsCounterInner {
    pending: [std::sync::atomic::AtomicU64; Stat::COUNT],
    last_flush: parking_lot::Mutex<Option<Instant>>,
}

impl StatsCounterInner {
    fn new() -> Self {
        Self {
            pending: std::array::from_fn(|_| std::sync::atomic::AtomicU64::new(0)),
            last_flush: parking_lot::Mutex::new(None),
        }
    }
}

impl StatsCounter {
    /// Create a counter over the data pool, seeding the `stats` hash
    /// with zeroes on first deployment.
    pub fn new(pool: RedisPool) -> StoreResult<Self> {
        let counter = Self::unseeded(pool);
        counter.seed()?;
        Ok(counter)
    }

    /// Create a counter without the first-deployment seed write.
    pub fn unseeded(pool: RedisPool) -> Self {
        Self {
            store: KeyStore::new(pool),
            threshold: FLUSH_THRESHOLD,
            inner: Arc::new(StatsCounterInner::new()),
        }
    }

    /// Adjust the flush threshold; values below one clamp to one.
    pub fn with_flush_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold.max(1);
        self
    }

    /// Pending increments per counter before a flush is triggered.
    pub fn flush_threshold(&self) -> u64 {
        self.threshold
    }

    fn seed(&self) -> StoreResult<()> {
        if self.store.exists(STATS_KEY)? {
            debug!("stats hash found");
            return Ok(());
        }
        let zeroes: Vec<(&str, u64)> = Stat::iter().map(|stat| (stat.field(), 0)).collect();
        self.store.hset_multiple(STATS_KEY, &zeroes)?;
        info!("stats hash initialized");
        Ok(())
    }

    /// Count one occurrence of a statistic.
    ///
    /// Most calls return without touching the store; the call that
    /// reaches the threshold flushes the whole batch.
    pub fn record(&self, stat: Stat) -> StoreResult<()> {
        self.add(stat, 1)
    }

    /// Count `amount` occurrences of a statistic.
    pub fn add(&self, stat: Stat, amount: u64) -> StoreResult<()> {
        if amount == 0 {
            return Ok(());
        }
        if let Some(batch) = self.bump(stat, amount) {
            self.flush(stat, batch)?;
        }
        Ok(())
    }

    /// Count one occurrence by stored field name.
    ///
    /// Returns whether the name was recognized; unknown names are
    /// ignored so dynamic callers can feed labels straight through.
    pub fn record_by_name(&self, name: &str) -> StoreResult<bool> {
        match name.parse::<Stat>() {
            Ok(stat) => {
                self.record(stat)?;
                Ok(true)
            }
            Err(_) => {
                debug!(name, "unknown stat name ignored");
                Ok(false)
            }
        }
    }

    // Returns the batch to push when the pending count crossed the
    // threshold, resetting the cell.
    fn bump(&self, stat: Stat, amount: u64) -> Option<u64> {
        let cell = &self.inner.pending[stat.index()];
        let total = cell.fetch_add(amount, Ordering::Relaxed) + amount;
        if total >= self.threshold {
            let batch = cell.swap(0, Ordering::Relaxed);
            if batch > 0 {
                return Some(batch);
            }
        }
        None
    }

    fn flush(&self, stat: Stat, batch: u64) -> StoreResult<()> {
        match self.store.hincr(STATS_KEY, stat.field(), batch as i64) {
            Ok(total) => {
                *self.inner.last_flush.lock() = Some(Instant::now());
                debug!(stat = %stat, batch, total, "stats batch flushed");
                Ok(())
            }
            Err(err) => {
                // restore the batch so it rides the next flush
                self.inner.pending[stat.index()].fetch_add(batch, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    /// Push every pending batch out regardless of thresholds.
    ///
    /// Meant for shutdown, narrowing the documented loss window.
    pub fn flush_all(&self) -> StoreResult<()> {
        for stat in Stat::iter() {
            let batch = self.inner.pending[stat.index()].swap(0, Ordering::Relaxed);
            if batch > 0 {
                self.flush(stat, batch)?;
            }
        }
        Ok(())
    }

    /// Durable value of one counter, excluding pending increments.
    pub fn amount(&self, stat: Stat) -> StoreResult<u64> {
        let value: Option<u64> = self.store.hget(STATS_KEY, stat.field())?;
        Ok(value.unwrap_or(0))
    }

    /// Pending in-memory increments for one counter.
    pub fn pending(&self, stat: Stat) -> u64 {
        self.inner.pending[stat.index()].load(Ordering::Relaxed)
    }

    /// Durable values for every stored field, sorted by name.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, u64>> {
        Ok(self.store.hgetall(STATS_KEY)?)
    }

    /// Time since the most recent successful flush.
    pub fn last_flush_age(&self) -> Option<Duration> {
        let last = *self.inner.last_flush.lock();
        last.map(|at| at.elapsed())
    }
}
