//! Namespaced key-value operations.

use crate::connection::RedisPool;
use larder_error::StoreResult;
use redis::{Commands, FromRedisValue, ToRedisArgs};
use std::num::NonZeroUsize;
use tracing::info;

/// Handle over the shared pool with an optional key namespace.
///
/// Cloning is cheap (the pool is reference counted). A handle created
/// with [`KeyStore::new`] addresses keys verbatim; one derived with
/// [`KeyStore::namespaced`] prefixes every key with `<namespace>:`,
/// giving plugins an isolated slice of the store. [`KeyStore::raw`]
/// opts back out, which callers need when operating on the fully
/// qualified keys returned by [`KeyStore::scan_keys`].
///
/// Every operation draws one pooled connection, issues one command, and
/// decodes the reply through `FromRedisValue`: an absent key or field
/// decodes to `None` when the caller asks for an `Option`.
#[derive(Clone, Debug)]
pub struct KeyStore {
    pool: RedisPool,
    namespace: Option<String>,
}

impl KeyStore {
    /// Create a handle with no namespace.
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            namespace: None,
        }
    }

    /// Derive a handle whose keys are written as `<namespace>:<key>`.
    pub fn namespaced(&self, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        info!(%namespace, "namespace handle created");
        Self {
            pool: self.pool.clone(),
            namespace: Some(namespace),
        }
    }

    /// Derive a handle with the namespace stripped.
    pub fn raw(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            namespace: None,
        }
    }

    /// The namespace applied to keys, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn conn(&self) -> StoreResult<r2d2::PooledConnection<redis::Client>> {
        Ok(self.pool.get()?)
    }

    fn make_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}:{key}"),
            None => key.to_string(),
        }
    }

    // ============================================================
    // String keys
    // ============================================================

    /// Read a key. Ask for `Option<T>` to observe absence.
    pub fn get<RV: FromRedisValue>(&self, key: &str) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.get(self.make_key(key))?)
    }

    /// Write a key.
    pub fn set<V: ToRedisArgs>(&self, key: &str, value: V) -> StoreResult<()> {
        let mut conn = self.conn()?;
        Ok(conn.set(self.make_key(key), value)?)
    }

    /// Delete a key; returns whether it existed.
    pub fn del(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.del(self.make_key(key))?)
    }

    /// Delete several keys in one command; returns how many existed.
    pub fn del_many(&self, keys: &[&str]) -> StoreResult<usize> {
        let qualified: Vec<String> = keys.iter().map(|key| self.make_key(key)).collect();
        let mut conn = self.conn()?;
        Ok(conn.del(qualified)?)
    }

    /// Whether a key exists.
    pub fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.exists(self.make_key(key))?)
    }

    /// Set a time-to-live in seconds; returns false when the key is absent.
    pub fn expire(&self, key: &str, seconds: i64) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.expire(self.make_key(key), seconds)?)
    }

    /// Remaining time-to-live in seconds (-1 without expiry, -2 when absent).
    pub fn ttl(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn()?;
        Ok(conn.ttl(self.make_key(key))?)
    }

    // ============================================================
    // Hashes
    // ============================================================

    /// Read one hash field.
    pub fn hget<RV: FromRedisValue>(&self, key: &str, field: &str) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.hget(self.make_key(key), field)?)
    }

    /// Write one hash field; returns whether the field was newly created.
    pub fn hset<V: ToRedisArgs>(&self, key: &str, field: &str, value: V) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.hset(self.make_key(key), field, value)?)
    }

    /// Write several hash fields in one command.
    pub fn hset_multiple<F: ToRedisArgs, V: ToRedisArgs>(
        &self,
        key: &str,
        items: &[(F, V)],
    ) -> StoreResult<()> {
        let mut conn = self.conn()?;
        Ok(conn.hset_multiple(self.make_key(key), items)?)
    }

    /// Delete one hash field; returns whether it existed.
    pub fn hdel(&self, key: &str, field: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.hdel(self.make_key(key), field)?)
    }

    /// Read a whole hash, empty when the key is absent.
    pub fn hgetall<RV: FromRedisValue>(&self, key: &str) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.hgetall(self.make_key(key))?)
    }

    /// Field names of a hash.
    pub fn hkeys(&self, key: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn()?;
        Ok(conn.hkeys(self.make_key(key))?)
    }

    /// Number of fields in a hash.
    pub fn hlen(&self, key: &str) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(conn.hlen(self.make_key(key))?)
    }

    /// Whether a hash field exists.
    pub fn hexists(&self, key: &str, field: &str) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.hexists(self.make_key(key), field)?)
    }

    /// Atomically add to an integer hash field; returns the new value.
    pub fn hincr(&self, key: &str, field: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.conn()?;
        Ok(conn.hincr(self.make_key(key), field, delta)?)
    }

    // ============================================================
    // Sets
    // ============================================================

    /// Add a member; returns whether it was absent before.
    pub fn sadd<M: ToRedisArgs>(&self, key: &str, member: M) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.sadd(self.make_key(key), member)?)
    }

    /// Remove a member; returns whether it was present.
    pub fn srem<M: ToRedisArgs>(&self, key: &str, member: M) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.srem(self.make_key(key), member)?)
    }

    /// Whether a member is in the set.
    pub fn sismember<M: ToRedisArgs>(&self, key: &str, member: M) -> StoreResult<bool> {
        let mut conn = self.conn()?;
        Ok(conn.sismember(self.make_key(key), member)?)
    }

    /// All members of a set, empty when the key is absent.
    pub fn smembers<RV: FromRedisValue>(&self, key: &str) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.smembers(self.make_key(key))?)
    }

    /// Number of members in a set.
    pub fn scard(&self, key: &str) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(conn.scard(self.make_key(key))?)
    }

    /// One random member, `None` when the set is empty.
    pub fn srandmember<RV: FromRedisValue>(&self, key: &str) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.srandmember(self.make_key(key))?)
    }

    /// Up to `count` distinct random members.
    pub fn srandmember_multiple<RV: FromRedisValue>(
        &self,
        key: &str,
        count: usize,
    ) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.srandmember_multiple(self.make_key(key), count)?)
    }

    // ============================================================
    // Lists
    // ============================================================

    /// Push to the head of a list; returns the new length.
    pub fn lpush<V: ToRedisArgs>(&self, key: &str, value: V) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(conn.lpush(self.make_key(key), value)?)
    }

    /// Slice of a list by inclusive indices (0, -1 for the whole list).
    pub fn lrange<RV: FromRedisValue>(
        &self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.lrange(self.make_key(key), start, stop)?)
    }

    /// Remove up to `count` occurrences of a value; returns how many went.
    pub fn lrem<V: ToRedisArgs>(&self, key: &str, count: isize, value: V) -> StoreResult<usize> {
        let mut conn = self.conn()?;
        Ok(conn.lrem(self.make_key(key), count, value)?)
    }

    /// Pop from the head of a list, `None` when empty.
    pub fn lpop<RV: FromRedisValue>(&self, key: &str) -> StoreResult<RV> {
        let mut conn = self.conn()?;
        Ok(conn.lpop(self.make_key(key), None::<NonZeroUsize>)?)
    }

    // ============================================================
    // Scanning and maintenance
    // ============================================================

    /// Keys matching a glob pattern.
    ///
    /// The namespace is applied to the pattern, but the returned keys are
    /// fully qualified as stored; read them through [`KeyStore::raw`].
    pub fn scan_keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let qualified = self.make_key(pattern);
        let mut conn = self.conn()?;
        let keys = conn
            .scan_match::<&str, String>(qualified.as_str())?
            .collect();
        Ok(keys)
    }

    /// Round-trip liveness check.
    pub fn ping(&self) -> StoreResult<()> {
        let mut conn = self.conn()?;
        redis::cmd("PING").query::<String>(&mut *conn)?;
        Ok(())
    }

    /// Ask the store to snapshot to disk in the background.
    pub fn background_save(&self) -> StoreResult<String> {
        let mut conn = self.conn()?;
        Ok(redis::cmd("BGSAVE").query(&mut *conn)?)
    }

    /// Number of keys in the selected database.
    pub fn db_size(&self) -> StoreResult<u64> {
        let mut conn = self.conn()?;
        Ok(redis::cmd("DBSIZE").query(&mut *conn)?)
    }

    /// Raw server INFO payload, optionally narrowed to one section.
    pub fn info(&self, section: Option<&str>) -> StoreResult<String> {
        let mut conn = self.conn()?;
        let mut cmd = redis::cmd("INFO");
        if let Some(section) = section {
            cmd.arg(section);
        }
        Ok(cmd.query(&mut *conn)?)
    }
}
