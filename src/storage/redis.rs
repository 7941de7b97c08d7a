use redis::Commands;

use super::KeyValueStore;

/// A store that uses Redis as a backing store.
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    /// Create a new Redis backed store.
    ///
    /// # Arguments
    ///
    /// * `connection_uri` - The connection string used to connect to Redis.
    /// * `prefix` - A namespace prepended to every key so that multiple
    ///   deployments can share one Redis instance.
    pub fn new(connection_uri: &str, prefix: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: redis::Client::open(connection_uri)?,
            prefix: prefix.to_owned(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let mut conn = self.client.get_connection()?;

        Ok(conn.get(self.namespaced(key))?)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut conn = self.client.get_connection()?;
        let _: () = conn.set(self.namespaced(key), value)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut conn = self.client.get_connection()?;
        let _: () = conn.del(self.namespaced(key))?;

        Ok(())
    }
}
