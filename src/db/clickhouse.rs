//! ClickHouse over its HTTP interface

use tracing::{debug, info};
use url::Url;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

use super::bind::bind_params;
use super::Connection;

/// Blocking ClickHouse session.
///
/// Each statement is one POST request. Dropping the value releases the
/// underlying connection pool.
pub struct ClickHouseConnection {
    agent: ureq::Agent,
    endpoint: Url,
    user: String,
    password: String,
}

impl ClickHouseConnection {
    /// Connect and check that the server answers
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();

        let mut endpoint = config.url.clone();
        endpoint
            .query_pairs_mut()
            .append_pair("database", &config.database);

        let conn = Self {
            agent,
            endpoint,
            user: config.user.clone(),
            password: config.password.clone(),
        };
        conn.ping()?;

        info!(url = %config.url, database = %config.database, "connected to ClickHouse");
        Ok(conn)
    }

    /// Run `SELECT 1` and expect `1` back
    pub fn ping(&self) -> Result<()> {
        let answer = self.send("SELECT 1")?;
        if answer.trim() != "1" {
            return Err(Error::storage(format!(
                "unexpected ping response: {:?}",
                answer.trim()
            )));
        }
        Ok(())
    }

    fn send(&self, body: &str) -> Result<String> {
        let mut request = self
            .agent
            .post(self.endpoint.as_str())
            .set("Content-Type", "text/plain; charset=utf-8")
            .set("X-ClickHouse-User", &self.user);
        if !self.password.is_empty() {
            request = request.set("X-ClickHouse-Key", &self.password);
        }

        match request.send_string(body) {
            Ok(resp) => resp
                .into_string()
                .map_err(|err| Error::storage(format!("failed to read response: {}", err))),
            Err(ureq::Error::Status(code, resp)) => {
                let message = resp.into_string().unwrap_or_default();
                Err(Error::storage(format!(
                    "server returned {}: {}",
                    code,
                    message.trim()
                )))
            }
            Err(ureq::Error::Transport(err)) => {
                Err(Error::storage(format!("request failed: {}", err)))
            }
        }
    }
}

impl Connection for ClickHouseConnection {
    fn execute(&mut self, statement: &str, params: &[String]) -> Result<()> {
        let sql = bind_params(statement, params)?;
        debug!(params = params.len(), bytes = sql.len(), "executing statement");
        self.send(&sql).map(|_| ())
    }

    fn query_scalar(&mut self, statement: &str) -> Result<String> {
        debug!(statement, "querying scalar");
        let body = self.send(statement)?;
        Ok(body.trim().to_string())
    }
}

impl Drop for ClickHouseConnection {
    fn drop(&mut self) {
        debug!(endpoint = %self.endpoint, "closing ClickHouse connection");
    }
}
