use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::ConnectionError;

/// Establish a connection to the database. Repositories open one connection
/// per operation; all cross-request coordination lives in Postgres, so the
/// process stays stateless and can be scaled horizontally.
pub fn establish_connection(database_url: &str) -> Result<PgConnection, ConnectionError> {
    match PgConnection::establish(database_url) {
        Ok(conn) => Ok(conn),
        Err(e) => {
            log::error!("failed to establish database connection: {}", e);
            Err(e)
        }
    }
}
