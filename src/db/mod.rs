pub mod biens;
pub mod insert;
pub mod schema;
pub mod tables;

use diesel_async::{AsyncConnection, AsyncMysqlConnection};
use log::info;

use crate::{config::Config, Result};

pub async fn establish_connection(config: &Config) -> Result<AsyncMysqlConnection> {
    let conn = AsyncMysqlConnection::establish(&config.database_url()?).await?;
    info!("Connected to MySQL database {} on {}", config.db_name, config.db_host);
    Ok(conn)
}
