use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use diesel::SqliteConnection;
use std::sync::Arc;

use tradebook_core::errors::{DatabaseError, Error, Result};
use tradebook_core::{Trade, TradeInsert, TradeRepositoryTrait};

use super::model::{NewTradeDB, TradeDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::trades;

diesel::define_sql_function! {
    fn upper(x: Text) -> Text;
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

const DUPLICATE_GROUPS_SQL: &str = "SELECT COUNT(*) AS count FROM (\
     SELECT 1 FROM trades \
     GROUP BY symbol, trade_date, quantity, price, trade_type \
     HAVING COUNT(*) > 1)";

fn to_domain(rows: Vec<TradeDB>) -> Result<Vec<Trade>> {
    rows.into_iter().map(Trade::try_from).collect()
}

fn insert_trade(conn: &mut SqliteConnection, trade: TradeInsert) -> Result<Trade> {
    let row = diesel::insert_into(trades::table)
        .values(&NewTradeDB::from(trade))
        .returning(TradeDB::as_returning())
        .get_result(conn)
        .map_err(StorageError::from)?;
    Trade::try_from(row)
}

/// SQLite-backed ledger store. Reads use the pool; writes go through the
/// single writer actor.
pub struct TradeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TradeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TradeRepository { pool, writer }
    }
}

#[async_trait]
impl TradeRepositoryTrait for TradeRepository {
    fn get_trade(&self, trade_id: i32) -> Result<Option<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let row = trades::table
            .find(trade_id)
            .select(TradeDB::as_select())
            .first::<TradeDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        row.map(Trade::try_from).transpose()
    }

    fn get_trades(&self) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = trades::table
            .select(TradeDB::as_select())
            .order((
                trades::trade_date.asc(),
                trades::created_at.asc(),
                trades::id.asc(),
            ))
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn get_trades_by_symbol(&self, symbol: &str) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = trades::table
            .filter(upper(trades::symbol).eq(symbol.to_uppercase()))
            .select(TradeDB::as_select())
            .order((
                trades::trade_date.asc(),
                trades::created_at.asc(),
                trades::id.asc(),
            ))
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn get_trades_up_to(&self, as_of: NaiveDate, symbol: Option<&str>) -> Result<Vec<Trade>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = trades::table
            .filter(trades::trade_date.le(as_of))
            .select(TradeDB::as_select())
            .into_boxed();
        if let Some(symbol) = symbol {
            query = query.filter(upper(trades::symbol).eq(symbol.to_uppercase()));
        }
        let rows = query
            .order((
                trades::trade_date.asc(),
                trades::created_at.asc(),
                trades::id.asc(),
            ))
            .load::<TradeDB>(&mut conn)
            .map_err(StorageError::from)?;
        to_domain(rows)
    }

    fn count_trades(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(trades::table
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn count_trades_before(&self, cutoff: NaiveDate) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(trades::table
            .filter(trades::trade_date.lt(cutoff))
            .count()
            .get_result::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn count_duplicate_groups(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let row = diesel::sql_query(DUPLICATE_GROUPS_SQL)
            .get_result::<CountRow>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(row.count)
    }

    fn ping(&self) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }

    async fn create_trade(&self, trade: TradeInsert) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> { insert_trade(conn, trade) })
            .await
    }

    async fn create_trades(&self, new_trades: Vec<TradeInsert>) -> Result<usize> {
        let rows: Vec<NewTradeDB> = new_trades.into_iter().map(NewTradeDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::insert_into(trades::table)
                    .values(&rows)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn replace_trade(&self, trade_id: i32, trade: TradeInsert) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                let deleted = diesel::delete(trades::table.find(trade_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if deleted == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Trade {} not found",
                        trade_id
                    ))));
                }
                insert_trade(conn, trade)
            })
            .await
    }

    async fn delete_trade(&self, trade_id: i32) -> Result<Trade> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Trade> {
                let row = diesel::delete(trades::table.find(trade_id))
                    .returning(TradeDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Trade::try_from(row)
            })
            .await
    }

    async fn update_trades(&self, updated: Vec<Trade>) -> Result<usize> {
        let rows: Vec<TradeDB> = updated.into_iter().map(TradeDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut count = 0;
                for row in &rows {
                    count += diesel::update(trades::table.find(row.id))
                        .set(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(count)
            })
            .await
    }

    async fn delete_all_trades(&self) -> Result<usize> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(trades::table)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
