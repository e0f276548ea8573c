use anyhow::{Context, Result};
use sqlok::{binds, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use sqlx::postgres::PgPoolOptions;
use sqlx::Row;

/// 对 `table`（id, name, description）执行一次 INSERT → UPDATE → SELECT → DELETE
pub async fn run(url: &str, table: &str) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .context("Failed to connect to database")?;

    let inserted = InsertBuilder::new()
        .insert_into(table)
        .columns(["name", "description"])
        .values(binds!["sqlok", "inserted by the example command"])
        .returning("id")
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to insert into {table}"))?;
    println!("insert: {inserted:?}");
    let id = inserted
        .last_insert_id
        .context("INSERT did not return a generated id")?;

    let updated = UpdateBuilder::new()
        .update(table)
        .set("description", "updated by the example command")
        .where_("id = $2", binds![id])
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to update {table}"))?;
    println!("update: {updated:?}");

    let rows = SelectBuilder::new()
        .select(["id::bigint AS id", "name", "description"])
        .from(table)
        .where_("id = $1", binds![id])
        .fetch_all(&pool)
        .await
        .with_context(|| format!("Failed to select from {table}"))?;
    for row in &rows {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let description: Option<String> = row.try_get("description")?;
        println!("select: id={id} name={name} description={description:?}");
    }

    let deleted = DeleteBuilder::new()
        .delete_from(table)
        .where_("id = $1", binds![id])
        .execute(&pool)
        .await
        .with_context(|| format!("Failed to delete from {table}"))?;
    println!("delete: {deleted:?}");

    pool.close().await;
    Ok(())
}
