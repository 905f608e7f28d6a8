//! SQLite-backed repository for the relational medium.
//!
//! # Responsibility
//! - Map `categories` and `items` tables to record types.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - Each mutation is a single committed statement or transaction.
//! - `position` columns carry insertion order for both tables.
//! - Read paths reject malformed rows instead of masking them.

use super::{RecordRef, RepoError, RepoResult, StorageError, TodoRepository};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory};
use crate::model::category::{Category, CategoryId};
use crate::model::item::{Item, ItemId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::path::Path;
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT id, name, colour_tag FROM categories";
const ITEM_SELECT_SQL: &str = "SELECT id, title, done, created_at, category_id FROM items";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("categories", &["id", "name", "colour_tag", "position"]),
    (
        "items",
        &["id", "title", "done", "created_at", "category_id", "position"],
    ),
];

/// Repository over a migrated SQLite connection it owns.
pub struct SqliteTodoRepository {
    conn: Connection,
}

impl SqliteTodoRepository {
    /// Wraps a connection after checking schema version and required columns.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (and migrates) a store file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn begin(&mut self) -> RepoResult<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn create_category(&mut self, name: &str, colour_tag: &str) -> RepoResult<Category> {
        let category = Category::new(name, colour_tag)?;
        let tx = self.begin()?;
        let position = next_position(
            &tx,
            "SELECT COALESCE(MAX(position) + 1, 0) FROM categories;",
            [],
        )?;
        tx.execute(
            "INSERT INTO categories (id, name, colour_tag, position) VALUES (?1, ?2, ?3, ?4);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                category.colour_tag.as_str(),
                position,
            ],
        )?;
        tx.commit()?;
        debug!("event=category_create module=repo status=ok medium=sqlite");
        Ok(category)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY position ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Category> {
        find_category(&self.conn, id)?.ok_or(RepoError::NotFound(RecordRef::Category(id)))
    }

    fn set_category_colour(&mut self, id: CategoryId, colour_tag: &str) -> RepoResult<Category> {
        let changed = self.conn.execute(
            "UPDATE categories SET colour_tag = ?2 WHERE id = ?1;",
            params![id.to_string(), colour_tag],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Category(id)));
        }
        debug!("event=category_recolour module=repo status=ok medium=sqlite");
        self.get_category(id)
    }

    fn delete_category(&mut self, id: CategoryId) -> RepoResult<()> {
        let id_text = id.to_string();
        let tx = self.begin()?;
        let removed_items = tx.execute("DELETE FROM items WHERE category_id = ?1;", [&id_text])?;
        let changed = tx.execute("DELETE FROM categories WHERE id = ?1;", [&id_text])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Category(id)));
        }
        tx.commit()?;
        debug!(
            "event=category_delete module=repo status=ok medium=sqlite cascaded_items={removed_items}"
        );
        Ok(())
    }

    fn create_item(&mut self, category_id: CategoryId, title: &str) -> RepoResult<Item> {
        let category_text = category_id.to_string();
        let tx = self.begin()?;
        if find_category(&tx, category_id)?.is_none() {
            return Err(RepoError::NotFound(RecordRef::Category(category_id)));
        }
        let item = Item::new(category_id, title)?;
        let position = next_position(
            &tx,
            "SELECT COALESCE(MAX(position) + 1, 0) FROM items WHERE category_id = ?1;",
            [category_text.as_str()],
        )?;
        tx.execute(
            "INSERT INTO items (id, title, done, created_at, category_id, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                item.id.to_string(),
                item.title.as_str(),
                bool_to_int(item.done),
                item.created_at,
                category_text,
                position,
            ],
        )?;
        tx.commit()?;
        debug!("event=item_create module=repo status=ok medium=sqlite");
        Ok(item)
    }

    fn list_items(&self, category_id: CategoryId) -> RepoResult<Vec<Item>> {
        if find_category(&self.conn, category_id)?.is_none() {
            return Err(RepoError::NotFound(RecordRef::Category(category_id)));
        }

        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL} WHERE category_id = ?1 ORDER BY position ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([category_id.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Item> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return parse_item_row(row);
        }

        Err(RepoError::NotFound(RecordRef::Item(id)))
    }

    fn toggle_done(&mut self, id: ItemId) -> RepoResult<Item> {
        let changed = self.conn.execute(
            "UPDATE items SET done = 1 - done WHERE id = ?1;",
            [id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Item(id)));
        }
        debug!("event=item_toggle module=repo status=ok medium=sqlite");
        self.get_item(id)
    }

    fn rename_item(&mut self, id: ItemId, title: &str) -> RepoResult<Item> {
        let mut item = self.get_item(id)?;
        item.rename(title)?;
        let changed = self.conn.execute(
            "UPDATE items SET title = ?2 WHERE id = ?1;",
            params![id.to_string(), item.title.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Item(id)));
        }
        debug!("event=item_rename module=repo status=ok medium=sqlite");
        Ok(item)
    }

    fn delete_item(&mut self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(RecordRef::Item(id)));
        }
        debug!("event=item_delete module=repo status=ok medium=sqlite");
        Ok(())
    }

    /// Every write already commits its own transaction.
    fn persist(&mut self) -> RepoResult<()> {
        Ok(())
    }

    /// Rows are read on demand; loading re-checks that the schema is usable.
    fn load(&mut self) -> RepoResult<()> {
        ensure_connection_ready(&self.conn)
    }
}

fn next_position<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<i64> {
    Ok(conn.query_row(sql, params, |row| row.get(0))?)
}

fn find_category(conn: &Connection, id: CategoryId) -> RepoResult<Option<Category>> {
    let row = conn
        .query_row(
            &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
            [id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>("id")?,
                    row.get::<_, String>("name")?,
                    row.get::<_, String>("colour_tag")?,
                ))
            },
        )
        .optional()?;

    match row {
        Some((id_text, name, colour_tag)) => Ok(Some(Category {
            id: parse_uuid(&id_text, "categories.id")?,
            name,
            colour_tag,
        })),
        None => Ok(None),
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let name: String = row.get("name")?;
    if name.trim().is_empty() {
        return Err(StorageError::InvalidData(format!(
            "blank name for category `{id_text}` in categories.name"
        ))
        .into());
    }
    Ok(Category {
        id: parse_uuid(&id_text, "categories.id")?,
        name,
        colour_tag: row.get("colour_tag")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let category_text: String = row.get("category_id")?;
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(StorageError::InvalidData(format!(
                "invalid done value `{other}` in items.done"
            ))
            .into());
        }
    };

    Ok(Item {
        id: parse_uuid(&id_text, "items.id")?,
        title: row.get("title")?,
        done,
        created_at: row.get("created_at")?,
        category_id: parse_uuid(&category_text, "items.category_id")?,
    })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| {
        StorageError::InvalidData(format!("invalid uuid value `{value}` in {column}")).into()
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        }
        .into());
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(StorageError::MissingRequiredTable(table).into());
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(StorageError::MissingRequiredColumn { table, column }.into());
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
