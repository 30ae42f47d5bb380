use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database. Mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

// Fixed width so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

const RECIPE_COLUMNS: &str = "r.id, r.user_id, r.title, r.description, r.ingredients, r.instructions, \
     r.cooking_time, r.difficulty, r.category, r.created_at, r.updated_at";

fn recipe_from_row(row: &Row<'_>) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        ingredients: row.get(4)?,
        instructions: row.get(5)?,
        cooking_time: row.get(6)?,
        difficulty: row
            .get::<_, Option<String>>(7)?
            .and_then(|s| Difficulty::parse(&s)),
        category: row.get(8)?,
        created_at: parse_datetime(&row.get::<_, String>(9)?),
        updated_at: parse_datetime(&row.get::<_, String>(10)?),
    })
}

/// Expects [`RECIPE_COLUMNS`] followed by username, full_name, like count and liked flag.
fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<RecipeSummary> {
    Ok(RecipeSummary {
        recipe: recipe_from_row(row)?,
        author: Author {
            username: row.get(11)?,
            full_name: row.get(12)?,
        },
        likes_count: row.get(13)?,
        is_liked_by_user: row.get(14)?,
    })
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        token_hash: row.get(1)?,
        token_lookup: row.get(2)?,
        account_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        expires_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
        last_used_at: row.get::<_, Option<String>>(6)?.map(|s| parse_datetime(&s)),
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    Ok(Profile {
        id: row.get(0)?,
        username: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        recipe_id: row.get(1)?,
        user_id: row.get(2)?,
        comment: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        updated_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    fn is_initialized(&self) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'recipes'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Account operations

    fn create_account(&self, account: &Account) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO accounts (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                account.id,
                account.email,
                account.password_hash,
                format_datetime(&account.created_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::AlreadyExists),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_account(&self, id: &str) -> Result<Option<Account>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE id = ?1",
            params![id],
            |row| {
                Ok(Account {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, password_hash, created_at FROM accounts WHERE email = ?1",
            params![email],
            |row| {
                Ok(Account {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    password_hash: row.get(2)?,
                    created_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    // Session operations

    fn create_session(&self, session: &Session) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO sessions (id, token_hash, token_lookup, account_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.id,
                session.token_hash,
                session.token_lookup,
                session.account_id,
                format_datetime(&session.created_at),
                session.expires_at.as_ref().map(format_datetime),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_constraint_violation(&e) => Err(Error::SessionLookupCollision),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, account_id, created_at, expires_at, last_used_at
             FROM sessions WHERE token_lookup = ?1",
            params![lookup],
            session_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_session(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_session_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE sessions SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    fn delete_expired_sessions(&self) -> Result<usize> {
        let rows = self.conn().execute(
            "DELETE FROM sessions WHERE expires_at IS NOT NULL AND expires_at < ?1",
            params![format_datetime(&Utc::now())],
        )?;
        Ok(rows)
    }

    // Profile operations

    fn create_profile(&self, profile: &Profile) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO profiles (id, username, full_name, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                profile.id,
                profile.username,
                profile.full_name,
                profile.email,
                format_datetime(&profile.created_at),
                format_datetime(&profile.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Err(Error::AlreadyExists)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, username, full_name, email, created_at, updated_at
             FROM profiles WHERE id = ?1",
            params![id],
            profile_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_profile(&self, profile: &Profile) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE profiles SET username = ?1, full_name = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                profile.username,
                profile.full_name,
                format_datetime(&profile.updated_at),
                profile.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Recipe operations

    fn create_recipe(&self, recipe: &Recipe) -> Result<()> {
        self.conn().execute(
            "INSERT INTO recipes (id, user_id, title, description, ingredients, instructions,
                                  cooking_time, difficulty, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                recipe.id,
                recipe.user_id,
                recipe.title,
                recipe.description,
                recipe.ingredients,
                recipe.instructions,
                recipe.cooking_time,
                recipe.difficulty.map(Difficulty::as_str),
                recipe.category,
                format_datetime(&recipe.created_at),
                format_datetime(&recipe.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_recipe(&self, id: &str) -> Result<Option<Recipe>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = ?1"),
            params![id],
            recipe_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_recipe(&self, recipe: &Recipe) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE recipes SET title = ?1, description = ?2, ingredients = ?3, instructions = ?4,
                                cooking_time = ?5, difficulty = ?6, category = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                recipe.title,
                recipe.description,
                recipe.ingredients,
                recipe.instructions,
                recipe.cooking_time,
                recipe.difficulty.map(Difficulty::as_str),
                recipe.category,
                format_datetime(&recipe.updated_at),
                recipe.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_recipe(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM recipes WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn list_recipe_summaries(
        &self,
        viewer_id: &str,
        scope: RecipeScope,
    ) -> Result<Vec<RecipeSummary>> {
        let scope_clause = match scope {
            RecipeScope::All => "1 = 1",
            RecipeScope::Mine => "r.user_id = ?1",
            RecipeScope::Others => "r.user_id != ?1",
        };

        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS}, p.username, p.full_name,
                    COUNT(l.id), COALESCE(MAX(l.user_id = ?1), 0)
             FROM recipes r
             LEFT JOIN profiles p ON p.id = r.user_id
             LEFT JOIN recipe_likes l ON l.recipe_id = r.id
             WHERE {scope_clause}
             GROUP BY r.id
             ORDER BY r.created_at DESC, r.rowid DESC"
        ))?;

        let rows = stmt.query_map(params![viewer_id], summary_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_recipe_summary(&self, viewer_id: &str, id: &str) -> Result<Option<RecipeSummary>> {
        let conn = self.conn();
        conn.query_row(
            &format!(
                "SELECT {RECIPE_COLUMNS}, p.username, p.full_name,
                        COUNT(l.id), COALESCE(MAX(l.user_id = ?1), 0)
                 FROM recipes r
                 LEFT JOIN profiles p ON p.id = r.user_id
                 LEFT JOIN recipe_likes l ON l.recipe_id = r.id
                 WHERE r.id = ?2
                 GROUP BY r.id"
            ),
            params![viewer_id, id],
            summary_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_saved_recipes(&self, viewer_id: &str) -> Result<Vec<RecipeSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECIPE_COLUMNS}, p.username, p.full_name, COUNT(l.id), 1
             FROM recipe_likes s
             JOIN recipes r ON r.id = s.recipe_id
             LEFT JOIN profiles p ON p.id = r.user_id
             LEFT JOIN recipe_likes l ON l.recipe_id = r.id
             WHERE s.user_id = ?1
             GROUP BY s.id
             ORDER BY s.created_at DESC, s.rowid DESC"
        ))?;

        let rows = stmt.query_map(params![viewer_id], summary_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Like operations

    fn add_like(&self, like: &Like) -> Result<bool> {
        let rows = self.conn().execute(
            "INSERT OR IGNORE INTO recipe_likes (id, recipe_id, user_id, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                like.id,
                like.recipe_id,
                like.user_id,
                format_datetime(&like.created_at)
            ],
        )?;
        Ok(rows > 0)
    }

    fn remove_like(&self, recipe_id: &str, user_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM recipe_likes WHERE recipe_id = ?1 AND user_id = ?2",
            params![recipe_id, user_id],
        )?;
        Ok(rows > 0)
    }

    fn count_likes(&self, recipe_id: &str) -> Result<i64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM recipe_likes WHERE recipe_id = ?1",
            params![recipe_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn has_liked(&self, recipe_id: &str, user_id: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT 1 FROM recipe_likes WHERE recipe_id = ?1 AND user_id = ?2",
                params![recipe_id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // Comment operations

    fn create_comment(&self, comment: &Comment) -> Result<()> {
        self.conn().execute(
            "INSERT INTO recipe_comments (id, recipe_id, user_id, comment, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                comment.id,
                comment.recipe_id,
                comment.user_id,
                comment.comment,
                format_datetime(&comment.created_at),
                format_datetime(&comment.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get_comment(&self, id: &str) -> Result<Option<Comment>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, recipe_id, user_id, comment, created_at, updated_at
             FROM recipe_comments WHERE id = ?1",
            params![id],
            comment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_comments(&self, recipe_id: &str) -> Result<Vec<CommentWithAuthor>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.recipe_id, c.user_id, c.comment, c.created_at, c.updated_at,
                    p.username, p.full_name
             FROM recipe_comments c
             LEFT JOIN profiles p ON p.id = c.user_id
             WHERE c.recipe_id = ?1
             ORDER BY c.created_at, c.rowid",
        )?;

        let rows = stmt.query_map(params![recipe_id], |row| {
            Ok(CommentWithAuthor {
                comment: comment_from_row(row)?,
                author: Author {
                    username: row.get(6)?,
                    full_name: row.get(7)?,
                },
                can_delete: false,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_comment(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM recipe_comments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}
