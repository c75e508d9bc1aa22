//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide nickname lookup and full-record persistence for accounts.
//! - Own tag-link replacement so a save is one atomic unit.
//!
//! # Invariants
//! - `save` replaces the account row and its whole tag-link set in a
//!   single immediate transaction; no partial writes survive an error.
//! - `nickname` is never rewritten by `save`.
//! - Write paths call `Account::validate()` before SQL mutations.

use crate::model::account::{Account, AccountId};
use crate::repo::{ensure_settings_schema, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Repository interface for account lookup and persistence.
pub trait AccountRepository {
    /// Finds one account by its unique nickname, tags included.
    fn find_by_nickname(&self, nickname: &str) -> RepoResult<Option<Account>>;

    /// Persists the full account record, replacing the stored tag links.
    ///
    /// Returns `RepoError::NotFound` when no row exists for the uuid.
    fn save(&self, account: &Account) -> RepoResult<()>;

    /// Inserts a brand-new account record (registration path).
    fn create_account(&self, account: &Account) -> RepoResult<()>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_settings_schema(conn)?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn find_by_nickname(&self, nickname: &str) -> RepoResult<Option<Account>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, nickname, password_hash, bio
                 FROM accounts
                 WHERE nickname = ?1;",
                [nickname],
                |row| {
                    Ok((
                        row.get::<_, String>("uuid")?,
                        row.get::<_, String>("nickname")?,
                        row.get::<_, String>("password_hash")?,
                        row.get::<_, Option<String>>("bio")?,
                    ))
                },
            )
            .optional()?;

        let Some((uuid_text, nickname, password_hash, bio)) = row else {
            return Ok(None);
        };
        let uuid = parse_uuid(&uuid_text)?;
        let tags = load_tags_for_account(self.conn, &uuid_text)?;

        let mut account = Account::with_id(uuid, nickname, password_hash)?;
        account.bio = bio;
        account.tags = tags;
        account.validate()?;
        Ok(Some(account))
    }

    fn save(&self, account: &Account) -> RepoResult<()> {
        account.validate()?;

        let uuid_text = account.uuid.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE accounts
             SET
                password_hash = ?2,
                bio = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                uuid_text.as_str(),
                account.password_hash.as_str(),
                account.bio.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(account.uuid));
        }

        replace_tag_links(&tx, uuid_text.as_str(), &account.tags)?;
        tx.commit()?;
        Ok(())
    }

    fn create_account(&self, account: &Account) -> RepoResult<()> {
        account.validate()?;

        let uuid_text = account.uuid.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO accounts (uuid, nickname, password_hash, bio)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                uuid_text.as_str(),
                account.nickname.as_str(),
                account.password_hash.as_str(),
                account.bio.as_deref(),
            ],
        )?;

        replace_tag_links(&tx, uuid_text.as_str(), &account.tags)?;
        tx.commit()?;
        Ok(())
    }
}

fn replace_tag_links(
    tx: &Transaction<'_>,
    account_uuid: &str,
    titles: &BTreeSet<String>,
) -> RepoResult<()> {
    tx.execute(
        "DELETE FROM account_tags WHERE account_uuid = ?1;",
        [account_uuid],
    )?;

    for title in titles {
        tx.execute(
            "INSERT OR IGNORE INTO tags (title) VALUES (?1);",
            [title.as_str()],
        )?;
        tx.execute(
            "INSERT INTO account_tags (account_uuid, tag_id)
             SELECT ?1, id
             FROM tags
             WHERE title = ?2;",
            params![account_uuid, title.as_str()],
        )?;
    }

    Ok(())
}

fn load_tags_for_account(conn: &Connection, account_uuid: &str) -> RepoResult<BTreeSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.title
         FROM account_tags at
         INNER JOIN tags t ON t.id = at.tag_id
         WHERE at.account_uuid = ?1;",
    )?;
    let mut rows = stmt.query([account_uuid])?;
    let mut tags = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tags.insert(row.get::<_, String>(0)?);
    }
    Ok(tags)
}

fn parse_uuid(value: &str) -> RepoResult<AccountId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in accounts.uuid"))
    })
}
