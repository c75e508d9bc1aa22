use rusqlite::Connection;
use studyhall_core::db::open_db_in_memory;
use studyhall_core::{
    Account, AccountRepository, Argon2Hasher, PasswordHasher, SettingsError, SettingsService,
    SqliteAccountRepository, SqliteTagRepository, ValidationError,
};

fn seed_account(conn: &Connection, nickname: &str) {
    let repo = SqliteAccountRepository::try_new(conn).unwrap();
    repo.create_account(&Account::new(nickname, "$argon2id$seed"))
        .unwrap();
}

fn settings_service(
    conn: &Connection,
) -> SettingsService<SqliteAccountRepository<'_>, SqliteTagRepository<'_>, Argon2Hasher> {
    SettingsService::new(
        SqliteAccountRepository::try_new(conn).unwrap(),
        SqliteTagRepository::try_new(conn).unwrap(),
        Argon2Hasher,
    )
}

fn stored_hash(conn: &Connection, nickname: &str) -> String {
    let repo = SqliteAccountRepository::try_new(conn).unwrap();
    repo.find_by_nickname(nickname)
        .unwrap()
        .unwrap()
        .password_hash
}

#[test]
fn update_password_stores_a_verifiable_hash() {
    let conn = open_db_in_memory().unwrap();
    seed_account(&conn, "jordan");
    let service = settings_service(&conn);

    service
        .update_password("jordan", "12345678", "12345678")
        .unwrap();

    let stored = stored_hash(&conn, "jordan");
    assert_ne!(stored, "12345678", "plaintext must never be stored");
    assert!(Argon2Hasher.matches("12345678", &stored));
}

#[test]
fn update_password_replaces_the_previous_credential() {
    let conn = open_db_in_memory().unwrap();
    seed_account(&conn, "jordan");
    let service = settings_service(&conn);

    service
        .update_password("jordan", "first-pass", "first-pass")
        .unwrap();
    service
        .update_password("jordan", "second-pass", "second-pass")
        .unwrap();

    let stored = stored_hash(&conn, "jordan");
    assert!(Argon2Hasher.matches("second-pass", &stored));
    assert!(!Argon2Hasher.matches("first-pass", &stored));
}

#[test]
fn mismatched_confirmation_is_rejected_and_leaves_credential_unchanged() {
    let conn = open_db_in_memory().unwrap();
    seed_account(&conn, "jordan");
    let service = settings_service(&conn);
    let before = stored_hash(&conn, "jordan");

    let err = service
        .update_password("jordan", "12345678", "password")
        .unwrap_err();
    let SettingsError::Validation(validation) = err else {
        panic!("expected validation error, got: {err}");
    };
    assert_eq!(validation, ValidationError::PasswordMismatch);
    assert_eq!(validation.field(), "new_password_confirm");
    assert_eq!(validation.reason(), "mismatch");

    assert_eq!(stored_hash(&conn, "jordan"), before);
}

#[test]
fn confirmation_comparison_is_byte_exact() {
    let conn = open_db_in_memory().unwrap();
    seed_account(&conn, "jordan");
    let service = settings_service(&conn);

    // Case and trailing whitespace both count as mismatches.
    assert!(service
        .update_password("jordan", "Secret99", "secret99")
        .is_err());
    assert!(service
        .update_password("jordan", "secret99", "secret99 ")
        .is_err());
}

#[test]
fn same_password_on_two_accounts_yields_distinct_hashes() {
    let conn = open_db_in_memory().unwrap();
    seed_account(&conn, "jordan");
    seed_account(&conn, "casey");
    let service = settings_service(&conn);

    service
        .update_password("jordan", "sharedpass", "sharedpass")
        .unwrap();
    service
        .update_password("casey", "sharedpass", "sharedpass")
        .unwrap();

    let jordan_hash = stored_hash(&conn, "jordan");
    let casey_hash = stored_hash(&conn, "casey");
    assert_ne!(jordan_hash, casey_hash);
    assert!(Argon2Hasher.matches("sharedpass", &jordan_hash));
    assert!(Argon2Hasher.matches("sharedpass", &casey_hash));
}

#[test]
fn update_password_for_unknown_account_fails() {
    let conn = open_db_in_memory().unwrap();
    let service = settings_service(&conn);

    let err = service
        .update_password("nobody", "12345678", "12345678")
        .unwrap_err();
    assert!(matches!(err, SettingsError::AccountNotFound(name) if name == "nobody"));
}
