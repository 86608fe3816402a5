use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

const PASSPHRASE: &str = "longenough1";

/// Run pgpdesk in `dir`, isolated from any passphrase in the environment.
fn pgpdesk(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("pgpdesk");
    cmd.current_dir(dir.path()).env_remove("PGPDESK_PASSPHRASE");
    cmd
}

fn generate(dir: &assert_fs::TempDir, name: &str, email: &str, out: &str) {
    pgpdesk(dir)
        .args(["generate", "--name", name, "--email", email])
        .args(["--passphrase", PASSPHRASE, "--out", out])
        .assert()
        .success();
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn generate_writes_backup_file() {
    let dir = assert_fs::TempDir::new().unwrap();

    pgpdesk(&dir)
        .args(["generate", "--name", "Alice", "--email", "alice@example.com"])
        .args(["--passphrase", PASSPHRASE, "--comment", "laptop"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Key pair generated"))
        .stderr(predicate::str::contains("Alice (laptop) <alice@example.com>"))
        .stderr(predicate::str::contains("pgp-keypair.json"));

    dir.child("pgp-keypair.json")
        .assert(predicate::str::contains("\"publicKey\""))
        .assert(predicate::str::contains("\"privateKey\""))
        .assert(predicate::str::contains("\"version\": \"1.0\""));
}

#[test]
fn sign_then_verify_round_trip() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");

    let signed = stdout_of(
        pgpdesk(&dir)
            .args(["sign", "--passphrase", PASSPHRASE])
            .write_stdin("hello from pgpdesk"),
    );
    assert!(signed.contains("-----BEGIN PGP MESSAGE-----"));
    dir.child("signed.asc").write_str(&signed).unwrap();

    pgpdesk(&dir)
        .args(["verify", "--file", "signed.asc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from pgpdesk"))
        .stderr(predicate::str::contains("1 signature(s) checked, 1 valid"));
}

#[test]
fn encrypt_then_decrypt_round_trip() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");
    dir.child("note.txt").write_str("meet at noon").unwrap();

    let ciphertext = stdout_of(pgpdesk(&dir).args(["encrypt", "--file", "note.txt"]));
    assert!(ciphertext.contains("-----BEGIN PGP MESSAGE-----"));
    assert!(!ciphertext.contains("meet at noon"));
    dir.child("note.asc").write_str(&ciphertext).unwrap();

    let plaintext = stdout_of(pgpdesk(&dir).args([
        "decrypt",
        "--file",
        "note.asc",
        "--passphrase",
        PASSPHRASE,
    ]));
    assert_eq!(plaintext.trim_end(), "meet at noon");
}

#[test]
fn passphrase_from_environment() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");

    pgpdesk(&dir)
        .env("PGPDESK_PASSPHRASE", PASSPHRASE)
        .arg("sign")
        .write_stdin("env passphrase")
        .assert()
        .success()
        .stdout(predicate::str::contains("-----BEGIN PGP MESSAGE-----"));
}

#[test]
fn wrong_passphrase_is_reported() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");

    pgpdesk(&dir)
        .args(["sign", "--passphrase", "definitely wrong"])
        .write_stdin("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect key passphrase"));
}

#[test]
fn verify_with_other_public_key_fails() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");
    generate(&dir, "Bob", "bob@example.com", "bob.json");

    let bob = std::fs::read_to_string(dir.path().join("bob.json")).unwrap();
    let bob = pgpdesk::core::models::key_backup::KeyBackup::parse(&bob).unwrap();
    dir.child("bob.asc").write_str(&bob.public_key).unwrap();

    let signed = stdout_of(
        pgpdesk(&dir)
            .args(["sign", "--passphrase", PASSPHRASE])
            .write_stdin("signed by alice"),
    );
    dir.child("signed.asc").write_str(&signed).unwrap();

    pgpdesk(&dir)
        .args(["verify", "--file", "signed.asc", "--public-key", "bob.asc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Signature verification failed"))
        .stderr(predicate::str::contains("Signature 1: Invalid"));
}

#[test]
fn encrypt_to_custom_key_without_backup() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Bob", "bob@example.com", "bob.json");
    let bob = std::fs::read_to_string(dir.path().join("bob.json")).unwrap();
    let bob = pgpdesk::core::models::key_backup::KeyBackup::parse(&bob).unwrap();
    // Pasted keys often arrive with CRLF line endings and stray BOMs.
    let pasted = format!("\u{FEFF}{}", bob.public_key.replace('\n', "\r\n"));
    dir.child("bob.asc").write_str(&pasted).unwrap();

    let ciphertext = stdout_of(
        pgpdesk(&dir)
            .args(["encrypt", "--public-key", "bob.asc"])
            .write_stdin("for bob"),
    );
    dir.child("msg.asc").write_str(&ciphertext).unwrap();

    pgpdesk(&dir)
        .args(["--keys", "bob.json", "decrypt", "--file", "msg.asc"])
        .args(["--passphrase", PASSPHRASE])
        .assert()
        .success()
        .stdout(predicate::str::contains("for bob"));
}

#[test]
fn inspect_shows_metadata() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "keys.json");

    pgpdesk(&dir)
        .args(["--keys", "keys.json", "inspect"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Fingerprint:"))
        .stderr(predicate::str::contains("ECC"))
        .stderr(predicate::str::contains("Alice <alice@example.com>"));
}

#[test]
fn quiet_mode_prints_only_the_artifact() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");

    pgpdesk(&dir)
        .args(["-q", "sign", "--passphrase", PASSPHRASE])
        .write_stdin("quiet")
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::starts_with("-----BEGIN PGP MESSAGE-----"));
}

#[test]
fn history_records_operations() {
    let dir = assert_fs::TempDir::new().unwrap();
    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");
    pgpdesk(&dir)
        .args(["sign", "--passphrase", PASSPHRASE])
        .write_stdin("journaled")
        .assert()
        .success();

    dir.child("pgpdesk-audit.log")
        .assert(predicate::str::contains("\"action\":\"generate\""))
        .assert(predicate::str::contains("\"action\":\"load\""))
        .assert(predicate::str::contains("\"action\":\"sign\""));

    pgpdesk(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("sign"));

    pgpdesk(&dir)
        .args(["history", "--action", "sign"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sign"))
        .stdout(predicate::str::contains("generate").not());
}

#[test]
fn journal_can_be_disabled() {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("pgpdesk.toml")
        .write_str("[audit]\nenabled = false\n")
        .unwrap();

    generate(&dir, "Alice", "alice@example.com", "pgp-keypair.json");

    dir.child("pgpdesk-audit.log")
        .assert(predicate::path::missing());
}
