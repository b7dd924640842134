//! Console commands against a real data directory.
//!
//! Each step opens a fresh `Console`, the way separate invocations of the
//! binary would, so everything that matters has to survive on disk.

use clap::Parser;
use evm_console::cli::{Args, Command};
use evm_console::{Console, ConsoleConfig};
use tempfile::TempDir;

fn config(dir: &TempDir) -> ConsoleConfig {
    ConsoleConfig {
        data_dir: dir.path().join("booth"),
        vote_delay_ms: 0,
        ..ConsoleConfig::default()
    }
}

async fn invoke(dir: &TempDir, argv: &[&str]) -> anyhow::Result<String> {
    let args = Args::try_parse_from(std::iter::once("evm-console").chain(argv.iter().copied()))?;
    let mut console = Console::open(args.apply(config(dir)))?;
    console.run(&args.command, args.json).await
}

#[tokio::test]
async fn test_voters_across_invocations() {
    let dir = TempDir::new().unwrap();

    invoke(&dir, &["setup", "--preset", "PANCHAYAT"]).await.unwrap();
    invoke(&dir, &["vote", "1", "PC"]).await.unwrap();
    invoke(&dir, &["vote", "2", "PC"]).await.unwrap();

    // Resumes the half-finished ballot
    let status = invoke(&dir, &["status"]).await.unwrap();
    assert!(status.contains("2/3 voted"));
    assert!(status.contains("Ward 3 ballot:"));

    let done = invoke(&dir, &["vote", "3", "PA"]).await.unwrap();
    assert!(done.contains("Thank you"));

    let second = invoke(&dir, &["next-voter"]).await.unwrap();
    assert!(second.starts_with("Voter #2"));
    for (ward, party) in [("1", "PC"), ("2", "PB"), ("3", "PA")] {
        invoke(&dir, &["vote", ward, party]).await.unwrap();
    }

    let results = invoke(&dir, &["results", "--passcode", "12345"]).await.unwrap();
    assert!(results.contains("2 ballots counted"));
    assert!(results.contains("* Candidate C1"));
    assert!(results.contains("* Candidate A3"));
}

#[tokio::test]
async fn test_custom_election_and_reset() {
    let dir = TempDir::new().unwrap();

    let setup = invoke(
        &dir,
        &[
            "setup", "--name", "College Union", "--wards", "2", "--label", "Seat", "--parties",
            "BJP,INC,PA",
        ],
    )
    .await
    .unwrap();
    assert!(setup.contains("College Union"));
    assert!(setup.contains("2 x Seat"));

    invoke(
        &dir,
        &["simulate", "7", "--passcode", "12345", "--seed", "11"],
    )
    .await
    .unwrap();

    let json = invoke(&dir, &["results", "--passcode", "12345", "--json"])
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["ballotsCounted"], 7);

    let err = invoke(&dir, &["reset", "--passcode", "wrong"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid passcode"));

    let reset = invoke(&dir, &["reset", "--passcode", "12345"]).await.unwrap();
    assert!(reset.contains("7 ballots removed"));

    let status = invoke(&dir, &["status", "--json"]).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&status).unwrap();
    assert_eq!(parsed["voterNumber"], 1);
}

#[tokio::test]
async fn test_reconfiguring_discards_active_ballot() {
    let dir = TempDir::new().unwrap();

    invoke(&dir, &["setup", "--preset", "MUNICIPAL"]).await.unwrap();
    invoke(&dir, &["vote", "1", "PA"]).await.unwrap();
    invoke(&dir, &["setup", "--preset", "LOK_SABHA"]).await.unwrap();

    let status = invoke(&dir, &["status"]).await.unwrap();
    assert!(status.contains("0/1 voted"));
    assert!(status.contains("Constituency 1 ballot:"));
}

#[tokio::test]
async fn test_presets_do_not_need_an_election() {
    let dir = TempDir::new().unwrap();
    let text = invoke(&dir, &["presets"]).await.unwrap();
    assert!(text.contains("LOK_SABHA"));
    assert!(invoke(&dir, &["status"]).await.is_err());

    let args = Args::try_parse_from(["evm-console", "presets"]).unwrap();
    assert_eq!(args.command, Command::Presets);
}
