use std::fs;

use tombstone_bench::config::BenchmarkConfig;
use tombstone_bench::runner::EpisodeRunner;
use tombstone_bot::OpponentParams;
use tempfile::tempdir;

fn load_config(output_dir: &std::path::Path, player: &str) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
episodes:
  seed: 4242
  count: 6
  max_turns: 150
player:
  kind: "{player}"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("episodes.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_once(player: &str) -> (String, String) {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path(), player);
    let outputs = config.resolved_outputs();

    let runner = EpisodeRunner::with_params(config, outputs, OpponentParams::default());
    let summary = runner.run().expect("episodes complete");

    assert_eq!(summary.episodes, 6);
    assert_eq!(summary.rows_written, 6);
    assert!(summary.summary_path.exists(), "summary markdown missing");
    assert!(summary.telemetry_path.is_none());

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let markdown = fs::read_to_string(&summary.summary_path).expect("summary readable");
    (jsonl, markdown)
}

#[test]
fn episode_smoke_test_writes_rows_and_summary() {
    let (jsonl, markdown) = run_once("roam");

    let mut episodes = Vec::new();
    for line in jsonl.lines() {
        let value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        assert_eq!(value["run_id"], "test_smoke");
        assert_eq!(value["player"], "roam");
        let outcome = value["outcome"].as_str().expect("outcome string");
        assert!(outcome == "opponent_won" || outcome == "turn_limit");
        let turns = value["turns"].as_u64().expect("turn count");
        assert!((1..=150).contains(&turns));
        assert!(value["layout"]["right"].as_array().is_some_and(|a| a.len() == 16));
        episodes.push(value["episode"].as_u64().expect("episode index"));
    }
    assert_eq!(episodes, vec![0, 1, 2, 3, 4, 5]);

    assert!(markdown.starts_with("# Opponent Benchmark Summary"));
    assert!(markdown.contains("| Win % |"));
}

#[test]
fn episode_rows_are_deterministic() {
    assert_eq!(run_once("absent").0, run_once("absent").0);
}
