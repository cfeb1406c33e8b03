use coup_cli::run;
use serde_json::Value;

fn run_cli(args: &[&str]) -> (i32, String, String) {
    let mut out: Vec<u8> = Vec::new();
    let mut err: Vec<u8> = Vec::new();
    let mut argv = vec!["coup"];
    argv.extend_from_slice(args);
    let code = run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8_lossy(&out).into_owned(),
        String::from_utf8_lossy(&err).into_owned(),
    )
}

#[test]
fn tableau_prints_natural() {
    let (code, stdout, _) = run_cli(&["tableau", "--player", "8", "--banker", "2"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Natural: yes"));
    assert!(stdout.contains("Player: stands"));
    assert!(stdout.contains("Banker: stands"));
}

#[test]
fn tableau_rejects_out_of_range_total() {
    let (code, _, stderr) = run_cli(&["tableau", "--player", "10", "--banker", "2"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("Error:"), "stderr={stderr}");
}

#[test]
fn odds_json_for_player_draw_against_banker_six() {
    let (code, stdout, _) = run_cli(&["odds", "--player", "K,4", "--banker", "6,10", "--json"]);
    assert_eq!(code, 0);
    let v: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["status"], "resolved");
    assert_eq!(v["enumerated"], 169);
    let sum = v["player_pct"].as_f64().unwrap()
        + v["banker_pct"].as_f64().unwrap()
        + v["tie_pct"].as_f64().unwrap();
    assert!((sum - 100.0).abs() < 1e-6);
    assert_eq!(v["next_action"], "Player draws a third card");
}

#[test]
fn odds_pending_reports_insufficient_information() {
    let (code, stdout, _) = run_cli(&["odds", "--player", "K"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Insufficient information"));
    assert!(stdout.contains("Banker draws card 1"));
}

#[test]
fn odds_inconsistent_hand_is_not_an_error() {
    let (code, stdout, _) = run_cli(&["odds", "--player", "4,4,2", "--banker", "K,K"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Inconsistent hand"));
}

#[test]
fn odds_invalid_label_exits_with_error() {
    let (code, _, stderr) = run_cli(&["odds", "--player", "K,11"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("player hand"));
}

#[test]
fn roads_json_has_four_grids() {
    let (code, stdout, _) = run_cli(&["roads", "--results", "PPPPPPP", "--json"]);
    assert_eq!(code, 0);
    let v: Value = serde_json::from_str(&stdout).unwrap();
    // dragon tail: column 1 only has row 5 filled
    let col1 = v["big"]["grid"]["columns"][1].as_array().unwrap();
    assert!(col1[..5].iter().all(Value::is_null));
    assert_eq!(col1[5]["winner"], "player");
    // two big-road columns of depth 6 and 1: one big-eye mark, no small road yet
    assert_eq!(v["big_eye"]["columns"][0][0], "irregular");
    assert!(v["big_eye"]["columns"][0][1].is_null());
    assert!(v["small"]["columns"].as_array().unwrap().is_empty());
    assert_eq!(v["bead"]["columns"].as_array().unwrap().len(), 2);
}

#[test]
fn deal_is_deterministic_per_seed() {
    let (_, a, _) = run_cli(&["deal", "--seed", "42"]);
    let (_, b, _) = run_cli(&["deal", "--seed", "42"]);
    assert_eq!(a, b);
    assert!(a.starts_with("Seed: 42"));
}

#[test]
fn missing_required_flag_is_usage_error() {
    let (code, _, stderr) = run_cli(&["roads"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("--results"));
}
